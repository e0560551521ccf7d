use async_trait::async_trait;

/// Minimal metadata every tool must expose.
pub trait ToolSpec {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn input_schema(&self) -> serde_json::Value;
}

/// Tool = Spec + invocation. Tools return their result envelope as plain
/// JSON; `Err` is reserved for dispatch-level problems (bad arguments shape),
/// never for upstream fetch failures.
#[async_trait]
pub trait Tool: ToolSpec + Send + Sync {
    async fn call(&self, arguments: &serde_json::Value) -> Result<serde_json::Value, String>;
}
