//! Tracing setup for hk-transport-mcp.

/// Install the global fmt subscriber. Level defaults to `info`; `RUST_LOG`
/// overrides it. Safe to call more than once.
pub fn init() {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init();
}

/// Emit one metric-style info line for a tool, e.g. upstream fetch latency.
pub fn log_metric(tool: &str, metric: &str, value: f64) {
    tracing::info!(tool = tool, metric = metric, value = value, "metric");
}
