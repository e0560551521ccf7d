use async_trait::async_trait;
use serde_json::json;

use crate::clients::immd_wait_time::WaitTimeClient;
use crate::core::tool::{Tool, ToolSpec};
use crate::domain::Envelope;

/// Current waiting times at land boundary control points.
#[derive(Clone, Default)]
pub struct WaitTimesTool {
    client: WaitTimeClient,
}

impl WaitTimesTool {
    pub fn new(client: WaitTimeClient) -> Self {
        Self { client }
    }
}

impl ToolSpec for WaitTimesTool {
    fn name(&self) -> &'static str {
        "get_land_boundary_wait_times"
    }
    fn description(&self) -> &'static str {
        "Fetch current waiting times at land boundary control points in Hong Kong."
    }
    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "lang": {
                    "anyOf": [{"type": "string"}, {"type": "null"}],
                    "default": "en",
                    "description": "Language (en/tc/sc) English, Traditional Chinese, Simplified Chinese. Default English"
                }
            },
            "required": []
        })
    }
}

#[async_trait]
impl Tool for WaitTimesTool {
    async fn call(&self, arguments: &serde_json::Value) -> Result<serde_json::Value, String> {
        // lang is display-only here; unlike get_bus_kmb it is deliberately
        // not validated against the language enum.
        let lang = arguments
            .get("lang")
            .and_then(|v| v.as_str())
            .unwrap_or("en");
        let envelope = match self.client.fetch(lang).await {
            Ok(report) => Envelope::WaitTimes { data: report },
            Err(e) => Envelope::from(e),
        };
        Ok(envelope.to_value())
    }
}
