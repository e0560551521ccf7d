use async_trait::async_trait;
use serde_json::json;

use crate::clients::etabus::BusRouteClient;
use crate::core::tool::{Tool, ToolSpec};
use crate::domain::{Envelope, Lang};

/// All bus routes of Kowloon Motor Bus (KMB) and Long Win Bus Services.
#[derive(Clone, Default)]
pub struct BusRoutesTool {
    client: BusRouteClient,
}

impl BusRoutesTool {
    pub fn new(client: BusRouteClient) -> Self {
        Self { client }
    }
}

impl ToolSpec for BusRoutesTool {
    fn name(&self) -> &'static str {
        "get_bus_kmb"
    }
    fn description(&self) -> &'static str {
        "Get all bus routes of Kowloon Motor Bus (KMB) and Long Win Bus Services Hong Kong"
    }
    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "lang": {
                    "anyOf": [{"type": "string"}, {"type": "null"}],
                    "enum": ["en", "tc", "sc"],
                    "default": "en",
                    "description": "Language (en/tc/sc) English, Traditional Chinese, Simplified Chinese. Default English"
                }
            },
            "required": []
        })
    }
}

#[async_trait]
impl Tool for BusRoutesTool {
    async fn call(&self, arguments: &serde_json::Value) -> Result<serde_json::Value, String> {
        let lang = Lang::from_code(
            arguments
                .get("lang")
                .and_then(|v| v.as_str())
                .unwrap_or("en"),
        );
        let envelope = match self.client.fetch(lang).await {
            Ok(routes) => Envelope::RouteList { data: routes },
            Err(e) => Envelope::from(e),
        };
        Ok(envelope.to_value())
    }
}
