use async_trait::async_trait;
use serde_json::json;

use crate::clients::immd_traffic::PassengerTrafficClient;
use crate::core::tool::{Tool, ToolSpec};
use crate::domain::Envelope;

/// Daily passenger traffic statistics at Hong Kong control points.
#[derive(Clone, Default)]
pub struct PassengerStatsTool {
    client: PassengerTrafficClient,
}

impl PassengerStatsTool {
    pub fn new(client: PassengerTrafficClient) -> Self {
        Self { client }
    }
}

impl ToolSpec for PassengerStatsTool {
    fn name(&self) -> &'static str {
        "get_passenger_stats"
    }
    fn description(&self) -> &'static str {
        "Get daily passenger traffic statistics at Hong Kong control points, by direction and resident type. Defaults to the last 7 days when no dates are given."
    }
    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "start_date": {
                    "anyOf": [{"type": "string"}, {"type": "null"}],
                    "default": null,
                    "description": "Optional start date in DD-MM-YYYY format"
                },
                "end_date": {
                    "anyOf": [{"type": "string"}, {"type": "null"}],
                    "default": null,
                    "description": "Optional end date in DD-MM-YYYY format"
                }
            },
            "required": []
        })
    }
}

#[async_trait]
impl Tool for PassengerStatsTool {
    async fn call(&self, arguments: &serde_json::Value) -> Result<serde_json::Value, String> {
        let start = arguments.get("start_date").and_then(|v| v.as_str());
        let end = arguments.get("end_date").and_then(|v| v.as_str());
        let envelope = match self.client.fetch(start, end).await {
            Ok(records) => Envelope::PassengerStats { data: records },
            Err(e) => Envelope::from(e),
        };
        Ok(envelope.to_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn an_invalid_date_becomes_an_error_envelope_not_a_fault() {
        let tool = PassengerStatsTool::new(PassengerTrafficClient::new("http://127.0.0.1:1"));
        let out = tool
            .call(&json!({"start_date": "not-a-date"}))
            .await
            .unwrap();
        assert_eq!(out["type"], "Error");
        assert_eq!(
            out["error"],
            "Invalid date format for start_date. Use DD-MM-YYYY"
        );
    }

    #[tokio::test]
    async fn success_is_wrapped_as_passenger_stats() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path_contains("statistics_on_daily_passenger_traffic.csv");
            then.status(200).body(
                "Date,Control Point,Arrival / Departure,Hong Kong Residents,Mainland Visitors,Other Visitors,Total\n\
                 05-01-2021,Airport,Arrival,500,5,15,520\n",
            );
        });

        let tool = PassengerStatsTool::new(PassengerTrafficClient::new(server.base_url()));
        let out = tool
            .call(&json!({"start_date": "01-01-2021", "end_date": "08-01-2021"}))
            .await
            .unwrap();
        assert_eq!(out["type"], "PassengerStats");
        assert_eq!(out["data"][0]["date"], "05-01-2021");
        assert_eq!(out["data"][0]["total"], 520);
    }
}
