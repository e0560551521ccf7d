//! MCP tool router for the three transport-data fetchers.
//!
//! Every tool answers with the uniform result envelope as plain JSON
//! (`structuredContent` on the wire): `{"type": <kind>, "data": ...}` on
//! success and `{"type": "Error", "error": ...}` on failure. Upstream
//! failures never surface as MCP protocol errors.

use std::future::Future;

use rmcp::handler::server::tool::{Parameters, ToolRouter};
use rmcp::model::JsonObject;

use crate::clients::etabus::{self, BusRouteClient};
use crate::clients::immd_traffic::{self, PassengerTrafficClient};
use crate::clients::immd_wait_time::{self, WaitTimeClient};
use crate::domain::{Envelope, Lang};
use crate::infra::config::base_url_from_env;
use crate::infra::runtime::mcp_transport::ServerHandler;

#[derive(Clone)]
pub struct TransportSvc {
    pub traffic: PassengerTrafficClient,
    pub buses: BusRouteClient,
    pub wait_times: WaitTimeClient,
}

impl ServerHandler for TransportSvc {}

impl TransportSvc {
    pub fn with_bases(
        traffic_base: impl Into<String>,
        bus_base: impl Into<String>,
        queue_base: impl Into<String>,
    ) -> Self {
        Self {
            traffic: PassengerTrafficClient::new(traffic_base),
            buses: BusRouteClient::new(bus_base),
            wait_times: WaitTimeClient::new(queue_base),
        }
    }

    pub fn from_env() -> Self {
        Self::with_bases(
            base_url_from_env("IMMD_TRAFFIC_BASE_URL", immd_traffic::DEFAULT_BASE),
            base_url_from_env("ETABUS_BASE_URL", etabus::DEFAULT_BASE),
            base_url_from_env("IMMD_QUEUE_BASE_URL", immd_wait_time::DEFAULT_BASE),
        )
    }
}

#[rmcp::tool_router]
impl TransportSvc {
    #[rmcp::tool(
        name = "get_passenger_stats",
        description = "Get daily passenger traffic statistics at Hong Kong control points (optional start_date/end_date in DD-MM-YYYY; defaults to the last 7 days)"
    )]
    async fn get_passenger_stats(
        &self,
        params: Parameters<JsonObject>,
    ) -> Result<rmcp::Json<serde_json::Value>, rmcp::ErrorData> {
        let start = params.0.get("start_date").and_then(|v| v.as_str());
        let end = params.0.get("end_date").and_then(|v| v.as_str());
        let envelope = match self.traffic.fetch(start, end).await {
            Ok(records) => Envelope::PassengerStats { data: records },
            Err(e) => Envelope::from(e),
        };
        Ok(rmcp::Json(envelope.to_value()))
    }

    #[rmcp::tool(
        name = "get_bus_kmb",
        description = "Get all bus routes of Kowloon Motor Bus (KMB) and Long Win Bus Services Hong Kong (lang: en/tc/sc, default en)"
    )]
    async fn get_bus_kmb(
        &self,
        params: Parameters<JsonObject>,
    ) -> Result<rmcp::Json<serde_json::Value>, rmcp::ErrorData> {
        let lang = Lang::from_code(
            params.0.get("lang").and_then(|v| v.as_str()).unwrap_or("en"),
        );
        let envelope = match self.buses.fetch(lang).await {
            Ok(routes) => Envelope::RouteList { data: routes },
            Err(e) => Envelope::from(e),
        };
        Ok(rmcp::Json(envelope.to_value()))
    }

    #[rmcp::tool(
        name = "get_land_boundary_wait_times",
        description = "Fetch current waiting times at land boundary control points in Hong Kong"
    )]
    async fn get_land_boundary_wait_times(
        &self,
        params: Parameters<JsonObject>,
    ) -> Result<rmcp::Json<serde_json::Value>, rmcp::ErrorData> {
        let lang = params.0.get("lang").and_then(|v| v.as_str()).unwrap_or("en");
        let envelope = match self.wait_times.fetch(lang).await {
            Ok(report) => Envelope::WaitTimes { data: report },
            Err(e) => Envelope::from(e),
        };
        Ok(rmcp::Json(envelope.to_value()))
    }
}

pub type TransportRouter = ToolRouter<TransportSvc>;

impl TransportSvc {
    pub fn router() -> TransportRouter {
        // Wrapper to expose the macro-generated private tool_router
        Self::tool_router()
    }
}

/// Factory required by the rmcp stdio and streamable HTTP transports.
pub fn factory_from_env() -> (TransportSvc, TransportRouter) {
    (TransportSvc::from_env(), TransportSvc::router())
}
