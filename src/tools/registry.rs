use std::collections::HashMap;
use std::sync::Arc;

use crate::clients::{etabus, immd_traffic, immd_wait_time};
use crate::core::tool::Tool;
use crate::infra::config::base_url_from_env;
use crate::tools::bus_kmb::BusRoutesTool;
use crate::tools::passenger_traffic::PassengerStatsTool;
use crate::tools::wait_times::WaitTimesTool;

/// Name-keyed tool registry backing the deprecated JSON-RPC shim.
#[derive(Clone)]
pub struct ToolRegistry {
    by_name: Arc<HashMap<&'static str, Arc<dyn Tool>>>,
}

impl ToolRegistry {
    pub fn with_tools(iter: impl IntoIterator<Item = Arc<dyn Tool>>) -> Self {
        let mut map: HashMap<&'static str, Arc<dyn Tool>> = HashMap::new();
        for t in iter {
            map.insert(t.name(), t);
        }
        Self { by_name: Arc::new(map) }
    }

    pub fn list(&self) -> Vec<ToolMeta> {
        self.by_name
            .values()
            .map(|t| ToolMeta {
                name: t.name(),
                description: t.description(),
                input_schema: t.input_schema(),
            })
            .collect()
    }

    pub async fn call(
        &self,
        name: &str,
        args: &serde_json::Value,
    ) -> Result<serde_json::Value, String> {
        let t = self
            .by_name
            .get(name)
            .ok_or_else(|| format!("unknown tool: {name}"))?;
        t.call(args).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolMeta {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: serde_json::Value,
}

/// Registry over the three transport fetchers, with upstream base URLs
/// overridable from the environment.
pub fn build_registry_from_env() -> ToolRegistry {
    let traffic = immd_traffic::PassengerTrafficClient::new(base_url_from_env(
        "IMMD_TRAFFIC_BASE_URL",
        immd_traffic::DEFAULT_BASE,
    ));
    let buses = etabus::BusRouteClient::new(base_url_from_env(
        "ETABUS_BASE_URL",
        etabus::DEFAULT_BASE,
    ));
    let wait_times = immd_wait_time::WaitTimeClient::new(base_url_from_env(
        "IMMD_QUEUE_BASE_URL",
        immd_wait_time::DEFAULT_BASE,
    ));
    ToolRegistry::with_tools([
        Arc::new(PassengerStatsTool::new(traffic)) as Arc<dyn Tool>,
        Arc::new(BusRoutesTool::new(buses)) as Arc<dyn Tool>,
        Arc::new(WaitTimesTool::new(wait_times)) as Arc<dyn Tool>,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn registry_lists_all_three_tools_with_schemas() {
        std::env::remove_var("IMMD_TRAFFIC_BASE_URL");
        std::env::remove_var("ETABUS_BASE_URL");
        std::env::remove_var("IMMD_QUEUE_BASE_URL");
        let reg = build_registry_from_env();
        let mut names: Vec<&str> = reg.list().into_iter().map(|m| m.name).collect();
        names.sort_unstable();
        assert_eq!(
            names,
            [
                "get_bus_kmb",
                "get_land_boundary_wait_times",
                "get_passenger_stats"
            ]
        );
        let metas = reg.list();
        let bus = metas.iter().find(|m| m.name == "get_bus_kmb").unwrap();
        assert_eq!(
            bus.input_schema["properties"]["lang"]["enum"],
            serde_json::json!(["en", "tc", "sc"])
        );
        // The wait-times lang is intentionally not constrained to an enum.
        let wait = metas
            .iter()
            .find(|m| m.name == "get_land_boundary_wait_times")
            .unwrap();
        assert!(wait.input_schema["properties"]["lang"]["enum"].is_null());
    }

    #[tokio::test]
    #[serial]
    async fn calling_an_unknown_tool_is_a_dispatch_error() {
        let reg = build_registry_from_env();
        let err = reg
            .call("get_ferry_times", &serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(err.contains("unknown tool: get_ferry_times"));
    }
}
