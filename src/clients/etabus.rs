//! KMB/LWB bus route catalog from the etabus JSON feed, localized by
//! requested language.

use reqwest::Client;
use serde::Deserialize;
use std::time::Instant;

use crate::core::error::FetchError;
use crate::domain::{Bound, BusRoute, Lang};
use crate::infra::http::headers::add_standard_headers;
use crate::infra::runtime::limits::make_http_client;

pub const DEFAULT_BASE: &str = "https://data.etabus.gov.hk";
const ROUTE_LIST_PATH: &str = "/v1/transport/kmb/route/";

#[derive(Clone)]
pub struct BusRouteClient {
    base: String,
    http: Client,
}

impl Default for BusRouteClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE)
    }
}

impl BusRouteClient {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            http: make_http_client(),
        }
    }

    /// Fetch the full route catalog with origin/destination in `lang`. An
    /// empty `data` array is an empty success, not an error.
    pub async fn fetch(&self, lang: Lang) -> Result<Vec<BusRoute>, FetchError> {
        let url = format!("{}{}", self.base.trim_end_matches('/'), ROUTE_LIST_PATH);
        tracing::debug!(endpoint = %url, "bus_routes fetch");
        let started = Instant::now();

        let (builder, _rid) = add_standard_headers(self.http.get(url), None);
        let resp = builder
            .send()
            .await
            .map_err(|e| FetchError::SourceUnavailable(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(FetchError::SourceUnavailable(format!(
                "upstream status {}",
                resp.status()
            )));
        }
        let body = resp
            .text()
            .await
            .map_err(|e| FetchError::SourceUnavailable(e.to_string()))?;
        let wire: RouteListWire = serde_json::from_str(&body)
            .map_err(|e| FetchError::InvalidResponseFormat(e.to_string()))?;

        let elapsed_ms = started.elapsed().as_millis() as f64;
        crate::infra::logging::log_metric("get_bus_kmb", "remote_latency_ms", elapsed_ms);
        Ok(wire.data.into_iter().map(|r| r.localize(lang)).collect())
    }
}

/// Top-level catalog payload. `data` is required: a body without it is an
/// invalid response, not an empty catalog.
#[derive(Deserialize)]
struct RouteListWire {
    data: Vec<RouteWire>,
}

/// Upstream route record. Origin/destination come in all three languages
/// under a `{field}_{lang}` naming convention.
#[derive(Deserialize)]
struct RouteWire {
    route: String,
    bound: String,
    service_type: String,
    orig_en: String,
    orig_tc: String,
    orig_sc: String,
    dest_en: String,
    dest_tc: String,
    dest_sc: String,
}

impl RouteWire {
    fn localize(self, lang: Lang) -> BusRoute {
        let (origin, destination) = match lang {
            Lang::En => (self.orig_en, self.dest_en),
            Lang::Tc => (self.orig_tc, self.dest_tc),
            Lang::Sc => (self.orig_sc, self.dest_sc),
        };
        BusRoute {
            route: self.route,
            bound: Bound::from_code(&self.bound),
            service_type: self.service_type,
            origin,
            destination,
        }
    }
}
