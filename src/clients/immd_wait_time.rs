//! Land boundary control point waiting times from the Immigration Department
//! queue-status JSON feed.

use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::LazyLock;
use std::time::Instant;

use crate::core::error::FetchError;
use crate::domain::{ControlPointStatus, WaitTimeReport};
use crate::infra::http::headers::add_standard_headers;
use crate::infra::runtime::limits::make_http_client;

pub const DEFAULT_BASE: &str = "https://secure1.info.gov.hk";
const QUEUE_TIME_PATH: &str = "/immd/mobileapps/2bb9ae17/data/CPQueueTimeR.json";

/// Land boundary control points, in presentation order. Output iterates this
/// catalog, never the upstream map, so ordering is deterministic.
const CONTROL_POINTS: [(&str, &str); 8] = [
    ("HYW", "Heung Yuen Wai"),
    ("HZM", "Hong Kong-Zhuhai-Macao Bridge"),
    ("LMC", "Lok Ma Chau"),
    ("LSC", "Lok Ma Chau Spur Line"),
    ("LWS", "Lo Wu"),
    ("MKT", "Man Kam To"),
    ("SBC", "Shenzhen Bay"),
    ("STK", "Sha Tau Kok"),
];

static STATUS_TEXT: LazyLock<HashMap<i64, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        (0, "Normal (Generally less than 15 mins)"),
        (1, "Busy (Generally less than 30 mins)"),
        (2, "Very Busy (Generally 30 mins or above)"),
        (4, "System Under Maintenance"),
        (99, "Non Service Hours"),
    ])
});

const NO_DATA: &str = "Data not available";

fn status_text(code: i64) -> &'static str {
    STATUS_TEXT.get(&code).copied().unwrap_or("Unknown")
}

/// Queue codes for one control point. A missing field reads as 99
/// (non service hours), matching the feed's own mobile client.
#[derive(Deserialize)]
struct QueueWire {
    #[serde(rename = "arrQueue", default = "non_service")]
    arr_queue: i64,
    #[serde(rename = "depQueue", default = "non_service")]
    dep_queue: i64,
}

fn non_service() -> i64 {
    99
}

#[derive(Clone)]
pub struct WaitTimeClient {
    base: String,
    http: Client,
}

impl Default for WaitTimeClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE)
    }
}

impl WaitTimeClient {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            http: make_http_client(),
        }
    }

    /// Fetch current waiting times. `lang` is not validated; it is carried
    /// through upper-cased for display only. Failures here are a single
    /// undifferentiated kind carrying the message text.
    pub async fn fetch(&self, lang: &str) -> Result<WaitTimeReport, FetchError> {
        let url = format!("{}{}", self.base.trim_end_matches('/'), QUEUE_TIME_PATH);
        tracing::debug!(endpoint = %url, "wait_times fetch");
        let started = Instant::now();

        let (builder, _rid) = add_standard_headers(self.http.get(url), None);
        let resp = builder
            .send()
            .await
            .map_err(|e| FetchError::Other(e.to_string()))?
            .error_for_status()
            .map_err(|e| FetchError::Other(e.to_string()))?;
        let statuses: HashMap<String, QueueWire> = resp
            .json()
            .await
            .map_err(|e| FetchError::Other(e.to_string()))?;

        let elapsed_ms = started.elapsed().as_millis() as f64;
        crate::infra::logging::log_metric(
            "get_land_boundary_wait_times",
            "remote_latency_ms",
            elapsed_ms,
        );
        Ok(build_report(&statuses, lang))
    }
}

fn build_report(statuses: &HashMap<String, QueueWire>, lang: &str) -> WaitTimeReport {
    let control_points = CONTROL_POINTS
        .iter()
        .map(|&(code, name)| match statuses.get(code) {
            Some(q) => ControlPointStatus {
                name: name.into(),
                code: code.into(),
                arrival: status_text(q.arr_queue).into(),
                departure: status_text(q.dep_queue).into(),
            },
            None => ControlPointStatus {
                name: name.into(),
                code: code.into(),
                arrival: NO_DATA.into(),
                departure: NO_DATA.into(),
            },
        })
        .collect();
    WaitTimeReport {
        language: lang.to_uppercase(),
        control_points,
    }
}
