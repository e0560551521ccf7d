//! Daily passenger traffic statistics from the Immigration Department CSV
//! feed: fetch, header-aware parse, date-range filter, newest-first sort.

use chrono::NaiveDate;
use csv::StringRecord;
use reqwest::Client;
use std::time::Instant;

use crate::core::error::FetchError;
use crate::domain::{DateRange, Direction, TrafficRecord, DATE_FMT};
use crate::infra::http::headers::add_standard_headers;
use crate::infra::runtime::limits::make_http_client;

pub const DEFAULT_BASE: &str = "https://www.immd.gov.hk";
const TRAFFIC_CSV_PATH: &str =
    "/opendata/eng/transport/immigration_clearance/statistics_on_daily_passenger_traffic.csv";

#[derive(Clone)]
pub struct PassengerTrafficClient {
    base: String,
    http: Client,
}

impl Default for PassengerTrafficClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE)
    }
}

impl PassengerTrafficClient {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            http: make_http_client(),
        }
    }

    /// Fetch rows within `[start_date, end_date]` (DD-MM-YYYY, both
    /// optional), sorted newest first. Omitting both bounds selects the last
    /// seven days including today. Never returns a partial list: one bad row
    /// fails the whole call.
    pub async fn fetch(
        &self,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Vec<TrafficRecord>, FetchError> {
        let range = DateRange::resolve(start_date, end_date, current_date())?;
        let url = format!("{}{}", self.base.trim_end_matches('/'), TRAFFIC_CSV_PATH);
        tracing::debug!(endpoint = %url, "passenger_traffic fetch");
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

        let records = parse_traffic_csv(&body)?;
        let elapsed_ms = started.elapsed().as_millis() as f64;
        crate::infra::logging::log_metric("get_passenger_stats", "remote_latency_ms", elapsed_ms);
        Ok(filter_and_sort(records, range))
    }
}

fn current_date() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Parse the full CSV body. The first header cell may carry a UTF-8 byte
/// order mark; columns are projected by name so the mark is stripped before
/// lookup.
pub fn parse_traffic_csv(body: &str) -> Result<Vec<TrafficRecord>, FetchError> {
    let text = body.strip_prefix('\u{feff}').unwrap_or(body);
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| FetchError::MalformedData(e.to_string()))?
        .clone();
    let columns = Columns::locate(&headers)?;

    let mut out = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| FetchError::MalformedData(e.to_string()))?;
        out.push(columns.project(&row)?);
    }
    Ok(out)
}

/// Keep rows inside the range, newest first. The sort is stable, so rows
/// sharing a date keep their source order.
pub fn filter_and_sort(records: Vec<TrafficRecord>, range: DateRange) -> Vec<TrafficRecord> {
    let mut kept: Vec<TrafficRecord> = records
        .into_iter()
        .filter(|r| range.contains(r.date))
        .collect();
    kept.sort_by(|a, b| b.date.cmp(&a.date));
    kept
}

/// Column indices resolved from the header row by name, not position.
struct Columns {
    date: usize,
    control_point: usize,
    direction: usize,
    hk_residents: usize,
    mainland_visitors: usize,
    other_visitors: usize,
    total: usize,
}

impl Columns {
    fn locate(headers: &StringRecord) -> Result<Self, FetchError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}') == name)
                .ok_or_else(|| FetchError::MalformedData(format!("missing column: {name}")))
        };
        Ok(Self {
            date: find("Date")?,
            control_point: find("Control Point")?,
            direction: find("Arrival / Departure")?,
            hk_residents: find("Hong Kong Residents")?,
            mainland_visitors: find("Mainland Visitors")?,
            other_visitors: find("Other Visitors")?,
            total: find("Total")?,
        })
    }

    fn project(&self, row: &StringRecord) -> Result<TrafficRecord, FetchError> {
        let field = |idx: usize| row.get(idx).unwrap_or("");
        let date = NaiveDate::parse_from_str(field(self.date), DATE_FMT).map_err(|_| {
            FetchError::MalformedData(format!(
                "bad date {:?} in column Date",
                field(self.date)
            ))
        })?;
        let direction = Direction::parse(field(self.direction)).ok_or_else(|| {
            FetchError::MalformedData(format!(
                "bad direction {:?} in column Arrival / Departure",
                field(self.direction)
            ))
        })?;
        Ok(TrafficRecord {
            date,
            control_point: field(self.control_point).to_string(),
            direction,
            hk_residents: parse_count(field(self.hk_residents), "Hong Kong Residents")?,
            mainland_visitors: parse_count(field(self.mainland_visitors), "Mainland Visitors")?,
            other_visitors: parse_count(field(self.other_visitors), "Other Visitors")?,
            total: parse_count(field(self.total), "Total")?,
        })
    }
}

fn parse_count(raw: &str, column: &str) -> Result<u64, FetchError> {
    raw.parse::<u64>().map_err(|_| {
        FetchError::MalformedData(format!("non-numeric value {raw:?} in column {column}"))
    })
}
