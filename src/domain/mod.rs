//! Domain model for the three transport-data fetchers: typed records, the
//! date-range filter, and the uniform result envelope every tool returns.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::error::FetchError;

/// Wire date format used by the Immigration Department CSV and by callers.
pub const DATE_FMT: &str = "%d-%m-%Y";

/// Serde adapter keeping `NaiveDate` in DD-MM-YYYY on the wire.
pub mod ddmmyyyy {
    use chrono::NaiveDate;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&date.format(super::DATE_FMT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<NaiveDate, D::Error> {
        let s = String::deserialize(de)?;
        NaiveDate::parse_from_str(&s, super::DATE_FMT).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Arrival,
    Departure,
}

impl Direction {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Arrival" => Some(Direction::Arrival),
            "Departure" => Some(Direction::Departure),
            _ => None,
        }
    }
}

/// One CSV row of daily passenger traffic at a control point, produced fresh
/// per call; counts are non-negative by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficRecord {
    #[serde(with = "ddmmyyyy")]
    pub date: NaiveDate,
    pub control_point: String,
    pub direction: Direction,
    pub hk_residents: u64,
    pub mainland_visitors: u64,
    pub other_visitors: u64,
    pub total: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bound {
    Outbound,
    Inbound,
}

impl Bound {
    /// Single-letter wire code from the etabus API. Upstream emits `O`/`I`;
    /// anything that is not `O` reads as inbound, matching the source feed's
    /// established interpretation.
    pub fn from_code(code: &str) -> Self {
        if code == "O" {
            Bound::Outbound
        } else {
            Bound::Inbound
        }
    }
}

/// Supported response languages for the bus route catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lang {
    #[default]
    En,
    Tc,
    Sc,
}

impl Lang {
    /// Unrecognized codes coerce to English rather than erroring.
    pub fn from_code(code: &str) -> Self {
        match code {
            "tc" => Lang::Tc,
            "sc" => Lang::Sc,
            _ => Lang::En,
        }
    }
}

/// One KMB/LWB route, with origin/destination localized to the requested
/// language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusRoute {
    pub route: String,
    pub bound: Bound,
    pub service_type: String,
    pub origin: String,
    pub destination: String,
}

/// Queue status of one land boundary control point, both directions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlPointStatus {
    pub name: String,
    pub code: String,
    pub arrival: String,
    pub departure: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitTimeReport {
    pub language: String,
    pub control_points: Vec<ControlPointStatus>,
}

/// Inclusive calendar-date filter; an open bound means unbounded on that
/// side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// Resolve optional DD-MM-YYYY bounds. Both absent means the last seven
    /// days ending at `today`, inclusive on both ends.
    pub fn resolve(
        start: Option<&str>,
        end: Option<&str>,
        today: NaiveDate,
    ) -> Result<Self, FetchError> {
        if start.is_none() && end.is_none() {
            return Ok(Self {
                start: Some(today - chrono::Duration::days(6)),
                end: Some(today),
            });
        }
        let start = start
            .map(|s| {
                NaiveDate::parse_from_str(s, DATE_FMT)
                    .map_err(|_| FetchError::InvalidDateFormat("start_date"))
            })
            .transpose()?;
        let end = end
            .map(|s| {
                NaiveDate::parse_from_str(s, DATE_FMT)
                    .map_err(|_| FetchError::InvalidDateFormat("end_date"))
            })
            .transpose()?;
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        if let Some(start) = self.start {
            if date < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if date > end {
                return false;
            }
        }
        true
    }
}

/// Uniform result envelope returned by every tool: a payload tagged with its
/// kind, or `{"type":"Error","error":...}`. Errors travel as data; the tool
/// dispatcher always receives a well-formed envelope.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum Envelope {
    PassengerStats { data: Vec<TrafficRecord> },
    RouteList { data: Vec<BusRoute> },
    WaitTimes { data: WaitTimeReport },
    Error { error: String },
}

impl From<FetchError> for Envelope {
    fn from(e: FetchError) -> Self {
        Envelope::Error { error: e.to_string() }
    }
}

impl Envelope {
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_else(|e| {
            serde_json::json!({ "type": "Error", "error": e.to_string() })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FMT).unwrap()
    }

    #[test]
    fn default_range_is_the_last_seven_days() {
        let today = date("08-01-2021");
        let range = DateRange::resolve(None, None, today).unwrap();
        assert_eq!(range.start, Some(date("02-01-2021")));
        assert_eq!(range.end, Some(today));
        assert!(range.contains(date("02-01-2021")));
        assert!(range.contains(today));
        assert!(!range.contains(date("01-01-2021")));
    }

    #[test]
    fn explicit_bounds_are_inclusive_and_may_be_open() {
        let today = date("08-01-2021");
        let range = DateRange::resolve(Some("03-01-2021"), None, today).unwrap();
        assert!(range.contains(date("03-01-2021")));
        assert!(range.contains(date("25-12-2030")));
        assert!(!range.contains(date("02-01-2021")));
    }

    #[test]
    fn bad_date_strings_name_the_field() {
        let today = date("08-01-2021");
        let err = DateRange::resolve(Some("2021-01-03"), None, today).unwrap_err();
        assert!(err.to_string().contains("start_date"));
        let err = DateRange::resolve(None, Some("31-31-2021"), today).unwrap_err();
        assert!(err.to_string().contains("end_date"));
    }

    #[test]
    fn traffic_record_serializes_dates_as_ddmmyyyy() {
        let rec = TrafficRecord {
            date: date("08-01-2021"),
            control_point: "Airport".into(),
            direction: Direction::Arrival,
            hk_residents: 650,
            mainland_visitors: 12,
            other_visitors: 22,
            total: 684,
        };
        let v = serde_json::to_value(&rec).unwrap();
        assert_eq!(v["date"], "08-01-2021");
        assert_eq!(v["direction"], "Arrival");
        let back: TrafficRecord = serde_json::from_value(v).unwrap();
        assert_eq!(back, rec);
    }

    #[test]
    fn lang_coerces_unknown_codes_to_english() {
        assert_eq!(Lang::from_code("tc"), Lang::Tc);
        assert_eq!(Lang::from_code("sc"), Lang::Sc);
        assert_eq!(Lang::from_code("en"), Lang::En);
        assert_eq!(Lang::from_code("fr"), Lang::En);
        assert_eq!(Lang::from_code(""), Lang::En);
    }

    #[test]
    fn bound_maps_o_to_outbound_and_everything_else_inbound() {
        assert_eq!(Bound::from_code("O"), Bound::Outbound);
        assert_eq!(Bound::from_code("I"), Bound::Inbound);
        assert_eq!(Bound::from_code("X"), Bound::Inbound);
    }

    #[test]
    fn envelope_tags_success_and_error_shapes() {
        let ok = Envelope::RouteList { data: vec![] }.to_value();
        assert_eq!(ok, json!({"type": "RouteList", "data": []}));

        let err = Envelope::from(FetchError::SourceUnavailable("refused".into())).to_value();
        assert_eq!(err["type"], "Error");
        assert_eq!(err["error"], "Connection error: refused");
    }
}
