//! FRED integration: one series, one date window, one HTTP round trip.
//!
//! Two endpoints are supported:
//!
//! - with `FRED_API_KEY` set, the JSON observations API
//! - without a key, the public `fredgraph.csv` download used by the FRED
//!   website's "Download CSV" button
//!
//! Both are normalized into a [`RawSeriesTable`] whose value column is named
//! after the series, with `"."` (FRED's missing-value marker) kept as `None`.

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::debug;

use crate::data::SeriesSource;
use crate::domain::{DateRange, RawSeriesTable, SeriesId};
use crate::error::AppError;

const API_URL: &str = "https://api.stlouisfed.org/fred/series/observations";
const GRAPH_CSV_URL: &str = "https://fred.stlouisfed.org/graph/fredgraph.csv";
const FRED_DATE_FORMAT: &str = "%Y-%m-%d";

/// Why a single fetch failed. Detailed for the log; the user only ever sees
/// the coarse "retrieval failed" message.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("FRED request failed: {0}")]
    Transport(reqwest::Error),
    #[error("FRED request failed with status {status}: {detail}")]
    Status { status: u16, detail: String },
    #[error("Failed to parse FRED response: {0}")]
    Malformed(String),
}

/// The request URL carries the API key as a query parameter, so it is
/// stripped before the error can reach a log line.
impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        FetchError::Transport(e.without_url())
    }
}

#[derive(Debug, Clone)]
enum Endpoint {
    Api { api_key: String },
    GraphCsv,
}

pub struct FredClient {
    client: Client,
    endpoint: Endpoint,
}

impl FredClient {
    /// Build a client. `timeout = None` waits indefinitely.
    pub fn new(api_key: Option<String>, timeout: Option<Duration>) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::new(2, format!("Failed to build HTTP client: {e}")))?;
        let endpoint = match api_key.filter(|k| !k.trim().is_empty()) {
            Some(api_key) => Endpoint::Api { api_key },
            None => Endpoint::GraphCsv,
        };
        Ok(Self { client, endpoint })
    }

    /// Build a client, reading an optional `FRED_API_KEY` from the
    /// environment (or `.env`).
    pub fn from_env(timeout: Option<Duration>) -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::new(std::env::var("FRED_API_KEY").ok(), timeout)
    }

    pub fn uses_api_key(&self) -> bool {
        matches!(self.endpoint, Endpoint::Api { .. })
    }

    fn fetch_api(&self, id: &SeriesId, range: DateRange, api_key: &str) -> Result<RawSeriesTable, FetchError> {
        let start = range.start.format(FRED_DATE_FORMAT).to_string();
        let end = range.end.format(FRED_DATE_FORMAT).to_string();
        let resp = self
            .client
            .get(API_URL)
            .query(&[
                ("series_id", id.as_str()),
                ("api_key", api_key),
                ("file_type", "json"),
                ("sort_order", "asc"),
                ("observation_start", start.as_str()),
                ("observation_end", end.as_str()),
            ])
            .send()?;

        let status = resp.status();
        let body = resp.text()?;
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                detail: api_error_message(&body),
            });
        }

        parse_observations_json(id, &body)
    }

    fn fetch_graph_csv(&self, id: &SeriesId, range: DateRange) -> Result<RawSeriesTable, FetchError> {
        let start = range.start.format(FRED_DATE_FORMAT).to_string();
        let end = range.end.format(FRED_DATE_FORMAT).to_string();
        let resp = self
            .client
            .get(GRAPH_CSV_URL)
            .query(&[("id", id.as_str()), ("cosd", start.as_str()), ("coed", end.as_str())])
            .send()?;

        let status = resp.status();
        let body = resp.text()?;
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                detail: body.lines().next().unwrap_or_default().to_string(),
            });
        }

        parse_graph_csv(&body, range)
    }
}

impl SeriesSource for FredClient {
    fn fetch(&self, id: &SeriesId, range: DateRange) -> Result<RawSeriesTable, FetchError> {
        debug!(series = %id, start = %range.start, end = %range.end, "requesting FRED series");
        match &self.endpoint {
            Endpoint::Api { api_key } => self.fetch_api(id, range, api_key),
            Endpoint::GraphCsv => self.fetch_graph_csv(id, range),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ObservationsResponse {
    observations: Vec<Observation>,
}

#[derive(Debug, Deserialize)]
struct Observation {
    date: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error_message: String,
}

fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error_message)
        .unwrap_or_else(|_| body.chars().take(200).collect())
}

/// Parse a JSON observations payload. The API already applies the window.
fn parse_observations_json(id: &SeriesId, body: &str) -> Result<RawSeriesTable, FetchError> {
    let parsed: ObservationsResponse =
        serde_json::from_str(body).map_err(|e| FetchError::Malformed(e.to_string()))?;

    let mut rows = Vec::with_capacity(parsed.observations.len());
    for obs in parsed.observations {
        rows.push((parse_fred_date(&obs.date)?, parse_value(&obs.value)));
    }
    Ok(RawSeriesTable::new(id.as_str(), rows))
}

/// Parse a `fredgraph.csv` download: a date column followed by one value
/// column named after the series.
///
/// The endpoint has been seen to ignore `cosd`/`coed`, so rows outside
/// `range` are dropped here as well.
fn parse_graph_csv(body: &str, range: DateRange) -> Result<RawSeriesTable, FetchError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| FetchError::Malformed(e.to_string()))?
        .clone();
    let date_header = headers.get(0).unwrap_or_default();
    let is_date_header =
        date_header.eq_ignore_ascii_case("date") || date_header.eq_ignore_ascii_case("observation_date");
    let column = match headers.get(1) {
        Some(column) if is_date_header && headers.len() == 2 => column.to_string(),
        _ => {
            return Err(FetchError::Malformed(format!(
                "unexpected CSV header '{}'",
                headers.iter().collect::<Vec<_>>().join(",")
            )));
        }
    };

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| FetchError::Malformed(e.to_string()))?;
        let date = parse_fred_date(record.get(0).unwrap_or_default())?;
        if !range.contains(date) {
            continue;
        }
        rows.push((date, record.get(1).and_then(parse_value)));
    }
    Ok(RawSeriesTable::new(column, rows))
}

fn parse_fred_date(raw: &str) -> Result<NaiveDate, FetchError> {
    NaiveDate::parse_from_str(raw.trim(), FRED_DATE_FORMAT)
        .map_err(|e| FetchError::Malformed(format!("invalid FRED date '{raw}': {e}")))
}

fn parse_value(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed == "." || trimmed.is_empty() {
        return None;
    }
    let v = trimmed.parse::<f64>().ok()?;
    if v.is_finite() {
        Some(v)
    } else {
        None
    }
}
