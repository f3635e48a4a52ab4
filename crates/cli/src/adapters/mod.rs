//! Enrichment adapters: turn table rows into one provider request and the
//! provider's response back into one email per data row.
//!
//! Each adapter is split into pure steps so they can be tested without a
//! network:
//! - `extract_subjects` picks the people to look up (header search on
//!   `name` / `organization` / `linkedin`, case-insensitive)
//! - `build_request` produces the exact URL, headers and body
//! - `parse_response` maps the JSON body back onto the subjects
//!
//! [`run`] glues those to [`EnrichClient`](common::EnrichClient) and spreads
//! the per-subject results over the table's data rows.

pub mod apollo;
pub mod common;
pub mod contactout;
pub mod zerobounce;

use std::fmt;

use leadgrid_config::keys::Provider;
use leadgrid_engine::header::field_at;
use leadgrid_engine::{find_column_containing, RowSequence};

use common::EnrichClient;

// ── Subjects ────────────────────────────────────────────────────────

/// One person to look up, taken from a data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    /// Zero-based data row index (header excluded).
    pub row: usize,
    pub name: Option<String>,
    pub organization: Option<String>,
    pub linkedin_url: Option<String>,
}

/// Tried in order; the first header hit wins.
const ORGANIZATION_NEEDLES: [&str; 3] = ["organization", "company", "org"];

/// Column positions found by header search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubjectColumns {
    pub name: Option<usize>,
    pub organization: Option<usize>,
    pub linkedin: Option<usize>,
}

impl SubjectColumns {
    pub fn locate(rows: &RowSequence) -> Self {
        let header = rows.header();
        Self {
            name: find_column_containing(&header, "name"),
            organization: ORGANIZATION_NEEDLES
                .iter()
                .find_map(|needle| find_column_containing(&header, needle)),
            linkedin: find_column_containing(&header, "linkedin"),
        }
    }
}

/// One subject per data row. Empty or missing fields become `None`.
pub fn subjects_from_rows(rows: &RowSequence) -> Vec<Subject> {
    let columns = SubjectColumns::locate(rows);
    let pick = |row: &str, index: Option<usize>| {
        index
            .and_then(|i| field_at(row, i))
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    rows.data_rows()
        .iter()
        .enumerate()
        .map(|(i, row)| Subject {
            row: i,
            name: pick(row, columns.name),
            organization: pick(row, columns.organization),
            linkedin_url: pick(row, columns.linkedin),
        })
        .collect()
}

// ── Requests ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    Json(serde_json::Value),
    Multipart(MultipartBody),
}

/// Form upload: one file part plus text fields, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartBody {
    pub file_field: String,
    pub file_name: String,
    pub file_mime: String,
    pub file_contents: String,
    pub fields: Vec<(String, String)>,
}

/// A fully described POST request. Building one never touches the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

// ── Errors ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
    /// No key from flag, environment or keys.json.
    MissingKey,
    /// Transport failure (connect, timeout, TLS).
    Network(String),
    /// Non-2xx response.
    Http(u16, String),
    /// Body is not JSON.
    Parse(String),
    /// 2xx response that reports an error in its body.
    Api(String),
}

impl fmt::Display for AdapterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdapterError::MissingKey => write!(f, "missing API key"),
            AdapterError::Network(msg) => write!(f, "network error: {}", msg),
            AdapterError::Http(status, msg) => write!(f, "HTTP {}: {}", status, msg),
            AdapterError::Parse(msg) => write!(f, "invalid response: {}", msg),
            AdapterError::Api(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for AdapterError {}

// ── Adapter trait ───────────────────────────────────────────────────

pub trait EnrichmentAdapter: Sync {
    fn provider(&self) -> Provider;

    /// Header written for this adapter's results.
    fn column(&self) -> &'static str;

    fn extract_subjects(&self, rows: &RowSequence) -> Vec<Subject>;

    fn build_request(&self, subjects: &[Subject], rows: &RowSequence, key: &str) -> AdapterRequest;

    /// One entry per subject, in subject order.
    fn parse_response(
        &self,
        body: &serde_json::Value,
        subjects: &[Subject],
    ) -> Result<Vec<Option<String>>, AdapterError>;

    /// Status line for a successful call.
    fn status_line(&self, body: &serde_json::Value, values: &[Option<String>]) -> String;
}

/// Result of one successful adapter run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentOutcome {
    pub column: &'static str,
    /// One entry per data row.
    pub values: Vec<Option<String>>,
    pub status: String,
}

/// Extract, send, parse. Does not merge.
pub fn run(
    adapter: &dyn EnrichmentAdapter,
    client: &EnrichClient,
    rows: &RowSequence,
    key: Option<&str>,
) -> Result<EnrichmentOutcome, AdapterError> {
    let key = key.ok_or(AdapterError::MissingKey)?;
    let subjects = adapter.extract_subjects(rows);
    tracing::debug!(
        provider = adapter.provider().display_name(),
        subjects = subjects.len(),
        data_rows = rows.data_rows().len(),
        "subjects extracted"
    );

    let request = adapter.build_request(&subjects, rows, key);
    let body = client.send(&request)?;
    let found = adapter.parse_response(&body, &subjects)?;
    let status = adapter.status_line(&body, &found);

    Ok(EnrichmentOutcome {
        column: adapter.column(),
        values: spread(&subjects, found, rows.data_rows().len()),
        status,
    })
}

/// Place per-subject values at their data row; rows without a subject stay `None`.
pub fn spread(subjects: &[Subject], found: Vec<Option<String>>, data_len: usize) -> Vec<Option<String>> {
    let mut values = vec![None; data_len];
    for (subject, value) in subjects.iter().zip(found) {
        if let Some(slot) = values.get_mut(subject.row) {
            *slot = value.filter(|v| !v.trim().is_empty());
        }
    }
    values
}

/// First non-empty string found at any of `keys`.
pub(crate) fn first_str<'a>(value: &'a serde_json::Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|k| value.get(*k).and_then(|v| v.as_str()))
        .map(str::trim)
        .find(|s| !s.is_empty())
}
