//! `lgrid enrich zerobounce`: email finder bulk file upload.
//!
//! The whole table goes up as `contacts.csv`. ZeroBounce either queues the
//! file (`{"success": true, "file_id": ...}`, nothing to merge yet) or
//! answers inline with one result per data row.

use serde_json::Value;

use leadgrid_config::keys::Provider;
use leadgrid_engine::RowSequence;

use super::{
    first_str, subjects_from_rows, AdapterError, AdapterRequest, EnrichmentAdapter, MultipartBody,
    RequestBody, Subject, SubjectColumns,
};

const SENDFILE_PATH: &str = "/email-finder/sendfile";
pub const ZEROBOUNCE_COLUMN: &str = "ZeroBounce Email";
const UPLOAD_FILE_NAME: &str = "contacts.csv";

pub struct ZeroBounce {
    base_url: String,
}

impl ZeroBounce {
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

/// Queued upload id, when the body reports one.
fn queued_file_id(body: &Value) -> Option<String> {
    if body["success"].as_bool() != Some(true) {
        return None;
    }
    match &body["file_id"] {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl EnrichmentAdapter for ZeroBounce {
    fn provider(&self) -> Provider {
        Provider::ZeroBounce
    }

    fn column(&self) -> &'static str {
        ZEROBOUNCE_COLUMN
    }

    fn extract_subjects(&self, rows: &RowSequence) -> Vec<Subject> {
        subjects_from_rows(rows)
    }

    fn build_request(&self, _subjects: &[Subject], rows: &RowSequence, key: &str) -> AdapterRequest {
        let columns = SubjectColumns::locate(rows);
        let mut fields = vec![("api_key".to_string(), key.to_string())];
        // Column numbers are 1-based on the ZeroBounce side.
        if let Some(i) = columns.organization {
            fields.push(("domain_column".into(), (i + 1).to_string()));
        } else {
            tracing::warn!(provider = "ZeroBounce", "no organization column; domain_column not sent");
        }
        if let Some(i) = columns.name {
            fields.push(("full_name_column".into(), (i + 1).to_string()));
        } else {
            tracing::warn!(provider = "ZeroBounce", "no name column; full_name_column not sent");
        }
        fields.push(("has_header_row".into(), "true".into()));

        AdapterRequest {
            url: format!("{}{}", self.base_url, SENDFILE_PATH),
            headers: Vec::new(),
            body: RequestBody::Multipart(MultipartBody {
                file_field: "file".into(),
                file_name: UPLOAD_FILE_NAME.into(),
                file_mime: "text/csv".into(),
                file_contents: rows.to_csv_string(),
                fields,
            }),
        }
    }

    fn parse_response(&self, body: &Value, subjects: &[Subject]) -> Result<Vec<Option<String>>, AdapterError> {
        if body["success"].as_bool() == Some(false) {
            let msg = first_str(body, &["error_message", "message"]).unwrap_or("ZeroBounce request failed");
            return Err(AdapterError::Api(msg.to_string()));
        }

        let results = body["results"].as_array().map(Vec::as_slice).unwrap_or(&[]);
        Ok((0..subjects.len())
            .map(|i| {
                results
                    .get(i)
                    .and_then(|r| first_str(r, &["email", "address"]))
                    .map(str::to_string)
            })
            .collect())
    }

    fn status_line(&self, body: &Value, values: &[Option<String>]) -> String {
        if let Some(file_id) = queued_file_id(body) {
            return format!("ZeroBounce file queued (file_id: {})", file_id);
        }
        let found = values.iter().flatten().count();
        format!("ZeroBounce found {} of {} emails", found, values.len())
    }
}
