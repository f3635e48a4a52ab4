//! `lgrid enrich apollo`: people bulk match.

use serde_json::{json, Map, Value};

use leadgrid_config::keys::Provider;
use leadgrid_engine::RowSequence;

use super::{first_str, subjects_from_rows, AdapterError, AdapterRequest, EnrichmentAdapter, RequestBody, Subject};

// ── Constants ───────────────────────────────────────────────────────

const BULK_MATCH_PATH: &str =
    "/api/v1/people/bulk_match?reveal_personal_emails=false&reveal_phone_number=false";
pub const APOLLO_COLUMN: &str = "Apollo Email";

// ── Adapter ─────────────────────────────────────────────────────────

pub struct Apollo {
    base_url: String,
}

impl Apollo {
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

/// `{name, organization_name, linkedin_url}` with absent fields omitted.
fn detail(subject: &Subject) -> Value {
    let mut obj = Map::new();
    if let Some(name) = &subject.name {
        obj.insert("name".into(), json!(name));
    }
    if let Some(org) = &subject.organization {
        obj.insert("organization_name".into(), json!(org));
    }
    if let Some(url) = &subject.linkedin_url {
        obj.insert("linkedin_url".into(), json!(url));
    }
    Value::Object(obj)
}

/// Match list from either a bare array or `{"matches": [...]}`.
fn matches(body: &Value) -> &[Value] {
    body.as_array()
        .or_else(|| body["matches"].as_array())
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

impl EnrichmentAdapter for Apollo {
    fn provider(&self) -> Provider {
        Provider::Apollo
    }

    fn column(&self) -> &'static str {
        APOLLO_COLUMN
    }

    fn extract_subjects(&self, rows: &RowSequence) -> Vec<Subject> {
        subjects_from_rows(rows)
    }

    fn build_request(&self, subjects: &[Subject], _rows: &RowSequence, key: &str) -> AdapterRequest {
        let details: Vec<Value> = subjects.iter().map(detail).collect();
        AdapterRequest {
            url: format!("{}{}", self.base_url, BULK_MATCH_PATH),
            headers: vec![
                ("accept".into(), "application/json".into()),
                ("Cache-Control".into(), "no-cache".into()),
                ("Content-Type".into(), "application/json".into()),
                ("x-api-key".into(), key.to_string()),
            ],
            body: RequestBody::Json(json!({ "details": details })),
        }
    }

    fn parse_response(&self, body: &Value, subjects: &[Subject]) -> Result<Vec<Option<String>>, AdapterError> {
        if let Some(error) = first_str(body, &["error"]) {
            return Err(AdapterError::Api(error.to_string()));
        }

        let matches = matches(body);
        Ok((0..subjects.len())
            .map(|i| {
                matches
                    .get(i)
                    .and_then(|m| first_str(m, &["email"]))
                    .map(str::to_string)
            })
            .collect())
    }

    fn status_line(&self, _body: &Value, values: &[Option<String>]) -> String {
        let found: Vec<&str> = values.iter().flatten().map(String::as_str).collect();
        if found.is_empty() {
            "No emails found".to_string()
        } else {
            found.join(", ")
        }
    }
}
