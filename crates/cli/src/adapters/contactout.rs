//! `lgrid enrich contactout`: LinkedIn batch lookup.
//!
//! Only rows with a LinkedIn URL are sent. The batch endpoint has been seen
//! answering in two shapes, selected by `contactout.responseShape`:
//!
//! ```text
//! profile_map:  {"profiles": {"<url>": ["first@x.io", "second@x.io"]}}
//! result_list:  {"results": [{"email": "..."} | {"emails": ["..."]}, ...]}
//! ```
//!
//! `auto` picks whichever key the body carries.

use serde_json::{json, Value};

use leadgrid_config::keys::Provider;
use leadgrid_config::settings::ResponseShape;
use leadgrid_engine::RowSequence;

use super::{first_str, subjects_from_rows, AdapterError, AdapterRequest, EnrichmentAdapter, RequestBody, Subject};

const BATCH_PATH: &str = "/v1/people/linkedin/batch";
pub const CONTACTOUT_COLUMN: &str = "ContactOut Email";

pub struct ContactOut {
    base_url: String,
    shape: ResponseShape,
}

impl ContactOut {
    pub fn with_base_url(base_url: String, shape: ResponseShape) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            shape,
        }
    }

    /// Shape to read `body` with, resolving `Auto`.
    fn effective_shape(&self, body: &Value) -> Option<ResponseShape> {
        match self.shape {
            ResponseShape::Auto => {
                if body["profiles"].is_object() {
                    Some(ResponseShape::ProfileMap)
                } else if body["results"].is_array() {
                    Some(ResponseShape::ResultList)
                } else {
                    None
                }
            }
            shape => Some(shape),
        }
    }
}

/// First non-empty email in a profile entry: a list of strings, or a bare string.
fn first_email(entry: &Value) -> Option<String> {
    match entry {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .find(|s| !s.is_empty())
            .map(str::to_string),
        _ => None,
    }
}

impl EnrichmentAdapter for ContactOut {
    fn provider(&self) -> Provider {
        Provider::ContactOut
    }

    fn column(&self) -> &'static str {
        CONTACTOUT_COLUMN
    }

    fn extract_subjects(&self, rows: &RowSequence) -> Vec<Subject> {
        subjects_from_rows(rows)
            .into_iter()
            .filter(|s| s.linkedin_url.is_some())
            .collect()
    }

    fn build_request(&self, subjects: &[Subject], _rows: &RowSequence, key: &str) -> AdapterRequest {
        let profiles: Vec<&str> = subjects
            .iter()
            .filter_map(|s| s.linkedin_url.as_deref())
            .collect();
        AdapterRequest {
            url: format!("{}{}", self.base_url, BATCH_PATH),
            headers: vec![
                ("Content-Type".into(), "application/json".into()),
                ("Accept".into(), "application/json".into()),
                ("token".into(), key.to_string()),
            ],
            body: RequestBody::Json(json!({ "profiles": profiles })),
        }
    }

    fn parse_response(&self, body: &Value, subjects: &[Subject]) -> Result<Vec<Option<String>>, AdapterError> {
        let values = match self.effective_shape(body) {
            Some(ResponseShape::ProfileMap) => {
                let profiles = &body["profiles"];
                subjects
                    .iter()
                    .map(|s| {
                        s.linkedin_url
                            .as_deref()
                            .and_then(|url| profiles.get(url))
                            .and_then(first_email)
                    })
                    .collect()
            }
            Some(ResponseShape::ResultList) => {
                let results = body["results"].as_array().map(Vec::as_slice).unwrap_or(&[]);
                (0..subjects.len())
                    .map(|i| {
                        results.get(i).and_then(|r| {
                            first_str(r, &["email"])
                                .map(str::to_string)
                                .or_else(|| first_email(&r["emails"]))
                        })
                    })
                    .collect()
            }
            _ => vec![None; subjects.len()],
        };
        Ok(values)
    }

    fn status_line(&self, body: &Value, _values: &[Option<String>]) -> String {
        first_str(body, &["message"])
            .unwrap_or("ContactOut request completed")
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{common::EnrichClient, run};
    use httpmock::prelude::*;
    use leadgrid_config::settings::CONTACTOUT_API_BASE;
    use leadgrid_engine::parse;

    fn sample_rows() -> RowSequence {
        parse(
            "Name,LinkedIn URL\n\
             Ana,https://linkedin.com/in/ana\n\
             Bo,\n\
             Cy,https://linkedin.com/in/cy",
        )
    }

    #[test]
    fn only_rows_with_urls_are_sent() {
        let co = ContactOut::with_base_url(CONTACTOUT_API_BASE.to_string(), ResponseShape::Auto);
        let rows = sample_rows();
        let subjects = co.extract_subjects(&rows);
        assert_eq!(subjects.iter().map(|s| s.row).collect::<Vec<_>>(), vec![0, 2]);

        let req = co.build_request(&subjects, &rows, "co_key");
        assert_eq!(req.url, "https://api.contactout.com/v1/people/linkedin/batch");
        assert!(req.headers.contains(&("token".into(), "co_key".into())));
        assert_eq!(
            req.body,
            RequestBody::Json(json!({
                "profiles": ["https://linkedin.com/in/ana", "https://linkedin.com/in/cy"]
            }))
        );
    }

    #[test]
    fn profile_map_first_email_wins() {
        let co = ContactOut::with_base_url(CONTACTOUT_API_BASE.to_string(), ResponseShape::ProfileMap);
        let subjects = co.extract_subjects(&sample_rows());
        let body = json!({
            "profiles": {
                "https://linkedin.com/in/cy": ["cy@work.io", "cy@home.io"],
                "https://linkedin.com/in/ana": []
            }
        });
        assert_eq!(
            co.parse_response(&body, &subjects).unwrap(),
            vec![None, Some("cy@work.io".to_string())]
        );
    }

    #[test]
    fn result_list_is_aligned_with_subjects() {
        let co = ContactOut::with_base_url(CONTACTOUT_API_BASE.to_string(), ResponseShape::ResultList);
        let subjects = co.extract_subjects(&sample_rows());
        let body = json!({
            "results": [{"emails": ["ana@x.io"]}, {"email": "cy@x.io"}]
        });
        assert_eq!(
            co.parse_response(&body, &subjects).unwrap(),
            vec![Some("ana@x.io".to_string()), Some("cy@x.io".to_string())]
        );
    }

    #[test]
    fn auto_detects_shape() {
        let co = ContactOut::with_base_url(CONTACTOUT_API_BASE.to_string(), ResponseShape::Auto);
        let subjects = co.extract_subjects(&sample_rows());

        let list = json!({"results": [{"email": "ana@x.io"}]});
        assert_eq!(
            co.parse_response(&list, &subjects).unwrap(),
            vec![Some("ana@x.io".to_string()), None]
        );

        let map = json!({"profiles": {"https://linkedin.com/in/ana": ["ana@x.io"]}});
        assert_eq!(
            co.parse_response(&map, &subjects).unwrap(),
            vec![Some("ana@x.io".to_string()), None]
        );

        let neither = json!({"status_code": 200});
        assert_eq!(co.parse_response(&neither, &subjects).unwrap(), vec![None, None]);
    }

    #[test]
    fn configured_shape_ignores_the_other_key() {
        let co = ContactOut::with_base_url(CONTACTOUT_API_BASE.to_string(), ResponseShape::ProfileMap);
        let subjects = co.extract_subjects(&sample_rows());
        let list = json!({"results": [{"email": "ana@x.io"}]});
        assert_eq!(co.parse_response(&list, &subjects).unwrap(), vec![None, None]);
    }

    #[test]
    fn status_line_prefers_message() {
        let co = ContactOut::with_base_url(CONTACTOUT_API_BASE.to_string(), ResponseShape::Auto);
        assert_eq!(co.status_line(&json!({"message": "2 profiles found"}), &[]), "2 profiles found");
        assert_eq!(co.status_line(&json!({}), &[]), "ContactOut request completed");
    }

    // ── httpmock tests ──────────────────────────────────────────────

    #[test]
    fn run_spreads_results_over_data_rows() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1/people/linkedin/batch")
                .header("token", "co_test")
                .json_body(json!({
                    "profiles": ["https://linkedin.com/in/ana", "https://linkedin.com/in/cy"]
                }));
            then.status(200).json_body(json!({
                "profiles": {"https://linkedin.com/in/cy": ["cy@x.io"]}
            }));
        });

        let co = ContactOut::with_base_url(server.base_url(), ResponseShape::Auto);
        let client = EnrichClient::new(5).unwrap();
        let outcome = run(&co, &client, &sample_rows(), Some("co_test")).unwrap();

        mock.assert();
        assert_eq!(outcome.values, vec![None, None, Some("cy@x.io".to_string())]);
        assert_eq!(outcome.status, "ContactOut request completed");
    }

    #[test]
    fn server_error_is_http_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/people/linkedin/batch");
            then.status(503).body("Service Unavailable");
        });

        let co = ContactOut::with_base_url(server.base_url(), ResponseShape::Auto);
        let client = EnrichClient::new(5).unwrap();
        let err = run(&co, &client, &sample_rows(), Some("co_test")).unwrap_err();
        assert_eq!(err, AdapterError::Http(503, "Service Unavailable".into()));
    }
}
