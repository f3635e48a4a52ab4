//! Shared HTTP client for the enrichment adapters.
//!
//! One request per adapter per run: no retries, no backoff. Status codes are
//! classified here so every adapter reports failures the same way:
//! - transport failure → [`AdapterError::Network`]
//! - non-2xx → [`AdapterError::Http`] with the provider's message if the
//!   body carries one
//! - 2xx with a body that is not JSON → [`AdapterError::Parse`]

use std::time::Duration;

use reqwest::blocking::multipart::{Form, Part};

use crate::exit_codes;
use crate::CliError;

use super::{AdapterError, AdapterRequest, RequestBody};

pub(crate) const USER_AGENT: &str = concat!("lgrid/", env!("CARGO_PKG_VERSION"));

pub struct EnrichClient {
    http: reqwest::blocking::Client,
}

impl EnrichClient {
    pub fn new(timeout_secs: u64) -> Result<Self, CliError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| CliError {
                code: exit_codes::EXIT_ERROR,
                message: format!("failed to build HTTP client: {}", e),
                hint: None,
            })?;
        Ok(Self { http })
    }

    /// Send `request` and return the parsed JSON body.
    pub fn send(&self, request: &AdapterRequest) -> Result<serde_json::Value, AdapterError> {
        let mut builder = self.http.post(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder = match &request.body {
            RequestBody::Json(value) => builder.body(value.to_string()),
            RequestBody::Multipart(multipart) => {
                let file = Part::text(multipart.file_contents.clone())
                    .file_name(multipart.file_name.clone())
                    .mime_str(&multipart.file_mime)
                    .map_err(|e| AdapterError::Network(e.to_string()))?;
                let mut form = Form::new().part(multipart.file_field.clone(), file);
                for (name, value) in &multipart.fields {
                    form = form.text(name.clone(), value.clone());
                }
                builder.multipart(form)
            }
        };

        let resp = builder
            .send()
            .map_err(|e| AdapterError::Network(e.to_string()))?;
        let status = resp.status().as_u16();
        let text = resp
            .text()
            .map_err(|e| AdapterError::Network(format!("failed to read response body: {}", e)))?;

        classify(status, &text)
    }
}

/// Map a status code and raw body to the adapter result.
pub(crate) fn classify(status: u16, text: &str) -> Result<serde_json::Value, AdapterError> {
    let trimmed = text.trim_start_matches('\u{feff}');
    let parsed: Result<serde_json::Value, _> = serde_json::from_str(trimmed);

    if !(200..300).contains(&status) {
        let msg = match &parsed {
            Ok(body) => extract_error(body, status),
            Err(_) if !trimmed.trim().is_empty() => truncate(trimmed.trim(), 200),
            Err(_) => format!("HTTP {}", status),
        };
        return Err(AdapterError::Http(status, msg));
    }

    parsed.map_err(|e| {
        AdapterError::Parse(format!(
            "{} (body: {})",
            e,
            truncate(trimmed, 200)
        ))
    })
}

/// Best-effort message from a provider error body.
pub(crate) fn extract_error(body: &serde_json::Value, status: u16) -> String {
    super::first_str(body, &["error_message", "message", "error"])
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status))
}

fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

/// Exit code for a failed adapter run.
pub fn exit_code_for(err: &AdapterError) -> u8 {
    match err {
        AdapterError::MissingKey => exit_codes::EXIT_ENRICH_NOT_AUTH,
        AdapterError::Http(401, _) | AdapterError::Http(403, _) => exit_codes::EXIT_ENRICH_AUTH,
        AdapterError::Http(400, _) | AdapterError::Http(422, _) => exit_codes::EXIT_ENRICH_VALIDATION,
        AdapterError::Http(..)
        | AdapterError::Network(_)
        | AdapterError::Parse(_)
        | AdapterError::Api(_) => exit_codes::EXIT_ENRICH_UPSTREAM,
    }
}
