// Application settings
// Loaded from <config dir>/settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use leadgrid_engine::MergeStrategy;

pub const SETTINGS_FILE: &str = "settings.json";

pub const APOLLO_API_BASE: &str = "https://api.apollo.io";
pub const CONTACTOUT_API_BASE: &str = "https://api.contactout.com";
pub const ZEROBOUNCE_API_BASE: &str = "https://bulkapi.zerobounce.net";

/// How ContactOut batch responses are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseShape {
    /// Decide per response: `profiles` map if present, else `results` list
    #[default]
    Auto,
    /// `{"profiles": {"<url>": ["email", ...]}}`
    ProfileMap,
    /// `{"results": [{"email": ...} | {"emails": [...]}, ...]}`
    ResultList,
}

/// Merge strategy selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeMode {
    /// Write at the reconciled header index (default)
    #[default]
    Reconciled,
    /// Fixed-width layout: append below threshold, else overwrite slot
    Legacy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Endpoints
    #[serde(rename = "apollo.baseUrl")]
    pub apollo_base_url: String,

    #[serde(rename = "contactout.baseUrl")]
    pub contactout_base_url: String,

    #[serde(rename = "contactout.responseShape")]
    pub contactout_response_shape: ResponseShape,

    #[serde(rename = "zerobounce.baseUrl")]
    pub zerobounce_base_url: String,

    // Merge
    #[serde(rename = "merge.strategy")]
    pub merge_mode: MergeMode,

    #[serde(rename = "merge.legacyThreshold")]
    pub legacy_threshold: usize,

    #[serde(rename = "merge.legacySlot")]
    pub legacy_slot: usize,

    // HTTP
    #[serde(rename = "http.timeoutSecs")]
    pub timeout_secs: u64,

    // Output
    #[serde(rename = "export.fileName")]
    pub export_file_name: String,

    #[serde(rename = "render.maxColumnWidth")]
    pub max_column_width: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            apollo_base_url: APOLLO_API_BASE.to_string(),
            contactout_base_url: CONTACTOUT_API_BASE.to_string(),
            contactout_response_shape: ResponseShape::Auto,
            zerobounce_base_url: ZEROBOUNCE_API_BASE.to_string(),
            merge_mode: MergeMode::Reconciled,
            legacy_threshold: 5,
            legacy_slot: 4,
            timeout_secs: 30,
            export_file_name: "enriched_data.csv".to_string(),
            max_column_width: 40,
        }
    }
}

impl Settings {
    /// Get the settings file path inside `dir`
    pub fn config_path(dir: &Path) -> PathBuf {
        dir.join(SETTINGS_FILE)
    }

    /// Load settings from `dir`, falling back to defaults.
    /// A missing file is created with commented defaults.
    pub fn load(dir: &Path) -> Self {
        let path = Self::config_path(dir);

        if !path.exists() {
            let settings = Self::default();
            settings.create_default_file(dir);
            return settings;
        }

        match fs::read_to_string(&path) {
            Ok(contents) => Self::parse(&contents).unwrap_or_else(|e| {
                log::warn!("error parsing {}: {}; using default settings", path.display(), e);
                Self::default()
            }),
            Err(e) => {
                log::warn!("error reading {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parse settings JSON, ignoring `//` comment lines.
    pub fn parse(contents: &str) -> Result<Self, String> {
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");

        serde_json::from_str(&cleaned).map_err(|e| e.to_string())
    }

    /// The merge strategy these settings select.
    pub fn merge_strategy(&self) -> MergeStrategy {
        match self.merge_mode {
            MergeMode::Reconciled => MergeStrategy::Reconciled,
            MergeMode::Legacy => MergeStrategy::LegacyFixedWidth {
                threshold: self.legacy_threshold,
                slot: self.legacy_slot,
            },
        }
    }

    /// Create default settings file with comments
    fn create_default_file(&self, dir: &Path) {
        if let Err(e) = fs::create_dir_all(dir) {
            log::warn!("error creating config directory {}: {}", dir.display(), e);
            return;
        }

        let default_config = r#"{
    // Enrichment endpoints
    "apollo.baseUrl": "https://api.apollo.io",
    "contactout.baseUrl": "https://api.contactout.com",
    "zerobounce.baseUrl": "https://bulkapi.zerobounce.net",

    // ContactOut response shape: "auto", "profile_map", "result_list"
    "contactout.responseShape": "auto",

    // Merge: "reconciled" writes under the header's column;
    // "legacy" appends to rows shorter than legacyThreshold and
    // otherwise overwrites field legacySlot
    "merge.strategy": "reconciled",
    "merge.legacyThreshold": 5,
    "merge.legacySlot": 4,

    // Per-request timeout (no retries)
    "http.timeoutSecs": 30,

    // Output
    "export.fileName": "enriched_data.csv",
    "render.maxColumnWidth": 40

    // API keys live in keys.json, never in this file
}
"#;

        if let Err(e) = fs::write(Self::config_path(dir), default_config) {
            log::warn!("error writing default settings.json: {}", e);
        }
    }
}
