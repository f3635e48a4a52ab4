// API key storage
//
// Keys are user-supplied at runtime and resolved in order:
// 1. --api-key flag
// 2. Environment variable (APOLLO_KEY, CONTACTOUT_KEY, ZEROBOUNCE_KEY)
// 3. keys.json in the config directory (0600 on Unix)
//
// Keys are NEVER stored in settings.json and never compiled in.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const KEYS_FILE: &str = "keys.json";

/// The three enrichment services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    Apollo,
    ContactOut,
    ZeroBounce,
}

impl Provider {
    pub const ALL: [Provider; 3] = [Provider::Apollo, Provider::ContactOut, Provider::ZeroBounce];

    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::Apollo => "Apollo",
            Provider::ContactOut => "ContactOut",
            Provider::ZeroBounce => "ZeroBounce",
        }
    }

    /// Environment variable and keys.json field name.
    pub fn env_var(&self) -> &'static str {
        match self {
            Provider::Apollo => "APOLLO_KEY",
            Provider::ContactOut => "CONTACTOUT_KEY",
            Provider::ZeroBounce => "ZEROBOUNCE_KEY",
        }
    }
}

/// The key/value blob persisted in keys.json.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKeys {
    #[serde(rename = "APOLLO_KEY", default, skip_serializing_if = "Option::is_none")]
    pub apollo: Option<String>,
    #[serde(rename = "CONTACTOUT_KEY", default, skip_serializing_if = "Option::is_none")]
    pub contactout: Option<String>,
    #[serde(rename = "ZEROBOUNCE_KEY", default, skip_serializing_if = "Option::is_none")]
    pub zerobounce: Option<String>,
}

impl ApiKeys {
    pub fn get(&self, provider: Provider) -> Option<&str> {
        let slot = match provider {
            Provider::Apollo => &self.apollo,
            Provider::ContactOut => &self.contactout,
            Provider::ZeroBounce => &self.zerobounce,
        };
        slot.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }

    /// Set (or with `None`, clear) one provider's key.
    pub fn set(&mut self, provider: Provider, key: Option<String>) {
        let key = key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        match provider {
            Provider::Apollo => self.apollo = key,
            Provider::ContactOut => self.contactout = key,
            Provider::ZeroBounce => self.zerobounce = key,
        }
    }
}

/// File-backed key store.
#[derive(Debug, Clone)]
pub struct KeyStore {
    path: PathBuf,
}

impl KeyStore {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            path: dir.join(KEYS_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load saved keys. A missing or unreadable file yields no keys.
    pub fn get_keys(&self) -> ApiKeys {
        let contents = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(_) => return ApiKeys::default(),
        };
        serde_json::from_str(&contents).unwrap_or_else(|e| {
            log::warn!("ignoring invalid key store {}: {}", self.path.display(), e);
            ApiKeys::default()
        })
    }

    /// Save keys, creating the parent directory. Sets 0600 on Unix.
    pub fn save_keys(&self, keys: &ApiKeys) -> Result<(), String> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let contents = serde_json::to_string_pretty(keys)
            .map_err(|e| format!("Failed to serialize keys: {}", e))?;

        fs::write(&self.path, &contents)
            .map_err(|e| format!("Failed to write key store: {}", e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = fs::Permissions::from_mode(0o600);
            fs::set_permissions(&self.path, permissions)
                .map_err(|e| format!("Failed to set file permissions: {}", e))?;
        }

        Ok(())
    }
}

/// Where a resolved key came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    Flag,
    Environment,
    KeyStore,
    None,
}

impl KeySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeySource::Flag => "flag",
            KeySource::Environment => "environment",
            KeySource::KeyStore => "keys.json",
            KeySource::None => "none",
        }
    }
}

/// Result of key lookup
#[derive(Debug, Clone)]
pub struct KeyLookup {
    pub key: Option<String>,
    pub source: KeySource,
}

/// Resolve a provider key: flag > environment > key store.
///
/// A flag that is present but blank resolves to nothing rather than
/// silently falling through to another source.
pub fn resolve_key(flag: Option<&str>, provider: Provider, store: &KeyStore) -> KeyLookup {
    if let Some(key) = flag {
        let trimmed = key.trim();
        return if trimmed.is_empty() {
            KeyLookup { key: None, source: KeySource::None }
        } else {
            KeyLookup { key: Some(trimmed.to_string()), source: KeySource::Flag }
        };
    }

    if let Ok(key) = env::var(provider.env_var()) {
        let trimmed = key.trim();
        if !trimmed.is_empty() {
            return KeyLookup {
                key: Some(trimmed.to_string()),
                source: KeySource::Environment,
            };
        }
    }

    if let Some(key) = store.get_keys().get(provider) {
        return KeyLookup {
            key: Some(key.to_string()),
            source: KeySource::KeyStore,
        };
    }

    KeyLookup { key: None, source: KeySource::None }
}

/// Mask a key for display: only the last four characters survive.
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blob_uses_upper_case_names() {
        let keys = ApiKeys {
            apollo: Some("ap".into()),
            contactout: None,
            zerobounce: Some("zb".into()),
        };
        let json = serde_json::to_string(&keys).unwrap();
        assert_eq!(json, r#"{"APOLLO_KEY":"ap","ZEROBOUNCE_KEY":"zb"}"#);

        let parsed: ApiKeys = serde_json::from_str(r#"{"CONTACTOUT_KEY":"co"}"#).unwrap();
        assert_eq!(parsed.get(Provider::ContactOut), Some("co"));
        assert_eq!(parsed.get(Provider::Apollo), None);
    }

    #[test]
    fn set_trims_and_clears() {
        let mut keys = ApiKeys::default();
        keys.set(Provider::Apollo, Some("  k1  ".into()));
        assert_eq!(keys.apollo.as_deref(), Some("k1"));
        keys.set(Provider::Apollo, Some("   ".into()));
        assert_eq!(keys.apollo, None);
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = KeyStore::in_dir(&dir.path().join("nested"));
        assert_eq!(store.get_keys(), ApiKeys::default());

        let mut keys = ApiKeys::default();
        keys.set(Provider::ZeroBounce, Some("zb-123".into()));
        store.save_keys(&keys).unwrap();
        assert_eq!(store.get_keys(), keys);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(store.path()).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }

    #[test]
    fn invalid_store_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = KeyStore::in_dir(dir.path());
        fs::write(store.path(), "not json").unwrap();
        assert_eq!(store.get_keys(), ApiKeys::default());
    }

    #[test]
    fn flag_wins_and_blank_flag_resolves_to_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = KeyStore::in_dir(dir.path());
        let mut keys = ApiKeys::default();
        keys.set(Provider::Apollo, Some("stored".into()));
        store.save_keys(&keys).unwrap();

        let hit = resolve_key(Some(" flagged "), Provider::Apollo, &store);
        assert_eq!(hit.key.as_deref(), Some("flagged"));
        assert_eq!(hit.source, KeySource::Flag);

        let blank = resolve_key(Some("  "), Provider::Apollo, &store);
        assert_eq!(blank.key, None);
        assert_eq!(blank.source, KeySource::None);
    }

    #[test]
    fn store_is_the_last_resort() {
        // ZEROBOUNCE_KEY is not expected to be set in the test environment.
        if env::var(Provider::ZeroBounce.env_var()).is_ok() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let store = KeyStore::in_dir(dir.path());
        assert_eq!(resolve_key(None, Provider::ZeroBounce, &store).source, KeySource::None);

        let mut keys = ApiKeys::default();
        keys.set(Provider::ZeroBounce, Some("zb".into()));
        store.save_keys(&keys).unwrap();
        let hit = resolve_key(None, Provider::ZeroBounce, &store);
        assert_eq!(hit.key.as_deref(), Some("zb"));
        assert_eq!(hit.source, KeySource::KeyStore);
    }

    #[test]
    fn masking() {
        assert_eq!(mask_key("sk_live_abcd1234"), "************1234");
        assert_eq!(mask_key("abc"), "***");
    }
}
