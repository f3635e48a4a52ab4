// Configuration loading

pub mod handoff;
pub mod keys;
pub mod settings;

use std::path::PathBuf;

/// Environment override for the configuration directory.
pub const CONFIG_DIR_ENV: &str = "LEADGRID_CONFIG_DIR";

/// `<platform config dir>/leadgrid`, or `./leadgrid` when the platform has none.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("leadgrid")
}
