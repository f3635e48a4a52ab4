//! Per-invocation context: config directory, settings and the I/O helpers
//! every command shares.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use leadgrid_config::handoff::Handoff;
use leadgrid_config::keys::KeyStore;
use leadgrid_config::settings::Settings;
use leadgrid_config::default_config_dir;
use leadgrid_engine::EnrichmentState;

use crate::CliError;

pub struct App {
    pub config_dir: PathBuf,
    pub settings: Settings,
}

impl App {
    pub fn new(config_dir: Option<PathBuf>) -> Self {
        let config_dir = config_dir.unwrap_or_else(default_config_dir);
        tracing::debug!(config_dir = %config_dir.display(), "loading settings");
        let settings = Settings::load(&config_dir);
        Self { config_dir, settings }
    }

    pub fn key_store(&self) -> KeyStore {
        KeyStore::in_dir(&self.config_dir)
    }

    pub fn handoff(&self) -> Handoff {
        Handoff::in_dir(&self.config_dir)
    }

    /// Fresh state using the configured merge strategy.
    pub fn new_state(&self) -> EnrichmentState {
        EnrichmentState::new(self.settings.merge_strategy())
    }
}

/// True when progress should go to stderr.
pub fn show_progress(quiet: bool) -> bool {
    !quiet && atty::is(atty::Stream::Stderr)
}

fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == "-"
}

/// Read a CSV file, or stdin for `-`.
pub fn read_input(path: &Path) -> Result<String, CliError> {
    if is_stdio(path) {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .map_err(|e| CliError::io(format!("cannot read stdin: {}", e)))?;
        return Ok(text);
    }
    fs::read_to_string(path).map_err(|e| CliError::io(format!("cannot read {}: {}", path.display(), e)))
}

/// Load `path` into `state`. An input with no rows is the "no CSV" case.
pub fn load_into(state: &mut EnrichmentState, path: &Path) -> Result<(), CliError> {
    let text = read_input(path)?;
    if !state.load(text.as_str()) {
        return Err(CliError::args("load a CSV first")
            .with_hint(format!("{} has no rows", path.display())));
    }
    Ok(())
}

/// Write CSV text to `out` (stdout for `-`). Returns a label for messages.
pub fn write_output(csv: &str, out: &Path) -> Result<String, CliError> {
    if is_stdio(out) {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", csv)
            .and_then(|_| stdout.flush())
            .map_err(|e| CliError::io(format!("cannot write stdout: {}", e)))?;
        return Ok("stdout".to_string());
    }
    fs::write(out, csv).map_err(|e| CliError::io(format!("cannot write {}: {}", out.display(), e)))?;
    Ok(out.display().to_string())
}
