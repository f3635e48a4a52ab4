// Hand-off blob
//
// The enriched table is stashed here by `lgrid emails` so that the preview
// step can pick it up without re-reading the original file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const HANDOFF_FILE: &str = "handoff.csv";

#[derive(Debug, Clone)]
pub struct Handoff {
    path: PathBuf,
}

impl Handoff {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            path: dir.join(HANDOFF_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self, csv: &str) -> Result<(), String> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
        fs::write(&self.path, csv).map_err(|e| e.to_string())
    }

    /// The stashed CSV text. `Ok(None)` when nothing has been stashed.
    pub fn load(&self) -> Result<Option<String>, String> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(format!("cannot read {}: {}", self.path.display(), e)),
        }
    }

    pub fn clear(&self) -> Result<(), String> {
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|e| e.to_string())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_load_clear() {
        let dir = tempfile::tempdir().unwrap();
        let handoff = Handoff::in_dir(dir.path());
        assert_eq!(handoff.load(), Ok(None));

        handoff.save("Name,Email\nAna,a@x.io").unwrap();
        assert_eq!(
            handoff.load().unwrap().as_deref(),
            Some("Name,Email\nAna,a@x.io")
        );

        handoff.clear().unwrap();
        assert_eq!(handoff.load(), Ok(None));
        handoff.clear().unwrap();
    }

    #[test]
    fn unreadable_blob_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let handoff = Handoff::in_dir(dir.path());
        fs::create_dir(handoff.path()).unwrap();

        let err = handoff.load().unwrap_err();
        assert!(err.contains("handoff.csv"), "{}", err);
    }
}
