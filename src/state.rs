//! On-disk path sets shared by the ledger and the git snapshot.
//!
//! Both files hold a JSON array of strings. An absent file is an empty set.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Error;

/// A JSON file holding a set of paths.
#[derive(Debug, Clone)]
pub struct PathSetFile {
    path: PathBuf,
}

impl PathSetFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the set. Absent file reads as empty; malformed content is an error.
    pub fn read(&self) -> Result<BTreeSet<String>, Error> {
        if !self.path.exists() {
            return Ok(BTreeSet::new());
        }
        let data = fs::read_to_string(&self.path)?;
        if data.trim().is_empty() {
            return Ok(BTreeSet::new());
        }
        let entries: Vec<String> = serde_json::from_str(&data)?;
        Ok(entries.into_iter().collect())
    }

    /// Replace the file contents with `entries`.
    ///
    /// Writes a sibling temp file and renames it over the target, so readers
    /// never observe a half-written array.
    pub fn write(&self, entries: &BTreeSet<String>) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let data = serde_json::to_string_pretty(entries)?;
        let tmp = self.tmp_path();
        fs::write(&tmp, data)?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }

        debug!(path = %self.path.display(), count = entries.len(), "Saved path set");
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(format!(".{}.tmp", std::process::id()));
        self.path.with_file_name(name)
    }
}
