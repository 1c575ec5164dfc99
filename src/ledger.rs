//! Pending-documentation ledger.
//!
//! The ledger is the set of documentable files edited since the last
//! reminder. It lives on disk so it survives across the short-lived hook
//! processes that feed and drain it:
//!
//! ```text
//! IDLE --merge_add--> ACCUMULATING --snapshot_and_clear--> DRAINED (= IDLE)
//! ```
//!
//! The ledger is advisory. Storage failures are logged and treated as an
//! empty ledger; they are never returned to the caller.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::Error;
use crate::lock::{self, StateLock};
use crate::state::PathSetFile;

/// Persistent set of file paths awaiting documentation.
#[derive(Debug, Clone)]
pub struct PendingLedger {
    file: PathSetFile,
    lock_wait: Duration,
}

impl PendingLedger {
    /// Open a ledger backed by `store_path`. Nothing is read until used.
    pub fn new(store_path: impl Into<PathBuf>) -> Self {
        Self {
            file: PathSetFile::new(store_path),
            lock_wait: lock::DEFAULT_WAIT,
        }
    }

    /// Override how long `merge_add`/`snapshot_and_clear` wait for the lock.
    pub fn with_lock_wait(mut self, wait: Duration) -> Self {
        self.lock_wait = wait;
        self
    }

    pub fn store_path(&self) -> &Path {
        self.file.path()
    }

    /// Current contents. Absent, unreadable or corrupt storage reads as empty.
    pub fn load(&self) -> BTreeSet<String> {
        self.file.read().unwrap_or_else(|e| {
            warn!(path = %self.file.path().display(), error = %e, "Failed to read ledger, treating as empty");
            BTreeSet::new()
        })
    }

    /// Union `paths` into the ledger.
    pub fn merge_add<I>(&self, paths: I)
    where
        I: IntoIterator<Item = String>,
    {
        let paths: BTreeSet<String> = paths.into_iter().collect();
        if paths.is_empty() {
            return;
        }
        if let Err(e) = self.try_merge_add(paths) {
            warn!(path = %self.file.path().display(), error = %e, "Failed to update ledger");
        }
    }

    fn try_merge_add(&self, paths: BTreeSet<String>) -> Result<(), Error> {
        let _guard = StateLock::acquire(self.file.path(), self.lock_wait)?;

        let mut entries = self.load();
        let before = entries.len();
        entries.extend(paths);

        if entries.len() == before {
            debug!("Ledger already contains all paths");
            return Ok(());
        }

        self.file.write(&entries)?;
        info!(added = entries.len() - before, total = entries.len(), "Updated ledger");
        Ok(())
    }

    /// Return the current contents and reset the ledger to empty.
    ///
    /// This is the only consuming read.
    pub fn snapshot_and_clear(&self) -> BTreeSet<String> {
        match self.try_snapshot_and_clear() {
            Ok(entries) => entries,
            Err(e) => {
                warn!(path = %self.file.path().display(), error = %e, "Failed to drain ledger");
                BTreeSet::new()
            }
        }
    }

    fn try_snapshot_and_clear(&self) -> Result<BTreeSet<String>, Error> {
        let _guard = StateLock::acquire(self.file.path(), self.lock_wait)?;

        let entries = self.load();
        if !entries.is_empty() || self.file.path().exists() {
            self.file.write(&BTreeSet::new())?;
        }
        info!(drained = entries.len(), "Cleared ledger");
        Ok(entries)
    }
}

/// Drop paths that no longer exist. Relative paths resolve against `root`.
pub fn filter_existing<'a, I>(root: &Path, paths: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a String>,
{
    paths
        .into_iter()
        .filter(|p| {
            let exists = root.join(p.as_str()).exists();
            if !exists {
                debug!(path = %p, "Dropping missing file");
            }
            exists
        })
        .cloned()
        .collect()
}
