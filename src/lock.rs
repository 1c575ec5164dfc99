//! Exclusive lock file guarding read-modify-write on shared state.
//!
//! The lock is a sibling file created with `create_new`, which fails if the
//! file already exists. Dropping the guard removes it, so the lock is released
//! on every exit path including `?` returns and panics.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant, SystemTime};

use tracing::{debug, warn};

use crate::error::Error;

/// How long to wait for another process to finish.
pub const DEFAULT_WAIT: Duration = Duration::from_secs(2);

/// A lock file older than this belongs to a crashed process.
const STALE_AFTER: Duration = Duration::from_secs(30);

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Held lock. Released on drop.
#[derive(Debug)]
pub struct StateLock {
    path: PathBuf,
}

impl StateLock {
    /// Lock file path used for a given state file.
    pub fn path_for(target: &Path) -> PathBuf {
        let mut name = target
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".lock");
        target.with_file_name(name)
    }

    /// Acquire the lock for `target`, polling until `wait` elapses.
    pub fn acquire(target: &Path, wait: Duration) -> Result<Self, Error> {
        let path = Self::path_for(target);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let deadline = Instant::now() + wait;
        loop {
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    let _ = writeln!(file, "{}", std::process::id());
                    debug!(path = %path.display(), "Acquired state lock");
                    return Ok(Self { path });
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    if is_stale(&path) && break_stale(&path) {
                        warn!(path = %path.display(), "Broke stale state lock");
                        continue;
                    }
                    if Instant::now() >= deadline {
                        return Err(Error::LockTimeout(path));
                    }
                    thread::sleep(POLL_INTERVAL);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

impl Drop for StateLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), error = %e, "Failed to release state lock");
        }
    }
}

/// Move a stale lock aside and delete it. Returns true if it was removed.
///
/// The rename is atomic, so of several waiters only one gets the file. The
/// moved file is checked again: if a live lock was taken between our
/// staleness check and the rename, it is linked back in place.
fn break_stale(path: &Path) -> bool {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(format!(".stale.{}", std::process::id()));
    let aside = path.with_file_name(name);

    if fs::rename(path, &aside).is_err() {
        return false;
    }

    if is_stale(&aside) {
        let _ = fs::remove_file(&aside);
        return true;
    }

    if let Err(e) = fs::hard_link(&aside, path) {
        warn!(path = %path.display(), error = %e, "Failed to restore live state lock");
    }
    let _ = fs::remove_file(&aside);
    false
}

fn is_stale(path: &Path) -> bool {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .and_then(|modified| SystemTime::now().duration_since(modified).ok())
        .is_some_and(|age| age > STALE_AFTER)
}
