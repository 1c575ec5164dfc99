//! Scratch git repositories for tests.

use std::fs;
use std::path::Path;
use std::process::Command;
use std::time::{Duration, SystemTime};

use tempfile::TempDir;

/// Run git synchronously; false on any failure.
pub fn git(dir: &Path, args: &[&str]) -> bool {
    Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// A fresh repository, or `None` when git isn't installed.
pub fn init_repo() -> Option<TempDir> {
    let dir = TempDir::new().unwrap();
    if !git(dir.path(), &["init", "-q"]) {
        return None;
    }
    for (key, value) in [
        ("user.email", "dev@example.com"),
        ("user.name", "dev"),
        ("commit.gpgsign", "false"),
        ("core.hooksPath", "/dev/null"),
    ] {
        assert!(git(dir.path(), &["config", key, value]));
    }
    Some(dir)
}

pub fn write(dir: &Path, name: &str, content: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

pub fn commit_all(dir: &Path, message: &str) {
    assert!(git(dir, &["add", "-A"]));
    assert!(git(dir, &["commit", "-q", "-m", message]));
}

/// Push a file's mtime into the past.
pub fn age(dir: &Path, name: &str, by: Duration) {
    let file = fs::File::options()
        .write(true)
        .open(dir.join(name))
        .unwrap();
    file.set_modified(SystemTime::now() - by).unwrap();
}
