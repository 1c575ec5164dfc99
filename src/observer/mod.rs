//! Sources of candidate file paths.

pub mod event;
pub mod git;

use std::path::Path;

pub use event::{FileTarget, HookPayload, ToolEvent};
pub use git::GitObserver;

/// Express `path` relative to `root` when it lies inside it.
///
/// Hook events carry absolute paths while git reports repo-relative ones;
/// normalizing keeps the ledger from holding both forms of one file.
pub fn relativize(root: &Path, path: &str) -> String {
    let p = Path::new(path);
    if p.is_absolute() {
        if let Ok(rel) = p.strip_prefix(root) {
            return rel.to_string_lossy().into_owned();
        }
    }
    path.strip_prefix("./").unwrap_or(path).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relativize() {
        let root = Path::new("/repo");
        assert_eq!(relativize(root, "/repo/src/a.py"), "src/a.py");
        assert_eq!(relativize(root, "/elsewhere/b.py"), "/elsewhere/b.py");
        assert_eq!(relativize(root, "./c.py"), "c.py");
        assert_eq!(relativize(root, "d/e.py"), "d/e.py");
    }
}
