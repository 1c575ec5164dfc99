//! Changed-file discovery through git plumbing.
//!
//! Every query is read-only and best effort: a missing `git`, a non-repo
//! directory, a non-zero exit or a timeout all produce an empty list.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, SystemTime};

use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::error::Error;
use crate::state::PathSetFile;

/// Runs git queries against one working tree.
#[derive(Debug, Clone)]
pub struct GitObserver {
    root: PathBuf,
    timeout: Duration,
}

impl GitObserver {
    pub fn new(root: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            root: root.into(),
            timeout,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether a working `git` binary is on the PATH.
    pub async fn available(&self) -> Option<String> {
        self.git(&["--version"])
            .await
            .map(|out| out.trim().to_string())
    }

    /// Modified and untracked files, respecting ignore rules.
    pub async fn modified_and_untracked(&self) -> Vec<String> {
        let raw = self.modified_and_untracked_raw().await.unwrap_or_default();
        self.existing(raw)
    }

    async fn modified_and_untracked_raw(&self) -> Option<Vec<String>> {
        self.git(&["ls-files", "-z", "-m", "-o", "--exclude-standard"])
            .await
            .map(|out| parse_name_list(&out))
    }

    /// Files that differ between two revisions.
    pub async fn diff_range(&self, from: &str, to: &str) -> Vec<String> {
        let out = self.git(&["diff", "-z", "--name-only", from, to]).await;
        self.existing(out.map(|o| parse_name_list(&o)).unwrap_or_default())
    }

    /// Files staged for the next commit.
    pub async fn staged(&self) -> Vec<String> {
        let out = self
            .git(&["diff", "--cached", "-z", "--name-only", "--diff-filter=ACMR"])
            .await;
        self.existing(out.map(|o| parse_name_list(&o)).unwrap_or_default())
    }

    /// Modified or added files that are not committed yet.
    pub async fn uncommitted(&self) -> Vec<String> {
        let out = self.git(&["status", "--porcelain", "-z"]).await;
        self.existing(out.map(|o| parse_porcelain(&o)).unwrap_or_default())
    }

    /// Every tracked file.
    pub async fn tracked(&self) -> Vec<String> {
        let out = self.git(&["ls-files", "-z"]).await;
        self.existing(out.map(|o| parse_name_list(&o)).unwrap_or_default())
    }

    /// Modified/untracked files touched within `window`.
    pub async fn recent(&self, window: Duration) -> Vec<String> {
        let cutoff = SystemTime::now()
            .checked_sub(window)
            .unwrap_or(SystemTime::UNIX_EPOCH);
        self.modified_and_untracked()
            .await
            .into_iter()
            .filter(|p| {
                std::fs::metadata(self.root.join(p))
                    .and_then(|m| m.modified())
                    .is_ok_and(|modified| modified >= cutoff)
            })
            .collect()
    }

    /// Files that joined the modified/untracked set since the last call.
    ///
    /// The snapshot is replaced with the current set afterwards. If git
    /// fails the snapshot is left alone.
    pub async fn changed_since_snapshot(&self, snapshot: &PathSetFile) -> Vec<String> {
        let Some(current) = self.modified_and_untracked_raw().await else {
            return Vec::new();
        };
        let current: BTreeSet<String> = current.into_iter().collect();

        let previous = snapshot.read().unwrap_or_else(|e| {
            warn!(path = %snapshot.path().display(), error = %e, "Failed to read snapshot, starting fresh");
            BTreeSet::new()
        });

        let changed: Vec<String> = current.difference(&previous).cloned().collect();

        if let Err(e) = snapshot.write(&current) {
            warn!(path = %snapshot.path().display(), error = %e, "Failed to save snapshot");
        }

        self.existing(changed)
    }

    fn existing(&self, paths: Vec<String>) -> Vec<String> {
        paths
            .into_iter()
            .filter(|p| self.root.join(p).exists())
            .collect()
    }

    /// Run git and return stdout, or `None` on any failure.
    async fn git(&self, args: &[&str]) -> Option<String> {
        match self.try_git(args).await {
            Ok(out) => Some(out),
            Err(e) => {
                debug!(?args, error = %e, "git query failed");
                None
            }
        }
    }

    async fn try_git(&self, args: &[&str]) -> Result<String, Error> {
        let mut cmd = Command::new("git");
        cmd.args(args)
            .current_dir(&self.root)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = match timeout(self.timeout, cmd.output()).await {
            Ok(result) => result?,
            Err(_) => {
                warn!(?args, timeout_secs = self.timeout.as_secs(), "git timed out");
                return Err(Error::Git(format!(
                    "timed out after {}s",
                    self.timeout.as_secs()
                )));
            }
        };

        if !output.status.success() {
            return Err(Error::Git(format!(
                "exit {}: {}",
                output.status.code().unwrap_or(-1),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// NUL-separated paths, as printed by `ls-files -z` and `diff -z --name-only`.
pub fn parse_name_list(output: &str) -> Vec<String> {
    output
        .split('\0')
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Paths from `status --porcelain -z` whose index or worktree state is M or A.
///
/// Each record is `XY path`. Renames and copies are followed by one extra
/// field holding the source path, which is skipped.
pub fn parse_porcelain(output: &str) -> Vec<String> {
    let mut paths = Vec::new();
    let mut fields = output.split('\0');
    while let Some(record) = fields.next() {
        let bytes = record.as_bytes();
        if bytes.len() < 4 {
            continue;
        }
        let (x, y) = (bytes[0], bytes[1]);
        if matches!(x, b'R' | b'C') || matches!(y, b'R' | b'C') {
            fields.next();
        }
        if !matches!(x, b'M' | b'A') && !matches!(y, b'M' | b'A') {
            continue;
        }
        if let Some(path) = record.get(3..) {
            paths.push(path.to_string());
        }
    }
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{age, commit_all, git, init_repo, write};
    use tempfile::TempDir;

    fn observer(dir: &TempDir) -> GitObserver {
        GitObserver::new(dir.path(), Duration::from_secs(10))
    }

    #[test]
    fn test_parse_name_list() {
        let out = "src/a.rs\0src/b.py\0with space.js\0caf\u{e9}.py\0";
        assert_eq!(
            parse_name_list(out),
            vec!["src/a.rs", "src/b.py", "with space.js", "café.py"]
        );
        assert!(parse_name_list("").is_empty());
    }

    #[test]
    fn test_parse_porcelain() {
        let out = "M  staged.py\0 M worktree.ts\0A  added.go\0?? untracked.rs\0 D deleted.js\0\
R  renamed.py\0old.py\0RM edited.py\0moved.py\0MM both.jsx\0";
        assert_eq!(
            parse_porcelain(out),
            vec!["staged.py", "worktree.ts", "added.go", "edited.py", "both.jsx"]
        );
    }

    #[test]
    fn test_parse_porcelain_rename_source_not_reported() {
        // The source field of a rename must not be read as a record
        let out = "RM new.py\0AM old.py\0 M x.py\0";
        assert_eq!(parse_porcelain(out), vec!["new.py", "x.py"]);
    }

    #[test]
    fn test_parse_porcelain_short_records() {
        assert!(parse_porcelain("M\0MM\0").is_empty());
    }

    #[tokio::test]
    async fn test_non_repo_yields_nothing() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.py"), "").unwrap();
        let observer = observer(&dir);

        assert!(observer.staged().await.is_empty());
        assert!(observer.uncommitted().await.is_empty());
        assert!(observer.diff_range("HEAD~", "HEAD").await.is_empty());
    }

    #[tokio::test]
    async fn test_failure_is_git_error() {
        let dir = TempDir::new().unwrap();
        let observer = observer(&dir);
        if observer.available().await.is_none() {
            return;
        }
        let err = observer.try_git(&["rev-parse", "HEAD"]).await.unwrap_err();
        assert!(matches!(err, Error::Git(_)));
    }

    #[tokio::test]
    async fn test_snapshot_untouched_when_git_fails() {
        let dir = TempDir::new().unwrap();
        let snapshot = PathSetFile::new(dir.path().join("snap.json"));
        let previous: BTreeSet<String> = ["keep.py".to_string()].into_iter().collect();
        snapshot.write(&previous).unwrap();

        assert!(observer(&dir).changed_since_snapshot(&snapshot).await.is_empty());
        assert_eq!(snapshot.read().unwrap(), previous);
    }

    #[test]
    fn test_existing_filter() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("here.py"), "").unwrap();
        let observer = GitObserver::new(dir.path(), Duration::from_secs(1));
        assert_eq!(
            observer.existing(vec!["here.py".into(), "gone.py".into()]),
            vec!["here.py"]
        );
    }

    #[tokio::test]
    async fn test_changed_since_snapshot_reports_only_new_changes() {
        let Some(repo) = init_repo() else { return };
        write(repo.path(), "a.py", "a = 1\n");
        write(repo.path(), "b.py", "b = 1\n");
        commit_all(repo.path(), "init");

        let state = TempDir::new().unwrap();
        let snapshot = PathSetFile::new(state.path().join("last-modified-files.json"));
        let observer = observer(&repo);

        write(repo.path(), "a.py", "a = 2\n");
        assert_eq!(observer.changed_since_snapshot(&snapshot).await, vec!["a.py"]);

        write(repo.path(), "c.py", "c = 1\n");
        assert_eq!(observer.changed_since_snapshot(&snapshot).await, vec!["c.py"]);

        assert!(observer.changed_since_snapshot(&snapshot).await.is_empty());
        assert_eq!(snapshot.read().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_non_ascii_names_survive() {
        let Some(repo) = init_repo() else { return };
        write(repo.path(), "café.py", "x = 1\n");
        write(repo.path(), "plain.py", "y = 1\n");
        let observer = observer(&repo);

        let found = observer.modified_and_untracked().await;
        assert_eq!(found, vec!["café.py", "plain.py"]);

        assert!(git(repo.path(), &["add", "café.py"]));
        assert_eq!(observer.staged().await, vec!["café.py"]);
        assert_eq!(observer.uncommitted().await, vec!["café.py"]);
    }

    #[tokio::test]
    async fn test_diff_range_last_commit() {
        let Some(repo) = init_repo() else { return };
        write(repo.path(), "a.py", "a = 1\n");
        commit_all(repo.path(), "first");
        write(repo.path(), "src/b.ts", "export const b = 1;\n");
        commit_all(repo.path(), "second");

        let observer = observer(&repo);
        assert_eq!(observer.diff_range("HEAD~", "HEAD").await, vec!["src/b.ts"]);
        assert_eq!(observer.tracked().await, vec!["a.py", "src/b.ts"]);
    }

    #[tokio::test]
    async fn test_staged_and_uncommitted() {
        let Some(repo) = init_repo() else { return };
        write(repo.path(), "a.py", "a = 1\n");
        commit_all(repo.path(), "init");

        write(repo.path(), "a.py", "a = 2\n");
        write(repo.path(), "b.py", "b = 1\n");
        assert!(git(repo.path(), &["add", "b.py"]));
        write(repo.path(), "c.py", "c = 1\n");

        let observer = observer(&repo);
        assert_eq!(observer.staged().await, vec!["b.py"]);
        assert_eq!(observer.uncommitted().await, vec!["a.py", "b.py"]);
    }

    #[tokio::test]
    async fn test_recent_window() {
        let Some(repo) = init_repo() else { return };
        write(repo.path(), "fresh.py", "x = 1\n");
        write(repo.path(), "stale.py", "y = 1\n");
        age(repo.path(), "stale.py", Duration::from_secs(3600));

        let recent = observer(&repo).recent(Duration::from_secs(300)).await;
        assert_eq!(recent, vec!["fresh.py"]);
    }
}
