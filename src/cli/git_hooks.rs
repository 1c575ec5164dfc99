//! Git hook installation and management.

use std::fs;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use tracing::info;

use crate::error::Error;

/// Marks lines we own inside a hook script.
const MARKER: &str = "docket documentation ledger";

/// Post-commit hook script content.
const POST_COMMIT_HOOK: &str = r#"#!/bin/sh
# docket documentation ledger (auto-installed)
docket hook post-commit 2>/dev/null || true # docket documentation ledger
"#;

/// Check if the docket post-commit hook is installed.
pub fn hooks_installed(project_root: &Path) -> bool {
    let post_commit = project_root.join(".git").join("hooks").join("post-commit");
    fs::read_to_string(post_commit)
        .map(|content| content.contains(MARKER))
        .unwrap_or(false)
}

/// Install the post-commit hook. Returns false when there is no `.git`.
pub fn install_hooks(project_root: &Path) -> Result<bool, Error> {
    let git_dir = project_root.join(".git");
    if !git_dir.is_dir() {
        return Ok(false);
    }

    let hooks_dir = git_dir.join("hooks");
    fs::create_dir_all(&hooks_dir)?;

    install_hook(&hooks_dir.join("post-commit"), POST_COMMIT_HOOK)?;
    info!("Installed post-commit hook");
    Ok(true)
}

/// Install a single hook, preserving existing hooks.
fn install_hook(path: &Path, content: &str) -> Result<(), Error> {
    let final_content = if path.exists() {
        let existing = fs::read_to_string(path)?;

        if existing.contains(MARKER) {
            return Ok(());
        }

        // Skip our shebang when appending to someone else's script
        let body = content.strip_prefix("#!/bin/sh\n").unwrap_or(content);
        format!("{}\n\n{}", existing.trim_end(), body)
    } else {
        content.to_string()
    };

    fs::write(path, &final_content)?;
    make_executable(path)?;
    Ok(())
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<(), Error> {
    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms)?;
    Ok(())
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<(), Error> {
    Ok(())
}

/// Remove the docket section from git hooks. Returns whether anything changed.
pub fn uninstall_hooks(project_root: &Path) -> Result<bool, Error> {
    let hook_path = project_root.join(".git").join("hooks").join("post-commit");
    if !hook_path.exists() {
        return Ok(false);
    }

    let content = fs::read_to_string(&hook_path)?;
    if !content.contains(MARKER) {
        return Ok(false);
    }

    let cleaned = remove_docket_section(&content);
    if cleaned.trim().is_empty() || cleaned.trim() == "#!/bin/sh" {
        fs::remove_file(&hook_path)?;
    } else {
        fs::write(&hook_path, format!("{}\n", cleaned.trim_end()))?;
    }
    info!("Removed docket post-commit hook");
    Ok(true)
}

/// Remove docket lines from hook content.
fn remove_docket_section(content: &str) -> String {
    content
        .lines()
        .filter(|line| !line.contains(MARKER))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn git_repo() -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join(".git")).unwrap();
        temp
    }

    fn post_commit(root: &Path) -> std::path::PathBuf {
        root.join(".git").join("hooks").join("post-commit")
    }

    #[test]
    fn test_no_git_is_noop() {
        let temp = TempDir::new().unwrap();
        assert!(!install_hooks(temp.path()).unwrap());
        assert!(!uninstall_hooks(temp.path()).unwrap());
    }

    #[test]
    fn test_install_fresh() {
        let temp = git_repo();
        assert!(install_hooks(temp.path()).unwrap());
        assert!(hooks_installed(temp.path()));

        let content = fs::read_to_string(post_commit(temp.path())).unwrap();
        assert!(content.starts_with("#!/bin/sh\n"));
        assert!(content.contains("docket hook post-commit"));

        #[cfg(unix)]
        {
            let mode = fs::metadata(post_commit(temp.path())).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o755);
        }
    }

    #[test]
    fn test_append_and_uninstall_preserves_user_hook() {
        let temp = git_repo();
        let path = post_commit(temp.path());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "#!/bin/sh\necho committed\n").unwrap();

        install_hooks(temp.path()).unwrap();
        install_hooks(temp.path()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.matches("docket hook post-commit").count(), 1);
        assert_eq!(content.matches("#!/bin/sh").count(), 1);
        assert!(content.contains("echo committed"));

        assert!(uninstall_hooks(temp.path()).unwrap());
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "#!/bin/sh\necho committed\n");
    }

    #[test]
    fn test_uninstall_removes_own_file() {
        let temp = git_repo();
        install_hooks(temp.path()).unwrap();

        assert!(uninstall_hooks(temp.path()).unwrap());
        assert!(!post_commit(temp.path()).exists());
    }
}
