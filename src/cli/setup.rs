//! Wire docket into the host CLI and the current project.

use std::path::{Path, PathBuf};

use tracing::warn;

use super::{commands, git_hooks, gitignore, settings, Project};
use crate::config::Config;
use crate::error::Error;

/// Options for `docket setup`.
#[derive(Debug, Clone, Default)]
pub struct SetupOptions {
    pub config_dir: Option<PathBuf>,
    pub git_hooks: bool,
}

/// Project-level settings file the host reads hooks from.
pub fn settings_path(project_root: &Path) -> PathBuf {
    project_root.join(".claude").join("settings.json")
}

fn settings_backup_path(project_root: &Path) -> PathBuf {
    project_root
        .join(".claude")
        .join("settings.json.docket.bak")
}

fn gitignore_entries(project: &Project) -> Vec<String> {
    gitignore::entries_for(&[
        project.config.paths.state_dir.as_path(),
        project.config.paths.prompts_dir.as_path(),
    ])
}

fn resolve_config_dir(explicit: Option<PathBuf>) -> Result<PathBuf, Error> {
    match explicit {
        Some(dir) if dir.is_dir() => Ok(dir),
        Some(dir) => Err(Error::other(format!(
            "Config directory does not exist: {}",
            dir.display()
        ))),
        None => Config::host_config_dir(),
    }
}

/// Run the setup command.
pub async fn run(project: &Project, opts: SetupOptions) -> Result<(), Error> {
    println!("docket setup");
    println!("  Project: {}", project.root.display());
    println!();

    // git is optional, but revision-based modes do nothing without it
    match project.observer().available().await {
        Some(version) => println!("  git: {}", version),
        None => {
            warn!("git not found");
            println!("  git: NOT FOUND (doc modes and post-command hook will find no files)");
        }
    }

    let config_dir = resolve_config_dir(opts.config_dir)?;
    println!("  Host config: {}", config_dir.display());
    println!();

    let written = commands::install(&config_dir.join("commands"))?;
    println!("Installed {} slash command(s):", written.len());
    for path in &written {
        if let Some(stem) = path.file_stem() {
            println!("  /{}", stem.to_string_lossy());
        }
    }

    settings::merge_hooks(
        &settings_path(&project.root),
        &settings_backup_path(&project.root),
    )?;
    println!("Registered hooks in .claude/settings.json");

    gitignore::update_gitignore(&project.root.join(".gitignore"), &gitignore_entries(project))?;
    println!("Updated .gitignore");

    if !Config::path(&project.root).exists() {
        project.config.save(&project.root)?;
        println!("Created .claude/docket.toml");
    }

    if opts.git_hooks {
        if git_hooks::install_hooks(&project.root)? {
            println!("Installed git post-commit hook");
        } else {
            println!("No .git directory, skipped git hook");
        }
    }

    println!();
    println!("Setup complete. Next steps:");
    println!("  1. Restart your coding assistant so it picks up the hooks");
    println!("  2. Try /doc-preview after editing some code");
    println!("  3. Run 'docket pending' to see what is waiting for docs");
    Ok(())
}

/// Undo `setup`. Missing pieces are skipped silently.
pub fn teardown(project: &Project, config_dir: Option<PathBuf>) -> Result<(), Error> {
    if settings::remove_hooks(&settings_path(&project.root))? {
        println!("Removed hooks from .claude/settings.json");
    }
    if gitignore::remove_from_gitignore(&project.root.join(".gitignore"))? {
        println!("Removed docket block from .gitignore");
    }
    if git_hooks::uninstall_hooks(&project.root)? {
        println!("Removed git post-commit hook");
    }

    match resolve_config_dir(config_dir) {
        Ok(dir) => {
            let removed = commands::uninstall(&dir.join("commands"))?;
            if removed > 0 {
                println!("Removed {} slash command(s)", removed);
            }
        }
        Err(e) => warn!(error = %e, "Skipping slash command removal"),
    }

    println!("Teardown complete. Ledger state in {} was kept.", project.config.paths.state_dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_setup_then_teardown() {
        let project_dir = TempDir::new().unwrap();
        let host_dir = TempDir::new().unwrap();
        fs::create_dir_all(project_dir.path().join(".git")).unwrap();
        fs::write(project_dir.path().join(".gitignore"), "target/\n").unwrap();
        let project = Project::open_lenient(project_dir.path());

        run(
            &project,
            SetupOptions {
                config_dir: Some(host_dir.path().to_path_buf()),
                git_hooks: true,
            },
        )
        .await
        .unwrap();

        assert!(host_dir.path().join("commands").join("doc-last.md").exists());
        assert!(settings::hooks_installed(&settings_path(project_dir.path())));
        assert!(git_hooks::hooks_installed(project_dir.path()));
        assert!(Config::path(project_dir.path()).exists());
        let ignore = fs::read_to_string(project_dir.path().join(".gitignore")).unwrap();
        assert!(ignore.contains("/.claude/state/"));

        teardown(&project, Some(host_dir.path().to_path_buf())).unwrap();

        assert!(!host_dir.path().join("commands").join("doc-last.md").exists());
        assert!(!settings::hooks_installed(&settings_path(project_dir.path())));
        assert!(!git_hooks::hooks_installed(project_dir.path()));
        let ignore = fs::read_to_string(project_dir.path().join(".gitignore")).unwrap();
        assert_eq!(ignore, "target/\n");
    }

    #[tokio::test]
    async fn test_missing_config_dir_is_error() {
        let project_dir = TempDir::new().unwrap();
        let project = Project::open_lenient(project_dir.path());

        let result = run(
            &project,
            SetupOptions {
                config_dir: Some(project_dir.path().join("nope")),
                git_hooks: false,
            },
        )
        .await;
        assert!(result.is_err());
        assert!(!settings_path(project_dir.path()).exists());
    }
}
