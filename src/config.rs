//! Configuration management for docket.
//!
//! Project settings live in `.claude/docket.toml`. Every field has a default,
//! so a missing file (or a partial one) is fine.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Project configuration stored in `.claude/docket.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub classifier: ClassifierConfig,

    #[serde(default)]
    pub reminder: ReminderConfig,

    #[serde(default)]
    pub git: GitConfig,

    #[serde(default)]
    pub paths: PathsConfig,
}

/// Which files count as documentable source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Extensions including the leading dot, matched case-sensitively.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderConfig {
    /// Paths listed before the "...and N more" line.
    #[serde(default = "default_max_shown")]
    pub max_shown: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitConfig {
    /// Upper bound for a single git invocation.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Window used by `doc --mode recent`.
    #[serde(default = "default_recent_minutes")]
    pub recent_minutes: u64,
}

/// Locations relative to the project root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,

    #[serde(default = "default_prompts_dir")]
    pub prompts_dir: PathBuf,
}

fn default_extensions() -> Vec<String> {
    [
        ".js", ".jsx", ".ts", ".tsx", ".mjs", ".cjs", ".py", ".java", ".go", ".rs",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_max_shown() -> usize {
    5
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_recent_minutes() -> u64 {
    5
}

fn default_state_dir() -> PathBuf {
    PathBuf::from(".claude/state")
}

fn default_prompts_dir() -> PathBuf {
    PathBuf::from(".claude/prompts")
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
        }
    }
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            max_shown: default_max_shown(),
        }
    }
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            recent_minutes: default_recent_minutes(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            state_dir: default_state_dir(),
            prompts_dir: default_prompts_dir(),
        }
    }
}

impl Config {
    /// Get the config file path for a project.
    pub fn path(project_root: &Path) -> PathBuf {
        project_root.join(".claude").join("docket.toml")
    }

    /// Load config from a project directory.
    ///
    /// Returns the defaults if the file doesn't exist.
    pub fn load(project_root: &Path) -> Result<Self, Error> {
        let path = Self::path(project_root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load config, falling back to defaults on any error.
    ///
    /// Used by hooks, which must never fail because of a bad config file.
    pub fn load_or_default(project_root: &Path) -> Self {
        Self::load(project_root).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to load config, using defaults");
            Self::default()
        })
    }

    /// Save config to a project directory.
    pub fn save(&self, project_root: &Path) -> Result<(), Error> {
        let path = Self::path(project_root);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| Error::other(e.to_string()))?;
        let with_header = format!(
            "# docket project configuration\n# All keys are optional\n\n{}",
            content
        );
        std::fs::write(path, with_header)?;
        Ok(())
    }

    /// Pending ledger file.
    pub fn ledger_path(&self, project_root: &Path) -> PathBuf {
        project_root
            .join(&self.paths.state_dir)
            .join("pending-docs.json")
    }

    /// Snapshot of the git working set from the previous post-command hook.
    pub fn snapshot_path(&self, project_root: &Path) -> PathBuf {
        project_root
            .join(&self.paths.state_dir)
            .join("last-modified-files.json")
    }

    pub fn prompts_dir(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.paths.prompts_dir)
    }

    pub fn git_timeout(&self) -> Duration {
        Duration::from_secs(self.git.timeout_secs)
    }

    /// Locate the host CLI's global configuration directory.
    ///
    /// Checks `~/.claude` first, then `<config_dir>/claude`.
    pub fn host_config_dir() -> Result<PathBuf, Error> {
        let home = dirs::home_dir().ok_or(Error::HomeDirNotFound)?;
        let mut candidates = vec![home.join(".claude")];
        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(config_dir.join("claude"));
        }
        candidates
            .into_iter()
            .find(|p| p.is_dir())
            .ok_or(Error::ConfigDirNotFound)
    }
}
