//! CLI commands for docket.

pub mod commands;
pub mod doc;
pub mod git_hooks;
pub mod gitignore;
pub mod hook;
pub mod pending;
pub mod settings;
pub mod setup;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::classify::Classifier;
use crate::config::Config;
use crate::error::Error;
use crate::ledger::PendingLedger;
use crate::observer::GitObserver;

pub use doc::Mode;

/// docket - documentation reminders for AI coding tools
#[derive(Parser)]
#[command(name = "docket")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Project root (defaults to the current directory)
    #[arg(long, global = true)]
    pub project: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a documentation prompt for changed files
    Doc {
        /// Which files to document
        #[arg(long, value_enum, default_value_t = Mode::Last)]
        mode: Mode,

        /// Print the prompt without writing any files
        #[arg(long)]
        dry_run: bool,
    },

    /// Show files waiting for documentation
    Pending {
        /// Empty the ledger instead of showing it
        #[arg(long)]
        clear: bool,
    },

    /// Wire docket into the host CLI and this project
    Setup {
        /// Host CLI configuration directory (default: ~/.claude)
        #[arg(long)]
        config_dir: Option<PathBuf>,

        /// Also install a git post-commit hook
        #[arg(long)]
        git_hooks: bool,
    },

    /// Remove docket's hooks, slash commands and .gitignore block
    Teardown {
        /// Host CLI configuration directory (default: ~/.claude)
        #[arg(long)]
        config_dir: Option<PathBuf>,
    },

    /// Internal: entry points for host and git hooks
    #[command(hide = true)]
    Hook {
        #[command(subcommand)]
        event: HookEvent,
    },
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookEvent {
    /// A tool finished; payload on stdin
    PostToolUse,
    /// A command finished; compare git state with the last snapshot
    PostCommand,
    /// git post-commit
    PostCommit,
    /// The agent stopped; drain the ledger and print a reminder
    Stop,
}

/// Everything a command needs to know about one project.
#[derive(Debug, Clone)]
pub struct Project {
    pub root: PathBuf,
    pub config: Config,
    pub classifier: Classifier,
    pub ledger: PendingLedger,
}

impl Project {
    /// Open a project with strict config loading.
    pub fn open(root: &Path) -> Result<Self, Error> {
        Ok(Self::with_config(root, Config::load(root)?))
    }

    /// Open a project, falling back to default config on errors.
    pub fn open_lenient(root: &Path) -> Self {
        Self::with_config(root, Config::load_or_default(root))
    }

    pub fn with_config(root: &Path, config: Config) -> Self {
        let classifier = Classifier::from_config(&config.classifier);
        let ledger = PendingLedger::new(config.ledger_path(root));
        Self {
            root: root.to_path_buf(),
            config,
            classifier,
            ledger,
        }
    }

    pub fn observer(&self) -> GitObserver {
        GitObserver::new(&self.root, self.config.git_timeout())
    }
}

/// Resolve the project root: explicit flag, else the current directory.
pub fn resolve_root(explicit: Option<PathBuf>) -> Result<PathBuf, Error> {
    match explicit {
        Some(root) => Ok(root),
        None => Ok(std::env::current_dir()?),
    }
}
