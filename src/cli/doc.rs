//! `docket doc`: build a documentation prompt for changed files.

use std::fmt;
use std::time::Duration;

use chrono::Local;
use clap::ValueEnum;
use tracing::debug;

use super::Project;
use crate::error::Error;
use crate::observer::GitObserver;
use crate::prompt;

/// Report written next to the prompt.
pub const REPORT_FILE: &str = "documentation-report.md";

/// Which files `doc` should look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Files in the last commit, or uncommitted changes if there is none
    Last,
    /// Modified or untracked files touched in the last few minutes
    Recent,
    /// Files staged for commit
    Staged,
    /// Every tracked file
    All,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Last => "last",
            Mode::Recent => "recent",
            Mode::Staged => "staged",
            Mode::All => "all",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a `doc` run produced.
#[derive(Debug)]
pub struct DocOutcome {
    pub files: Vec<String>,
    pub prompt: String,
    pub prompt_path: Option<std::path::PathBuf>,
    pub report_path: Option<std::path::PathBuf>,
}

/// Candidate paths for `mode`, before classification.
pub async fn candidates(observer: &GitObserver, mode: Mode, recent: Duration) -> Vec<String> {
    match mode {
        Mode::Last => {
            let files = observer.diff_range("HEAD~", "HEAD").await;
            if files.is_empty() {
                debug!("No previous commit diff, falling back to uncommitted changes");
                observer.uncommitted().await
            } else {
                files
            }
        }
        Mode::Recent => observer.recent(recent).await,
        Mode::Staged => observer.staged().await,
        Mode::All => observer.tracked().await,
    }
}

fn recent_window(minutes: u64) -> Duration {
    Duration::from_secs(minutes.saturating_mul(60))
}

/// Collect files, build the prompt and (unless `dry_run`) write it out.
pub async fn generate(project: &Project, mode: Mode, dry_run: bool) -> Result<DocOutcome, Error> {
    let recent = recent_window(project.config.git.recent_minutes);
    let found = candidates(&project.observer(), mode, recent).await;
    let files: Vec<String> = project.classifier.filter(found).into_iter().collect();

    if files.is_empty() {
        return Err(Error::NoFiles(mode.to_string()));
    }

    let prompt = prompt::generation_prompt(&files);
    let mut outcome = DocOutcome {
        files,
        prompt,
        prompt_path: None,
        report_path: None,
    };

    if !dry_run {
        let now = Local::now();
        outcome.prompt_path = Some(prompt::write_prompt(
            &project.config.prompts_dir(&project.root),
            "doc-generation",
            &outcome.prompt,
            now,
        )?);

        let report_path = project.root.join(REPORT_FILE);
        std::fs::write(&report_path, prompt::tracking_report(&outcome.files, now))?;
        outcome.report_path = Some(report_path);
    }

    Ok(outcome)
}

/// Run the doc command, printing progress and the prompt to stdout.
pub async fn run(project: &Project, mode: Mode, dry_run: bool) -> Result<(), Error> {
    let outcome = generate(project, mode, dry_run).await?;

    println!("Found {} file(s) to document:", outcome.files.len());
    for file in &outcome.files {
        println!("  - {}", file);
    }

    match (&outcome.prompt_path, &outcome.report_path) {
        (Some(prompt_path), Some(report_path)) => {
            println!();
            println!("Prompt written: {}", prompt_path.display());
            println!("Tracking file: {}", report_path.display());
        }
        _ => {
            println!();
            println!("Dry run: no files written.");
        }
    }

    println!();
    println!("{}", "=".repeat(50));
    println!("{}", outcome.prompt);
    Ok(())
}
