//! Hidden hook entry points.
//!
//! Hooks run inside the host tool's critical path, so nothing here is allowed
//! to fail the caller: errors are logged and the process still exits 0.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use chrono::Local;
use tokio::io::AsyncReadExt;
use tracing::{debug, error};

use super::{HookEvent, Project};
use crate::error::Error;
use crate::heuristics;
use crate::ledger::{self, PendingLedger};
use crate::observer::{self, HookPayload, ToolEvent};
use crate::prompt;
use crate::reminder;
use crate::state::PathSetFile;

/// Run a hook. Never returns an error.
pub async fn run(event: HookEvent, project: Option<PathBuf>) {
    let result = match event {
        HookEvent::PostToolUse => match read_stdin().await {
            Ok(input) => blocking(move || post_tool_use(project, &input)).await,
            Err(e) => Err(e),
        },
        HookEvent::PostCommand => with_root(project, post_command).await,
        HookEvent::PostCommit => with_root(project, post_commit).await,
        HookEvent::Stop => with_root(project, |p| blocking(move || stop(&p))).await,
    };

    if let Err(e) = result {
        error!(hook = ?event, error = %e, "Hook failed");
    }
}

async fn with_root<F, Fut>(explicit: Option<PathBuf>, f: F) -> Result<(), Error>
where
    F: FnOnce(Project) -> Fut,
    Fut: std::future::Future<Output = Result<(), Error>>,
{
    let root = super::resolve_root(explicit)?;
    f(Project::open_lenient(&root)).await
}

/// Run ledger work off the async workers; the state lock polls with sleeps.
async fn blocking<F>(f: F) -> Result<(), Error>
where
    F: FnOnce() -> Result<(), Error> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| Error::other(format!("ledger task failed: {}", e)))?
}

async fn merge_blocking(ledger: &PendingLedger, files: BTreeSet<String>) -> Result<(), Error> {
    let ledger = ledger.clone();
    blocking(move || {
        ledger.merge_add(files);
        Ok(())
    })
    .await
}

async fn read_stdin() -> Result<String, Error> {
    let mut input = String::new();
    tokio::io::stdin().read_to_string(&mut input).await?;
    Ok(input)
}

/// Record the file touched by an edit-style tool.
pub fn post_tool_use(explicit_root: Option<PathBuf>, input: &str) -> Result<(), Error> {
    let payload = HookPayload::parse(input)?;
    let Some(event) = ToolEvent::from_payload(&payload) else {
        return Ok(());
    };

    let root = match explicit_root.or_else(|| payload.cwd.clone()) {
        Some(root) => root,
        None => std::env::current_dir()?,
    };
    let project = Project::open_lenient(&root);

    let candidates = event
        .targets()
        .into_iter()
        .map(|p| observer::relativize(&project.root, &p));
    let documentable = project.classifier.filter(candidates);
    debug!(?event, count = documentable.len(), "Tool event");

    project.ledger.merge_add(documentable);
    Ok(())
}

/// Record files that changed since the previous run and suggest a prompt.
pub async fn post_command(project: Project) -> Result<(), Error> {
    let snapshot = PathSetFile::new(project.config.snapshot_path(&project.root));
    let changed = project
        .observer()
        .changed_since_snapshot(&snapshot)
        .await;
    let files = project.classifier.filter(changed);
    if files.is_empty() {
        return Ok(());
    }

    merge_blocking(&project.ledger, files.clone()).await?;

    if !heuristics::any_need_documentation(&project.root, &files) {
        return Ok(());
    }

    let list: Vec<String> = files.iter().cloned().collect();
    let prompt_path = prompt::write_prompt(
        &project.config.prompts_dir(&project.root),
        "auto-doc",
        &prompt::auto_doc_prompt(&list),
        Local::now(),
    )?;

    if let Some(text) = reminder::render(&files, project.config.reminder.max_shown) {
        eprintln!("\n{}", text);
        eprintln!("Prompt: {}", display_relative(&project.root, &prompt_path));
    }
    Ok(())
}

/// Record the files of the commit that was just made.
pub async fn post_commit(project: Project) -> Result<(), Error> {
    let changed = project.observer().diff_range("HEAD~", "HEAD").await;
    let files = project.classifier.filter(changed);
    merge_blocking(&project.ledger, files).await
}

/// Drain the ledger and print a reminder for files that still exist.
pub fn stop(project: &Project) -> Result<(), Error> {
    if let Some(text) = stop_reminder(project) {
        eprintln!("{}", text);
    }
    Ok(())
}

fn stop_reminder(project: &Project) -> Option<String> {
    let drained = project.ledger.snapshot_and_clear();
    let existing = ledger::filter_existing(&project.root, &drained);
    reminder::render(&existing, project.config.reminder.max_shown)
}

fn display_relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}
