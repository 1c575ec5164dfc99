//! Tool-invocation events delivered by the host's hook dispatcher.

use std::path::PathBuf;

use serde::Deserialize;
use tracing::debug;

use crate::error::Error;

/// Raw hook payload as read from stdin.
///
/// The dispatcher sends more fields than we use (`session_id`,
/// `transcript_path`, `tool_response`, ...); serde skips them.
#[derive(Debug, Clone, Deserialize)]
pub struct HookPayload {
    #[serde(default)]
    pub hook_event_name: Option<String>,
    #[serde(default)]
    pub cwd: Option<PathBuf>,
    #[serde(default)]
    pub tool_name: Option<String>,
    #[serde(default)]
    pub tool_input: serde_json::Value,
}

/// Target file of an edit-style tool.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileTarget {
    #[serde(default)]
    pub file_path: Option<String>,
}

/// An edit-style tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolEvent {
    Write(FileTarget),
    Edit(FileTarget),
    MultiEdit(FileTarget),
}

impl ToolEvent {
    /// Interpret a payload. Tools that don't write files yield `None`.
    pub fn from_payload(payload: &HookPayload) -> Option<Self> {
        let name = payload.tool_name.as_deref()?;
        let ctor: fn(FileTarget) -> ToolEvent = match name {
            "Write" => ToolEvent::Write,
            "Edit" => ToolEvent::Edit,
            "MultiEdit" => ToolEvent::MultiEdit,
            other => {
                debug!(tool = other, "Ignoring non-edit tool");
                return None;
            }
        };
        let target = FileTarget::deserialize(&payload.tool_input).unwrap_or(FileTarget {
            file_path: None,
        });
        Some(ctor(target))
    }

    pub fn target(&self) -> &FileTarget {
        match self {
            ToolEvent::Write(t) | ToolEvent::Edit(t) | ToolEvent::MultiEdit(t) => t,
        }
    }

    /// `[file_path]` when the event names a file, else empty.
    pub fn targets(&self) -> Vec<String> {
        self.target()
            .file_path
            .iter()
            .filter(|p| !p.is_empty())
            .cloned()
            .collect()
    }
}

impl HookPayload {
    /// Parse a payload from the hook's stdin.
    pub fn parse(input: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(input)?)
    }
}
