//! Slash commands installed into the host CLI's `commands/` directory.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::Error;

/// Present in every file we write; files without it belong to the user.
const MARKER: &str = "<!-- managed by docket -->";

/// A slash command backed by `docket doc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlashCommand {
    pub name: &'static str,
    pub description: &'static str,
    pub args: &'static str,
}

/// Commands docket provides.
pub const SLASH_COMMANDS: &[SlashCommand] = &[
    SlashCommand {
        name: "doc-last",
        description: "Document files from the most recent commit",
        args: "--mode last",
    },
    SlashCommand {
        name: "doc-recent",
        description: "Document files modified in the last few minutes",
        args: "--mode recent",
    },
    SlashCommand {
        name: "doc-staged",
        description: "Document files currently staged in git",
        args: "--mode staged",
    },
    SlashCommand {
        name: "doc-all",
        description: "Document every supported file in the project (slow)",
        args: "--mode all",
    },
    SlashCommand {
        name: "doc-preview",
        description: "Preview the documentation prompt without writing files",
        args: "--mode last --dry-run",
    },
];

impl SlashCommand {
    pub fn file_name(&self) -> String {
        format!("{}.md", self.name)
    }

    /// Markdown body of the command file.
    pub fn render(&self) -> String {
        format!(
            r#"---
description: {description}
allowed-tools: Bash(docket:*)
---
{marker}

!`docket doc {args}`

Follow the prompt above. Add documentation to each listed file, then summarize what changed.
"#,
            description = self.description,
            marker = MARKER,
            args = self.args,
        )
    }
}

/// Write all slash commands into `commands_dir`.
///
/// Files we wrote earlier are refreshed; a user's own file with the same
/// name is left alone. Returns the paths written.
pub fn install(commands_dir: &Path) -> Result<Vec<PathBuf>, Error> {
    fs::create_dir_all(commands_dir)?;

    let mut written = Vec::new();
    for command in SLASH_COMMANDS {
        let path = commands_dir.join(command.file_name());
        if path.exists() && !is_managed(&path) {
            debug!(path = %path.display(), "Skipping user-owned command file");
            continue;
        }
        fs::write(&path, command.render())?;
        written.push(path);
    }

    info!(count = written.len(), dir = %commands_dir.display(), "Installed slash commands");
    Ok(written)
}

/// Delete the command files we own. Returns how many were removed.
pub fn uninstall(commands_dir: &Path) -> Result<usize, Error> {
    let mut removed = 0;
    for command in SLASH_COMMANDS {
        let path = commands_dir.join(command.file_name());
        if path.exists() && is_managed(&path) {
            fs::remove_file(&path)?;
            removed += 1;
        }
    }
    Ok(removed)
}

fn is_managed(path: &Path) -> bool {
    fs::read_to_string(path)
        .map(|content| content.contains(MARKER))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_render() {
        let preview = SLASH_COMMANDS
            .iter()
            .find(|c| c.name == "doc-preview")
            .unwrap();
        let body = preview.render();
        assert!(body.starts_with("---\ndescription: Preview"));
        assert!(body.contains("!`docket doc --mode last --dry-run`"));
        assert!(body.contains(MARKER));
    }

    #[test]
    fn test_install_and_uninstall() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("commands");

        let written = install(&dir).unwrap();
        assert_eq!(written.len(), SLASH_COMMANDS.len());
        assert!(dir.join("doc-last.md").exists());

        // Refresh is fine
        assert_eq!(install(&dir).unwrap().len(), SLASH_COMMANDS.len());

        assert_eq!(uninstall(&dir).unwrap(), SLASH_COMMANDS.len());
        assert!(!dir.join("doc-last.md").exists());
    }

    #[test]
    fn test_user_file_untouched() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("commands");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("doc-all.md"), "my own doc-all").unwrap();

        let written = install(&dir).unwrap();
        assert_eq!(written.len(), SLASH_COMMANDS.len() - 1);
        assert_eq!(uninstall(&dir).unwrap(), SLASH_COMMANDS.len() - 1);
        assert_eq!(
            fs::read_to_string(dir.join("doc-all.md")).unwrap(),
            "my own doc-all"
        );
    }
}
