//! .gitignore management.
//!
//! Keeps docket's state and prompt directories out of version control using
//! a managed block that can be rewritten or removed later.

use std::path::Path;

use crate::error::Error;

/// Managed block markers.
const BLOCK_START: &str = "# START docket generated files";
const BLOCK_END: &str = "# END docket generated files";

/// Ignore patterns for directories relative to the project root.
pub fn entries_for(dirs: &[&Path]) -> Vec<String> {
    dirs.iter()
        .map(|d| {
            let d = d.to_string_lossy();
            format!("/{}/", d.trim_matches('/'))
        })
        .collect()
}

/// Generate full managed block content.
fn managed_block(entries: &[String]) -> String {
    format!("{}\n{}\n{}", BLOCK_START, entries.join("\n"), BLOCK_END)
}

/// Update or append docket entries in .gitignore.
///
/// - If file doesn't exist: create with managed block
/// - If file exists with block: replace content between markers
/// - If file exists without block: append block at end
pub fn update_gitignore(path: &Path, entries: &[String]) -> Result<(), Error> {
    let content = if path.exists() {
        std::fs::read_to_string(path)?
    } else {
        String::new()
    };

    let new_content = if content.trim().is_empty() {
        format!("{}\n", managed_block(entries))
    } else if content.contains(BLOCK_START) && content.contains(BLOCK_END) {
        replace_managed_block(&content, entries)?
    } else {
        format!("{}\n\n{}\n", content.trim_end(), managed_block(entries))
    };

    std::fs::write(path, new_content)?;
    Ok(())
}

/// Byte range covering the managed block, markers included.
fn block_range(content: &str) -> Result<(usize, usize), Error> {
    let start_idx = content
        .find(BLOCK_START)
        .ok_or_else(|| Error::other("Block start marker not found"))?;
    let end_idx = content
        .find(BLOCK_END)
        .ok_or_else(|| Error::other("Block end marker not found"))?;

    if end_idx < start_idx {
        return Err(Error::other("Block markers are in wrong order"));
    }
    Ok((start_idx, end_idx + BLOCK_END.len()))
}

/// Replace content between managed block markers.
fn replace_managed_block(content: &str, entries: &[String]) -> Result<String, Error> {
    let (start, end) = block_range(content)?;
    Ok(format!(
        "{}{}{}",
        &content[..start],
        managed_block(entries),
        &content[end..]
    ))
}

/// Remove docket entries from .gitignore. Returns whether a block was found.
pub fn remove_from_gitignore(path: &Path) -> Result<bool, Error> {
    if !path.exists() {
        return Ok(false);
    }

    let content = std::fs::read_to_string(path)?;
    if !content.contains(BLOCK_START) || !content.contains(BLOCK_END) {
        return Ok(false);
    }

    let (start, end) = block_range(&content)?;
    let before = content[..start].trim_end();
    let after = content[end..].trim_start();

    let new_content = match (before.is_empty(), after.is_empty()) {
        (true, true) => String::new(),
        (false, true) => before.to_string(),
        (true, false) => after.trim_end().to_string(),
        (false, false) => format!("{}\n\n{}", before, after.trim_end()),
    };

    if new_content.is_empty() {
        std::fs::remove_file(path)?;
    } else {
        std::fs::write(path, format!("{}\n", new_content))?;
    }

    Ok(true)
}
