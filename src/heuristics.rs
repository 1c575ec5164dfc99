//! Cheap checks for "this file probably lacks documentation".
//!
//! These are text heuristics, not parsers. They only decide whether to bother
//! the user with a prompt.

use std::fs;
use std::path::Path;

/// Whether the file at `path` looks like it has undocumented code.
///
/// Unreadable files and unsupported languages return false.
pub fn needs_documentation(path: &Path) -> bool {
    let Ok(content) = fs::read_to_string(path) else {
        return false;
    };
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    content_needs_documentation(ext, &content)
}

/// Heuristic over file content; `ext` has no leading dot.
pub fn content_needs_documentation(ext: &str, content: &str) -> bool {
    match ext {
        "js" | "jsx" | "ts" | "tsx" | "mjs" | "cjs" => {
            let has_jsdoc = content.contains("/**") && content.contains("*/");
            let has_functions = content.contains("function ")
                || (content.contains("const ") && content.contains("= ("));
            has_functions && !has_jsdoc
        }
        "py" => {
            let has_docstring = content.contains("\"\"\"") || content.contains("'''");
            content.contains("def ") && !has_docstring
        }
        "rs" => {
            let has_docs = content.contains("///") || content.contains("//!");
            content.contains("fn ") && !has_docs
        }
        _ => false,
    }
}

/// True if any of `paths` (relative to `root`) needs documentation.
pub fn any_need_documentation<'a, I>(root: &Path, paths: I) -> bool
where
    I: IntoIterator<Item = &'a String>,
{
    paths
        .into_iter()
        .any(|p| needs_documentation(&root.join(p)))
}
