//! Human-readable reminder for pending files.

use std::collections::BTreeSet;

/// Default number of paths listed before truncating.
pub const DEFAULT_MAX_SHOWN: usize = 5;

/// Render a reminder for `entries`, or `None` when there is nothing pending.
///
/// Paths are listed in lexicographic order; at most `max_shown` of them,
/// followed by a count of the rest.
pub fn render(entries: &BTreeSet<String>, max_shown: usize) -> Option<String> {
    if entries.is_empty() {
        return None;
    }

    let mut out = String::new();
    out.push_str("Documentation reminder\n");
    out.push_str(&format!(
        "{} file(s) may need documentation:\n",
        entries.len()
    ));
    for path in entries.iter().take(max_shown) {
        out.push_str(&format!("  - {}\n", path));
    }
    if entries.len() > max_shown {
        out.push_str(&format!(
            "  ...and {} more files\n",
            entries.len() - max_shown
        ));
    }
    out.push_str("Run /doc-last to generate documentation.");
    Some(out)
}
