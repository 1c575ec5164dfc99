//! Markdown prompts handed to the coding agent.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::info;

use crate::error::Error;

const AUTO_DOC_TASKS: &str = r#"## Suggested Tasks

1. **Fill gaps**
   - Add JSDoc / docstrings to undocumented functions
   - Comment non-obvious logic
   - Add a header to complex modules

2. **Refresh project docs**
   - README.md for new features
   - API.md for changed endpoints
   - CHANGELOG.md entry

3. **Examples**
   - Usage examples for new functions
   - Update examples whose APIs changed

Review the files above and add the documentation they are missing.
"#;

const GENERATION_TASKS: &str = r#"## Tasks

### 1. Inline documentation
- Document every function, class and method
- Parameter types, descriptions and return values
- Error cases and exceptions
- Usage examples for anything non-trivial
- Match the documentation style already used in the project

### 2. File headers
For complex files, describe purpose, main exports, dependencies and any
implementation notes worth knowing.

### 3. Project documentation
- `docs/modules/<module>.md`: API reference, examples, breaking changes
- README.md for new features
- docs/API.md for API changes
- docs/ARCHITECTURE.md for structural changes

### 4. Examples
- Typical usage
- Edge cases and error handling
- Integration with neighbouring components

### 5. Cross references
- Link related documents
- Update tables of contents

## Quality bar
- Examples must run
- Docs must agree with the code
- Follow existing conventions
"#;

const GENERATION_FOOTER: &str = r#"
## Output
1. Update the source files with inline documentation
2. Create or update the markdown documentation
3. Summarize everything that was added
"#;

/// Short prompt written by the post-command hook.
pub fn auto_doc_prompt(files: &[String]) -> String {
    format!(
        "# Documentation Needed\n\nThese files changed and may be missing documentation:\n\n## Changed Files\n{}\n\n{}",
        bullet_list(files),
        AUTO_DOC_TASKS
    )
}

/// Full prompt produced by `docket doc`.
pub fn generation_prompt(files: &[String]) -> String {
    let mut prompt = format!(
        "# Document Recent Changes\n\n## Files\n{}\n\n{}",
        bullet_list(files),
        GENERATION_TASKS
    );

    let specific: Vec<String> = files.iter().filter_map(|f| file_section(f)).collect();
    if !specific.is_empty() {
        prompt.push_str("\n## Per-file notes\n");
        for section in specific {
            prompt.push_str(&section);
        }
    }

    prompt.push_str(GENERATION_FOOTER);
    prompt
}

/// Extra instructions for files whose kind we can guess from the name.
fn file_section(file: &str) -> Option<String> {
    let lower = file.to_lowercase();
    let ext = Path::new(file)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");

    match ext {
        "jsx" | "tsx" => Some(format!(
            "\n### Component: {}\n- Props with types and defaults\n- Examples for common prop combinations\n- Context and state it depends on\n",
            file
        )),
        "js" | "ts" if lower.contains("api") => Some(format!(
            "\n### API: {}\n- Request and response shapes\n- curl examples\n- Authentication requirements\n- Error responses\n",
            file
        )),
        "js" | "ts" if lower.contains("test") => Some(format!(
            "\n### Tests: {}\n- What is under test\n- Non-obvious setup\n- Shape of mock data\n",
            file
        )),
        _ => None,
    }
}

/// Checklist written next to the generation prompt.
pub fn tracking_report(files: &[String], generated: DateTime<Local>) -> String {
    let checklist: Vec<String> = files.iter().map(|f| format!("- [ ] {}", f)).collect();
    format!(
        "# Documentation Report\nGenerated: {}\n\n## Files\n{}\n\n## Tasks\n- [ ] Inline documentation\n- [ ] Module docs\n- [ ] API docs\n- [ ] Usage examples\n- [ ] Cross references\n- [ ] Examples verified\n",
        generated.format("%Y-%m-%d %H:%M:%S"),
        checklist.join("\n")
    )
}

/// Write `content` to `<dir>/<prefix>-<timestamp>.md` and return the path.
pub fn write_prompt(
    dir: &Path,
    prefix: &str,
    content: &str,
    now: DateTime<Local>,
) -> Result<PathBuf, Error> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}-{}.md", prefix, now.format("%Y%m%d-%H%M%S")));
    fs::write(&path, content)?;
    info!(path = %path.display(), "Wrote prompt");
    Ok(path)
}

fn bullet_list(files: &[String]) -> String {
    files
        .iter()
        .map(|f| format!("- {}", f))
        .collect::<Vec<_>>()
        .join("\n")
}
