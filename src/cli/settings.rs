//! Hook registration in the host's `.claude/settings.json`.
//!
//! Adds docket's `PostToolUse` and `Stop` hooks while preserving every other
//! setting and hook. Re-running replaces our entries instead of duplicating
//! them.

use std::path::Path;

use serde_json::{json, Map, Value};

use crate::error::Error;

/// Commands we own start with this; used to find our entries again.
const COMMAND_PREFIX: &str = "docket hook ";

/// Tools whose use should be recorded.
const EDIT_MATCHER: &str = "Write|Edit|MultiEdit";

/// Hook groups docket installs, keyed by host event name.
fn docket_hooks() -> Vec<(&'static str, Value)> {
    vec![
        (
            "PostToolUse",
            json!({
                "matcher": EDIT_MATCHER,
                "hooks": [{"type": "command", "command": "docket hook post-tool-use"}]
            }),
        ),
        (
            "Stop",
            json!({
                "hooks": [{"type": "command", "command": "docket hook stop"}]
            }),
        ),
    ]
}

/// Merge docket hooks into the settings file at `path`.
///
/// An existing file is copied to `backup_path` first.
pub fn merge_hooks(path: &Path, backup_path: &Path) -> Result<(), Error> {
    let mut config = read_settings(path, Some(backup_path))?;
    let hooks = hooks_table(&mut config)?;

    for (event, group) in docket_hooks() {
        let groups = hooks
            .entry(event.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        let list = groups
            .as_array_mut()
            .ok_or_else(|| Error::other(format!("hooks.{} is not an array", event)))?;
        list.retain(|g| !is_docket_group(g));
        list.push(group);
    }

    write_settings(path, &config)
}

/// Remove docket hooks. Returns whether anything was removed.
pub fn remove_hooks(path: &Path) -> Result<bool, Error> {
    if !path.exists() {
        return Ok(false);
    }
    let mut config = read_settings(path, None)?;
    let Some(hooks) = config.get_mut("hooks").and_then(Value::as_object_mut) else {
        return Ok(false);
    };

    let mut removed = false;
    for (event, _) in docket_hooks() {
        let Some(list) = hooks.get_mut(event).and_then(Value::as_array_mut) else {
            continue;
        };
        let before = list.len();
        list.retain(|g| !is_docket_group(g));
        removed |= list.len() != before;
        if list.is_empty() {
            hooks.remove(event);
        }
    }

    if hooks.is_empty() {
        if let Some(obj) = config.as_object_mut() {
            obj.remove("hooks");
        }
    }

    if removed {
        write_settings(path, &config)?;
    }
    Ok(removed)
}

/// Whether docket's hooks are registered in `path`.
pub fn hooks_installed(path: &Path) -> bool {
    let Ok(config) = read_settings(path, None) else {
        return false;
    };
    config
        .get("hooks")
        .and_then(|h| h.get("Stop"))
        .and_then(Value::as_array)
        .is_some_and(|list| list.iter().any(is_docket_group))
}

fn read_settings(path: &Path, backup_path: Option<&Path>) -> Result<Value, Error> {
    let content = if path.exists() {
        if let Some(backup) = backup_path {
            std::fs::copy(path, backup)?;
        }
        std::fs::read_to_string(path)?
    } else {
        String::new()
    };

    let config: Value = if content.trim().is_empty() {
        json!({})
    } else {
        serde_json::from_str(&content)?
    };

    if config.is_object() {
        Ok(config)
    } else {
        Ok(json!({}))
    }
}

fn hooks_table(config: &mut Value) -> Result<&mut Map<String, Value>, Error> {
    let obj = config
        .as_object_mut()
        .ok_or_else(|| Error::other("settings root is not an object"))?;
    obj.entry("hooks")
        .or_insert_with(|| json!({}))
        .as_object_mut()
        .ok_or_else(|| Error::other("settings.hooks is not an object"))
}

fn write_settings(path: &Path, config: &Value) -> Result<(), Error> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let output = serde_json::to_string_pretty(config)?;
    std::fs::write(path, output)?;
    Ok(())
}

fn is_docket_group(group: &Value) -> bool {
    group
        .get("hooks")
        .and_then(Value::as_array)
        .is_some_and(|hooks| {
            hooks.iter().any(|h| {
                h.get("command")
                    .and_then(Value::as_str)
                    .is_some_and(|c| c.starts_with(COMMAND_PREFIX))
            })
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn read(path: &Path) -> Value {
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_merge_new_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".claude").join("settings.json");
        let backup = temp.path().join("settings.json.docket.bak");

        merge_hooks(&path, &backup).unwrap();

        let config = read(&path);
        assert_eq!(
            config["hooks"]["PostToolUse"][0]["matcher"].as_str(),
            Some(EDIT_MATCHER)
        );
        assert_eq!(
            config["hooks"]["Stop"][0]["hooks"][0]["command"].as_str(),
            Some("docket hook stop")
        );
        assert!(!backup.exists());
        assert!(hooks_installed(&path));
    }

    #[test]
    fn test_merge_preserves_existing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.json");
        let backup = temp.path().join("settings.json.docket.bak");

        let existing = json!({
            "model": "opus",
            "hooks": {
                "PostToolUse": [
                    {"matcher": "Bash", "hooks": [{"type": "command", "command": "audit.sh"}]}
                ]
            }
        });
        std::fs::write(&path, serde_json::to_string_pretty(&existing).unwrap()).unwrap();

        merge_hooks(&path, &backup).unwrap();

        let config = read(&path);
        assert_eq!(config["model"].as_str(), Some("opus"));
        let post = config["hooks"]["PostToolUse"].as_array().unwrap();
        assert_eq!(post.len(), 2);
        assert_eq!(post[0]["hooks"][0]["command"].as_str(), Some("audit.sh"));
        assert!(backup.exists());
    }

    #[test]
    fn test_merge_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.json");
        let backup = temp.path().join("settings.json.docket.bak");

        merge_hooks(&path, &backup).unwrap();
        merge_hooks(&path, &backup).unwrap();

        let config = read(&path);
        assert_eq!(config["hooks"]["PostToolUse"].as_array().unwrap().len(), 1);
        assert_eq!(config["hooks"]["Stop"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_remove_hooks() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.json");
        let backup = temp.path().join("settings.json.docket.bak");

        std::fs::write(
            &path,
            r#"{"hooks": {"Stop": [{"hooks": [{"type": "command", "command": "notify.sh"}]}]}}"#,
        )
        .unwrap();
        merge_hooks(&path, &backup).unwrap();

        assert!(remove_hooks(&path).unwrap());

        let config = read(&path);
        assert!(config["hooks"].get("PostToolUse").is_none());
        let stop = config["hooks"]["Stop"].as_array().unwrap();
        assert_eq!(stop.len(), 1);
        assert_eq!(stop[0]["hooks"][0]["command"].as_str(), Some("notify.sh"));
        assert!(!hooks_installed(&path));

        // Nothing left to remove
        assert!(!remove_hooks(&path).unwrap());
    }

    #[test]
    fn test_remove_drops_empty_hooks_table() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.json");
        let backup = temp.path().join("settings.json.docket.bak");

        merge_hooks(&path, &backup).unwrap();
        assert!(remove_hooks(&path).unwrap());

        assert_eq!(read(&path), json!({}));
    }

    #[test]
    fn test_invalid_json_is_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.json");
        let backup = temp.path().join("settings.json.docket.bak");
        std::fs::write(&path, "{ nope").unwrap();

        assert!(merge_hooks(&path, &backup).is_err());
    }
}
