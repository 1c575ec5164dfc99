//! Documentable-file classification.

use std::collections::BTreeSet;

use crate::config::ClassifierConfig;

/// Decides whether a path names documentable source code.
#[derive(Debug, Clone)]
pub struct Classifier {
    extensions: BTreeSet<String>,
}

impl Classifier {
    /// Build a classifier from dotted extensions (`".py"`, `".tsx"`).
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            extensions: extensions.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self::new(config.extensions.iter().cloned())
    }

    /// True iff the path's extension is in the configured set.
    ///
    /// Matching is case-sensitive and includes the leading dot. Paths
    /// without an extension, and dotfiles like `.bashrc`, never match.
    pub fn is_documentable(&self, path: &str) -> bool {
        extension(path).is_some_and(|ext| self.extensions.contains(ext))
    }

    /// Keep only documentable paths.
    pub fn filter<I>(&self, paths: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = String>,
    {
        paths
            .into_iter()
            .filter(|p| self.is_documentable(p))
            .collect()
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::from_config(&ClassifierConfig::default())
    }
}

/// Dotted extension of the last path component, if any.
fn extension(path: &str) -> Option<&str> {
    let name = path.rsplit(['/', '\\']).next()?;
    let idx = name.rfind('.')?;
    // ".bashrc" is a hidden file, "foo." has an empty extension
    if idx == 0 || idx == name.len() - 1 {
        return None;
    }
    Some(&name[idx..])
}
