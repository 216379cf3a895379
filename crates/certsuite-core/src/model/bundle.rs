//! Script bundle contents and bundle diff entries.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Packaged script archive contents: path → bytes.
///
/// Paths are unique and iterate in lexicographic order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptBundle {
    files: BTreeMap<String, Vec<u8>>,
}

impl ScriptBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a file. Returns `false` (leaving the bundle unchanged) if the
    /// path is already present.
    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) -> bool {
        let path = path.into();
        if self.files.contains_key(&path) {
            return false;
        }
        self.files.insert(path, content.into());
        true
    }

    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.files.get(path).map(|c| c.as_slice())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(|p| p.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.files.iter().map(|(p, c)| (p.as_str(), c.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl<P: Into<String>, C: Into<Vec<u8>>> FromIterator<(P, C)> for ScriptBundle {
    /// Later duplicates are ignored.
    fn from_iter<I: IntoIterator<Item = (P, C)>>(iter: I) -> Self {
        let mut bundle = ScriptBundle::new();
        for (path, content) in iter {
            bundle.insert(path, content);
        }
        bundle
    }
}

/// One line of a diff hunk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", content = "text", rename_all = "snake_case")]
pub enum DiffLine {
    Context(String),
    Removed(String),
    Added(String),
}

/// A contiguous region of change with surrounding context.
///
/// Line numbers are 1-based; a zero-length side uses the line before the
/// hunk, as in unified diff headers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiffHunk {
    pub old_start: usize,
    pub old_lines: usize,
    pub new_start: usize,
    pub new_lines: usize,
    pub lines: Vec<DiffLine>,
}

/// One file-level difference between the reference and device bundles.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BundleDiffEntry {
    /// Present on the device only
    Added { path: String },
    /// Present in the reference only
    Removed { path: String },
    /// Present in both with different bytes
    Changed {
        path: String,
        reference_digest: String,
        device_digest: String,
        /// Either side is not valid UTF-8; no line diff is computed
        binary: bool,
        hunks: Vec<DiffHunk>,
        /// Rendered unified diff text
        unified: String,
    },
}

impl BundleDiffEntry {
    pub fn path(&self) -> &str {
        match self {
            BundleDiffEntry::Added { path }
            | BundleDiffEntry::Removed { path }
            | BundleDiffEntry::Changed { path, .. } => path,
        }
    }

    pub fn status(&self) -> &'static str {
        match self {
            BundleDiffEntry::Added { .. } => "added",
            BundleDiffEntry::Removed { .. } => "removed",
            BundleDiffEntry::Changed { .. } => "changed",
        }
    }
}
