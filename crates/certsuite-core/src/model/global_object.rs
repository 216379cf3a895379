//! Objects and functions reachable from the top-level global object.

use crate::model::context::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Set of global-object-relative paths (e.g. `window.navigator.mozApps`)
/// present in one context of one corpus.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalObjectSet {
    paths: BTreeSet<String>,
}

impl GlobalObjectSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>) {
        self.paths.insert(path.into());
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(|p| p.as_str())
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for GlobalObjectSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Global-object differences for one context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalObjectDiffResult {
    pub context: Context,
    /// On the device, not in the reference
    pub added: Vec<String>,
    /// In the reference, not on the device
    pub missing: Vec<String>,
}

impl GlobalObjectDiffResult {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.missing.is_empty()
    }
}
