//! Privilege contexts for API exposure.

use crate::errors::CertError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Privilege tier an API is exposed to.
///
/// Ordered from least to most privileged: an API exposed to `Web` content
/// is also visible to `Privileged` and `Certified` apps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Context {
    Web,
    Privileged,
    Certified,
}

impl Context {
    /// All contexts in canonical (document) order
    pub const ALL: [Context; 3] = [Context::Web, Context::Privileged, Context::Certified];

    pub fn as_str(&self) -> &'static str {
        match self {
            Context::Web => "web",
            Context::Privileged => "privileged",
            Context::Certified => "certified",
        }
    }

    /// True if something declared for `declared` is visible from this context
    pub fn exposes(&self, declared: Context) -> bool {
        declared <= *self
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Context {
    type Err = CertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "web" => Ok(Context::Web),
            "privileged" => Ok(Context::Privileged),
            "certified" => Ok(Context::Certified),
            other => Err(CertError::UnknownContext {
                name: other.to_string(),
            }),
        }
    }
}
