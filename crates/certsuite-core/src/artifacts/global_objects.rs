//! Global-object membership documents.
//!
//! Either a plain list of paths (`["window.alert", ...]`) or an object
//! mapping path to a presence marker, where `false` and `null` mean absent.

use crate::errors::{io_error, CertError, Result};
use crate::model::GlobalObjectSet;
use serde_json::Value;
use std::path::Path;

pub fn parse_global_objects(artifact: &str, text: &str) -> Result<GlobalObjectSet> {
    let invalid = |reason: String| CertError::InvalidGlobalObjectDocument {
        artifact: artifact.to_string(),
        reason,
    };
    let document: Value = serde_json::from_str(text).map_err(|e| invalid(e.to_string()))?;

    let mut set = GlobalObjectSet::new();
    match document {
        Value::Array(items) => {
            for item in items {
                match item {
                    Value::String(path) => set.insert(path),
                    other => {
                        return Err(invalid(format!("expected a path string, got {}", other)).into())
                    }
                }
            }
        }
        Value::Object(entries) => {
            for (path, marker) in entries {
                if !matches!(marker, Value::Null | Value::Bool(false)) {
                    set.insert(path);
                }
            }
        }
        _ => return Err(invalid("expected a list or an object".to_string()).into()),
    }
    Ok(set)
}

pub fn load_global_objects(path: &Path) -> Result<GlobalObjectSet> {
    let text = std::fs::read_to_string(path).map_err(|e| io_error(path, e))?;
    parse_global_objects(&path.display().to_string(), &text)
}
