//! Informative records are passed through untouched: JSON files as JSON
//! values, everything else as text.

use crate::errors::{io_error, Result};
use crate::model::InformativeRecord;
use serde_json::Value;
use std::path::Path;

pub fn load_informative(path: &Path) -> Result<InformativeRecord> {
    let bytes = std::fs::read(path).map_err(|e| io_error(path, e))?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        if let Ok(value) = serde_json::from_slice::<Value>(&bytes) {
            return Ok(InformativeRecord(value));
        }
    }
    Ok(InformativeRecord::text(String::from_utf8_lossy(&bytes)))
}
