//! CLI command implementations

pub mod classify;
pub mod compare;
pub mod summary;

use certsuite_core::AggregatedResult;
use std::path::Path;

/// Read a result document written by `certsuite compare`.
pub(crate) fn read_result(path: &Path) -> Result<AggregatedResult, Box<dyn std::error::Error>> {
    let bytes = std::fs::read(path)?;
    Ok(AggregatedResult::from_json_bytes(&bytes)?)
}
