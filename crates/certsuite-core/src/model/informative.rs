//! Raw informative records passed through to the result document.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Opaque blob recorded for context only (build properties, headers, …).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InformativeRecord(pub Value);

impl InformativeRecord {
    pub fn text(text: impl Into<String>) -> Self {
        Self(Value::String(text.into()))
    }

    pub fn value(&self) -> &Value {
        &self.0
    }
}

/// The informative sections a certification run collects from the device.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InformativeRecords {
    /// Raw omni metadata, used only when no bundle diff was computed
    pub omni_result: Option<InformativeRecord>,
    pub application_ini: Option<InformativeRecord>,
    pub headers: Option<InformativeRecord>,
    pub buildprops: Option<InformativeRecord>,
    pub kernel_version: Option<InformativeRecord>,
    pub processes_running: Option<InformativeRecord>,
}
