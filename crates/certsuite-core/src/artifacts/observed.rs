//! Observed-interface probe documents.
//!
//! ```json
//! {"interfaces": [
//!   {"name": "HTMLMediaElement",
//!    "members": [{"name": "textTracks", "kind": "attribute",
//!                 "probe": {"result": "PASS"}}]}
//! ]}
//! ```
//!
//! A document of the form `{"error": "..."}` records a probing run that
//! never got as far as enumerating interfaces.

use crate::errors::{io_error, CertError, Result};
use crate::model::ObservedInterface;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct ProbeDocument {
    #[serde(default)]
    interfaces: Option<Vec<ObservedInterface>>,
    #[serde(default)]
    error: Option<String>,
}

/// Parse a probe document into observed interfaces, sorted by name.
pub fn parse_observed(artifact: &str, text: &str) -> Result<Vec<ObservedInterface>> {
    let invalid = |reason: String| CertError::InvalidProbeDocument {
        artifact: artifact.to_string(),
        reason,
    };
    let document: ProbeDocument =
        serde_json::from_str(text).map_err(|e| invalid(e.to_string()))?;

    if let Some(reason) = document.error {
        return Err(CertError::CollectionFailed {
            artifact: artifact.to_string(),
            reason,
        }
        .into());
    }
    let Some(mut interfaces) = document.interfaces else {
        return Err(invalid("missing \"interfaces\" list".to_string()).into());
    };

    let mut seen = BTreeSet::new();
    for iface in &interfaces {
        if !seen.insert(iface.name.as_str()) {
            return Err(invalid(format!("interface {} listed twice", iface.name)).into());
        }
    }
    interfaces.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(interfaces)
}

pub fn load_observed(path: &Path) -> Result<Vec<ObservedInterface>> {
    let text = std::fs::read_to_string(path).map_err(|e| io_error(path, e))?;
    parse_observed(&path.display().to_string(), &text)
}
