//! The normalized result document.
//!
//! `AggregatedResult` is an ordered mapping from section name to payload. It
//! serializes as a single JSON object whose keys appear in canonical section
//! order, so identical inputs produce byte-identical documents.

use crate::aggregate::sections::{
    canonical_rank, parse_context_section, section_severity, DiffKind, SectionSeverity,
    OMNI_RESULT,
};
use crate::errors::{ExError, ExErrorKind, Result};
use crate::model::{BundleDiffEntry, UnexpectedResult};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Content of one section.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SectionPayload {
    /// File-level bundle differences
    BundleDiff(Vec<BundleDiffEntry>),
    /// `*_unexpected_webidl_results`
    Unexpected(Vec<UnexpectedResult>),
    /// `*_added_*` / `*_missing_*` name lists
    Names(Vec<String>),
    /// Opaque informative blob, passed through unchanged
    Informative(Value),
}

impl SectionPayload {
    /// Number of reported differences (an informative blob counts as one)
    pub fn entry_count(&self) -> usize {
        match self {
            SectionPayload::BundleDiff(entries) => entries.len(),
            SectionPayload::Unexpected(entries) => entries.len(),
            SectionPayload::Names(names) => names.len(),
            SectionPayload::Informative(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entry_count() == 0
    }
}

/// A named section with its static severity.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub name: String,
    pub severity: SectionSeverity,
    pub payload: SectionPayload,
}

impl Section {
    pub fn new(name: impl Into<String>, payload: SectionPayload) -> Self {
        let name = name.into();
        Self {
            severity: section_severity(&name),
            name,
            payload,
        }
    }
}

/// Merged output of every differ plus the informative records.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AggregatedResult {
    sections: Vec<Section>,
}

impl AggregatedResult {
    /// Build from sections in any order; they are stored in canonical order
    /// (unknown names last, alphabetically). A repeated name keeps the last
    /// section given.
    pub fn from_sections(sections: impl IntoIterator<Item = Section>) -> Self {
        let mut sorted: Vec<Section> = Vec::new();
        for section in sections {
            sorted.retain(|s| s.name != section.name);
            sorted.push(section);
        }
        sorted.sort_by(|a, b| {
            let key = |s: &Section| (canonical_rank(&s.name).unwrap_or(usize::MAX), s.name.clone());
            key(a).cmp(&key(b))
        });
        Self { sections: sorted }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn get(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Actionable sections that report at least one difference
    pub fn actionable_sections(&self) -> impl Iterator<Item = &Section> {
        self.sections
            .iter()
            .filter(|s| s.severity == SectionSeverity::Actionable && !s.payload.is_empty())
    }

    pub fn has_actionable_differences(&self) -> bool {
        self.actionable_sections().next().is_some()
    }

    /// Serialize the result document (pretty JSON, trailing newline).
    ///
    /// # Errors
    ///
    /// - `Serialization` — the document could not be encoded
    /// - `DeterminismViolation` — re-reading and re-encoding the document
    ///   produced different bytes
    pub fn to_json_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = serde_json::to_vec_pretty(self).map_err(|e| {
            ExError::new(ExErrorKind::Serialization)
                .with_op("to_json_bytes")
                .with_message(format!("failed to serialize result document: {}", e))
        })?;
        bytes.push(b'\n');

        let reparsed = Self::from_json_bytes(&bytes).map_err(|e| {
            ExError::new(ExErrorKind::DeterminismViolation)
                .with_op("to_json_bytes")
                .with_message("result document could not be re-read")
                .with_source(e)
        })?;
        let mut again = serde_json::to_vec_pretty(&reparsed).map_err(|e| {
            ExError::new(ExErrorKind::DeterminismViolation)
                .with_op("to_json_bytes")
                .with_message(format!("failed to re-serialize result document: {}", e))
        })?;
        again.push(b'\n');
        if again != bytes {
            return Err(ExError::new(ExErrorKind::DeterminismViolation)
                .with_op("to_json_bytes")
                .with_message("result document changed across a serialization round-trip"));
        }
        Ok(bytes)
    }

    /// SHA-256 (hex) of [`Self::to_json_bytes`].
    ///
    /// # Errors
    ///
    /// Propagates serialization failures.
    pub fn document_digest(&self) -> Result<String> {
        let bytes = self.to_json_bytes()?;
        Ok(hex::encode(Sha256::digest(&bytes)))
    }

    /// Read a result document back, interpreting payloads by section name.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` — not JSON, root is not an object, or a diff section
    ///   does not have the shape its name requires
    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self> {
        let invalid = |message: String| {
            ExError::new(ExErrorKind::InvalidInput)
                .with_op("from_json_bytes")
                .with_message(message)
        };

        let raw: Value = serde_json::from_slice(bytes)
            .map_err(|e| invalid(format!("result document is not valid JSON: {}", e)))?;
        let Value::Object(map) = raw else {
            return Err(invalid("result document root must be an object".to_string()));
        };

        let mut sections = Vec::with_capacity(map.len());
        for (name, value) in map {
            let payload = match parse_context_section(&name) {
                Some((_, DiffKind::UnexpectedWebidlResults)) => SectionPayload::Unexpected(
                    serde_json::from_value(value).map_err(|e| {
                        invalid(format!("section {} is malformed: {}", name, e))
                    })?,
                ),
                Some(_) => SectionPayload::Names(serde_json::from_value(value).map_err(|e| {
                    invalid(format!("section {} is malformed: {}", name, e))
                })?),
                None if name == OMNI_RESULT => match &value {
                    Value::Array(items) if !items.is_empty() => {
                        match serde_json::from_value::<Vec<BundleDiffEntry>>(value.clone()) {
                            Ok(entries) => SectionPayload::BundleDiff(entries),
                            Err(_) => SectionPayload::Informative(value),
                        }
                    }
                    _ => SectionPayload::Informative(value),
                },
                None => SectionPayload::Informative(value),
            };
            sections.push(Section::new(name, payload));
        }
        Ok(Self::from_sections(sections))
    }
}

impl Serialize for AggregatedResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.sections.len()))?;
        for section in &self.sections {
            map.serialize_entry(&section.name, &section.payload)?;
        }
        map.end()
    }
}
