//! Section identity: names, canonical order and the static severity table.

use crate::model::Context;
use serde::{Deserialize, Serialize};

pub const OMNI_RESULT: &str = "omni_result";
pub const APPLICATION_INI: &str = "application_ini";
pub const HEADERS: &str = "headers";
pub const BUILDPROPS: &str = "buildprops";
pub const KERNEL_VERSION: &str = "kernel_version";
pub const PROCESSES_RUNNING: &str = "processes_running";

/// Informative sections in document order.
pub const INFORMATIVE_SECTIONS: [&str; 6] = [
    OMNI_RESULT,
    APPLICATION_INI,
    HEADERS,
    BUILDPROPS,
    KERNEL_VERSION,
    PROCESSES_RUNNING,
];

/// Informative sections whose absence makes a run incomplete.
pub const REQUIRED_INFORMATIVE_SECTIONS: [&str; 5] = [
    APPLICATION_INI,
    HEADERS,
    BUILDPROPS,
    KERNEL_VERSION,
    PROCESSES_RUNNING,
];

/// Whether a section may need human review before certification passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionSeverity {
    Informative,
    Actionable,
}

/// Per-context diff kinds, in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiffKind {
    UnexpectedWebidlResults,
    AddedWebidlResults,
    MissingWebidlResults,
    AddedWindowFunctions,
    MissingWindowFunctions,
}

impl DiffKind {
    pub const ALL: [DiffKind; 5] = [
        DiffKind::UnexpectedWebidlResults,
        DiffKind::AddedWebidlResults,
        DiffKind::MissingWebidlResults,
        DiffKind::AddedWindowFunctions,
        DiffKind::MissingWindowFunctions,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DiffKind::UnexpectedWebidlResults => "unexpected_webidl_results",
            DiffKind::AddedWebidlResults => "added_webidl_results",
            DiffKind::MissingWebidlResults => "missing_webidl_results",
            DiffKind::AddedWindowFunctions => "added_window_functions",
            DiffKind::MissingWindowFunctions => "missing_window_functions",
        }
    }
}

/// `<context>_<diff-kind>`, e.g. `certified_added_window_functions`
pub fn context_section_name(context: Context, kind: DiffKind) -> String {
    format!("{}_{}", context.as_str(), kind.as_str())
}

/// Inverse of [`context_section_name`].
pub fn parse_context_section(name: &str) -> Option<(Context, DiffKind)> {
    let (prefix, rest) = name.split_once('_')?;
    let context: Context = prefix.parse().ok()?;
    DiffKind::ALL
        .into_iter()
        .find(|k| k.as_str() == rest)
        .map(|k| (context, k))
}

/// Static severity table keyed by section name.
///
/// Names outside the informative list are actionable.
pub fn section_severity(name: &str) -> SectionSeverity {
    if INFORMATIVE_SECTIONS.contains(&name) {
        SectionSeverity::Informative
    } else {
        SectionSeverity::Actionable
    }
}

/// Position of a section in the canonical document order.
pub fn canonical_rank(name: &str) -> Option<usize> {
    if let Some(pos) = INFORMATIVE_SECTIONS.iter().position(|s| *s == name) {
        return Some(pos);
    }
    let (context, kind) = parse_context_section(name)?;
    let ctx_pos = Context::ALL.iter().position(|c| *c == context)?;
    let kind_pos = DiffKind::ALL.iter().position(|k| *k == kind)?;
    Some(INFORMATIVE_SECTIONS.len() + ctx_pos * DiffKind::ALL.len() + kind_pos)
}
