//! Merge differ outputs and informative records into one result document.

use crate::aggregate::model::{AggregatedResult, Section, SectionPayload};
use crate::aggregate::sections::{
    context_section_name, DiffKind, APPLICATION_INI, BUILDPROPS, HEADERS, KERNEL_VERSION,
    OMNI_RESULT, PROCESSES_RUNNING,
};
use crate::errors::{CertError, ExError};
use crate::model::{
    BundleDiffEntry, GlobalObjectDiffResult, InformativeRecord, InformativeRecords,
    InterfaceDiffResult,
};
use crate::{log_op_end, log_op_start, log_warning};
use std::time::Instant;

/// Everything a comparison run produced, ready to be merged.
#[derive(Debug, Clone, Default)]
pub struct AggregationInput {
    /// `None` when no bundle comparison ran (e.g. an archive was malformed)
    pub bundle_diff: Option<Vec<BundleDiffEntry>>,
    pub interface_diffs: Vec<InterfaceDiffResult>,
    pub global_object_diffs: Vec<GlobalObjectDiffResult>,
    pub informative: InformativeRecords,
}

/// Aggregated document plus the non-fatal problems met while building it.
#[derive(Debug, Clone, Default)]
pub struct AggregationOutcome {
    pub result: AggregatedResult,
    pub warnings: Vec<ExError>,
}

fn push_names(sections: &mut Vec<Section>, name: String, names: Vec<String>) {
    if !names.is_empty() {
        sections.push(Section::new(name, SectionPayload::Names(names)));
    }
}

/// Merge every differ output into one [`AggregatedResult`].
///
/// Empty diffs are omitted entirely rather than emitted as empty
/// collections. A missing required informative section yields an
/// `IncompleteRun` warning; aggregation of everything else continues.
pub fn aggregate(input: AggregationInput) -> AggregationOutcome {
    let start = Instant::now();
    log_op_start!("aggregate");

    let mut sections: Vec<Section> = Vec::new();
    let mut warnings: Vec<ExError> = Vec::new();

    let AggregationInput {
        bundle_diff,
        interface_diffs,
        global_object_diffs,
        informative,
    } = input;

    match bundle_diff {
        Some(entries) if !entries.is_empty() => {
            sections.push(Section::new(OMNI_RESULT, SectionPayload::BundleDiff(entries)));
        }
        Some(_) => {}
        None => {
            if let Some(InformativeRecord(value)) = informative.omni_result {
                sections.push(Section::new(OMNI_RESULT, SectionPayload::Informative(value)));
            }
        }
    }

    let required = [
        (APPLICATION_INI, informative.application_ini),
        (HEADERS, informative.headers),
        (BUILDPROPS, informative.buildprops),
        (KERNEL_VERSION, informative.kernel_version),
        (PROCESSES_RUNNING, informative.processes_running),
    ];
    for (name, record) in required {
        match record {
            Some(InformativeRecord(value)) => {
                sections.push(Section::new(name, SectionPayload::Informative(value)));
            }
            None => {
                let warning: ExError = CertError::MissingInformativeSection {
                    section: name.to_string(),
                }
                .into();
                log_warning!("aggregate", warning);
                warnings.push(warning);
            }
        }
    }

    for diff in interface_diffs {
        let ctx = diff.context;
        if !diff.unexpected.is_empty() {
            sections.push(Section::new(
                context_section_name(ctx, DiffKind::UnexpectedWebidlResults),
                SectionPayload::Unexpected(diff.unexpected),
            ));
        }
        push_names(
            &mut sections,
            context_section_name(ctx, DiffKind::AddedWebidlResults),
            diff.added,
        );
        push_names(
            &mut sections,
            context_section_name(ctx, DiffKind::MissingWebidlResults),
            diff.missing,
        );
    }

    for diff in global_object_diffs {
        let ctx = diff.context;
        push_names(
            &mut sections,
            context_section_name(ctx, DiffKind::AddedWindowFunctions),
            diff.added,
        );
        push_names(
            &mut sections,
            context_section_name(ctx, DiffKind::MissingWindowFunctions),
            diff.missing,
        );
    }

    let result = AggregatedResult::from_sections(sections);
    log_op_end!(
        "aggregate",
        duration_ms = start.elapsed().as_millis() as u64,
        section_count = result.len() as u64,
        warning_count = warnings.len() as u64
    );

    AggregationOutcome { result, warnings }
}
