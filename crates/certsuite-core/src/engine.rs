//! Comparison entry points.
//!
//! [`run_comparison`] loads every configured artifact and hands the loaded
//! corpora to [`compare_loaded`], which runs one differ per
//! (artifact kind, context) pair on scoped threads and aggregates the
//! results. Loading failures never abort a run: malformed artifacts become
//! warnings and uncollected device artifacts become infrastructure errors.

use crate::aggregate::{aggregate, AggregatedResult, AggregationInput};
use crate::artifacts::{
    load_bundle, load_global_objects, load_informative, load_observed, WebIdlCorpus,
};
use crate::certsuite_core_types::RunId;
use crate::classify::SubsuiteResults;
use crate::config::RunConfig;
use crate::diff::{diff_bundles, diff_global_objects, diff_interfaces};
use crate::errors::{CertError, ExError, ExErrorKind, Result};
use crate::model::{
    Context, GlobalObjectSet, InformativeRecord, InformativeRecords, InterfaceDeclaration,
    ObservedInterface, ScriptBundle,
};
use crate::{log_op_end, log_op_error, log_op_start, log_warning};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

/// Already-loaded corpora for one comparison run.
#[derive(Debug, Clone, Default)]
pub struct ComparisonInputs {
    pub reference_bundle: Option<ScriptBundle>,
    pub device_bundle: Option<ScriptBundle>,
    /// Reference interface declarations, shared by every context
    pub declarations: Vec<InterfaceDeclaration>,
    /// Device observations per context
    pub observed: BTreeMap<Context, Vec<ObservedInterface>>,
    pub global_objects_reference: BTreeMap<Context, GlobalObjectSet>,
    pub global_objects_device: BTreeMap<Context, GlobalObjectSet>,
    pub informative: InformativeRecords,
}

/// Result document plus everything that went wrong on the way.
#[derive(Debug, Clone)]
pub struct ComparisonOutcome {
    pub run_id: RunId,
    pub result: AggregatedResult,
    /// Non-fatal problems (malformed artifacts, incomplete run)
    pub warnings: Vec<ExError>,
    /// Collection failures; these turn the subsuite verdict into Error
    pub infrastructure_errors: Vec<ExError>,
}

impl ComparisonOutcome {
    /// Forward infrastructure errors to a subsuite's results for classification.
    pub fn record_into(&self, results: &mut SubsuiteResults) {
        for err in &self.infrastructure_errors {
            results.record_engine_error(err);
        }
    }
}

fn panicked(op: &str) -> ExError {
    ExError::new(ExErrorKind::Internal)
        .with_op(op)
        .with_message("differ thread panicked")
}

fn one_sided(op: &str, context: Option<Context>, message: &str) -> ExError {
    let err = ExError::new(ExErrorKind::IncompleteRun)
        .with_op(op)
        .with_message(message);
    match context {
        Some(ctx) => err.with_context(ctx.as_str()),
        None => err,
    }
}

/// Compare already-loaded corpora. Performs no I/O.
pub fn compare_loaded(inputs: ComparisonInputs) -> Result<ComparisonOutcome> {
    compare_with_run_id(inputs, RunId::new())
}

fn compare_with_run_id(inputs: ComparisonInputs, run_id: RunId) -> Result<ComparisonOutcome> {
    let start = Instant::now();
    log_op_start!("compare_loaded", run_id = %run_id);

    let ComparisonInputs {
        reference_bundle,
        device_bundle,
        declarations,
        observed,
        global_objects_reference,
        global_objects_device,
        informative,
    } = inputs;
    let mut warnings: Vec<ExError> = Vec::new();

    let bundles = match (reference_bundle, device_bundle) {
        (Some(reference), Some(device)) => Some((reference, device)),
        (None, None) => None,
        _ => {
            let warning = one_sided(
                "diff_bundles",
                None,
                "bundle comparison needs both a reference and a device bundle",
            );
            log_warning!("compare_loaded", warning);
            warnings.push(warning);
            None
        }
    };

    let mut global_pairs: Vec<(Context, &GlobalObjectSet, &GlobalObjectSet)> = Vec::new();
    for ctx in Context::ALL {
        match (
            global_objects_reference.get(&ctx),
            global_objects_device.get(&ctx),
        ) {
            (Some(reference), Some(device)) => global_pairs.push((ctx, reference, device)),
            (None, None) => {}
            _ => {
                let warning = one_sided(
                    "diff_global_objects",
                    Some(ctx),
                    "global-object comparison needs both a reference and a device set",
                );
                log_warning!("compare_loaded", warning);
                warnings.push(warning);
            }
        }
    }

    if declarations.is_empty() {
        for ctx in observed.keys() {
            let warning = one_sided(
                "diff_interfaces",
                Some(*ctx),
                "interface comparison needs reference declarations",
            );
            log_warning!("compare_loaded", warning);
            warnings.push(warning);
        }
    }

    let diffed = std::thread::scope(|s| {
        let bundle_job = bundles
            .as_ref()
            .map(|(reference, device)| s.spawn(move || diff_bundles(reference, device)));

        let declared = &declarations;
        let interface_jobs: Vec<_> = if declared.is_empty() {
            Vec::new()
        } else {
            observed
                .iter()
                .map(|(ctx, obs)| {
                    let ctx = *ctx;
                    s.spawn(move || diff_interfaces(ctx, declared, obs))
                })
                .collect()
        };

        let global_jobs: Vec<_> = global_pairs
            .iter()
            .map(|&(ctx, reference, device)| {
                s.spawn(move || diff_global_objects(ctx, reference, device))
            })
            .collect();

        // Join every handle before inspecting any result.
        let bundle_joined = bundle_job.map(|job| job.join());
        let interface_joined: Vec<_> = interface_jobs.into_iter().map(|job| job.join()).collect();
        let global_joined: Vec<_> = global_jobs.into_iter().map(|job| job.join()).collect();

        let bundle_diff = match bundle_joined {
            Some(joined) => Some(joined.map_err(|_| panicked("diff_bundles"))?),
            None => None,
        };
        let interface_diffs = interface_joined
            .into_iter()
            .map(|joined| joined.map_err(|_| panicked("diff_interfaces")))
            .collect::<Result<Vec<_>>>()?;
        let global_object_diffs = global_joined
            .into_iter()
            .map(|joined| joined.map_err(|_| panicked("diff_global_objects")))
            .collect::<Result<Vec<_>>>()?;

        Ok::<_, ExError>((bundle_diff, interface_diffs, global_object_diffs))
    });

    let (bundle_diff, interface_diffs, global_object_diffs) = match diffed {
        Ok(diffs) => diffs,
        Err(err) => {
            log_op_error!(
                "compare_loaded",
                err.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            return Err(err.with_run_id(run_id));
        }
    };

    let aggregated = aggregate(AggregationInput {
        bundle_diff,
        interface_diffs,
        global_object_diffs,
        informative,
    });
    warnings.extend(aggregated.warnings);
    let warnings: Vec<ExError> = warnings
        .into_iter()
        .map(|w| w.with_run_id(run_id.clone()))
        .collect();

    log_op_end!(
        "compare_loaded",
        duration_ms = start.elapsed().as_millis() as u64,
        run_id = %run_id,
        section_count = aggregated.result.len() as u64,
        warning_count = warnings.len() as u64
    );

    Ok(ComparisonOutcome {
        run_id,
        result: aggregated.result,
        warnings,
        infrastructure_errors: Vec::new(),
    })
}

/// Problems met while loading artifacts, split by severity.
#[derive(Debug, Default)]
struct LoadReport {
    warnings: Vec<ExError>,
    infrastructure_errors: Vec<ExError>,
}

impl LoadReport {
    fn absorb<T>(&mut self, op: &str, context: Option<Context>, loaded: Result<T>) -> Option<T> {
        match loaded {
            Ok(value) => Some(value),
            Err(err) => {
                let err = match context {
                    Some(ctx) => err.with_context(ctx.as_str()),
                    None => err,
                };
                log_warning!(op, err);
                if err.kind() == ExErrorKind::InfrastructureError {
                    self.infrastructure_errors.push(err);
                } else {
                    self.warnings.push(err);
                }
                None
            }
        }
    }
}

/// A device-side artifact that does not exist was never collected.
fn collected(path: &Path) -> Result<&Path> {
    if path.exists() {
        Ok(path)
    } else {
        Err(CertError::CollectionFailed {
            artifact: path.display().to_string(),
            reason: "artifact was not collected from the device".to_string(),
        }
        .into())
    }
}

fn load_record(report: &mut LoadReport, path: Option<&Path>) -> Option<InformativeRecord> {
    let path = path?;
    report.absorb("load_informative", None, load_informative(path))
}

/// Load every artifact named by `config` and compare.
pub fn run_comparison(config: &RunConfig) -> Result<ComparisonOutcome> {
    let start = Instant::now();
    let run_id = RunId::new();
    log_op_start!("run_comparison", run_id = %run_id);

    let mut report = LoadReport::default();
    let mut inputs = ComparisonInputs::default();

    if let Some(paths) = &config.bundle {
        inputs.reference_bundle = report.absorb("load_bundle", None, load_bundle(&paths.reference));
        inputs.device_bundle = report.absorb(
            "load_bundle",
            None,
            collected(&paths.device).and_then(load_bundle),
        );
    }

    // Interfaces are only compared against a complete declaration corpus.
    let mut corpus = WebIdlCorpus::new();
    let mut corpus_complete = true;
    for path in &config.webidl_declarations {
        if report.absorb("parse_webidl", None, corpus.add_file(path)).is_none() {
            corpus_complete = false;
        }
    }
    if corpus_complete {
        inputs.declarations = corpus.declarations();
    }

    for (ctx, path) in &config.webidl_observed {
        let loaded = collected(path).and_then(load_observed);
        if let Some(observed) = report.absorb("load_observed_interfaces", Some(*ctx), loaded) {
            inputs.observed.insert(*ctx, observed);
        }
    }

    for (ctx, path) in &config.global_objects_reference {
        let loaded = load_global_objects(path);
        if let Some(set) = report.absorb("load_global_objects", Some(*ctx), loaded) {
            inputs.global_objects_reference.insert(*ctx, set);
        }
    }
    for (ctx, path) in &config.global_objects_device {
        let loaded = collected(path).and_then(load_global_objects);
        if let Some(set) = report.absorb("load_global_objects", Some(*ctx), loaded) {
            inputs.global_objects_device.insert(*ctx, set);
        }
    }

    let paths = &config.informative;
    inputs.informative = InformativeRecords {
        omni_result: load_record(&mut report, paths.omni_result.as_deref()),
        application_ini: load_record(&mut report, paths.application_ini.as_deref()),
        headers: load_record(&mut report, paths.headers.as_deref()),
        buildprops: load_record(&mut report, paths.buildprops.as_deref()),
        kernel_version: load_record(&mut report, paths.kernel_version.as_deref()),
        processes_running: load_record(&mut report, paths.processes_running.as_deref()),
    };

    let mut outcome = compare_with_run_id(inputs, run_id.clone())?;
    let mut warnings: Vec<ExError> = report
        .warnings
        .into_iter()
        .map(|w| w.with_run_id(run_id.clone()))
        .collect();
    warnings.append(&mut outcome.warnings);
    outcome.warnings = warnings;
    outcome.infrastructure_errors = report
        .infrastructure_errors
        .into_iter()
        .map(|e| e.with_run_id(run_id.clone()))
        .collect();

    log_op_end!(
        "run_comparison",
        duration_ms = start.elapsed().as_millis() as u64,
        run_id = %run_id,
        warning_count = outcome.warnings.len() as u64
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::sections::OMNI_RESULT;

    fn bundle(files: &[(&str, &str)]) -> ScriptBundle {
        files
            .iter()
            .map(|(p, c)| (p.to_string(), c.as_bytes().to_vec()))
            .collect()
    }

    #[test]
    fn test_bundle_only_run() {
        let inputs = ComparisonInputs {
            reference_bundle: Some(bundle(&[("a.js", "1")])),
            device_bundle: Some(bundle(&[("a.js", "1"), ("c.js", "4")])),
            ..Default::default()
        };
        let outcome = compare_loaded(inputs).unwrap();
        assert!(outcome.result.contains(OMNI_RESULT));
        // five required informative sections were not supplied
        assert_eq!(outcome.warnings.len(), 5);
        assert!(outcome.infrastructure_errors.is_empty());
    }

    #[test]
    fn test_one_sided_bundle_warns() {
        let inputs = ComparisonInputs {
            reference_bundle: Some(bundle(&[("a.js", "1")])),
            ..Default::default()
        };
        let outcome = compare_loaded(inputs).unwrap();
        assert!(!outcome.result.contains(OMNI_RESULT));
        assert!(outcome
            .warnings
            .iter()
            .any(|w| w.op() == Some("diff_bundles")));
    }

    #[test]
    fn test_observations_without_declarations_warn_per_context() {
        let mut observed = BTreeMap::new();
        observed.insert(
            Context::Web,
            vec![ObservedInterface {
                name: "MozWifiManager".to_string(),
                probe: None,
                members: vec![],
            }],
        );
        observed.insert(Context::Certified, Vec::new());
        let inputs = ComparisonInputs {
            observed,
            ..Default::default()
        };

        let outcome = compare_loaded(inputs).unwrap();

        assert!(outcome.result.is_empty());
        let contexts: Vec<Option<&str>> = outcome
            .warnings
            .iter()
            .filter(|w| w.op() == Some("diff_interfaces"))
            .map(|w| {
                assert_eq!(w.kind(), ExErrorKind::IncompleteRun);
                w.context()
            })
            .collect();
        assert_eq!(contexts, vec![Some("web"), Some("certified")]);
    }
}
