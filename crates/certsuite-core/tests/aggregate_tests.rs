mod common;

use certsuite_core::aggregate::{aggregate, AggregatedResult, AggregationInput, SectionPayload};
use certsuite_core::aggregate::{section_severity, SectionSeverity};
use certsuite_core::diff::{diff_bundles, diff_global_objects, diff_interfaces};
use certsuite_core::errors::ExErrorKind;
use certsuite_core::model::{Context, InformativeRecord, InterfaceDiffResult};
use common::{bundle, declared_attr, full_informative, globals, interface, observed};

fn sample_input() -> AggregationInput {
    let declared = vec![interface(
        "HTMLMediaElement",
        Context::Web,
        vec![declared_attr("textTracks", Context::Web)],
    )];
    let device = vec![observed("HTMLMediaElement", vec![])];
    AggregationInput {
        bundle_diff: Some(diff_bundles(
            &bundle(&[("a.js", "1"), ("b.js", "2")]),
            &bundle(&[("a.js", "1"), ("b.js", "3"), ("c.js", "4")]),
        )),
        interface_diffs: vec![
            diff_interfaces(Context::Web, &declared, &device),
            diff_interfaces(Context::Privileged, &declared, &device),
        ],
        global_object_diffs: vec![diff_global_objects(
            Context::Certified,
            &globals(&["window.alert"]),
            &globals(&["window.alert", "window.mozContacts"]),
        )],
        informative: full_informative(),
    }
}

#[test]
fn test_document_keys_follow_canonical_order() {
    let outcome = aggregate(sample_input());
    assert!(outcome.warnings.is_empty());

    let names: Vec<&str> = outcome
        .result
        .sections()
        .iter()
        .map(|s| s.name.as_str())
        .collect();
    assert_eq!(
        names,
        vec![
            "omni_result",
            "application_ini",
            "headers",
            "buildprops",
            "kernel_version",
            "processes_running",
            "web_unexpected_webidl_results",
            "privileged_unexpected_webidl_results",
            "certified_added_window_functions",
        ]
    );
}

#[test]
fn test_empty_diffs_are_omitted() {
    let outcome = aggregate(AggregationInput {
        bundle_diff: Some(Vec::new()),
        interface_diffs: vec![InterfaceDiffResult::empty(Context::Web)],
        global_object_diffs: vec![diff_global_objects(
            Context::Web,
            &globals(&["window.a"]),
            &globals(&["window.a"]),
        )],
        informative: full_informative(),
    });
    let names: Vec<&str> = outcome
        .result
        .sections()
        .iter()
        .map(|s| s.name.as_str())
        .collect();
    assert!(!names.contains(&"omni_result"));
    assert!(names.iter().all(|n| !n.starts_with("web_")));
    assert!(!outcome.result.has_actionable_differences());
}

#[test]
fn test_unexpected_entries_use_literal_keys() {
    let outcome = aggregate(sample_input());
    let json: serde_json::Value =
        serde_json::from_slice(&outcome.result.to_json_bytes().unwrap()).unwrap();
    let entry = &json["web_unexpected_webidl_results"][0];
    assert_eq!(entry["name"], "HTMLMediaElement interface: attribute textTracks");
    assert_eq!(entry["result"], "FAIL");
    assert!(entry["message"].is_string());
    assert_eq!(entry.as_object().unwrap().len(), 3);
}

#[test]
fn test_missing_required_section_is_a_warning() {
    let mut input = sample_input();
    input.informative.buildprops = None;

    let outcome = aggregate(input);

    assert_eq!(outcome.warnings.len(), 1);
    let warning = &outcome.warnings[0];
    assert_eq!(warning.kind(), ExErrorKind::IncompleteRun);
    assert_eq!(warning.section(), Some("buildprops"));
    assert!(!outcome.result.contains("buildprops"));
    assert!(outcome.result.contains("web_unexpected_webidl_results"));
}

#[test]
fn test_raw_omni_result_passes_through_without_bundles() {
    let mut input = sample_input();
    input.bundle_diff = None;
    input.informative.omni_result = Some(InformativeRecord(serde_json::json!({"omni": "skipped"})));

    let outcome = aggregate(input);
    let section = outcome.result.get("omni_result").unwrap();
    assert_eq!(section.severity, SectionSeverity::Informative);
    assert_eq!(
        section.payload,
        SectionPayload::Informative(serde_json::json!({"omni": "skipped"}))
    );
}

#[test]
fn test_severity_is_a_property_of_the_name() {
    assert_eq!(section_severity("omni_result"), SectionSeverity::Informative);
    assert_eq!(section_severity("kernel_version"), SectionSeverity::Informative);
    assert_eq!(
        section_severity("web_added_webidl_results"),
        SectionSeverity::Actionable
    );
    assert_eq!(
        section_severity("certified_missing_window_functions"),
        SectionSeverity::Actionable
    );
}

#[test]
fn test_aggregation_is_byte_identical_across_runs() {
    let first = aggregate(sample_input()).result.to_json_bytes().unwrap();
    let second = aggregate(sample_input()).result.to_json_bytes().unwrap();
    assert_eq!(first, second);
    assert!(first.ends_with(b"}\n"));
}

#[test]
fn test_document_digest_is_stable_and_round_trips() {
    let result = aggregate(sample_input()).result;
    let digest = result.document_digest().unwrap();
    assert_eq!(digest.len(), 64);

    let bytes = result.to_json_bytes().unwrap();
    let reread = AggregatedResult::from_json_bytes(&bytes).unwrap();
    assert_eq!(reread, result);
    assert_eq!(reread.document_digest().unwrap(), digest);
}

#[test]
fn test_malformed_document_is_invalid_input() {
    let err = AggregatedResult::from_json_bytes(b"[1, 2]").unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidInput);

    let err =
        AggregatedResult::from_json_bytes(br#"{"web_added_webidl_results": 42}"#).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidInput);
}
