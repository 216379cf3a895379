mod common;

use certsuite_core::aggregate::{aggregate, AggregationInput};
use certsuite_core::classify::{classify, Category, SubsuiteResults, TestOutcome, TestStatus};
use certsuite_core::diff::{diff_global_objects, diff_interfaces};
use certsuite_core::engine::{compare_loaded, ComparisonInputs};
use certsuite_core::model::{Context, InformativeRecord};
use common::{declared_attr, full_informative, globals, interface, observed};

fn passing_results() -> SubsuiteResults {
    let mut results = SubsuiteResults::new("webapi");
    results.record("webidl", TestOutcome::passed());
    results.record("window_functions", TestOutcome::passed());
    results
}

#[test]
fn test_clean_subsuite_passes() {
    let result = aggregate(AggregationInput {
        informative: full_informative(),
        ..Default::default()
    })
    .result;
    assert_eq!(classify(&passing_results(), Some(&result)), Category::Pass);
}

#[test]
fn test_failed_assertion_is_partial_fail() {
    let mut results = passing_results();
    let mut outcome = TestOutcome::passed();
    outcome.failures.push("Navigator interface: attribute mozApps".into());
    results.record("webidl", outcome);

    assert_eq!(results.tests["webidl"].status, TestStatus::Fail);
    assert_eq!(classify(&results, None), Category::PartialFail);
    assert_eq!(classify(&results, None).indicator(), "blue");
}

#[test]
fn test_actionable_section_is_partial_fail() {
    let declared = vec![interface(
        "HTMLMediaElement",
        Context::Web,
        vec![declared_attr("textTracks", Context::Web)],
    )];
    let result = aggregate(AggregationInput {
        interface_diffs: vec![diff_interfaces(
            Context::Web,
            &declared,
            &[observed("HTMLMediaElement", vec![])],
        )],
        informative: full_informative(),
        ..Default::default()
    })
    .result;

    assert_eq!(
        classify(&passing_results(), Some(&result)),
        Category::PartialFail
    );
}

#[test]
fn test_informative_only_differences_do_not_change_the_verdict() {
    let mut informative = full_informative();
    informative.omni_result = Some(InformativeRecord::text("omni.ja differs"));
    let result = aggregate(AggregationInput {
        informative,
        global_object_diffs: vec![diff_global_objects(
            Context::Web,
            &globals(&["window.a"]),
            &globals(&["window.a"]),
        )],
        ..Default::default()
    })
    .result;

    assert!(result.contains("omni_result"));
    assert_eq!(classify(&passing_results(), Some(&result)), Category::Pass);
}

#[test]
fn test_infrastructure_error_wins_over_failures() {
    let mut results = passing_results();
    let mut outcome = TestOutcome::passed();
    outcome.failures.push("x".into());
    results.record("webidl", outcome);
    results.record_infrastructure_error("adb: device offline");

    assert_eq!(classify(&results, None), Category::Error);
    assert_eq!(Category::Error.indicator(), "red");
}

#[test]
fn test_structured_log_classification() {
    let log = r#"{"action": "suite_start", "tests": ["webapi"], "time": 1}
{"action": "test_start", "test": "webapi/battery"}
{"action": "test_end", "test": "webapi/battery", "status": "PASS"}
{"action": "test_start", "test": "webapi/vibration"}
{"action": "test_end", "test": "webapi/vibration", "status": "FAIL", "message": "vibration did not stop"}
{"action": "suite_end"}
"#;
    let results = SubsuiteResults::from_structured_log("webapi", log);
    assert_eq!(results.tests.len(), 2);
    assert_eq!(results.tests["webapi/battery"].status, TestStatus::Pass);
    assert_eq!(
        results.tests["webapi/vibration"].failures,
        vec!["vibration did not stop".to_string()]
    );
    assert_eq!(classify(&results, None), Category::PartialFail);
}

#[test]
fn test_crashing_test_and_critical_log_are_errors() {
    let crash = r#"{"action": "suite_start"}
{"action": "test_start", "test": "t"}
{"action": "test_end", "test": "t", "status": "CRASH"}
{"action": "suite_end"}
"#;
    let results = SubsuiteResults::from_structured_log("webapi", crash);
    assert_eq!(results.errored_count(), 1);
    assert_eq!(classify(&results, None), Category::Error);

    let critical = r#"{"action": "suite_start"}
{"action": "log", "level": "CRITICAL", "message": "Encountered errors during run"}
{"action": "suite_end"}
"#;
    let results = SubsuiteResults::from_structured_log("webapi", critical);
    assert_eq!(
        results.infrastructure_errors,
        vec!["Encountered errors during run".to_string()]
    );
    assert_eq!(classify(&results, None), Category::Error);
}

#[test]
fn test_missing_suite_end_is_error() {
    let log = r#"{"action": "suite_start"}
{"action": "test_start", "test": "t"}
{"action": "test_end", "test": "t", "status": "PASS"}
"#;
    let results = SubsuiteResults::from_structured_log("webapi", log);
    assert_eq!(classify(&results, None), Category::Error);
}

#[test]
fn test_engine_infrastructure_errors_reach_the_classifier() {
    let mut outcome = compare_loaded(ComparisonInputs {
        informative: full_informative(),
        ..Default::default()
    })
    .unwrap();
    let mut results = passing_results();
    outcome.record_into(&mut results);
    assert_eq!(classify(&results, Some(&outcome.result)), Category::Pass);

    outcome.infrastructure_errors.push(
        certsuite_core::errors::CertError::CollectionFailed {
            artifact: "webidl_web.json".into(),
            reason: "marionette session lost".into(),
        }
        .into(),
    );
    outcome.record_into(&mut results);
    assert_eq!(classify(&results, Some(&outcome.result)), Category::Error);
}
