mod common;

use certsuite_core::aggregate::{aggregate, AggregationInput};
use certsuite_core::diff::diff_global_objects;
use certsuite_core::model::Context;
use common::globals;

#[test]
fn test_device_only_path_is_added() {
    let reference = globals(&["window.alert", "window.navigator"]);
    let device = globals(&["window.alert", "window.mozContacts", "window.navigator"]);

    let result = diff_global_objects(Context::Certified, &reference, &device);

    assert_eq!(result.added, vec!["window.mozContacts".to_string()]);
    assert!(result.missing.is_empty());
}

#[test]
fn test_reference_only_path_is_missing() {
    let reference = globals(&["window.b", "window.a", "window.c"]);
    let device = globals(&["window.b"]);

    let result = diff_global_objects(Context::Web, &reference, &device);

    assert_eq!(
        result.missing,
        vec!["window.a".to_string(), "window.c".to_string()]
    );
    assert!(result.added.is_empty());
}

#[test]
fn test_added_path_lands_in_certified_section_only() {
    let reference = globals(&["window.alert"]);
    let device = globals(&["window.alert", "window.mozContacts"]);
    let diff = diff_global_objects(Context::Certified, &reference, &device);

    let outcome = aggregate(AggregationInput {
        global_object_diffs: vec![diff],
        ..Default::default()
    });

    let json: serde_json::Value =
        serde_json::from_slice(&outcome.result.to_json_bytes().unwrap()).unwrap();
    assert_eq!(
        json["certified_added_window_functions"],
        serde_json::json!(["window.mozContacts"])
    );
    assert!(json.get("certified_missing_window_functions").is_none());
}
