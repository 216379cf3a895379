mod common;

use certsuite_core::diff::diff_bundles;
use certsuite_core::model::{BundleDiffEntry, DiffLine, ScriptBundle};
use common::bundle;

#[test]
fn test_changed_and_added_files_are_reported() {
    let reference = bundle(&[("a.js", "1"), ("b.js", "2")]);
    let device = bundle(&[("a.js", "1"), ("b.js", "3"), ("c.js", "4")]);

    let entries = diff_bundles(&reference, &device);

    let summary: Vec<(&str, &str)> = entries.iter().map(|e| (e.status(), e.path())).collect();
    assert_eq!(summary, vec![("changed", "b.js"), ("added", "c.js")]);
}

#[test]
fn test_identical_bundles_produce_no_entries() {
    let b = bundle(&[("a.js", "1"), ("modules/x.jsm", "let x = 1;\n")]);
    assert!(diff_bundles(&b, &b).is_empty());
}

#[test]
fn test_empty_reference_reports_every_file_added() {
    let device = bundle(&[("b.js", "2"), ("a.js", "1")]);
    let entries = diff_bundles(&ScriptBundle::new(), &device);
    assert_eq!(
        entries,
        vec![
            BundleDiffEntry::Added { path: "a.js".into() },
            BundleDiffEntry::Added { path: "b.js".into() },
        ]
    );
}

#[test]
fn test_removed_file_is_reported() {
    let reference = bundle(&[("gone.js", "x")]);
    let entries = diff_bundles(&reference, &ScriptBundle::new());
    assert_eq!(entries, vec![BundleDiffEntry::Removed { path: "gone.js".into() }]);
}

#[test]
fn test_changed_entry_carries_hunks_and_unified_text() {
    let reference = bundle(&[("app.js", "one\ntwo\nthree\n")]);
    let device = bundle(&[("app.js", "one\n2\nthree\n")]);

    let entries = diff_bundles(&reference, &device);
    let BundleDiffEntry::Changed {
        binary,
        hunks,
        unified,
        reference_digest,
        device_digest,
        ..
    } = &entries[0]
    else {
        panic!("expected a changed entry, got {:?}", entries[0]);
    };

    assert!(!binary);
    assert_ne!(reference_digest, device_digest);
    assert_eq!(reference_digest.len(), 64);
    assert_eq!(hunks.len(), 1);
    assert!(hunks[0].lines.contains(&DiffLine::Removed("two".into())));
    assert!(hunks[0].lines.contains(&DiffLine::Added("2".into())));
    assert!(unified.starts_with("--- a/app.js\n+++ b/app.js\n@@ -1,3 +1,3 @@\n"));
    assert!(unified.contains("\n-two\n+2\n"));
}

#[test]
fn test_non_utf8_content_is_binary() {
    let mut reference = ScriptBundle::new();
    reference.insert("icon.png", vec![0x89, 0x50, 0xff, 0x00]);
    let mut device = ScriptBundle::new();
    device.insert("icon.png", vec![0x89, 0x50, 0xfe, 0x00]);

    let entries = diff_bundles(&reference, &device);
    match &entries[0] {
        BundleDiffEntry::Changed {
            binary,
            hunks,
            unified,
            ..
        } => {
            assert!(binary);
            assert!(hunks.is_empty());
            assert_eq!(unified, "Binary files a/icon.png and b/icon.png differ\n");
        }
        other => panic!("expected changed entry, got {:?}", other),
    }
}

#[test]
fn test_entries_serialize_with_status_tag() {
    let entry = BundleDiffEntry::Added { path: "c.js".into() };
    let json = serde_json::to_value(&entry).unwrap();
    assert_eq!(json, serde_json::json!({"status": "added", "path": "c.js"}));
}
