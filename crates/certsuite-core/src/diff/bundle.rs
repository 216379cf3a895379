//! File-by-file comparison of two script bundles.

use crate::diff::line_diff::{diff_lines, render_unified};
use crate::model::{BundleDiffEntry, ScriptBundle};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;

fn digest(content: &[u8]) -> String {
    hex::encode(Sha256::digest(content))
}

fn changed_entry(path: &str, reference: &[u8], device: &[u8]) -> BundleDiffEntry {
    let reference_digest = digest(reference);
    let device_digest = digest(device);

    match (std::str::from_utf8(reference), std::str::from_utf8(device)) {
        (Ok(old), Ok(new)) => {
            let hunks = diff_lines(old, new);
            let unified = render_unified(path, old, new, &hunks);
            BundleDiffEntry::Changed {
                path: path.to_string(),
                reference_digest,
                device_digest,
                binary: false,
                hunks,
                unified,
            }
        }
        _ => BundleDiffEntry::Changed {
            path: path.to_string(),
            reference_digest,
            device_digest,
            binary: true,
            hunks: Vec::new(),
            unified: format!("Binary files a/{} and b/{} differ\n", path, path),
        },
    }
}

/// Compare the reference bundle against the device bundle.
///
/// Every path in either bundle is accounted for exactly once: reference-only
/// paths are `Removed`, device-only paths are `Added`, shared paths with
/// differing bytes are `Changed`, identical files produce no entry. Entries
/// are sorted by path.
pub fn diff_bundles(reference: &ScriptBundle, device: &ScriptBundle) -> Vec<BundleDiffEntry> {
    let paths: BTreeSet<&str> = reference.paths().chain(device.paths()).collect();

    paths
        .into_iter()
        .filter_map(|path| match (reference.get(path), device.get(path)) {
            (Some(_), None) => Some(BundleDiffEntry::Removed {
                path: path.to_string(),
            }),
            (None, Some(_)) => Some(BundleDiffEntry::Added {
                path: path.to_string(),
            }),
            (Some(old), Some(new)) if old != new => Some(changed_entry(path, old, new)),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_newline_change_is_reported() {
        let reference: ScriptBundle = [("a.js", "x")].into_iter().collect();
        let device: ScriptBundle = [("a.js", "x\n")].into_iter().collect();
        let entries = diff_bundles(&reference, &device);
        assert_eq!(entries.len(), 1);
        match &entries[0] {
            BundleDiffEntry::Changed { hunks, binary, .. } => {
                assert!(!binary);
                assert_eq!(hunks.len(), 1);
            }
            other => panic!("expected Changed, got {:?}", other),
        }
    }

    #[test]
    fn test_binary_content_skips_line_diff() {
        let reference: ScriptBundle = [("img.png", vec![0xff, 0x00])].into_iter().collect();
        let device: ScriptBundle = [("img.png", vec![0xff, 0x01])].into_iter().collect();
        match &diff_bundles(&reference, &device)[0] {
            BundleDiffEntry::Changed {
                binary,
                hunks,
                unified,
                reference_digest,
                device_digest,
                ..
            } => {
                assert!(binary);
                assert!(hunks.is_empty());
                assert!(unified.starts_with("Binary files"));
                assert_ne!(reference_digest, device_digest);
                assert_eq!(reference_digest.len(), 64);
            }
            other => panic!("expected Changed, got {:?}", other),
        }
    }
}
