//! Property tests for the differs and the aggregator.

mod common;

use certsuite_core::aggregate::{aggregate, AggregationInput};
use certsuite_core::diff::{diff_bundles, diff_global_objects, diff_interfaces};
use certsuite_core::model::{
    BundleDiffEntry, Context, DeclaredMember, GlobalObjectSet, InterfaceDeclaration, MemberKind,
    ObservedInterface, ObservedMember, ProbeOutcome, ProbeResult, ScriptBundle,
};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

fn bundle_strategy() -> impl Strategy<Value = ScriptBundle> {
    prop::collection::btree_map("[a-d]{1,2}\\.js", "[xyz\n]{0,8}", 0..6)
        .prop_map(|files| files.into_iter().collect())
}

fn global_set_strategy() -> impl Strategy<Value = GlobalObjectSet> {
    prop::collection::btree_set("window\\.[a-e]", 0..5).prop_map(|paths| paths.into_iter().collect())
}

fn context_strategy() -> impl Strategy<Value = Context> {
    prop_oneof![
        Just(Context::Web),
        Just(Context::Privileged),
        Just(Context::Certified)
    ]
}

fn probe_strategy() -> impl Strategy<Value = Option<ProbeOutcome>> {
    prop_oneof![
        Just(None),
        Just(Some(ProbeOutcome::pass())),
        Just(Some(ProbeOutcome::fail("assert_true failed"))),
        Just(Some(ProbeOutcome {
            result: ProbeResult::Timeout,
            message: None
        })),
    ]
}

fn declarations_strategy() -> impl Strategy<Value = Vec<InterfaceDeclaration>> {
    prop::collection::btree_map(
        "I[a-c]",
        (
            context_strategy(),
            prop::collection::btree_map("m[a-d]", context_strategy(), 0..4),
        ),
        0..4,
    )
    .prop_map(|interfaces| {
        interfaces
            .into_iter()
            .map(|(name, (context, members))| InterfaceDeclaration {
                name,
                parent: None,
                context,
                members: members
                    .into_iter()
                    .map(|(name, context)| DeclaredMember {
                        name,
                        kind: MemberKind::Attribute,
                        arguments: vec![],
                        context,
                    })
                    .collect(),
            })
            .collect()
    })
}

fn observed_strategy() -> impl Strategy<Value = Vec<ObservedInterface>> {
    prop::collection::btree_map(
        "I[a-c]",
        prop::collection::btree_map("m[a-d]", probe_strategy(), 0..4),
        0..4,
    )
    .prop_map(|interfaces| {
        interfaces
            .into_iter()
            .map(|(name, members)| ObservedInterface {
                name,
                probe: None,
                members: members
                    .into_iter()
                    .map(|(name, probe)| ObservedMember {
                        name,
                        kind: MemberKind::Attribute,
                        arguments: vec![],
                        probe,
                    })
                    .collect(),
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_bundle_diff_is_reflexive(b in bundle_strategy()) {
        prop_assert!(diff_bundles(&b, &b).is_empty());
    }

    #[test]
    fn prop_bundle_diff_partitions_paths(b1 in bundle_strategy(), b2 in bundle_strategy()) {
        let entries = diff_bundles(&b1, &b2);

        let mut seen = BTreeSet::new();
        for entry in &entries {
            prop_assert!(seen.insert(entry.path().to_string()), "path reported twice");
            let path = entry.path();
            match entry {
                BundleDiffEntry::Removed { .. } => {
                    prop_assert!(b1.contains(path) && !b2.contains(path));
                }
                BundleDiffEntry::Added { .. } => {
                    prop_assert!(!b1.contains(path) && b2.contains(path));
                }
                BundleDiffEntry::Changed { .. } => {
                    prop_assert!(b1.get(path).is_some() && b1.get(path) != b2.get(path));
                }
            }
        }
        for path in b1.paths().chain(b2.paths()) {
            let identical = b1.get(path).is_some() && b1.get(path) == b2.get(path);
            prop_assert_eq!(seen.contains(path), !identical);
        }

        let paths: Vec<&str> = entries.iter().map(|e| e.path()).collect();
        let mut sorted = paths.clone();
        sorted.sort();
        prop_assert_eq!(paths, sorted);
    }

    #[test]
    fn prop_global_diff_is_disjoint_and_complete(
        reference in global_set_strategy(),
        device in global_set_strategy(),
    ) {
        let result = diff_global_objects(Context::Web, &reference, &device);
        let added: BTreeSet<&str> = result.added.iter().map(String::as_str).collect();
        let missing: BTreeSet<&str> = result.missing.iter().map(String::as_str).collect();

        prop_assert!(added.is_disjoint(&missing));

        let common: BTreeSet<&str> = reference.iter().filter(|p| device.contains(p)).collect();
        let union: BTreeSet<&str> = reference.iter().chain(device.iter()).collect();
        let rebuilt: BTreeSet<&str> = added
            .iter()
            .chain(common.iter())
            .chain(missing.iter())
            .copied()
            .collect();
        prop_assert_eq!(rebuilt, union);
    }

    #[test]
    fn prop_interface_entries_land_in_one_list(
        context in context_strategy(),
        declared in declarations_strategy(),
        observed in observed_strategy(),
    ) {
        let result = diff_interfaces(context, &declared, &observed);

        // key every entry by the interface or member it names
        let mut owners: BTreeMap<String, usize> = BTreeMap::new();
        for name in result
            .unexpected
            .iter()
            .map(|u| u.name.clone())
            .chain(result.added.iter().cloned())
            .chain(result.missing.iter().cloned())
        {
            *owners.entry(name).or_default() += 1;
        }
        for (name, count) in owners {
            prop_assert_eq!(count, 1, "{} reported in more than one list", name);
        }
    }

    #[test]
    fn prop_aggregation_is_idempotent(
        b1 in bundle_strategy(),
        b2 in bundle_strategy(),
        reference in global_set_strategy(),
        device in global_set_strategy(),
    ) {
        let build = || AggregationInput {
            bundle_diff: Some(diff_bundles(&b1, &b2)),
            global_object_diffs: Context::ALL
                .iter()
                .map(|ctx| diff_global_objects(*ctx, &reference, &device))
                .collect(),
            informative: common::full_informative(),
            ..Default::default()
        };
        let first = aggregate(build()).result.to_json_bytes().unwrap();
        let second = aggregate(build()).result.to_json_bytes().unwrap();
        prop_assert_eq!(first, second);
    }
}
