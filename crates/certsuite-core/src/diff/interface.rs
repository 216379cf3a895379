//! Interface surface comparison for a single privilege context.
//!
//! Granularity rules:
//! - a declared interface with no observation at all is `missing`;
//! - a declared member of an observed interface that is absent, exposed with
//!   a different kind, or whose probe did not `PASS` is `unexpected`;
//! - an observed interface or member with no declaration for this context is
//!   `added`.

use crate::model::interface::{interface_probe_label, member_probe_label};
use crate::model::{
    Context, DeclaredMember, InterfaceDeclaration, InterfaceDiffResult, MemberKind,
    ObservedInterface, ObservedMember, ProbeOutcome, ProbeResult, UnexpectedResult,
};
use std::collections::{BTreeMap, BTreeSet};

fn absent_member_message(kind: MemberKind, name: &str) -> String {
    match kind {
        MemberKind::Constant => format!(
            "assert_own_property: expected property \"{}\" missing",
            name
        ),
        MemberKind::Attribute | MemberKind::Operation => format!(
            "assert_true: The prototype object must have a property \"{}\" expected true got false",
            name
        ),
    }
}

fn probe_failure(label: String, probe: &ProbeOutcome) -> UnexpectedResult {
    let message = probe
        .message
        .clone()
        .unwrap_or_else(|| format!("probe reported {}", probe.result.as_str()));
    UnexpectedResult {
        message,
        name: label,
        result: probe.result.as_str().to_string(),
    }
}

/// Check one declared member against the observed interface.
fn check_member(
    interface: &str,
    declared: &DeclaredMember,
    observed: Option<&ObservedMember>,
) -> Option<UnexpectedResult> {
    let label = member_probe_label(interface, declared.kind, &declared.name, &declared.arguments);
    match observed {
        None => Some(UnexpectedResult {
            message: absent_member_message(declared.kind, &declared.name),
            name: label,
            result: ProbeResult::Fail.as_str().to_string(),
        }),
        Some(obs) if obs.kind != declared.kind => Some(UnexpectedResult {
            message: format!(
                "member \"{}\" is exposed as {}, declared as {}",
                declared.name,
                obs.kind.as_str(),
                declared.kind.as_str()
            ),
            name: label,
            result: ProbeResult::Fail.as_str().to_string(),
        }),
        Some(obs) => match &obs.probe {
            Some(probe) if !probe.result.is_pass() => Some(probe_failure(label, probe)),
            _ => None,
        },
    }
}

/// Compare the reference declarations visible in `context` against what the
/// device exposed in that context.
///
/// Entries in each list are ordered by interface name, then member name; an
/// interface-level entry precedes its members.
pub fn diff_interfaces(
    context: Context,
    declared: &[InterfaceDeclaration],
    observed: &[ObservedInterface],
) -> InterfaceDiffResult {
    // interface -> member name -> declaration (first declaration wins)
    let mut declared_map: BTreeMap<&str, BTreeMap<&str, &DeclaredMember>> = BTreeMap::new();
    for decl in declared.iter().filter(|d| d.is_exposed_in(context)) {
        let members = declared_map.entry(decl.name.as_str()).or_default();
        for member in decl.members_in(context) {
            members.entry(member.name.as_str()).or_insert(member);
        }
    }

    let mut observed_map: BTreeMap<&str, &ObservedInterface> = BTreeMap::new();
    for obs in observed {
        observed_map.entry(obs.name.as_str()).or_insert(obs);
    }

    let names: BTreeSet<&str> = declared_map
        .keys()
        .chain(observed_map.keys())
        .copied()
        .collect();

    let mut result = InterfaceDiffResult::empty(context);
    for name in names {
        match (declared_map.get(name), observed_map.get(name)) {
            (Some(_), None) => result.missing.push(name.to_string()),
            (None, Some(_)) => result.added.push(name.to_string()),
            (Some(members), Some(obs)) => {
                if let Some(probe) = obs.probe.as_ref().filter(|p| !p.result.is_pass()) {
                    result
                        .unexpected
                        .push(probe_failure(interface_probe_label(name), probe));
                }

                let observed_members: BTreeMap<&str, &ObservedMember> = obs
                    .members
                    .iter()
                    .rev()
                    .map(|m| (m.name.as_str(), m))
                    .collect();
                let member_names: BTreeSet<&str> = members
                    .keys()
                    .chain(observed_members.keys())
                    .copied()
                    .collect();

                for member_name in member_names {
                    match members.get(member_name) {
                        Some(decl) => {
                            let obs_member = observed_members.get(member_name).copied();
                            if let Some(entry) = check_member(name, decl, obs_member) {
                                result.unexpected.push(entry);
                            }
                        }
                        None => {
                            if let Some(obs_member) = observed_members.get(member_name) {
                                result.added.push(member_probe_label(
                                    name,
                                    obs_member.kind,
                                    &obs_member.name,
                                    &obs_member.arguments,
                                ));
                            }
                        }
                    }
                }
            }
            (None, None) => {}
        }
    }
    result
}
