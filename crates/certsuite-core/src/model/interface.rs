//! Interface surfaces: what the reference declares and what the device exposes.

use crate::model::context::Context;
use serde::{Deserialize, Serialize};

/// Kind of interface member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    Attribute,
    Operation,
    Constant,
}

impl MemberKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberKind::Attribute => "attribute",
            MemberKind::Operation => "operation",
            MemberKind::Constant => "constant",
        }
    }
}

/// Result code of a runtime assertion probe.
///
/// Codes outside the known set are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProbeResult {
    Pass,
    Fail,
    Timeout,
    Error,
    NotRun,
    Other(String),
}

impl ProbeResult {
    pub fn as_str(&self) -> &str {
        match self {
            ProbeResult::Pass => "PASS",
            ProbeResult::Fail => "FAIL",
            ProbeResult::Timeout => "TIMEOUT",
            ProbeResult::Error => "ERROR",
            ProbeResult::NotRun => "NOTRUN",
            ProbeResult::Other(code) => code,
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, ProbeResult::Pass)
    }
}

impl From<String> for ProbeResult {
    fn from(code: String) -> Self {
        match code.as_str() {
            "PASS" => ProbeResult::Pass,
            "FAIL" => ProbeResult::Fail,
            "TIMEOUT" => ProbeResult::Timeout,
            "ERROR" => ProbeResult::Error,
            "NOTRUN" => ProbeResult::NotRun,
            _ => ProbeResult::Other(code),
        }
    }
}

impl From<ProbeResult> for String {
    fn from(result: ProbeResult) -> Self {
        match result {
            ProbeResult::Other(code) => code,
            known => known.as_str().to_string(),
        }
    }
}

/// Outcome of the assertion probe run against one interface or member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeOutcome {
    pub result: ProbeResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ProbeOutcome {
    pub fn pass() -> Self {
        Self {
            result: ProbeResult::Pass,
            message: None,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            result: ProbeResult::Fail,
            message: Some(message.into()),
        }
    }
}

/// A member declared by an interface-description source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredMember {
    pub name: String,
    pub kind: MemberKind,
    /// Argument types, operations only
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<String>,
    /// Least-privileged context the member is exposed to
    pub context: Context,
}

/// An interface declared by the reference build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceDeclaration {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Least-privileged context the interface is exposed to
    pub context: Context,
    pub members: Vec<DeclaredMember>,
}

impl InterfaceDeclaration {
    pub fn is_exposed_in(&self, context: Context) -> bool {
        context.exposes(self.context)
    }

    /// Members visible from `context`
    pub fn members_in(&self, context: Context) -> impl Iterator<Item = &DeclaredMember> {
        self.members
            .iter()
            .filter(move |m| context.exposes(m.context))
    }
}

/// A member observed by probing the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedMember {
    pub name: String,
    pub kind: MemberKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<String>,
    /// Absent probe means presence was observed without an assertion run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probe: Option<ProbeOutcome>,
}

/// An interface observed by probing the device in one context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedInterface {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probe: Option<ProbeOutcome>,
    #[serde(default)]
    pub members: Vec<ObservedMember>,
}

impl ObservedInterface {
    pub fn member(&self, name: &str) -> Option<&ObservedMember> {
        self.members.iter().find(|m| m.name == name)
    }
}

/// Label of an interface-level probe, in the format the test harness reports.
pub fn interface_probe_label(interface: &str) -> String {
    format!(
        "{} interface: existence and properties of interface object",
        interface
    )
}

/// Label of a member probe, e.g. `HTMLMediaElement interface: attribute textTracks`.
pub fn member_probe_label(
    interface: &str,
    kind: MemberKind,
    name: &str,
    arguments: &[String],
) -> String {
    match kind {
        MemberKind::Attribute => format!("{} interface: attribute {}", interface, name),
        MemberKind::Operation => format!(
            "{} interface: operation {}({})",
            interface,
            name,
            arguments.join(", ")
        ),
        MemberKind::Constant => format!(
            "{} interface: constant {} on interface object",
            interface, name
        ),
    }
}

/// A declared entry that the device does not satisfy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnexpectedResult {
    pub message: String,
    pub name: String,
    pub result: String,
}

/// Interface surface differences for one context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceDiffResult {
    pub context: Context,
    pub unexpected: Vec<UnexpectedResult>,
    pub added: Vec<String>,
    pub missing: Vec<String>,
}

impl InterfaceDiffResult {
    pub fn empty(context: Context) -> Self {
        Self {
            context,
            unexpected: Vec::new(),
            added: Vec::new(),
            missing: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.unexpected.is_empty() && self.added.is_empty() && self.missing.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_labels() {
        assert_eq!(
            member_probe_label("HTMLMediaElement", MemberKind::Attribute, "textTracks", &[]),
            "HTMLMediaElement interface: attribute textTracks"
        );
        assert_eq!(
            member_probe_label(
                "HTMLMediaElement",
                MemberKind::Operation,
                "canPlayType",
                &["DOMString".to_string()]
            ),
            "HTMLMediaElement interface: operation canPlayType(DOMString)"
        );
        assert_eq!(
            member_probe_label("Node", MemberKind::Constant, "ELEMENT_NODE", &[]),
            "Node interface: constant ELEMENT_NODE on interface object"
        );
    }

    #[test]
    fn test_probe_result_wire_names() {
        let json = serde_json::to_string(&ProbeResult::NotRun).unwrap();
        assert_eq!(json, "\"NOTRUN\"");
        let parsed: ProbeResult = serde_json::from_str("\"TIMEOUT\"").unwrap();
        assert_eq!(parsed, ProbeResult::Timeout);
        let parsed: ProbeResult = serde_json::from_str("\"PRECONDITION_FAILED\"").unwrap();
        assert_eq!(parsed, ProbeResult::Other("PRECONDITION_FAILED".to_string()));
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"PRECONDITION_FAILED\"");
    }

    #[test]
    fn test_members_in_filters_by_context() {
        let decl = InterfaceDeclaration {
            name: "Navigator".to_string(),
            parent: None,
            context: Context::Web,
            members: vec![
                DeclaredMember {
                    name: "userAgent".to_string(),
                    kind: MemberKind::Attribute,
                    arguments: vec![],
                    context: Context::Web,
                },
                DeclaredMember {
                    name: "mozContacts".to_string(),
                    kind: MemberKind::Attribute,
                    arguments: vec![],
                    context: Context::Certified,
                },
            ],
        };
        let web: Vec<_> = decl.members_in(Context::Web).map(|m| &m.name).collect();
        assert_eq!(web, vec!["userAgent"]);
        assert_eq!(decl.members_in(Context::Certified).count(), 2);
    }
}
