//! Typed representations of the comparable corpora.

pub mod bundle;
pub mod context;
pub mod global_object;
pub mod informative;
pub mod interface;

pub use bundle::{BundleDiffEntry, DiffHunk, DiffLine, ScriptBundle};
pub use context::Context;
pub use global_object::{GlobalObjectDiffResult, GlobalObjectSet};
pub use informative::{InformativeRecord, InformativeRecords};
pub use interface::{
    DeclaredMember, InterfaceDeclaration, InterfaceDiffResult, MemberKind, ObservedInterface,
    ObservedMember, ProbeOutcome, ProbeResult, UnexpectedResult,
};
