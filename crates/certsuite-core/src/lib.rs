//! Certsuite Core - device certification comparison engine
//!
//! This crate compares artifacts collected from a device under test against
//! a reference build and produces a normalized, reviewable result document:
//! - Artifact model and loaders (script bundles, WebIDL declarations,
//!   observed interface probes, global-object sets, informative records)
//! - Bundle, interface-surface and global-object differs
//! - Result aggregation with static section severities
//! - Subsuite categorisation (pass / partial fail / error)
//! - Run configuration, error facility and structured logging

pub mod aggregate;
pub mod artifacts;
pub mod classify;
pub mod config;
pub mod diff;
pub mod engine;
pub mod errors;
pub mod logging_facility;
pub mod model;

// Logging macros reach shared schema constants through this path
pub use certsuite_core_types;

// Re-export commonly used types
pub use aggregate::{AggregatedResult, Section, SectionPayload, SectionSeverity};
pub use classify::{classify, Category, SubsuiteResults};
pub use config::RunConfig;
pub use engine::{compare_loaded, run_comparison, ComparisonInputs, ComparisonOutcome};
pub use errors::{CertError, ExError, ExErrorKind, Result};
pub use model::{Context, GlobalObjectSet, InterfaceDeclaration, ObservedInterface, ScriptBundle};
