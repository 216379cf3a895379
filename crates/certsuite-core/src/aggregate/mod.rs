//! Result aggregation.
//!
//! Turns the outputs of the bundle, interface and global-object differs into
//! the normalized document consumed by the report renderer. Section severity
//! is a property of the section name (see [`sections::section_severity`]),
//! never of its content.

pub mod aggregator;
pub mod model;
pub mod sections;

pub use aggregator::{aggregate, AggregationInput, AggregationOutcome};
pub use model::{AggregatedResult, Section, SectionPayload};
pub use sections::{section_severity, SectionSeverity};
