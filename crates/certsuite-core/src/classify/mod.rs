//! Subsuite verdicts.

pub mod classifier;
pub mod results;

pub use classifier::{classify, Category};
pub use results::{SubsuiteResults, TestOutcome, TestStatus};
