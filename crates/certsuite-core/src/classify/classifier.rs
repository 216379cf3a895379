use super::results::SubsuiteResults;
use crate::aggregate::AggregatedResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Overall verdict for one subsuite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Pass,
    PartialFail,
    Error,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Pass => "pass",
            Category::PartialFail => "partial_fail",
            Category::Error => "error",
        }
    }

    /// Colour shown next to the subsuite in reports
    pub fn indicator(&self) -> &'static str {
        match self {
            Category::Pass => "green",
            Category::PartialFail => "blue",
            Category::Error => "red",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Assign a category to a subsuite.
///
/// Error when anything prevented tests from running; PartialFail when a
/// test failed or the comparison result carries an actionable difference;
/// Pass otherwise. Informative-only differences never affect the verdict.
pub fn classify(results: &SubsuiteResults, aggregated: Option<&AggregatedResult>) -> Category {
    if !results.infrastructure_errors.is_empty() || results.errored_count() > 0 {
        return Category::Error;
    }
    let has_failures = results.failed_count() > 0;
    let has_actionable = aggregated.is_some_and(AggregatedResult::has_actionable_differences);
    if has_failures || has_actionable {
        Category::PartialFail
    } else {
        Category::Pass
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::results::TestOutcome;

    #[test]
    fn test_clean_run_is_pass() {
        let mut results = SubsuiteResults::new("webapi");
        results.record("webidl", TestOutcome::passed());
        assert_eq!(classify(&results, None), Category::Pass);
        assert_eq!(Category::Pass.indicator(), "green");
    }

    #[test]
    fn test_infrastructure_error_wins() {
        let mut results = SubsuiteResults::new("webapi");
        let mut failing = TestOutcome::passed();
        failing.failures.push("x".into());
        results.record("webidl", failing);
        results.record_infrastructure_error("device not found");
        assert_eq!(classify(&results, None), Category::Error);
        assert_eq!(Category::Error.indicator(), "red");
    }

    #[test]
    fn test_failure_is_partial() {
        let mut results = SubsuiteResults::new("webapi");
        let mut failing = TestOutcome::passed();
        failing.failures.push("x".into());
        results.record("webidl", failing);
        assert_eq!(classify(&results, None), Category::PartialFail);
        assert_eq!(Category::PartialFail.indicator(), "blue");
    }
}
