//! Per-subsuite test outcomes.
//!
//! Built either directly or from the line-oriented JSON structured log each
//! subsuite writes while it runs (`{"action": "test_start", ...}` per line).

use crate::errors::ExError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Pass/fail status recorded per test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TestStatus {
    Pass,
    Fail,
}

/// Outcome of one test, with the messages of its failing assertions and of
/// any execution errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestOutcome {
    pub status: TestStatus,
    pub failures: Vec<String>,
    pub errors: Vec<String>,
}

impl TestOutcome {
    pub fn passed() -> Self {
        Self {
            status: TestStatus::Pass,
            failures: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn settle(&mut self) {
        self.status = if self.failures.is_empty() && self.errors.is_empty() {
            TestStatus::Pass
        } else {
            TestStatus::Fail
        };
    }
}

/// Everything one subsuite run reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubsuiteResults {
    pub name: String,
    pub tests: BTreeMap<String, TestOutcome>,
    /// Failures that prevented tests from running at all
    pub infrastructure_errors: Vec<String>,
}

const FAILING_STATUSES: [&str; 4] = ["FAIL", "TIMEOUT", "NOTRUN", "ASSERT"];
const ERROR_STATUSES: [&str; 2] = ["ERROR", "CRASH"];
const ERROR_LOG_LEVELS: [&str; 2] = ["ERROR", "CRITICAL"];

fn str_field<'a>(entry: &'a Value, key: &str) -> Option<&'a str> {
    entry.get(key).and_then(Value::as_str)
}

impl SubsuiteResults {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tests: BTreeMap::new(),
            infrastructure_errors: Vec::new(),
        }
    }

    /// Record a test outcome, replacing any earlier one for the same test
    pub fn record(&mut self, test: impl Into<String>, mut outcome: TestOutcome) {
        outcome.settle();
        self.tests.insert(test.into(), outcome);
    }

    pub fn record_infrastructure_error(&mut self, message: impl Into<String>) {
        self.infrastructure_errors.push(message.into());
    }

    /// Record an engine-level failure (e.g. collection failed before
    /// comparison could start).
    pub fn record_engine_error(&mut self, err: &ExError) {
        self.infrastructure_errors.push(err.to_string());
    }

    pub fn failed_count(&self) -> usize {
        self.tests
            .values()
            .filter(|t| !t.failures.is_empty())
            .count()
    }

    pub fn errored_count(&self) -> usize {
        self.tests.values().filter(|t| !t.errors.is_empty()).count()
    }

    /// Read a structured test log.
    ///
    /// Lines that are not JSON objects with an `action` key are ignored.
    /// `log` entries at ERROR/CRITICAL level, a log that never starts a
    /// suite, a missing `suite_end` and tests that never end are all
    /// recorded as infrastructure problems.
    pub fn from_structured_log(name: impl Into<String>, text: &str) -> Self {
        let mut results = SubsuiteResults::new(name);
        let mut open: BTreeMap<String, TestOutcome> = BTreeMap::new();
        let mut suite_started = false;
        let mut suite_ended = false;

        for line in text.lines() {
            let trimmed = line.trim();
            if !trimmed.starts_with('{') {
                continue;
            }
            let Ok(entry) = serde_json::from_str::<Value>(trimmed) else {
                continue;
            };
            let Some(action) = str_field(&entry, "action") else {
                continue;
            };

            match action {
                "suite_start" => suite_started = true,
                "suite_end" => suite_ended = true,
                "test_start" => {
                    if let Some(test) = str_field(&entry, "test") {
                        open.insert(test.to_string(), TestOutcome::passed());
                    }
                }
                "test_status" => {
                    let (Some(test), Some(status)) =
                        (str_field(&entry, "test"), str_field(&entry, "status"))
                    else {
                        continue;
                    };
                    let subtest = str_field(&entry, "subtest").unwrap_or(test);
                    let message = match str_field(&entry, "message") {
                        Some(m) => format!("{}: {}", subtest, m),
                        None => format!("{}: {}", subtest, status),
                    };
                    let outcome = open
                        .entry(test.to_string())
                        .or_insert_with(TestOutcome::passed);
                    if FAILING_STATUSES.contains(&status) {
                        outcome.failures.push(message);
                    } else if ERROR_STATUSES.contains(&status) {
                        outcome.errors.push(message);
                    }
                }
                "test_end" => {
                    let (Some(test), Some(status)) =
                        (str_field(&entry, "test"), str_field(&entry, "status"))
                    else {
                        continue;
                    };
                    let mut outcome = open.remove(test).unwrap_or_else(TestOutcome::passed);
                    let message = str_field(&entry, "message")
                        .map(str::to_string)
                        .unwrap_or_else(|| format!("test ended with {}", status));
                    if FAILING_STATUSES.contains(&status) {
                        outcome.failures.push(message);
                    } else if ERROR_STATUSES.contains(&status) {
                        outcome.errors.push(message);
                    }
                    results.record(test, outcome);
                }
                "log" => {
                    let level = str_field(&entry, "level").unwrap_or("");
                    if ERROR_LOG_LEVELS.contains(&level) {
                        let message = str_field(&entry, "message").unwrap_or("(no message)");
                        results.record_infrastructure_error(message);
                    }
                }
                _ => {}
            }
        }

        for (test, mut outcome) in open {
            outcome.errors.push("test did not finish".to_string());
            results.record(test, outcome);
        }
        if !suite_started {
            results.record_infrastructure_error("structured log never started a suite");
        } else if !suite_ended {
            results.record_infrastructure_error("structured log ended without suite_end");
        }
        results
    }
}
