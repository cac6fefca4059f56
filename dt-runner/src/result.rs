// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outcomes of requested tests.
//!
//! Every requested identifier ends up with exactly one [`TestResult`], collected into
//! [`TestResults`].

use crate::{test_id::TestId, timing::TestTiming};
use chrono::{DateTime, Local};
use indexmap::{IndexMap, map::Entry};
use std::time::Duration;
use tracing::error;

/// The outcome of a single requested test.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum TestStatus {
    /// The test ran and passed.
    Pass,

    /// The test failed or errored, either on its own or because its unit failed.
    ///
    /// Assertion failures and unexpected errors are not distinguished; the engine's
    /// [`FailureDetail`] carries whatever distinction it reported.
    Fail,

    /// The test could not be resolved and was never attempted.
    Missing,
}

impl TestStatus {
    /// Returns a short lowercase label for this status.
    pub fn as_str(self) -> &'static str {
        match self {
            TestStatus::Pass => "pass",
            TestStatus::Fail => "fail",
            TestStatus::Missing => "missing",
        }
    }
}

/// Failure information forwarded as-is from the engine.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct FailureDetail {
    /// The failure message, if any.
    pub message: Option<String>,

    /// The type of the exception or error that caused the failure, if known.
    pub exception_type: Option<String>,

    /// A stack trace or other longer description.
    pub trace: Option<String>,
}

impl FailureDetail {
    /// Creates a failure detail with just a message.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }
}

/// The final record for one requested test.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TestResult {
    name: String,
    status: TestStatus,
    duration: Duration,
    start_time: Option<DateTime<Local>>,
    test: Option<TestId>,
    failure: Option<FailureDetail>,
}

impl TestResult {
    pub(crate) fn missing(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Missing,
            duration: Duration::ZERO,
            start_time: None,
            test: None,
            failure: None,
        }
    }

    pub(crate) fn pass(test: &TestId, timing: &TestTiming) -> Self {
        Self {
            name: test.name().to_owned(),
            status: TestStatus::Pass,
            duration: timing.duration,
            start_time: Some(timing.start_time),
            test: Some(test.clone()),
            failure: None,
        }
    }

    /// A failing result. `timing` is `None` for unit-level failures.
    pub(crate) fn fail(test: &TestId, timing: Option<&TestTiming>, failure: FailureDetail) -> Self {
        Self {
            name: test.name().to_owned(),
            status: TestStatus::Fail,
            duration: timing.map_or(Duration::ZERO, |timing| timing.duration),
            start_time: timing.map(|timing| timing.start_time),
            test: Some(test.clone()),
            failure: Some(failure),
        }
    }

    /// Returns the requested fully qualified name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the outcome.
    pub fn status(&self) -> TestStatus {
        self.status
    }

    /// Returns the measured duration. Zero for missing tests and unit-level failures.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Returns the wall-clock time at which the test started, if it was measured.
    pub fn start_time(&self) -> Option<DateTime<Local>> {
        self.start_time
    }

    /// Returns the resolved identifier. `None` for missing tests.
    pub fn test(&self) -> Option<&TestId> {
        self.test.as_ref()
    }

    /// Returns the failure detail reported by the engine, for failing tests.
    pub fn failure(&self) -> Option<&FailureDetail> {
        self.failure.as_ref()
    }
}

/// The complete set of results for a run, keyed by requested name.
///
/// Equality ignores the order in which results were recorded.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TestResults {
    results: IndexMap<String, TestResult>,
}

impl TestResults {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Records a result. The first result recorded for a name wins.
    pub(crate) fn insert(&mut self, result: TestResult) {
        match self.results.entry(result.name.clone()) {
            Entry::Occupied(existing) => {
                error!(
                    "result for `{}` already recorded as {}, ignoring {}",
                    result.name,
                    existing.get().status.as_str(),
                    result.status.as_str(),
                );
            }
            Entry::Vacant(entry) => {
                entry.insert(result);
            }
        }
    }

    /// Returns the result for the given requested name.
    pub fn get(&self, name: &str) -> Option<&TestResult> {
        self.results.get(name)
    }

    /// Returns the number of results.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Returns true if there are no results.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Iterates over results in the order they were recorded.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &TestResult> + '_ {
        self.results.values()
    }

    /// Returns the number of results with the given status.
    pub fn count(&self, status: TestStatus) -> usize {
        self.iter().filter(|result| result.status == status).count()
    }

    /// Returns the number of passing tests.
    pub fn passed(&self) -> usize {
        self.count(TestStatus::Pass)
    }

    /// Returns the number of failing or erroring tests.
    pub fn failed(&self) -> usize {
        self.count(TestStatus::Fail)
    }

    /// Returns the number of missing tests.
    pub fn missing(&self) -> usize {
        self.count(TestStatus::Missing)
    }

    /// Returns all results sorted by name.
    pub fn into_sorted_vec(self) -> Vec<TestResult> {
        let mut results: Vec<_> = self.results.into_values().collect();
        results.sort_by(|a, b| a.name.cmp(&b.name));
        results
    }
}

impl<'a> IntoIterator for &'a TestResults {
    type Item = &'a TestResult;
    type IntoIter = indexmap::map::Values<'a, String, TestResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.values()
    }
}
