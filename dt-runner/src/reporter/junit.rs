// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Code to generate JUnit XML reports from test results.

use crate::{
    config::JunitConfig,
    errors::WriteJunitError,
    result::{TestResult, TestResults, TestStatus},
};
use indexmap::IndexMap;
use quick_junit::{NonSuccessKind, Report, TestCase, TestCaseStatus, TestSuite};
use std::{fs::File, time::Duration};

static MISSING_MESSAGE: &str = "test could not be resolved";
static MISSING_SUITE: &str = "@missing";

/// Writes [`TestResults`] as a JUnit XML report.
#[derive(Clone, Copy, Debug)]
pub struct JunitReporter<'cfg> {
    config: &'cfg JunitConfig,
}

impl<'cfg> JunitReporter<'cfg> {
    /// Creates a new reporter for the given config.
    pub fn new(config: &'cfg JunitConfig) -> Self {
        Self { config }
    }

    /// Builds the report without writing it.
    ///
    /// There is one test suite per unit. Missing tests are reported as skipped.
    pub fn to_report(&self, results: &TestResults) -> Report {
        let mut sorted: Vec<_> = results.iter().collect();
        sorted.sort_by(|a, b| a.name().cmp(b.name()));

        let mut test_suites: IndexMap<&str, TestSuite> = IndexMap::new();
        let mut total_time = Duration::ZERO;
        for result in sorted {
            let (suite_name, test_name) = suite_and_test_name(result);
            total_time += result.duration();
            test_suites
                .entry(suite_name)
                .or_insert_with(|| TestSuite::new(suite_name))
                .add_test_case(test_case(suite_name, test_name, result));
        }

        let mut report = Report::new(self.config.report_name.as_str());
        report
            .set_time(total_time)
            .add_test_suites(test_suites.into_values());
        if let Some(start_time) = results.iter().filter_map(TestResult::start_time).min() {
            report.set_timestamp(start_time);
        }
        report
    }

    /// Writes the report to the configured path.
    pub fn write(&self, results: &TestResults) -> Result<(), WriteJunitError> {
        let report = self.to_report(results);

        let junit_path = &self.config.path;
        if let Some(junit_dir) = junit_path.parent().filter(|dir| !dir.as_str().is_empty()) {
            std::fs::create_dir_all(junit_dir).map_err(|error| WriteJunitError::Fs {
                file: junit_dir.to_path_buf(),
                error,
            })?;
        }

        let f = File::create(junit_path).map_err(|error| WriteJunitError::Fs {
            file: junit_path.clone(),
            error,
        })?;
        report.serialize(f).map_err(|error| WriteJunitError::Junit {
            file: junit_path.clone(),
            error,
        })
    }
}

fn suite_and_test_name(result: &TestResult) -> (&str, &str) {
    match result.test() {
        Some(test) => (test.unit().name(), test.method()),
        None => result
            .name()
            .rsplit_once('.')
            .unwrap_or((MISSING_SUITE, result.name())),
    }
}

fn test_case(suite_name: &str, test_name: &str, result: &TestResult) -> TestCase {
    let status = match result.status() {
        TestStatus::Pass => TestCaseStatus::success(),
        TestStatus::Fail => {
            let mut status = TestCaseStatus::non_success(NonSuccessKind::Failure);
            if let Some(detail) = result.failure() {
                if let Some(message) = &detail.message {
                    status.set_message(message.as_str());
                }
                if let Some(ty) = &detail.exception_type {
                    status.set_type(ty.as_str());
                }
                if let Some(trace) = &detail.trace {
                    status.set_description(trace.as_str());
                }
            }
            status
        }
        TestStatus::Missing => {
            let mut status = TestCaseStatus::skipped();
            status.set_message(MISSING_MESSAGE);
            status
        }
    };

    let mut test_case = TestCase::new(test_name, status);
    test_case
        .set_classname(suite_name)
        .set_time(result.duration());
    if let Some(start_time) = result.start_time() {
        test_case.set_timestamp(start_time);
    }
    test_case
}
