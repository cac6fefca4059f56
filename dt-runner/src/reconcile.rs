// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turning an engine report into one result per requested test.

use crate::{
    engine::{FailureScope, RunReport},
    registry::Registry,
    result::{TestResult, TestResults},
    test_id::TestId,
    timing::TestTimings,
};
use indexmap::IndexMap;
use tracing::error;

/// Classifies every requested test as passing, failing or missing.
///
/// * Tests recorded as missing in the registry stay missing.
/// * A failure naming a single test marks that test as failed, with its measured duration.
/// * A failure naming a unit marks every still-unclassified test in that unit as failed, with zero
///   duration: the unit may never have started any of them.
/// * Every other registered test passed.
///
/// Events that refer to tests without a measured duration or without a registry entry are
/// inconsistencies between the engine and the registry. They are logged and skipped.
///
/// This is a pure function of its inputs.
pub fn reconcile(registry: &Registry, report: &RunReport, timings: &TestTimings) -> TestResults {
    let mut results = TestResults::new();
    for missing in registry.missing() {
        results.insert(missing.clone());
    }

    let mut candidates: IndexMap<&str, &TestId> =
        registry.tests().map(|test| (test.name(), test)).collect();

    for failure in report.failures() {
        match &failure.scope {
            FailureScope::Test(description) => {
                let name = description.full_name();
                let Some(timing) = timings.get(name) else {
                    error!("no running time measured for test `{name}`");
                    continue;
                };
                let Some(test) = candidates.shift_remove(name) else {
                    error!("no requested test found for failed test `{name}`");
                    continue;
                };
                results.insert(TestResult::fail(test, Some(timing), failure.detail.clone()));
            }
            FailureScope::Unit { name } => {
                candidates.retain(|_, test| {
                    if test.unit().name() == name {
                        results.insert(TestResult::fail(test, None, failure.detail.clone()));
                        false
                    } else {
                        true
                    }
                });
            }
        }
    }

    for (name, test) in candidates {
        let Some(timing) = timings.get(name) else {
            error!("no running time measured for test `{name}`");
            continue;
        };
        results.insert(TestResult::pass(test, timing));
    }

    results
}
