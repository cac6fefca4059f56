// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The boundary with the external test-execution engine.
//!
//! dt-runner does not discover or invoke tests itself. Instead, a [`TestEngine`] loads the units
//! named in a [`RunRequest`], selects and orders tests using the request's
//! [`OrderFilter`] and [`OrderComparator`], reports progress to a [`TestListener`], and returns a
//! [`RunReport`] describing what failed.

use crate::{
    ordering::{OrderComparator, OrderFilter},
    registry::Registry,
    result::FailureDetail,
    test_id::UnitRef,
};
use std::fmt;

/// The engine's description of a single test.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct TestDescription {
    unit: String,
    method: String,
    full_name: String,
}

impl TestDescription {
    /// Creates a new description from a unit name and a method name.
    pub fn new(unit: impl Into<String>, method: impl Into<String>) -> Self {
        let unit = unit.into();
        let method = method.into();
        let full_name = format!("{unit}.{method}");
        Self {
            unit,
            method,
            full_name,
        }
    }

    /// Returns the name of the unit containing this test.
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Returns the method name.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Returns the fully qualified `unit.method` name.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }
}

impl fmt::Display for TestDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name)
    }
}

/// What a [`Failure`] applies to.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FailureScope {
    /// A single test failed.
    Test(TestDescription),

    /// An entire unit failed, for example during initialization. Every test the unit was supposed
    /// to run is considered failed.
    Unit {
        /// The canonical name of the unit.
        name: String,
    },
}

/// A failure reported by the engine.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Failure {
    /// The test or unit that failed.
    pub scope: FailureScope,

    /// Details forwarded from the engine.
    pub detail: FailureDetail,
}

impl Failure {
    /// A failure of a single test.
    pub fn test(description: TestDescription, detail: FailureDetail) -> Self {
        Self {
            scope: FailureScope::Test(description),
            detail,
        }
    }

    /// A failure of an entire unit.
    pub fn unit(name: impl Into<String>, detail: FailureDetail) -> Self {
        Self {
            scope: FailureScope::Unit { name: name.into() },
            detail,
        }
    }
}

/// The engine's summary of a run: the failures it observed, in the order it observed them.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RunReport {
    failures: Vec<Failure>,
}

impl RunReport {
    /// Creates a new report from a list of failures.
    pub fn new(failures: Vec<Failure>) -> Self {
        Self { failures }
    }

    /// Returns the failures in report order.
    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }
}

impl FromIterator<Failure> for RunReport {
    fn from_iter<I: IntoIterator<Item = Failure>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Receives per-test lifecycle notifications from the engine.
///
/// Engines may deliver notifications from any thread, and notifications for different tests may
/// interleave.
pub trait TestListener: Send + Sync {
    /// Called when a test starts.
    fn test_started(&self, test: &TestDescription);

    /// Called when a test finishes, whether it passed or failed.
    fn test_finished(&self, test: &TestDescription);
}

/// A request to run the tests in a [`Registry`].
#[derive(Clone, Debug)]
pub struct RunRequest<'a> {
    units: Vec<&'a UnitRef>,
    filter: OrderFilter<'a>,
    comparator: OrderComparator<'a>,
}

impl<'a> RunRequest<'a> {
    /// Creates a request covering every unit referenced by `registry`.
    pub fn new(registry: &'a Registry) -> Self {
        Self {
            units: registry.units().collect(),
            filter: OrderFilter::new(registry),
            comparator: OrderComparator::new(registry),
        }
    }

    /// Returns the units to load. Units are loaded wholesale; the filter narrows them down.
    pub fn units(&self) -> &[&'a UnitRef] {
        &self.units
    }

    /// Returns the selection predicate.
    pub fn filter(&self) -> &OrderFilter<'a> {
        &self.filter
    }

    /// Returns the ordering hint.
    pub fn comparator(&self) -> &OrderComparator<'a> {
        &self.comparator
    }

    /// Applies the filter and the comparator to a list of tests the engine found in the loaded
    /// units.
    ///
    /// Engines that schedule tests themselves can use this to honor the request.
    pub fn select_and_sort(
        &self,
        tests: impl IntoIterator<Item = TestDescription>,
    ) -> Vec<TestDescription> {
        let mut selected: Vec<_> = tests
            .into_iter()
            .filter(|test| self.filter.should_run(test))
            .collect();
        // All remaining tests are registered, so the comparator is a total order here.
        selected.sort_by(|a, b| self.comparator.compare(a, b));
        selected
    }
}

/// An external test-execution engine.
pub trait TestEngine {
    /// Loads the requested units and runs the selected tests, notifying `listener` as tests start
    /// and finish.
    fn run(&mut self, request: &RunRequest<'_>, listener: &dyn TestListener) -> RunReport;
}

impl<E: TestEngine + ?Sized> TestEngine for &mut E {
    fn run(&mut self, request: &RunRequest<'_>, listener: &dyn TestListener) -> RunReport {
        (**self).run(request, listener)
    }
}
