// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The entry point for running requested tests in order.
//!
//! A [`TestExecutor`] owns a [`Registry`]. [`TestExecutor::execute`] hands the registry's units,
//! filter and comparator to a [`TestEngine`], measures each test with a [`TimingListener`], and
//! reconciles the engine's report into one [`TestResult`](crate::result::TestResult) per
//! requested test.

use crate::{
    config::HarnessConfig,
    engine::{RunRequest, TestEngine},
    errors::{RegistryBuildError, TestIdError},
    reconcile::reconcile,
    registry::{MissingTestPolicy, Registry},
    result::TestResults,
    silence::SilencedOutput,
    test_id::{TestId, UnitRef, UnitResolver},
    timing::TimingListener,
};
use tracing::debug;

/// Runs a fixed set of requested tests through an engine.
#[derive(Clone, Debug)]
pub struct TestExecutor {
    registry: Registry,
    suppress_output: bool,
}

impl TestExecutor {
    /// Creates an executor for the given registry.
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            suppress_output: true,
        }
    }

    /// Creates an executor for already-resolved tests.
    pub fn from_tests(tests: impl IntoIterator<Item = TestId>) -> Self {
        Self::new(Registry::from_tests(tests))
    }

    /// Creates an executor for a single test.
    pub fn single(test: TestId) -> Self {
        Self::from_tests([test])
    }

    /// Creates an executor for a single test named by a fully qualified `unit.method` string.
    pub fn singleton<R>(resolver: &R, full_name: &str) -> Result<Self, TestIdError>
    where
        R: UnitResolver + ?Sized,
    {
        Ok(Self::single(TestId::resolve(resolver, full_name)?))
    }

    /// Creates an executor for a single test named by a unit name and a method.
    pub fn singleton_in_unit<R>(
        resolver: &R,
        unit_name: &str,
        method: &str,
    ) -> Result<Self, TestIdError>
    where
        R: UnitResolver + ?Sized,
    {
        Ok(Self::single(TestId::resolve_in_unit(
            resolver, unit_name, method,
        )?))
    }

    /// Creates an executor for a single method of an already-resolved unit.
    pub fn singleton_for_unit(unit: UnitRef, method: impl Into<String>) -> Self {
        Self::single(TestId::new(unit, method))
    }

    /// Creates an executor for the given names in order, failing if any of them can't be resolved.
    pub fn test_order<R, I>(resolver: &R, names: I) -> Result<Self, RegistryBuildError>
    where
        R: UnitResolver + ?Sized,
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        Ok(Self::new(Registry::strict(resolver, names)?))
    }

    /// Creates an executor for the given names in order, recording the ones that can't be resolved
    /// as missing.
    pub fn skip_missing<R, I>(resolver: &R, names: I) -> Self
    where
        R: UnitResolver + ?Sized,
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        Self::new(Registry::skip_missing(resolver, names))
    }

    /// Creates an executor for the given names as directed by `config`.
    pub fn from_config<R, I>(
        resolver: &R,
        names: I,
        config: &HarnessConfig,
    ) -> Result<Self, RegistryBuildError>
    where
        R: UnitResolver + ?Sized,
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let registry = match config.missing_tests {
            MissingTestPolicy::Skip => Registry::skip_missing(resolver, names),
            MissingTestPolicy::Fail => Registry::strict(resolver, names)?,
        };
        Ok(Self::new(registry).suppress_output(config.suppress_output))
    }

    /// Sets whether stdout and stderr are silenced while the engine runs. Defaults to true.
    pub fn suppress_output(mut self, suppress_output: bool) -> Self {
        self.suppress_output = suppress_output;
        self
    }

    /// Returns the registry of requested tests.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Runs the requested tests and returns one result per requested name.
    ///
    /// Test failures are reported as results, never as errors.
    pub fn execute<E>(&self, engine: &mut E) -> TestResults
    where
        E: TestEngine + ?Sized,
    {
        let request = RunRequest::new(&self.registry);
        debug!(
            "running {} tests from {} units: {}",
            self.registry.len(),
            request.units().len(),
            request.filter(),
        );

        let listener = TimingListener::new();
        let report = {
            let _silenced = self.suppress_output.then(SilencedOutput::acquire).flatten();
            engine.run(&request, &listener)
        };

        reconcile(&self.registry, &report, &listener.into_timings())
    }
}
