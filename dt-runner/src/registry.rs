// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The set of tests requested for a run.
//!
//! The main structure in this module is [`Registry`], which is created by a [`RegistryBuilder`].
//! A registry holds the resolved, compatible tests in the order they were requested, along with
//! the tests that could not be resolved (recorded up front as missing).

use crate::{
    errors::{DuplicateTestError, RegistryBuildError},
    result::TestResult,
    test_id::{TestId, UnitRef, UnitResolver},
};
use indexmap::{IndexMap, IndexSet};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{info, warn};

/// What to do with requested tests that cannot be resolved.
#[derive(Copy, Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum MissingTestPolicy {
    /// Record unresolvable tests as missing and keep going.
    ///
    /// This is the default.
    #[default]
    Skip,

    /// Fail the whole build on the first unresolvable test.
    Fail,
}

/// The tests requested for a run, in requested order.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    tests: Vec<TestId>,
    by_name: HashMap<String, usize>,
    units: IndexSet<UnitRef>,
    missing: IndexMap<String, TestResult>,
    excluded: IndexMap<String, TestId>,
}

impl Registry {
    /// Builds a registry from already-resolved tests.
    ///
    /// Incompatible tests are excluded and later duplicates are dropped, both with a warning.
    pub fn from_tests(tests: impl IntoIterator<Item = TestId>) -> Self {
        let mut builder = RegistryBuilder::new();
        for test in tests {
            if let Err(error) = builder.add_test(test) {
                warn!("{error}, keeping the first occurrence");
            }
        }
        builder.build()
    }

    /// Resolves a list of fully qualified names according to `policy`.
    ///
    /// Each test's order index is its position in `names`.
    pub fn from_names<R, I>(
        resolver: &R,
        names: I,
        policy: MissingTestPolicy,
    ) -> Result<Self, RegistryBuildError>
    where
        R: UnitResolver + ?Sized,
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        match policy {
            MissingTestPolicy::Skip => Ok(Self::skip_missing(resolver, names)),
            MissingTestPolicy::Fail => Self::strict(resolver, names),
        }
    }

    /// Resolves a list of names, recording the ones that fail to resolve as missing.
    pub fn skip_missing<R, I>(resolver: &R, names: I) -> Self
    where
        R: UnitResolver + ?Sized,
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut builder = RegistryBuilder::new();
        for name in names {
            builder.add_name_or_missing(resolver, name.as_ref());
        }
        builder.build()
    }

    /// Resolves a list of names, failing on the first one that cannot be resolved or that was
    /// already requested.
    pub fn strict<R, I>(resolver: &R, names: I) -> Result<Self, RegistryBuildError>
    where
        R: UnitResolver + ?Sized,
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut builder = RegistryBuilder::new();
        for name in names {
            builder.add_name(resolver, name.as_ref())?;
        }
        Ok(builder.build())
    }

    /// Returns the registered test with the given fully qualified name.
    pub fn get(&self, name: &str) -> Option<&TestId> {
        self.by_name.get(name).map(|&idx| &self.tests[idx])
    }

    /// Returns true if a test with the given fully qualified name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Iterates over registered tests in requested order.
    pub fn tests(&self) -> impl ExactSizeIterator<Item = &TestId> + '_ {
        self.tests.iter()
    }

    /// Iterates over the distinct units referenced by registered tests, in first-seen order.
    pub fn units(&self) -> impl ExactSizeIterator<Item = &UnitRef> + '_ {
        self.units.iter()
    }

    /// Iterates over the results for tests that could not be resolved.
    pub fn missing(&self) -> impl ExactSizeIterator<Item = &TestResult> + '_ {
        self.missing.values()
    }

    /// Iterates over tests that were excluded because their unit is incompatible with
    /// single-method execution.
    pub fn excluded(&self) -> impl ExactSizeIterator<Item = &TestId> + '_ {
        self.excluded.values()
    }

    /// Returns the number of registered tests.
    pub fn len(&self) -> usize {
        self.tests.len()
    }

    /// Returns true if no tests are registered.
    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }
}

/// A builder for [`Registry`] instances.
#[derive(Clone, Debug, Default)]
pub struct RegistryBuilder {
    registry: Registry,
    requested: usize,
}

impl RegistryBuilder {
    /// Creates a new, empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an already-resolved test.
    ///
    /// Tests in incompatible units are excluded with a warning, which is not an error. Returns an
    /// error if a test with the same name is already registered; the registry is left unchanged.
    pub fn add_test(&mut self, test: TestId) -> Result<&mut Self, DuplicateTestError> {
        if !test.is_compatible() {
            if !self.registry.excluded.contains_key(test.name()) {
                warn!(
                    "excluding `{}`: unit `{}` uses a custom runner",
                    test.name(),
                    test.unit().name(),
                );
                self.registry
                    .excluded
                    .insert(test.name().to_owned(), test);
            }
            return Ok(self);
        }

        if self.registry.contains(test.name()) {
            return Err(DuplicateTestError::new(test.name()));
        }

        let registry = &mut self.registry;
        registry
            .by_name
            .insert(test.name().to_owned(), registry.tests.len());
        registry.units.insert(test.unit().clone());
        registry.tests.push(test);
        Ok(self)
    }

    /// Resolves and adds a requested name, failing if it cannot be resolved or is a duplicate.
    ///
    /// The test's order index is the number of names requested before it.
    pub fn add_name<R>(
        &mut self,
        resolver: &R,
        name: &str,
    ) -> Result<&mut Self, RegistryBuildError>
    where
        R: UnitResolver + ?Sized,
    {
        let index = self.next_index();
        let test = TestId::resolve(resolver, name)?.with_index(index);
        Ok(self.add_test(test)?)
    }

    /// Resolves and adds a requested name, recording it as missing if it cannot be resolved.
    ///
    /// Duplicates are dropped with a warning; the first occurrence keeps its position.
    pub fn add_name_or_missing<R>(&mut self, resolver: &R, name: &str) -> &mut Self
    where
        R: UnitResolver + ?Sized,
    {
        let index = self.next_index();
        match TestId::resolve(resolver, name) {
            Ok(test) => {
                if let Err(error) = self.add_test(test.with_index(index)) {
                    warn!("{error}, keeping the first occurrence");
                }
            }
            Err(error) => {
                info!("skipped missing test `{name}`: {error}");
                self.registry
                    .missing
                    .entry(name.to_owned())
                    .or_insert_with(|| TestResult::missing(name));
            }
        }
        self
    }

    /// Finishes building the registry.
    pub fn build(self) -> Registry {
        self.registry
    }

    fn next_index(&mut self) -> usize {
        let index = self.requested;
        self.requested += 1;
        index
    }
}
