// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identifiers for individual requested tests.
//!
//! A test is named by a fully qualified `unit.method` string. The unit part is resolved through a
//! [`UnitResolver`], which stands in for the engine's unit loader.

use crate::errors::TestIdError;
use std::fmt;

/// The execution strategy a unit declares.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum UnitRunner {
    /// The engine's standard runner, which supports filtering down to individual methods.
    Standard,

    /// A custom runner that bypasses per-method filtering.
    Custom {
        /// The name of the custom runner.
        name: String,
    },
}

/// A resolved reference to a unit: a class grouping several tests.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct UnitRef {
    name: String,
    runner: UnitRunner,
}

impl UnitRef {
    /// Creates a reference to a unit that uses the standard runner.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_runner(name, UnitRunner::Standard)
    }

    /// Creates a reference to a unit with the given runner.
    pub fn with_runner(name: impl Into<String>, runner: UnitRunner) -> Self {
        Self {
            name: name.into(),
            runner,
        }
    }

    /// Returns the canonical name of the unit.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the runner this unit declares.
    pub fn runner(&self) -> &UnitRunner {
        &self.runner
    }

    /// Returns true if the unit's tests can be filtered and run one method at a time.
    pub fn is_compatible(&self) -> bool {
        matches!(self.runner, UnitRunner::Standard)
    }
}

/// Locates units by name.
pub trait UnitResolver {
    /// Returns the unit with the given canonical name, or `None` if it cannot be located.
    fn resolve_unit(&self, name: &str) -> Option<UnitRef>;
}

impl<F> UnitResolver for F
where
    F: Fn(&str) -> Option<UnitRef>,
{
    fn resolve_unit(&self, name: &str) -> Option<UnitRef> {
        (self)(name)
    }
}

/// One requested test: a method within a unit, with an optional position in the requested order.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct TestId {
    unit: UnitRef,
    method: String,
    name: String,
    index: Option<usize>,
}

impl TestId {
    /// Creates a new, unordered test identifier from a unit and a method name.
    pub fn new(unit: UnitRef, method: impl Into<String>) -> Self {
        let method = method.into();
        let name = format!("{}.{}", unit.name(), method);
        Self {
            unit,
            method,
            name,
            index: None,
        }
    }

    /// Resolves a fully qualified `unit.method` string.
    ///
    /// The unit is everything before the last `.`.
    pub fn resolve<R>(resolver: &R, full_name: &str) -> Result<Self, TestIdError>
    where
        R: UnitResolver + ?Sized,
    {
        let (unit_name, method) = full_name
            .rsplit_once('.')
            .ok_or_else(|| TestIdError::Malformed {
                input: full_name.to_owned(),
            })?;
        if unit_name.is_empty() || method.is_empty() {
            return Err(TestIdError::Malformed {
                input: full_name.to_owned(),
            });
        }

        let unit = resolve_unit(resolver, unit_name, full_name)?;
        Ok(Self::new(unit, method))
    }

    /// Resolves a unit by name and pairs it with a method.
    pub fn resolve_in_unit<R>(
        resolver: &R,
        unit_name: &str,
        method: &str,
    ) -> Result<Self, TestIdError>
    where
        R: UnitResolver + ?Sized,
    {
        let full_name = format!("{unit_name}.{method}");
        if unit_name.is_empty() || method.is_empty() {
            return Err(TestIdError::Malformed { input: full_name });
        }

        let unit = resolve_unit(resolver, unit_name, &full_name)?;
        Ok(Self::new(unit, method))
    }

    /// Sets the position of this test in the requested order.
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    /// Returns the unit containing this test.
    pub fn unit(&self) -> &UnitRef {
        &self.unit
    }

    /// Returns the method name.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Returns the fully qualified `unit.method` name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the position of this test in the requested order, if it has one.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Returns true if this test's unit supports ordered single-method execution.
    pub fn is_compatible(&self) -> bool {
        self.unit.is_compatible()
    }
}

impl fmt::Display for TestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

fn resolve_unit<R>(resolver: &R, unit_name: &str, input: &str) -> Result<UnitRef, TestIdError>
where
    R: UnitResolver + ?Sized,
{
    resolver
        .resolve_unit(unit_name)
        .ok_or_else(|| TestIdError::UnitNotFound {
            unit: unit_name.to_owned(),
            input: input.to_owned(),
        })
}
