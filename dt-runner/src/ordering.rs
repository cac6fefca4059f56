// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Selection and ordering of tests, derived from a [`Registry`].
//!
//! Engines schedule at unit granularity, so every test in a referenced unit is offered to the
//! [`OrderFilter`]. The [`OrderComparator`] is a scheduling hint: it tells the engine the
//! relative order the caller asked for, but the engine is free to run tests concurrently.

use crate::{engine::TestDescription, registry::Registry};
use itertools::Itertools;
use std::{cmp::Ordering, fmt};

/// Selects exactly the tests present in a registry.
#[derive(Clone, Copy, Debug)]
pub struct OrderFilter<'a> {
    registry: &'a Registry,
}

impl<'a> OrderFilter<'a> {
    /// Creates a new filter for `registry`.
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }

    /// Returns true if `test` was requested.
    pub fn should_run(&self, test: &TestDescription) -> bool {
        self.registry.contains(test.full_name())
    }

    /// Describes the filter as the list of requested names, in requested order.
    pub fn describe(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for OrderFilter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}]",
            self.registry.tests().map(|test| test.name()).join(", ")
        )
    }
}

/// Orders registered tests by their position in the requested order.
#[derive(Clone, Copy, Debug)]
pub struct OrderComparator<'a> {
    registry: &'a Registry,
}

impl<'a> OrderComparator<'a> {
    /// Creates a new comparator for `registry`.
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }

    /// Compares two tests.
    ///
    /// If either test is unregistered the result is [`Ordering::Equal`], leaving the engine's
    /// default order in place. Registered tests without an index sort after those with one.
    pub fn compare(&self, a: &TestDescription, b: &TestDescription) -> Ordering {
        match (
            self.registry.get(a.full_name()),
            self.registry.get(b.full_name()),
        ) {
            (Some(a), Some(b)) => match (a.index(), b.index()) {
                (Some(a), Some(b)) => a.cmp(&b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            _ => Ordering::Equal,
        }
    }
}
