// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by dt-runner.
//!
//! Test failures are never represented here: they are surfaced as
//! [`TestResult`](crate::result::TestResult) records.

use camino::Utf8PathBuf;
use std::{error, fmt};
use thiserror::Error;

/// An error that occurred while resolving a requested test identifier.
///
/// In lenient mode these errors are absorbed and the test is recorded as missing.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum TestIdError {
    /// The input could not be split into a unit and a method.
    #[error("malformed test identifier `{input}` (expected `unit.method`)")]
    Malformed {
        /// The requested identifier.
        input: String,
    },

    /// The unit named by the identifier could not be located.
    #[error("unit `{unit}` not found while resolving `{input}`")]
    UnitNotFound {
        /// The unit name that failed to resolve.
        unit: String,

        /// The requested identifier.
        input: String,
    },
}

impl TestIdError {
    /// Returns the identifier string the caller asked for.
    pub fn input(&self) -> &str {
        match self {
            TestIdError::Malformed { input } | TestIdError::UnitNotFound { input, .. } => input,
        }
    }
}

/// A test name was requested more than once.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("test `{name}` was requested more than once")]
pub struct DuplicateTestError {
    name: String,
}

impl DuplicateTestError {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Returns the duplicated fully qualified name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// An error that occurred while building a [`Registry`](crate::registry::Registry) in strict
/// mode.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum RegistryBuildError {
    /// A requested identifier could not be resolved.
    #[error("failed to resolve requested test")]
    Resolve(#[from] TestIdError),

    /// A requested identifier appeared more than once.
    #[error(transparent)]
    Duplicate(#[from] DuplicateTestError),
}

/// An error that occurred while reading a [`HarnessConfig`](crate::config::HarnessConfig).
#[derive(Debug, Error)]
pub enum ConfigReadError {
    /// The config file could not be read.
    #[error("failed to read config at `{path}`")]
    Read {
        /// The path of the config file.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: std::io::Error,
    },

    /// The config file could not be deserialized.
    #[error("failed to parse config at `{path}`")]
    Parse {
        /// The path of the config file.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: toml::de::Error,
    },
}

/// An error that occurred while writing a JUnit report.
#[derive(Debug, Error)]
pub enum WriteJunitError {
    /// An error occurred while creating the report's directory or file.
    #[error("error writing to {file}")]
    Fs {
        /// The file being written to.
        file: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: std::io::Error,
    },

    /// An error occurred while producing JUnit XML.
    #[error("error writing JUnit output to {file}")]
    Junit {
        /// The output file.
        file: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: quick_junit::SerializeError,
    },
}

/// Displays an error along with its chain of sources, one per line.
pub struct DisplayErrorChain<E> {
    error: E,
}

impl<E: error::Error> DisplayErrorChain<E> {
    /// Creates a new `DisplayErrorChain`.
    pub fn new(error: E) -> Self {
        Self { error }
    }
}

impl<E: error::Error> fmt::Display for DisplayErrorChain<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        let mut source = self.error.source();
        while let Some(error) = source {
            write!(f, "\n  caused by: {error}")?;
            source = error.source();
        }

        Ok(())
    }
}
