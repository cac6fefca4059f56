// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for a harness run.
//!
//! Configuration is read from a TOML file such as:
//!
//! ```toml
//! missing-tests = "fail"
//! suppress-output = false
//!
//! [junit]
//! path = "target/dt-runner/junit.xml"
//! report-name = "ordered-run"
//! ```

use crate::{errors::ConfigReadError, registry::MissingTestPolicy};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;

/// Settings for building and executing a harness.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct HarnessConfig {
    /// What to do with requested tests that can't be resolved.
    #[serde(default)]
    pub missing_tests: MissingTestPolicy,

    /// Whether to silence stdout and stderr while the engine runs.
    #[serde(default = "default_suppress_output")]
    pub suppress_output: bool,

    /// Where to write a JUnit report, if anywhere.
    #[serde(default)]
    pub junit: Option<JunitConfig>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            missing_tests: MissingTestPolicy::default(),
            suppress_output: default_suppress_output(),
            junit: None,
        }
    }
}

impl HarnessConfig {
    /// Parses a config from a TOML string.
    pub fn from_toml_str(input: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(input)
    }

    /// Reads and parses a config file.
    pub fn from_path(path: impl AsRef<Utf8Path>) -> Result<Self, ConfigReadError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|error| ConfigReadError::Read {
            path: path.to_owned(),
            error,
        })?;
        Self::from_toml_str(&contents).map_err(|error| ConfigReadError::Parse {
            path: path.to_owned(),
            error,
        })
    }
}

fn default_suppress_output() -> bool {
    true
}

/// JUnit report settings.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct JunitConfig {
    /// The file to write the report to. Parent directories are created as needed.
    pub path: Utf8PathBuf,

    /// The name of the report.
    #[serde(default = "default_report_name")]
    pub report_name: String,
}

impl JunitConfig {
    /// Creates a new config writing to `path`, with the default report name.
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            path: path.into(),
            report_name: default_report_name(),
        }
    }
}

fn default_report_name() -> String {
    "dt-run".to_owned()
}
