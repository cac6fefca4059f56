// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Deterministic, ordered execution of individually named tests.
//!
//! dt-runner takes an ordered list of `unit.method` test identifiers, asks an external
//! [`TestEngine`](engine::TestEngine) to run them in that order, measures how long each one
//! takes, and classifies every requested test as passing, failing or missing. Every requested
//! identifier yields exactly one result, even if its unit fails to initialize or it cannot be
//! resolved at all.
//!
//! The basic flow is:
//!
//! 1. Build a [`TestExecutor`](executor::TestExecutor) from requested names, either strictly
//!    ([`TestExecutor::test_order`](executor::TestExecutor::test_order)) or leniently
//!    ([`TestExecutor::skip_missing`](executor::TestExecutor::skip_missing)).
//! 2. Call [`TestExecutor::execute`](executor::TestExecutor::execute) with an engine.
//! 3. Inspect the [`TestResults`](result::TestResults), or write them out with a
//!    [`JunitReporter`](reporter::JunitReporter).

pub mod config;
pub mod engine;
pub mod errors;
pub mod executor;
pub mod ordering;
pub mod reconcile;
pub mod registry;
pub mod reporter;
pub mod result;
mod silence;
pub mod test_id;
pub mod timing;
