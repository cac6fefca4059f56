// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reporting results once a run is complete.

mod junit;

pub use junit::JunitReporter;
