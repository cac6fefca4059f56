// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Measuring how long individual tests take.
//!
//! Each test tracks a start time and a duration. For that we use a combination of a wall-clock
//! `DateTime` and an `Instant` (monotonic clock). When a test finishes, we report the elapsed time
//! using the monotonic clock.

use crate::engine::{TestDescription, TestListener};
use chrono::{DateTime, Local};
use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
    time::{Duration, Instant},
};
use tracing::{debug, error};

/// The start of a measurement.
#[derive(Clone, Debug)]
struct Stopwatch {
    start_time: DateTime<Local>,
    instant: Instant,
}

impl Stopwatch {
    fn start() -> Self {
        Self {
            // These two syscalls will happen imperceptibly close to each other, which is good
            // enough for our purposes.
            start_time: Local::now(),
            instant: Instant::now(),
        }
    }

    fn snapshot(&self) -> TestTiming {
        TestTiming {
            start_time: self.start_time,
            duration: self.instant.elapsed(),
        }
    }
}

/// The measured timing of a single test.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct TestTiming {
    /// The wall-clock time at which the test started.
    pub start_time: DateTime<Local>,

    /// The elapsed time between the start and finish notifications.
    pub duration: Duration,
}

/// Measured timings keyed by fully qualified test name.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TestTimings {
    timings: HashMap<String, TestTiming>,
}

impl TestTimings {
    /// Creates an empty set of timings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a timing, replacing any earlier one for the same name.
    pub fn insert(&mut self, name: impl Into<String>, timing: TestTiming) {
        self.timings.insert(name.into(), timing);
    }

    /// Returns the timing for the given name.
    pub fn get(&self, name: &str) -> Option<&TestTiming> {
        self.timings.get(name)
    }

    /// Returns the number of measured tests.
    pub fn len(&self) -> usize {
        self.timings.len()
    }

    /// Returns true if no tests were measured.
    pub fn is_empty(&self) -> bool {
        self.timings.is_empty()
    }
}

/// A [`TestListener`] that measures the time between each test's start and finish.
///
/// Notifications are keyed by name, so they may arrive interleaved and from several threads.
#[derive(Debug, Default)]
pub struct TimingListener {
    started: Mutex<HashMap<String, Stopwatch>>,
    finished: Mutex<TestTimings>,
}

impl TimingListener {
    /// Creates a new listener with no measurements.
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes the listener, returning the timings of every test that both started and finished.
    pub fn into_timings(self) -> TestTimings {
        self.finished
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl TestListener for TimingListener {
    fn test_started(&self, test: &TestDescription) {
        debug!("test being executed: {test}");
        lock(&self.started).insert(test.full_name().to_owned(), Stopwatch::start());
    }

    fn test_finished(&self, test: &TestDescription) {
        let Some(stopwatch) = lock(&self.started).remove(test.full_name()) else {
            error!("test finished but did not start: {test}");
            return;
        };
        lock(&self.finished).insert(test.full_name(), stopwatch.snapshot());
    }
}

// A panic in one callback shouldn't stop the others from being recorded.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
