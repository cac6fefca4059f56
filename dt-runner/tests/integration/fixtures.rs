// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! An in-memory engine standing in for a real test-execution library.

use dt_runner::{
    engine::{Failure, RunReport, RunRequest, TestDescription, TestEngine, TestListener},
    result::FailureDetail,
    test_id::{UnitRef, UnitResolver, UnitRunner},
};
use std::{collections::BTreeMap, sync::Mutex, thread, time::Duration};

pub(crate) fn test_init() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

#[derive(Clone, Debug)]
pub(crate) enum Outcome {
    Pass,
    Fail(FailureDetail),
}

#[derive(Clone, Debug)]
pub(crate) struct FakeMethod {
    pub(crate) name: &'static str,
    pub(crate) outcome: Outcome,
    pub(crate) sleep: Duration,
}

impl FakeMethod {
    pub(crate) fn pass(name: &'static str) -> Self {
        Self {
            name,
            outcome: Outcome::Pass,
            sleep: Duration::ZERO,
        }
    }

    pub(crate) fn fail(name: &'static str, message: &str) -> Self {
        Self {
            name,
            outcome: Outcome::Fail(FailureDetail::with_message(message)),
            sleep: Duration::ZERO,
        }
    }

    pub(crate) fn sleeping(mut self, sleep: Duration) -> Self {
        self.sleep = sleep;
        self
    }
}

#[derive(Clone, Debug)]
pub(crate) struct FakeUnit {
    runner: UnitRunner,
    methods: Vec<FakeMethod>,
    /// Fails the whole unit before any of its tests start.
    init_failure: Option<FailureDetail>,
    /// Fails the whole unit after all of its tests have finished.
    teardown_failure: Option<FailureDetail>,
}

impl FakeUnit {
    pub(crate) fn new(methods: impl IntoIterator<Item = FakeMethod>) -> Self {
        Self {
            runner: UnitRunner::Standard,
            methods: methods.into_iter().collect(),
            init_failure: None,
            teardown_failure: None,
        }
    }

    pub(crate) fn custom_runner(mut self, name: &str) -> Self {
        self.runner = UnitRunner::Custom {
            name: name.to_owned(),
        };
        self
    }

    pub(crate) fn init_failure(mut self, message: &str) -> Self {
        self.init_failure = Some(FailureDetail::with_message(message));
        self
    }

    pub(crate) fn teardown_failure(mut self, message: &str) -> Self {
        self.teardown_failure = Some(FailureDetail::with_message(message));
        self
    }
}

/// Runs tests in the order the request asks for, either sequentially or all at once on separate
/// threads.
#[derive(Debug, Default)]
pub(crate) struct FakeEngine {
    units: BTreeMap<&'static str, FakeUnit>,
    parallel: bool,
    executed: Mutex<Vec<String>>,
    pub(crate) loaded_units: Vec<String>,
}

impl FakeEngine {
    pub(crate) fn new(units: BTreeMap<&'static str, FakeUnit>) -> Self {
        Self {
            units,
            ..Self::default()
        }
    }

    pub(crate) fn parallel(mut self) -> Self {
        self.parallel = true;
        self
    }

    /// The tests that were started, in start order.
    pub(crate) fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }

    fn run_one(&self, test: &TestDescription, listener: &dyn TestListener) -> Option<Failure> {
        let method = self.units[test.unit()]
            .methods
            .iter()
            .find(|method| method.name == test.method())
            .expect("selected tests come from the unit's methods");

        listener.test_started(test);
        self.executed
            .lock()
            .unwrap()
            .push(test.full_name().to_owned());
        thread::sleep(method.sleep);
        listener.test_finished(test);

        match &method.outcome {
            Outcome::Pass => None,
            Outcome::Fail(detail) => Some(Failure::test(test.clone(), detail.clone())),
        }
    }
}

impl UnitResolver for FakeEngine {
    fn resolve_unit(&self, name: &str) -> Option<UnitRef> {
        self.units
            .get(name)
            .map(|unit| UnitRef::with_runner(name, unit.runner.clone()))
    }
}

impl TestEngine for FakeEngine {
    fn run(&mut self, request: &RunRequest<'_>, listener: &dyn TestListener) -> RunReport {
        let mut failures = Vec::new();
        let mut available = Vec::new();
        let mut teardown = Vec::new();

        for unit in request.units() {
            self.loaded_units.push(unit.name().to_owned());
            let Some(fake) = self.units.get(unit.name()) else {
                failures.push(Failure::unit(
                    unit.name(),
                    FailureDetail::with_message("unit not found"),
                ));
                continue;
            };
            if let Some(detail) = &fake.init_failure {
                failures.push(Failure::unit(unit.name(), detail.clone()));
                continue;
            }
            available.extend(
                fake.methods
                    .iter()
                    .map(|method| TestDescription::new(unit.name(), method.name)),
            );
            if let Some(detail) = &fake.teardown_failure {
                teardown.push(Failure::unit(unit.name(), detail.clone()));
            }
        }

        let selected = request.select_and_sort(available);
        let this = &*self;
        if this.parallel {
            thread::scope(|scope| {
                let handles: Vec<_> = selected
                    .iter()
                    .map(|test| scope.spawn(move || this.run_one(test, listener)))
                    .collect();
                failures.extend(
                    handles
                        .into_iter()
                        .filter_map(|handle| handle.join().expect("test thread panicked")),
                );
            });
        } else {
            failures.extend(selected.iter().filter_map(|test| this.run_one(test, listener)));
        }

        failures.extend(teardown);
        RunReport::new(failures)
    }
}
