// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::fixtures::*;
use dt_runner::{executor::TestExecutor, result::TestStatus};
use proptest::{collection::vec, prelude::*};
use std::{
    collections::{BTreeMap, HashSet},
    time::Duration,
};
use test_strategy::proptest;

// The last two units are never defined, so requests for them are missing.
static UNITS: [&str; 6] = ["p.U0", "p.U1", "p.U2", "p.U3", "p.Gone0", "p.Gone1"];
static METHODS: [&str; 4] = ["m0", "m1", "m2", "m3"];
const DEFINED_UNITS: usize = 4;

fn engine(failing: &[bool], broken: &[bool]) -> FakeEngine {
    let mut units = BTreeMap::new();
    for (unit_idx, &unit) in UNITS[..DEFINED_UNITS].iter().enumerate() {
        let methods = METHODS.iter().enumerate().map(|(method_idx, &method)| {
            if failing[unit_idx * METHODS.len() + method_idx] {
                FakeMethod::fail(method, "generated failure")
            } else {
                FakeMethod::pass(method)
            }
        });
        let mut fake = FakeUnit::new(methods);
        if broken[unit_idx] {
            fake = fake.init_failure("generated unit failure");
        }
        units.insert(unit, fake);
    }
    FakeEngine::new(units)
}

#[proptest(cases = 64)]
fn every_requested_test_has_exactly_one_result(
    #[strategy(vec((0..UNITS.len(), 0..METHODS.len()), 0..24))] picks: Vec<(usize, usize)>,
    #[strategy(vec(any::<bool>(), DEFINED_UNITS * METHODS.len()))] failing: Vec<bool>,
    #[strategy(vec(any::<bool>(), DEFINED_UNITS))] broken: Vec<bool>,
    parallel: bool,
) {
    let mut engine = engine(&failing, &broken);
    if parallel {
        engine = engine.parallel();
    }
    let names: Vec<String> = picks
        .iter()
        .map(|&(unit, method)| format!("{}.{}", UNITS[unit], METHODS[method]))
        .collect();

    let executor = TestExecutor::skip_missing(&engine, &names).suppress_output(false);
    let results = executor.execute(&mut engine);

    let distinct: HashSet<&str> = names.iter().map(String::as_str).collect();
    prop_assert_eq!(results.len(), distinct.len());

    for &(unit_idx, method_idx) in &picks {
        let name = format!("{}.{}", UNITS[unit_idx], METHODS[method_idx]);
        let result = results.get(&name).expect("every requested name has a result");

        let expected = if unit_idx >= DEFINED_UNITS {
            TestStatus::Missing
        } else if broken[unit_idx] || failing[unit_idx * METHODS.len() + method_idx] {
            TestStatus::Fail
        } else {
            TestStatus::Pass
        };
        prop_assert_eq!(result.status(), expected, "status for {}", name);

        match expected {
            TestStatus::Missing => {
                prop_assert_eq!(result.duration(), Duration::ZERO);
                prop_assert!(result.test().is_none());
            }
            TestStatus::Fail if broken[unit_idx] => {
                prop_assert_eq!(result.duration(), Duration::ZERO);
                prop_assert!(result.start_time().is_none());
            }
            TestStatus::Pass | TestStatus::Fail => {
                prop_assert!(result.start_time().is_some());
            }
        }
    }

    // Missing tests never reach the engine.
    for name in engine.executed() {
        prop_assert!(
            !name.starts_with("p.Gone"),
            "missing test {} was executed",
            name
        );
    }
}
