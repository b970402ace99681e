// SPDX-License-Identifier: MIT

use super::*;

#[test]
fn opens_when_operator_condition_is_met() {
    let mut d = TriggeredDetector::new(TriggeredConfig {
        operator: Compare::Gt(5.0),
        expectation: Expectation::Changed,
    });
    assert_eq!(d.observe(Observation::new(0, 1.0)), Verdict::NoChange);
    assert!(matches!(d.observe(Observation::new(1, 6.0)), Verdict::Open { .. }));
}

#[test]
fn changed_expectation_closes_on_any_different_value() {
    let mut d = TriggeredDetector::new(TriggeredConfig {
        operator: Compare::Gt(5.0),
        expectation: Expectation::Changed,
    });
    d.observe(Observation::new(0, 6.0));
    assert_eq!(d.observe(Observation::new(1, 6.0)), Verdict::NoChange);
    assert_eq!(d.observe(Observation::new(2, 6.1)), Verdict::Normal);
}

#[test]
fn delta_expectation_requires_minimum_movement() {
    let mut d = TriggeredDetector::new(TriggeredConfig {
        operator: Compare::Gt(5.0),
        expectation: Expectation::Delta(2.0),
    });
    d.observe(Observation::new(0, 6.0));
    assert_eq!(d.observe(Observation::new(1, 7.0)), Verdict::NoChange);
    assert_eq!(d.observe(Observation::new(2, 8.5)), Verdict::Normal);
}

#[test]
fn threshold_expectation_closes_once_outside_the_operator_region() {
    let mut d = TriggeredDetector::new(TriggeredConfig {
        operator: Compare::Gt(5.0),
        expectation: Expectation::Threshold(Compare::Gt(5.0)),
    });
    d.observe(Observation::new(0, 6.0));
    assert_eq!(d.observe(Observation::new(1, 6.0)), Verdict::NoChange);
    assert_eq!(d.observe(Observation::new(2, 4.0)), Verdict::Normal);
}
