// SPDX-License-Identifier: MIT

use super::*;

fn detector() -> SessionDetector {
    SessionDetector::new(SessionConfig {
        start_threshold: 50.0,
        start_min_hold_ms: 1_000,
        stop_threshold: 20.0,
        stop_delay_ms: 500,
    })
}

#[test]
fn opens_after_holding_above_start_threshold() {
    let mut d = detector();
    assert_eq!(d.observe(Observation::new(0, 60.0)), Verdict::NoChange);
    assert!(matches!(d.observe(Observation::new(1_000, 70.0)), Verdict::Open { .. }));
}

#[test]
fn dropping_below_start_threshold_resets_the_hold() {
    let mut d = detector();
    d.observe(Observation::new(0, 60.0));
    d.observe(Observation::new(500, 40.0));
    assert_eq!(d.observe(Observation::new(1_000, 60.0)), Verdict::NoChange);
}

#[test]
fn closes_after_staying_below_stop_threshold_for_stop_delay() {
    let mut d = detector();
    d.observe(Observation::new(0, 60.0));
    d.observe(Observation::new(1_000, 60.0));
    assert_eq!(d.observe(Observation::new(1_100, 10.0)), Verdict::NoChange);
    assert_eq!(d.observe(Observation::new(1_700, 10.0)), Verdict::Normal);
}

#[test]
fn gate_disabled_ignores_observations() {
    let mut d = detector();
    d.set_gate(false);
    assert_eq!(d.observe(Observation::new(0, 100.0)), Verdict::NoChange);
    assert_eq!(d.observe(Observation::new(2_000, 100.0)), Verdict::NoChange);
}
