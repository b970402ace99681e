// SPDX-License-Identifier: MIT

use super::*;

fn detector() -> NonSettlingDetector {
    NonSettlingDetector::new(NonSettlingConfig {
        min_delta: 1.0,
        max_continuous_ms: 1_000,
        quiet_gap_ms: 500,
        trend: None,
    })
}

fn trend_detector() -> NonSettlingDetector {
    NonSettlingDetector::new(NonSettlingConfig {
        min_delta: 1.0,
        max_continuous_ms: 1_000,
        quiet_gap_ms: 500,
        trend: Some(TrendConfig { window_ms: 10_000, min_total_delta: 5.0, direction: Direction::Up }),
    })
}

#[test]
fn opens_once_continuous_change_outlasts_max_continuous() {
    let mut d = detector();
    d.observe(Observation::new(0, 0.0));
    assert_eq!(d.observe(Observation::new(200, 5.0)), Verdict::NoChange);
    assert_eq!(d.observe(Observation::new(400, 10.0)), Verdict::NoChange);
    assert!(matches!(d.observe(Observation::new(1_100, 15.0)), Verdict::Open { .. }));
}

#[test]
fn small_gap_under_quiet_gap_does_not_break_the_streak() {
    let mut d = detector();
    d.observe(Observation::new(0, 0.0));
    d.observe(Observation::new(200, 5.0));
    // A small gap with no change (< quiet_gap_ms) should not reset the streak.
    assert_eq!(d.observe(Observation::new(400, 5.0)), Verdict::NoChange);
    assert!(matches!(d.observe(Observation::new(1_100, 12.0)), Verdict::Open { .. }));
}

#[test]
fn a_genuine_quiet_gap_closes_an_open_rule() {
    let mut d = detector();
    d.observe(Observation::new(0, 0.0));
    d.observe(Observation::new(200, 5.0));
    assert!(matches!(d.observe(Observation::new(1_300, 10.0)), Verdict::Open { .. }));

    // No change, and the gap since the last change exceeds quiet_gap_ms.
    assert_eq!(d.observe(Observation::new(1_900, 10.0)), Verdict::Normal);
}

#[test]
fn trend_variant_opens_on_net_delta_from_sub_min_delta_steps() {
    let mut d = trend_detector();
    // Each step is below min_delta (1.0) individually, but the net delta
    // over the window exceeds min_total_delta (5.0).
    d.observe(Observation::new(0, 0.0));
    d.observe(Observation::new(1_000, 0.8));
    d.observe(Observation::new(2_000, 1.6));
    d.observe(Observation::new(3_000, 2.4));
    d.observe(Observation::new(4_000, 3.2));
    d.observe(Observation::new(5_000, 4.0));
    assert!(matches!(d.observe(Observation::new(6_000, 4.8)), Verdict::NoChange));
    assert!(matches!(d.observe(Observation::new(7_000, 5.6)), Verdict::Open { .. }));
}

#[test]
fn trend_variant_does_not_open_for_the_wrong_direction() {
    let mut d = trend_detector();
    // Steps below min_delta so the base (direction-agnostic) variant can't
    // trip either; a steady decrease should never open an "Up" trend rule.
    d.observe(Observation::new(0, 10.0));
    d.observe(Observation::new(1_000, 9.2));
    d.observe(Observation::new(2_000, 8.4));
    assert_eq!(d.observe(Observation::new(3_000, 7.6)), Verdict::NoChange);
}

#[test]
fn trend_variant_closes_after_a_quiet_gap() {
    let mut d = trend_detector();
    d.observe(Observation::new(0, 0.0));
    d.observe(Observation::new(1_000, 2.0));
    d.observe(Observation::new(2_000, 4.0));
    assert!(matches!(d.observe(Observation::new(3_000, 6.0)), Verdict::Open { .. }));

    // Flat for longer than quiet_gap_ms: closes.
    assert_eq!(d.observe(Observation::new(3_700, 6.0)), Verdict::Normal);
}
