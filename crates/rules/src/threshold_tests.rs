// SPDX-License-Identifier: MIT

use super::*;

fn detector(min_duration_ms: u64, hysteresis: f64) -> ThresholdDetector {
    ThresholdDetector::new(ThresholdConfig { compare: Compare::Gt(80.0), min_duration_ms, hysteresis })
}

#[test]
fn stays_closed_until_forbidden_region_persists_for_min_duration() {
    let mut d = detector(1_000, 0.0);
    assert_eq!(d.observe(Observation::new(0, 90.0)), Verdict::NoChange);
    assert_eq!(d.observe(Observation::new(500, 91.0)), Verdict::NoChange);
    assert!(matches!(d.observe(Observation::new(1_000, 92.0)), Verdict::Open { .. }));
}

#[test]
fn single_brief_excursion_never_opens() {
    let mut d = detector(1_000, 0.0);
    assert_eq!(d.observe(Observation::new(0, 90.0)), Verdict::NoChange);
    // Recovers before min_duration elapses; the forbidden streak resets.
    assert_eq!(d.observe(Observation::new(200, 10.0)), Verdict::NoChange);
    assert_eq!(d.observe(Observation::new(400, 90.0)), Verdict::NoChange);
}

#[test]
fn hysteresis_prevents_flapping_right_at_the_boundary() {
    let mut d = detector(0, 5.0);
    assert!(matches!(d.observe(Observation::new(0, 90.0)), Verdict::Open { .. }));
    // Back under 80 but not past the 5.0 hysteresis band -> still open.
    assert_eq!(d.observe(Observation::new(1, 78.0)), Verdict::NoChange);
    assert_eq!(d.observe(Observation::new(2, 76.0)), Verdict::Normal);
}

#[test]
fn outside_region_opens_and_recovers_inside_the_band() {
    let mut d = ThresholdDetector::new(ThresholdConfig {
        compare: Compare::Outside(10.0, 20.0),
        min_duration_ms: 0,
        hysteresis: 1.0,
    });
    assert!(matches!(d.observe(Observation::new(0, 25.0)), Verdict::Open { .. }));
    assert_eq!(d.observe(Observation::new(1, 19.5)), Verdict::NoChange);
    assert_eq!(d.observe(Observation::new(2, 15.0)), Verdict::Normal);
}

#[test]
fn reset_clears_forbidden_streak_state() {
    let mut d = detector(1_000, 0.0);
    d.observe(Observation::new(0, 90.0));
    d.reset();
    assert_eq!(d.observe(Observation::new(100, 90.0)), Verdict::NoChange);
}
