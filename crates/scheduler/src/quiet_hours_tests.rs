// SPDX-License-Identifier: MIT

use super::*;
use msghub_core::Level;

fn cfg(start: u32, end: u32, spread_ms: u64) -> QuietHoursConfig {
    QuietHoursConfig {
        start_min: start,
        end_min: end,
        max_level: Level::Warning,
        spread_ms,
        tick_interval_ms: 5_000,
        utc_offset_min: 0,
    }
}

#[test]
fn minute_of_day_wraps_with_offset() {
    // 00:05 UTC with a -10 minute offset is 23:55 the previous day.
    let five_past_midnight = 5 * 60_000;
    assert_eq!(minute_of_day(five_past_midnight, -10), 23 * 60 + 55);
    assert_eq!(minute_of_day(five_past_midnight, 0), 5);
}

#[test]
fn same_day_window_matches_inside_and_excludes_outside() {
    // 01:00 -> 05:00, same-day (no wraparound).
    assert!(minute_in_window(3 * 60, 60, 5 * 60));
    assert!(!minute_in_window(10 * 60, 60, 5 * 60));
}

#[test]
fn wraparound_window_matches_past_midnight() {
    // 22:00 -> 06:00 wraps past midnight; 23:30 and 02:00 are inside, 12:00 is not.
    assert!(minute_in_window(23 * 60 + 30, 22 * 60, 6 * 60));
    assert!(minute_in_window(2 * 60, 22 * 60, 6 * 60));
    assert!(!minute_in_window(12 * 60, 22 * 60, 6 * 60));
}

#[test]
fn zero_length_window_is_never_matched() {
    assert!(!minute_in_window(500, 300, 300));
}

#[test]
fn disabled_when_start_equals_end() {
    assert!(is_disabled(&cfg(300, 300, 0)));
}

#[test]
fn disabled_when_tick_interval_non_positive() {
    let mut c = cfg(22 * 60, 6 * 60, 0);
    c.tick_interval_ms = 0;
    assert!(is_disabled(&c));
}

#[test]
fn disabled_when_free_window_under_four_hours() {
    // Quiet window 21:00 -> 20:00 next day leaves only a 3h free window.
    assert!(is_disabled(&cfg(21 * 60, 20 * 60, 0)));
}

#[test]
fn disabled_when_spread_exceeds_free_window() {
    // 22:00 -> 06:00 quiet window leaves an 18h = 64_800_000ms free window.
    assert!(is_disabled(&cfg(22 * 60, 6 * 60, 64_800_001)));
}

#[test]
fn enabled_with_wide_window_and_small_spread() {
    assert!(!is_disabled(&cfg(22 * 60, 6 * 60, 60_000)));
}

#[test]
fn window_end_handles_wraparound() {
    let config = cfg(22 * 60, 6 * 60, 0);
    // now = 23:00 on day 0 -> window ends at 06:00, 7h later.
    let now_ms = 1_700_000_000_000;
    let end = window_end_ms(now_ms, 23 * 60, &config);
    assert_eq!(end, now_ms + 7 * 3_600_000);
}

#[test]
fn level_gating_excludes_louder_levels() {
    let config = cfg(22 * 60, 6 * 60, 0);
    assert!(level_is_gated(Level::Info, &config));
    assert!(level_is_gated(Level::Warning, &config));
    assert!(!level_is_gated(Level::Critical, &config));
}
