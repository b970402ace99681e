// SPDX-License-Identifier: MIT

//! Quiet-hours gating (§4.4 step 2): pure minute-of-day arithmetic on a
//! 1440-minute wheel, kept free of clocks and stores so it is trivially
//! testable.

const MINUTES_PER_DAY: u32 = 1_440;
const MS_PER_MINUTE: u64 = 60_000;

/// Configuration for one quiet-hours window. `start_min`/`end_min` are
/// minutes since local midnight (`0..1440`); `end_min == start_min` means
/// "disabled" rather than "whole day", per §4.4 step 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuietHoursConfig {
    pub start_min: u32,
    pub end_min: u32,
    pub max_level: msghub_core::Level,
    pub spread_ms: u64,
    pub tick_interval_ms: i64,
    /// Offset from UTC, in minutes, used to map `now` onto a minute-of-day.
    /// The host supplies its local offset; absent any host timezone input
    /// this defaults to `0` (UTC).
    pub utc_offset_min: i32,
}

/// Map an epoch-ms instant onto a minute-of-day (`0..1440`) in the
/// configured offset.
pub fn minute_of_day(now_ms: u64, utc_offset_min: i32) -> u32 {
    let minute_of_day_utc = (now_ms / MS_PER_MINUTE) % u64::from(MINUTES_PER_DAY);
    let shifted = minute_of_day_utc as i64 + i64::from(utc_offset_min);
    shifted.rem_euclid(i64::from(MINUTES_PER_DAY)) as u32
}

/// Whether `minute` (0..1440) falls inside `[start, end)`, wrapping past
/// midnight when `end <= start`.
pub fn minute_in_window(minute: u32, start: u32, end: u32) -> bool {
    let minute = minute % MINUTES_PER_DAY;
    let start = start % MINUTES_PER_DAY;
    let end = end % MINUTES_PER_DAY;
    if start == end {
        return false;
    }
    if start < end {
        minute >= start && minute < end
    } else {
        minute >= start || minute < end
    }
}

/// Minutes from `minute` forward to `end` (wrap-aware), in `1..=1440`.
fn minutes_until(minute: u32, end: u32) -> u32 {
    let minute = minute % MINUTES_PER_DAY;
    let end = end % MINUTES_PER_DAY;
    if end > minute {
        end - minute
    } else {
        MINUTES_PER_DAY - minute + end
    }
}

/// §4.4 step 2's disable conditions: non-positive tick interval, a
/// zero-length window, a free window under 4 hours, or jitter spread
/// wider than what's left outside quiet hours.
pub fn is_disabled(config: &QuietHoursConfig) -> bool {
    if config.tick_interval_ms <= 0 {
        return true;
    }
    if config.start_min % MINUTES_PER_DAY == config.end_min % MINUTES_PER_DAY {
        return true;
    }
    let window_len = minutes_until(config.start_min, config.end_min);
    let free_window_min = MINUTES_PER_DAY - window_len;
    if free_window_min < 4 * 60 {
        return true;
    }
    let free_window_ms = u64::from(free_window_min) * MS_PER_MINUTE;
    if config.spread_ms > free_window_ms {
        return true;
    }
    false
}

/// Given `now_ms` and the minute-of-day it maps to, compute the epoch ms at
/// which the current quiet window ends.
pub fn window_end_ms(now_ms: u64, now_minute: u32, config: &QuietHoursConfig) -> u64 {
    let minutes_left = minutes_until(now_minute, config.end_min);
    now_ms + u64::from(minutes_left) * MS_PER_MINUTE
}

/// Whether `level` is gated by quiet hours: the configured ceiling excludes
/// louder levels so they still notify immediately.
pub fn level_is_gated(level: msghub_core::Level, config: &QuietHoursConfig) -> bool {
    level <= config.max_level
}

#[cfg(test)]
#[path = "quiet_hours_tests.rs"]
mod tests;
