// SPDX-License-Identifier: MIT

//! Non-settling rule (§4.7): base variant opens when a value keeps changing
//! by at least `minDelta` continuously (gaps under `quietGap` don't break
//! the streak) for longer than `maxContinuous`; the trend variant instead
//! opens when the net delta across a rolling `window` exceeds
//! `minTotalDelta` in a configured `direction`, for values that drift
//! steadily in small per-sample steps no single one of which trips
//! `minDelta`. Both variants close the moment a genuine quiet gap
//! (`quietGap`) is observed.

use crate::detector::{Detector, Verdict};
use crate::observation::Observation;
use crate::window::RollingWindow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy)]
pub struct TrendConfig {
    pub window_ms: u64,
    pub min_total_delta: f64,
    pub direction: Direction,
}

#[derive(Debug, Clone, Copy)]
pub struct NonSettlingConfig {
    pub min_delta: f64,
    pub max_continuous_ms: u64,
    pub quiet_gap_ms: u64,
    /// `Some` enables the trend variant alongside the base variant; either
    /// one opening is sufficient.
    pub trend: Option<TrendConfig>,
}

#[derive(Debug, Clone)]
pub struct NonSettlingDetector {
    config: NonSettlingConfig,
    last_val: Option<f64>,
    last_change_ts: Option<u64>,
    continuous_since: Option<u64>,
    window: Option<RollingWindow>,
    open: bool,
}

impl NonSettlingDetector {
    pub fn new(config: NonSettlingConfig) -> Self {
        let window = config.trend.map(|t| RollingWindow::new(t.window_ms));
        Self {
            config,
            last_val: None,
            last_change_ts: None,
            continuous_since: None,
            window,
            open: false,
        }
    }

    /// Net-delta-over-window check for the trend variant (§4.7 table:
    /// "trend variant: net delta over window exceeds minTotalDelta in
    /// direction"). `None` if the trend variant is disabled or the window
    /// doesn't yet span two observations.
    fn trend_hit(&self) -> Option<f64> {
        let trend = self.config.trend?;
        let window = self.window.as_ref()?;
        let first = window.first()?;
        let last = window.last()?;
        let net = last.val - first.val;
        let hit = match trend.direction {
            Direction::Up => net >= trend.min_total_delta,
            Direction::Down => net <= -trend.min_total_delta,
        };
        hit.then_some(net)
    }
}

impl Detector for NonSettlingDetector {
    fn observe(&mut self, obs: Observation) -> Verdict {
        let prev = self.last_val;
        let changed = prev.is_some_and(|v| (obs.val - v).abs() >= self.config.min_delta);
        // The trend variant can open purely from small per-sample steps
        // that never individually trip `min_delta`; track "progress in the
        // configured direction" separately so the quiet-gap close check
        // below has a meaningful reference even when `changed` never fires.
        let progressed = changed
            || self.config.trend.is_some_and(|t| {
                prev.is_some_and(|v| match t.direction {
                    Direction::Up => obs.val > v,
                    Direction::Down => obs.val < v,
                })
            });
        self.last_val = Some(obs.val);
        if let Some(window) = &mut self.window {
            window.push(obs);
        }

        if progressed {
            self.continuous_since.get_or_insert(obs.ts);
            self.last_change_ts = Some(obs.ts);
        }

        if !self.open {
            if changed {
                let duration = obs.ts.saturating_sub(self.continuous_since.unwrap_or(obs.ts));
                if duration > self.config.max_continuous_ms {
                    self.open = true;
                    return Verdict::Open {
                        reason: format!("value changed continuously for {duration}ms without settling"),
                    };
                }
            }
            if let (Some(trend), Some(net)) = (self.config.trend, self.trend_hit()) {
                self.open = true;
                return Verdict::Open {
                    reason: format!(
                        "net delta {net:.3} over {}ms window exceeded {} ({:?})",
                        trend.window_ms, trend.min_total_delta, trend.direction
                    ),
                };
            }
            return Verdict::NoChange;
        }

        if !progressed {
            if let Some(last_change) = self.last_change_ts {
                let gap = obs.ts.saturating_sub(last_change);
                if gap >= self.config.quiet_gap_ms {
                    self.continuous_since = None;
                    self.open = false;
                    if let Some(window) = &mut self.window {
                        window.clear();
                    }
                    return Verdict::Normal;
                }
            }
        }
        Verdict::NoChange
    }

    fn reset(&mut self) {
        self.last_val = None;
        self.last_change_ts = None;
        self.continuous_since = None;
        self.open = false;
        if let Some(window) = &mut self.window {
            window.clear();
        }
    }
}

#[cfg(test)]
#[path = "nonsettling_tests.rs"]
mod tests;
