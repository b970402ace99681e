// SPDX-License-Identifier: MIT

//! Session rule (§4.7): opens when a value crosses `startThreshold` and
//! stays above it for `startMinHold`; closes once it's been below
//! `stopThreshold` for `stopDelay`. Optionally gated by a separate on/off
//! signal (e.g. "is anyone home") via [`SessionDetector::set_gate`] — while
//! the gate is off, observations are ignored entirely.

use crate::detector::{Detector, Verdict};
use crate::observation::Observation;

#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    pub start_threshold: f64,
    pub start_min_hold_ms: u64,
    pub stop_threshold: f64,
    pub stop_delay_ms: u64,
}

#[derive(Debug, Clone, Copy)]
pub struct SessionDetector {
    config: SessionConfig,
    gate_enabled: bool,
    above_since: Option<u64>,
    below_since: Option<u64>,
    open: bool,
}

impl SessionDetector {
    pub fn new(config: SessionConfig) -> Self {
        Self { config, gate_enabled: true, above_since: None, below_since: None, open: false }
    }

    /// Enable/disable the optional on/off gate. Disabling drops any
    /// in-progress hold so a later re-enable starts from a clean state.
    pub fn set_gate(&mut self, enabled: bool) {
        self.gate_enabled = enabled;
        if !enabled {
            self.above_since = None;
        }
    }
}

impl Detector for SessionDetector {
    fn observe(&mut self, obs: Observation) -> Verdict {
        if !self.gate_enabled {
            return Verdict::NoChange;
        }

        if !self.open {
            if obs.val >= self.config.start_threshold {
                let since = *self.above_since.get_or_insert(obs.ts);
                let duration = obs.ts.saturating_sub(since);
                if duration >= self.config.start_min_hold_ms {
                    self.open = true;
                    self.below_since = None;
                    return Verdict::Open {
                        reason: format!("value held above {} for {duration}ms", self.config.start_threshold),
                    };
                }
            } else {
                self.above_since = None;
            }
            Verdict::NoChange
        } else {
            if obs.val < self.config.stop_threshold {
                let since = *self.below_since.get_or_insert(obs.ts);
                let duration = obs.ts.saturating_sub(since);
                if duration >= self.config.stop_delay_ms {
                    self.open = false;
                    self.above_since = None;
                    return Verdict::Normal;
                }
            } else {
                self.below_since = None;
            }
            Verdict::NoChange
        }
    }

    fn reset(&mut self) {
        self.above_since = None;
        self.below_since = None;
        self.open = false;
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
