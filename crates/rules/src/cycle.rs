// SPDX-License-Identifier: MIT

//! Cycle rule (§4.7): opens when a monotonic counter advances by at least
//! `period` since the last reset mark, OR too much wall-clock time elapses
//! since that mark without a reset; closes on an observed reset event (the
//! counter reading drops below the current mark).

use crate::detector::{Detector, Verdict};
use crate::observation::Observation;

#[derive(Debug, Clone, Copy)]
pub struct CycleConfig {
    pub period: f64,
    pub max_elapsed_ms: u64,
}

#[derive(Debug, Clone, Copy)]
pub struct CycleDetector {
    config: CycleConfig,
    mark_val: Option<f64>,
    mark_ts: Option<u64>,
    open: bool,
}

impl CycleDetector {
    pub fn new(config: CycleConfig) -> Self {
        Self { config, mark_val: None, mark_ts: None, open: false }
    }
}

impl Detector for CycleDetector {
    fn observe(&mut self, obs: Observation) -> Verdict {
        let Some(mark) = self.mark_val else {
            self.mark_val = Some(obs.val);
            self.mark_ts = Some(obs.ts);
            return Verdict::NoChange;
        };

        if obs.val < mark {
            self.mark_val = Some(obs.val);
            self.mark_ts = Some(obs.ts);
            if self.open {
                self.open = false;
                return Verdict::Normal;
            }
            return Verdict::NoChange;
        }

        if !self.open {
            let advanced = obs.val - mark;
            if advanced >= self.config.period {
                self.open = true;
                return Verdict::Open {
                    reason: format!("counter advanced by {advanced} (period {})", self.config.period),
                };
            }
        }
        Verdict::NoChange
    }

    fn poll(&mut self, now: u64) -> Verdict {
        if self.open {
            return Verdict::NoChange;
        }
        let Some(mark_ts) = self.mark_ts else { return Verdict::NoChange };
        let elapsed = now.saturating_sub(mark_ts);
        if elapsed >= self.config.max_elapsed_ms {
            self.open = true;
            return Verdict::Open {
                reason: format!("no reset observed for {elapsed}ms (max {}ms)", self.config.max_elapsed_ms),
            };
        }
        Verdict::NoChange
    }

    fn reset(&mut self) {
        self.mark_val = None;
        self.mark_ts = None;
        self.open = false;
    }
}

#[cfg(test)]
#[path = "cycle_tests.rs"]
mod tests;
