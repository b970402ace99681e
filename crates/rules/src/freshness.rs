// SPDX-License-Identifier: MIT

//! Freshness rule (§4.7): opens when no update has been observed within
//! `everyMs`; closes the moment a fresh update arrives. The overdue check
//! has to run on idle ticks too, since the absence of an observation is
//! exactly the condition being watched for.

use crate::detector::{Detector, Verdict};
use crate::observation::Observation;

#[derive(Debug, Clone, Copy)]
pub struct FreshnessConfig {
    pub every_ms: u64,
}

#[derive(Debug, Clone, Copy)]
pub struct FreshnessDetector {
    config: FreshnessConfig,
    last_seen_ts: Option<u64>,
    open: bool,
}

impl FreshnessDetector {
    pub fn new(config: FreshnessConfig) -> Self {
        Self { config, last_seen_ts: None, open: false }
    }
}

impl Detector for FreshnessDetector {
    fn observe(&mut self, obs: Observation) -> Verdict {
        self.last_seen_ts = Some(obs.ts);
        if self.open {
            self.open = false;
            return Verdict::Normal;
        }
        Verdict::NoChange
    }

    fn poll(&mut self, now: u64) -> Verdict {
        let Some(last_seen) = self.last_seen_ts else {
            self.last_seen_ts = Some(now);
            return Verdict::NoChange;
        };
        if self.open {
            return Verdict::NoChange;
        }
        let elapsed = now.saturating_sub(last_seen);
        if elapsed >= self.config.every_ms {
            self.open = true;
            return Verdict::Open {
                reason: format!("no update for {elapsed}ms (expected every {}ms)", self.config.every_ms),
            };
        }
        Verdict::NoChange
    }

    fn reset(&mut self) {
        self.last_seen_ts = None;
        self.open = false;
    }
}

#[cfg(test)]
#[path = "freshness_tests.rs"]
mod tests;
