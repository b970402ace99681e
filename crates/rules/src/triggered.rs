// SPDX-License-Identifier: MIT

//! Triggered rule (§4.7): opens when the monitored value satisfies an
//! operator condition; closes once a subsequent observation meets the
//! configured expectation (changed from the triggering value, moved by a
//! minimum delta, or crossed a threshold of its own).

use crate::detector::{Detector, Verdict};
use crate::observation::Observation;
use crate::threshold::Compare;

#[derive(Debug, Clone, Copy)]
pub enum Expectation {
    Changed,
    Delta(f64),
    Threshold(Compare),
}

#[derive(Debug, Clone, Copy)]
pub struct TriggeredConfig {
    pub operator: Compare,
    pub expectation: Expectation,
}

#[derive(Debug, Clone, Copy)]
pub struct TriggeredDetector {
    config: TriggeredConfig,
    value_at_open: Option<f64>,
}

impl TriggeredDetector {
    pub fn new(config: TriggeredConfig) -> Self {
        Self { config, value_at_open: None }
    }
}

impl Detector for TriggeredDetector {
    fn observe(&mut self, obs: Observation) -> Verdict {
        match self.value_at_open {
            None => {
                if self.config.operator.forbidden(obs.val) {
                    self.value_at_open = Some(obs.val);
                    return Verdict::Open {
                        reason: format!("dependency value {} satisfied the trigger condition", obs.val),
                    };
                }
                Verdict::NoChange
            }
            Some(opened_val) => {
                let met = match self.config.expectation {
                    Expectation::Changed => obs.val != opened_val,
                    Expectation::Delta(min_delta) => (obs.val - opened_val).abs() >= min_delta,
                    Expectation::Threshold(compare) => !compare.forbidden(obs.val),
                };
                if met {
                    self.value_at_open = None;
                    return Verdict::Normal;
                }
                Verdict::NoChange
            }
        }
    }

    fn reset(&mut self) {
        self.value_at_open = None;
    }
}

#[cfg(test)]
#[path = "triggered_tests.rs"]
mod tests;
