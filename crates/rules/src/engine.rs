// SPDX-License-Identifier: MIT

//! Ties a target's [`Detector`] to its [`TargetMessageWriter`] (§4.7): owns
//! the live registry of per-target rule instances, dispatches incoming
//! observations to the right one, and turns a [`Verdict`] into the
//! corresponding store write.

use crate::cycle::{CycleConfig, CycleDetector};
use crate::detector::{Detector, Verdict};
use crate::freshness::{FreshnessConfig, FreshnessDetector};
use crate::nonsettling::{NonSettlingConfig, NonSettlingDetector};
use crate::observation::accept;
use crate::session::{SessionConfig, SessionDetector};
use crate::threshold::{ThresholdConfig, ThresholdDetector};
use crate::triggered::{TriggeredConfig, TriggeredDetector};
use crate::writer::{TargetContext, TargetMessageWriter};
use msghub_core::{Clock, HubResult};
use parking_lot::Mutex;
use std::collections::HashMap;

/// The algorithm and tunables for one rule instance, independent of which
/// target it watches (§4.7 "Rule kinds").
#[derive(Debug, Clone, Copy)]
pub enum RuleConfig {
    Threshold(ThresholdConfig),
    Freshness(FreshnessConfig),
    Cycle(CycleConfig),
    Triggered(TriggeredConfig),
    NonSettling(NonSettlingConfig),
    Session(SessionConfig),
}

fn build_detector(config: RuleConfig) -> Box<dyn Detector> {
    match config {
        RuleConfig::Threshold(c) => Box::new(ThresholdDetector::new(c)),
        RuleConfig::Freshness(c) => Box::new(FreshnessDetector::new(c)),
        RuleConfig::Cycle(c) => Box::new(CycleDetector::new(c)),
        RuleConfig::Triggered(c) => Box::new(TriggeredDetector::new(c)),
        RuleConfig::NonSettling(c) => Box::new(NonSettlingDetector::new(c)),
        RuleConfig::Session(c) => Box::new(SessionDetector::new(c)),
    }
}

struct TargetInstance {
    ctx: TargetContext,
    detector: Box<dyn Detector>,
}

/// Live per-target rule state plus the single writer every target shares.
/// Keyed by the target's own message `ref` (`instance.rule.id`), since that
/// is already unique per the writer's own convention.
pub struct RuleEngine<C: Clock> {
    writer: TargetMessageWriter<C>,
    targets: Mutex<HashMap<String, TargetInstance>>,
}

impl<C: Clock> RuleEngine<C> {
    pub fn new(writer: TargetMessageWriter<C>) -> Self {
        Self { writer, targets: Mutex::new(HashMap::new()) }
    }

    /// Register (or replace) a target's rule instance. Replacing an
    /// already-registered target starts its detector from a clean state
    /// (§4.7 edge case: "configuration changes reset rule history for that
    /// target") since a fresh `Box<dyn Detector>` is built from scratch.
    pub fn register(&self, ctx: TargetContext, config: RuleConfig) {
        let key = ctx.message_ref();
        let detector = build_detector(config);
        self.targets.lock().insert(key, TargetInstance { ctx, detector });
    }

    pub fn unregister(&self, target_key: &str) {
        self.targets.lock().remove(target_key);
    }

    pub fn is_registered(&self, target_key: &str) -> bool {
        self.targets.lock().contains_key(target_key)
    }

    /// Feed one `(ts, val)` sample to `target_key`'s detector and apply
    /// whatever verdict results. Observations that fail [`accept`] (missing
    /// or non-finite) are silently dropped, per §4.7. Unregistered targets
    /// are silently ignored: ingest may still be delivering for a target
    /// whose rule was just removed.
    pub fn observe(&self, target_key: &str, ts: u64, val: Option<f64>) -> HubResult<()> {
        let Some(obs) = accept(ts, val) else { return Ok(()) };
        let (ctx, verdict) = {
            let mut targets = self.targets.lock();
            let Some(instance) = targets.get_mut(target_key) else { return Ok(()) };
            (instance.ctx.clone(), instance.detector.observe(obs))
        };
        self.apply(&ctx, verdict, ts)
    }

    /// Give every registered target's detector a chance to act on elapsed
    /// time alone (freshness/cycle timers). Called once per scheduler tick.
    pub fn poll_all(&self, now: u64) -> HubResult<()> {
        let verdicts: Vec<(TargetContext, Verdict)> = {
            let mut targets = self.targets.lock();
            targets
                .values_mut()
                .map(|instance| (instance.ctx.clone(), instance.detector.poll(now)))
                .collect()
        };
        for (ctx, verdict) in verdicts {
            self.apply(&ctx, verdict, now)?;
        }
        Ok(())
    }

    /// Clear a target's detector history without unregistering it (§4.7
    /// edge case, config-change path when the caller already holds the new
    /// [`RuleConfig`] and prefers [`register`] to build the fresh detector).
    pub fn reset_target(&self, target_key: &str) {
        if let Some(instance) = self.targets.lock().get_mut(target_key) {
            instance.detector.reset();
        }
    }

    /// Targets whose persisted `resetAt` deadline (§4.7 "Resume-after-
    /// restart") has already passed. A freshly started process has no
    /// in-memory detector state to resume, so the caller re-registers each
    /// of these with its rule config and lets the next `poll_all` catch the
    /// overdue condition.
    pub fn overdue_targets(&self, now: u64) -> Vec<String> {
        self.writer.overdue_scheduled(now).into_iter().map(|(target_ref, _deadline)| target_ref).collect()
    }

    fn apply(&self, ctx: &TargetContext, verdict: Verdict, now: u64) -> HubResult<()> {
        match verdict {
            Verdict::Open { reason } => self.writer.open(ctx, &reason, now),
            Verdict::Normal => self.writer.close_normal(ctx, now),
            Verdict::NoChange => Ok(()),
        }
    }

    pub fn writer(&self) -> &TargetMessageWriter<C> {
        &self.writer
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
