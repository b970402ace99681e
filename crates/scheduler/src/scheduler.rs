// SPDX-License-Identifier: MIT

//! The notification scheduler (§4.4): a tick-driven selector that expires
//! overdue messages, gates due messages through quiet hours, reschedules
//! reminders, and hands ordered batches to the caller for fire-and-forget
//! dispatch to notify plugins. The scheduler does not own a dispatch
//! channel itself — the plugin host drives `tick()` and fans the result
//! out, so a slow plugin can never block the next tick.

use crate::jitter::{Jitter, RandJitter};
use crate::quiet_hours::{self, QuietHoursConfig};
use msghub_core::{Clock, Message};
use msghub_store::{Field, LifecyclePatch, MessagePatch, MessageStore, TimingPatch};
use std::collections::HashSet;
use std::sync::Arc;

/// Scheduler-wide settings (§4.4: "tick loop at a configurable interval").
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub tick_interval_ms: u64,
    pub quiet_hours: Option<QuietHoursConfig>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { tick_interval_ms: 5_000, quiet_hours: None }
    }
}

/// The ordered result of one tick (§4.4 "Ordering guarantee").
#[derive(Debug, Clone, Default)]
pub struct TickOutcome {
    pub expired: Vec<Message>,
    pub due: Vec<Message>,
}

impl TickOutcome {
    pub fn is_empty(&self) -> bool {
        self.expired.is_empty() && self.due.is_empty()
    }
}

pub struct Scheduler<C: Clock> {
    store: MessageStore<C>,
    clock: C,
    config: SchedulerConfig,
    jitter: Arc<dyn Jitter>,
}

impl<C: Clock> Scheduler<C> {
    pub fn new(store: MessageStore<C>, clock: C, config: SchedulerConfig) -> Self {
        Self { store, clock, config, jitter: Arc::new(RandJitter) }
    }

    #[cfg(any(test, feature = "test-support"))]
    pub fn with_jitter(mut self, jitter: Arc<dyn Jitter>) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Run one scheduler pass (§4.4 steps 1-4). Step 5 (surfacing `updated`
    /// events for lifecycle transitions originating outside the scheduler)
    /// is the plugin host's job: it subscribes to the store's own change
    /// stream directly, since those transitions don't happen on a tick.
    pub fn tick(&self) -> TickOutcome {
        let now = self.clock.epoch_ms();
        let all = self.store.get_messages();

        let expired = self.expire_overdue(&all, now);
        let expired_refs: HashSet<&str> = expired.iter().map(|m| m.r#ref.as_str()).collect();

        let mut due: Vec<Message> = all
            .into_iter()
            .filter(|m| !expired_refs.contains(m.r#ref.as_str()))
            .filter(|m| m.lifecycle.state.is_notifiable())
            .filter(|m| m.timing.notify_at.map_or(false, |t| t <= now))
            .filter(|m| m.timing.expires_at.map_or(true, |e| e > now))
            .collect();

        if let Some(quiet_hours) = &self.config.quiet_hours {
            due = self.apply_quiet_hours(due, quiet_hours, now);
        }

        self.reschedule_reminders(&due, now);

        due.sort_by(|a, b| {
            b.level
                .cmp(&a.level)
                .then_with(|| a.timing.notify_at.cmp(&b.timing.notify_at))
                .then_with(|| a.r#ref.cmp(&b.r#ref))
        });

        TickOutcome { expired, due }
    }

    /// §4.4 step 3: messages past `expiresAt` transition to `expired`,
    /// independent of whether they were otherwise due this tick.
    fn expire_overdue(&self, candidates: &[Message], now: u64) -> Vec<Message> {
        let mut expired = Vec::new();
        for msg in candidates {
            if !msg.lifecycle.state.is_notifiable() {
                continue;
            }
            let Some(expires_at) = msg.timing.expires_at else { continue };
            if expires_at > now {
                continue;
            }
            let patch = MessagePatch {
                lifecycle: Some(LifecyclePatch {
                    state: Some(msghub_core::LifecycleState::Expired),
                    actor: None,
                }),
                timing: Some(TimingPatch { notify_at: Field::Clear, ..Default::default() }),
                ..Default::default()
            };
            if let Ok(true) = self.store.update_message(&msg.r#ref, patch) {
                if let Some(updated) = self.store.get_message_by_ref(&msg.r#ref) {
                    expired.push(updated);
                }
            }
        }
        expired
    }

    /// §4.4 step 2: defer gated messages to the end of the quiet window,
    /// plus jitter; ungated messages pass through untouched.
    fn apply_quiet_hours(&self, due: Vec<Message>, config: &QuietHoursConfig, now: u64) -> Vec<Message> {
        if quiet_hours::is_disabled(config) {
            return due;
        }
        let minute = quiet_hours::minute_of_day(now, config.utc_offset_min);
        if !quiet_hours::minute_in_window(minute, config.start_min, config.end_min) {
            return due;
        }

        let mut remaining = Vec::with_capacity(due.len());
        for msg in due {
            if !quiet_hours::level_is_gated(msg.level, config) {
                remaining.push(msg);
                continue;
            }
            let window_end = quiet_hours::window_end_ms(now, minute, config);
            let deferred_to = window_end + self.jitter.next_ms(config.spread_ms);
            let patch = MessagePatch {
                timing: Some(TimingPatch { notify_at: Field::Set(deferred_to), ..Default::default() }),
                ..Default::default()
            };
            let _ = self.store.update_message(&msg.r#ref, patch);
        }
        remaining
    }

    /// §4.4 step 4: after a successful (fire-and-forget) dispatch, either
    /// reschedule via `remindEvery` or clear `notifyAt` for a one-shot.
    fn reschedule_reminders(&self, due: &[Message], now: u64) {
        for msg in due {
            let notify_at = match msg.timing.remind_every {
                Some(every) if every > 0 => Field::Set(now + every),
                _ => Field::Clear,
            };
            let patch = MessagePatch {
                timing: Some(TimingPatch { notify_at, ..Default::default() }),
                ..Default::default()
            };
            let _ = self.store.update_message(&msg.r#ref, patch);
        }
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
