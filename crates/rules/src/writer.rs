// SPDX-License-Identifier: MIT

//! `TargetMessageWriter` (§4.7): the only thing allowed to mutate a rule
//! target's message. Owns the create/patch/close/cooldown-reopen/resume
//! algorithm so every rule kind shares one, carefully audited, write path
//! instead of re-deriving it per detector.

use crate::presets::PresetRegistry;
use msghub_core::{ActionSpec, ActionType, Clock, HubResult, JsonMap, LifecycleState, MetricEntry};
use msghub_store::{Field, LifecyclePatch, MessagePatch, MessageStore, TimingPatch};
use std::sync::Arc;

/// Identifies one rule instance's target and the preset it resolves
/// against. The message `ref` is derived from these three components, per
/// the metric-key convention in §3 ("`IngestStates.<instance>.<rule>.<id>.resetAt`").
#[derive(Debug, Clone)]
pub struct TargetContext {
    pub instance: String,
    pub rule: String,
    pub id: String,
    pub preset_id: String,
    /// Partitions presets sharing a `preset_id` (§3 "Preset"); resolved
    /// together with `preset_id` as the `(presetId, subset)` pair.
    pub subset: String,
    /// Resolved from a membership enum by the caller (§4.7 "Create": "location
    /// resolved from membership enum").
    pub location: Option<String>,
}

impl TargetContext {
    pub fn message_ref(&self) -> String {
        format!("{}.{}.{}", self.instance, self.rule, self.id)
    }

    fn reset_at_metric_key(&self) -> String {
        format!("IngestStates.{}.{}.{}.resetAt", self.instance, self.rule, self.id)
    }
}

pub struct TargetMessageWriter<C: Clock> {
    store: MessageStore<C>,
    presets: Arc<PresetRegistry>,
    stats_min_interval_ms: u64,
}

impl<C: Clock> TargetMessageWriter<C> {
    pub fn new(store: MessageStore<C>, presets: Arc<PresetRegistry>, stats_min_interval_ms: u64) -> Self {
        Self { store, presets, stats_min_interval_ms }
    }

    /// §4.7 "Create" / "Cooldown re-open": materialize, reopen, or leave
    /// alone depending on the target's current message state.
    pub fn open(&self, ctx: &TargetContext, reason: &str, now: u64) -> HubResult<()> {
        let r#ref = ctx.message_ref();
        match self.store.get_message_by_ref(&r#ref) {
            None => self.create(ctx, reason, now),
            Some(existing) if !existing.lifecycle.state.is_terminal() => {
                self.patch_changed_fields(ctx, &existing, reason, now)
            }
            Some(existing) => self.reopen_or_recreate(ctx, &existing, reason, now),
        }
    }

    fn create(&self, ctx: &TargetContext, reason: &str, now: u64) -> HubResult<()> {
        let preset = self.presets.get(&ctx.preset_id, &ctx.subset)?;
        let mut message = preset.message.materialize(ctx.message_ref(), now);
        if let Some(location) = &ctx.location {
            let mut details = message.details.clone().unwrap_or_default();
            details.location = Some(location.clone());
            message.details = Some(details);
        }
        message.metrics.insert("reason", MetricEntry::new(reason.to_string(), now));
        // Also used to recreate a target's message after it was deleted or
        // after its cooldown has fully elapsed, so the ref may already
        // exist in a terminal state — upsert rather than insert-only.
        self.store.add_or_update_message(message)?;
        Ok(())
    }

    /// §4.7 "Patch only changed fields": re-apply the preset's template
    /// fields only where they differ from the live message, leaving
    /// everything user/scheduler-owned alone.
    fn patch_changed_fields(
        &self,
        ctx: &TargetContext,
        existing: &msghub_core::Message,
        reason: &str,
        now: u64,
    ) -> HubResult<()> {
        let preset = self.presets.get(&ctx.preset_id, &ctx.subset)?;
        let template = &preset.message;
        let mut patch = MessagePatch::default();

        if template.title != existing.title {
            patch.title = Some(template.title.clone());
        }
        if template.text != existing.text {
            patch.text = Some(template.text.clone());
        }
        if template.level != existing.level {
            patch.level = Some(template.level);
        }
        if template.icon != existing.icon {
            patch.icon = match &template.icon {
                Some(icon) => Field::Set(icon.clone()),
                None => Field::Clear,
            };
        }

        let mut timing_patch = TimingPatch::default();
        let mut timing_changed = false;
        if template.timing.remind_every != existing.timing.remind_every {
            timing_patch.remind_every = match template.timing.remind_every {
                Some(v) => Field::Set(v),
                None => Field::Clear,
            };
            timing_changed = true;
        }
        if template.timing.cooldown != existing.timing.cooldown {
            timing_patch.cooldown = match template.timing.cooldown {
                Some(v) => Field::Set(v),
                None => Field::Clear,
            };
            timing_changed = true;
        }
        if timing_changed {
            patch.timing = Some(timing_patch);
        }

        let has_scalar_patch = patch.title.is_some()
            || patch.text.is_some()
            || patch.level.is_some()
            || !matches!(patch.icon, Field::Keep)
            || patch.timing.is_some();
        if !has_scalar_patch {
            return Ok(());
        }

        let mut metrics = JsonMap::new();
        metrics.insert("reason", MetricEntry::new(reason.to_string(), now));
        patch.metrics = Some(msghub_store::MetricsPatch { set: metrics, delete: Vec::new() });

        self.store.update_message(&ctx.message_ref(), patch)?;
        Ok(())
    }

    /// §4.7 "Cooldown re-open": a closed/deleted/expired target whose cause
    /// re-triggers inside `cooldown` reopens the same `ref` instead of
    /// creating a new message.
    fn reopen_or_recreate(
        &self,
        ctx: &TargetContext,
        existing: &msghub_core::Message,
        reason: &str,
        now: u64,
    ) -> HubResult<()> {
        if existing.lifecycle.state == LifecycleState::Deleted {
            return self.create(ctx, reason, now);
        }

        let closed_at = existing.lifecycle.state_changed_at.unwrap_or(now);
        let cooldown = existing.timing.cooldown.unwrap_or(0);
        if cooldown == 0 || now.saturating_sub(closed_at) >= cooldown {
            return self.create(ctx, reason, now);
        }

        let notify_at = closed_at + cooldown;
        let mut metrics = JsonMap::new();
        metrics.insert("reason", MetricEntry::new(reason.to_string(), now));
        let patch = MessagePatch {
            lifecycle: Some(LifecyclePatch { state: Some(LifecycleState::Open), actor: None }),
            timing: Some(TimingPatch { notify_at: Field::Set(notify_at), ..Default::default() }),
            metrics: Some(msghub_store::MetricsPatch { set: metrics, delete: Vec::new() }),
            ..Default::default()
        };
        self.store.update_message(&ctx.message_ref(), patch)?;
        Ok(())
    }

    /// §4.7 "Close semantics": apply the preset's `resetOnNormal` policy.
    pub fn close_normal(&self, ctx: &TargetContext, now: u64) -> HubResult<()> {
        let Some(existing) = self.store.get_message_by_ref(&ctx.message_ref()) else {
            return Ok(());
        };
        if !existing.lifecycle.state.is_notifiable() {
            return Ok(());
        }
        let preset = self.presets.get(&ctx.preset_id, &ctx.subset)?;

        if preset.policy.reset_on_normal {
            self.store.complete_after_cause_eliminated(&ctx.message_ref(), None, now)?;
            if let Some(recovered) = existing.text_recovered.clone() {
                let patch = MessagePatch {
                    text: Some(recovered),
                    timing: Some(TimingPatch { remind_every: Field::Clear, ..Default::default() }),
                    ..Default::default()
                };
                self.store.update_message(&ctx.message_ref(), patch)?;
            }
        } else {
            let mut actions = existing.actions.clone();
            if !actions.iter().any(|a| a.action_type == ActionType::Close) {
                actions.push(ActionSpec { id: "close".to_string(), action_type: ActionType::Close, payload: None });
            }
            let patch = MessagePatch {
                actions: Some(actions),
                text: existing.text_recovered.clone(),
                ..Default::default()
            };
            self.store.update_message(&ctx.message_ref(), patch)?;
        }
        Ok(())
    }

    /// §4.7 "Metric throttling": write iff the value differs and enough
    /// time has elapsed since the last write, or `force` overrides both
    /// checks. Returns whether a write happened.
    pub fn patch_metrics(
        &self,
        ctx: &TargetContext,
        key: &str,
        value: serde_json::Value,
        unit: Option<&str>,
        force: bool,
        stats_max_interval_ms: u64,
        now: u64,
    ) -> HubResult<bool> {
        let Some(existing) = self.store.get_message_by_ref(&ctx.message_ref()) else {
            return Ok(false);
        };
        let previous = existing.metrics.get(key);
        let differs = previous.map(|p| p.val != value).unwrap_or(true);
        let elapsed = previous.map(|p| now.saturating_sub(p.ts)).unwrap_or(u64::MAX);
        let overdue = stats_max_interval_ms > 0 && elapsed >= stats_max_interval_ms;

        let should_write = force || (differs && elapsed >= self.stats_min_interval_ms) || overdue;
        if !should_write {
            return Ok(false);
        }

        let mut entry = MetricEntry::new(value, now);
        if let Some(unit) = unit {
            entry = entry.with_unit(unit);
        }
        let mut set = JsonMap::new();
        set.insert(key.to_string(), entry);
        let patch = MessagePatch {
            metrics: Some(msghub_store::MetricsPatch { set, delete: Vec::new() }),
            ..Default::default()
        };
        self.store.update_message(&ctx.message_ref(), patch)?;
        Ok(true)
    }

    /// §4.7 "Resume-after-restart": persist the next scheduled evaluation
    /// instant for timer-driven rules (freshness/cycle), so a lost
    /// in-process timer can still be honored on the next sweep.
    pub fn write_reset_at(&self, ctx: &TargetContext, reset_at: u64, now: u64) -> HubResult<()> {
        let mut set = JsonMap::new();
        set.insert(ctx.reset_at_metric_key(), MetricEntry::new(reset_at as f64, now));
        let patch = MessagePatch {
            metrics: Some(msghub_store::MetricsPatch { set, delete: Vec::new() }),
            ..Default::default()
        };
        let _ = self.store.update_message(&ctx.message_ref(), patch);
        Ok(())
    }

    /// §4.7 "Resume-after-restart": targets whose persisted `resetAt`
    /// deadline is already overdue. Callers re-instantiate an in-memory
    /// detector for each and call `poll(now)` on it directly.
    pub fn overdue_scheduled(&self, now: u64) -> Vec<(String, u64)> {
        let mut overdue = Vec::new();
        for message in self.store.get_messages() {
            for (key, entry) in message.metrics.iter() {
                if !key.starts_with("IngestStates.") || !key.ends_with(".resetAt") {
                    continue;
                }
                if let Some(reset_at) = entry.val.as_f64() {
                    if (reset_at as u64) <= now {
                        overdue.push((message.r#ref.clone(), reset_at as u64));
                    }
                }
            }
        }
        overdue
    }
}

#[cfg(test)]
#[path = "writer_tests.rs"]
mod tests;
