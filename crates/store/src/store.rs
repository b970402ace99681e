// SPDX-License-Identifier: MIT

//! The message store (§4.1): single write path for all message state,
//! broadcasting one change event per successful mutation to the archive
//! and scheduler.

use crate::events::{ChangeEvent, CHANGE_CHANNEL_CAPACITY};
use crate::patch::MessagePatch;
use crate::query::{paginate, MessageFilter, Page, QueryResult};
use indexmap::IndexMap;
use msghub_core::{ChangeKind, Clock, HubResult, LifecycleState, Message};
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Holds messages by `ref`. All reads return owned copies (§3 "Ownership":
/// "callers receive values by copy semantics for reads").
#[derive(Clone)]
pub struct MessageStore<C: Clock> {
    messages: Arc<RwLock<IndexMap<String, Message>>>,
    changes: broadcast::Sender<ChangeEvent>,
    clock: C,
}

impl<C: Clock> MessageStore<C> {
    pub fn new(clock: C) -> Self {
        let (changes, _rx) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self { messages: Arc::new(RwLock::new(IndexMap::new())), changes, clock }
    }

    /// Subscribe to change events. Intended consumers are the archive and
    /// the scheduler; a subscriber that falls behind sees a lagged-receiver
    /// error rather than stalling mutations.
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.changes.subscribe()
    }

    /// Insert a new message. Returns `Ok(false)` (not an error) if `ref`
    /// already exists.
    pub fn add_message(&self, message: Message) -> HubResult<bool> {
        message.validate()?;
        let now = self.clock.epoch_ms();
        let mut guard = self.messages.write();
        if guard.contains_key(&message.r#ref) {
            return Ok(false);
        }
        let r#ref = message.r#ref.clone();
        guard.insert(r#ref.clone(), message.clone());
        drop(guard);
        self.emit(ChangeEvent { r#ref, kind: ChangeKind::Create, before: None, after: Some(message), ts: now });
        Ok(true)
    }

    /// Insert-or-replace a message wholesale.
    pub fn add_or_update_message(&self, message: Message) -> HubResult<()> {
        message.validate()?;
        let now = self.clock.epoch_ms();
        let r#ref = message.r#ref.clone();
        let mut guard = self.messages.write();
        let before = guard.insert(r#ref.clone(), message.clone());
        drop(guard);
        let kind = if before.is_some() { ChangeKind::Patch } else { ChangeKind::Create };
        self.emit(ChangeEvent { r#ref, kind, before, after: Some(message), ts: now });
        Ok(())
    }

    /// Deep-merge `patch` into the message at `ref` (§4.1 "Deep merge
    /// policy"). Returns `Ok(false)` (not an error) if `ref` is unknown.
    pub fn update_message(&self, r#ref: &str, patch: MessagePatch) -> HubResult<bool> {
        let now = self.clock.epoch_ms();
        let mut guard = self.messages.write();
        let Some(before) = guard.get(r#ref).cloned() else {
            return Ok(false);
        };
        let mut after = before.clone();
        apply_patch(&mut after, patch, now);
        after.validate()?;
        guard.insert(r#ref.to_string(), after.clone());
        drop(guard);
        self.emit(ChangeEvent {
            r#ref: r#ref.to_string(),
            kind: ChangeKind::Patch,
            before: Some(before),
            after: Some(after),
            ts: now,
        });
        Ok(true)
    }

    /// `completeAfterCauseEliminated` (§4.1): close the message, clear its
    /// pending notification, and mark progress complete.
    pub fn complete_after_cause_eliminated(
        &self,
        r#ref: &str,
        actor: Option<&str>,
        finished_at: u64,
    ) -> HubResult<bool> {
        let mut guard = self.messages.write();
        let Some(before) = guard.get(r#ref).cloned() else {
            return Ok(false);
        };
        let mut after = before.clone();
        after.lifecycle.transition(LifecycleState::Closed, finished_at, actor);
        after.timing.notify_at = None;
        after.progress.percentage = Some(100);
        after.progress.finished_at = Some(finished_at);
        after.validate()?;
        guard.insert(r#ref.to_string(), after.clone());
        drop(guard);
        self.emit(ChangeEvent {
            r#ref: r#ref.to_string(),
            kind: ChangeKind::Close,
            before: Some(before),
            after: Some(after),
            ts: finished_at,
        });
        Ok(true)
    }

    /// Remove a message permanently. Returns `false` if `ref` was unknown.
    pub fn remove_message(&self, r#ref: &str) -> bool {
        let now = self.clock.epoch_ms();
        let mut guard = self.messages.write();
        let Some(before) = guard.shift_remove(r#ref) else {
            return false;
        };
        drop(guard);
        self.emit(ChangeEvent {
            r#ref: r#ref.to_string(),
            kind: ChangeKind::Remove,
            before: Some(before),
            after: None,
            ts: now,
        });
        true
    }

    pub fn get_message_by_ref(&self, r#ref: &str) -> Option<Message> {
        self.messages.read().get(r#ref).cloned()
    }

    pub fn get_messages(&self) -> Vec<Message> {
        self.messages.read().values().cloned().collect()
    }

    pub fn query_messages(&self, filter: &MessageFilter, page: Page) -> QueryResult {
        let items: Vec<Message> =
            self.messages.read().values().filter(|m| filter.matches(m)).cloned().collect();
        paginate(items, page)
    }

    pub fn len(&self) -> usize {
        self.messages.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.read().is_empty()
    }

    fn emit(&self, event: ChangeEvent) {
        // No receivers is the common case in unit tests; a send error there
        // is not a failure of the mutation itself.
        let _ = self.changes.send(event);
    }
}

/// Apply the deep-merge rules from §4.1 to `msg` in place.
fn apply_patch(msg: &mut Message, patch: MessagePatch, now: u64) {
    if let Some(title) = patch.title {
        msg.title = title;
    }
    if let Some(text) = patch.text {
        msg.text = text;
    }
    patch.text_recovered.apply(&mut msg.text_recovered);
    patch.icon.apply(&mut msg.icon);
    if let Some(level) = patch.level {
        msg.level = level;
    }
    patch.details.apply(&mut msg.details);
    if let Some(attachments) = patch.attachments {
        msg.attachments = attachments;
    }

    if let Some(lifecycle) = patch.lifecycle {
        if let Some(state) = lifecycle.state {
            msg.lifecycle.transition(state, now, lifecycle.actor.as_deref());
        }
    }

    if let Some(timing) = patch.timing {
        timing.start_at.apply(&mut msg.timing.start_at);
        timing.notify_at.apply(&mut msg.timing.notify_at);
        timing.remind_every.apply(&mut msg.timing.remind_every);
        timing.cooldown.apply(&mut msg.timing.cooldown);
        timing.time_budget.apply(&mut msg.timing.time_budget);
        timing.due_at.apply(&mut msg.timing.due_at);
        timing.expires_at.apply(&mut msg.timing.expires_at);
    }

    if let Some(actions) = patch.actions {
        msg.actions = actions;
    }

    if let Some(metrics) = patch.metrics {
        // "metrics.set upserts keyed entries stamped with ts=now" (§4.1) —
        // the store owns the timestamp regardless of what the caller set.
        let mut stamped = msghub_core::JsonMap::new();
        for (key, mut entry) in metrics.set {
            entry.ts = now;
            stamped.insert(key, entry);
        }
        msg.metrics.merge(&stamped);
        msg.metrics.delete_many(&metrics.delete);
    }

    if let Some(progress) = patch.progress {
        progress.percentage.apply(&mut msg.progress.percentage);
        progress.started_at.apply(&mut msg.progress.started_at);
        progress.finished_at.apply(&mut msg.progress.finished_at);
    }

    if let Some(audience) = patch.audience {
        msg.audience = audience;
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
