// SPDX-License-Identifier: MIT

//! The workflow action layer (§4.3): applies whitelisted actions
//! (ack/close/delete/snooze) against a message by patching the store, and
//! records an audit event to the archive for every call — success or
//! failure, never throwing.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

use msghub_archive::{self as archive, Archive, AuditEntry};
use msghub_core::{ActionType, Clock, LifecycleState};
use msghub_store::{Field, LifecyclePatch, MessagePatch, MessageStore, TimingPatch};
use std::sync::Arc;

/// A caller's request to invoke one whitelisted action on one message
/// (§4.3 "Inputs").
#[derive(Debug, Clone, Default)]
pub struct ActionRequest {
    pub r#ref: String,
    pub action_id: String,
    pub actor: Option<String>,
    pub payload: Option<serde_json::Value>,
    pub snooze_for_ms: Option<u64>,
}

/// Result of executing one [`ActionRequest`]. `ok` is the boolean the
/// caller sees; `reason` is the exact audit reason code (§8 scenario 6).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub ok: bool,
    pub noop: bool,
    pub reason: Option<&'static str>,
}

impl ActionOutcome {
    fn ok() -> Self {
        Self { ok: true, noop: false, reason: None }
    }

    fn noop() -> Self {
        Self { ok: true, noop: true, reason: None }
    }

    fn failure(reason: &'static str) -> Self {
        Self { ok: false, noop: false, reason: Some(reason) }
    }

    fn accepted(reason: &'static str) -> Self {
        Self { ok: true, noop: true, reason: Some(reason) }
    }
}

/// Executes actions against the store and audits every call (§4.3).
pub struct ActionService<C: Clock> {
    store: MessageStore<C>,
    archive: Arc<Archive<C>>,
    clock: C,
}

impl<C: Clock> ActionService<C> {
    pub fn new(store: MessageStore<C>, archive: Arc<Archive<C>>, clock: C) -> Self {
        Self { store, archive, clock }
    }

    pub async fn execute(&self, request: ActionRequest) -> ActionOutcome {
        let now = self.clock.epoch_ms();

        let Some(message) = self.store.get_message_by_ref(&request.r#ref) else {
            let outcome = ActionOutcome::failure("message_not_found");
            self.audit(&request, &outcome, ActionType::Custom, now).await;
            return outcome;
        };

        let Some(action) = message.find_action(&request.action_id) else {
            let outcome = ActionOutcome::failure("not_allowed");
            self.audit(&request, &outcome, ActionType::Custom, now).await;
            return outcome;
        };
        let action_type = action.action_type;

        if !action_type.is_core() {
            let outcome = ActionOutcome::accepted("non_core");
            self.audit(&request, &outcome, action_type, now).await;
            return outcome;
        }

        if !policy_allows(message.lifecycle.state, action_type) {
            let outcome = ActionOutcome::failure("blocked_by_policy");
            self.audit(&request, &outcome, action_type, now).await;
            return outcome;
        }

        // Idempotence (§4.3 step 6, §8): ack on an already-acked message
        // with no pending notify short-circuits as a no-op.
        if action_type == ActionType::Ack
            && message.lifecycle.state == LifecycleState::Acked
            && message.timing.notify_at.is_none()
        {
            let outcome = ActionOutcome::noop();
            self.audit(&request, &outcome, action_type, now).await;
            return outcome;
        }

        let patch = match build_patch(action_type, &request, now) {
            Ok(patch) => patch,
            Err(reason) => {
                let outcome = ActionOutcome::failure(reason);
                self.audit(&request, &outcome, action_type, now).await;
                return outcome;
            }
        };

        let applied = self.store.update_message(&request.r#ref, patch);
        let outcome = match applied {
            Ok(true) => ActionOutcome::ok(),
            Ok(false) => ActionOutcome::failure("message_not_found"),
            Err(_) => ActionOutcome::failure("blocked_by_policy"),
        };
        self.audit(&request, &outcome, action_type, now).await;
        outcome
    }

    async fn audit(&self, request: &ActionRequest, outcome: &ActionOutcome, action_type: ActionType, now: u64) {
        let entry = AuditEntry {
            event: AuditEntry::event_name().to_string(),
            r#ref: request.r#ref.clone(),
            ts: now,
            action_id: request.action_id.clone(),
            action_type: action_type.to_string(),
            actor: request.actor.clone(),
            ok: outcome.ok,
            reason: outcome.reason.map(str::to_string),
            noop: outcome.noop,
        };
        self.archive.append_audit(archive::source::AUDITS, &entry).await;
    }
}

/// The policy matrix (§4.3 step 3).
fn policy_allows(state: LifecycleState, action_type: ActionType) -> bool {
    use ActionType::*;
    use LifecycleState::*;
    matches!(
        (state, action_type),
        (Open, Ack) | (Open, Close) | (Open, Delete) | (Open, Snooze)
            | (Acked, Close) | (Acked, Delete)
            | (Snoozed, Ack) | (Snoozed, Close) | (Snoozed, Delete)
    )
}

fn build_patch(action_type: ActionType, request: &ActionRequest, now: u64) -> Result<MessagePatch, &'static str> {
    let mut patch = MessagePatch::default();
    match action_type {
        ActionType::Ack => {
            patch.lifecycle = Some(LifecyclePatch { state: Some(LifecycleState::Acked), actor: request.actor.clone() });
            patch.timing = Some(TimingPatch { notify_at: Field::Clear, ..Default::default() });
        }
        ActionType::Close => {
            patch.lifecycle = Some(LifecyclePatch { state: Some(LifecycleState::Closed), actor: request.actor.clone() });
            patch.timing = Some(TimingPatch { notify_at: Field::Clear, ..Default::default() });
        }
        ActionType::Delete => {
            patch.lifecycle = Some(LifecyclePatch { state: Some(LifecycleState::Deleted), actor: request.actor.clone() });
            patch.timing = Some(TimingPatch { notify_at: Field::Clear, ..Default::default() });
        }
        ActionType::Snooze => {
            let for_ms = request
                .snooze_for_ms
                .or_else(|| request.payload.as_ref().and_then(|p| p.get("forMs")).and_then(|v| v.as_u64()));
            let Some(for_ms) = for_ms.filter(|ms| *ms > 0) else {
                return Err("bad_request");
            };
            patch.lifecycle = Some(LifecyclePatch { state: Some(LifecycleState::Snoozed), actor: request.actor.clone() });
            patch.timing = Some(TimingPatch { notify_at: Field::Set(now + for_ms), ..Default::default() });
        }
        // Non-core types are intercepted before `build_patch` is called; this
        // arm only exists to keep the match exhaustive.
        ActionType::Open | ActionType::Link | ActionType::Custom => return Err("non_core"),
    }
    Ok(patch)
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
