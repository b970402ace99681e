// SPDX-License-Identifier: MIT

//! The central entity (§3): a message keyed by a unique, caller-supplied
//! `ref`, carrying identity, presentation, lifecycle, timing, workflow,
//! telemetry, and audience data. `Message` itself only enforces the
//! invariants that must hold regardless of which subsystem touched it last;
//! normalization/defaulting lives in the factory, deep-merge patching in the
//! store.

use crate::constants::{ActionType, Kind, LifecycleState, Level};
use crate::error::{HubError, HubResult};
use crate::jsonmap::JsonMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Free-form presentation details attached to a message (§3 Presentation).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Details {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub consumables: Vec<String>,
}

/// A single attachment reference. `content_type`/`size_bytes` are hints the
/// factory fills in when available; sinks that render attachments (PDF
/// viewers, push-with-image) use them to decide how to fetch/display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
}

/// Lifecycle state plus provenance of the last transition (§3 Lifecycle).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lifecycle {
    pub state: LifecycleState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_changed_at: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_changed_by: Option<String>,
}

impl Lifecycle {
    pub fn new(state: LifecycleState) -> Self {
        Self { state, state_changed_at: None, state_changed_by: None }
    }

    /// Transition to `state`, stamping `changed_at`/`changed_by` the way
    /// every action/rule-engine mutation must (§3: "Each transition updates
    /// `stateChangedAt` and (if provided) `stateChangedBy`").
    pub fn transition(&mut self, state: LifecycleState, now: u64, actor: Option<&str>) {
        self.state = state;
        self.state_changed_at = Some(now);
        if let Some(actor) = actor {
            self.state_changed_by = Some(actor.to_string());
        }
    }
}

/// All epoch-ms instants and ms durations governing notification timing
/// (§3 Timing). Every field is nullable; absence carries meaning (e.g.
/// `notify_at == None` means "not pending notification").
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timing {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_at: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_at: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remind_every: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cooldown: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_budget: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_at: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<u64>,
}

/// An entry in `actions[]` — one whitelisted operation the caller may invoke
/// against this message (§3 Workflow, §4.3).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionSpec {
    pub id: String,
    #[serde(rename = "type")]
    pub action_type: ActionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
}

/// One telemetry sample in `metrics` (§3 Telemetry: `map<string, {val, unit, ts}>`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricEntry {
    pub val: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub ts: u64,
}

impl MetricEntry {
    pub fn new(val: impl Into<serde_json::Value>, ts: u64) -> Self {
        Self { val: val.into(), unit: None, ts }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }
}

/// Task completion progress (§3 Telemetry).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<u64>,
}

/// Routing hints (§3 Audience, §6).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channels {
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_to: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Audience {
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub channels: Channels,
}

/// The message itself. Field name `r#ref` maps to the wire name `ref`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(rename = "ref")]
    pub r#ref: String,
    pub kind: Kind,
    pub level: Level,
    pub origin: String,

    pub title: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_recovered: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Details>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,

    pub lifecycle: Lifecycle,
    #[serde(default)]
    pub timing: Timing,

    #[serde(default)]
    pub actions: Vec<ActionSpec>,

    #[serde(default)]
    pub metrics: JsonMap<MetricEntry>,
    #[serde(default)]
    pub progress: Progress,

    #[serde(default)]
    pub audience: Audience,
}

impl Message {
    /// Validate the invariants that must hold on every store read (§3).
    /// This does not normalize anything — that's the factory's job — it
    /// only rejects a message that has drifted out of shape.
    pub fn validate(&self) -> HubResult<()> {
        if self.r#ref.trim().is_empty() {
            return Err(HubError::bad_request("ref must be non-empty"));
        }

        let mut seen = HashSet::with_capacity(self.actions.len());
        for action in &self.actions {
            if action.id.is_empty() {
                return Err(HubError::bad_request("action id must be non-empty"));
            }
            if !seen.insert(action.id.as_str()) {
                return Err(HubError::bad_request(format!(
                    "duplicate action id: {}",
                    action.id
                )));
            }
        }

        if !self.kind.supports_due_timing()
            && (self.timing.due_at.is_some() || self.timing.time_budget.is_some())
        {
            return Err(HubError::bad_request(format!(
                "kind {} does not support dueAt/timeBudget",
                self.kind.as_str()
            )));
        }

        Ok(())
    }

    /// Find an action by id.
    pub fn find_action(&self, action_id: &str) -> Option<&ActionSpec> {
        self.actions.iter().find(|a| a.id == action_id)
    }

    /// Whether this message is a live candidate for scheduler notification
    /// (§4.4 step 1, minus the `notifyAt ≤ now` comparison itself).
    pub fn is_notification_candidate(&self) -> bool {
        self.lifecycle.state.is_notifiable() && self.timing.notify_at.is_some()
    }
}

#[cfg(any(test, feature = "test-support"))]
mod test_support {
    use super::*;

    crate::builder! {
        pub struct MessageBuilder => Message {
            into {
                r#ref: String = "m-1",
                kind: Kind = Kind::Status,
                origin: String = "test",
                title: String = "Title",
                text: String = "Text",
            }
            set {
                level: Level = Level::Info,
                lifecycle: Lifecycle = Lifecycle::new(LifecycleState::Open),
                timing: Timing = Timing::default(),
                actions: Vec<ActionSpec> = Vec::new(),
                metrics: JsonMap<MetricEntry> = JsonMap::new(),
                progress: Progress = Progress::default(),
                audience: Audience = Audience::default(),
                attachments: Vec<Attachment> = Vec::new(),
            }
            option {
                text_recovered: String = None,
                icon: String = None,
                details: Details = None,
            }
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use test_support::MessageBuilder;

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
