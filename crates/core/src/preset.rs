// SPDX-License-Identifier: MIT

//! Presets (§3 "Preset"): immutable, id-addressed templates the rule engine
//! resolves into concrete messages. A preset is everything about a message
//! except its `ref` — the rule engine supplies that from the monitored
//! target id when it materializes a new instance.

use crate::constants::{Kind, Level};
use crate::message::{ActionSpec, Attachment, Audience, Details, Lifecycle, Message, Timing};
use serde::{Deserialize, Serialize};

/// Everything a preset specifies about the message it produces, short of
/// the `ref` (assigned at materialization) and lifecycle/timing fields that
/// are scheduler/user-owned and start from their defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageTemplate {
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
    #[serde(default)]
    pub timing: Timing,
    #[serde(default)]
    pub actions: Vec<ActionSpec>,
    #[serde(default)]
    pub audience: Audience,
}

impl MessageTemplate {
    /// Build a concrete, freshly `open` message for `message_ref`, ready to
    /// hand to `addMessage`. Callers (the `TargetMessageWriter`) still merge
    /// in runtime data — resolved location, seeded metrics — on top.
    pub fn materialize(&self, message_ref: impl Into<String>, opened_at: u64) -> Message {
        Message {
            r#ref: message_ref.into(),
            kind: self.kind.clone(),
            level: self.level,
            origin: self.origin.clone(),
            title: self.title.clone(),
            text: self.text.clone(),
            text_recovered: self.text_recovered.clone(),
            icon: self.icon.clone(),
            details: self.details.clone(),
            attachments: self.attachments.clone(),
            lifecycle: {
                let mut lc = Lifecycle::new(crate::constants::LifecycleState::Open);
                lc.state_changed_at = Some(opened_at);
                lc
            },
            timing: self.timing.clone(),
            actions: self.actions.clone(),
            metrics: Default::default(),
            progress: Default::default(),
            audience: self.audience.clone(),
        }
    }
}

/// Close-behavior policy attached to a preset (§4.7 "Close semantics").
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetPolicy {
    /// `true`: a normal signal auto-closes via `completeAfterCauseEliminated`.
    /// `false`: a normal signal injects an idempotent `close` action instead.
    pub reset_on_normal: bool,
}

/// An immutable, id-addressed message template (§3 "Preset").
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    pub preset_id: String,
    pub owned_by: String,
    pub subset: String,
    pub message: MessageTemplate,
    pub policy: PresetPolicy,
}

impl Preset {
    /// Whether `deleter` may remove this preset (§7 `FORBIDDEN`: "attempt
    /// to delete an owned preset"). Only the owner may delete its own
    /// preset; unowned (`ownedBy` empty) presets may be deleted by anyone.
    pub fn deletable_by(&self, deleter: &str) -> bool {
        self.owned_by.is_empty() || self.owned_by == deleter
    }
}

#[cfg(any(test, feature = "test-support"))]
mod test_support {
    use super::*;

    crate::builder! {
        pub struct MessageTemplateBuilder => MessageTemplate {
            into {
                origin: String = "test",
                title: String = "Title",
                text: String = "Text",
            }
            set {
                kind: Kind = Kind::Status,
                level: Level = Level::Info,
                attachments: Vec<Attachment> = Vec::new(),
                timing: Timing = Timing::default(),
                actions: Vec<ActionSpec> = Vec::new(),
                audience: Audience = Audience::default(),
            }
            option {
                text_recovered: String = None,
                icon: String = None,
                details: Details = None,
            }
        }
    }

    crate::builder! {
        pub struct PresetBuilder => Preset {
            into {
                preset_id: String = "preset-1",
                owned_by: String = "",
                subset: String = "default",
            }
            set {
                message: MessageTemplate = MessageTemplateBuilder::default().build(),
                policy: PresetPolicy = PresetPolicy::default(),
            }
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use test_support::{MessageTemplateBuilder, PresetBuilder};

#[cfg(test)]
#[path = "preset_tests.rs"]
mod tests;
