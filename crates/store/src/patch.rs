// SPDX-License-Identifier: MIT

//! Deep-merge patch types applied by [`crate::MessageStore::update_message`]
//! (§4.1 "Deep merge policy"). Patches are constructed in-process by the
//! action layer, the rule engine's `TargetMessageWriter`, and admin tooling
//! — they are not a wire format, so these types carry no serde impls.

use msghub_core::{ActionSpec, Attachment, Audience, Details, JsonMap, Level, LifecycleState, MetricEntry};

/// A field that may be left alone, explicitly cleared, or set to a new
/// value. Plain `Option<T>` can't distinguish "don't touch" from "clear",
/// which several timing fields need (e.g. ack/close/delete must clear
/// `notifyAt` regardless of its previous value).
#[derive(Debug, Clone, Copy, Default)]
pub enum Field<T> {
    #[default]
    Keep,
    Clear,
    Set(T),
}

impl<T> Field<T> {
    pub fn apply(self, target: &mut Option<T>) {
        match self {
            Field::Keep => {}
            Field::Clear => *target = None,
            Field::Set(v) => *target = Some(v),
        }
    }
}

/// Patch for `lifecycle`. `state_changed_at`/`state_changed_by` are not
/// patchable directly — the store stamps them itself via
/// [`msghub_core::Lifecycle::transition`] whenever `state` changes.
#[derive(Debug, Clone, Default)]
pub struct LifecyclePatch {
    pub state: Option<LifecycleState>,
    pub actor: Option<String>,
}

/// Patch for `timing`. Every field is independently keep/clear/set.
#[derive(Debug, Clone, Default)]
pub struct TimingPatch {
    pub start_at: Field<u64>,
    pub notify_at: Field<u64>,
    pub remind_every: Field<u64>,
    pub cooldown: Field<u64>,
    pub time_budget: Field<u64>,
    pub due_at: Field<u64>,
    pub expires_at: Field<u64>,
}

/// Patch for `metrics` — the `{set, delete}` form from §4.1.
#[derive(Debug, Clone, Default)]
pub struct MetricsPatch {
    pub set: JsonMap<MetricEntry>,
    pub delete: Vec<String>,
}

/// Patch for `progress` — also a `{set, delete}` form, keyed by field name
/// for `delete` (e.g. `"finishedAt"`).
#[derive(Debug, Clone, Default)]
pub struct ProgressPatch {
    pub percentage: Field<u8>,
    pub started_at: Field<u64>,
    pub finished_at: Field<u64>,
}

/// A patch to apply to a single message. Scalars replace; `lifecycle`,
/// `timing`, `metrics`, and `progress` merge per their own rules; arrays
/// (`attachments`, `actions`, `audience`) replace as a whole.
#[derive(Debug, Clone, Default)]
pub struct MessagePatch {
    pub title: Option<String>,
    pub text: Option<String>,
    pub text_recovered: Field<String>,
    pub icon: Field<String>,
    pub level: Option<Level>,
    pub details: Field<Details>,
    pub attachments: Option<Vec<Attachment>>,
    pub lifecycle: Option<LifecyclePatch>,
    pub timing: Option<TimingPatch>,
    pub actions: Option<Vec<ActionSpec>>,
    pub metrics: Option<MetricsPatch>,
    pub progress: Option<ProgressPatch>,
    pub audience: Option<Audience>,
}

#[cfg(test)]
#[path = "patch_tests.rs"]
mod tests;
