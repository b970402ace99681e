// SPDX-License-Identifier: MIT

//! Preset storage (§3 "Preset", §6 `admin.ingestStates.presets.*`): an
//! id-addressed, ownership-checked registry the rule engine resolves
//! against when materializing new target messages.

use msghub_core::{HubError, HubResult, Preset};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Two presets may share a `preset_id` while partitioning distinct targets
/// by `subset` (§3 "Preset"); the pair is the only thing that uniquely
/// addresses one.
type PresetKey = (String, String);

fn key(preset_id: &str, subset: &str) -> PresetKey {
    (preset_id.to_string(), subset.to_string())
}

#[derive(Default)]
pub struct PresetRegistry {
    presets: RwLock<HashMap<PresetKey, Preset>>,
}

impl PresetRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn list(&self) -> Vec<Preset> {
        self.presets.read().values().cloned().collect()
    }

    pub fn get(&self, preset_id: &str, subset: &str) -> HubResult<Preset> {
        self.presets
            .read()
            .get(&key(preset_id, subset))
            .cloned()
            .ok_or_else(|| HubError::not_found(format!("unknown preset: {preset_id}/{subset}")))
    }

    /// Insert or replace a preset wholesale (§6 `admin.ingestStates.presets.upsert`).
    pub fn upsert(&self, preset: Preset) {
        self.presets.write().insert(key(&preset.preset_id, &preset.subset), preset);
    }

    /// Delete a preset, enforcing ownership (§7 `FORBIDDEN`: "attempt to
    /// delete an owned preset").
    pub fn delete(&self, preset_id: &str, subset: &str, actor: &str) -> HubResult<()> {
        let mut guard = self.presets.write();
        let k = key(preset_id, subset);
        let Some(preset) = guard.get(&k) else {
            return Err(HubError::not_found(format!("unknown preset: {preset_id}/{subset}")));
        };
        if !preset.deletable_by(actor) {
            return Err(HubError::forbidden(format!("preset {preset_id}/{subset} is owned by {}", preset.owned_by)));
        }
        guard.remove(&k);
        Ok(())
    }
}

#[cfg(test)]
#[path = "presets_tests.rs"]
mod tests;
