// SPDX-License-Identifier: MIT

//! `meta` half of a plugin's `ctx` (§4.5): merged from a host-provided base
//! (set once, e.g. the managed-objects reporter) and per-call fields the
//! host stamps on every dispatch.

use std::collections::HashMap;

/// Host-provided fields that don't change between calls, keyed loosely
/// since the set is host-specific (§4.5 "e.g., managed-objects reporter").
#[derive(Debug, Clone, Default)]
pub struct BaseMeta {
    pub fields: HashMap<String, serde_json::Value>,
}

/// Per-call fields the host stamps on every dispatch (§4.5 `meta`).
#[derive(Debug, Clone)]
pub struct CallMeta {
    pub plugin_id: String,
    pub reason: String,
    pub running: bool,
}

/// The merged `meta` a plugin callback actually receives: [`BaseMeta`]
/// overlaid with [`CallMeta`] for this one call.
#[derive(Debug, Clone)]
pub struct PluginMeta {
    pub plugin_id: String,
    pub reason: String,
    pub running: bool,
    pub base: HashMap<String, serde_json::Value>,
}

impl PluginMeta {
    pub fn merge(base: &BaseMeta, call: CallMeta) -> Self {
        Self { plugin_id: call.plugin_id, reason: call.reason, running: call.running, base: base.fields.clone() }
    }
}

#[cfg(test)]
#[path = "meta_tests.rs"]
mod tests;
