// SPDX-License-Identifier: MIT

//! Request payloads for the admin command surface (§6). Each variant name
//! mirrors a `command` string from the spec's table; the host's command
//! router matches on it and forwards the payload to the relevant core
//! subsystem.

use msghub_core::{Kind, Level, LifecycleState, Preset};
use serde::{Deserialize, Serialize};

/// `admin.stats.get` payload: `{include:{archiveSize:bool}}`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StatsInclude {
    #[serde(default)]
    pub archive_size: bool,
}

/// `query.where` clause: every field optional, same semantics as
/// `msghub-store`'s `MessageFilter`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MessageWhere {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<Kind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level_min: Option<Level>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level_max: Option<Level>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifecycle_state: Option<LifecycleState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience_tags_any: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routed_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_by: Option<u64>,
}

/// `admin.messages.query` payload: `{query:{where,orderBy,page,pageSize}}`.
/// `order_by` is accepted for forward compatibility but the core enforces
/// the single stable order from §4.1 regardless of its value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MessageQuery {
    #[serde(default)]
    pub r#where: MessageWhere,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for MessageQuery {
    fn default() -> Self {
        Self { r#where: MessageWhere::default(), order_by: None, page: default_page(), page_size: default_page_size() }
    }
}

fn default_page() -> usize {
    1
}

fn default_page_size() -> usize {
    50
}

/// `admin.messages.delete` payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MessagesDelete {
    pub refs: Vec<String>,
}

/// `admin.archive.retryNative` / `admin.archive.forceIobroker` take no
/// payload; `admin.constants.get` and `admin.archive.status` likewise.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Empty {}

/// `admin.ingestStates.presets.get` / `.delete` payload. A preset is
/// addressed by the `(presetId, subset)` pair; `subset` defaults to
/// `"default"` for callers that don't partition their presets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PresetRef {
    pub preset_id: String,
    #[serde(default = "default_subset")]
    pub subset: String,
}

/// `admin.ingestStates.presets.delete` payload: deleting a preset is a
/// policy-checked operation, so the actor performing it is carried along.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PresetDelete {
    pub preset_id: String,
    #[serde(default = "default_subset")]
    pub subset: String,
    pub actor: String,
}

fn default_subset() -> String {
    "default".to_string()
}

/// `admin.ingestStates.presets.upsert` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetUpsert {
    pub preset: Preset,
}

/// `admin.ingestStates.bulkApply.{preview,apply}` payload: `pattern`
/// selects targets by id glob, `custom`/`replace` choose how the matched
/// targets' preset assignment changes, `limit` caps how many are touched
/// in one call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BulkApplyRequest {
    pub pattern: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<String>,
    #[serde(default)]
    pub replace: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
