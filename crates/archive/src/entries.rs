// SPDX-License-Identifier: MIT

//! JSONL entry shapes the archive appends (§4.6, §6 "Archive file format").
//! Every line has at minimum `{event, ref, ts}`; parsing beyond that is the
//! caller's responsibility, per spec — these types exist for the writer
//! side, not as a guaranteed read-side schema.

use msghub_core::Message;
use serde::{Deserialize, Serialize};

/// One store-mutation entry (§4.1 change emission -> §4.6 append).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEntry {
    pub event: String,
    pub r#ref: String,
    pub ts: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<Message>,
}

/// One action-audit entry (§4.3 "Every call appends an audit event").
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub event: String,
    pub r#ref: String,
    pub ts: u64,
    pub action_id: String,
    pub action_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub noop: bool,
}

impl AuditEntry {
    pub fn event_name() -> &'static str {
        "audit"
    }
}

#[cfg(test)]
#[path = "entries_tests.rs"]
mod tests;
