// SPDX-License-Identifier: MIT

//! Response payloads for the admin command surface (§6), plus the
//! `{ok:true,data}` / `{ok:false,error:{code,message}}` envelope every
//! command answers through.

use msghub_core::{HubError, Message};
use serde::{Deserialize, Serialize};

/// `error.code`/`error.message` — mirrors [`msghub_core::HubErrorKind`]
/// without requiring callers to depend on `msghub-core` directly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorDto {
    pub code: String,
    pub message: String,
}

impl From<&HubError> for ErrorDto {
    fn from(err: &HubError) -> Self {
        Self { code: err.kind.code().to_string(), message: err.message.clone() }
    }
}

impl From<HubError> for ErrorDto {
    fn from(err: HubError) -> Self {
        Self::from(&err)
    }
}

/// The envelope every admin command answers through: `{ok:true,data}` or
/// `{ok:false,error}`. `data`/`error` are kept as plain `Option`s rather
/// than an enum so the `ok` field always serializes first and literally,
/// matching the wire shape in §6 byte for byte.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDto>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self { ok: true, data: Some(data), error: None }
    }

    pub fn err(error: impl Into<ErrorDto>) -> Self {
        Self { ok: false, data: None, error: Some(error.into()) }
    }
}

/// `admin.messages.query` response: `{items,total,pages,meta}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageQueryResult {
    pub items: Vec<Message>,
    pub total: usize,
    pub pages: usize,
    pub meta: QueryMeta,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QueryMeta {
    pub page: usize,
    pub page_size: usize,
}

/// `admin.messages.delete` response.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessagesDeleted {
    pub removed: usize,
}

/// `admin.constants.get` response: `{kind, level, lifecycle}`, each an
/// array of the enum's wire string values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConstantsDto {
    pub kind: Vec<String>,
    pub level: Vec<String>,
    pub lifecycle: Vec<String>,
}

/// `admin.archive.status` response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveStatusDto {
    pub configured_strategy_lock: String,
    pub effective_strategy: String,
    pub lock_reason: String,
    pub base_dir: String,
    pub file_extension: String,
}

/// `admin.archive.retryNative` / `admin.archive.forceIobroker` response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StrategyChangeDto {
    pub next_lock: String,
    pub restart_required: bool,
}

/// `admin.ingestStates.bulkApply.{preview,apply}` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BulkApplyResult {
    pub matched: usize,
    pub applied: usize,
    pub errors: Vec<String>,
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;
