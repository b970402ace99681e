// SPDX-License-Identifier: MIT

//! DTOs for the admin command surface (§6): request payloads per
//! `admin.*` command and the `{ok:true,data}` / `{ok:false,error}`
//! envelope every one of them answers through. The core never binds these
//! to a transport — the host forwards them over whatever RPC it already
//! has (ioBroker's `sendTo`, an HTTP admin UI, …) and is the only thing
//! that actually dispatches on the `command` string.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

mod command;
mod response;

pub use command::{
    BulkApplyRequest, Empty, MessageQuery, MessageWhere, MessagesDelete, PresetDelete, PresetRef, PresetUpsert,
    StatsInclude,
};
pub use response::{
    ArchiveStatusDto, BulkApplyResult, ConstantsDto, Envelope, ErrorDto, MessageQueryResult, MessagesDeleted,
    QueryMeta, StrategyChangeDto,
};

/// The full `command` tag set from §6's table, kept here so a router can
/// match exhaustively without hand-copying the string literals.
pub mod command_name {
    pub const STATS_GET: &str = "admin.stats.get";
    pub const MESSAGES_QUERY: &str = "admin.messages.query";
    pub const MESSAGES_DELETE: &str = "admin.messages.delete";
    pub const CONSTANTS_GET: &str = "admin.constants.get";
    pub const ARCHIVE_STATUS: &str = "admin.archive.status";
    pub const ARCHIVE_RETRY_NATIVE: &str = "admin.archive.retryNative";
    pub const ARCHIVE_FORCE_IOBROKER: &str = "admin.archive.forceIobroker";
    pub const PRESETS_LIST: &str = "admin.ingestStates.presets.list";
    pub const PRESETS_GET: &str = "admin.ingestStates.presets.get";
    pub const PRESETS_UPSERT: &str = "admin.ingestStates.presets.upsert";
    pub const PRESETS_DELETE: &str = "admin.ingestStates.presets.delete";
    pub const BULK_APPLY_PREVIEW: &str = "admin.ingestStates.bulkApply.preview";
    pub const BULK_APPLY_APPLY: &str = "admin.ingestStates.bulkApply.apply";
}
