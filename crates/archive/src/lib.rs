// SPDX-License-Identifier: MIT

//! Append-only journal of message mutations and action audits (§4.6), with
//! probed native/host-storage backends and best-effort weekly retention.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

mod archive;
mod backend;
mod entries;
mod path;
mod retention;

pub use archive::{source, spawn_store_subscriber, Archive, ArchiveConfig, ArchiveStatus, StrategyChange};
pub use backend::{Backend, BackendLock, IobrokerBackend, NativeBackend};
pub use entries::{AuditEntry, ChangeEntry};
pub use path::ArchivePath;
pub use retention::RetentionReport;
