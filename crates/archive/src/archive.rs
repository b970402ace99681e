// SPDX-License-Identifier: MIT

//! The archive/journal (§4.6): subscribes to store changes, appends a
//! JSONL entry per mutation and per action audit, with a probed,
//! fallback-capable backend and best-effort weekly retention.

use crate::backend::{Backend, BackendLock, IobrokerBackend, NativeBackend};
use crate::entries::{AuditEntry, ChangeEntry};
use crate::path::ArchivePath;
use crate::retention::{self, RetentionReport};
use msghub_core::{Clock, HostFileStorage, HubResult, PathOpQueue};
use msghub_store::{ChangeEvent, MessageStore};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Normalized, effective archive configuration (§6 "archive" config block).
#[derive(Debug, Clone)]
pub struct ArchiveConfig {
    pub base_dir: std::path::PathBuf,
    pub file_extension: String,
    pub lock: BackendLock,
    pub keep_previous_weeks: u32,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            base_dir: std::path::PathBuf::from("archive"),
            file_extension: "jsonl".to_string(),
            lock: BackendLock::Native,
            keep_previous_weeks: 4,
        }
    }
}

/// Read-only status snapshot for `admin.archive.status` (§6).
#[derive(Debug, Clone)]
pub struct ArchiveStatus {
    pub configured_strategy_lock: BackendLock,
    pub effective_strategy: BackendLock,
    pub lock_reason: String,
    pub base_dir: String,
    pub file_extension: String,
}

/// Response to `admin.archive.retryNative` / `admin.archive.forceIobroker`
/// (§6): the strategy change always takes effect on next startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrategyChange {
    pub next_lock: BackendLock,
    pub restart_required: bool,
}

/// Fixed JSONL `event` sources this archive writes under. `changes` covers
/// every store mutation; `audits` covers action-layer audit entries.
pub mod source {
    pub const CHANGES: &str = "changes";
    pub const AUDITS: &str = "audits";
}

/// The append-only journal (§4.6). Generic over [`Clock`] so retention
/// sweeps and tests can run against a [`msghub_core::FakeClock`].
pub struct Archive<C: Clock> {
    config: ArchiveConfig,
    queue: PathOpQueue,
    effective: Arc<dyn Backend>,
    native: Arc<NativeBackend>,
    configured_lock: RwLock<BackendLock>,
    pending_flush: Arc<AtomicU64>,
    clock: C,
}

impl<C: Clock> Archive<C> {
    /// Start the archive: probe the native backend if configured, falling
    /// back to host storage on failure (§4.6 "Backend strategy").
    pub async fn start(
        config: ArchiveConfig,
        host: Option<Arc<dyn HostFileStorage>>,
        clock: C,
    ) -> Self {
        let native = Arc::new(NativeBackend::new(config.base_dir.clone(), config.file_extension.clone()));
        let effective: Arc<dyn Backend> = match config.lock {
            BackendLock::Native => match native.probe().await {
                Ok(()) => native.clone() as Arc<dyn Backend>,
                Err(e) => {
                    tracing::warn!(error = %e, "native archive backend probe failed, falling back to iobroker");
                    Self::iobroker_backend(host, &config)
                }
            },
            BackendLock::Iobroker => Self::iobroker_backend(host, &config),
        };
        let effective_kind = effective.kind();
        Self {
            configured_lock: RwLock::new(effective_kind),
            config,
            queue: PathOpQueue::new(),
            effective,
            native,
            pending_flush: Arc::new(AtomicU64::new(0)),
            clock,
        }
    }

    fn iobroker_backend(host: Option<Arc<dyn HostFileStorage>>, config: &ArchiveConfig) -> Arc<dyn Backend> {
        match host {
            Some(h) => Arc::new(IobrokerBackend::new(h, config.file_extension.clone())),
            None => {
                tracing::warn!("no host file storage provided; iobroker archive backend is inert");
                Arc::new(IobrokerBackend::new(Arc::new(NullHostFileStorage), config.file_extension.clone()))
            }
        }
    }

    pub fn status(&self) -> ArchiveStatus {
        ArchiveStatus {
            configured_strategy_lock: *self.configured_lock.read(),
            effective_strategy: self.effective.kind(),
            lock_reason: if self.effective.kind() == self.config.lock {
                "configured".to_string()
            } else {
                "probe-fallback".to_string()
            },
            base_dir: self.config.base_dir.to_string_lossy().to_string(),
            file_extension: self.config.file_extension.clone(),
        }
    }

    /// `admin.archive.retryNative` (§6): re-probe now; on success, record
    /// native as the configured lock for the *next* startup (the currently
    /// running effective backend never changes at runtime).
    pub async fn retry_native(&self) -> HubResult<StrategyChange> {
        self.native.probe().await?;
        *self.configured_lock.write() = BackendLock::Native;
        Ok(StrategyChange { next_lock: BackendLock::Native, restart_required: true })
    }

    /// `admin.archive.forceIobroker` (§6): downgrade the configured lock
    /// without probing.
    pub fn force_iobroker(&self) -> StrategyChange {
        *self.configured_lock.write() = BackendLock::Iobroker;
        StrategyChange { next_lock: BackendLock::Iobroker, restart_required: true }
    }

    /// Append one [`ChangeEvent`] (§4.1/§4.6). Every store mutation yields
    /// exactly one archive append (§8 property).
    pub async fn append_change(&self, source: &str, event: &ChangeEvent) {
        let entry = ChangeEntry {
            event: event.kind.to_string(),
            r#ref: event.r#ref.clone(),
            ts: event.ts,
            before: event.before.clone(),
            after: event.after.clone(),
        };
        self.append_line(source, &event.r#ref, event.ts, &entry).await;
    }

    pub async fn append_audit(&self, source: &str, entry: &AuditEntry) {
        self.append_line(source, &entry.r#ref, entry.ts, entry).await;
    }

    async fn append_line<T: serde::Serialize>(&self, source: &str, r#ref: &str, ts: u64, entry: &T) {
        let key = ArchivePath::new(source, r#ref, ts);
        let line = match serde_json::to_string(entry) {
            Ok(l) => l,
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize archive entry");
                return;
            }
        };
        self.pending_flush.fetch_add(1, Ordering::Relaxed);
        let backend = self.effective.clone();
        let pending = self.pending_flush.clone();
        let queue_key = key.queue_key();
        self.queue
            .submit_and_wait(&queue_key, async move {
                if let Err(e) = backend.append_line(&key, line).await {
                    tracing::error!(error = %e, ref = %key.r#ref, "archive append failed");
                }
                pending.fetch_sub(1, Ordering::Relaxed);
            })
            .await;
    }

    /// Number of appends enqueued but not yet durably written — exposed via
    /// `admin.stats.get` (§6).
    pub fn pending_flush(&self) -> u64 {
        self.pending_flush.load(Ordering::Relaxed)
    }

    pub async fn read(&self, source: &str, r#ref: &str, ts_on_that_date: u64) -> HubResult<Vec<String>> {
        let key = ArchivePath::new(source, r#ref, ts_on_that_date);
        self.effective.read_lines(&key).await
    }

    /// Run one best-effort retention sweep (§4.6 "Retention").
    pub async fn run_retention(&self) -> RetentionReport {
        retention::sweep(&self.native, self.clock.epoch_ms(), self.config.keep_previous_weeks).await
    }
}

/// Subscribe `archive` to `store`'s change feed, spawning a task that
/// appends every emitted [`ChangeEvent`] under `source` until the store is
/// dropped (§4.1 "Change emission" -> §4.6 append).
pub fn spawn_store_subscriber<C: Clock + 'static>(
    archive: Arc<Archive<C>>,
    store: &MessageStore<C>,
    source: &'static str,
) -> tokio::task::JoinHandle<()> {
    let mut rx = store.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => archive.append_change(source, &event).await,
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "archive subscriber lagged behind store change feed");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

struct NullHostFileStorage;

#[async_trait::async_trait]
impl HostFileStorage for NullHostFileStorage {
    async fn mkdir(&self, _path: &str) -> HubResult<()> {
        Ok(())
    }

    async fn write_file(&self, _meta_id: &str, _path: &str, _data: &[u8]) -> HubResult<()> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "archive_tests.rs"]
mod tests;
