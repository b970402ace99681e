// SPDX-License-Identifier: MIT

//! Pluggable archive backends (§4.6 "Backend strategy"): a native
//! filesystem writer and a host-storage writer, selected by probe+fallback
//! at startup.

use crate::path::ArchivePath;
use async_trait::async_trait;
use msghub_core::{HostFileStorage, HubError, HubResult};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Which backend is configured/effective (§6 "archive" config block).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendLock {
    Native,
    Iobroker,
}

msghub_core::simple_display! {
    BackendLock {
        Native => "native",
        Iobroker => "iobroker",
    }
}

/// A backend capable of appending JSONL lines to, and reading lines back
/// from, archive files addressed by [`ArchivePath`].
#[async_trait]
pub trait Backend: Send + Sync {
    async fn append_line(&self, key: &ArchivePath, line: String) -> HubResult<()>;
    async fn read_lines(&self, key: &ArchivePath) -> HubResult<Vec<String>>;
    fn kind(&self) -> BackendLock;
}

/// Native filesystem backend: one file per archive path under `base_dir`.
pub struct NativeBackend {
    base_dir: PathBuf,
    ext: String,
}

impl NativeBackend {
    pub fn new(base_dir: impl Into<PathBuf>, ext: impl Into<String>) -> Self {
        Self { base_dir: base_dir.into(), ext: ext.into() }
    }

    pub fn base_dir(&self) -> &std::path::Path {
        &self.base_dir
    }

    /// The startup probe (§4.6): `mkdir -> write -> read -> append ->
    /// re-read -> unlink`. Returns `Ok(())` on full success, an error
    /// otherwise; never panics and never leaves the probe file behind on
    /// the happy path.
    pub async fn probe(&self) -> HubResult<()> {
        let probe_dir = self.base_dir.join(".probe");
        let probe_file = probe_dir.join("probe.tmp");
        let map_err = |e: std::io::Error| HubError::native_probe_failed(e.to_string());

        fs::create_dir_all(&probe_dir).await.map_err(map_err)?;
        fs::write(&probe_file, b"probe\n").await.map_err(map_err)?;
        let read_back = fs::read(&probe_file).await.map_err(map_err)?;
        if read_back != b"probe\n" {
            return Err(HubError::native_probe_failed("read-back mismatch"));
        }
        let mut f = fs::OpenOptions::new().append(true).open(&probe_file).await.map_err(map_err)?;
        f.write_all(b"probe2\n").await.map_err(map_err)?;
        f.flush().await.map_err(map_err)?;
        drop(f);
        let reread = fs::read_to_string(&probe_file).await.map_err(map_err)?;
        if reread != "probe\nprobe2\n" {
            return Err(HubError::native_probe_failed("append re-read mismatch"));
        }
        fs::remove_file(&probe_file).await.map_err(map_err)?;
        Ok(())
    }
}

#[async_trait]
impl Backend for NativeBackend {
    async fn append_line(&self, key: &ArchivePath, line: String) -> HubResult<()> {
        let path = key.full_path(&self.base_dir, &self.ext);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).await.map_err(|e| HubError::internal(e.to_string()))?;
        }
        let mut f = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| HubError::internal(e.to_string()))?;
        f.write_all(line.as_bytes()).await.map_err(|e| HubError::internal(e.to_string()))?;
        f.write_all(b"\n").await.map_err(|e| HubError::internal(e.to_string()))?;
        f.flush().await.map_err(|e| HubError::internal(e.to_string()))?;
        Ok(())
    }

    async fn read_lines(&self, key: &ArchivePath) -> HubResult<Vec<String>> {
        let path = key.full_path(&self.base_dir, &self.ext);
        match fs::read_to_string(&path).await {
            Ok(content) => Ok(content.lines().map(str::to_string).collect()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(HubError::internal(e.to_string())),
        }
    }

    fn kind(&self) -> BackendLock {
        BackendLock::Native
    }
}

/// Host-storage backend: delegates to the embedding host's `mkdir`/
/// `writeFile` capability (§6). The host API exposes no append primitive,
/// so this backend keeps an in-memory running buffer per path and rewrites
/// the whole file on each append — correct but not cheap, which is exactly
/// why native is preferred when available.
pub struct IobrokerBackend {
    host: Arc<dyn HostFileStorage>,
    ext: String,
    buffers: Mutex<HashMap<String, (String, Vec<String>)>>,
}

impl IobrokerBackend {
    pub fn new(host: Arc<dyn HostFileStorage>, ext: impl Into<String>) -> Self {
        Self { host, ext: ext.into(), buffers: Mutex::new(HashMap::new()) }
    }
}

#[async_trait]
impl Backend for IobrokerBackend {
    async fn append_line(&self, key: &ArchivePath, line: String) -> HubResult<()> {
        self.host.mkdir(&key.relative_dir().to_string_lossy()).await?;
        let file_path = key.file_name(&self.ext);
        let queue_key = key.queue_key();
        let buffer = {
            let mut buffers = self.buffers.lock();
            let entry = buffers.entry(queue_key).or_insert_with(|| (file_path.clone(), Vec::new()));
            entry.1.push(line);
            entry.1.join("\n") + "\n"
        };
        self.host.write_file("msghub.archive", &file_path, buffer.as_bytes()).await
    }

    async fn read_lines(&self, key: &ArchivePath) -> HubResult<Vec<String>> {
        let buffers = self.buffers.lock();
        Ok(buffers.get(&key.queue_key()).map(|(_, lines)| lines.clone()).unwrap_or_default())
    }

    fn kind(&self) -> BackendLock {
        BackendLock::Iobroker
    }
}

#[cfg(test)]
#[path = "backend_tests.rs"]
mod tests;
