// SPDX-License-Identifier: MIT

//! Host-provided capability traits (§6 "Host integration (consumed)").
//!
//! The embedding host supplies object/state IO, file storage, and an
//! outbound RPC channel; the core only ever sees these through narrow
//! traits so that the archive's iobroker backend and the plugin host's
//! `iobroker` façade can share one contract instead of inventing their own.

use crate::error::HubResult;
use async_trait::async_trait;
use serde_json::Value;

/// `(a) object/state read APIs and state-change subscription` (§6).
#[async_trait]
pub trait HostObjects: Send + Sync {
    async fn get_foreign_object(&self, id: &str) -> HubResult<Option<Value>>;
    async fn get_foreign_objects(&self, pattern: &str) -> HubResult<Vec<Value>>;
    async fn get_foreign_state(&self, id: &str) -> HubResult<Option<Value>>;
}

/// State-change subscription half of the host contract. Kept separate from
/// [`HostObjects`] because subscription callbacks feed the ingest plugin
/// dispatcher, not a plugin's own read path.
pub trait HostSubscriptions: Send + Sync {
    fn subscribe_foreign_states(&self, pattern: &str);
    fn unsubscribe_foreign_states(&self, pattern: &str);
}

/// `(b) a file-storage write API with mkdir and writeFile(metaId, path, buffer)` (§6).
///
/// Shared by the archive's iobroker backend (§4.6) and the plugin host's
/// `files` façade (§4.8) so both consume the same contract.
#[async_trait]
pub trait HostFileStorage: Send + Sync {
    async fn mkdir(&self, path: &str) -> HubResult<()>;
    async fn write_file(&self, meta_id: &str, path: &str, data: &[u8]) -> HubResult<()>;
}

/// `(c) a sendTo(instance, cmd, payload) RPC for outbound adapter messages` (§6).
#[async_trait]
pub trait HostSendTo: Send + Sync {
    async fn send_to(&self, instance: &str, cmd: &str, payload: Value) -> HubResult<Value>;
}

/// `(d) a logger with debug/info/warn/error` (§6). The core itself logs via
/// `tracing`; this trait exists only for plugins that want to mirror
/// messages into the host's own log sink.
pub trait HostLogger: Send + Sync {
    fn debug(&self, msg: &str);
    fn info(&self, msg: &str);
    fn warn(&self, msg: &str);
    fn error(&self, msg: &str);
}

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// In-memory `HostFileStorage` double: records every write and mkdir
    /// call and keeps the last buffer written per path, the way
    /// `oj_adapters::FakeNotifyAdapter` records calls for assertions.
    #[derive(Clone, Default)]
    pub struct FakeHostFileStorage {
        state: Arc<Mutex<FakeState>>,
    }

    #[derive(Default)]
    struct FakeState {
        dirs: Vec<String>,
        files: std::collections::HashMap<String, Vec<u8>>,
        fail_mkdir: bool,
        fail_write: bool,
    }

    impl FakeHostFileStorage {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing() -> Self {
            let s = Self::default();
            {
                let mut st = s.state.lock();
                st.fail_mkdir = true;
                st.fail_write = true;
            }
            s
        }

        pub fn file(&self, path: &str) -> Option<Vec<u8>> {
            self.state.lock().files.get(path).cloned()
        }

        pub fn dirs(&self) -> Vec<String> {
            self.state.lock().dirs.clone()
        }
    }

    #[async_trait]
    impl HostFileStorage for FakeHostFileStorage {
        async fn mkdir(&self, path: &str) -> HubResult<()> {
            let mut st = self.state.lock();
            if st.fail_mkdir {
                return Err(crate::error::HubError::internal("fake mkdir failure"));
            }
            st.dirs.push(path.to_string());
            Ok(())
        }

        async fn write_file(&self, _meta_id: &str, path: &str, data: &[u8]) -> HubResult<()> {
            let mut st = self.state.lock();
            if st.fail_write {
                return Err(crate::error::HubError::internal("fake write failure"));
            }
            st.files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeHostFileStorage;
