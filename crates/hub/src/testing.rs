// SPDX-License-Identifier: MIT

//! No-op host doubles (§6 "Host integration"), shared by this crate's own
//! tests and exported under `test-support` for the workspace's end-to-end
//! scenario tests, which only ever exercise the core and have no real
//! ioBroker adapter to hand it.

use crate::HostDeps;
use msghub_core::{FakeHostFileStorage, HostLogger, HostObjects, HostSendTo, HostSubscriptions, HubResult};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

struct NullObjects;

#[async_trait::async_trait]
impl HostObjects for NullObjects {
    async fn get_foreign_object(&self, _id: &str) -> HubResult<Option<Value>> {
        Ok(None)
    }

    async fn get_foreign_objects(&self, _pattern: &str) -> HubResult<Vec<Value>> {
        Ok(Vec::new())
    }

    async fn get_foreign_state(&self, _id: &str) -> HubResult<Option<Value>> {
        Ok(None)
    }
}

struct NullSubscriptions;

impl HostSubscriptions for NullSubscriptions {
    fn subscribe_foreign_states(&self, _pattern: &str) {}
    fn unsubscribe_foreign_states(&self, _pattern: &str) {}
}

struct NullSendTo;

#[async_trait::async_trait]
impl HostSendTo for NullSendTo {
    async fn send_to(&self, _instance: &str, _cmd: &str, payload: Value) -> HubResult<Value> {
        Ok(payload)
    }
}

struct NullLogger;

impl HostLogger for NullLogger {
    fn debug(&self, _msg: &str) {}
    fn info(&self, _msg: &str) {}
    fn warn(&self, _msg: &str) {}
    fn error(&self, _msg: &str) {}
}

pub fn test_host_deps() -> HostDeps {
    HostDeps {
        objects: Arc::new(NullObjects),
        subscriptions: Arc::new(NullSubscriptions),
        send_to: Arc::new(NullSendTo),
        files: Arc::new(FakeHostFileStorage::new()),
        log: Arc::new(NullLogger),
        ai: None,
        translations: HashMap::new(),
        locale: "en".to_string(),
        base_language: "en".to_string(),
    }
}
