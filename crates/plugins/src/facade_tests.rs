// SPDX-License-Identifier: MIT

use super::*;
use crate::i18n::I18n;
use msghub_core::{FakeClock, FakeHostFileStorage, HostLogger, HostObjects, HostSendTo, HostSubscriptions, MessageBuilder};
use std::collections::HashMap;

struct NullLogger;
impl HostLogger for NullLogger {
    fn debug(&self, _msg: &str) {}
    fn info(&self, _msg: &str) {}
    fn warn(&self, _msg: &str) {}
    fn error(&self, _msg: &str) {}
}

struct NullObjects;
#[async_trait::async_trait]
impl HostObjects for NullObjects {
    async fn get_foreign_object(&self, _id: &str) -> HubResult<Option<serde_json::Value>> {
        Ok(None)
    }
    async fn get_foreign_objects(&self, _pattern: &str) -> HubResult<Vec<serde_json::Value>> {
        Ok(Vec::new())
    }
    async fn get_foreign_state(&self, _id: &str) -> HubResult<Option<serde_json::Value>> {
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
    async fn send_to(&self, _instance: &str, _cmd: &str, payload: serde_json::Value) -> HubResult<serde_json::Value> {
        Ok(payload)
    }
}

struct NullStats;
impl StatsProvider for NullStats {
    fn snapshot(&self) -> serde_json::Value {
        serde_json::json!({})
    }
}

fn host_api() -> HostApi<FakeClock> {
    let clock = FakeClock::at(1_000);
    let store = msghub_store::MessageStore::new(clock);
    HostApi {
        constants: ConstantsFacade,
        factory: msghub_factory::MessageFactory::new(),
        store: StoreFacade::new(store),
        stats: Arc::new(NullStats),
        ai: None,
        i18n: Arc::new(I18n::new(HashMap::new(), "en", "en")),
        iobroker: Arc::new(IoBrokerFacade::new(
            Arc::new(NullObjects),
            Arc::new(NullSubscriptions),
            Arc::new(NullSendTo),
            Arc::new(FakeHostFileStorage::new()),
        )),
        log: Arc::new(NullLogger),
        action: None,
    }
}

#[test]
fn constants_facade_lists_all_levels() {
    let facade = ConstantsFacade;
    assert_eq!(facade.levels().len(), 6);
    assert_eq!(facade.lifecycle_states().len(), 6);
    assert_eq!(facade.action_types().len(), 7);
}

#[test]
fn store_facade_add_and_get_round_trips() {
    let api = host_api();
    let msg = MessageBuilder::default().r#ref("m-1").build();
    assert!(api.store.add_message(msg).unwrap());
    assert!(api.store.get_message_by_ref("m-1").is_some());
}

#[test]
fn without_action_strips_the_action_surface_but_keeps_everything_else() {
    let api = host_api();
    let stripped = api.without_action();
    assert!(stripped.action.is_none());
    assert!(stripped.store.get_message_by_ref("anything").is_none());
}

#[tokio::test]
async fn iobroker_facade_round_trips_send_to() {
    let api = host_api();
    let echoed = api.iobroker.send_to("adapter", "ping", serde_json::json!({"n": 1})).await.unwrap();
    assert_eq!(echoed, serde_json::json!({"n": 1}));
}
