// SPDX-License-Identifier: MIT

use super::*;
use crate::facade::{ConstantsFacade, HostApi, IoBrokerFacade, StatsProvider};
use crate::i18n::I18n;
use msghub_core::{
    FakeClock, FakeHostFileStorage, HostLogger, HostObjects, HostSendTo, HostSubscriptions, MessageBuilder,
};
use parking_lot::Mutex;
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
    async fn send_to(&self, _i: &str, _c: &str, payload: serde_json::Value) -> HubResult<serde_json::Value> {
        Ok(payload)
    }
}
struct NullStats;
impl StatsProvider for NullStats {
    fn snapshot(&self) -> serde_json::Value {
        serde_json::json!({})
    }
}

fn test_api() -> Arc<HostApi<FakeClock>> {
    let clock = FakeClock::at(1_000);
    let store = msghub_store::MessageStore::new(clock);
    Arc::new(HostApi {
        constants: ConstantsFacade,
        factory: msghub_factory::MessageFactory::new(),
        store: crate::facade::StoreFacade::new(store),
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
    })
}

#[derive(Default)]
struct RecordingIngest {
    calls: Mutex<Vec<&'static str>>,
}

#[async_trait::async_trait]
impl IngestPlugin<FakeClock> for RecordingIngest {
    async fn start(&self, _ctx: PluginCtx<FakeClock>) -> HubResult<()> {
        self.calls.lock().push("start");
        Ok(())
    }
    async fn stop(&self, _ctx: PluginCtx<FakeClock>) -> HubResult<()> {
        self.calls.lock().push("stop");
        Ok(())
    }
    async fn on_state_change(&self, _id: &str, _value: serde_json::Value, _ctx: PluginCtx<FakeClock>) -> HubResult<()> {
        self.calls.lock().push("state_change");
        Ok(())
    }
}

struct PanickingIngest;
#[async_trait::async_trait]
impl IngestPlugin<FakeClock> for PanickingIngest {
    async fn start(&self, _ctx: PluginCtx<FakeClock>) -> HubResult<()> {
        panic!("boom");
    }
}

#[tokio::test]
async fn register_then_unregister_calls_start_then_stop_in_order() {
    let registry = IngestRegistry::new(test_api(), BaseMeta::default());
    let plugin = Arc::new(RecordingIngest::default());
    registry.register("p1", plugin.clone()).await;
    registry.unregister("p1").await;
    assert_eq!(*plugin.calls.lock(), vec!["start", "stop"]);
    assert_eq!(registry.health("p1"), None);
}

#[tokio::test]
async fn re_registering_the_same_id_stops_the_previous_instance_first() {
    let registry = IngestRegistry::new(test_api(), BaseMeta::default());
    let first = Arc::new(RecordingIngest::default());
    let second = Arc::new(RecordingIngest::default());
    registry.register("p1", first.clone()).await;
    registry.register("p1", second.clone()).await;

    assert_eq!(*first.calls.lock(), vec!["start", "stop"]);
    assert_eq!(*second.calls.lock(), vec!["start"]);
}

#[tokio::test]
async fn a_plugin_that_panics_in_start_is_still_registered_but_marked_unhealthy() {
    let registry = IngestRegistry::new(test_api(), BaseMeta::default());
    registry.register("p1", Arc::new(PanickingIngest)).await;
    assert_eq!(registry.health("p1"), Some(PluginHealth::Unhealthy));
    assert!(registry.ids().contains(&"p1".to_string()));
}

#[tokio::test]
async fn dispatch_state_change_reaches_every_registered_plugin() {
    let registry = IngestRegistry::new(test_api(), BaseMeta::default());
    let a = Arc::new(RecordingIngest::default());
    let b = Arc::new(RecordingIngest::default());
    registry.register("a", a.clone()).await;
    registry.register("b", b.clone()).await;

    registry.dispatch_state_change("sensor.1", serde_json::json!(42)).await;

    assert!(a.calls.lock().contains(&"state_change"));
    assert!(b.calls.lock().contains(&"state_change"));
}

#[derive(Default)]
struct RecordingNotify {
    seen: Mutex<Vec<(NotifyEvent, usize)>>,
}

#[async_trait::async_trait]
impl NotifyPlugin<FakeClock> for RecordingNotify {
    async fn on_notifications(&self, event: NotifyEvent, notifications: &[Message], ctx: PluginCtx<FakeClock>) -> HubResult<()> {
        assert!(ctx.api.action.is_none(), "notify plugins must never see the action surface");
        self.seen.lock().push((event, notifications.len()));
        Ok(())
    }
}

#[tokio::test]
async fn notify_dispatch_never_exposes_the_action_facade() {
    let api = test_api();
    let registry = NotifyRegistry::new(Arc::new(api.without_action()), BaseMeta::default());
    let sink = Arc::new(RecordingNotify::default());
    registry.register("sink", sink.clone()).await;

    let msg = MessageBuilder::default().r#ref("m-1").build();
    registry.dispatch_notifications(NotifyEvent::Due, Arc::new(vec![msg]));

    // dispatch_notifications is fire-and-forget (§4.4); give the spawned
    // task a chance to run before asserting.
    tokio::task::yield_now().await;
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;

    let seen = sink.seen.lock().clone();
    assert_eq!(seen, vec![(NotifyEvent::Due, 1)]);
}
