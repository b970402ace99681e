// SPDX-License-Identifier: MIT

//! The frozen capability surface handed to every plugin callback (§4.5
//! `ctx.api`, §4.8 façade contents). Every field is read-only by
//! construction: there is no setter, only the narrow operations the
//! façade was built to expose.

use crate::i18n::I18n;
use msghub_action::{ActionRequest, ActionService};
use msghub_core::{
    ActionType, Clock, HostFileStorage, HostLogger, HostObjects, HostSendTo, HostSubscriptions, HubResult, Kind,
    Level, LifecycleState, Message,
};
use msghub_factory::{MessageFactory, RawMessage};
use msghub_store::{MessageFilter, MessageStore, Page, QueryResult};
use std::sync::Arc;

/// `api.constants` (§4.8): the fixed enumerations a plugin may need for
/// display or validation, without depending on `msghub-core` directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantsFacade;

impl ConstantsFacade {
    pub fn levels(&self) -> Vec<(&'static str, u8)> {
        Level::ALL.iter().map(|l| (l.as_ref(), l.value())).collect()
    }

    pub fn lifecycle_states(&self) -> &'static [LifecycleState] {
        &[
            LifecycleState::Open,
            LifecycleState::Acked,
            LifecycleState::Snoozed,
            LifecycleState::Closed,
            LifecycleState::Deleted,
            LifecycleState::Expired,
        ]
    }

    pub fn action_types(&self) -> &'static [ActionType] {
        &[
            ActionType::Ack,
            ActionType::Close,
            ActionType::Delete,
            ActionType::Snooze,
            ActionType::Open,
            ActionType::Link,
            ActionType::Custom,
        ]
    }
}

/// `api.store` (§4.8): "add/update/remove/query — no internal emitters",
/// i.e. plugins see the same mutation surface as every other caller but
/// never get a handle to the store's change-event broadcast channel.
#[derive(Clone)]
pub struct StoreFacade<C: Clock> {
    store: MessageStore<C>,
}

impl<C: Clock> StoreFacade<C> {
    pub fn new(store: MessageStore<C>) -> Self {
        Self { store }
    }

    pub fn add_message(&self, message: Message) -> HubResult<bool> {
        self.store.add_message(message)
    }

    pub fn update_message(&self, r#ref: &str, patch: msghub_store::MessagePatch) -> HubResult<bool> {
        self.store.update_message(r#ref, patch)
    }

    pub fn remove_message(&self, r#ref: &str) -> bool {
        self.store.remove_message(r#ref)
    }

    pub fn get_message_by_ref(&self, r#ref: &str) -> Option<Message> {
        self.store.get_message_by_ref(r#ref)
    }

    pub fn query_messages(&self, filter: &MessageFilter, page: Page) -> QueryResult {
        self.store.query_messages(filter, page)
    }
}

/// `api.iobroker` (§4.8): objects/states reads, subscription, outbound
/// `sendTo`, and file storage — everything the embedding host supplies,
/// behind the narrow [`msghub_core::host`] traits.
#[derive(Clone)]
pub struct IoBrokerFacade {
    objects: Arc<dyn HostObjects>,
    subscriptions: Arc<dyn HostSubscriptions>,
    send_to: Arc<dyn HostSendTo>,
    files: Arc<dyn HostFileStorage>,
}

impl IoBrokerFacade {
    pub fn new(
        objects: Arc<dyn HostObjects>,
        subscriptions: Arc<dyn HostSubscriptions>,
        send_to: Arc<dyn HostSendTo>,
        files: Arc<dyn HostFileStorage>,
    ) -> Self {
        Self { objects, subscriptions, send_to, files }
    }

    pub async fn get_foreign_object(&self, id: &str) -> HubResult<Option<serde_json::Value>> {
        self.objects.get_foreign_object(id).await
    }

    pub async fn get_foreign_objects(&self, pattern: &str) -> HubResult<Vec<serde_json::Value>> {
        self.objects.get_foreign_objects(pattern).await
    }

    pub async fn get_foreign_state(&self, id: &str) -> HubResult<Option<serde_json::Value>> {
        self.objects.get_foreign_state(id).await
    }

    pub fn subscribe_foreign_states(&self, pattern: &str) {
        self.subscriptions.subscribe_foreign_states(pattern);
    }

    pub fn unsubscribe_foreign_states(&self, pattern: &str) {
        self.subscriptions.unsubscribe_foreign_states(pattern);
    }

    pub async fn send_to(&self, instance: &str, cmd: &str, payload: serde_json::Value) -> HubResult<serde_json::Value> {
        self.send_to.send_to(instance, cmd, payload).await
    }

    pub async fn mkdir(&self, path: &str) -> HubResult<()> {
        self.files.mkdir(path).await
    }

    pub async fn write_file(&self, meta_id: &str, path: &str, data: &[u8]) -> HubResult<()> {
        self.files.write_file(meta_id, path, data).await
    }
}

/// `api.stats` (§4.8, §6 `admin.stats.get`): read-only aggregate counters.
/// Implemented by the hub crate, which is the only thing that can see
/// every subsystem at once; plugins only ever see this narrow trait.
pub trait StatsProvider: Send + Sync {
    fn snapshot(&self) -> serde_json::Value;
}

/// `api.ai` (§4.8, optional): a narrow completion surface, present only
/// when the host wires one in.
#[async_trait::async_trait]
pub trait AiFacade: Send + Sync {
    async fn complete(&self, prompt: &str) -> HubResult<String>;
}

/// The full frozen façade (§4.5 `ctx.api`). `action` is only ever
/// populated for ingest plugins (§4.5: "exposed only to ingest plugins...
/// to prevent sinks from mutating workflow state"). Cheaply [`Clone`] (every
/// field is a value type or an `Arc`) so the plugin host can hand each
/// registry its own frozen copy — one with `action` populated for ingest,
/// one without for notify — built once at construction.
#[derive(Clone)]
pub struct HostApi<C: Clock> {
    pub constants: ConstantsFacade,
    pub factory: MessageFactory,
    pub store: StoreFacade<C>,
    pub stats: Arc<dyn StatsProvider>,
    pub ai: Option<Arc<dyn AiFacade>>,
    pub i18n: Arc<I18n>,
    pub iobroker: Arc<IoBrokerFacade>,
    pub log: Arc<dyn HostLogger>,
    pub action: Option<Arc<ActionService<C>>>,
}

impl<C: Clock> HostApi<C> {
    /// Resolve and execute a whitelisted action, exactly as any other
    /// caller would (§4.5). Returns `None` when this façade was built for
    /// a notify plugin, which has no `action` surface at all.
    pub async fn execute_action(&self, request: ActionRequest) -> Option<msghub_action::ActionOutcome> {
        match &self.action {
            Some(action) => Some(action.execute(request).await),
            None => None,
        }
    }

    pub fn create_message(&self, raw: RawMessage, now: u64) -> HubResult<Message> {
        self.factory.create_message(raw, now)
    }

    /// The façade a notify plugin receives: identical except `action` is
    /// stripped (§4.5 "exposed only to ingest plugins").
    pub fn without_action(&self) -> Self
    where
        C: Clone,
    {
        Self { action: None, ..self.clone() }
    }
}

#[cfg(test)]
#[path = "facade_tests.rs"]
mod tests;
