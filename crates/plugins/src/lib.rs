// SPDX-License-Identifier: MIT

//! The plugin host (§4.5, §4.8): builds the frozen `ctx = { api, meta }`
//! every plugin callback receives, and mediates start/stop/dispatch across
//! two registries — ingest producers and notify sinks — with fault
//! isolation and re-register semantics shared between them.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

mod facade;
mod i18n;
mod meta;
mod registry;

pub use facade::{AiFacade, ConstantsFacade, HostApi, IoBrokerFacade, StatsProvider, StoreFacade};
pub use i18n::{I18n, Multilang};
pub use meta::{BaseMeta, CallMeta, PluginMeta};
pub use registry::{IngestPlugin, IngestRegistry, NotifyPlugin, NotifyRegistry, PluginCtx, PluginHealth};

use msghub_core::{Clock, NotifyEvent, Message};
use std::sync::Arc;

/// Owns both plugin registries and the two frozen `HostApi` variants they
/// dispatch through (§4.5 "Context assembly"): ingest plugins see
/// `ctx.api.action`, notify plugins never do.
pub struct PluginHost<C: Clock + Clone + 'static> {
    pub ingest: IngestRegistry<C>,
    pub notify: NotifyRegistry<C>,
}

impl<C: Clock + Clone + 'static> PluginHost<C> {
    /// `ingest_api` is the full façade (built with `action` populated, if
    /// this deployment has an ingest rule engine wired in); the notify
    /// registry derives its own façade via [`HostApi::without_action`].
    pub fn new(ingest_api: Arc<HostApi<C>>, base_meta: BaseMeta) -> Self {
        let notify_api = Arc::new(ingest_api.without_action());
        Self {
            ingest: IngestRegistry::new(ingest_api, base_meta.clone()),
            notify: NotifyRegistry::new(notify_api, base_meta),
        }
    }

    /// Fan out a scheduler tick's ordered batches to every notify sink
    /// (§4.4 step 3/4): `expired` events precede `due` events, fire-and-forget.
    pub fn dispatch_tick(&self, expired: Vec<Message>, due: Vec<Message>) {
        if !expired.is_empty() {
            self.notify.dispatch_notifications(NotifyEvent::Expired, Arc::new(expired));
        }
        if !due.is_empty() {
            self.notify.dispatch_notifications(NotifyEvent::Due, Arc::new(due));
        }
    }

    /// Surface a lifecycle transition that happened outside a tick — an
    /// action or rule-engine write — as an `updated` event (§4.4 step 5).
    pub fn dispatch_updated(&self, messages: Vec<Message>) {
        if !messages.is_empty() {
            self.notify.dispatch_notifications(NotifyEvent::Updated, Arc::new(messages));
        }
    }
}
