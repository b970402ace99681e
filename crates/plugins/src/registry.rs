// SPDX-License-Identifier: MIT

//! The plugin host (§4.5): two registries — ingest producers and notify
//! sinks — sharing one lifecycle shape (register/start/dispatch/stop/
//! re-register) but exposing different `ctx.api` surfaces. Every callback
//! is wrapped so a plugin that errors or panics never reaches a sibling
//! plugin or the caller.

use crate::facade::HostApi;
use crate::meta::{BaseMeta, CallMeta, PluginMeta};
use async_trait::async_trait;
use msghub_core::{Clock, HubError, HubResult, Message, NotifyEvent};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

/// `ctx` handed to every plugin callback (§4.5): the frozen capability
/// façade plus this call's merged metadata.
pub struct PluginCtx<C: Clock> {
    pub api: Arc<HostApi<C>>,
    pub meta: PluginMeta,
}

impl<C: Clock> Clone for PluginCtx<C> {
    fn clone(&self) -> Self {
        Self { api: self.api.clone(), meta: self.meta.clone() }
    }
}

/// An ingest producer (§4.5): consumes `(id, value, ctx)` for state and
/// object changes. Every method is optional — a plugin implements only
/// the callbacks it needs; the rest no-op.
#[async_trait]
pub trait IngestPlugin<C: Clock>: Send + Sync {
    async fn start(&self, _ctx: PluginCtx<C>) -> HubResult<()> {
        Ok(())
    }

    async fn stop(&self, _ctx: PluginCtx<C>) -> HubResult<()> {
        Ok(())
    }

    async fn on_state_change(&self, _id: &str, _value: serde_json::Value, _ctx: PluginCtx<C>) -> HubResult<()> {
        Ok(())
    }

    async fn on_object_change(&self, _id: &str, _value: serde_json::Value, _ctx: PluginCtx<C>) -> HubResult<()> {
        Ok(())
    }
}

/// A notify sink (§4.5): receives batches of due/updated/expired
/// notifications. Never sees `ctx.api.action` (§4.5).
#[async_trait]
pub trait NotifyPlugin<C: Clock>: Send + Sync {
    async fn start(&self, _ctx: PluginCtx<C>) -> HubResult<()> {
        Ok(())
    }

    async fn stop(&self, _ctx: PluginCtx<C>) -> HubResult<()> {
        Ok(())
    }

    async fn on_notifications(&self, _event: NotifyEvent, _notifications: &[Message], _ctx: PluginCtx<C>) -> HubResult<()> {
        Ok(())
    }
}

/// Per-plugin health, surfaced for diagnostics (§4.5 "marked unhealthy").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginHealth {
    Healthy,
    Unhealthy,
}

/// Run `fut` to completion, converting a panic into an `Err` instead of
/// letting it unwind into the caller (§4.5 "Fault isolation": "exceptions
/// are caught, logged with the plugin id, and do NOT propagate"). A task
/// panic inside `tokio::spawn` is isolated to that task by construction;
/// we only need to translate the resulting `JoinError` into our error type.
async fn call_isolated<F>(plugin_id: &str, op: &str, fut: F) -> HubResult<()>
where
    F: Future<Output = HubResult<()>> + Send + 'static,
{
    match tokio::spawn(fut).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => {
            tracing::warn!(plugin_id, op, error = %e, "plugin callback returned an error");
            Err(e)
        }
        Err(join_err) => {
            tracing::error!(plugin_id, op, error = %join_err, "plugin callback panicked");
            Err(HubError::internal(format!("plugin {plugin_id} panicked in {op}")))
        }
    }
}

struct IngestEntry<C: Clock> {
    plugin: Arc<dyn IngestPlugin<C>>,
    health: PluginHealth,
}

struct NotifyEntry<C: Clock> {
    plugin: Arc<dyn NotifyPlugin<C>>,
    health: PluginHealth,
}

fn call_meta(plugin_id: &str, reason: &str, running: bool) -> CallMeta {
    CallMeta { plugin_id: plugin_id.to_string(), reason: reason.to_string(), running }
}

/// Ingest producer registry (§4.5).
pub struct IngestRegistry<C: Clock + 'static> {
    entries: RwLock<HashMap<String, IngestEntry<C>>>,
    api: Arc<HostApi<C>>,
    base_meta: BaseMeta,
}

impl<C: Clock + Clone + 'static> IngestRegistry<C> {
    pub fn new(api: Arc<HostApi<C>>, base_meta: BaseMeta) -> Self {
        Self { entries: RwLock::new(HashMap::new()), api, base_meta }
    }

    fn ctx(&self, plugin_id: &str, reason: &str, running: bool) -> PluginCtx<C> {
        PluginCtx {
            api: self.api.clone(),
            meta: PluginMeta::merge(&self.base_meta, call_meta(plugin_id, reason, running)),
        }
    }

    /// Register `plugin` under `id` (§4.5 "Re-register semantics"): if an
    /// instance is already registered, `stop` it (best-effort) before
    /// installing and `start`ing the new one.
    pub async fn register(&self, id: impl Into<String>, plugin: Arc<dyn IngestPlugin<C>>) {
        let id = id.into();
        let previous = {
            let mut guard = self.entries.write();
            guard.insert(id.clone(), IngestEntry { plugin: plugin.clone(), health: PluginHealth::Healthy })
        };
        if let Some(previous) = previous {
            let ctx = self.ctx(&id, "re-register", false);
            let _ = call_isolated(&id, "stop", async move { previous.plugin.stop(ctx).await }).await;
        }
        let ctx = self.ctx(&id, "start", true);
        let start_plugin = plugin;
        let result = call_isolated(&id, "start", async move { start_plugin.start(ctx).await }).await;
        if result.is_err() {
            if let Some(entry) = self.entries.write().get_mut(&id) {
                entry.health = PluginHealth::Unhealthy;
            }
        }
    }

    pub async fn unregister(&self, id: &str) {
        let entry = self.entries.write().remove(id);
        if let Some(entry) = entry {
            let ctx = self.ctx(id, "unregister", false);
            let _ = call_isolated(id, "stop", async move { entry.plugin.stop(ctx).await }).await;
        }
    }

    pub fn health(&self, id: &str) -> Option<PluginHealth> {
        self.entries.read().get(id).map(|e| e.health)
    }

    pub fn ids(&self) -> Vec<String> {
        self.entries.read().keys().cloned().collect()
    }

    /// Dispatch a state change to every registered ingest plugin,
    /// isolating each call (§4.5). Awaits all of them — ingest observations
    /// feed the rule engine synchronously, unlike notify dispatch.
    pub async fn dispatch_state_change(&self, id: &str, value: serde_json::Value) {
        self.dispatch(id, value, "state_change", |plugin, i, v, ctx| {
            Box::pin(async move { plugin.on_state_change(&i, v, ctx).await })
        })
        .await;
    }

    pub async fn dispatch_object_change(&self, id: &str, value: serde_json::Value) {
        self.dispatch(id, value, "object_change", |plugin, i, v, ctx| {
            Box::pin(async move { plugin.on_object_change(&i, v, ctx).await })
        })
        .await;
    }

    async fn dispatch<F>(&self, source_id: &str, value: serde_json::Value, reason: &str, call: F)
    where
        F: Fn(
            Arc<dyn IngestPlugin<C>>,
            String,
            serde_json::Value,
            PluginCtx<C>,
        ) -> std::pin::Pin<Box<dyn Future<Output = HubResult<()>> + Send>>,
    {
        let plugins: Vec<(String, Arc<dyn IngestPlugin<C>>)> =
            self.entries.read().iter().map(|(id, e)| (id.clone(), e.plugin.clone())).collect();
        for (plugin_id, plugin) in plugins {
            let ctx = self.ctx(&plugin_id, reason, true);
            let fut = call(plugin, source_id.to_string(), value.clone(), ctx);
            let result = call_isolated(&plugin_id, reason, fut).await;
            if result.is_err() {
                if let Some(entry) = self.entries.write().get_mut(&plugin_id) {
                    entry.health = PluginHealth::Unhealthy;
                }
            }
        }
    }
}

/// Notify sink registry (§4.5).
pub struct NotifyRegistry<C: Clock + 'static> {
    entries: RwLock<HashMap<String, NotifyEntry<C>>>,
    api: Arc<HostApi<C>>,
    base_meta: BaseMeta,
}

impl<C: Clock + Clone + 'static> NotifyRegistry<C> {
    /// `api` must already have `action` stripped (§4.5); callers build it
    /// via [`HostApi::without_action`].
    pub fn new(api: Arc<HostApi<C>>, base_meta: BaseMeta) -> Self {
        Self { entries: RwLock::new(HashMap::new()), api, base_meta }
    }

    fn ctx(&self, plugin_id: &str, reason: &str, running: bool) -> PluginCtx<C> {
        PluginCtx {
            api: self.api.clone(),
            meta: PluginMeta::merge(&self.base_meta, call_meta(plugin_id, reason, running)),
        }
    }

    pub async fn register(&self, id: impl Into<String>, plugin: Arc<dyn NotifyPlugin<C>>) {
        let id = id.into();
        let previous = {
            let mut guard = self.entries.write();
            guard.insert(id.clone(), NotifyEntry { plugin: plugin.clone(), health: PluginHealth::Healthy })
        };
        if let Some(previous) = previous {
            let ctx = self.ctx(&id, "re-register", false);
            let _ = call_isolated(&id, "stop", async move { previous.plugin.stop(ctx).await }).await;
        }
        let ctx = self.ctx(&id, "start", true);
        let start_plugin = plugin;
        let result = call_isolated(&id, "start", async move { start_plugin.start(ctx).await }).await;
        if result.is_err() {
            if let Some(entry) = self.entries.write().get_mut(&id) {
                entry.health = PluginHealth::Unhealthy;
            }
        }
    }

    pub async fn unregister(&self, id: &str) {
        let entry = self.entries.write().remove(id);
        if let Some(entry) = entry {
            let ctx = self.ctx(id, "unregister", false);
            let _ = call_isolated(id, "stop", async move { entry.plugin.stop(ctx).await }).await;
        }
    }

    pub fn health(&self, id: &str) -> Option<PluginHealth> {
        self.entries.read().get(id).map(|e| e.health)
    }

    pub fn ids(&self) -> Vec<String> {
        self.entries.read().keys().cloned().collect()
    }

    /// Fan out `notifications` to every registered sink (§4.4
    /// "Backpressure": "the scheduler does NOT wait; dispatch is
    /// fire-and-forget with per-plugin isolation"). Each call runs on its
    /// own spawned task; this method returns as soon as every task has
    /// been scheduled, not when they complete.
    pub fn dispatch_notifications(&self, event: NotifyEvent, notifications: Arc<Vec<Message>>) {
        let plugins: Vec<(String, Arc<dyn NotifyPlugin<C>>)> =
            self.entries.read().iter().map(|(id, e)| (id.clone(), e.plugin.clone())).collect();
        for (plugin_id, plugin) in plugins {
            let ctx = self.ctx(&plugin_id, "notify", true);
            let notifications = notifications.clone();
            tokio::spawn(async move {
                let _ = call_isolated(&plugin_id, "on_notifications", async move {
                    plugin.on_notifications(event, &notifications, ctx).await
                })
                .await;
            });
        }
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
