// SPDX-License-Identifier: MIT

//! `admin.stats.get` aggregator (§6, SUPPLEMENTED FEATURES "Stats
//! surface"): message counts by lifecycle state, archive pending-flush
//! counters, and per-plugin health, computed on demand from the live
//! subsystems rather than incrementally tracked.

use msghub_archive::Archive;
use msghub_core::{Clock, LifecycleState};
use msghub_plugins::{PluginHealth, StatsProvider};
use msghub_store::MessageStore;
use std::sync::Arc;

/// Read-only handle over every subsystem `admin.stats.get` reports on.
/// Plugins only ever see it through the narrow [`StatsProvider`] trait.
pub struct Stats<C: Clock> {
    store: MessageStore<C>,
    archive: Arc<Archive<C>>,
    plugin_health: Arc<dyn Fn() -> Vec<(String, PluginHealth)> + Send + Sync>,
}

impl<C: Clock> Stats<C> {
    pub fn new(
        store: MessageStore<C>,
        archive: Arc<Archive<C>>,
        plugin_health: impl Fn() -> Vec<(String, PluginHealth)> + Send + Sync + 'static,
    ) -> Self {
        Self { store, archive, plugin_health: Arc::new(plugin_health) }
    }

    pub fn snapshot(&self, include_archive_size: bool) -> serde_json::Value {
        let messages = self.store.get_messages();
        let mut by_state = serde_json::Map::new();
        for state in [
            LifecycleState::Open,
            LifecycleState::Acked,
            LifecycleState::Snoozed,
            LifecycleState::Closed,
            LifecycleState::Deleted,
            LifecycleState::Expired,
        ] {
            let count = messages.iter().filter(|m| m.lifecycle.state == state).count();
            by_state.insert(state.to_string(), serde_json::json!(count));
        }

        let plugins: serde_json::Map<String, serde_json::Value> = (self.plugin_health)()
            .into_iter()
            .map(|(id, health)| (id, serde_json::json!(matches!(health, PluginHealth::Healthy))))
            .collect();

        let mut snapshot = serde_json::json!({
            "messagesByState": by_state,
            "messagesTotal": messages.len(),
            "pluginsHealthy": plugins,
            "archivePendingFlush": self.archive.pending_flush(),
        });

        if include_archive_size {
            let status = self.archive.status();
            snapshot["archiveStrategy"] = serde_json::json!(status.effective_strategy.to_string());
        }

        snapshot
    }
}

impl<C: Clock> StatsProvider for Stats<C> {
    fn snapshot(&self) -> serde_json::Value {
        Stats::snapshot(self, false)
    }
}

#[cfg(test)]
#[path = "stats_tests.rs"]
mod tests;
