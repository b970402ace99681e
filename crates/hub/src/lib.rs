// SPDX-License-Identifier: MIT

//! The message hub core engine (§1 OVERVIEW): wires the store, archive,
//! scheduler, ingest rule engine, preset registry, and plugin host into
//! one object that an embedding host (an ioBroker adapter, in
//! production) drives with three inputs — foreign state changes, a
//! periodic tick, and admin commands — and which never lets a plugin or
//! detector panic or I/O failure escape to the caller (§7).

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

mod commands;
pub mod config;
mod stats;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use config::{EffectiveConfig, PrivateAiConfig, PublicAiConfig, RawConfig, RenderConfig};
pub use stats::Stats;

use msghub_action::ActionService;
use msghub_archive::{source, spawn_store_subscriber, Archive};
use msghub_core::{BaseMeta, Clock, HostFileStorage, HostLogger, HostObjects, HostSendTo, HostSubscriptions, HubResult};
use msghub_factory::{MessageFactory, RawMessage};
use msghub_plugins::{AiFacade, HostApi, IoBrokerFacade, IngestPlugin, NotifyPlugin, PluginHealth, PluginHost, I18n};
use msghub_rules::{PresetRegistry, RuleConfig, RuleEngine, TargetContext, TargetMessageWriter};
use msghub_scheduler::Scheduler;
use msghub_store::MessageStore;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Everything the hub needs from the embedding host, gathered in one
/// place so [`Hub::start`] takes a single argument instead of five.
pub struct HostDeps {
    pub objects: Arc<dyn HostObjects>,
    pub subscriptions: Arc<dyn HostSubscriptions>,
    pub send_to: Arc<dyn HostSendTo>,
    pub files: Arc<dyn HostFileStorage>,
    pub log: Arc<dyn HostLogger>,
    pub ai: Option<Arc<dyn AiFacade>>,
    pub translations: HashMap<String, HashMap<String, String>>,
    pub locale: String,
    pub base_language: String,
}

/// The minimum interval (ms) between two metric-only writes to the same
/// target, absent a config override (§4.3 "Metric throttling").
const DEFAULT_METRIC_THROTTLE_MS: u64 = 60_000;

/// The assembled engine (§1, §4). Generic over [`Clock`] so the whole
/// thing can run against a [`msghub_core::FakeClock`] in tests.
pub struct Hub<C: Clock + Clone + 'static> {
    store: MessageStore<C>,
    archive: Arc<Archive<C>>,
    scheduler: Scheduler<C>,
    presets: Arc<PresetRegistry>,
    rule_engine: Arc<RuleEngine<C>>,
    plugin_host: Arc<PluginHost<C>>,
    action_service: Arc<ActionService<C>>,
    stats: Arc<Stats<C>>,
    config: EffectiveConfig,
    clock: C,
    _archive_subscriber: JoinHandle<()>,
}

impl<C: Clock + Clone + 'static> Hub<C> {
    /// Assemble every subsystem and start the background archive
    /// subscriber task (§4.6). Async because probing the archive backend
    /// requires filesystem I/O.
    pub async fn start(config: EffectiveConfig, host: HostDeps, clock: C) -> Self {
        let store = MessageStore::new(clock.clone());
        let archive = Arc::new(Archive::start(config.archive.clone(), Some(host.files.clone()), clock.clone()).await);
        let archive_subscriber = spawn_store_subscriber(archive.clone(), &store, source::CHANGES);

        let scheduler = Scheduler::new(store.clone(), clock.clone(), config.scheduler_config());
        let presets = PresetRegistry::new();
        let writer = TargetMessageWriter::new(store.clone(), presets.clone(), DEFAULT_METRIC_THROTTLE_MS);
        let rule_engine = Arc::new(RuleEngine::new(writer));
        let action_service = Arc::new(ActionService::new(store.clone(), archive.clone(), clock.clone()));

        let iobroker = Arc::new(IoBrokerFacade::new(host.objects, host.subscriptions, host.send_to, host.files));
        let i18n = Arc::new(I18n::new(host.translations, host.locale, host.base_language));

        // `Stats` needs a plugin-health source at construction, but the
        // plugin host needs `Stats` (via `HostApi`) to exist first. Break
        // the cycle with a cell the plugin host fills in once it's built.
        let plugin_host_cell: Arc<parking_lot::Mutex<Option<Arc<PluginHost<C>>>>> = Arc::new(parking_lot::Mutex::new(None));
        let stats = Arc::new(Stats::new(store.clone(), archive.clone(), {
            let plugin_host_cell = plugin_host_cell.clone();
            move || match plugin_host_cell.lock().as_ref() {
                Some(host) => plugin_health_of(host),
                None => Vec::new(),
            }
        }));

        let ingest_api = Arc::new(HostApi {
            constants: msghub_plugins::ConstantsFacade,
            factory: MessageFactory::new(),
            store: msghub_plugins::StoreFacade::new(store.clone()),
            stats: stats.clone() as Arc<dyn msghub_plugins::StatsProvider>,
            ai: host.ai,
            i18n,
            iobroker,
            log: host.log,
            action: Some(action_service.clone()),
        });

        let plugin_host = Arc::new(PluginHost::new(ingest_api, BaseMeta::default()));
        *plugin_host_cell.lock() = Some(plugin_host.clone());

        Self {
            store,
            archive,
            scheduler,
            presets,
            rule_engine,
            plugin_host,
            action_service,
            stats,
            config,
            clock,
            _archive_subscriber: archive_subscriber,
        }
    }

    /// Execute a whitelisted action against a message (§4.3), exactly as a
    /// plugin's `ctx.api.action` would.
    pub async fn execute_action(&self, request: msghub_action::ActionRequest) -> msghub_action::ActionOutcome {
        self.action_service.execute(request).await
    }

    pub fn store(&self) -> &MessageStore<C> {
        &self.store
    }

    pub fn archive(&self) -> &Arc<Archive<C>> {
        &self.archive
    }

    pub fn presets(&self) -> &Arc<PresetRegistry> {
        &self.presets
    }

    pub fn rule_engine(&self) -> &Arc<RuleEngine<C>> {
        &self.rule_engine
    }

    pub fn config(&self) -> &EffectiveConfig {
        &self.config
    }

    /// Register an ingest detector for one target (§4.3 "Targets are
    /// registered explicitly").
    pub fn register_target(&self, ctx: TargetContext, rule_config: RuleConfig) {
        self.rule_engine.register(ctx, rule_config);
    }

    /// Register a plugin (§4.5). Kept as two thin wrappers rather than one
    /// generic method so call sites don't need to disambiguate which
    /// registry a trait object belongs to.
    pub async fn register_ingest_plugin(&self, id: impl Into<String>, plugin: Arc<dyn IngestPlugin<C>>) {
        self.plugin_host.ingest.register(id, plugin).await;
    }

    pub async fn register_notify_plugin(&self, id: impl Into<String>, plugin: Arc<dyn NotifyPlugin<C>>) {
        self.plugin_host.notify.register(id, plugin).await;
    }

    /// Feed one foreign-state observation into the ingest pipeline (§2
    /// "Observation ingest", §4.5 ingest plugin dispatch). `target_key` is
    /// `"{instance}.{rule}.{id}"` as produced by [`TargetContext::message_ref`].
    pub async fn observe(&self, target_key: &str, ts: u64, val: Option<f64>) -> HubResult<()> {
        self.rule_engine.observe(target_key, ts, val)?;
        let value = val.map_or(serde_json::Value::Null, |v| serde_json::json!(v));
        self.plugin_host.ingest.dispatch_state_change(target_key, value).await;
        Ok(())
    }

    /// Drive one scheduler tick (§4.4 "Scheduler loop"): expire overdue
    /// messages, resolve due notifications under quiet hours, poll every
    /// freshness/cycle timer, and fan both outcomes out to notify plugins.
    pub async fn tick(&self) -> HubResult<msghub_scheduler::TickOutcome> {
        let now = self.clock.epoch_ms();
        let outcome = self.scheduler.tick();
        self.rule_engine.poll_all(now)?;
        self.plugin_host.dispatch_tick(outcome.expired.clone(), outcome.due.clone());
        Ok(outcome)
    }

    /// Resume ingest timers across a restart (§4.3 "resetAt ... survives a
    /// restart"): call once at startup, after every target has been
    /// re-registered, to recompute overdue resets that could not fire
    /// while the process was down.
    pub fn overdue_targets(&self, now: u64) -> Vec<String> {
        self.rule_engine.overdue_targets(now)
    }

    /// Notify plugins that a message changed outside the ingest/tick path
    /// (e.g. an admin action). Dispatch is fire-and-forget (§4.4 backpressure).
    pub fn notify_updated(&self, messages: Vec<msghub_core::Message>) {
        self.plugin_host.dispatch_updated(messages);
    }

    /// Current per-plugin health (ingest + notify), exposed to
    /// `admin.stats.get` via [`Stats`].
    pub fn plugin_health(&self) -> Vec<(String, PluginHealth)> {
        plugin_health_of(&self.plugin_host)
    }

    /// Create a message the same way a plugin's `ctx.api.factory` would
    /// (§4.2), for hosts that want to add a message without going through
    /// a plugin at all (e.g. a direct admin command).
    pub fn create_message(&self, raw: RawMessage, now: u64) -> HubResult<msghub_core::Message> {
        MessageFactory::new().create_message(raw, now)
    }
}

fn plugin_health_of<C: Clock + Clone + 'static>(plugin_host: &PluginHost<C>) -> Vec<(String, PluginHealth)> {
    let mut health: Vec<(String, PluginHealth)> = plugin_host
        .ingest
        .ids()
        .into_iter()
        .filter_map(|id| plugin_host.ingest.health(&id).map(|h| (id, h)))
        .collect();
    health.extend(
        plugin_host
            .notify
            .ids()
            .into_iter()
            .filter_map(|id| plugin_host.notify.health(&id).map(|h| (id, h))),
    );
    health
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
