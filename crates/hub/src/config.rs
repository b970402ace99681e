// SPDX-License-Identifier: MIT

//! Effective, normalized configuration (§6 "Configuration (effective,
//! normalized)"): loaded once from TOML, then split into a core-private
//! view (may include secrets) and a plugin-public view (secrets stripped).
//! Both views are plain values, not behind a lock — configuration never
//! changes without a restart (§6: archive strategy changes are
//! `restartRequired: true`).

use msghub_archive::{ArchiveConfig, BackendLock};
use msghub_core::{HubError, HubResult, Level};
use msghub_scheduler::{QuietHoursConfig, SchedulerConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Raw TOML shape. Every section is optional; absent sections take the
/// defaults documented on [`EffectiveConfig::default`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawConfig {
    #[serde(default)]
    pub quiet_hours: Option<RawQuietHours>,
    #[serde(default)]
    pub render: RawRender,
    #[serde(default)]
    pub archive: RawArchive,
    #[serde(default)]
    pub ai: RawAi,
    /// Scheduler sweep interval (§4.4: "configurable interval (default
    /// 1-10s)").
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

fn default_tick_interval_ms() -> u64 {
    5_000
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawQuietHours {
    pub start_min: u32,
    pub end_min: u32,
    pub max_level: u8,
    #[serde(default)]
    pub spread_ms: u64,
    #[serde(default)]
    pub utc_offset_min: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRender {
    #[serde(default)]
    pub prefixes: HashMap<String, String>,
    #[serde(default)]
    pub templates: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawArchive {
    #[serde(default = "default_base_dir")]
    pub base_dir: String,
    #[serde(default = "default_file_extension")]
    pub file_extension: String,
    #[serde(default)]
    pub lock: RawBackendLock,
    #[serde(default = "default_keep_previous_weeks")]
    pub keep_previous_weeks: u32,
}

impl Default for RawArchive {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            file_extension: default_file_extension(),
            lock: RawBackendLock::default(),
            keep_previous_weeks: default_keep_previous_weeks(),
        }
    }
}

fn default_base_dir() -> String {
    "archive".to_string()
}

fn default_file_extension() -> String {
    "jsonl".to_string()
}

fn default_keep_previous_weeks() -> u32 {
    4
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RawBackendLock {
    #[default]
    Native,
    Iobroker,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAi {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub openai: Option<RawOpenAi>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOpenAi {
    pub api_key: String,
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub models_by_quality: HashMap<String, String>,
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

impl RawConfig {
    pub fn from_toml(src: &str) -> HubResult<Self> {
        toml::from_str(src).map_err(|e| HubError::bad_request(format!("invalid config: {e}")))
    }
}

/// `{openai{apiKey(private), baseUrl(private), modelsByQuality}}` (§6): the
/// two secret fields never reach [`PublicAiConfig`].
#[derive(Debug, Clone)]
pub struct PrivateOpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub models_by_quality: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicOpenAiConfig {
    pub models_by_quality: HashMap<String, String>,
}

#[derive(Debug, Clone, Default)]
pub struct PrivateAiConfig {
    pub enabled: bool,
    pub provider: Option<String>,
    pub openai: Option<PrivateOpenAiConfig>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicAiConfig {
    pub enabled: bool,
    pub provider: Option<String>,
    pub openai: Option<PublicOpenAiConfig>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderConfig {
    pub prefixes: HashMap<String, String>,
    pub templates: HashMap<String, String>,
}

/// The deeply-frozen, secret-bearing configuration view the core itself
/// uses (e.g. to build an `AiFacade`). Never handed to a plugin.
#[derive(Debug, Clone)]
pub struct EffectiveConfig {
    pub quiet_hours: Option<QuietHoursConfig>,
    pub render: RenderConfig,
    pub archive: ArchiveConfig,
    pub ai: PrivateAiConfig,
    pub scheduler_tick_interval_ms: u64,
}

impl Default for EffectiveConfig {
    fn default() -> Self {
        Self {
            quiet_hours: None,
            render: RenderConfig::default(),
            archive: ArchiveConfig::default(),
            ai: PrivateAiConfig::default(),
            scheduler_tick_interval_ms: 5_000,
        }
    }
}

impl EffectiveConfig {
    pub fn from_raw(raw: RawConfig) -> HubResult<Self> {
        let tick_interval_ms = raw.tick_interval_ms;
        let quiet_hours = match raw.quiet_hours {
            Some(q) => Some(QuietHoursConfig {
                start_min: q.start_min,
                end_min: q.end_min,
                max_level: Level::from_value(q.max_level)
                    .ok_or_else(|| HubError::bad_request(format!("unknown level: {}", q.max_level)))?,
                spread_ms: q.spread_ms,
                tick_interval_ms: tick_interval_ms as i64,
                utc_offset_min: q.utc_offset_min,
            }),
            None => None,
        };

        let archive = ArchiveConfig {
            base_dir: raw.archive.base_dir.into(),
            file_extension: raw.archive.file_extension,
            lock: match raw.archive.lock {
                RawBackendLock::Native => BackendLock::Native,
                RawBackendLock::Iobroker => BackendLock::Iobroker,
            },
            keep_previous_weeks: raw.archive.keep_previous_weeks,
        };

        let ai = PrivateAiConfig {
            enabled: raw.ai.enabled,
            provider: raw.ai.provider,
            openai: raw.ai.openai.map(|o| PrivateOpenAiConfig {
                api_key: o.api_key,
                base_url: o.base_url,
                models_by_quality: o.models_by_quality,
            }),
        };

        Ok(Self {
            quiet_hours,
            render: RenderConfig { prefixes: raw.render.prefixes, templates: raw.render.templates },
            archive,
            ai,
            scheduler_tick_interval_ms: tick_interval_ms,
        })
    }

    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig { tick_interval_ms: self.scheduler_tick_interval_ms, quiet_hours: self.quiet_hours.clone() }
    }

    /// The secret-stripped view handed to plugins (§6: "plugin-public view
    /// (secrets stripped)").
    pub fn public_ai(&self) -> PublicAiConfig {
        PublicAiConfig {
            enabled: self.ai.enabled,
            provider: self.ai.provider.clone(),
            openai: self.ai.openai.as_ref().map(|o| PublicOpenAiConfig { models_by_quality: o.models_by_quality.clone() }),
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
