// SPDX-License-Identifier: MIT

use super::*;

#[test]
fn default_config_has_no_quiet_hours_and_native_archive() {
    let config = EffectiveConfig::default();
    assert!(config.quiet_hours.is_none());
    assert_eq!(config.archive.lock, BackendLock::Native);
}

#[test]
fn from_toml_parses_quiet_hours_and_archive() {
    let raw = RawConfig::from_toml(
        r#"
        [quietHours]
        startMin = 1320
        endMin = 360
        maxLevel = 20
        spreadMs = 5000

        [archive]
        lock = "iobroker"
        baseDir = "state/archive"
        "#,
    )
    .unwrap();
    let config = EffectiveConfig::from_raw(raw).unwrap();

    let qh = config.quiet_hours.unwrap();
    assert_eq!(qh.start_min, 1320);
    assert_eq!(qh.end_min, 360);
    assert_eq!(qh.max_level, msghub_core::Level::Warning);
    assert_eq!(qh.spread_ms, 5000);
    assert_eq!(config.archive.lock, BackendLock::Iobroker);
    assert_eq!(config.archive.base_dir, std::path::PathBuf::from("state/archive"));
}

#[test]
fn tick_interval_ms_defaults_to_five_seconds_and_is_toml_configurable() {
    let raw = RawConfig::from_toml("").unwrap();
    let config = EffectiveConfig::from_raw(raw).unwrap();
    assert_eq!(config.scheduler_tick_interval_ms, 5_000);

    let raw = RawConfig::from_toml("tickIntervalMs = 1500").unwrap();
    let config = EffectiveConfig::from_raw(raw).unwrap();
    assert_eq!(config.scheduler_tick_interval_ms, 1_500);
    assert_eq!(config.scheduler_config().tick_interval_ms, 1_500);
}

#[test]
fn from_toml_rejects_an_unknown_quiet_hours_level() {
    let raw = RawConfig::from_toml(
        r#"
        [quietHours]
        startMin = 0
        endMin = 360
        maxLevel = 99
        "#,
    )
    .unwrap();
    assert!(EffectiveConfig::from_raw(raw).is_err());
}

#[test]
fn public_ai_strips_api_key_and_base_url() {
    let raw = RawConfig::from_toml(
        r#"
        [ai]
        enabled = true
        provider = "openai"

        [ai.openai]
        apiKey = "sk-secret"
        modelsByQuality = { fast = "gpt-4o-mini" }
        "#,
    )
    .unwrap();
    let config = EffectiveConfig::from_raw(raw).unwrap();
    assert_eq!(config.ai.openai.as_ref().unwrap().api_key, "sk-secret");

    let public = config.public_ai();
    let value = serde_json::to_value(&public).unwrap();
    assert!(value["openai"].get("apiKey").is_none());
    assert!(value["openai"].get("baseUrl").is_none());
    assert_eq!(value["openai"]["modelsByQuality"]["fast"], "gpt-4o-mini");
}
