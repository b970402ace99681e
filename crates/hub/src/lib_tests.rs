// SPDX-License-Identifier: MIT

use super::*;
use crate::testing::test_host_deps;
use msghub_core::{FakeClock, Level, MessageBuilder};
use msghub_rules::RuleConfig;

#[tokio::test]
async fn start_assembles_every_subsystem_against_a_default_config() {
    let clock = FakeClock::at(10_000);
    let hub = Hub::start(EffectiveConfig::default(), test_host_deps(), clock).await;

    assert_eq!(hub.store().len(), 0);
    assert!(hub.presets().list().is_empty());
    assert!(hub.plugin_health().is_empty());
}

#[tokio::test]
async fn tick_expires_overdue_messages_and_reports_them() {
    let clock = FakeClock::at(10_000);
    let hub = Hub::start(EffectiveConfig::default(), test_host_deps(), clock.clone()).await;

    let mut message = MessageBuilder::default().r#ref("m-1").level(Level::Warning).build();
    message.timing.expires_at = Some(5_000);
    hub.store().add_message(message).unwrap();

    let outcome = hub.tick().await.unwrap();
    assert_eq!(outcome.expired.len(), 1);
    assert_eq!(outcome.expired[0].r#ref, "m-1");
}

#[tokio::test]
async fn observe_forwards_to_the_registered_rule_engine_target() {
    let clock = FakeClock::at(10_000);
    let hub = Hub::start(EffectiveConfig::default(), test_host_deps(), clock.clone()).await;

    let ctx = msghub_rules::TargetContext {
        instance: "inst".to_string(),
        rule: "threshold".to_string(),
        id: "sensor".to_string(),
        preset_id: "preset-1".to_string(),
        subset: "default".to_string(),
        location: None,
    };
    hub.presets().upsert(msghub_core::PresetBuilder::default().preset_id("preset-1").build());
    hub.register_target(
        ctx,
        RuleConfig::Threshold(msghub_rules::ThresholdConfig {
            compare: msghub_rules::Compare::Gt(10.0),
            min_duration_ms: 0,
            hysteresis: 0.0,
        }),
    );

    hub.observe("inst.threshold.sensor", 10_000, Some(20.0)).await.unwrap();
    let message = hub.store().get_message_by_ref("inst.threshold.sensor");
    assert!(message.is_some());
}
