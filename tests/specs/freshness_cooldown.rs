//! §8 scenario 5 "Freshness with cooldown re-open": a preset with
//! `resetOnNormal=true` and a 60s cooldown re-opens the same `ref` (instead
//! of minting a new one) when a fresh cause re-triggers inside the cooldown
//! window, with `notifyAt` pinned to `closedAt + cooldown`.
//!
//! The freshness detector's own `everyMs` is set far smaller than the 60s
//! cooldown under test so the scenario's T/T+10s/T+20s timeline plays out
//! in a handful of milliseconds rather than real minutes; only the
//! cooldown/reopen arithmetic is under test here, not the freshness
//! interval itself.

use msghub::config::EffectiveConfig;
use msghub::Hub;
use msghub_core::{
    FakeClock, LifecycleState, MessageTemplateBuilder, PresetBuilder, PresetPolicy, Timing,
};
use msghub_rules::{FreshnessConfig, RuleConfig, TargetContext};

fn ctx() -> TargetContext {
    TargetContext {
        instance: "sensors".to_string(),
        rule: "freshness".to_string(),
        id: "pump".to_string(),
        preset_id: "pump-fresh".to_string(),
        location: None,
    }
}

#[tokio::test]
async fn a_stale_signal_inside_cooldown_reopens_the_same_ref() {
    let clock = FakeClock::at(0);
    let hub = Hub::start(EffectiveConfig::default(), msghub::testing::test_host_deps(), clock.clone()).await;

    hub.presets().upsert(
        PresetBuilder::default()
            .preset_id("pump-fresh")
            .message(MessageTemplateBuilder::default().timing(Timing { cooldown: Some(60_000), ..Default::default() }).build())
            .policy(PresetPolicy { reset_on_normal: true })
            .build(),
    );
    hub.register_target(ctx(), RuleConfig::Freshness(FreshnessConfig { every_ms: 1 }));

    let target_ref = ctx().message_ref();

    // Seed the detector's last-seen timestamp; nothing is open yet.
    hub.observe(&target_ref, 0, Some(1.0)).await.unwrap();
    assert!(hub.store().get_message_by_ref(&target_ref).is_none());

    // T: no fresher update has arrived -> opens.
    let t = 1_000;
    clock.set_epoch_ms(t);
    hub.rule_engine().poll_all(t).unwrap();
    let opened = hub.store().get_message_by_ref(&target_ref).expect("opens at T");
    assert_eq!(opened.lifecycle.state, LifecycleState::Open);

    // T+10s: a fresh update closes it (resetOnNormal=true).
    let closed_at = t + 10_000;
    clock.set_epoch_ms(closed_at);
    hub.observe(&target_ref, closed_at, Some(2.0)).await.unwrap();
    let closed = hub.store().get_message_by_ref(&target_ref).unwrap();
    assert_eq!(closed.lifecycle.state, LifecycleState::Closed);

    // T+20s (10s after close, inside the 60s cooldown): stale again ->
    // reopen the *same* ref with notifyAt = closedAt + cooldown.
    let restale_at = t + 20_000;
    clock.set_epoch_ms(restale_at);
    hub.rule_engine().poll_all(restale_at).unwrap();

    let reopened = hub.store().get_message_by_ref(&target_ref).expect("same ref, not a new one");
    assert_eq!(reopened.lifecycle.state, LifecycleState::Open);
    assert_eq!(reopened.timing.notify_at, Some(closed_at + 60_000));
}
