//! §8 scenario 4 "Threshold hysteresis": `lt 7` opens on a low reading and
//! only closes once the value has recovered past the hysteresis margin, not
//! merely back above the raw boundary.

use msghub::config::EffectiveConfig;
use msghub::Hub;
use msghub_core::{FakeClock, LifecycleState, PresetBuilder};
use msghub_rules::{Compare, RuleConfig, TargetContext, ThresholdConfig};

fn ctx() -> TargetContext {
    TargetContext {
        instance: "sensors".to_string(),
        rule: "threshold".to_string(),
        id: "tank".to_string(),
        preset_id: "tank-low".to_string(),
        location: None,
    }
}

#[tokio::test]
async fn closes_only_once_recovered_past_the_hysteresis_margin() {
    let clock = FakeClock::at(0);
    let hub = Hub::start(EffectiveConfig::default(), msghub::testing::test_host_deps(), clock).await;

    hub.presets().upsert(PresetBuilder::default().preset_id("tank-low").build());
    hub.register_target(
        ctx(),
        // forbidden below 7; recovery requires val >= 7 + hysteresis(20) = 27,
        // so 10 still counts as forbidden-adjacent while 30 clears it (§8 scenario 4).
        RuleConfig::Threshold(ThresholdConfig { compare: Compare::Lt(7.0), min_duration_ms: 0, hysteresis: 20.0 }),
    );

    let target_ref = ctx().message_ref();

    hub.observe(&target_ref, 0, Some(5.0)).await.unwrap();
    let msg = hub.store().get_message_by_ref(&target_ref).expect("opens on 5");
    assert_eq!(msg.lifecycle.state, LifecycleState::Open);

    hub.observe(&target_ref, 1, Some(10.0)).await.unwrap();
    let msg = hub.store().get_message_by_ref(&target_ref).unwrap();
    assert_eq!(msg.lifecycle.state, LifecycleState::Open, "10 has not cleared the hysteresis margin yet");

    hub.observe(&target_ref, 2, Some(30.0)).await.unwrap();
    let msg = hub.store().get_message_by_ref(&target_ref).unwrap();
    assert_eq!(msg.lifecycle.state, LifecycleState::Closed, "30 clears the 27 recovery threshold");
}
