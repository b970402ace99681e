//! §8 scenario 1 "Snooze round-trip": snoozing a message pins `notifyAt` to
//! exactly `now + forMs`, regardless of where `notifyAt` was before.

use msghub::config::EffectiveConfig;
use msghub::Hub;
use msghub_action::ActionRequest;
use msghub_core::{ActionSpec, ActionType, FakeClock, Level, LifecycleState, MessageBuilder, Timing};

#[tokio::test]
async fn snoozing_an_open_message_pins_notify_at_to_now_plus_for_ms() {
    let clock = FakeClock::at(1_000);
    let hub = Hub::start(EffectiveConfig::default(), msghub::testing::test_host_deps(), clock.clone()).await;

    hub.store()
        .add_message(
            MessageBuilder::default()
                .r#ref("a")
                .level(Level::Warning)
                .timing(Timing { notify_at: Some(1_000), ..Default::default() })
                .actions(vec![ActionSpec { id: "s1".to_string(), action_type: ActionType::Snooze, payload: None }])
                .build(),
        )
        .unwrap();

    clock.set_epoch_ms(2_000);

    let outcome = hub
        .execute_action(ActionRequest {
            r#ref: "a".to_string(),
            action_id: "s1".to_string(),
            snooze_for_ms: Some(5_000),
            ..Default::default()
        })
        .await;
    assert!(outcome.ok);
    assert!(!outcome.noop);

    let after = hub.store().get_message_by_ref("a").unwrap();
    assert_eq!(after.lifecycle.state, LifecycleState::Snoozed);
    assert_eq!(after.timing.notify_at, Some(7_000));
}
