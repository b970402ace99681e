//! §8 scenario 6 "Policy matrix": every (state, action type) cell in §4.3's
//! table produces exactly the documented outcome and audit reason.

use msghub::config::EffectiveConfig;
use msghub::Hub;
use msghub_action::ActionRequest;
use msghub_core::{ActionSpec, ActionType, FakeClock, LifecycleState, Lifecycle, MessageBuilder};

const ACTION_TYPES: [ActionType; 4] = [ActionType::Ack, ActionType::Close, ActionType::Delete, ActionType::Snooze];

const STATES: [LifecycleState; 6] = [
    LifecycleState::Open,
    LifecycleState::Acked,
    LifecycleState::Snoozed,
    LifecycleState::Closed,
    LifecycleState::Deleted,
    LifecycleState::Expired,
];

fn allowed(state: LifecycleState, action: ActionType) -> bool {
    use ActionType::*;
    use LifecycleState::*;
    matches!(
        (state, action),
        (Open, Ack) | (Open, Close) | (Open, Delete) | (Open, Snooze)
            | (Acked, Close) | (Acked, Delete)
            | (Snoozed, Ack) | (Snoozed, Close) | (Snoozed, Delete)
    )
}

#[tokio::test]
async fn every_policy_matrix_cell_matches_its_documented_outcome() {
    for state in STATES {
        for action in ACTION_TYPES {
            let clock = FakeClock::at(1_000);
            let hub = Hub::start(EffectiveConfig::default(), msghub::testing::test_host_deps(), clock).await;

            let r#ref = format!("{state:?}-{action:?}");
            let mut message = MessageBuilder::default()
                .r#ref(r#ref.clone())
                .lifecycle(Lifecycle::new(state))
                .actions(vec![ActionSpec { id: "a1".to_string(), action_type: action, payload: None }])
                .build();
            // Snooze needs an explicit forMs; give every action a pending
            // notify so ack's idempotence short-circuit never masks the
            // policy-matrix outcome under test.
            message.timing.notify_at = Some(5_000);
            hub.store().add_message(message).unwrap();

            let outcome = hub
                .execute_action(ActionRequest {
                    r#ref: r#ref.clone(),
                    action_id: "a1".to_string(),
                    snooze_for_ms: Some(1_000),
                    ..Default::default()
                })
                .await;

            let expect_ok = allowed(state, action);
            assert_eq!(
                outcome.ok, expect_ok,
                "state={state:?} action={action:?} expected ok={expect_ok} got {outcome:?}"
            );
            if !expect_ok {
                assert_eq!(outcome.reason, Some("blocked_by_policy"));
            }
        }
    }
}
