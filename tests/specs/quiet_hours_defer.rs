//! §8 scenario 2 "Quiet-hours defer": a gated level is pushed to the end of
//! the quiet window; a louder level dispatches immediately in the same tick.

use msghub::config::EffectiveConfig;
use msghub::Hub;
use msghub_core::{FakeClock, Level, MessageBuilder, Timing};
use msghub_scheduler::QuietHoursConfig;

fn midnight_plus(hours: u64) -> u64 {
    let midnight = 1_700_000_000_000 / 86_400_000 * 86_400_000;
    midnight + hours * 3_600_000
}

#[tokio::test]
async fn quiet_level_defers_while_louder_level_dispatches_immediately() {
    let now = midnight_plus(22) + 30 * 60_000; // 22:30
    let clock = FakeClock::at(now);

    let mut config = EffectiveConfig::default();
    config.quiet_hours = Some(QuietHoursConfig {
        start_min: 22 * 60,
        end_min: 6 * 60,
        max_level: Level::Warning,
        spread_ms: 0,
        tick_interval_ms: config.scheduler_tick_interval_ms as i64,
        utc_offset_min: 0,
    });

    let hub = Hub::start(config, msghub::testing::test_host_deps(), clock.clone()).await;

    hub.store()
        .add_message(
            MessageBuilder::default()
                .r#ref("quiet")
                .level(Level::Warning)
                .timing(Timing { notify_at: Some(now), ..Default::default() })
                .build(),
        )
        .unwrap();
    hub.store()
        .add_message(
            MessageBuilder::default()
                .r#ref("loud")
                .level(Level::Error)
                .timing(Timing { notify_at: Some(now), ..Default::default() })
                .build(),
        )
        .unwrap();

    let outcome = hub.tick().await.unwrap();

    // Only the louder-than-maxLevel message dispatches this tick.
    assert_eq!(outcome.due.iter().map(|m| m.r#ref.as_str()).collect::<Vec<_>>(), vec!["loud"]);

    let quiet_after = hub.store().get_message_by_ref("quiet").unwrap();
    let window_end = midnight_plus(30); // 06:00 the following day
    assert_eq!(quiet_after.timing.notify_at, Some(window_end));

    let loud_after = hub.store().get_message_by_ref("loud").unwrap();
    assert_eq!(loud_after.timing.notify_at, None);
}
