//! §8 scenario 3 "Archive probe fallback": configured lock `native` but the
//! native probe fails against an unwritable directory; startup still
//! completes with the iobroker backend effective, and `retryNative`
//! against a now-writable directory succeeds.

use msghub::config::EffectiveConfig;
use msghub::Hub;
use msghub_archive::BackendLock;
use msghub_core::FakeClock;

#[tokio::test]
async fn probe_failure_falls_back_then_retry_native_succeeds_once_writable() {
    let dir = tempfile::tempdir().unwrap();
    // A regular file standing where the archive's base dir should be: no
    // mkdir can ever succeed under it.
    let blocker = dir.path().join("blocker");
    tokio::fs::write(&blocker, b"x").await.unwrap();

    let mut config = EffectiveConfig::default();
    config.archive.base_dir = blocker.join("nested");

    let hub = Hub::start(config, msghub::testing::test_host_deps(), FakeClock::at(1_700_000_000_000)).await;

    let status = hub.archive().status();
    assert_eq!(status.configured_strategy_lock, BackendLock::Iobroker);
    assert_eq!(status.effective_strategy, BackendLock::Iobroker);

    // Still unwritable: retryNative re-probes the same path and fails again.
    assert!(hub.archive().retry_native().await.is_err());

    // The directory becomes writable (the blocking file is removed)...
    tokio::fs::remove_file(&blocker).await.unwrap();

    // ...and retryNative now succeeds, recording native as the lock for
    // the *next* startup (the running effective backend itself doesn't
    // change mid-process, per §4.6).
    let change = hub.archive().retry_native().await.unwrap();
    assert_eq!(change.next_lock, BackendLock::Native);
    assert!(change.restart_required);
    assert_eq!(hub.archive().status().configured_strategy_lock, BackendLock::Native);
    assert_eq!(hub.archive().status().effective_strategy, BackendLock::Iobroker);
}
