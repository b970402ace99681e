//! Shared scaffolding for every scenario spec: a `Hub<FakeClock>` wired
//! against in-memory host doubles, so each spec only has to describe the
//! message/preset/config shape its scenario needs.

use msghub::config::EffectiveConfig;
use msghub::Hub;
use msghub_core::FakeClock;

pub async fn test_hub(config: EffectiveConfig) -> Hub<FakeClock> {
    Hub::start(config, msghub::testing::test_host_deps(), FakeClock::at(1_700_000_000_000)).await
}
