// SPDX-License-Identifier: MIT

//! The notification scheduler (§4.4).

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

mod jitter;
mod quiet_hours;
mod scheduler;

pub use jitter::{Jitter, RandJitter};
pub use quiet_hours::QuietHoursConfig;
pub use scheduler::{Scheduler, SchedulerConfig, TickOutcome};

#[cfg(any(test, feature = "test-support"))]
pub use jitter::FixedJitter;
