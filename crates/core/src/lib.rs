// SPDX-License-Identifier: MIT

//! Shared data model, constants, and small-object utilities used by every
//! message hub subsystem: the message/preset types, the severity/kind/
//! lifecycle/action enums, id generation, the testable clock, an order-
//! preserving JSON map codec, audience routing normalization, and the
//! per-path FIFO operation queue the archive builds on.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

#[macro_use]
mod macros;

pub mod clock;
pub mod constants;
pub mod error;
pub mod host;
pub mod id;
pub mod jsonmap;
pub mod message;
pub mod opqueue;
pub mod preset;
pub mod routing;

pub use clock::{days_since_epoch, yyyymmdd_utc, Clock, FakeClock, SystemClock};
pub use constants::{ActionType, ChangeKind, Kind, Level, LifecycleState, NotifyEvent};
pub use error::{HubError, HubErrorKind, HubResult};
pub use host::{HostFileStorage, HostLogger, HostObjects, HostSendTo, HostSubscriptions};
pub use id::IdBuf;
pub use jsonmap::JsonMap;
pub use message::{
    ActionSpec, Attachment, Audience, Channels, Details, Lifecycle, Message, MetricEntry,
    Progress, Timing,
};
pub use opqueue::PathOpQueue;
pub use preset::{MessageTemplate, Preset, PresetPolicy};
pub use routing::{normalize_channel, normalize_route_to, route_matches, DEFAULT_ROUTE};

#[cfg(any(test, feature = "test-support"))]
pub use host::FakeHostFileStorage;
#[cfg(any(test, feature = "test-support"))]
pub use message::MessageBuilder;
#[cfg(any(test, feature = "test-support"))]
pub use preset::{MessageTemplateBuilder, PresetBuilder};
