// SPDX-License-Identifier: MIT

//! The change event every successful store mutation emits exactly once
//! (§4.1 "Change emission").

use msghub_core::{ChangeKind, Message};

/// One mutation notification, fanned out to the archive and scheduler.
/// Subscribers must not mutate store state synchronously from their
/// receive loop — mutations always go back through [`crate::MessageStore`].
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    pub r#ref: String,
    pub kind: ChangeKind,
    pub before: Option<Message>,
    pub after: Option<Message>,
    pub ts: u64,
}

/// Capacity of the broadcast channel's internal ring buffer. Archive and
/// scheduler subscribers are expected to drain promptly; a slow subscriber
/// that falls behind this many events sees `RecvError::Lagged` rather than
/// stalling the store.
pub const CHANGE_CHANNEL_CAPACITY: usize = 1024;
