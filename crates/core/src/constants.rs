// SPDX-License-Identifier: MIT

//! Shared, read-only enums: levels, kinds, lifecycle states, action types,
//! and notification events. These are consumed by every other subsystem and
//! never mutated at runtime.

use serde::{Deserialize, Serialize};

/// Severity level, ordered low to high. The numeric value is part of the
/// wire contract (`admin.constants.get` echoes it) so variants carry an
/// explicit discriminant rather than relying on declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Level {
    None = 0,
    Info = 5,
    Notice = 10,
    Warning = 20,
    Error = 30,
    Critical = 40,
}

impl Level {
    /// All levels in ascending order, for admin/constants listings.
    pub const ALL: [Level; 6] =
        [Level::None, Level::Info, Level::Notice, Level::Warning, Level::Error, Level::Critical];

    pub fn value(self) -> u8 {
        self as u8
    }

    /// Parse from the numeric wire value. Returns `None` for values outside
    /// the defined set (the factory rejects those).
    pub fn from_value(v: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|lvl| lvl.value() == v)
    }
}

crate::simple_display! {
    Level {
        None => "none",
        Info => "info",
        Notice => "notice",
        Warning => "warning",
        Error => "error",
        Critical => "critical",
    }
}

/// Message kind. Known kinds are named variants; anything else round-trips
/// through `Other` so new producer kinds don't need a core release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Kind {
    Task,
    Status,
    ShoppingList,
    Other(String),
}

impl Kind {
    pub fn as_str(&self) -> &str {
        match self {
            Kind::Task => "task",
            Kind::Status => "status",
            Kind::ShoppingList => "shoppinglist",
            Kind::Other(s) => s.as_str(),
        }
    }

    /// Whether `timing.due_at`/`timing.time_budget` are meaningful for this
    /// kind (§3 invariant: only `task` uses them).
    pub fn supports_due_timing(&self) -> bool {
        matches!(self, Kind::Task)
    }
}

impl From<Kind> for String {
    fn from(k: Kind) -> Self {
        k.as_str().to_string()
    }
}

impl From<String> for Kind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "task" => Kind::Task,
            "status" => Kind::Status,
            "shoppinglist" => Kind::ShoppingList,
            _ => Kind::Other(s),
        }
    }
}

impl From<&str> for Kind {
    fn from(s: &str) -> Self {
        Kind::from(s.to_string())
    }
}

/// Lifecycle state of a message (§3). Six enumerated states; `queryMessages`
/// and the action policy matrix both switch exhaustively on this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    Open,
    Acked,
    Snoozed,
    Closed,
    Deleted,
    Expired,
}

impl LifecycleState {
    /// Active states the scheduler considers for `due` candidate selection.
    pub fn is_notifiable(self) -> bool {
        matches!(self, LifecycleState::Open | LifecycleState::Snoozed)
    }

    /// Terminal for the ordinary action workflow (§4.3 policy matrix), though
    /// the rule engine may still reopen during a cooldown window.
    pub fn is_terminal(self) -> bool {
        matches!(self, LifecycleState::Closed | LifecycleState::Deleted | LifecycleState::Expired)
    }
}

crate::simple_display! {
    LifecycleState {
        Open => "open",
        Acked => "acked",
        Snoozed => "snoozed",
        Closed => "closed",
        Deleted => "deleted",
        Expired => "expired",
    }
}

/// Action type, drawn from the fixed whitelist (§3 invariant on `actions[].type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Ack,
    Close,
    Delete,
    Snooze,
    Open,
    Link,
    Custom,
}

impl ActionType {
    /// Whether this action type patches workflow state (ack/close/delete/snooze),
    /// as opposed to being accepted as a no-op (§4.3 step 5).
    pub fn is_core(self) -> bool {
        matches!(self, ActionType::Ack | ActionType::Close | ActionType::Delete | ActionType::Snooze)
    }
}

crate::simple_display! {
    ActionType {
        Ack => "ack",
        Close => "close",
        Delete => "delete",
        Snooze => "snooze",
        Open => "open",
        Link => "link",
        Custom => "custom",
    }
}

impl std::str::FromStr for ActionType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ack" => Ok(ActionType::Ack),
            "close" => Ok(ActionType::Close),
            "delete" => Ok(ActionType::Delete),
            "snooze" => Ok(ActionType::Snooze),
            "open" => Ok(ActionType::Open),
            "link" => Ok(ActionType::Link),
            "custom" => Ok(ActionType::Custom),
            _ => Err(()),
        }
    }
}

/// Notification events emitted by the scheduler to notify plugins (§4.4/§4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifyEvent {
    Due,
    Updated,
    Expired,
}

crate::simple_display! {
    NotifyEvent {
        Due => "due",
        Updated => "updated",
        Expired => "expired",
    }
}

/// Archive/journal mutation kinds (§4.6), also used as the Store change-event
/// discriminant (§4.1 "change emission").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Create,
    Patch,
    Close,
    Remove,
}

crate::simple_display! {
    ChangeKind {
        Create => "create",
        Patch => "patch",
        Close => "close",
        Remove => "remove",
    }
}

#[cfg(test)]
#[path = "constants_tests.rs"]
mod tests;
