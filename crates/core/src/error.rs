// SPDX-License-Identifier: MIT

//! Shared error taxonomy (§7 of the specification).
//!
//! Every subsystem surfaces failures through [`HubError`] so that the admin
//! command router (in `msghub-wire`/`msghub`) can map a single `kind` onto
//! the `{ok:false, error:{code, message}}` DTO shape without each crate
//! reinventing its own code table.

use thiserror::Error;

/// Coarse error classification shared across the core subsystems.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HubErrorKind {
    /// Missing/invalid inputs (e.g. empty ref).
    BadRequest,
    /// Subsystem not wired (e.g. store missing on an admin command).
    NotReady,
    /// Unknown ref, unknown preset.
    NotFound,
    /// Attempt to delete an owned preset, policy-blocked action.
    Forbidden,
    /// Admin command router received an unrecognized command.
    UnknownCommand,
    /// Operation requires an enabled subsystem that is currently disabled.
    PluginDisabled,
    /// Archive backend probe could not validate filesystem I/O.
    NativeProbeFailed,
    /// Unexpected failure during command handling.
    Internal,
}

impl HubErrorKind {
    /// Stable machine-readable code used in the admin DTO `error.code` field.
    pub fn code(self) -> &'static str {
        match self {
            HubErrorKind::BadRequest => "BAD_REQUEST",
            HubErrorKind::NotReady => "NOT_READY",
            HubErrorKind::NotFound => "NOT_FOUND",
            HubErrorKind::Forbidden => "FORBIDDEN",
            HubErrorKind::UnknownCommand => "UNKNOWN_COMMAND",
            HubErrorKind::PluginDisabled => "PLUGIN_DISABLED",
            HubErrorKind::NativeProbeFailed => "NATIVE_PROBE_FAILED",
            HubErrorKind::Internal => "INTERNAL",
        }
    }
}

crate::simple_display! {
    HubErrorKind {
        BadRequest => "BAD_REQUEST",
        NotReady => "NOT_READY",
        NotFound => "NOT_FOUND",
        Forbidden => "FORBIDDEN",
        UnknownCommand => "UNKNOWN_COMMAND",
        PluginDisabled => "PLUGIN_DISABLED",
        NativeProbeFailed => "NATIVE_PROBE_FAILED",
        Internal => "INTERNAL",
    }
}

/// A core-level error carrying a [`HubErrorKind`] and a human message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct HubError {
    pub kind: HubErrorKind,
    pub message: String,
}

impl HubError {
    pub fn new(kind: HubErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(HubErrorKind::BadRequest, message)
    }

    pub fn not_ready(message: impl Into<String>) -> Self {
        Self::new(HubErrorKind::NotReady, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(HubErrorKind::NotFound, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(HubErrorKind::Forbidden, message)
    }

    pub fn unknown_command(message: impl Into<String>) -> Self {
        Self::new(HubErrorKind::UnknownCommand, message)
    }

    pub fn plugin_disabled(message: impl Into<String>) -> Self {
        Self::new(HubErrorKind::PluginDisabled, message)
    }

    pub fn native_probe_failed(message: impl Into<String>) -> Self {
        Self::new(HubErrorKind::NativeProbeFailed, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(HubErrorKind::Internal, message)
    }
}

pub type HubResult<T> = Result<T, HubError>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
