// SPDX-License-Identifier: MIT

//! Constructs and validates [`Message`] values from raw, untrusted input
//! (§4.2). Used by ingest plugins and the rule engine's
//! `TargetMessageWriter`; never writes to the store itself.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

use msghub_core::{
    ActionSpec, ActionType, Attachment, Audience, Channels, Details, HubError, HubResult, Kind,
    Level, Lifecycle, LifecycleState, Message, Progress, Timing,
};
use std::str::FromStr;

/// A raw action descriptor as it arrives from a plugin/ingest call, before
/// the whitelist check.
#[derive(Debug, Clone, Default)]
pub struct RawAction {
    pub id: String,
    pub r#type: String,
    pub payload: Option<serde_json::Value>,
}

/// A raw, pre-validation message descriptor. Every field mirrors
/// [`Message`] but with looser (stringly-typed / optional) input shapes,
/// matching what an ingest plugin or rule engine hands the factory.
#[derive(Debug, Clone, Default)]
pub struct RawMessage {
    pub r#ref: String,
    pub kind: Option<String>,
    pub level: Option<u8>,
    pub origin: String,
    pub title: String,
    pub text: String,
    pub text_recovered: Option<String>,
    pub icon: Option<String>,
    pub details: Option<Details>,
    pub attachments: Vec<Attachment>,
    pub timing: Timing,
    pub actions: Vec<RawAction>,
    pub audience: Audience,
}

/// Builds normalized, validated messages (§4.2).
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageFactory;

impl MessageFactory {
    pub fn new() -> Self {
        Self
    }

    /// Normalize, default, and validate `raw`, producing a message ready
    /// for `Store::addMessage`. Rejects with a `BAD_REQUEST` error (the
    /// caller is expected to log and drop it) when `ref` is missing,
    /// `level`/`kind` is invalid, or `actions[]` is malformed.
    pub fn create_message(&self, raw: RawMessage, now: u64) -> HubResult<Message> {
        let r#ref = raw.r#ref.trim().to_string();
        if r#ref.is_empty() {
            return Err(HubError::bad_request("ref is required"));
        }

        let kind: Kind = raw.kind.as_deref().unwrap_or("status").into();

        let level = match raw.level {
            Some(v) => Level::from_value(v)
                .ok_or_else(|| HubError::bad_request(format!("unknown level: {v}")))?,
            None => Level::Info,
        };

        let actions =
            raw.actions.into_iter().map(normalize_action).collect::<HubResult<Vec<_>>>()?;

        let mut seen = std::collections::HashSet::with_capacity(actions.len());
        for action in &actions {
            if !seen.insert(action.id.clone()) {
                return Err(HubError::bad_request(format!("duplicate action id: {}", action.id)));
            }
        }

        let mut timing = raw.timing;
        if !kind.supports_due_timing() {
            timing.due_at = None;
            timing.time_budget = None;
        }

        let mut include: Vec<String> =
            raw.audience.channels.include.iter().map(|s| msghub_core::normalize_channel(s)).collect();
        let route_to =
            raw.audience.channels.route_to.map(|r| msghub_core::normalize_route_to(&r));
        if include.is_empty() && route_to.is_none() {
            include.push(msghub_core::routing::DEFAULT_ROUTE.to_string());
        }

        let audience = Audience {
            tags: raw.audience.tags,
            channels: Channels {
                include,
                exclude: raw.audience.channels.exclude.iter().map(|s| msghub_core::normalize_channel(s)).collect(),
                route_to,
            },
        };

        let attachments =
            raw.attachments.into_iter().map(normalize_attachment).collect::<HubResult<Vec<_>>>()?;

        let message = Message {
            r#ref,
            kind,
            level,
            origin: raw.origin,
            title: normalize_text(&raw.title),
            text: normalize_text(&raw.text),
            text_recovered: raw.text_recovered.map(|s| normalize_text(&s)),
            icon: raw.icon,
            details: raw.details,
            attachments,
            lifecycle: {
                let mut lc = Lifecycle::new(LifecycleState::Open);
                lc.state_changed_at = Some(now);
                lc
            },
            timing,
            actions,
            metrics: Default::default(),
            progress: Progress::default(),
            audience,
        };
        message.validate()?;
        Ok(message)
    }
}

/// Reject attachments obviously too large to be a sane size hint rather than
/// a caller mistake (e.g. a byte count mistyped as bits, or an overflowed
/// counter). 4 GiB comfortably covers any real attachment this hub routes.
const MAX_ATTACHMENT_SIZE_BYTES: u64 = 4 * 1024 * 1024 * 1024;

/// Validate a single attachment (§4.2): `url` must be non-empty, `content_type`
/// (when present) must look like a MIME type (`type/subtype`, no whitespace),
/// and `size_bytes` (when present) must be a plausible, non-zero hint.
fn normalize_attachment(raw: Attachment) -> HubResult<Attachment> {
    if raw.url.trim().is_empty() {
        return Err(HubError::bad_request("attachment url is required"));
    }
    if let Some(content_type) = &raw.content_type {
        let ct = content_type.trim();
        let parts: Vec<&str> = ct.splitn(2, '/').collect();
        let well_formed = parts.len() == 2
            && !parts[0].is_empty()
            && !parts[1].is_empty()
            && !ct.chars().any(char::is_whitespace);
        if !well_formed {
            return Err(HubError::bad_request(format!(
                "attachment content-type is malformed: {content_type}"
            )));
        }
    }
    if let Some(size_bytes) = raw.size_bytes {
        if size_bytes == 0 || size_bytes > MAX_ATTACHMENT_SIZE_BYTES {
            return Err(HubError::bad_request(format!(
                "attachment size hint out of range: {size_bytes}"
            )));
        }
    }
    Ok(raw)
}

fn normalize_action(raw: RawAction) -> HubResult<ActionSpec> {
    let id = raw.id.trim().to_string();
    if id.is_empty() {
        return Err(HubError::bad_request("action id is required"));
    }
    let action_type = ActionType::from_str(raw.r#type.trim())
        .map_err(|_| HubError::bad_request(format!("unknown action type: {}", raw.r#type)))?;
    Ok(ActionSpec { id, action_type, payload: raw.payload })
}

/// Normalize whitespace: collapse CRLF/CR to LF, strip control characters
/// other than newline/tab, trim the result (§4.2).
fn normalize_text(raw: &str) -> String {
    let collapsed = raw.replace("\r\n", "\n").replace('\r', "\n");
    let cleaned: String =
        collapsed.chars().filter(|c| !c.is_control() || *c == '\n' || *c == '\t').collect();
    cleaned.trim().to_string()
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
