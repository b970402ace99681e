// SPDX-License-Identifier: MIT

//! Audience/channel normalization shared by the factory (on ingest) and the
//! scheduler (when matching a notification plugin against a message's
//! `audience.channels`).

/// Default route used when a message descriptor omits `audience.routeTo`.
pub const DEFAULT_ROUTE: &str = "default";

/// Normalize a single channel name: trim surrounding whitespace, lowercase,
/// collapse to `default` if empty after trimming.
pub fn normalize_channel(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        DEFAULT_ROUTE.to_string()
    } else {
        trimmed.to_lowercase()
    }
}

/// Normalize a full `routeTo` list: normalize each entry, drop duplicates
/// while preserving first-seen order, and default to `["default"]` when the
/// input is empty.
pub fn normalize_route_to(raw: &[String]) -> Vec<String> {
    if raw.is_empty() {
        return vec![DEFAULT_ROUTE.to_string()];
    }
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::with_capacity(raw.len());
    for entry in raw {
        let norm = normalize_channel(entry);
        if seen.insert(norm.clone()) {
            out.push(norm);
        }
    }
    if out.is_empty() {
        out.push(DEFAULT_ROUTE.to_string());
    }
    out
}

/// Whether `routes` (a message's normalized `routeTo`) includes `channel`
/// (a plugin's registered channel name). Both sides are normalized so the
/// comparison is case- and whitespace-insensitive regardless of caller.
pub fn route_matches(routes: &[String], channel: &str) -> bool {
    let channel = normalize_channel(channel);
    routes.iter().any(|r| r == &channel)
}

#[cfg(test)]
#[path = "routing_tests.rs"]
mod tests;
