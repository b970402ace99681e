// SPDX-License-Identifier: MIT

//! `queryMessages` filter/pagination support (§4.1 "Querying").

use msghub_core::{normalize_channel, Kind, Level, LifecycleState, Message};

/// Filter predicates. Every field is optional; an absent field imposes no
/// constraint. `audience_tags_any` matches if the message carries ANY of
/// the listed tags; `routed_to` matches against the message's normalized
/// `audience.channels.routeTo`.
#[derive(Debug, Clone, Default)]
pub struct MessageFilter {
    pub kind: Option<Kind>,
    pub level_min: Option<Level>,
    pub level_max: Option<Level>,
    pub lifecycle_state: Option<LifecycleState>,
    pub audience_tags_any: Option<Vec<String>>,
    pub routed_to: Option<String>,
    /// `timing.startAt ≤ now or missing`.
    pub started_by: Option<u64>,
}

impl MessageFilter {
    pub fn matches(&self, msg: &Message) -> bool {
        if let Some(kind) = &self.kind {
            if &msg.kind != kind {
                return false;
            }
        }
        if let Some(min) = self.level_min {
            if msg.level < min {
                return false;
            }
        }
        if let Some(max) = self.level_max {
            if msg.level > max {
                return false;
            }
        }
        if let Some(state) = self.lifecycle_state {
            if msg.lifecycle.state != state {
                return false;
            }
        }
        if let Some(tags) = &self.audience_tags_any {
            if !tags.iter().any(|t| msg.audience.tags.iter().any(|mt| mt == t)) {
                return false;
            }
        }
        if let Some(channel) = &self.routed_to {
            let channel = normalize_channel(channel);
            let routes = msg
                .audience
                .channels
                .route_to
                .clone()
                .unwrap_or_else(|| vec![msghub_core::DEFAULT_ROUTE.to_string()]);
            if !routes.iter().any(|r| r == &channel) {
                return false;
            }
        }
        if let Some(now) = self.started_by {
            match msg.timing.start_at {
                Some(start_at) if start_at > now => return false,
                _ => {}
            }
        }
        true
    }
}

/// Page request: 1-based `page`, entries per page.
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub page: usize,
    pub page_size: usize,
}

impl Default for Page {
    fn default() -> Self {
        Self { page: 1, page_size: 50 }
    }
}

/// A page of query results.
#[derive(Debug, Clone)]
pub struct QueryResult {
    pub items: Vec<Message>,
    pub total: usize,
    pub pages: usize,
}

/// Stable ordering required by §4.1: `timing.startAt` descending (missing
/// sorts last), tie-break by `ref` ascending.
pub fn order_key(msg: &Message) -> (std::cmp::Reverse<u64>, &str) {
    (std::cmp::Reverse(msg.timing.start_at.unwrap_or(0)), msg.r#ref.as_str())
}

pub fn paginate(mut items: Vec<Message>, page: Page) -> QueryResult {
    items.sort_by(|a, b| order_key(a).cmp(&order_key(b)));

    let total = items.len();
    let page_size = page.page_size.max(1);
    let pages = total.div_ceil(page_size).max(1);
    let start = page.page.saturating_sub(1) * page_size;
    let page_items = if start >= total {
        Vec::new()
    } else {
        let end = (start + page_size).min(total);
        items[start..end].to_vec()
    };

    QueryResult { items: page_items, total, pages }
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod tests;
