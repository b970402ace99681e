// SPDX-License-Identifier: MIT

//! The admin command router (§6): matches a `command` string against
//! [`msghub_wire::command_name`] and forwards the JSON payload to the
//! owning subsystem, wrapping every outcome in an [`Envelope`].
//!
//! This module only ever returns a populated [`Envelope`] — it never
//! propagates a `HubError` to its caller, matching §7's "the core NEVER
//! lets ... an exception escape": any conversion failure or subsystem
//! error becomes `Envelope::err`.

use crate::Hub;
use msghub_core::{Clock, HubError};
use msghub_store::{MessageFilter, Page};
use msghub_wire::{
    command_name, ArchiveStatusDto, BulkApplyRequest, BulkApplyResult, ConstantsDto, Envelope, MessageQuery,
    MessageQueryResult, MessagesDelete, MessagesDeleted, PresetDelete, PresetRef, PresetUpsert, QueryMeta,
    StatsInclude, StrategyChangeDto,
};
use serde_json::Value;

impl<C: Clock + Clone + 'static> Hub<C> {
    /// Dispatch one admin command (§6). `payload` is the command's own
    /// request shape as JSON; the response is always `{ok,data}` or
    /// `{ok,error}` (also as JSON, so callers over `sendTo`/HTTP don't need
    /// to know the concrete response DTO type up front).
    pub async fn handle_command(&self, command: &str, payload: Value) -> Value {
        let envelope = self.dispatch(command, payload).await;
        envelope
    }

    async fn dispatch(&self, command: &str, payload: Value) -> Value {
        match command {
            command_name::STATS_GET => self.stats_get(payload),
            command_name::MESSAGES_QUERY => self.messages_query(payload),
            command_name::MESSAGES_DELETE => self.messages_delete(payload),
            command_name::CONSTANTS_GET => serde_json::to_value(Envelope::ok(self.constants_get())).unwrap_or(Value::Null),
            command_name::ARCHIVE_STATUS => self.archive_status(),
            command_name::ARCHIVE_RETRY_NATIVE => self.archive_retry_native().await,
            command_name::ARCHIVE_FORCE_IOBROKER => self.archive_force_iobroker(),
            command_name::PRESETS_LIST => self.presets_list(),
            command_name::PRESETS_GET => self.presets_get(payload),
            command_name::PRESETS_UPSERT => self.presets_upsert(payload),
            command_name::PRESETS_DELETE => self.presets_delete(payload),
            command_name::BULK_APPLY_PREVIEW => self.bulk_apply(payload, false),
            command_name::BULK_APPLY_APPLY => self.bulk_apply(payload, true),
            other => err_value::<Value>(HubError::unknown_command(format!("unknown admin command: {other}"))),
        }
    }

    fn stats_get(&self, payload: Value) -> Value {
        let include: StatsInclude = match serde_json::from_value(payload) {
            Ok(v) => v,
            Err(e) => return err_value::<Value>(HubError::bad_request(e.to_string())),
        };
        ok_value(self.stats.snapshot(include.archive_size))
    }

    fn messages_query(&self, payload: Value) -> Value {
        #[derive(serde::Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Payload {
            #[serde(default)]
            query: MessageQuery,
        }
        let Payload { query } = match serde_json::from_value(payload) {
            Ok(v) => v,
            Err(e) => return err_value::<Value>(HubError::bad_request(e.to_string())),
        };

        let filter = MessageFilter {
            kind: query.r#where.kind,
            level_min: query.r#where.level_min,
            level_max: query.r#where.level_max,
            lifecycle_state: query.r#where.lifecycle_state,
            audience_tags_any: query.r#where.audience_tags_any,
            routed_to: query.r#where.routed_to,
            started_by: query.r#where.started_by,
        };
        let page = Page { page: query.page.max(1), page_size: query.page_size.max(1) };
        let result = self.store.query_messages(&filter, page);

        let response = MessageQueryResult {
            items: result.items,
            total: result.total,
            pages: result.pages,
            meta: QueryMeta { page: page.page, page_size: page.page_size },
        };
        ok_value(response)
    }

    fn messages_delete(&self, payload: Value) -> Value {
        let req: MessagesDelete = match serde_json::from_value(payload) {
            Ok(v) => v,
            Err(e) => return err_value::<Value>(HubError::bad_request(e.to_string())),
        };
        let removed = req.refs.iter().filter(|r| self.store.remove_message(r)).count();
        ok_value(MessagesDeleted { removed })
    }

    fn constants_get(&self) -> ConstantsDto {
        ConstantsDto {
            kind: vec!["task".to_string(), "status".to_string(), "shoppinglist".to_string()],
            level: msghub_core::Level::ALL.iter().map(|l| l.as_ref().to_string()).collect(),
            lifecycle: vec![
                "open".to_string(),
                "acked".to_string(),
                "snoozed".to_string(),
                "closed".to_string(),
                "deleted".to_string(),
                "expired".to_string(),
            ],
        }
    }

    fn archive_status(&self) -> Value {
        let status = self.archive.status();
        ok_value(ArchiveStatusDto {
            configured_strategy_lock: status.configured_strategy_lock.to_string(),
            effective_strategy: status.effective_strategy.to_string(),
            lock_reason: status.lock_reason,
            base_dir: status.base_dir,
            file_extension: status.file_extension,
        })
    }

    async fn archive_retry_native(&self) -> Value {
        match self.archive.retry_native().await {
            Ok(change) => ok_value(StrategyChangeDto {
                next_lock: change.next_lock.to_string(),
                restart_required: change.restart_required,
            }),
            Err(e) => err_value::<Value>(e),
        }
    }

    fn archive_force_iobroker(&self) -> Value {
        let change = self.archive.force_iobroker();
        ok_value(StrategyChangeDto { next_lock: change.next_lock.to_string(), restart_required: change.restart_required })
    }

    fn presets_list(&self) -> Value {
        ok_value(self.presets.list())
    }

    fn presets_get(&self, payload: Value) -> Value {
        let req: PresetRef = match serde_json::from_value(payload) {
            Ok(v) => v,
            Err(e) => return err_value::<Value>(HubError::bad_request(e.to_string())),
        };
        match self.presets.get(&req.preset_id, &req.subset) {
            Ok(preset) => ok_value(preset),
            Err(e) => err_value::<Value>(e),
        }
    }

    fn presets_upsert(&self, payload: Value) -> Value {
        let req: PresetUpsert = match serde_json::from_value(payload) {
            Ok(v) => v,
            Err(e) => return err_value::<Value>(HubError::bad_request(e.to_string())),
        };
        self.presets.upsert(req.preset.clone());
        ok_value(req.preset)
    }

    fn presets_delete(&self, payload: Value) -> Value {
        let req: PresetDelete = match serde_json::from_value(payload) {
            Ok(v) => v,
            Err(e) => return err_value::<Value>(HubError::bad_request(e.to_string())),
        };
        match self.presets.delete(&req.preset_id, &req.subset, &req.actor) {
            Ok(()) => ok_value(serde_json::json!({"deleted": req.preset_id})),
            Err(e) => err_value::<Value>(e),
        }
    }

    /// `admin.ingestStates.bulkApply.{preview,apply}`: reassign ownership
    /// on every preset whose id matches `pattern` (a `*`-wildcard glob). A
    /// matched preset is actually touched only if `replace` is set or it
    /// currently has no owner; `limit` caps how many get touched in one
    /// call, `preview=false` means dry-run (counts only, no mutation).
    fn bulk_apply(&self, payload: Value, apply: bool) -> Value {
        let req: BulkApplyRequest = match serde_json::from_value(payload) {
            Ok(v) => v,
            Err(e) => return err_value::<Value>(HubError::bad_request(e.to_string())),
        };
        let Some(new_owner) = req.custom.clone() else {
            return err_value::<Value>(HubError::bad_request("custom owner is required"));
        };

        let mut matched = 0usize;
        let mut applied = 0usize;
        let mut errors = Vec::new();
        let limit = req.limit.unwrap_or(usize::MAX);

        for preset in self.presets.list() {
            if !glob_match(&req.pattern, &preset.preset_id) {
                continue;
            }
            matched += 1;
            if applied >= limit {
                continue;
            }
            let eligible = req.replace || preset.owned_by.is_empty();
            if !eligible {
                errors.push(format!("{} is owned by {}", preset.preset_id, preset.owned_by));
                continue;
            }
            if apply {
                let mut updated = preset;
                updated.owned_by = new_owner.clone();
                self.presets.upsert(updated);
            }
            applied += 1;
        }

        ok_value(BulkApplyResult { matched, applied, errors })
    }
}

/// Simple `*`-wildcard glob match (no other metacharacters), matching the
/// preset/target id patterns used elsewhere in the ingest rule config.
fn glob_match(pattern: &str, candidate: &str) -> bool {
    let mut segments = pattern.split('*').peekable();
    let Some(first) = segments.next() else { return candidate.is_empty() };
    if !candidate.starts_with(first) {
        return false;
    }
    let mut rest = &candidate[first.len()..];
    while let Some(segment) = segments.next() {
        if segment.is_empty() {
            if segments.peek().is_none() {
                return true;
            }
            continue;
        }
        match rest.find(segment) {
            Some(idx) => rest = &rest[idx + segment.len()..],
            None => return false,
        }
    }
    rest.is_empty() || pattern.ends_with('*')
}

fn ok_value<T: serde::Serialize>(data: T) -> Value {
    serde_json::to_value(Envelope::ok(data)).unwrap_or(Value::Null)
}

fn err_value<T>(error: HubError) -> Value {
    serde_json::to_value(Envelope::<()>::err(error)).unwrap_or(Value::Null)
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
