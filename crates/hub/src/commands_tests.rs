// SPDX-License-Identifier: MIT

use super::*;
use crate::testing::test_host_deps;
use msghub_core::{FakeClock, Level, MessageBuilder, PresetBuilder};
use msghub_wire::{command_name, Envelope, MessageQueryResult, MessagesDeleted, PresetDelete, PresetRef, PresetUpsert};
use serde_json::json;

async fn test_hub() -> Hub<FakeClock> {
    let clock = FakeClock::at(10_000);
    Hub::start(EffectiveConfig::default(), test_host_deps(), clock).await
}

#[tokio::test]
async fn stats_get_reports_message_counts() {
    let hub = test_hub().await;
    hub.store().add_message(MessageBuilder::default().r#ref("m-1").build()).unwrap();

    let response = hub.handle_command(command_name::STATS_GET, json!({"archiveSize": false})).await;
    assert_eq!(response["ok"], true);
    assert_eq!(response["data"]["messagesTotal"], 1);
}

#[tokio::test]
async fn messages_query_returns_a_page_of_results() {
    let hub = test_hub().await;
    hub.store().add_message(MessageBuilder::default().r#ref("m-1").level(Level::Warning).build()).unwrap();
    hub.store().add_message(MessageBuilder::default().r#ref("m-2").level(Level::Info).build()).unwrap();

    let response = hub
        .handle_command(command_name::MESSAGES_QUERY, json!({"query": {"where": {"levelMin": "warning"}}}))
        .await;
    let envelope: Envelope<MessageQueryResult> = serde_json::from_value(response).unwrap();
    let result = envelope.data.unwrap();
    assert_eq!(result.total, 1);
    assert_eq!(result.items[0].r#ref, "m-1");
}

#[tokio::test]
async fn messages_delete_removes_every_listed_ref() {
    let hub = test_hub().await;
    hub.store().add_message(MessageBuilder::default().r#ref("m-1").build()).unwrap();

    let response = hub.handle_command(command_name::MESSAGES_DELETE, json!({"refs": ["m-1", "missing"]})).await;
    let envelope: Envelope<MessagesDeleted> = serde_json::from_value(response).unwrap();
    assert_eq!(envelope.data.unwrap().removed, 1);
}

#[tokio::test]
async fn constants_get_lists_every_level() {
    let hub = test_hub().await;
    let response = hub.handle_command(command_name::CONSTANTS_GET, json!({})).await;
    let levels = response["data"]["level"].as_array().unwrap();
    assert!(levels.iter().any(|v| v == "warning"));
}

#[tokio::test]
async fn archive_status_reports_the_native_backend_by_default() {
    let hub = test_hub().await;
    let response = hub.handle_command(command_name::ARCHIVE_STATUS, json!({})).await;
    assert_eq!(response["data"]["effectiveStrategy"], "native");
}

#[tokio::test]
async fn presets_roundtrip_through_upsert_get_and_delete() {
    let hub = test_hub().await;
    let preset = PresetBuilder::default().preset_id("preset-1").owned_by("plugin-a").build();

    let upsert = hub
        .handle_command(command_name::PRESETS_UPSERT, serde_json::to_value(PresetUpsert { preset }).unwrap())
        .await;
    assert_eq!(upsert["ok"], true);

    let get = hub
        .handle_command(command_name::PRESETS_GET, serde_json::to_value(PresetRef { preset_id: "preset-1".to_string(), subset: "default".to_string() }).unwrap())
        .await;
    assert_eq!(get["data"]["ownedBy"], "plugin-a");

    let denied = hub
        .handle_command(
            command_name::PRESETS_DELETE,
            serde_json::to_value(PresetDelete { preset_id: "preset-1".to_string(), subset: "default".to_string(), actor: "plugin-b".to_string() }).unwrap(),
        )
        .await;
    assert_eq!(denied["ok"], false);
    assert_eq!(denied["error"]["code"], "FORBIDDEN");

    let allowed = hub
        .handle_command(
            command_name::PRESETS_DELETE,
            serde_json::to_value(PresetDelete { preset_id: "preset-1".to_string(), subset: "default".to_string(), actor: "plugin-a".to_string() }).unwrap(),
        )
        .await;
    assert_eq!(allowed["ok"], true);
}

#[tokio::test]
async fn bulk_apply_preview_counts_matches_without_mutating() {
    let hub = test_hub().await;
    hub.presets().upsert(PresetBuilder::default().preset_id("sensor.a").build());
    hub.presets().upsert(PresetBuilder::default().preset_id("sensor.b").build());
    hub.presets().upsert(PresetBuilder::default().preset_id("other").build());

    let response = hub
        .handle_command(command_name::BULK_APPLY_PREVIEW, json!({"pattern": "sensor.*", "custom": "plugin-x"}))
        .await;
    assert_eq!(response["data"]["matched"], 2);
    assert_eq!(response["data"]["applied"], 2);
    assert_eq!(hub.presets().get("sensor.a", "default").unwrap().owned_by, "");

    let apply = hub
        .handle_command(command_name::BULK_APPLY_APPLY, json!({"pattern": "sensor.*", "custom": "plugin-x"}))
        .await;
    assert_eq!(apply["data"]["applied"], 2);
    assert_eq!(hub.presets().get("sensor.a", "default").unwrap().owned_by, "plugin-x");
    assert_eq!(hub.presets().get("other", "default").unwrap().owned_by, "");
}

#[tokio::test]
async fn unknown_command_yields_an_error_envelope() {
    let hub = test_hub().await;
    let response = hub.handle_command("admin.nonexistent", json!({})).await;
    assert_eq!(response["ok"], false);
    assert_eq!(response["error"]["code"], "UNKNOWN_COMMAND");
}
