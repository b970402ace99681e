// SPDX-License-Identifier: MIT

use super::*;
use crate::constants::LifecycleState;

#[test]
fn materialize_opens_with_given_ref_and_timestamp() {
    let tmpl = MessageTemplateBuilder::default().title("Disk full").build();
    let msg = tmpl.materialize("rule:disk:sda1", 1_000);
    assert_eq!(msg.r#ref, "rule:disk:sda1");
    assert_eq!(msg.lifecycle.state, LifecycleState::Open);
    assert_eq!(msg.lifecycle.state_changed_at, Some(1_000));
    assert_eq!(msg.title, "Disk full");
}

#[test]
fn materialize_starts_with_empty_metrics_and_progress() {
    let tmpl = MessageTemplateBuilder::default().build();
    let msg = tmpl.materialize("r", 0);
    assert!(msg.metrics.is_empty());
    assert_eq!(msg.progress.percentage, None);
}

#[test]
fn unowned_preset_is_deletable_by_anyone() {
    let preset = PresetBuilder::default().owned_by("").build();
    assert!(preset.deletable_by("anyone"));
}

#[test]
fn owned_preset_is_only_deletable_by_owner() {
    let preset = PresetBuilder::default().owned_by("plugin:disk-watch").build();
    assert!(preset.deletable_by("plugin:disk-watch"));
    assert!(!preset.deletable_by("plugin:other"));
}
