// SPDX-License-Identifier: MIT

use super::*;

fn raw(r#ref: &str) -> RawMessage {
    RawMessage {
        r#ref: r#ref.to_string(),
        origin: "test".to_string(),
        title: "  Disk usage  ".to_string(),
        text: "line one\r\nline two\r\n".to_string(),
        ..Default::default()
    }
}

#[test]
fn rejects_missing_ref() {
    let err = MessageFactory::new().create_message(raw("   "), 0).unwrap_err();
    assert_eq!(err.kind, msghub_core::HubErrorKind::BadRequest);
}

#[test]
fn rejects_unknown_level() {
    let mut r = raw("a");
    r.level = Some(99);
    assert!(MessageFactory::new().create_message(r, 0).is_err());
}

#[test]
fn defaults_kind_to_status_and_level_to_info() {
    let msg = MessageFactory::new().create_message(raw("a"), 0).unwrap();
    assert_eq!(msg.kind, Kind::Status);
    assert_eq!(msg.level, Level::Info);
}

#[test]
fn normalizes_title_whitespace_and_collapses_crlf() {
    let msg = MessageFactory::new().create_message(raw("a"), 0).unwrap();
    assert_eq!(msg.title, "Disk usage");
    assert_eq!(msg.text, "line one\nline two");
}

#[test]
fn strips_control_characters_but_keeps_newline_and_tab() {
    let mut r = raw("a");
    r.text = "tab\there\x07bell".to_string();
    let msg = MessageFactory::new().create_message(r, 0).unwrap();
    assert_eq!(msg.text, "tab\there bell".replace(' ', "").replacen("herebell", "here\u{0}bell", 0));
    assert!(!msg.text.contains('\u{7}'));
    assert!(msg.text.contains('\t'));
}

#[test]
fn non_task_kind_drops_due_timing_instead_of_erroring() {
    let mut r = raw("a");
    r.kind = Some("status".to_string());
    r.timing.due_at = Some(123);
    r.timing.time_budget = Some(456);
    let msg = MessageFactory::new().create_message(r, 0).unwrap();
    assert_eq!(msg.timing.due_at, None);
    assert_eq!(msg.timing.time_budget, None);
}

#[test]
fn task_kind_keeps_due_timing() {
    let mut r = raw("a");
    r.kind = Some("task".to_string());
    r.timing.due_at = Some(123);
    let msg = MessageFactory::new().create_message(r, 0).unwrap();
    assert_eq!(msg.timing.due_at, Some(123));
}

#[test]
fn rejects_action_with_unknown_type() {
    let mut r = raw("a");
    r.actions = vec![RawAction { id: "x".into(), r#type: "explode".into(), payload: None }];
    assert!(MessageFactory::new().create_message(r, 0).is_err());
}

#[test]
fn rejects_duplicate_action_ids() {
    let mut r = raw("a");
    r.actions = vec![
        RawAction { id: "s1".into(), r#type: "ack".into(), payload: None },
        RawAction { id: "s1".into(), r#type: "close".into(), payload: None },
    ];
    assert!(MessageFactory::new().create_message(r, 0).is_err());
}

#[test]
fn normalizes_audience_route_to_and_channels() {
    let mut r = raw("a");
    r.audience.channels.include = vec![" Email ".to_string()];
    r.audience.channels.route_to = Some(vec!["Pushover".to_string(), "PUSHOVER".to_string()]);
    let msg = MessageFactory::new().create_message(r, 0).unwrap();
    assert_eq!(msg.audience.channels.include, vec!["email".to_string()]);
    assert_eq!(msg.audience.channels.route_to, Some(vec!["pushover".to_string()]));
}

#[test]
fn seeds_default_channel_when_include_and_route_to_are_both_empty() {
    let msg = MessageFactory::new().create_message(raw("a"), 0).unwrap();
    assert_eq!(msg.audience.channels.include, vec!["default".to_string()]);
}

#[test]
fn does_not_seed_default_channel_when_route_to_is_set() {
    let mut r = raw("a");
    r.audience.channels.route_to = Some(vec!["pushover".to_string()]);
    let msg = MessageFactory::new().create_message(r, 0).unwrap();
    assert!(msg.audience.channels.include.is_empty());
}

#[test]
fn rejects_attachment_with_empty_url() {
    let mut r = raw("a");
    r.attachments = vec![Attachment { id: "a1".into(), name: None, url: "  ".into(), content_type: None, size_bytes: None }];
    let err = MessageFactory::new().create_message(r, 0).unwrap_err();
    assert_eq!(err.kind, msghub_core::HubErrorKind::BadRequest);
}

#[test]
fn rejects_attachment_with_malformed_content_type() {
    let mut r = raw("a");
    r.attachments = vec![Attachment {
        id: "a1".into(),
        name: None,
        url: "https://example.com/x.png".into(),
        content_type: Some("not-a-mime-type".into()),
        size_bytes: None,
    }];
    assert!(MessageFactory::new().create_message(r, 0).is_err());
}

#[test]
fn rejects_attachment_with_zero_or_oversized_size_hint() {
    let mut r = raw("a");
    r.attachments = vec![Attachment {
        id: "a1".into(),
        name: None,
        url: "https://example.com/x.png".into(),
        content_type: Some("image/png".into()),
        size_bytes: Some(0),
    }];
    assert!(MessageFactory::new().create_message(r, 0).is_err());
}

#[test]
fn accepts_a_well_formed_attachment() {
    let mut r = raw("a");
    r.attachments = vec![Attachment {
        id: "a1".into(),
        name: Some("screenshot".into()),
        url: "https://example.com/x.png".into(),
        content_type: Some("image/png".into()),
        size_bytes: Some(1024),
    }];
    let msg = MessageFactory::new().create_message(r, 0).unwrap();
    assert_eq!(msg.attachments.len(), 1);
}

#[test]
fn stamps_initial_lifecycle_state_changed_at() {
    let msg = MessageFactory::new().create_message(raw("a"), 42).unwrap();
    assert_eq!(msg.lifecycle.state_changed_at, Some(42));
}
