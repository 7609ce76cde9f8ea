use serde_json::json;
use wirebind_core_types::{ActionKind, HttpMethod, RequestData, Selector};

use crate::defaults::default_settings;
use crate::errors::CascadeError;
use crate::model::{resolve, SettingsLayer};
use crate::provider::DefaultsProvider;

fn url_layer(url: &str) -> SettingsLayer {
    SettingsLayer {
        url: Some(url.to_string()),
        ..SettingsLayer::default()
    }
}

fn empty() -> SettingsLayer {
    SettingsLayer::default()
}

#[test]
fn defaults_match_vocabulary() {
    let settings = default_settings();
    assert_eq!(settings.event, "click");
    assert_eq!(settings.method, HttpMethod::Post);
    assert!(settings.url.is_empty());
    assert!(settings.smart_confirm);
    assert!(!settings.confirm_needed);
    assert_eq!(settings.confirm_message, "Are you sure?");
    assert_eq!(settings.smart_confirm_message, ": are you sure?");
    assert_eq!(settings.success_action, ActionKind::Alert);
    assert_eq!(settings.error_action, ActionKind::Alert);
    assert_eq!(settings.before_action, ActionKind::None);
    assert_eq!(settings.after_action, ActionKind::None);
}

#[test]
fn key_set_in_one_layer_survives_merge() {
    let defaults = default_settings();

    let resolved = resolve(&defaults, &url_layer("/a"), &empty(), &empty());
    assert_eq!(resolved.url, "/a");
    let resolved = resolve(&defaults, &empty(), &url_layer("/b"), &empty());
    assert_eq!(resolved.url, "/b");
    let resolved = resolve(&defaults, &empty(), &empty(), &url_layer("/c"));
    assert_eq!(resolved.url, "/c");
}

#[test]
fn later_layer_wins_for_every_pairing() {
    let defaults = default_settings();

    // overridden < instance
    let resolved = resolve(&defaults, &url_layer("/a"), &url_layer("/b"), &empty());
    assert_eq!(resolved.url, "/b");
    // overridden < metadata
    let resolved = resolve(&defaults, &url_layer("/a"), &empty(), &url_layer("/c"));
    assert_eq!(resolved.url, "/c");
    // instance < metadata
    let resolved = resolve(&defaults, &empty(), &url_layer("/b"), &url_layer("/c"));
    assert_eq!(resolved.url, "/c");
    // all three set: last wins
    let resolved = resolve(
        &defaults,
        &url_layer("/a"),
        &url_layer("/b"),
        &url_layer("/c"),
    );
    assert_eq!(resolved.url, "/c");
}

#[test]
fn unset_keys_fall_through_to_defaults() {
    let defaults = default_settings();
    let instance = SettingsLayer {
        confirm_needed: Some(true),
        ..SettingsLayer::default()
    };
    let resolved = resolve(&defaults, &empty(), &instance, &empty());
    assert!(resolved.confirm_needed);
    assert_eq!(resolved.event, "click");
    assert_eq!(resolved.success_action, ActionKind::Alert);
}

#[test]
fn metadata_record_parses_known_keys() {
    let metadata = json!({
        "event": "submit",
        "method": "GET",
        "confirm_needed": true,
        "success_action": "append",
        "success_item": "#list",
        "data": "#form1",
    });
    let layer = SettingsLayer::from_metadata(&metadata).unwrap();
    assert_eq!(layer.event.as_deref(), Some("submit"));
    assert_eq!(layer.method, Some(HttpMethod::Get));
    assert_eq!(layer.confirm_needed, Some(true));
    assert_eq!(layer.success_action, Some(ActionKind::Append));
    assert_eq!(layer.success_item, Some(Selector::new("#list")));
    assert_eq!(layer.data, Some(RequestData::Selector(Selector::new("#form1"))));
}

#[test]
fn metadata_data_variants() {
    let layer = SettingsLayer::from_metadata(&json!({ "data": null })).unwrap();
    assert_eq!(layer.data, Some(RequestData::None));

    let layer = SettingsLayer::from_metadata(&json!({ "data": {"id": 5} })).unwrap();
    assert_eq!(layer.data, Some(RequestData::Structured(json!({"id": 5}))));

    let err = SettingsLayer::from_metadata(&json!({ "data": 5 })).unwrap_err();
    assert!(matches!(err, CascadeError::InvalidValue { .. }));
}

#[test]
fn metadata_empty_data_string_means_no_data() {
    let layer = SettingsLayer::from_metadata(&json!({ "data": "" })).unwrap();
    assert_eq!(layer.data, Some(RequestData::None));
}

#[test]
fn metadata_unknown_keys_are_ignored() {
    let layer = SettingsLayer::from_metadata(&json!({ "unrelated": "x" })).unwrap();
    assert_eq!(layer, SettingsLayer::default());
}

#[test]
fn metadata_rejects_non_record() {
    let err = SettingsLayer::from_metadata(&json!("click")).unwrap_err();
    assert!(matches!(err, CascadeError::NotARecord));
}

#[test]
fn metadata_unknown_action_tag_becomes_a_no_op() {
    let layer = SettingsLayer::from_metadata(&json!({ "success_action": "explode" })).unwrap();
    assert_eq!(layer.success_action, Some(ActionKind::None));
}

#[test]
fn provider_overrides_merge_last_write_wins() {
    let provider = DefaultsProvider::new();
    provider.set_defaults(SettingsLayer {
        event: Some("submit".into()),
        method: Some(HttpMethod::Get),
        ..SettingsLayer::default()
    });
    provider.set_defaults(SettingsLayer {
        event: Some("dblclick".into()),
        ..SettingsLayer::default()
    });

    let snapshot = provider.snapshot();
    assert_eq!(snapshot.event, "dblclick");
    assert_eq!(snapshot.method, HttpMethod::Get);
}

#[test]
fn provider_snapshots_are_immutable_values() {
    let provider = DefaultsProvider::new();
    let before = provider.snapshot();
    provider.set_defaults(SettingsLayer {
        confirm_needed: Some(true),
        ..SettingsLayer::default()
    });
    assert!(!before.confirm_needed);
    assert!(provider.snapshot().confirm_needed);
}
