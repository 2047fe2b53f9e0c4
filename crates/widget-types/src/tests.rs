#[cfg(test)]
mod tests {
    use crate::state::*;
    use crate::event::*;
    use crate::config::*;
    use crate::visibility::*;
    use crate::device::*;
    use crate::error::*;
    use serde_json::json;

    // ─── State Tests ─────────────────────────────────────────

    #[test]
    fn test_snapshot_new_is_empty() {
        let state = StateSnapshot::new();
        assert!(state.is_empty());
        assert!(state.get("anything").is_none());
    }

    #[test]
    fn test_merged_leaves_previous_untouched() {
        let before = StateSnapshot::new().merged(&StatePatch::new().with("a", 1));
        let after = before.merged(&StatePatch::new().with("b", "two"));

        assert_eq!(before.len(), 1);
        assert!(before.get("b").is_none());
        assert_eq!(after.get("a"), Some(&json!(1)));
        assert_eq!(after.get_str("b"), Some("two"));
        assert!(!before.ptr_eq(&after));
    }

    #[test]
    fn test_merged_overwrites_existing_key() {
        let state = StateSnapshot::new()
            .merged(&StatePatch::new().with("currentInput", "0"))
            .merged(&StatePatch::new().with("currentInput", "5"));
        assert_eq!(state.get_str("currentInput"), Some("5"));
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn test_changed_keys_includes_new_and_modified() {
        let prev = StateSnapshot::new().merged(&StatePatch::new().with("a", 1).with("b", 2));
        let next = prev.merged(&StatePatch::new().with("b", 3).with("c", 4));
        assert_eq!(next.changed_keys(&prev), vec!["b".to_string(), "c".to_string()]);
    }

    #[test]
    fn test_changed_keys_ignores_equal_values() {
        let prev = StateSnapshot::new().merged(&StatePatch::new().with("a", 1));
        let next = prev.merged(&StatePatch::new().with("a", 1));
        assert!(next.changed_keys(&prev).is_empty());
    }

    #[test]
    fn test_changed_keys_compares_nested_values() {
        let prev = StateSnapshot::new().merged(&StatePatch::new().with("tasks", json!({"todo": []})));
        let next = prev.merged(&StatePatch::new().with("tasks", json!({"todo": ["milk"]})));
        assert_eq!(next.changed_keys(&prev), vec!["tasks".to_string()]);
    }

    #[test]
    fn test_empty_patch_changes_nothing() {
        let prev = StateSnapshot::new().merged(&StatePatch::new().with("a", 1));
        let next = prev.merged(&StatePatch::new());
        assert!(next.changed_keys(&prev).is_empty());
        assert_eq!(next, prev);
    }

    #[test]
    fn test_patch_from_json_object() {
        let patch = StatePatch::from_json(json!({"operator": null, "resetNext": true})).unwrap();
        assert_eq!(patch.len(), 2);
        assert_eq!(patch.get("operator"), Some(&json!(null)));
    }

    #[test]
    fn test_patch_from_json_rejects_non_object() {
        let err = StatePatch::from_json(json!([1, 2])).unwrap_err();
        assert!(matches!(err, WidgetError::InvalidPatch(_)));
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn test_patch_from_iter() {
        let patch: StatePatch = vec![("a", 1), ("b", 2)].into_iter().collect();
        assert_eq!(patch.len(), 2);
        let keys: Vec<&str> = patch.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn test_snapshot_to_json() {
        let state = StateSnapshot::new().merged(&StatePatch::new().with("x", "y"));
        assert_eq!(state.to_json(), json!({"x": "y"}));
    }

    // ─── Event Tests ─────────────────────────────────────────

    #[test]
    fn test_bus_event_new() {
        let event = BusEvent::new("task-completed", EventDetail::message("Buy milk"));
        assert_eq!(event.event_type, "task-completed");
        assert_eq!(event.detail.message_text(), Some("Buy milk"));
    }

    #[test]
    fn test_event_detail_from_json_classification() {
        assert_eq!(EventDetail::from_json(json!({})), EventDetail::Empty);
        assert_eq!(EventDetail::from_json(json!(null)), EventDetail::Empty);
        assert_eq!(
            EventDetail::from_json(json!({"message": "hi"})),
            EventDetail::message("hi")
        );
        let fields = EventDetail::from_json(json!({"message": "hi", "id": 3}));
        assert!(matches!(fields, EventDetail::Fields(_)));
        assert_eq!(fields.message_text(), Some("hi"));
        assert_eq!(fields.field("id"), Some(&json!(3)));
    }

    #[test]
    fn test_event_detail_scalar_wrapped() {
        let detail = EventDetail::from_json(json!(42));
        assert_eq!(detail.field("value"), Some(&json!(42)));
    }

    #[test]
    fn test_event_detail_to_json() {
        assert_eq!(EventDetail::Empty.to_json(), json!({}));
        assert_eq!(EventDetail::message("m").to_json(), json!({"message": "m"}));
    }

    #[test]
    fn test_event_detail_serialization_tagged() {
        let json = serde_json::to_value(EventDetail::message("done")).unwrap();
        assert_eq!(json, json!({"kind": "message", "data": {"message": "done"}}));
        let back: EventDetail = serde_json::from_value(json).unwrap();
        assert_eq!(back, EventDetail::message("done"));
    }

    // ─── Config Tests ────────────────────────────────────────

    #[test]
    fn test_default_config() {
        let config = RuntimeConfig::default();
        assert!(config.bus.trace_dispatch);
        assert_eq!(config.visibility.label_attribute, "data-observer-label");
        assert!(config.component.excluded_state_keys.is_empty());
        assert_eq!(config.component.attribute_prefix, "data-");
        assert_eq!(config.component.defer_key, "defer");
    }

    #[test]
    fn test_config_partial_deserialization() {
        let config: RuntimeConfig =
            serde_json::from_str(r#"{"component": {"excluded_state_keys": ["draggingTask"]}}"#).unwrap();
        assert_eq!(config.component.excluded_state_keys, vec!["draggingTask"]);
        assert_eq!(config.component.attribute_prefix, "data-");
        assert!(config.bus.trace_dispatch);
    }

    #[test]
    fn test_component_config_excluding() {
        let config = ComponentConfig::default().excluding(["cursor"]);
        assert_eq!(config.excluded_state_keys, vec!["cursor".to_string()]);
    }

    // ─── Visibility Option Tests ─────────────────────────────

    #[test]
    fn test_register_options_default() {
        let opts = RegisterOptions::default();
        assert!(!opts.no_overwrite);
        assert!(opts.cap.is_none());
    }

    #[test]
    fn test_register_options_builders() {
        let opts = RegisterOptions::no_overwrite().with_cap(3);
        assert!(opts.no_overwrite);
        assert_eq!(opts.cap, Some(3));
        let json = serde_json::to_string(&RegisterOptions::default()).unwrap();
        assert!(!json.contains("cap"));
    }

    // ─── Device Tests ────────────────────────────────────────

    #[test]
    fn test_device_type_from_user_agent() {
        assert_eq!(
            DeviceType::from_user_agent("Mozilla/5.0 (Linux; Android 14; Pixel 8)"),
            DeviceType::Android
        );
        assert_eq!(
            DeviceType::from_user_agent("Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)"),
            DeviceType::Ios
        );
        assert_eq!(
            DeviceType::from_user_agent("Mozilla/5.0 (X11; Linux x86_64)"),
            DeviceType::Desktop
        );
        assert_eq!(DeviceType::Ios.as_str(), "ios");
    }

    // ─── Error Tests ─────────────────────────────────────────

    #[test]
    fn test_error_display() {
        let err = WidgetError::missing_label("data-observer-label", "observed");
        assert_eq!(
            err.to_string(),
            "Node requires a data-observer-label attribute to be observed"
        );
        let err = WidgetError::Lifecycle {
            operation: "mount".to_string(),
            state: "unmounted".to_string(),
        };
        assert_eq!(err.to_string(), "Lifecycle error: cannot mount a component that is unmounted");
    }

    #[test]
    fn test_error_from_serde() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{{");
        let err: WidgetError = parse.unwrap_err().into();
        assert!(matches!(err, WidgetError::Serialization(_)));
    }
}
