#[cfg(test)]
mod tests {
    use crate::bridge::event_record;
    use crate::{apply_config, runtime_config};
    use widget_core::event_bus::EventBus;
    use widget_types::config::{BusConfig, RuntimeConfig, VisibilityConfig};
    use widget_types::event::{BusEvent, EventDetail};
    use serde_json::json;

    // ─── Event Record Tests ──────────────────────────────────

    #[test]
    fn test_event_record_shape() {
        let event = BusEvent::new("task-completed", EventDetail::message("Buy milk"));
        let record = event_record(&event);

        assert_eq!(record["type"], "task-completed");
        assert_eq!(record["detail"], json!({"message": "Buy milk"}));
        assert!(record["timestamp"].as_str().unwrap().contains('T'));
    }

    #[test]
    fn test_event_record_empty_detail() {
        let record = event_record(&BusEvent::new("ping", EventDetail::Empty));
        assert_eq!(record["detail"], json!({}));
    }

    #[test]
    fn test_event_record_fields_detail() {
        let detail = EventDetail::from_json(json!({"id": 7, "done": true}));
        let record = event_record(&BusEvent::new("task-updated", detail));
        assert_eq!(record["detail"]["id"], 7);
        assert_eq!(record["detail"]["done"], true);
    }

    // ─── Configuration Tests ─────────────────────────────────

    #[test]
    fn test_apply_config_updates_runtime_config() {
        let config = RuntimeConfig {
            bus: BusConfig { trace_dispatch: false },
            visibility: VisibilityConfig {
                label_attribute: "data-lazy-id".to_string(),
            },
            ..RuntimeConfig::default()
        };
        apply_config(config.clone());
        assert_eq!(runtime_config(), config);

        apply_config(RuntimeConfig::default());
        assert_eq!(runtime_config(), RuntimeConfig::default());
        EventBus::global().clear_all();
    }
}
