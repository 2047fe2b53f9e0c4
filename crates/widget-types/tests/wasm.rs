//! WASM-target tests for widget-types.
//!
//! Mirrors the native unit tests but runs under wasm32-unknown-unknown
//! via `wasm-pack test --node`.

use wasm_bindgen_test::*;

use widget_types::state::*;
use widget_types::event::*;
use widget_types::config::*;
use widget_types::device::*;
use serde_json::json;

// ─── State Tests ─────────────────────────────────────────

#[wasm_bindgen_test]
fn state_merge_and_diff() {
    let prev = StateSnapshot::new().merged(&StatePatch::new().with("currentInput", "0"));
    let next = prev.merged(&StatePatch::new().with("currentInput", "5"));
    assert_eq!(next.changed_keys(&prev), vec!["currentInput".to_string()]);
    assert_eq!(prev.get_str("currentInput"), Some("0"));
}

#[wasm_bindgen_test]
fn state_repeat_value_is_unchanged() {
    let prev = StateSnapshot::new().merged(&StatePatch::new().with("a", 1));
    let next = prev.merged(&StatePatch::new().with("a", 1));
    assert!(next.changed_keys(&prev).is_empty());
}

// ─── Event Tests ─────────────────────────────────────────

#[wasm_bindgen_test]
fn bus_event_timestamp_is_set() {
    // Utc::now() goes through js Date under wasmbind
    let event = BusEvent::new("calculator-result", EventDetail::message("42"));
    assert!(event.timestamp.timestamp() > 0);
}

#[wasm_bindgen_test]
fn event_detail_roundtrip_json() {
    let detail = EventDetail::from_json(json!({"message": "Buy milk"}));
    assert_eq!(detail.message_text(), Some("Buy milk"));
    assert_eq!(detail.to_json(), json!({"message": "Buy milk"}));
}

// ─── Config / Device Tests ───────────────────────────────

#[wasm_bindgen_test]
fn default_config_label_attribute() {
    assert_eq!(RuntimeConfig::default().visibility.label_attribute, DEFAULT_LABEL_ATTRIBUTE);
}

#[wasm_bindgen_test]
fn device_type_desktop_fallback() {
    assert_eq!(DeviceType::from_user_agent(""), DeviceType::Desktop);
}
