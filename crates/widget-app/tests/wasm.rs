//! WASM-target tests for widget-app (Node.js runtime).
//!
//! Drives the JS bridge with real JS functions under
//! wasm32-unknown-unknown via `wasm-pack test --node`.

use wasm_bindgen::prelude::*;
use wasm_bindgen_test::*;

use js_sys::{Function, Reflect};
use widget_app::bridge::{js_subscription_count, publish, subscribe, unsubscribe};
use widget_app::{configure, runtime_config};
use widget_core::event_bus::EventBus;

/// A JS function that appends each received event to `globalThis[slot]`.
fn collector(slot: &str) -> Function {
    Function::new_with_args(
        "event",
        &format!("(globalThis.{0} = globalThis.{0} || []).push(event);", slot),
    )
}

fn collected(slot: &str) -> js_sys::Array {
    Reflect::get(&js_sys::global(), &JsValue::from_str(slot))
        .ok()
        .filter(|v| !v.is_undefined())
        .map(|v| v.unchecked_into::<js_sys::Array>())
        .unwrap_or_else(js_sys::Array::new)
}

fn field(value: &JsValue, key: &str) -> JsValue {
    Reflect::get(value, &JsValue::from_str(key)).unwrap()
}

// ─── Bridge Tests ────────────────────────────────────────

#[wasm_bindgen_test]
fn bridge_delivers_event_record() {
    let handler = collector("__bridgeRecord");
    subscribe(Some("task-completed".to_string()), handler.clone());

    let detail = js_sys::Object::new();
    Reflect::set(&detail, &JsValue::from_str("message"), &JsValue::from_str("Buy milk")).unwrap();
    publish("task-completed", detail.into()).unwrap();
    publish("other", JsValue::NULL).unwrap();

    let events = collected("__bridgeRecord");
    assert_eq!(events.length(), 1);
    let event = events.get(0);
    assert_eq!(field(&event, "type").as_string().as_deref(), Some("task-completed"));
    assert_eq!(
        field(&field(&event, "detail"), "message").as_string().as_deref(),
        Some("Buy milk")
    );
    assert!(field(&event, "timestamp").as_string().is_some());

    unsubscribe(Some("task-completed".to_string()), handler);
}

#[wasm_bindgen_test]
fn bridge_wildcard_and_unsubscribe() {
    let handler = collector("__bridgeWildcard");
    subscribe(None, handler.clone());
    subscribe(None, handler.clone());
    let before = js_subscription_count();

    publish("a", JsValue::UNDEFINED).unwrap();
    assert_eq!(collected("__bridgeWildcard").length(), 2);

    unsubscribe(None, handler);
    assert_eq!(js_subscription_count(), before - 2);

    publish("b", JsValue::UNDEFINED).unwrap();
    assert_eq!(collected("__bridgeWildcard").length(), 2);
}

#[wasm_bindgen_test]
fn bridge_isolates_throwing_handler() {
    let failing = Function::new_no_args("throw new Error('boom');");
    let handler = collector("__bridgeIsolated");
    subscribe(Some("x".to_string()), failing.clone());
    subscribe(Some("x".to_string()), handler.clone());

    publish("x", JsValue::NULL).unwrap();
    assert_eq!(collected("__bridgeIsolated").length(), 1);

    unsubscribe(Some("x".to_string()), failing);
    unsubscribe(Some("x".to_string()), handler);
    assert_eq!(EventBus::global().listener_count(None, Some("x")), 0);
}

#[wasm_bindgen_test]
fn bridge_unsubscribe_other_function_is_noop() {
    let handler = collector("__bridgeKeep");
    subscribe(Some("keep".to_string()), handler.clone());
    unsubscribe(Some("keep".to_string()), collector("__bridgeKeep"));
    unsubscribe(None, handler.clone());

    publish("keep", JsValue::NULL).unwrap();
    assert_eq!(collected("__bridgeKeep").length(), 1);
    unsubscribe(Some("keep".to_string()), handler);
}

// ─── Configuration Tests ─────────────────────────────────

#[wasm_bindgen_test]
fn configure_from_js_object() {
    let config = js_sys::JSON::parse(r#"{"visibility":{"label_attribute":"data-lazy"}}"#).unwrap();
    configure(config).unwrap();
    assert_eq!(runtime_config().visibility.label_attribute, "data-lazy");
    assert!(runtime_config().bus.trace_dispatch);

    configure(JsValue::UNDEFINED).unwrap();
    assert_eq!(runtime_config().visibility.label_attribute, "data-observer-label");
}

#[wasm_bindgen_test]
fn configure_rejects_bad_shape() {
    let config = js_sys::JSON::parse(r#"{"bus":{"trace_dispatch":"yes"}}"#).unwrap();
    assert!(configure(config).is_err());
}
