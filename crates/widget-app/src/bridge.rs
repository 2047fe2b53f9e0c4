//! Event bus bridge for page scripts.
//!
//! Exposes `subscribe`, `unsubscribe` and `publish` over the global bus.
//! Page scripts have no node handles, so every JS subscription is global.
//! A JS function is the handler identity: unsubscribing with the same
//! function object removes every registration made with it.

use std::cell::RefCell;

use gloo_utils::format::JsValueSerdeExt;
use js_sys::Function;
use serde_json::{json, Value};
use wasm_bindgen::prelude::*;
use widget_core::event_bus::{EventBus, Listener};
use widget_types::event::{BusEvent, EventDetail};
use widget_types::{Result, WidgetError};

struct JsSubscription {
    event_name: Option<String>,
    function: Function,
    listener: Listener,
}

thread_local! {
    static JS_SUBSCRIPTIONS: RefCell<Vec<JsSubscription>> = RefCell::new(Vec::new());
}

/// Register `handler` for `event_name`, or for every event when omitted.
/// The handler receives `{ type, detail, timestamp }`.
#[wasm_bindgen]
pub fn subscribe(event_name: Option<String>, handler: Function) {
    let function = handler.clone();
    let listener = Listener::new(move |event: &BusEvent| {
        let record = match JsValue::from_serde(&event_record(event)) {
            Ok(record) => record,
            Err(e) => {
                log::error!("Failed to convert event '{}': {}", event.event_type, e);
                return;
            }
        };
        if let Err(e) = function.call1(&JsValue::NULL, &record) {
            log::error!("JS listener for '{}' threw: {:?}", event.event_type, e);
        }
    });

    EventBus::global().subscribe(None, event_name.as_deref(), listener.clone());
    JS_SUBSCRIPTIONS.with(|subs| {
        subs.borrow_mut().push(JsSubscription {
            event_name,
            function: handler,
            listener,
        });
    });
}

/// Remove every registration of `handler` under `event_name`.
#[wasm_bindgen]
pub fn unsubscribe(event_name: Option<String>, handler: Function) {
    let removed: Vec<Listener> = JS_SUBSCRIPTIONS.with(|subs| {
        let mut subs = subs.borrow_mut();
        let mut removed = Vec::new();
        subs.retain(|sub| {
            let matches = sub.event_name == event_name && sub.function == handler;
            if matches {
                removed.push(sub.listener.clone());
            }
            !matches
        });
        removed
    });

    let bus = EventBus::global();
    for listener in &removed {
        bus.unsubscribe(None, event_name.as_deref(), listener);
    }
}

/// Publish `detail` under `event_name` on the global bus.
#[wasm_bindgen]
pub fn publish(event_name: &str, detail: JsValue) -> std::result::Result<(), JsValue> {
    let detail = detail_from_js(&detail).map_err(|e| JsValue::from_str(&e.to_string()))?;
    EventBus::global().publish(None, event_name, detail);
    Ok(())
}

#[wasm_bindgen(js_name = logListeners)]
pub fn log_listeners() {
    EventBus::global().log_listeners();
}

/// Number of live JS subscriptions made through this bridge.
pub fn js_subscription_count() -> usize {
    JS_SUBSCRIPTIONS.with(|subs| subs.borrow().len())
}

/// The event record page scripts receive.
pub fn event_record(event: &BusEvent) -> Value {
    json!({
        "type": event.event_type,
        "detail": event.detail.to_json(),
        "timestamp": event.timestamp.to_rfc3339(),
    })
}

fn detail_from_js(detail: &JsValue) -> Result<EventDetail> {
    if detail.is_undefined() || detail.is_null() {
        return Ok(EventDetail::Empty);
    }
    let value: Value = detail
        .into_serde()
        .map_err(|e| WidgetError::JsInterop(format!("unserializable event detail: {}", e)))?;
    Ok(EventDetail::from_json(value))
}
