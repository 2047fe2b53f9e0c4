//! Widget App — WASM entry point.
//!
//! The composition root. It installs the logger and publishes the
//! process-wide event bus to page scripts through [`bridge`].

pub mod bridge;

use std::cell::RefCell;

use gloo_utils::format::JsValueSerdeExt;
use wasm_bindgen::prelude::*;
use widget_core::event_bus::EventBus;
use widget_platform::device::detect_device_type;
use widget_types::config::RuntimeConfig;
use widget_types::WidgetError;

thread_local! {
    static RUNTIME_CONFIG: RefCell<RuntimeConfig> = RefCell::new(RuntimeConfig::default());
}

/// WASM entry point — runs when the module is instantiated
#[wasm_bindgen(start)]
pub fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("Widget runtime starting on {}", detect_device_type().as_str());
}

/// Replace the runtime configuration. Bus settings apply immediately to
/// the global bus; the rest is read by widgets built afterwards.
#[wasm_bindgen]
pub fn configure(config: JsValue) -> Result<(), JsValue> {
    let config: RuntimeConfig = if config.is_undefined() || config.is_null() {
        RuntimeConfig::default()
    } else {
        config
            .into_serde()
            .map_err(|e| JsValue::from_str(&WidgetError::from(e).to_string()))?
    };
    apply_config(config);
    Ok(())
}

pub fn apply_config(config: RuntimeConfig) {
    EventBus::global().set_config(config.bus.clone());
    log::debug!("Runtime configuration updated: {:?}", config);
    RUNTIME_CONFIG.with(|current| *current.borrow_mut() = config);
}

pub fn runtime_config() -> RuntimeConfig {
    RUNTIME_CONFIG.with(|current| current.borrow().clone())
}

#[wasm_bindgen(js_name = deviceType)]
pub fn device_type() -> String {
    detect_device_type().as_str().to_string()
}

#[cfg(test)]
mod tests;
