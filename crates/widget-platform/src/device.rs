use widget_types::device::DeviceType;

/// Classify the running browser from `navigator.userAgent`.
/// Anything without a window counts as desktop.
pub fn detect_device_type() -> DeviceType {
    if !cfg!(target_arch = "wasm32") {
        return DeviceType::Desktop;
    }
    let user_agent = web_sys::window()
        .and_then(|w| w.navigator().user_agent().ok())
        .unwrap_or_default();
    DeviceType::from_user_agent(&user_agent)
}
