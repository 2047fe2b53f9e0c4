//! Auto-detect the best available visibility platform.
//!
//! Priority: IntersectionObserver → Manual (fallback)

use std::rc::Rc;
use widget_core::ports::VisibilityPlatform;
use super::{IntersectionVisibility, ManualVisibility};

/// Pick the native observer when the host has one.
/// Returns a trait object so callers are platform-agnostic.
pub fn auto_detect_visibility() -> Rc<dyn VisibilityPlatform> {
    if IntersectionVisibility::is_supported() {
        log::info!("Visibility platform: IntersectionObserver");
        Rc::new(IntersectionVisibility)
    } else {
        log::warn!("IntersectionObserver unavailable, falling back to manual visibility");
        Rc::new(ManualVisibility::new())
    }
}
