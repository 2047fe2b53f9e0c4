//! `IntersectionObserver` visibility adapter.
//!
//! Each observer owns the JS closure it reports through; dropping the
//! observer disconnects it and releases the closure.

use std::rc::Rc;
use js_sys::Array;
use wasm_bindgen::prelude::*;
use web_sys::{IntersectionObserver, IntersectionObserverEntry};

use widget_core::ports::{NodeHandle, VisibilityObserver, VisibilityPlatform, VisibilityReportFn};
use crate::dom::{element_of, DomNode};

pub struct IntersectionVisibility;

impl IntersectionVisibility {
    /// Whether the current global scope exposes `IntersectionObserver`.
    pub fn is_supported() -> bool {
        if !cfg!(target_arch = "wasm32") {
            return false;
        }
        let global = js_sys::global();
        js_sys::Reflect::has(&global, &JsValue::from_str("IntersectionObserver")).unwrap_or(false)
    }
}

impl VisibilityPlatform for IntersectionVisibility {
    fn create_observer(&self, on_visible: VisibilityReportFn) -> Option<Rc<dyn VisibilityObserver>> {
        if !Self::is_supported() {
            return None;
        }

        let callback = Closure::wrap(Box::new(move |entries: Array, _observer: JsValue| {
            let visible: Vec<NodeHandle> = entries
                .iter()
                .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
                .filter(|entry| entry.is_intersecting())
                .map(|entry| DomNode::handle(entry.target()))
                .collect();
            if !visible.is_empty() {
                on_visible(&visible);
            }
        }) as Box<dyn FnMut(Array, JsValue)>);

        match IntersectionObserver::new(callback.as_ref().unchecked_ref()) {
            Ok(observer) => {
                let observer: Rc<dyn VisibilityObserver> = Rc::new(DomIntersectionObserver {
                    observer,
                    _callback: callback,
                });
                Some(observer)
            }
            Err(e) => {
                log::warn!("IntersectionObserver construction failed: {:?}", e);
                None
            }
        }
    }
}

struct DomIntersectionObserver {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(Array, JsValue)>,
}

impl VisibilityObserver for DomIntersectionObserver {
    fn observe(&self, node: &NodeHandle) {
        match element_of(node) {
            Some(element) => self.observer.observe(&element),
            None => log::warn!("Cannot observe {}: not a DOM element", node.describe()),
        }
    }

    fn unobserve(&self, node: &NodeHandle) {
        if let Some(element) = element_of(node) {
            self.observer.unobserve(&element);
        }
    }

    fn disconnect(&self) {
        self.observer.disconnect();
    }
}

impl Drop for DomIntersectionObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}
