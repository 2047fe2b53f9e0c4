//! Attribute forwarding — `MutationObserver` in place of a custom
//! element's `attributeChangedCallback`.
//!
//! Mutation records arrive as a microtask after the attribute is set, not
//! inside the `setAttribute` call. A batch may therefore land while the
//! component is borrowed by other code; such an update is dropped and
//! logged with its values.

use std::cell::RefCell;
use std::rc::Rc;
use js_sys::Array;
use wasm_bindgen::prelude::*;
use web_sys::{Element, MutationObserver, MutationObserverInit, MutationRecord};

use widget_core::component::{Component, ComponentExt};
use widget_types::{Result, WidgetError};
use crate::dom::element_of;

/// Keeps a `MutationObserver` alive for as long as the watcher lives.
pub struct AttributeWatcher {
    observer: MutationObserver,
    _callback: Closure<dyn FnMut(Array, MutationObserver)>,
}

impl AttributeWatcher {
    /// Call `on_change(name, old, new)` whenever one of `attributes` changes on `element`.
    pub fn watch<F>(element: &Element, attributes: &[&str], on_change: F) -> Result<Self>
    where
        F: Fn(&str, Option<&str>, Option<&str>) + 'static,
    {
        let target = element.clone();
        let callback = Closure::wrap(Box::new(move |records: Array, _observer: MutationObserver| {
            for record in records.iter() {
                let Ok(record) = record.dyn_into::<MutationRecord>() else {
                    continue;
                };
                let Some(name) = record.attribute_name() else {
                    continue;
                };
                let old_value = record.old_value();
                let new_value = target.get_attribute(&name);
                on_change(&name, old_value.as_deref(), new_value.as_deref());
            }
        }) as Box<dyn FnMut(Array, MutationObserver)>);

        let observer = MutationObserver::new(callback.as_ref().unchecked_ref())
            .map_err(|e| WidgetError::JsInterop(format!("MutationObserver failed: {:?}", e)))?;

        let filter: Array = attributes.iter().map(|name| JsValue::from_str(name)).collect();
        let init = MutationObserverInit::new();
        init.set_attributes(true);
        init.set_attribute_old_value(true);
        init.set_attribute_filter(&filter);

        observer
            .observe_with_options(element, &init)
            .map_err(|e| WidgetError::JsInterop(format!("observe failed: {:?}", e)))?;

        Ok(Self {
            observer,
            _callback: callback,
        })
    }
}

impl Drop for AttributeWatcher {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

/// Feed the host element's observed attributes into `component`: current
/// values first, then every later change. Changes arriving while the
/// component is borrowed elsewhere are logged and dropped.
pub fn bind_attributes<C>(component: &Rc<RefCell<C>>) -> Result<AttributeWatcher>
where
    C: Component + 'static,
{
    let (element, names) = {
        let c = component.borrow();
        let host = c.base().host();
        let element = element_of(host).ok_or_else(|| {
            WidgetError::Unavailable(format!("{} is not a DOM element", host.describe()))
        })?;
        (element, c.observed_attributes().to_vec())
    };

    for name in &names {
        if let Some(value) = element.get_attribute(name) {
            component.borrow_mut().attribute_changed(name, None, Some(&value))?;
        }
    }

    let weak = Rc::downgrade(component);
    AttributeWatcher::watch(&element, &names, move |name, old, new| {
        let Some(component) = weak.upgrade() else {
            return;
        };
        let Ok(mut component) = component.try_borrow_mut() else {
            log::warn!(
                "Attribute {} changed ({:?} -> {:?}) while component busy; dropped",
                name,
                old,
                new
            );
            return;
        };
        if let Err(e) = component.attribute_changed(name, old, new) {
            log::warn!("Attribute {} update failed: {}", name, e);
        }
    })
}
