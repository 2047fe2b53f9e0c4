//! Process-wide publish/subscribe bus for cross-widget signaling.
//!
//! The bus is single-threaded (WASM constraint) and uses interior mutability
//! via RefCell. Delivery is synchronous: `publish` returns after every
//! matching listener has run.
//!
//! Listeners are keyed two ways:
//! - scoped: (node, event name), private to one node
//! - global: event name, or no name at all to hear every event
//!
//! One `publish` call delivers scoped listeners first, then global
//! listeners for that name, then global wildcard listeners. Each tier runs
//! in registration order.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;
use widget_types::config::BusConfig;
use widget_types::event::{BusEvent, EventDetail};
use crate::ports::NodeHandle;

/// A subscriber callback. Clones compare equal; separately created
/// listeners never do, even when wrapping the same function.
#[derive(Clone)]
pub struct Listener {
    callback: Rc<dyn Fn(&BusEvent)>,
}

impl Listener {
    pub fn new(callback: impl Fn(&BusEvent) + 'static) -> Self {
        Self {
            callback: Rc::new(callback),
        }
    }

    fn call(&self, event: &BusEvent) {
        (self.callback)(event)
    }

    fn addr(&self) -> *const () {
        Rc::as_ptr(&self.callback) as *const ()
    }
}

impl PartialEq for Listener {
    fn eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }
}

impl Eq for Listener {}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Listener({:p})", self.addr())
    }
}

type ByName = HashMap<String, Vec<Listener>>;

/// Node-scoped buckets. Nodes compare through `HostNode::same_as`, which
/// has no matching hash, so lookup is a linear scan.
#[derive(Default)]
struct ScopedListeners {
    nodes: Vec<(NodeHandle, ByName)>,
}

impl ScopedListeners {
    fn get(&self, node: &NodeHandle) -> Option<&ByName> {
        self.nodes.iter().find(|(n, _)| n == node).map(|(_, by_name)| by_name)
    }

    fn get_mut(&mut self, node: &NodeHandle) -> Option<&mut ByName> {
        self.nodes
            .iter_mut()
            .find(|(n, _)| n == node)
            .map(|(_, by_name)| by_name)
    }

    fn entry(&mut self, node: &NodeHandle) -> &mut ByName {
        let index = match self.nodes.iter().position(|(n, _)| n == node) {
            Some(index) => index,
            None => {
                self.nodes.push((node.clone(), ByName::new()));
                self.nodes.len() - 1
            }
        };
        &mut self.nodes[index].1
    }

    fn remove(&mut self, node: &NodeHandle) {
        self.nodes.retain(|(n, _)| n != node);
    }

    fn contains(&self, node: &NodeHandle) -> bool {
        self.get(node).is_some()
    }
}

#[derive(Default)]
struct Registry {
    scoped: ScopedListeners,
    /// `None` is the wildcard bucket
    global: HashMap<Option<String>, Vec<Listener>>,
    config: BusConfig,
}

thread_local! {
    static GLOBAL_BUS: EventBus = EventBus::new();
}

/// Shared event bus — clone-cheap via Rc.
#[derive(Clone)]
pub struct EventBus {
    inner: Rc<RefCell<Registry>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_config(BusConfig::default())
    }

    pub fn with_config(config: BusConfig) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Registry {
                config,
                ..Registry::default()
            })),
        }
    }

    /// The process-wide instance. Every call returns a handle to the same registry.
    pub fn global() -> Self {
        GLOBAL_BUS.with(Clone::clone)
    }

    pub fn set_config(&self, config: BusConfig) {
        self.inner.borrow_mut().config = config;
    }

    /// Register a listener.
    ///
    /// Without a node, the listener is global: bound to `event_name`, or to
    /// every event when `event_name` is `None`. With a node, an event name
    /// is required; a nameless scoped subscription is ignored with a warning.
    pub fn subscribe(&self, node: Option<&NodeHandle>, event_name: Option<&str>, listener: Listener) {
        let mut registry = self.inner.borrow_mut();
        match (node, event_name) {
            (None, name) => registry
                .global
                .entry(name.map(str::to_string))
                .or_default()
                .push(listener),
            (Some(node), Some(name)) => registry
                .scoped
                .entry(node)
                .entry(name.to_string())
                .or_default()
                .push(listener),
            (Some(node), None) => {
                log::warn!(
                    "Scoped subscription on {} requires an event name; ignored",
                    node.describe()
                );
            }
        }
    }

    /// Build an event and deliver it to every matching listener.
    ///
    /// Listeners registered or removed while this call runs take effect
    /// from the next publish. A panicking listener is logged and skipped.
    ///
    /// Panic containment needs unwinding, which `wasm32-unknown-unknown`
    /// does not have: there a panic aborts the module. Listeners that can
    /// fail in the browser should log and return instead of panicking.
    pub fn publish(&self, node: Option<&NodeHandle>, event_name: &str, detail: EventDetail) {
        let event = BusEvent::new(event_name, detail);
        let (listeners, trace) = {
            let registry = self.inner.borrow();
            (registry.matching(node, event_name), registry.config.trace_dispatch)
        };

        if trace {
            log::debug!(
                "Dispatching event: {} ({} listener(s))",
                event_name,
                listeners.len()
            );
        }

        for listener in &listeners {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| listener.call(&event)));
            if let Err(payload) = outcome {
                log::error!(
                    "Listener for '{}' panicked: {}",
                    event_name,
                    panic_message(payload.as_ref())
                );
            }
        }
    }

    /// Remove every registration equal to `listener` under the same key
    /// `subscribe` would have used. No-op when nothing matches.
    pub fn unsubscribe(&self, node: Option<&NodeHandle>, event_name: Option<&str>, listener: &Listener) {
        let mut registry = self.inner.borrow_mut();
        match (node, event_name) {
            (None, name) => {
                let key = name.map(str::to_string);
                if let Some(bucket) = registry.global.get_mut(&key) {
                    bucket.retain(|l| l != listener);
                    if bucket.is_empty() {
                        registry.global.remove(&key);
                    }
                }
            }
            (Some(node), Some(name)) => {
                if let Some(by_name) = registry.scoped.get_mut(node) {
                    if let Some(bucket) = by_name.get_mut(name) {
                        bucket.retain(|l| l != listener);
                        if bucket.is_empty() {
                            by_name.remove(name);
                        }
                    }
                    if by_name.is_empty() {
                        registry.scoped.remove(node);
                    }
                }
            }
            (Some(_), None) => {}
        }
    }

    /// Drop every scoped registration for `node`. Global listeners are untouched.
    pub fn clear(&self, node: &NodeHandle) {
        self.inner.borrow_mut().scoped.remove(node);
    }

    /// Drop every registration, scoped and global.
    pub fn clear_all(&self) {
        let mut registry = self.inner.borrow_mut();
        registry.scoped.nodes.clear();
        registry.global.clear();
    }

    /// Number of listeners registered under exactly this key.
    pub fn listener_count(&self, node: Option<&NodeHandle>, event_name: Option<&str>) -> usize {
        let registry = self.inner.borrow();
        match (node, event_name) {
            (None, name) => registry
                .global
                .get(&name.map(str::to_string))
                .map_or(0, Vec::len),
            (Some(node), Some(name)) => registry
                .scoped
                .get(node)
                .and_then(|by_name| by_name.get(name))
                .map_or(0, Vec::len),
            (Some(node), None) => registry
                .scoped
                .get(node)
                .map_or(0, |by_name| by_name.values().map(Vec::len).sum()),
        }
    }

    /// Whether `node` holds any scoped listener.
    pub fn has_listeners(&self, node: &NodeHandle) -> bool {
        self.inner.borrow().scoped.contains(node)
    }

    /// Dump the registry to the debug log.
    pub fn log_listeners(&self) {
        let registry = self.inner.borrow();
        log::debug!("Node-scoped listeners: {} node(s)", registry.scoped.nodes.len());
        for (node, by_name) in &registry.scoped.nodes {
            for (name, bucket) in by_name {
                log::debug!("  {} / {}: {}", node.describe(), name, bucket.len());
            }
        }
        log::debug!("Global listeners: {} key(s)", registry.global.len());
        for (name, bucket) in &registry.global {
            log::debug!("  {}: {}", name.as_deref().unwrap_or("*"), bucket.len());
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Snapshot of the listeners one publish reaches, in delivery order.
    fn matching(&self, node: Option<&NodeHandle>, event_name: &str) -> Vec<Listener> {
        let mut listeners = Vec::new();
        if let Some(bucket) = node
            .and_then(|node| self.scoped.get(node))
            .and_then(|by_name| by_name.get(event_name))
        {
            listeners.extend(bucket.iter().cloned());
        }
        if let Some(bucket) = self.global.get(&Some(event_name.to_string())) {
            listeners.extend(bucket.iter().cloned());
        }
        if let Some(bucket) = self.global.get(&None) {
            listeners.extend(bucket.iter().cloned());
        }
        listeners
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
