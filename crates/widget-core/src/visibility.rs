//! Visibility registry — one-shot callbacks fired when a node comes into view.
//!
//! Entries are keyed by the node's label attribute (`data-observer-label`
//! by default). A node may be registered before the observation primitive
//! exists; `init` starts observing everything already registered.
//!
//! When the host cannot observe visibility at all, the registry still
//! accepts registrations but never fires them.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};
use widget_types::config::VisibilityConfig;
use widget_types::visibility::RegisterOptions;
use widget_types::WidgetError;
use crate::ports::{NodeHandle, VisibilityObserver, VisibilityPlatform, VisibilityReportFn};

/// Invoked with the registered node once it becomes visible.
pub type VisibilityCallback = Rc<dyn Fn(&NodeHandle)>;

struct Entry {
    node: NodeHandle,
    callback: VisibilityCallback,
    cap: Option<u32>,
}

#[derive(Default)]
struct RegistryState {
    entries: BTreeMap<String, Entry>,
    observer: Option<Rc<dyn VisibilityObserver>>,
    /// Bumped on every disconnect so reports from a torn-down observer are ignored
    generation: u64,
}

pub struct VisibilityRegistry {
    state: Rc<RefCell<RegistryState>>,
    platform: Rc<dyn VisibilityPlatform>,
    label_attribute: Rc<str>,
}

impl VisibilityRegistry {
    /// Create an empty registry. Nothing is observed until `init`.
    pub fn new(platform: Rc<dyn VisibilityPlatform>, config: &VisibilityConfig) -> Self {
        Self {
            state: Rc::new(RefCell::new(RegistryState::default())),
            platform,
            label_attribute: Rc::from(config.label_attribute.as_str()),
        }
    }

    /// Create the observation primitive if the host supports it and none
    /// exists yet, then observe every node already registered. Idempotent.
    pub fn init(&self) {
        if self.state.borrow().observer.is_some() {
            return;
        }

        let generation = self.state.borrow().generation;
        let on_visible = report_handler(
            Rc::downgrade(&self.state),
            self.label_attribute.clone(),
            generation,
        );

        let Some(observer) = self.platform.create_observer(on_visible) else {
            log::debug!("Visibility observation unavailable; registrations will not fire");
            return;
        };

        let pending: Vec<NodeHandle> = {
            let mut state = self.state.borrow_mut();
            state.observer = Some(observer.clone());
            state.entries.values().map(|e| e.node.clone()).collect()
        };
        for node in &pending {
            observer.observe(node);
        }
        log::debug!("Visibility observer ready, {} pending node(s)", pending.len());
    }

    /// Track `node` and run `callback` once it becomes visible.
    ///
    /// The node must carry a label. An existing entry under the same label
    /// is replaced unless `options.no_overwrite` is set, in which case this
    /// call does nothing.
    pub fn register(&self, node: &NodeHandle, callback: VisibilityCallback, options: RegisterOptions) {
        let Some(label) = self.label_of(node, "observed") else {
            return;
        };

        let (observer, replaced) = {
            let mut state = self.state.borrow_mut();
            if options.no_overwrite && state.entries.contains_key(&label) {
                log::debug!("Label '{}' already registered; keeping existing entry", label);
                return;
            }
            let replaced = state.entries.insert(
                label,
                Entry {
                    node: node.clone(),
                    callback,
                    cap: options.cap,
                },
            );
            (state.observer.clone(), replaced.map(|e| e.node))
        };

        if let Some(observer) = observer {
            if let Some(old) = replaced.filter(|old| !old.same_node(node)) {
                observer.unobserve(&old);
            }
            observer.observe(node);
        }
    }

    /// Stop tracking `node`. No-op when its label is not registered.
    pub fn unregister(&self, node: &NodeHandle) {
        let Some(label) = self.label_of(node, "un-registered") else {
            return;
        };

        let (observer, removed) = {
            let mut state = self.state.borrow_mut();
            (state.observer.clone(), state.entries.remove(&label))
        };
        if let (Some(observer), Some(entry)) = (observer, removed) {
            observer.unobserve(&entry.node);
        }
    }

    /// Tear down the observation primitive and discard every entry.
    pub fn disconnect(&self) {
        let observer = {
            let mut state = self.state.borrow_mut();
            state.entries.clear();
            state.generation += 1;
            state.observer.take()
        };
        if let Some(observer) = observer {
            observer.disconnect();
        }
    }

    /// `disconnect` followed by `init`.
    pub fn reconnect(&self) {
        self.disconnect();
        self.init();
    }

    pub fn contains(&self, label: &str) -> bool {
        self.state.borrow().entries.contains_key(label)
    }

    /// The advisory cap the entry was registered with.
    pub fn cap(&self, label: &str) -> Option<u32> {
        self.state.borrow().entries.get(label).and_then(|e| e.cap)
    }

    pub fn len(&self) -> usize {
        self.state.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.borrow().entries.is_empty()
    }

    /// Whether a live observation primitive exists.
    pub fn is_observing(&self) -> bool {
        self.state.borrow().observer.is_some()
    }

    pub fn label_attribute(&self) -> &str {
        &self.label_attribute
    }

    fn label_of(&self, node: &NodeHandle, action: &str) -> Option<String> {
        match node.attribute(&self.label_attribute) {
            Some(label) if !label.is_empty() => Some(label),
            _ => {
                log::warn!("{}", WidgetError::missing_label(&self.label_attribute, action));
                None
            }
        }
    }
}

fn report_handler(
    state: Weak<RefCell<RegistryState>>,
    label_attribute: Rc<str>,
    generation: u64,
) -> VisibilityReportFn {
    Rc::new(move |nodes: &[NodeHandle]| {
        let Some(state) = state.upgrade() else {
            return;
        };
        for node in nodes {
            let Some(label) = node.attribute(&label_attribute) else {
                continue;
            };

            // Take the entry out before running anything so a node reported
            // twice only fires once.
            let (entry, observer) = {
                let mut state = state.borrow_mut();
                if state.generation != generation {
                    return;
                }
                (state.entries.remove(&label), state.observer.clone())
            };
            let Some(entry) = entry else {
                log::trace!("No visibility entry for '{}'; report dropped", label);
                continue;
            };

            if let Some(observer) = observer {
                observer.unobserve(&entry.node);
            }
            (entry.callback)(&entry.node);
        }
    })
}
