//! Manually driven visibility — the host decides when nodes are seen.
//!
//! Used off-browser and wherever no native observation exists. Call
//! [`ManualVisibility::reveal`] to report nodes as visible.
//!
//! The platform only holds weak references; an observer lives as long as
//! the registry that created it.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use widget_core::ports::{NodeHandle, VisibilityObserver, VisibilityPlatform, VisibilityReportFn};

#[derive(Default)]
pub struct ManualVisibility {
    unsupported: bool,
    observers: RefCell<Vec<Weak<ManualObserver>>>,
}

impl ManualVisibility {
    pub fn new() -> Self {
        Self::default()
    }

    /// A platform that reports the capability as absent.
    pub fn unsupported() -> Self {
        Self {
            unsupported: true,
            ..Self::default()
        }
    }

    /// Report `nodes` as visible to every live observer tracking them.
    /// Returns how many nodes were delivered.
    pub fn reveal(&self, nodes: &[NodeHandle]) -> usize {
        self.live().iter().map(|observer| observer.reveal(nodes)).sum()
    }

    /// Report every node any live observer is tracking.
    pub fn reveal_all(&self) -> usize {
        self.live()
            .iter()
            .map(|observer| {
                let tracked = observer.observed();
                observer.reveal(&tracked)
            })
            .sum()
    }

    /// Observers that are still referenced and not disconnected.
    pub fn live_observers(&self) -> usize {
        self.live().len()
    }

    pub fn latest(&self) -> Option<Rc<ManualObserver>> {
        self.observers.borrow().iter().rev().find_map(Weak::upgrade)
    }

    fn live(&self) -> Vec<Rc<ManualObserver>> {
        self.observers
            .borrow()
            .iter()
            .filter_map(Weak::upgrade)
            .filter(|observer| !observer.is_disconnected())
            .collect()
    }
}

impl VisibilityPlatform for ManualVisibility {
    fn create_observer(&self, on_visible: VisibilityReportFn) -> Option<Rc<dyn VisibilityObserver>> {
        if self.unsupported {
            return None;
        }
        let observer = Rc::new(ManualObserver {
            on_visible,
            observed: RefCell::new(Vec::new()),
            disconnected: Cell::new(false),
        });
        {
            let mut observers = self.observers.borrow_mut();
            observers.retain(|weak| weak.upgrade().is_some_and(|o| !o.is_disconnected()));
            observers.push(Rc::downgrade(&observer));
        }
        let observer: Rc<dyn VisibilityObserver> = observer;
        Some(observer)
    }
}

pub struct ManualObserver {
    on_visible: VisibilityReportFn,
    observed: RefCell<Vec<NodeHandle>>,
    disconnected: Cell<bool>,
}

impl ManualObserver {
    pub fn observed(&self) -> Vec<NodeHandle> {
        self.observed.borrow().clone()
    }

    pub fn is_observing(&self, node: &NodeHandle) -> bool {
        self.observed.borrow().contains(node)
    }

    pub fn is_disconnected(&self) -> bool {
        self.disconnected.get()
    }

    /// Deliver the subset of `nodes` this observer tracks.
    fn reveal(&self, nodes: &[NodeHandle]) -> usize {
        if self.disconnected.get() {
            return 0;
        }
        let tracked: Vec<NodeHandle> = nodes
            .iter()
            .filter(|n| self.is_observing(n))
            .cloned()
            .collect();
        if !tracked.is_empty() {
            (self.on_visible)(&tracked);
        }
        tracked.len()
    }
}

impl VisibilityObserver for ManualObserver {
    fn observe(&self, node: &NodeHandle) {
        if !self.is_observing(node) {
            self.observed.borrow_mut().push(node.clone());
        }
    }

    fn unobserve(&self, node: &NodeHandle) {
        self.observed.borrow_mut().retain(|n| n != node);
    }

    fn disconnect(&self) {
        self.observed.borrow_mut().clear();
        self.disconnected.set(true);
    }
}
