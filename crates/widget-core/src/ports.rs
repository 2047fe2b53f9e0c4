//! Port traits — the boundary between the runtime and its host.
//!
//! These traits are defined here in `widget-core` (pure Rust).
//! Implementations live in `widget-platform` (browser and headless adapters).
//! The core never imports platform code; it only depends on these traits.

use std::any::Any;
use std::fmt;
use std::rc::Rc;
use widget_types::Result;

// ─── Nodes ───────────────────────────────────────────────────

/// A renderable unit in the host's visual tree.
pub trait HostNode: Any {
    /// Read an attribute; `None` when absent.
    fn attribute(&self, name: &str) -> Option<String>;

    fn as_any(&self) -> &dyn Any;

    /// Whether `other` is the same host node. The default compares
    /// allocations; adapters that hand out several wrappers for one
    /// underlying node override it.
    fn same_as(&self, other: &dyn HostNode) -> bool {
        std::ptr::eq(
            self.as_any() as *const dyn Any as *const (),
            other.as_any() as *const dyn Any as *const (),
        )
    }

    /// Short human-readable description for log lines.
    fn describe(&self) -> String {
        "<node>".to_string()
    }
}

/// Shared handle to a host node. Equality goes through [`HostNode::same_as`].
#[derive(Clone)]
pub struct NodeHandle {
    node: Rc<dyn HostNode>,
}

impl NodeHandle {
    pub fn new<N: HostNode>(node: N) -> Self {
        Self {
            node: Rc::new(node),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.node.attribute(name)
    }

    pub fn downcast_ref<N: HostNode>(&self) -> Option<&N> {
        self.node.as_any().downcast_ref::<N>()
    }

    pub fn same_node(&self, other: &NodeHandle) -> bool {
        Rc::ptr_eq(&self.node, &other.node) || self.node.same_as(other.node.as_ref())
    }

    pub fn describe(&self) -> String {
        self.node.describe()
    }
}

impl PartialEq for NodeHandle {
    fn eq(&self, other: &Self) -> bool {
        self.same_node(other)
    }
}

impl Eq for NodeHandle {}

impl fmt::Debug for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NodeHandle").field(&self.describe()).finish()
    }
}

// ─── Render Surface Port ─────────────────────────────────────

pub trait RenderSurface {
    /// Create the isolated rendering scope attached to `host`.
    fn attach_scope(&self, host: &NodeHandle) -> Result<Box<dyn RenderScope>>;
}

/// An isolated subtree owned by one component.
pub trait RenderScope {
    /// Replace everything inside the scope with `markup`.
    fn replace_content(&self, markup: &str) -> Result<()>;

    /// All descendants matching a selector, in document order.
    fn query_all(&self, selector: &str) -> Vec<NodeHandle>;

    /// The descendant with the given id, if any.
    fn query_id(&self, id: &str) -> Option<NodeHandle>;
}

// ─── Visibility Port ─────────────────────────────────────────

/// Receives the nodes that transitioned into view.
pub type VisibilityReportFn = Rc<dyn Fn(&[NodeHandle])>;

pub trait VisibilityPlatform {
    /// Build an observation primitive. `None` when the host lacks the capability.
    fn create_observer(&self, on_visible: VisibilityReportFn) -> Option<Rc<dyn VisibilityObserver>>;
}

pub trait VisibilityObserver {
    fn observe(&self, node: &NodeHandle);
    fn unobserve(&self, node: &NodeHandle);
    fn disconnect(&self);
}
