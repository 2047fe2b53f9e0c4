//! Headless host — in-memory nodes and scopes.
//!
//! Markup written to a scope is stored verbatim, not parsed. Queries run
//! against nodes appended with [`HeadlessScope::append`], matching simple
//! compound selectors such as `img`, `.logo`, `#result` or `img.logo`.

use std::any::Any;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use widget_core::ports::{HostNode, NodeHandle, RenderScope, RenderSurface};
use widget_types::Result;

pub struct HeadlessNode {
    tag: String,
    attributes: RefCell<BTreeMap<String, String>>,
}

impl HeadlessNode {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: RefCell::new(BTreeMap::new()),
        }
    }

    pub fn with_attribute(self, name: &str, value: &str) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn set_attribute(&self, name: &str, value: &str) {
        self.attributes
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
    }

    pub fn remove_attribute(&self, name: &str) -> Option<String> {
        self.attributes.borrow_mut().remove(name)
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn into_handle(self) -> NodeHandle {
        NodeHandle::new(self)
    }

    fn has_class(&self, class: &str) -> bool {
        self.attributes
            .borrow()
            .get("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    fn matches(&self, selector: &Selector) -> bool {
        selector.tag.as_deref().map_or(true, |tag| tag == "*" || tag == self.tag)
            && selector
                .id
                .as_deref()
                .map_or(true, |id| self.attributes.borrow().get("id").map(String::as_str) == Some(id))
            && selector.classes.iter().all(|c| self.has_class(c))
    }
}

impl HostNode for HeadlessNode {
    fn attribute(&self, name: &str) -> Option<String> {
        self.attributes.borrow().get(name).cloned()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn describe(&self) -> String {
        match self.attributes.borrow().get("id") {
            Some(id) => format!("<{}#{}>", self.tag, id),
            None => format!("<{}>", self.tag),
        }
    }
}

#[derive(Default)]
struct ScopeState {
    markup: String,
    renders: usize,
    children: Vec<NodeHandle>,
}

/// A render scope held in memory. Clones share the same scope.
#[derive(Clone, Default)]
pub struct HeadlessScope {
    state: Rc<RefCell<ScopeState>>,
}

impl HeadlessScope {
    pub fn markup(&self) -> String {
        self.state.borrow().markup.clone()
    }

    /// Number of `replace_content` calls so far.
    pub fn render_count(&self) -> usize {
        self.state.borrow().renders
    }

    /// Add a node that queries can find.
    pub fn append(&self, node: NodeHandle) {
        self.state.borrow_mut().children.push(node);
    }

    pub fn clear_children(&self) {
        self.state.borrow_mut().children.clear();
    }
}

impl RenderScope for HeadlessScope {
    fn replace_content(&self, markup: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.markup = markup.to_string();
        state.renders += 1;
        Ok(())
    }

    fn query_all(&self, selector: &str) -> Vec<NodeHandle> {
        let Some(selector) = Selector::parse(selector) else {
            log::warn!("Unsupported selector '{}'", selector);
            return Vec::new();
        };
        self.state
            .borrow()
            .children
            .iter()
            .filter(|node| {
                node.downcast_ref::<HeadlessNode>()
                    .is_some_and(|n| n.matches(&selector))
            })
            .cloned()
            .collect()
    }

    fn query_id(&self, id: &str) -> Option<NodeHandle> {
        self.query_all(&format!("#{}", id)).into_iter().next()
    }
}

/// Hands out one scope per host and remembers which is which.
#[derive(Clone, Default)]
pub struct HeadlessSurface {
    scopes: Rc<RefCell<Vec<(NodeHandle, HeadlessScope)>>>,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scope_for(&self, host: &NodeHandle) -> Option<HeadlessScope> {
        self.scopes
            .borrow()
            .iter()
            .find(|(h, _)| h == host)
            .map(|(_, scope)| scope.clone())
    }
}

impl RenderSurface for HeadlessSurface {
    fn attach_scope(&self, host: &NodeHandle) -> Result<Box<dyn RenderScope>> {
        if let Some(existing) = self.scope_for(host) {
            return Ok(Box::new(existing));
        }
        let scope = HeadlessScope::default();
        self.scopes.borrow_mut().push((host.clone(), scope.clone()));
        Ok(Box::new(scope))
    }
}

/// `tag`, `#id` and `.class` parts of one compound selector.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct Selector {
    pub(crate) tag: Option<String>,
    pub(crate) id: Option<String>,
    pub(crate) classes: Vec<String>,
}

impl Selector {
    pub(crate) fn parse(input: &str) -> Option<Selector> {
        let input = input.trim();
        if input.is_empty() || input.contains(|c: char| c.is_whitespace() || ",>+~[:".contains(c)) {
            return None;
        }

        let mut selector = Selector::default();
        let mut rest = input;
        let tag_end = rest.find(is_marker).unwrap_or(rest.len());
        if tag_end > 0 {
            selector.tag = Some(rest[..tag_end].to_ascii_lowercase());
        }
        rest = &rest[tag_end..];

        while let Some(marker) = rest.chars().next() {
            let body = &rest[1..];
            let end = body.find(is_marker).unwrap_or(body.len());
            let name = &body[..end];
            if name.is_empty() {
                return None;
            }
            match marker {
                '#' => selector.id = Some(name.to_string()),
                _ => selector.classes.push(name.to_string()),
            }
            rest = &body[end..];
        }
        Some(selector)
    }
}

fn is_marker(c: char) -> bool {
    c == '.' || c == '#'
}
