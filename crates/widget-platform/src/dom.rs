//! DOM adapter — elements as host nodes, shadow roots as render scopes.

use std::any::Any;
use wasm_bindgen::JsCast;
use web_sys::{Element, NodeList, ShadowRoot, ShadowRootInit, ShadowRootMode};

use widget_core::ports::{HostNode, NodeHandle, RenderScope, RenderSurface};
use widget_types::{Result, WidgetError};

/// A browser element seen through the `HostNode` contract.
pub struct DomNode {
    element: Element,
}

impl DomNode {
    pub fn handle(element: Element) -> NodeHandle {
        NodeHandle::new(Self { element })
    }

    pub fn element(&self) -> &Element {
        &self.element
    }
}

impl HostNode for DomNode {
    fn attribute(&self, name: &str) -> Option<String> {
        self.element.get_attribute(name)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    /// Every query wraps the element afresh; identity is the element itself.
    fn same_as(&self, other: &dyn HostNode) -> bool {
        other
            .as_any()
            .downcast_ref::<DomNode>()
            .is_some_and(|o| o.element == self.element)
    }

    fn describe(&self) -> String {
        let tag = self.element.tag_name().to_lowercase();
        let id = self.element.id();
        if id.is_empty() {
            format!("<{}>", tag)
        } else {
            format!("<{}#{}>", tag, id)
        }
    }
}

/// The element behind a handle, when the handle wraps a DOM node.
pub fn element_of(node: &NodeHandle) -> Option<Element> {
    node.downcast_ref::<DomNode>().map(|n| n.element.clone())
}

/// Attaches an open (or closed) shadow root to each component host.
pub struct ShadowSurface {
    mode: ShadowRootMode,
}

impl ShadowSurface {
    pub fn open() -> Self {
        Self {
            mode: ShadowRootMode::Open,
        }
    }

    pub fn closed() -> Self {
        Self {
            mode: ShadowRootMode::Closed,
        }
    }
}

impl Default for ShadowSurface {
    fn default() -> Self {
        Self::open()
    }
}

impl RenderSurface for ShadowSurface {
    fn attach_scope(&self, host: &NodeHandle) -> Result<Box<dyn RenderScope>> {
        let element = element_of(host).ok_or_else(|| {
            WidgetError::Unavailable(format!("{} is not a DOM element", host.describe()))
        })?;

        // An element can carry only one shadow root; reuse an open one
        let root = match element.shadow_root() {
            Some(root) => root,
            None => {
                let init = ShadowRootInit::new(self.mode);
                element
                    .attach_shadow(&init)
                    .map_err(|e| WidgetError::JsInterop(format!("attachShadow failed: {:?}", e)))?
            }
        };
        Ok(Box::new(ShadowScope { root }))
    }
}

pub struct ShadowScope {
    root: ShadowRoot,
}

impl ShadowScope {
    pub fn root(&self) -> &ShadowRoot {
        &self.root
    }
}

impl RenderScope for ShadowScope {
    fn replace_content(&self, markup: &str) -> Result<()> {
        self.root.set_inner_html(markup);
        Ok(())
    }

    fn query_all(&self, selector: &str) -> Vec<NodeHandle> {
        match self.root.query_selector_all(selector) {
            Ok(list) => elements(&list),
            Err(e) => {
                log::warn!("Invalid selector '{}': {:?}", selector, e);
                Vec::new()
            }
        }
    }

    fn query_id(&self, id: &str) -> Option<NodeHandle> {
        self.root.get_element_by_id(id).map(DomNode::handle)
    }
}

fn elements(list: &NodeList) -> Vec<NodeHandle> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .map(DomNode::handle)
        .collect()
}
