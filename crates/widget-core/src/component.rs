//! Component runtime base — lifecycle, state container and re-render gate.
//!
//! A widget owns a [`ComponentBase`] and implements [`Component`] to supply
//! its markup and hooks. The lifecycle and state operations come from
//! [`ComponentExt`], implemented for every `Component`:
//!
//! 1. `set_state` merges a patch into a fresh snapshot
//! 2. the changed keys are passed to `should_update`
//! 3. if allowed, the whole scope is re-rendered from `render`, then `on_updated` runs
//!
//! The base never tracks EventBus subscriptions. Widgets subscribe in
//! `on_mounted` and must unsubscribe in `on_unmounted` themselves.

use std::fmt;
use std::rc::Rc;
use serde_json::Value;
use widget_types::{
    Result, WidgetError,
    config::{ComponentConfig, VisibilityConfig},
    state::{StatePatch, StateSnapshot, StateValue},
    visibility::RegisterOptions,
};
use crate::attributes::attribute_state_key;
use crate::ports::{NodeHandle, RenderScope, RenderSurface, VisibilityPlatform};
use crate::visibility::{VisibilityCallback, VisibilityRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Constructed,
    Mounted,
    Unmounted,
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Lifecycle::Constructed => "constructed",
            Lifecycle::Mounted => "mounted",
            Lifecycle::Unmounted => "unmounted",
        };
        f.write_str(label)
    }
}

/// Per-instance runtime state shared by every widget.
pub struct ComponentBase {
    host: NodeHandle,
    scope: Box<dyn RenderScope>,
    state: StateSnapshot,
    required_keys: Vec<String>,
    config: ComponentConfig,
    lifecycle: Lifecycle,
    visibility_platform: Option<Rc<dyn VisibilityPlatform>>,
    visibility_config: VisibilityConfig,
    /// Created on the first `lazy_load`, dropped on unmount
    visibility: Option<VisibilityRegistry>,
}

impl ComponentBase {
    /// Attach an isolated rendering scope to `host` and start with empty state.
    pub fn new(host: NodeHandle, surface: &dyn RenderSurface, required_keys: &[&str]) -> Result<Self> {
        let scope = surface.attach_scope(&host)?;
        Ok(Self {
            host,
            scope,
            state: StateSnapshot::new(),
            required_keys: required_keys.iter().map(|k| k.to_string()).collect(),
            config: ComponentConfig::default(),
            lifecycle: Lifecycle::Constructed,
            visibility_platform: None,
            visibility_config: VisibilityConfig::default(),
            visibility: None,
        })
    }

    pub fn with_config(mut self, config: ComponentConfig) -> Self {
        self.config = config;
        self
    }

    /// Enable `lazy_load` through the host's visibility capability.
    pub fn with_visibility(mut self, platform: Rc<dyn VisibilityPlatform>, config: VisibilityConfig) -> Self {
        self.visibility_platform = Some(platform);
        self.visibility_config = config;
        self
    }

    pub fn host(&self) -> &NodeHandle {
        &self.host
    }

    pub fn state(&self) -> &StateSnapshot {
        &self.state
    }

    pub fn get_state(&self, key: &str) -> Option<&StateValue> {
        self.state.get(key)
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn config(&self) -> &ComponentConfig {
        &self.config
    }

    pub fn required_keys(&self) -> &[String] {
        &self.required_keys
    }

    /// Required keys not yet present in state. Advisory; nothing enforces it.
    pub fn missing_required_keys(&self) -> Vec<&str> {
        self.required_keys
            .iter()
            .filter(|k| !self.state.contains_key(k))
            .map(String::as_str)
            .collect()
    }

    pub fn set_excluded_state_keys<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.excluded_state_keys = keys.into_iter().map(Into::into).collect();
    }

    /// True when the defer key holds the string `"true"`.
    pub fn is_deferred(&self) -> bool {
        self.state.get_str(&self.config.defer_key) == Some("true")
    }

    pub fn query_id(&self, id: &str) -> Option<NodeHandle> {
        self.scope.query_id(id)
    }

    pub fn query_all(&self, selector: &str) -> Vec<NodeHandle> {
        self.scope.query_all(selector)
    }

    /// Skip the re-render when nothing changed or only excluded keys did.
    pub fn default_should_update(&self, changed_keys: &[String]) -> bool {
        !changed_keys.is_empty()
            && !changed_keys
                .iter()
                .all(|k| self.config.excluded_state_keys.contains(k))
    }

    pub fn visibility(&self) -> Option<&VisibilityRegistry> {
        self.visibility.as_ref()
    }

    /// Register every node matching `selector` in this scope for a one-shot
    /// visibility callback. Without a visibility capability the callback
    /// runs immediately for each node. Returns the number of matched nodes.
    pub fn lazy_load(&mut self, selector: &str, callback: VisibilityCallback, options: RegisterOptions) -> usize {
        let nodes = self.scope.query_all(selector);
        match self.ensure_visibility() {
            Some(registry) => {
                for node in &nodes {
                    registry.register(node, callback.clone(), options);
                }
            }
            None => {
                for node in &nodes {
                    callback(node);
                }
            }
        }
        nodes.len()
    }

    fn ensure_visibility(&mut self) -> Option<&VisibilityRegistry> {
        if self.visibility.is_none() {
            let platform = self.visibility_platform.clone()?;
            let registry = VisibilityRegistry::new(platform, &self.visibility_config);
            registry.init();
            self.visibility = Some(registry);
        }
        self.visibility.as_ref()
    }

    fn release_visibility(&mut self) {
        if let Some(registry) = self.visibility.take() {
            registry.disconnect();
        }
    }

    /// Merge and return the keys whose value changed.
    fn merge_state(&mut self, patch: &StatePatch) -> Vec<String> {
        let previous = std::mem::take(&mut self.state);
        self.state = previous.merged(patch);
        self.state.changed_keys(&previous)
    }

    fn replace_content(&self, markup: &str) -> Result<()> {
        self.scope.replace_content(markup)
    }
}

/// The widget contract: markup plus optional hooks.
pub trait Component {
    fn base(&self) -> &ComponentBase;
    fn base_mut(&mut self) -> &mut ComponentBase;

    /// Attributes whose changes the host should forward to `attribute_changed`.
    fn observed_attributes(&self) -> &[&'static str] {
        &[]
    }

    /// Markup for the current state. The default renders nothing.
    fn render(&self) -> String {
        String::new()
    }

    fn should_update(&self, changed_keys: &[String]) -> bool {
        self.base().default_should_update(changed_keys)
    }

    fn on_mounted(&mut self) {}

    fn on_unmounted(&mut self) {}

    fn on_updated(&mut self) {}
}

/// Lifecycle and state operations available on every [`Component`].
pub trait ComponentExt: Component {
    fn get_state(&self, key: &str) -> Option<&StateValue> {
        self.base().get_state(key)
    }

    /// Shallow-merge `patch` and re-render if `should_update` allows it.
    /// Returns whether a re-render happened.
    fn set_state(&mut self, patch: impl Into<StatePatch>) -> Result<bool> {
        let changed = self.base_mut().merge_state(&patch.into());
        if !self.should_update(&changed) {
            return Ok(false);
        }
        self.render_now()?;
        self.on_updated();
        Ok(true)
    }

    /// Re-render the whole scope from current state, bypassing the gate.
    fn render_now(&self) -> Result<()> {
        let markup = self.render();
        self.base().replace_content(&markup)
    }

    fn mount(&mut self) -> Result<()> {
        let current = self.base().lifecycle;
        if current != Lifecycle::Constructed {
            return Err(lifecycle_error("mount", current));
        }
        self.base_mut().lifecycle = Lifecycle::Mounted;
        self.on_mounted();
        Ok(())
    }

    /// Disconnect the owned visibility registry and run `on_unmounted`.
    fn unmount(&mut self) -> Result<()> {
        let current = self.base().lifecycle;
        if current != Lifecycle::Mounted {
            return Err(lifecycle_error("unmount", current));
        }
        self.base_mut().release_visibility();
        self.base_mut().lifecycle = Lifecycle::Unmounted;
        self.on_unmounted();
        Ok(())
    }

    /// Map an attribute change onto state. A removed attribute sets `null`.
    fn attribute_changed(&mut self, name: &str, old_value: Option<&str>, new_value: Option<&str>) -> Result<bool> {
        let key = attribute_state_key(name, &self.base().config.attribute_prefix);
        log::trace!("Attribute {} changed ({:?} -> {:?}) => {}", name, old_value, new_value, key);
        let value = new_value.map_or(Value::Null, |v| Value::String(v.to_string()));
        self.set_state(StatePatch::new().with(key, value))
    }

    fn lazy_load(&mut self, selector: &str, callback: VisibilityCallback, options: RegisterOptions) -> usize {
        self.base_mut().lazy_load(selector, callback, options)
    }
}

impl<T: Component + ?Sized> ComponentExt for T {}

fn lifecycle_error(operation: &str, state: Lifecycle) -> WidgetError {
    WidgetError::Lifecycle {
        operation: operation.to_string(),
        state: state.to_string(),
    }
}
