use serde::{Deserialize, Serialize};

/// Top-level runtime configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub bus: BusConfig,
    pub visibility: VisibilityConfig,
    pub component: ComponentConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusConfig {
    /// Emit a debug log line for every published event
    pub trace_dispatch: bool,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            trace_dispatch: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisibilityConfig {
    /// Attribute holding the unique label of an observed node
    pub label_attribute: String,
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        Self {
            label_attribute: DEFAULT_LABEL_ATTRIBUTE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentConfig {
    /// State keys whose changes alone never trigger a re-render
    pub excluded_state_keys: Vec<String>,
    /// Prefix stripped from attribute names before they become state keys
    pub attribute_prefix: String,
    /// State key that marks a component as deferred when set to `"true"`
    pub defer_key: String,
}

impl Default for ComponentConfig {
    fn default() -> Self {
        Self {
            excluded_state_keys: Vec::new(),
            attribute_prefix: DEFAULT_ATTRIBUTE_PREFIX.to_string(),
            defer_key: DEFAULT_DEFER_KEY.to_string(),
        }
    }
}

impl ComponentConfig {
    pub fn excluding<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_state_keys = keys.into_iter().map(Into::into).collect();
        self
    }
}

pub const DEFAULT_LABEL_ATTRIBUTE: &str = "data-observer-label";
pub const DEFAULT_ATTRIBUTE_PREFIX: &str = "data-";
pub const DEFAULT_DEFER_KEY: &str = "defer";
