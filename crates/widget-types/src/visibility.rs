use serde::{Deserialize, Serialize};

/// Options accepted when registering a node for a visibility callback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterOptions {
    /// Keep an existing entry under the same label instead of replacing it
    #[serde(default)]
    pub no_overwrite: bool,
    /// Advisory limit carried with the entry; the registry does not act on it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cap: Option<u32>,
}

impl RegisterOptions {
    pub fn no_overwrite() -> Self {
        Self {
            no_overwrite: true,
            cap: None,
        }
    }

    pub fn with_cap(mut self, cap: u32) -> Self {
        self.cap = Some(cap);
        self
    }
}
