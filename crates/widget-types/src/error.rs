use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WidgetError {
    #[error("Node requires a {attribute} attribute to be {action}")]
    MissingLabel { attribute: String, action: String },

    #[error("Lifecycle error: cannot {operation} a component that is {state}")]
    Lifecycle { operation: String, state: String },

    #[error("Render error: {0}")]
    Render(String),

    #[error("Invalid state patch: {0}")]
    InvalidPatch(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Host capability unavailable: {0}")]
    Unavailable(String),

    #[error("JS interop error: {0}")]
    JsInterop(String),

    #[error("{0}")]
    Other(String),
}

impl WidgetError {
    pub fn missing_label(attribute: &str, action: &str) -> Self {
        WidgetError::MissingLabel {
            attribute: attribute.to_string(),
            action: action.to_string(),
        }
    }
}

impl From<serde_json::Error> for WidgetError {
    fn from(e: serde_json::Error) -> Self {
        WidgetError::Serialization(e.to_string())
    }
}
