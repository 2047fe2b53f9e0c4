//! Host adapters for the widget runtime.
//!
//! - `dom`: shadow-root rendering scopes over `web-sys` elements
//! - `visibility`: `IntersectionObserver` and a manually driven fallback
//! - `attributes`: forwards attribute mutations into a component
//! - `headless`: an in-memory host for non-browser use
//! - `device`: user-agent classification

pub mod dom;
pub mod visibility;
pub mod attributes;
pub mod headless;
pub mod device;
