pub mod state;
pub mod event;
pub mod config;
pub mod error;
pub mod visibility;
pub mod device;

#[cfg(test)]
mod tests;

pub use error::WidgetError;
pub type Result<T> = std::result::Result<T, WidgetError>;
