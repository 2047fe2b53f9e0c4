pub mod ports;
pub mod event_bus;
pub mod visibility;
pub mod attributes;
pub mod component;
