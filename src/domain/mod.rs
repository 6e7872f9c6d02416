//! Domain aggregates exposed by the service layer.

pub mod client;
pub mod invoice;
pub mod lead;
pub mod project;
pub mod settings;
pub mod types;
