//! Database models backing the repository layer.

pub mod client;
#[cfg(feature = "server")]
pub mod config;
pub mod invoice;
pub mod lead;
pub mod project;
pub mod setting;
