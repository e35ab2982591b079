//! Core module - fundamental types and utilities

pub mod config;
pub mod identity;
pub mod loader;
pub mod project;

pub use config::Config;
pub use identity::{EntityId, EntityPrefix, IdParseError};
pub use project::{Project, ProjectError};
