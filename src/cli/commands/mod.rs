//! CLI command implementations

pub mod asset;
pub mod catalog;
pub mod completions;
pub mod generate;
pub mod init;
pub mod validate;
