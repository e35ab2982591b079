//! Entity type definitions
//!
//! PMC works with the following entity types:
//!
//! - [`Asset`] - A maintained system: criticality, context flags, enabled
//!   subsystems and its component inventory
//! - [`Component`] - A physical item on an asset, keyed by [`ComponentType`]
//! - [`PmTask`] - A generated preventive-maintenance task

pub mod asset;
pub mod component;
pub mod environment;
pub mod task;

pub use asset::{default_subsystems, Asset, AssetError, Criticality, SubsystemSet};
pub use component::{Component, ComponentAttributes, ComponentPatch, ComponentType, Subsystem};
pub use environment::{EnvFlag, EnvironmentContext};
pub use task::{Frequency, Method, PmTask, Role};
