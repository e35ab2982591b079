//! Asset entity type - the maintained system and its component inventory

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

use crate::core::identity::{EntityId, EntityPrefix};
use crate::entities::component::{Component, ComponentPatch, Subsystem};
use crate::entities::environment::EnvironmentContext;

/// Business-impact ranking of an asset, A highest
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum,
)]
pub enum Criticality {
    #[value(name = "A")]
    A,
    #[value(name = "B")]
    B,
    #[value(name = "C")]
    C,
}

impl Default for Criticality {
    fn default() -> Self {
        Criticality::A
    }
}

impl std::fmt::Display for Criticality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Criticality::A => write!(f, "A"),
            Criticality::B => write!(f, "B"),
            Criticality::C => write!(f, "C"),
        }
    }
}

impl std::str::FromStr for Criticality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "A" => Ok(Criticality::A),
            "B" => Ok(Criticality::B),
            "C" => Ok(Criticality::C),
            _ => Err(format!("Invalid criticality: {}. Use A, B or C", s)),
        }
    }
}

/// Enabled subsystems of an asset
pub type SubsystemSet = BTreeSet<Subsystem>;

/// Asset type used when the requested one is unknown
pub const DEFAULT_ASSET_TYPE: &str = "Oven / Air House";

/// Known asset types and the subsystems they usually carry
pub const ASSET_TYPES: &[(&str, &[Subsystem])] = &[
    (
        DEFAULT_ASSET_TYPE,
        &[
            Subsystem::Control,
            Subsystem::Motors,
            Subsystem::Instrumentation,
            Subsystem::Process,
            Subsystem::Mechanical,
            Subsystem::Safety,
        ],
    ),
    (
        "PT/ED Pump",
        &[
            Subsystem::Control,
            Subsystem::DrivesMotion,
            Subsystem::Motors,
            Subsystem::Instrumentation,
            Subsystem::Mechanical,
            Subsystem::Pneumatic,
            Subsystem::Safety,
        ],
    ),
    (
        "Paint Robot",
        &[
            Subsystem::Control,
            Subsystem::DrivesMotion,
            Subsystem::Instrumentation,
            Subsystem::Pneumatic,
            Subsystem::Safety,
        ],
    ),
    (
        "OPF / IPF",
        &[
            Subsystem::Control,
            Subsystem::Instrumentation,
            Subsystem::Motors,
            Subsystem::Mechanical,
            Subsystem::Pneumatic,
            Subsystem::Safety,
        ],
    ),
    (
        "Trolley",
        &[
            Subsystem::Control,
            Subsystem::Motors,
            Subsystem::Instrumentation,
            Subsystem::Mechanical,
            Subsystem::Safety,
        ],
    ),
];

/// Default enabled subsystems for an asset type (case-insensitive).
///
/// Unknown types fall back to [`DEFAULT_ASSET_TYPE`].
pub fn default_subsystems(asset_type: &str) -> &'static [Subsystem] {
    let wanted = asset_type.trim();
    ASSET_TYPES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(wanted))
        .or_else(|| ASSET_TYPES.first())
        .map(|(_, subsystems)| *subsystems)
        .unwrap_or(&[])
}

/// Errors from editing an asset
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset name must not be empty")]
    EmptyName,

    #[error("no component matching '{0}' on asset {1}")]
    ComponentNotFound(String, EntityId),
}

/// An asset: a maintained system with context and components
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    /// Unique identifier
    pub id: EntityId,

    /// Asset / system name
    pub name: String,

    /// Plant area
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,

    /// Asset type, matched against the subsystem defaults table
    #[serde(rename = "type")]
    pub asset_type: String,

    /// Criticality tier
    #[serde(default)]
    pub criticality: Criticality,

    /// Environment and duty flags that hold for this asset
    #[serde(default, skip_serializing_if = "EnvironmentContext::is_empty")]
    pub environment: EnvironmentContext,

    /// Enabled subsystems
    #[serde(default)]
    pub subsystems: SubsystemSet,

    /// Component inventory, newest first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<Component>,

    /// Creation timestamp
    pub created: DateTime<Utc>,

    /// Author (who described this asset)
    pub author: String,
}

impl Asset {
    /// Create a new asset with the default subsystems of its type
    pub fn new(name: String, asset_type: String, criticality: Criticality, author: String) -> Self {
        let subsystems = default_subsystems(&asset_type).iter().copied().collect();
        Self {
            id: EntityId::new(EntityPrefix::Ast),
            name,
            area: None,
            asset_type,
            criticality,
            environment: EnvironmentContext::default(),
            subsystems,
            components: Vec::new(),
            created: Utc::now(),
            author,
        }
    }

    /// Check the fields a user can leave blank
    pub fn validate_name(name: &str) -> Result<(), AssetError> {
        if name.trim().is_empty() {
            Err(AssetError::EmptyName)
        } else {
            Ok(())
        }
    }

    /// Change the asset type, resetting enabled subsystems to its defaults
    pub fn set_asset_type(&mut self, asset_type: impl Into<String>) {
        self.asset_type = asset_type.into();
        self.subsystems = default_subsystems(&self.asset_type).iter().copied().collect();
    }

    pub fn is_enabled(&self, subsystem: Subsystem) -> bool {
        self.subsystems.contains(&subsystem)
    }

    /// Flip a subsystem on or off, returning the new state
    pub fn toggle_subsystem(&mut self, subsystem: Subsystem) -> bool {
        if self.subsystems.remove(&subsystem) {
            false
        } else {
            self.subsystems.insert(subsystem);
            true
        }
    }

    /// Add a component at the front of the inventory
    pub fn add_component(&mut self, component: Component) {
        self.components.insert(0, component);
    }

    /// Remove a component by ID or unique ID prefix
    pub fn remove_component(&mut self, id: &str) -> Result<Component, AssetError> {
        let idx = self.find_component(id)?;
        Ok(self.components.remove(idx))
    }

    /// Apply a patch to a component by ID or unique ID prefix
    pub fn update_component(&mut self, id: &str, patch: ComponentPatch) -> Result<(), AssetError> {
        let idx = self.find_component(id)?;
        patch.apply(&mut self.components[idx]);
        Ok(())
    }

    /// Locate a component by full ID or unique prefix
    fn find_component(&self, id: &str) -> Result<usize, AssetError> {
        let wanted = id.trim().to_uppercase();
        if let Some(idx) = self
            .components
            .iter()
            .position(|c| c.id.to_string() == wanted)
        {
            return Ok(idx);
        }
        let mut matches = self
            .components
            .iter()
            .enumerate()
            .filter(|(_, c)| c.id.to_string().starts_with(&wanted));
        match (matches.next(), matches.next()) {
            (Some((idx, _)), None) => Ok(idx),
            _ => Err(AssetError::ComponentNotFound(id.to_string(), self.id.clone())),
        }
    }
}
