//! Component entity type - physical items installed on an asset

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::core::identity::{EntityId, EntityPrefix};

/// Functional subsystem a component belongs to
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Subsystem {
    Control,
    DrivesMotion,
    Motors,
    Instrumentation,
    Mechanical,
    Pneumatic,
    Process,
    Safety,
}

impl Subsystem {
    pub fn all() -> &'static [Subsystem] {
        &[
            Subsystem::Control,
            Subsystem::DrivesMotion,
            Subsystem::Motors,
            Subsystem::Instrumentation,
            Subsystem::Mechanical,
            Subsystem::Pneumatic,
            Subsystem::Process,
            Subsystem::Safety,
        ]
    }
}

impl std::fmt::Display for Subsystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Subsystem::Control => write!(f, "Control"),
            Subsystem::DrivesMotion => write!(f, "Drives / Motion"),
            Subsystem::Motors => write!(f, "Motors"),
            Subsystem::Instrumentation => write!(f, "Instrumentation"),
            Subsystem::Mechanical => write!(f, "Mechanical"),
            Subsystem::Pneumatic => write!(f, "Pneumatic"),
            Subsystem::Process => write!(f, "Process"),
            Subsystem::Safety => write!(f, "Safety"),
        }
    }
}

/// Component type - the key into the rule catalog
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentType {
    Plc,
    IoModule,
    Hmi,
    Vfd,
    Motor,
    InductiveSensor,
    PhotoEye,
    LimitSwitch,
    PressureGauge,
    Bearing,
    Gearbox,
    AirFilter,
    SolenoidValve,
    PneumaticCylinder,
    GasBurner,
}

impl ComponentType {
    pub fn all() -> &'static [ComponentType] {
        &[
            ComponentType::Plc,
            ComponentType::IoModule,
            ComponentType::Hmi,
            ComponentType::Vfd,
            ComponentType::Motor,
            ComponentType::InductiveSensor,
            ComponentType::PhotoEye,
            ComponentType::LimitSwitch,
            ComponentType::PressureGauge,
            ComponentType::Bearing,
            ComponentType::Gearbox,
            ComponentType::AirFilter,
            ComponentType::SolenoidValve,
            ComponentType::PneumaticCylinder,
            ComponentType::GasBurner,
        ]
    }

    /// Subsystem proposed when the type is quick-added
    pub fn default_subsystem(self) -> Subsystem {
        match self {
            ComponentType::Plc | ComponentType::IoModule | ComponentType::Hmi => {
                Subsystem::Control
            }
            ComponentType::Vfd => Subsystem::DrivesMotion,
            ComponentType::Motor => Subsystem::Motors,
            ComponentType::InductiveSensor
            | ComponentType::PhotoEye
            | ComponentType::LimitSwitch
            | ComponentType::PressureGauge => Subsystem::Instrumentation,
            ComponentType::Bearing | ComponentType::Gearbox => Subsystem::Mechanical,
            ComponentType::AirFilter | ComponentType::GasBurner => Subsystem::Process,
            ComponentType::SolenoidValve | ComponentType::PneumaticCylinder => {
                Subsystem::Pneumatic
            }
        }
    }
}

impl std::fmt::Display for ComponentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComponentType::Plc => write!(f, "PLC"),
            ComponentType::IoModule => write!(f, "I/O Module"),
            ComponentType::Hmi => write!(f, "HMI"),
            ComponentType::Vfd => write!(f, "VFD"),
            ComponentType::Motor => write!(f, "Motor"),
            ComponentType::InductiveSensor => write!(f, "Inductive Sensor"),
            ComponentType::PhotoEye => write!(f, "Photo Eye"),
            ComponentType::LimitSwitch => write!(f, "Limit Switch"),
            ComponentType::PressureGauge => write!(f, "Pressure / ΔP Gauge"),
            ComponentType::Bearing => write!(f, "Bearing"),
            ComponentType::Gearbox => write!(f, "Gearbox"),
            ComponentType::AirFilter => write!(f, "Air Filter"),
            ComponentType::SolenoidValve => write!(f, "Solenoid Valve"),
            ComponentType::PneumaticCylinder => write!(f, "Pneumatic Cylinder"),
            ComponentType::GasBurner => write!(f, "Gas Burner"),
        }
    }
}

/// Type-specific attributes that can switch on extra catalog templates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentAttributes {
    /// Drive runs with encoder or other speed/position feedback
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub closed_loop: bool,

    /// Nameplate power in kW
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rated_power_kw: Option<f64>,
}

impl ComponentAttributes {
    pub fn is_empty(&self) -> bool {
        !self.closed_loop && self.rated_power_kw.is_none()
    }
}

/// A component installed on an asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// Unique identifier
    pub id: EntityId,

    /// Subsystem this component belongs to
    pub subsystem: Subsystem,

    /// Component type
    #[serde(rename = "type")]
    pub component_type: ComponentType,

    /// Installed quantity (informational, does not multiply tasks)
    #[serde(default = "default_qty")]
    pub qty: u32,

    /// Manufacturer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,

    /// Model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Free-form notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Type-specific attributes
    #[serde(default, skip_serializing_if = "ComponentAttributes::is_empty")]
    pub attributes: ComponentAttributes,
}

fn default_qty() -> u32 {
    1
}

impl Component {
    /// Create a component of the given type in its quick-add subsystem
    pub fn new(component_type: ComponentType) -> Self {
        Self::in_subsystem(component_type, component_type.default_subsystem())
    }

    /// Create a component of the given type in an explicit subsystem
    pub fn in_subsystem(component_type: ComponentType, subsystem: Subsystem) -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Cmp),
            subsystem,
            component_type,
            qty: 1,
            manufacturer: None,
            model: None,
            notes: None,
            attributes: ComponentAttributes::default(),
        }
    }

    /// Set the quantity, normalizing zero to one
    pub fn with_qty(mut self, qty: u32) -> Self {
        self.qty = normalize_qty(qty);
        self
    }

    pub fn with_attributes(mut self, attributes: ComponentAttributes) -> Self {
        self.attributes = attributes;
        self
    }
}

/// Quantities below one are treated as one
pub fn normalize_qty(qty: u32) -> u32 {
    qty.max(1)
}

/// Partial update applied by `Asset::update_component`
#[derive(Debug, Clone, Default)]
pub struct ComponentPatch {
    pub qty: Option<u32>,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub notes: Option<String>,
    pub closed_loop: Option<bool>,
    pub rated_power_kw: Option<f64>,
}

impl ComponentPatch {
    pub fn apply(self, component: &mut Component) {
        if let Some(qty) = self.qty {
            component.qty = normalize_qty(qty);
        }
        if self.manufacturer.is_some() {
            component.manufacturer = self.manufacturer;
        }
        if self.model.is_some() {
            component.model = self.model;
        }
        if self.notes.is_some() {
            component.notes = self.notes;
        }
        if let Some(closed_loop) = self.closed_loop {
            component.attributes.closed_loop = closed_loop;
        }
        if self.rated_power_kw.is_some() {
            component.attributes.rated_power_kw = self.rated_power_kw;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_creation() {
        let cmp = Component::new(ComponentType::Vfd);
        assert!(cmp.id.to_string().starts_with("CMP-"));
        assert_eq!(cmp.subsystem, Subsystem::DrivesMotion);
        assert_eq!(cmp.qty, 1);
        assert!(cmp.attributes.is_empty());
    }

    #[test]
    fn test_zero_qty_normalized() {
        let cmp = Component::new(ComponentType::Motor).with_qty(0);
        assert_eq!(cmp.qty, 1);
    }

    #[test]
    fn test_component_roundtrip() {
        let cmp = Component::new(ComponentType::IoModule)
            .with_qty(4)
            .with_attributes(ComponentAttributes {
                closed_loop: true,
                rated_power_kw: None,
            });

        let yaml = serde_yml::to_string(&cmp).unwrap();
        assert!(yaml.contains("type: io-module"));
        assert!(yaml.contains("subsystem: control"));
        assert!(yaml.contains("closed_loop: true"));

        let parsed: Component = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(cmp, parsed);
    }

    #[test]
    fn test_qty_defaults_when_missing() {
        let yaml = "id: CMP-01HQ3K4N5M6P7R8S9T0VWXYZ12\nsubsystem: motors\ntype: motor\n";
        let parsed: Component = serde_yml::from_str(yaml).unwrap();
        assert_eq!(parsed.qty, 1);
    }

    #[test]
    fn test_quick_add_subsystems() {
        assert_eq!(ComponentType::Motor.default_subsystem(), Subsystem::Motors);
        assert_eq!(ComponentType::PhotoEye.default_subsystem(), Subsystem::Instrumentation);
        assert_eq!(ComponentType::AirFilter.default_subsystem(), Subsystem::Process);
        assert_eq!(ComponentType::SolenoidValve.default_subsystem(), Subsystem::Pneumatic);
    }

    #[test]
    fn test_patch_updates_only_given_fields() {
        let mut cmp = Component::new(ComponentType::Motor);
        cmp.model = Some("W22".to_string());
        ComponentPatch {
            qty: Some(0),
            manufacturer: Some("WEG".to_string()),
            rated_power_kw: Some(45.0),
            ..Default::default()
        }
        .apply(&mut cmp);

        assert_eq!(cmp.qty, 1);
        assert_eq!(cmp.manufacturer.as_deref(), Some("WEG"));
        assert_eq!(cmp.model.as_deref(), Some("W22"));
        assert_eq!(cmp.attributes.rated_power_kw, Some(45.0));
    }
}
