//! Rule catalog - the fixed component-type to task-template table
//!
//! The catalog is plain `'static` data. Adding a component type means adding
//! a slice here and an arm in [`templates_for`]; no other code changes.

use crate::entities::component::{Component, ComponentAttributes, ComponentType};
use crate::entities::task::{Frequency, Method};

/// Motors at or above this nameplate power get an insulation test
pub const LARGE_MOTOR_KW: f64 = 37.0;

/// When a template applies to a component
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Applicability {
    /// Every component of the type
    Always,
    /// Only drives running with speed/position feedback
    ClosedLoop,
    /// Only when the rated power is known and at least this many kW
    RatedPowerAtLeast(f64),
}

impl Applicability {
    pub fn holds(&self, attributes: &ComponentAttributes) -> bool {
        match *self {
            Applicability::Always => true,
            Applicability::ClosedLoop => attributes.closed_loop,
            Applicability::RatedPowerAtLeast(kw) => {
                attributes.rated_power_kw.is_some_and(|p| p >= kw)
            }
        }
    }
}

impl std::fmt::Display for Applicability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Applicability::Always => write!(f, "always"),
            Applicability::ClosedLoop => write!(f, "closed loop"),
            Applicability::RatedPowerAtLeast(kw) => write!(f, "rated power >= {} kW", kw),
        }
    }
}

/// An immutable catalog entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaskTemplate {
    pub task: &'static str,
    pub method: Method,
    pub frequency: Frequency,
    pub acceptance: &'static str,
    pub rationale: &'static str,
    pub applies: Applicability,
}

const MOTOR: &[TaskTemplate] = &[
    TaskTemplate {
        task: "Visual inspection: exterior cleanliness, ventilation, terminal boxes and conduits.",
        method: Method::Visual,
        frequency: Frequency::Weekly,
        acceptance: "No excessive buildup, no loose cables, ventilation clear.",
        rationale: "Prevents overheating and failures from contamination or loosening.",
        applies: Applicability::Always,
    },
    TaskTemplate {
        task: "Measure current (A) and compare with baseline under normal load.",
        method: Method::Measurement,
        frequency: Frequency::Monthly,
        acceptance: "Within expected band; no abnormal phase imbalance.",
        rationale: "Detects excess friction or load and electrical problems.",
        applies: Applicability::Always,
    },
    TaskTemplate {
        task: "Measure winding insulation resistance and trend against previous readings.",
        method: Method::Measurement,
        frequency: Frequency::Annual,
        acceptance: "Above site minimum; no downward trend between readings.",
        rationale: "Insulation breakdown on large motors is expensive and shows early in the trend.",
        applies: Applicability::RatedPowerAtLeast(LARGE_MOTOR_KW),
    },
];

const VFD: &[TaskTemplate] = &[
    TaskTemplate {
        task: "Clean and inspect fans, heatsink and cabinet filters (if fitted).",
        method: Method::Cleaning,
        frequency: Frequency::Monthly,
        acceptance: "No obstructions; ventilation working; no thermal alarms.",
        rationale: "Heat plus dust is the leading cause of drive failures.",
        applies: Applicability::Always,
    },
    TaskTemplate {
        task: "Review fault history and critical parameters; verify they match the standard.",
        method: Method::FunctionalTest,
        frequency: Frequency::Quarterly,
        acceptance: "No recurring faults; parameters correct.",
        rationale: "Repeated faults point to an emerging mechanical or electrical problem.",
        applies: Applicability::Always,
    },
    TaskTemplate {
        task: "Verify encoder/feedback signal and speed-loop response against the commissioning record.",
        method: Method::FunctionalTest,
        frequency: Frequency::Semiannual,
        acceptance: "Feedback stable with no dropouts; loop response within commissioning tolerance.",
        rationale: "Degraded feedback causes hunting, overcurrent trips and position loss.",
        applies: Applicability::ClosedLoop,
    },
];

const CONTROLLER: &[TaskTemplate] = &[TaskTemplate {
    task: "Cabinet inspection: temperature, cleanliness, status LEDs, terminals and hardware.",
    method: Method::Visual,
    frequency: Frequency::Monthly,
    acceptance: "No over-temperature; LEDs normal; terminals tight.",
    rationale: "Intermittent faults from heat, contamination or loosening are common.",
    applies: Applicability::Always,
}];

const SENSOR_FUNCTION_TEST: TaskTemplate = TaskTemplate {
    task: "Functional test: verify signal change (LED / PLC input) during operation.",
    method: Method::FunctionalTest,
    frequency: Frequency::Quarterly,
    acceptance: "No chatter; consistent response.",
    rationale: "Finds fatigued cables, marginal sensing distance and weak sensors.",
    applies: Applicability::Always,
};

const SENSOR_CLEANING_TASK: &str = "Clean sensor face/optics and verify alignment and mounting.";
const SENSOR_CLEANING_ACCEPTANCE: &str = "No overspray; bracket tight; stable detection.";
const SENSOR_CLEANING_RATIONALE: &str = "False triggers from contamination and misalignment.";

const DISCRETE_SENSOR: &[TaskTemplate] = &[
    TaskTemplate {
        task: SENSOR_CLEANING_TASK,
        method: Method::Cleaning,
        frequency: Frequency::Monthly,
        acceptance: SENSOR_CLEANING_ACCEPTANCE,
        rationale: SENSOR_CLEANING_RATIONALE,
        applies: Applicability::Always,
    },
    SENSOR_FUNCTION_TEST,
];

// Optics foul faster than inductive faces, hence the weekly cleaning.
const PHOTO_EYE: &[TaskTemplate] = &[
    TaskTemplate {
        task: SENSOR_CLEANING_TASK,
        method: Method::Cleaning,
        frequency: Frequency::Weekly,
        acceptance: SENSOR_CLEANING_ACCEPTANCE,
        rationale: SENSOR_CLEANING_RATIONALE,
        applies: Applicability::Always,
    },
    SENSOR_FUNCTION_TEST,
];

const BEARING: &[TaskTemplate] = &[
    TaskTemplate {
        task: "Inspect for noise, temperature and play; look for seal leaks.",
        method: Method::Visual,
        frequency: Frequency::Weekly,
        acceptance: "No abnormal noise; normal temperature; no excessive play.",
        rationale: "Early detection avoids seizure and secondary damage.",
        applies: Applicability::Always,
    },
    TaskTemplate {
        task: "Lubricate per standard (if applicable) and verify the correct grease.",
        method: Method::Lubrication,
        frequency: Frequency::ByCondition,
        acceptance: "No over-greasing; clean grease of the correct type.",
        rationale: "Correct lubrication defines bearing life.",
        applies: Applicability::Always,
    },
];

const DIFFERENTIAL_PRESSURE: &[TaskTemplate] = &[TaskTemplate {
    task: "Check filter condition and/or record ΔP; replace on condition.",
    method: Method::Measurement,
    frequency: Frequency::Monthly,
    acceptance: "ΔP within range or condition acceptable; no bypass.",
    rationale: "ΔP is the best replacement indicator and protects fans and process.",
    applies: Applicability::Always,
}];

const GEARBOX: &[TaskTemplate] = &[
    TaskTemplate {
        task: "Check oil level, leaks at seals and breather condition.",
        method: Method::Visual,
        frequency: Frequency::Monthly,
        acceptance: "Level within sight-glass marks; no active leaks; breather clear.",
        rationale: "Low oil and blocked breathers are the usual root of gear wear.",
        applies: Applicability::Always,
    },
    TaskTemplate {
        task: "Change oil at the running-hours interval set by the manufacturer.",
        method: Method::Lubrication,
        frequency: Frequency::ByHours,
        acceptance: "Correct oil grade and quantity; drained oil free of metal particles.",
        rationale: "Oil degrades with operating hours, not calendar time.",
        applies: Applicability::Always,
    },
    TaskTemplate {
        task: "Check mounting bolt torque and coupling alignment.",
        method: Method::Adjustment,
        frequency: Frequency::Semiannual,
        acceptance: "Bolts at specified torque; alignment within coupling tolerance.",
        rationale: "Misalignment loads bearings and seals on both shafts.",
        applies: Applicability::Always,
    },
];

const SOLENOID_VALVE: &[TaskTemplate] = &[TaskTemplate {
    task: "Cycle the valve and verify response, exhaust and absence of air leaks.",
    method: Method::FunctionalTest,
    frequency: Frequency::Quarterly,
    acceptance: "Switches cleanly on command; no audible leak; coil not overheating.",
    rationale: "Sticking spools and leaking seals cause slow or missed actuations.",
    applies: Applicability::Always,
}];

const PNEUMATIC_CYLINDER: &[TaskTemplate] = &[
    TaskTemplate {
        task: "Inspect rod, seals and mounts for leaks, scoring and wear.",
        method: Method::Visual,
        frequency: Frequency::Monthly,
        acceptance: "Rod clean and unscored; no leaks; mounts tight.",
        rationale: "Rod damage destroys seals and leads to air loss and drift.",
        applies: Applicability::Always,
    },
    TaskTemplate {
        task: "Adjust end-of-stroke cushioning and flow controls for smooth travel.",
        method: Method::Adjustment,
        frequency: Frequency::Quarterly,
        acceptance: "No slamming at end of stroke; cycle time within standard.",
        rationale: "Hard stops fatigue mounts and shorten cylinder life.",
        applies: Applicability::Always,
    },
];

/// Ordered templates for a component type; empty for unsupported types
pub fn templates_for(component_type: ComponentType) -> &'static [TaskTemplate] {
    match component_type {
        ComponentType::Motor => MOTOR,
        ComponentType::Vfd => VFD,
        ComponentType::Plc | ComponentType::IoModule => CONTROLLER,
        ComponentType::InductiveSensor | ComponentType::LimitSwitch => DISCRETE_SENSOR,
        ComponentType::PhotoEye => PHOTO_EYE,
        ComponentType::Bearing => BEARING,
        ComponentType::AirFilter | ComponentType::PressureGauge => DIFFERENTIAL_PRESSURE,
        ComponentType::Gearbox => GEARBOX,
        ComponentType::SolenoidValve => SOLENOID_VALVE,
        ComponentType::PneumaticCylinder => PNEUMATIC_CYLINDER,
        ComponentType::Hmi | ComponentType::GasBurner => &[],
    }
}

/// Whether the catalog has any template for a type
pub fn is_supported(component_type: ComponentType) -> bool {
    !templates_for(component_type).is_empty()
}

/// Templates that apply to a specific component, in catalog order
pub fn applicable_templates(component: &Component) -> impl Iterator<Item = &'static TaskTemplate> + '_ {
    templates_for(component.component_type)
        .iter()
        .filter(|t| t.applies.holds(&component.attributes))
}

/// Every catalog entry, grouped by component type in enumeration order
pub fn entries() -> impl Iterator<Item = (ComponentType, &'static TaskTemplate)> {
    ComponentType::all()
        .iter()
        .flat_map(|ty| templates_for(*ty).iter().map(move |t| (*ty, t)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_motor_base_templates() {
        let motor = Component::new(ComponentType::Motor);
        let templates: Vec<_> = applicable_templates(&motor).collect();
        assert_eq!(templates.len(), 2);
        assert_eq!(templates[0].method, Method::Visual);
        assert_eq!(templates[0].frequency, Frequency::Weekly);
        assert_eq!(templates[1].method, Method::Measurement);
        assert_eq!(templates[1].frequency, Frequency::Monthly);
    }

    #[test]
    fn test_large_motor_gets_insulation_test() {
        let motor = Component::new(ComponentType::Motor).with_attributes(ComponentAttributes {
            closed_loop: false,
            rated_power_kw: Some(45.0),
        });
        assert_eq!(applicable_templates(&motor).count(), 3);

        let small = Component::new(ComponentType::Motor).with_attributes(ComponentAttributes {
            closed_loop: false,
            rated_power_kw: Some(7.5),
        });
        assert_eq!(applicable_templates(&small).count(), 2);
    }

    #[test]
    fn test_closed_loop_vfd_gets_feedback_check() {
        let open = Component::new(ComponentType::Vfd);
        assert_eq!(applicable_templates(&open).count(), 2);

        let closed = Component::new(ComponentType::Vfd).with_attributes(ComponentAttributes {
            closed_loop: true,
            rated_power_kw: None,
        });
        let last = applicable_templates(&closed).last().unwrap();
        assert_eq!(last.applies, Applicability::ClosedLoop);
        assert_eq!(last.frequency, Frequency::Semiannual);
    }

    #[test]
    fn test_unsupported_types_are_empty() {
        assert!(!is_supported(ComponentType::Hmi));
        assert!(!is_supported(ComponentType::GasBurner));
        assert!(is_supported(ComponentType::Gearbox));
    }

    #[test]
    fn test_photo_eye_cleans_weekly() {
        assert_eq!(templates_for(ComponentType::PhotoEye)[0].frequency, Frequency::Weekly);
        assert_eq!(templates_for(ComponentType::LimitSwitch)[0].frequency, Frequency::Monthly);
    }

    #[test]
    fn test_shared_templates() {
        assert_eq!(templates_for(ComponentType::Plc), templates_for(ComponentType::IoModule));
        assert_eq!(
            templates_for(ComponentType::AirFilter),
            templates_for(ComponentType::PressureGauge)
        );
    }

    #[test]
    fn test_entries_cover_supported_types() {
        let total: usize = ComponentType::all().iter().map(|t| templates_for(*t).len()).sum();
        assert_eq!(entries().count(), total);
        assert!(entries().all(|(ty, _)| is_supported(ty)));
    }

    #[test]
    fn test_catalog_text_is_not_empty() {
        for (_, t) in entries() {
            assert!(!t.task.is_empty());
            assert!(!t.acceptance.is_empty());
            assert!(!t.rationale.is_empty());
        }
    }
}
