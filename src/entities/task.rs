//! PM task vocabulary - frequencies, methods, roles and materialized tasks

use serde::{Deserialize, Serialize};

use crate::entities::component::ComponentType;

/// How often a task is performed
///
/// The first six variants form a total order from coarsest to finest.
/// `ByCondition` and `ByHours` are anchors outside that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Frequency {
    Annual,
    Semiannual,
    Quarterly,
    Monthly,
    Weekly,
    Daily,
    /// Performed when an indicator says so (e.g. grease condition)
    ByCondition,
    /// Performed on a running-hours counter
    ByHours,
}

impl Frequency {
    /// The ordered scale, coarsest first
    pub const SCALE: [Frequency; 6] = [
        Frequency::Annual,
        Frequency::Semiannual,
        Frequency::Quarterly,
        Frequency::Monthly,
        Frequency::Weekly,
        Frequency::Daily,
    ];

    /// Position on the ordered scale (0 = Annual, 5 = Daily), `None` for anchors
    pub fn rank(self) -> Option<u8> {
        Self::SCALE
            .iter()
            .position(|f| *f == self)
            .map(|i| i as u8)
    }

    /// True for the unordered anchors that never escalate
    pub fn is_anchor(self) -> bool {
        self.rank().is_none()
    }

    /// Get all frequencies, ordered scale first
    pub fn all() -> &'static [Frequency] {
        &[
            Frequency::Annual,
            Frequency::Semiannual,
            Frequency::Quarterly,
            Frequency::Monthly,
            Frequency::Weekly,
            Frequency::Daily,
            Frequency::ByCondition,
            Frequency::ByHours,
        ]
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Frequency::Annual => write!(f, "Annual"),
            Frequency::Semiannual => write!(f, "Semiannual"),
            Frequency::Quarterly => write!(f, "Quarterly"),
            Frequency::Monthly => write!(f, "Monthly"),
            Frequency::Weekly => write!(f, "Weekly"),
            Frequency::Daily => write!(f, "Daily"),
            Frequency::ByCondition => write!(f, "By condition"),
            Frequency::ByHours => write!(f, "By hours"),
        }
    }
}

/// Inspection or service method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Method {
    Visual,
    Cleaning,
    Measurement,
    FunctionalTest,
    Lubrication,
    Adjustment,
}

impl Method {
    pub fn all() -> &'static [Method] {
        &[
            Method::Visual,
            Method::Cleaning,
            Method::Measurement,
            Method::FunctionalTest,
            Method::Lubrication,
            Method::Adjustment,
        ]
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Visual => write!(f, "Visual"),
            Method::Cleaning => write!(f, "Cleaning"),
            Method::Measurement => write!(f, "Measurement"),
            Method::FunctionalTest => write!(f, "Functional Test"),
            Method::Lubrication => write!(f, "Lubrication"),
            Method::Adjustment => write!(f, "Adjustment"),
        }
    }
}

/// Role responsible for executing a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Technician,
    TeamLead,
    Supervisor,
}

impl Role {
    pub fn all() -> &'static [Role] {
        &[Role::Technician, Role::TeamLead, Role::Supervisor]
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Technician => write!(f, "Technician"),
            Role::TeamLead => write!(f, "Team Lead"),
            Role::Supervisor => write!(f, "Supervisor"),
        }
    }
}

/// A catalog template bound to a component type, an escalated frequency and a role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PmTask {
    /// Component type the task applies to
    pub component_type: ComponentType,

    /// What to do
    pub task: String,

    /// How it is done
    pub method: Method,

    /// Frequency after escalation
    pub frequency: Frequency,

    /// Catalog frequency before escalation
    pub base_frequency: Frequency,

    /// Acceptance criterion
    pub acceptance: String,

    /// Responsible role
    pub role: Role,

    /// Why the task exists
    pub rationale: String,
}

impl PmTask {
    /// True when the task runs more often than the catalog baseline
    pub fn is_escalated(&self) -> bool {
        self.frequency != self.base_frequency
    }
}
