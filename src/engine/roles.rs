//! Role assignment from criticality and task method

use crate::entities::asset::Criticality;
use crate::entities::task::{Method, Role};

/// Responsible role for a task of `method` on an asset of `criticality`
pub fn assign_role(criticality: Criticality, method: Method) -> Role {
    match (criticality, method) {
        (Criticality::A, Method::Measurement | Method::FunctionalTest | Method::Adjustment) => {
            Role::Supervisor
        }
        (Criticality::A, _) => Role::TeamLead,
        (Criticality::B, Method::Measurement | Method::FunctionalTest) => Role::TeamLead,
        (Criticality::B, _) => Role::Technician,
        (Criticality::C, _) => Role::Technician,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_criticality_a() {
        assert_eq!(assign_role(Criticality::A, Method::Measurement), Role::Supervisor);
        assert_eq!(assign_role(Criticality::A, Method::FunctionalTest), Role::Supervisor);
        assert_eq!(assign_role(Criticality::A, Method::Adjustment), Role::Supervisor);
        assert_eq!(assign_role(Criticality::A, Method::Visual), Role::TeamLead);
        assert_eq!(assign_role(Criticality::A, Method::Lubrication), Role::TeamLead);
    }

    #[test]
    fn test_criticality_b() {
        assert_eq!(assign_role(Criticality::B, Method::Measurement), Role::TeamLead);
        assert_eq!(assign_role(Criticality::B, Method::FunctionalTest), Role::TeamLead);
        assert_eq!(assign_role(Criticality::B, Method::Adjustment), Role::Technician);
        assert_eq!(assign_role(Criticality::B, Method::Cleaning), Role::Technician);
    }

    #[test]
    fn test_criticality_c_is_always_technician() {
        for method in Method::all() {
            assert_eq!(assign_role(Criticality::C, *method), Role::Technician);
        }
    }

    #[test]
    fn test_lower_tier_never_outranks_higher() {
        for method in Method::all() {
            let a = assign_role(Criticality::A, *method);
            let b = assign_role(Criticality::B, *method);
            let c = assign_role(Criticality::C, *method);
            assert!(a >= b && b >= c, "{}", method);
        }
    }
}
