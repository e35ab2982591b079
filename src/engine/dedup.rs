//! Removal of structurally identical tasks

use std::collections::HashSet;

use crate::entities::component::ComponentType;
use crate::entities::task::{Frequency, Method, PmTask, Role};

/// Identity of a task for deduplication
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskKey {
    pub component_type: ComponentType,
    pub task: String,
    pub method: Method,
    pub frequency: Frequency,
    pub role: Role,
}

impl From<&PmTask> for TaskKey {
    fn from(t: &PmTask) -> Self {
        Self {
            component_type: t.component_type,
            task: t.task.clone(),
            method: t.method,
            frequency: t.frequency,
            role: t.role,
        }
    }
}

/// Keep the first occurrence of each distinct key, preserving order
pub fn dedup(tasks: Vec<PmTask>) -> Vec<PmTask> {
    let mut seen = HashSet::with_capacity(tasks.len());
    tasks
        .into_iter()
        .filter(|t| seen.insert(TaskKey::from(t)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn task(ty: ComponentType, text: &str, freq: Frequency, role: Role) -> PmTask {
        PmTask {
            component_type: ty,
            task: text.to_string(),
            method: Method::Visual,
            frequency: freq,
            base_frequency: freq,
            acceptance: "ok".to_string(),
            role,
            rationale: "because".to_string(),
        }
    }

    #[test]
    fn test_keeps_first_occurrence_in_order() {
        let tasks = vec![
            task(ComponentType::Motor, "a", Frequency::Weekly, Role::TeamLead),
            task(ComponentType::Bearing, "b", Frequency::Weekly, Role::TeamLead),
            task(ComponentType::Motor, "a", Frequency::Weekly, Role::TeamLead),
        ];
        let out = dedup(tasks);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].component_type, ComponentType::Motor);
        assert_eq!(out[1].component_type, ComponentType::Bearing);
    }

    #[test]
    fn test_same_text_on_other_type_is_kept() {
        let tasks = vec![
            task(ComponentType::Plc, "cabinet", Frequency::Monthly, Role::TeamLead),
            task(ComponentType::IoModule, "cabinet", Frequency::Monthly, Role::TeamLead),
        ];
        assert_eq!(dedup(tasks).len(), 2);
    }

    #[test]
    fn test_acceptance_is_not_part_of_key() {
        let mut second = task(ComponentType::Motor, "a", Frequency::Weekly, Role::TeamLead);
        second.acceptance = "different".to_string();
        let tasks = vec![
            task(ComponentType::Motor, "a", Frequency::Weekly, Role::TeamLead),
            second,
        ];
        let out = dedup(tasks);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].acceptance, "ok");
    }

    fn arb_task() -> impl Strategy<Value = PmTask> {
        (
            prop::sample::select(vec![ComponentType::Motor, ComponentType::Vfd]),
            prop::sample::select(vec!["x", "y"]),
            prop::sample::select(Frequency::all().to_vec()),
            prop::sample::select(Role::all().to_vec()),
        )
            .prop_map(|(ty, text, freq, role)| task(ty, text, freq, role))
    }

    proptest! {
        #[test]
        fn prop_dedup_output_has_unique_keys(tasks in prop::collection::vec(arb_task(), 0..40)) {
            let out = dedup(tasks.clone());
            let keys: HashSet<TaskKey> = out.iter().map(TaskKey::from).collect();
            prop_assert_eq!(keys.len(), out.len());

            let input_keys: HashSet<TaskKey> = tasks.iter().map(TaskKey::from).collect();
            prop_assert_eq!(keys, input_keys);
        }

        #[test]
        fn prop_dedup_is_idempotent(tasks in prop::collection::vec(arb_task(), 0..40)) {
            let once = dedup(tasks);
            let twice = dedup(once.clone());
            prop_assert_eq!(once, twice);
        }
    }
}
