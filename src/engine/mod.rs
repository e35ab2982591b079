//! PM rule-evaluation engine
//!
//! A pure pipeline from an asset description to a task list:
//!
//! 1. Component filter - drop components of disabled subsystems
//! 2. [`severity`] - reduce environment flags to one `severe` signal
//! 3. [`catalog`] - look up task templates for each component
//! 4. [`escalation`] - tighten frequencies when severe
//! 5. [`roles`] - assign the responsible role from criticality and method
//! 6. [`dedup`] - drop structurally identical tasks
//!
//! Nothing is cached between calls; the catalog is static data.

pub mod catalog;
pub mod dedup;
pub mod escalation;
pub mod roles;
pub mod severity;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::entities::asset::{Asset, Criticality, SubsystemSet};
use crate::entities::component::Component;
use crate::entities::environment::EnvironmentContext;
use crate::entities::task::{Frequency, Method, PmTask, Role};

pub use catalog::{Applicability, TaskTemplate};
pub use dedup::{dedup, TaskKey};
pub use escalation::escalate;
pub use roles::assign_role;
pub use severity::is_severe;

/// Components whose subsystem is enabled, in input order
pub fn filter_enabled<'a>(components: &'a [Component], enabled: &SubsystemSet) -> Vec<&'a Component> {
    components
        .iter()
        .filter(|c| enabled.contains(&c.subsystem))
        .collect()
}

/// Generate the PM task list for a set of (already filtered) components
pub fn generate<'a, I>(
    criticality: Criticality,
    environment: &EnvironmentContext,
    components: I,
) -> Vec<PmTask>
where
    I: IntoIterator<Item = &'a Component>,
{
    let severe = is_severe(environment);
    let mut tasks = Vec::new();
    let mut component_count = 0usize;

    for component in components {
        component_count += 1;
        if !catalog::is_supported(component.component_type) {
            tracing::trace!(component_type = %component.component_type, "no catalog entry");
            continue;
        }
        for template in catalog::applicable_templates(component) {
            tasks.push(materialize(component, template, criticality, severe));
        }
    }

    let generated = tasks.len();
    let tasks = dedup(tasks);
    tracing::debug!(
        %criticality,
        severe,
        components = component_count,
        generated,
        kept = tasks.len(),
        "evaluated PM rules"
    );
    tasks
}

/// Filter an asset's components by its enabled subsystems, then generate
pub fn generate_for_asset(asset: &Asset) -> Vec<PmTask> {
    let enabled = filter_enabled(&asset.components, &asset.subsystems);
    generate(asset.criticality, &asset.environment, enabled)
}

fn materialize(
    component: &Component,
    template: &TaskTemplate,
    criticality: Criticality,
    severe: bool,
) -> PmTask {
    PmTask {
        component_type: component.component_type,
        task: template.task.to_string(),
        method: template.method,
        frequency: escalate(template.frequency, severe),
        base_frequency: template.frequency,
        acceptance: template.acceptance.to_string(),
        role: assign_role(criticality, template.method),
        rationale: template.rationale.to_string(),
    }
}

/// Counts over a generated task list
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct TaskSummary {
    pub total: usize,
    pub escalated: usize,
    pub by_role: BTreeMap<Role, usize>,
    pub by_method: BTreeMap<Method, usize>,
    pub by_frequency: Vec<(Frequency, usize)>,
}

/// Summarize a task list for report footers
pub fn summarize(tasks: &[PmTask]) -> TaskSummary {
    let mut summary = TaskSummary {
        total: tasks.len(),
        ..Default::default()
    };

    for task in tasks {
        if task.is_escalated() {
            summary.escalated += 1;
        }
        *summary.by_role.entry(task.role).or_insert(0) += 1;
        *summary.by_method.entry(task.method).or_insert(0) += 1;
    }

    // Finest first, anchors last
    summary.by_frequency = Frequency::SCALE
        .iter()
        .rev()
        .chain(&[Frequency::ByCondition, Frequency::ByHours])
        .filter_map(|f| {
            let n = tasks.iter().filter(|t| t.frequency == *f).count();
            (n > 0).then_some((*f, n))
        })
        .collect();

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::component::{ComponentAttributes, ComponentType, Subsystem};
    use crate::entities::environment::EnvFlag;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn motor() -> Component {
        Component::new(ComponentType::Motor)
    }

    #[test]
    fn test_single_motor_mild() {
        let comps = [motor()];
        let tasks = generate(Criticality::B, &EnvironmentContext::new(), &comps);
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].method, Method::Visual);
        assert_eq!(tasks[0].frequency, Frequency::Weekly);
        assert_eq!(tasks[1].method, Method::Measurement);
        assert_eq!(tasks[1].frequency, Frequency::Monthly);
    }

    #[test]
    fn test_single_motor_high_temperature() {
        let comps = [motor()];
        let env = EnvironmentContext::with_flags([EnvFlag::HighTemperature]);
        let tasks = generate(Criticality::B, &env, &comps);
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].frequency, Frequency::Daily);
        assert_eq!(tasks[0].base_frequency, Frequency::Weekly);
        assert_eq!(tasks[1].frequency, Frequency::Weekly);
        assert!(tasks.iter().all(|t| t.is_escalated()));
    }

    #[test]
    fn test_role_follows_criticality() {
        let comps = [motor()];
        let env = EnvironmentContext::new();
        let a = generate(Criticality::A, &env, &comps);
        let c = generate(Criticality::C, &env, &comps);
        assert_eq!(a[1].method, Method::Measurement);
        assert_eq!(a[1].role, Role::Supervisor);
        assert_eq!(c[1].role, Role::Technician);
    }

    #[test]
    fn test_two_motors_collapse() {
        let comps = [motor().with_qty(3), motor()];
        let tasks = generate(Criticality::A, &EnvironmentContext::new(), &comps);
        assert_eq!(tasks.len(), 2);
    }

    #[test]
    fn test_unsupported_type_is_noop() {
        let env = EnvironmentContext::new();
        let only_hmi = [Component::new(ComponentType::Hmi)];
        assert!(generate(Criticality::A, &env, &only_hmi).is_empty());

        let mixed = [Component::new(ComponentType::GasBurner), motor()];
        let alone = [motor()];
        assert_eq!(
            generate(Criticality::A, &env, &mixed),
            generate(Criticality::A, &env, &alone)
        );
    }

    #[test]
    fn test_generate_is_deterministic() {
        let comps = [
            Component::new(ComponentType::Vfd),
            motor(),
            Component::new(ComponentType::PhotoEye),
            Component::new(ComponentType::Bearing),
        ];
        let env = EnvironmentContext::with_flags([EnvFlag::DustOverspray]);
        let first = generate(Criticality::B, &env, &comps);
        let second = generate(Criticality::B, &env, &comps);
        assert_eq!(first, second);
        assert_eq!(first.len(), 8);
    }

    #[test]
    fn test_output_follows_component_order() {
        let comps = [Component::new(ComponentType::Bearing), motor()];
        let tasks = generate(Criticality::C, &EnvironmentContext::new(), &comps);
        assert_eq!(tasks[0].component_type, ComponentType::Bearing);
        assert_eq!(tasks[2].component_type, ComponentType::Motor);
    }

    #[test]
    fn test_filter_enabled() {
        let comps = [
            Component::new(ComponentType::Vfd),
            Component::in_subsystem(ComponentType::Motor, Subsystem::Process),
            motor(),
        ];
        let enabled: SubsystemSet = [Subsystem::Motors].into_iter().collect();
        let kept = filter_enabled(&comps, &enabled);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, comps[2].id);
    }

    #[test]
    fn test_generate_for_asset_skips_disabled_subsystems() {
        let mut asset = Asset::new(
            "Oven".to_string(),
            "Oven / Air House".to_string(),
            Criticality::A,
            "test".to_string(),
        );
        asset.add_component(Component::new(ComponentType::Vfd));
        asset.add_component(Component::new(ComponentType::SolenoidValve));
        asset.add_component(motor());

        let tasks = generate_for_asset(&asset);
        assert!(tasks.iter().all(|t| t.component_type == ComponentType::Motor));

        asset.toggle_subsystem(Subsystem::DrivesMotion);
        let tasks = generate_for_asset(&asset);
        assert!(tasks.iter().any(|t| t.component_type == ComponentType::Vfd));
        assert!(!tasks.iter().any(|t| t.component_type == ComponentType::SolenoidValve));
    }

    #[test]
    fn test_attribute_conditioned_templates() {
        let drive = Component::new(ComponentType::Vfd).with_attributes(ComponentAttributes {
            closed_loop: true,
            rated_power_kw: None,
        });
        let tasks = generate(Criticality::A, &EnvironmentContext::new(), [&drive]);
        assert_eq!(tasks.len(), 3);
        assert_eq!(tasks[2].frequency, Frequency::Semiannual);
    }

    #[test]
    fn test_anchor_frequencies_survive_severe_context() {
        let comps = [Component::new(ComponentType::Gearbox)];
        let env = EnvironmentContext::with_flags([EnvFlag::ContinuousOperation]);
        let tasks = generate(Criticality::B, &env, &comps);
        let oil = tasks.iter().find(|t| t.method == Method::Lubrication).unwrap();
        assert_eq!(oil.frequency, Frequency::ByHours);
        assert!(!oil.is_escalated());
    }

    #[test]
    fn test_summarize() {
        let comps = [motor(), Component::new(ComponentType::Bearing)];
        let env = EnvironmentContext::with_flags([EnvFlag::HighCycling]);
        let tasks = generate(Criticality::A, &env, &comps);
        let summary = summarize(&tasks);

        assert_eq!(summary.total, 4);
        assert_eq!(summary.escalated, 3);
        assert_eq!(summary.by_role.get(&Role::Supervisor), Some(&1));
        assert_eq!(summary.by_role.get(&Role::TeamLead), Some(&3));
        assert_eq!(summary.by_frequency[0], (Frequency::Daily, 2));
        assert_eq!(summary.by_frequency.last(), Some(&(Frequency::ByCondition, 1)));
        assert_eq!(summary.by_frequency.iter().map(|(_, n)| n).sum::<usize>(), 4);
    }

    #[test]
    fn test_reference_task_list_snapshot() {
        let comps = [
            Component::new(ComponentType::AirFilter),
            Component::new(ComponentType::PhotoEye),
            motor(),
        ];
        let env = EnvironmentContext::with_flags([EnvFlag::HighTemperature, EnvFlag::Corrosive]);
        let tasks = generate(Criticality::B, &env, &comps);
        let rendered = tasks
            .iter()
            .map(|t| {
                format!(
                    "{} | {} | {} -> {} | {}",
                    t.component_type, t.method, t.base_frequency, t.frequency, t.role
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        insta::assert_snapshot!(rendered);
    }

    fn arb_component() -> impl Strategy<Value = Component> {
        (
            prop::sample::select(ComponentType::all().to_vec()),
            prop::sample::select(Subsystem::all().to_vec()),
            1u32..4,
            any::<bool>(),
            prop::option::of(1.0f64..90.0),
        )
            .prop_map(|(ty, subsystem, qty, closed_loop, rated_power_kw)| {
                Component::in_subsystem(ty, subsystem)
                    .with_qty(qty)
                    .with_attributes(ComponentAttributes {
                        closed_loop,
                        rated_power_kw,
                    })
            })
    }

    proptest! {
        #[test]
        fn prop_generated_tasks_are_unique_and_from_enabled_subsystems(
            components in prop::collection::vec(arb_component(), 0..12),
            enabled in prop::collection::btree_set(prop::sample::select(Subsystem::all().to_vec()), 0..8),
            flags in prop::collection::vec(prop::sample::select(EnvFlag::all().to_vec()), 0..4),
            criticality in prop::sample::select(vec![Criticality::A, Criticality::B, Criticality::C]),
        ) {
            let mut asset = Asset::new(
                "Any".to_string(),
                "Oven / Air House".to_string(),
                criticality,
                "test".to_string(),
            );
            asset.subsystems = enabled.clone();
            asset.environment = EnvironmentContext::with_flags(flags);
            asset.components = components.clone();

            let tasks = generate_for_asset(&asset);

            let keys: HashSet<TaskKey> = tasks.iter().map(TaskKey::from).collect();
            prop_assert_eq!(keys.len(), tasks.len());

            for task in &tasks {
                prop_assert!(
                    components
                        .iter()
                        .any(|c| c.component_type == task.component_type && enabled.contains(&c.subsystem)),
                    "{} has no component in an enabled subsystem",
                    task.component_type
                );
            }
        }
    }
}
