//! Interactive wizard for describing an asset
//!
//! Walks the same five steps as the planning workshop: system, subsystems,
//! components, operating context and output. The first four collect input;
//! the caller renders the output step from the returned asset.

use console::style;
use dialoguer::{theme::ColorfulTheme, Input, MultiSelect, Select};
use miette::{IntoDiagnostic, Result};

use crate::entities::asset::{Asset, Criticality, SubsystemSet, ASSET_TYPES};
use crate::entities::component::{Component, ComponentType, Subsystem};
use crate::entities::environment::EnvFlag;

/// Values used to pre-fill the prompts
#[derive(Debug, Clone)]
pub struct WizardDefaults {
    pub author: String,
    pub asset_type: String,
    pub criticality: Criticality,
}

/// Dialoguer-driven asset wizard
pub struct AssetWizard {
    defaults: WizardDefaults,
    theme: ColorfulTheme,
}

impl AssetWizard {
    pub fn new(defaults: WizardDefaults) -> Self {
        Self {
            defaults,
            theme: ColorfulTheme::default(),
        }
    }

    /// Run every step and return the described asset
    pub fn run(&self) -> Result<Asset> {
        println!();
        println!("{} Describe a new asset", style("◆").cyan());
        println!("{}", style("─".repeat(50)).dim());

        let mut asset = self.step_system()?;
        self.step_subsystems(&mut asset)?;
        self.step_components(&mut asset)?;
        self.step_context(&mut asset)?;

        println!();
        println!(
            "{} {} described with {} component(s)",
            style("✓").green(),
            style(&asset.name).cyan(),
            asset.components.len()
        );
        Ok(asset)
    }

    fn header(&self, n: u8, title: &str) {
        println!();
        println!("{} {}", style(format!("{})", n)).bold(), style(title).bold());
    }

    fn step_system(&self) -> Result<Asset> {
        self.header(1, "System");

        let name: String = Input::with_theme(&self.theme)
            .with_prompt("Name")
            .interact_text()
            .into_diagnostic()?;

        let area: String = Input::with_theme(&self.theme)
            .with_prompt("Area")
            .allow_empty(true)
            .interact_text()
            .into_diagnostic()?;

        let type_names: Vec<&str> = ASSET_TYPES.iter().map(|(name, _)| *name).collect();
        let default_type = type_names
            .iter()
            .position(|t| t.eq_ignore_ascii_case(&self.defaults.asset_type))
            .unwrap_or(0);
        let type_idx = Select::with_theme(&self.theme)
            .with_prompt("Asset type")
            .items(&type_names)
            .default(default_type)
            .interact()
            .into_diagnostic()?;

        let tiers = [Criticality::A, Criticality::B, Criticality::C];
        let labels = ["A (high)", "B", "C (low)"];
        let default_tier = tiers
            .iter()
            .position(|c| *c == self.defaults.criticality)
            .unwrap_or(0);
        let tier_idx = Select::with_theme(&self.theme)
            .with_prompt("Criticality")
            .items(&labels)
            .default(default_tier)
            .interact()
            .into_diagnostic()?;

        let mut asset = Asset::new(
            name.trim().to_string(),
            type_names[type_idx].to_string(),
            tiers[tier_idx],
            self.defaults.author.clone(),
        );
        let area = area.trim();
        if !area.is_empty() {
            asset.area = Some(area.to_string());
        }
        Ok(asset)
    }

    fn step_subsystems(&self, asset: &mut Asset) -> Result<()> {
        self.header(2, "Subsystems");

        let all = Subsystem::all();
        let checked: Vec<bool> = all.iter().map(|s| asset.is_enabled(*s)).collect();
        let picked = MultiSelect::with_theme(&self.theme)
            .with_prompt("Enabled subsystems (space toggles)")
            .items(all)
            .defaults(&checked)
            .interact()
            .into_diagnostic()?;

        asset.subsystems = picked.into_iter().map(|i| all[i]).collect();
        Ok(())
    }

    fn step_components(&self, asset: &mut Asset) -> Result<()> {
        self.header(3, "Components");

        let offered = quick_add_types(&asset.subsystems);
        if offered.is_empty() {
            println!("{}", style("No subsystems enabled, nothing to add").dim());
            return Ok(());
        }

        let mut items: Vec<String> = offered.iter().map(|t| format!("+ {}", t)).collect();
        items.push("Done".to_string());

        loop {
            let idx = Select::with_theme(&self.theme)
                .with_prompt("Add component")
                .items(&items)
                .default(items.len() - 1)
                .interact()
                .into_diagnostic()?;
            let Some(component_type) = offered.get(idx).copied() else {
                break;
            };

            let qty: u32 = Input::with_theme(&self.theme)
                .with_prompt("Quantity")
                .default(1)
                .interact_text()
                .into_diagnostic()?;
            let manufacturer = self.optional_text("Manufacturer")?;
            let model = self.optional_text("Model")?;

            let mut component = Component::new(component_type).with_qty(qty);
            component.manufacturer = manufacturer;
            component.model = model;
            println!("  {} {} x{}", style("✓").green(), component_type, component.qty);
            asset.add_component(component);
        }
        Ok(())
    }

    fn step_context(&self, asset: &mut Asset) -> Result<()> {
        self.header(4, "Operating context");

        let flags = EnvFlag::all();
        let picked = MultiSelect::with_theme(&self.theme)
            .with_prompt("Conditions that apply (space toggles)")
            .items(flags)
            .interact()
            .into_diagnostic()?;

        for i in picked {
            asset.environment.set(flags[i], true);
        }
        Ok(())
    }

    fn optional_text(&self, prompt: &str) -> Result<Option<String>> {
        let value: String = Input::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .into_diagnostic()?;
        let value = value.trim();
        Ok((!value.is_empty()).then(|| value.to_string()))
    }
}

/// Component types offered for quick-add given the enabled subsystems
pub fn quick_add_types(enabled: &SubsystemSet) -> Vec<ComponentType> {
    ComponentType::all()
        .iter()
        .copied()
        .filter(|t| enabled.contains(&t.default_subsystem()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quick_add_follows_enabled_subsystems() {
        let enabled: SubsystemSet = [Subsystem::Motors, Subsystem::Pneumatic].into_iter().collect();
        assert_eq!(
            quick_add_types(&enabled),
            vec![
                ComponentType::Motor,
                ComponentType::SolenoidValve,
                ComponentType::PneumaticCylinder
            ]
        );
    }

    #[test]
    fn test_quick_add_empty_when_nothing_enabled() {
        assert!(quick_add_types(&SubsystemSet::new()).is_empty());
    }

    #[test]
    fn test_every_type_is_offered_somewhere() {
        let all: SubsystemSet = Subsystem::all().iter().copied().collect();
        assert_eq!(quick_add_types(&all).len(), ComponentType::all().len());
    }
}
