//! `pmc asset` command - Asset management (context, subsystems, components)

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::table::{CellValue, ColumnDef, TableConfig, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::loader::{load_all_assets, load_asset, save_asset};
use crate::core::{Config, Project};
use crate::engine::{generate_for_asset, is_severe, severity};
use crate::entities::asset::{Asset, Criticality};
use crate::entities::component::{
    Component, ComponentAttributes, ComponentPatch, ComponentType, Subsystem,
};
use crate::entities::environment::EnvFlag;
use crate::schema::template::{TemplateContext, TemplateGenerator};
use crate::schema::wizard::{AssetWizard, WizardDefaults};

#[derive(Subcommand, Debug)]
pub enum AssetCommands {
    /// Create a new asset
    New(NewArgs),

    /// List assets in the project
    List(ListArgs),

    /// Show an asset's context and components
    Show(ShowArgs),

    /// Add a component to an asset
    AddComponent(AddComponentArgs),

    /// Change quantity, nameplate data or attributes of a component
    UpdateComponent(UpdateComponentArgs),

    /// Remove a component from an asset
    RemoveComponent(RemoveComponentArgs),

    /// Enable or disable a subsystem
    ToggleSubsystem(ToggleSubsystemArgs),

    /// Set or clear an environment / duty flag
    SetFlag(SetFlagArgs),

    /// Change the asset type, resetting subsystems to its defaults
    SetType(SetTypeArgs),
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Asset / system name
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Plant area
    #[arg(long)]
    pub area: Option<String>,

    /// Asset type (e.g. "Oven / Air House", "PT/ED Pump", "Paint Robot")
    #[arg(long = "type", short = 't')]
    pub asset_type: Option<String>,

    /// Criticality tier
    #[arg(long, short = 'c', value_enum, ignore_case = true)]
    pub criticality: Option<Criticality>,

    /// Environment / duty flag (repeatable)
    #[arg(long = "flag", value_enum)]
    pub flags: Vec<EnvFlag>,

    /// Enabled subsystem (repeatable, replaces the type defaults)
    #[arg(long = "subsystem", value_enum)]
    pub subsystems: Vec<Subsystem>,

    /// Describe the asset with the interactive wizard
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Only assets of this criticality
    #[arg(long, short = 'c', value_enum, ignore_case = true)]
    pub criticality: Option<Criticality>,

    /// Only assets whose type contains this text (case-insensitive)
    #[arg(long = "type", short = 't')]
    pub asset_type: Option<String>,

    /// Only assets in a severe operating context
    #[arg(long)]
    pub severe: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Asset ID, ID prefix or file path
    pub asset: String,
}

#[derive(clap::Args, Debug)]
pub struct AddComponentArgs {
    /// Asset ID, ID prefix or file path
    pub asset: String,

    /// Component type
    #[arg(long = "type", short = 't', value_enum)]
    pub component_type: ComponentType,

    /// Subsystem (default: the type's usual subsystem)
    #[arg(long, short = 's', value_enum)]
    pub subsystem: Option<Subsystem>,

    /// Installed quantity (0 is treated as 1)
    #[arg(long, default_value_t = 1)]
    pub qty: u32,

    #[arg(long)]
    pub manufacturer: Option<String>,

    #[arg(long)]
    pub model: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,

    /// Drive runs with speed/position feedback
    #[arg(long)]
    pub closed_loop: bool,

    /// Nameplate power in kW
    #[arg(long)]
    pub rated_power_kw: Option<f64>,
}

#[derive(clap::Args, Debug)]
pub struct UpdateComponentArgs {
    /// Asset ID, ID prefix or file path
    pub asset: String,

    /// Component ID or unique ID prefix
    pub component: String,

    #[arg(long)]
    pub qty: Option<u32>,

    #[arg(long)]
    pub manufacturer: Option<String>,

    #[arg(long)]
    pub model: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,

    /// Drive runs with speed/position feedback (true/false)
    #[arg(long)]
    pub closed_loop: Option<bool>,

    /// Nameplate power in kW
    #[arg(long)]
    pub rated_power_kw: Option<f64>,
}

#[derive(clap::Args, Debug)]
pub struct RemoveComponentArgs {
    /// Asset ID, ID prefix or file path
    pub asset: String,

    /// Component ID or unique ID prefix
    pub component: String,
}

#[derive(clap::Args, Debug)]
pub struct ToggleSubsystemArgs {
    /// Asset ID, ID prefix or file path
    pub asset: String,

    #[arg(value_enum)]
    pub subsystem: Subsystem,
}

#[derive(clap::Args, Debug)]
pub struct SetFlagArgs {
    /// Asset ID, ID prefix or file path
    pub asset: String,

    #[arg(value_enum)]
    pub flag: EnvFlag,

    /// Clear the flag instead of setting it
    #[arg(long)]
    pub off: bool,
}

#[derive(clap::Args, Debug)]
pub struct SetTypeArgs {
    /// Asset ID, ID prefix or file path
    pub asset: String,

    /// New asset type
    pub asset_type: String,
}

const ASSET_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 17),
    ColumnDef::new("name", "NAME", 32),
    ColumnDef::new("type", "TYPE", 20),
    ColumnDef::new("criticality", "CRIT", 6),
    ColumnDef::new("components", "CMPS", 6),
    ColumnDef::new("severe", "SEVERE", 8),
];

const COMPONENT_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 17),
    ColumnDef::new("type", "TYPE", 22),
    ColumnDef::new("subsystem", "SUBSYSTEM", 18),
    ColumnDef::new("qty", "QTY", 5),
    ColumnDef::new("make", "MAKE / MODEL", 28),
    ColumnDef::new("enabled", "ACTIVE", 8),
];

pub fn run(cmd: AssetCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        AssetCommands::New(args) => run_new(args, global),
        AssetCommands::List(args) => run_list(args, global),
        AssetCommands::Show(args) => run_show(args, global),
        AssetCommands::AddComponent(args) => run_add_component(args, global),
        AssetCommands::UpdateComponent(args) => run_update_component(args, global),
        AssetCommands::RemoveComponent(args) => run_remove_component(args, global),
        AssetCommands::ToggleSubsystem(args) => run_toggle_subsystem(args, global),
        AssetCommands::SetFlag(args) => run_set_flag(args, global),
        AssetCommands::SetType(args) => run_set_type(args, global),
    }
}

fn open_project(global: &GlobalOpts) -> Result<Project> {
    Project::open(global.project.as_deref()).map_err(|e| miette::miette!("{}", e))
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let config = Config::load_from(Some(project.root()));
    let asset_type = args.asset_type.unwrap_or_else(|| config.asset_type());
    let criticality = args.criticality.unwrap_or_else(|| config.criticality());

    let asset = if args.interactive {
        AssetWizard::new(WizardDefaults {
            author: config.author(),
            asset_type,
            criticality,
        })
        .run()?
    } else {
        let name = args.name.ok_or_else(|| {
            miette::miette!(
                help = "Pass --name, or use --interactive for the guided wizard",
                "Asset name is required"
            )
        })?;
        Asset::validate_name(&name).into_diagnostic()?;

        let mut asset = Asset::new(name.trim().to_string(), asset_type, criticality, config.author());
        asset.area = args.area.filter(|a| !a.trim().is_empty());
        for flag in args.flags {
            asset.environment.set(flag, true);
        }
        if !args.subsystems.is_empty() {
            asset.subsystems = args.subsystems.into_iter().collect();
        }
        asset
    };

    let path = project.asset_path(&asset.id);
    write_new_asset(&path, &asset)?;
    tracing::debug!(id = %asset.id, path = %path.display(), "created asset");

    if global.quiet {
        println!("{}", asset.id);
        return Ok(());
    }

    println!(
        "{} Created asset {}",
        style("✓").green(),
        style(&asset.id).cyan()
    );
    println!("   {}", style(path.display()).dim());
    println!("   Name: {}", style(&asset.name).yellow());
    println!(
        "   Type: {}  Criticality: {}",
        asset.asset_type, asset.criticality
    );
    let enabled: Vec<String> = asset.subsystems.iter().map(|s| s.to_string()).collect();
    println!("   Subsystems: {}", enabled.join(", "));

    if args.interactive {
        let tasks = generate_for_asset(&asset);
        println!();
        println!("{} {}", style("5)").bold(), style("Output").bold());
        println!(
            "   {} task(s). Run {} for the full list.",
            style(tasks.len()).cyan(),
            style(format!("pmc generate {}", asset.id)).yellow()
        );
    } else {
        println!();
        println!(
            "Next: {}",
            style(format!("pmc asset add-component {} --type <type>", asset.id)).yellow()
        );
    }
    Ok(())
}

/// New files come from the commented template; wizard output with
/// components is written as plain YAML.
fn write_new_asset(path: &Path, asset: &Asset) -> Result<()> {
    if !asset.components.is_empty() {
        return save_asset(path, asset);
    }
    let generator = TemplateGenerator::new().map_err(|e| miette::miette!("{}", e))?;
    let content = generator
        .generate_asset(&TemplateContext::from_asset(asset))
        .map_err(|e| miette::miette!("{}", e))?;
    fs::write(path, content).into_diagnostic()
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let config = Config::load_from(Some(project.root()));
    let format = global
        .format
        .resolve(config.default_format.as_deref(), OutputFormat::Tsv);

    let type_filter = args.asset_type.map(|t| t.to_lowercase());
    let assets: Vec<Asset> = load_all_assets(&project)
        .into_iter()
        .map(|(_, asset)| asset)
        .filter(|a| args.criticality.map_or(true, |c| a.criticality == c))
        .filter(|a| {
            type_filter
                .as_ref()
                .map_or(true, |t| a.asset_type.to_lowercase().contains(t))
        })
        .filter(|a| !args.severe || is_severe(&a.environment))
        .collect();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&assets).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&assets).into_diagnostic()?);
        }
        OutputFormat::Id => {
            for asset in &assets {
                println!("{}", asset.id);
            }
        }
        _ => {
            let rows: Vec<TableRow> = assets
                .iter()
                .map(|a| {
                    TableRow::new()
                        .cell("id", CellValue::Id(a.id.to_string()))
                        .cell("name", CellValue::Text(a.name.clone()))
                        .cell("type", CellValue::Type(a.asset_type.clone()))
                        .cell("criticality", CellValue::Criticality(a.criticality))
                        .cell("components", CellValue::Number(a.components.len()))
                        .cell("severe", CellValue::Flag(is_severe(&a.environment)))
                })
                .collect();
            let config = if global.quiet {
                TableConfig::for_pipe()
            } else {
                TableConfig::default()
            };
            let out = TableFormatter::new(ASSET_COLUMNS, "asset")
                .with_config(config)
                .render(&rows, format)?;
            print!("{}", out);
        }
    }
    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let (path, asset) = load_asset(&args.asset, global.project.as_deref())?;

    match global.format {
        OutputFormat::Yaml => {
            print!("{}", fs::read_to_string(&path).into_diagnostic()?);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&asset).into_diagnostic()?);
        }
        OutputFormat::Id => {
            println!("{}", asset.id);
        }
        format => print_asset(&asset, &path, format)?,
    }
    Ok(())
}

fn print_asset(asset: &Asset, path: &Path, format: OutputFormat) -> Result<()> {
    println!("{}", style("─".repeat(60)).dim());
    println!("{}: {}", style("ID").bold(), style(&asset.id).cyan());
    println!("{}: {}", style("Name").bold(), style(&asset.name).yellow());
    if let Some(ref area) = asset.area {
        println!("{}: {}", style("Area").bold(), area);
    }
    println!("{}: {}", style("Type").bold(), asset.asset_type);
    println!("{}: {}", style("Criticality").bold(), asset.criticality);
    println!("{}: {}", style("Author").bold(), asset.author);
    println!(
        "{}: {}",
        style("Created").bold(),
        asset.created.format("%Y-%m-%d %H:%M")
    );
    println!("{}", style(path.display()).dim());
    println!("{}", style("─".repeat(60)).dim());

    println!();
    println!("{}", style("Subsystems").bold());
    for subsystem in Subsystem::all() {
        if asset.is_enabled(*subsystem) {
            println!("  {} {}", style("✓").green(), subsystem);
        } else {
            println!("  {} {}", style("·").dim(), style(subsystem).dim());
        }
    }

    println!();
    println!("{}", style("Operating context").bold());
    if asset.environment.is_empty() {
        println!("  {}", style("(no flags set)").dim());
    }
    for flag in asset.environment.iter() {
        if flag.affects_severity() {
            println!("  {} {} {}", style("!").yellow(), flag, style("(severe)").yellow());
        } else {
            println!("  {} {}", style("·").dim(), flag);
        }
    }
    let triggering = severity::triggering_flags(&asset.environment);
    if !triggering.is_empty() {
        println!(
            "  {}",
            style("Calendar frequencies are escalated one step").dim()
        );
    }

    println!();
    println!("{}", style("Components").bold());
    if asset.components.is_empty() {
        println!("  {}", style("(none)").dim());
        return Ok(());
    }
    let rows: Vec<TableRow> = asset.components.iter().map(|c| component_row(asset, c)).collect();
    let out = TableFormatter::new(COMPONENT_COLUMNS, "component").render(&rows, format)?;
    print!("{}", out);
    Ok(())
}

fn component_row(asset: &Asset, c: &Component) -> TableRow {
    let make = match (&c.manufacturer, &c.model) {
        (Some(m), Some(n)) => CellValue::Text(format!("{} {}", m, n)),
        (Some(m), None) | (None, Some(m)) => CellValue::Text(m.clone()),
        (None, None) => CellValue::Empty,
    };
    TableRow::new()
        .cell("id", CellValue::Id(c.id.to_string()))
        .cell("type", CellValue::Type(c.component_type.to_string()))
        .cell("subsystem", CellValue::Text(c.subsystem.to_string()))
        .cell("qty", CellValue::Number(c.qty as usize))
        .cell("make", make)
        .cell("enabled", CellValue::Flag(asset.is_enabled(c.subsystem)))
}

/// Load, apply an edit, then write the asset back
fn edit_asset<F>(reference: &str, global: &GlobalOpts, edit: F) -> Result<(PathBuf, Asset)>
where
    F: FnOnce(&mut Asset) -> Result<()>,
{
    let (path, mut asset) = load_asset(reference, global.project.as_deref())?;
    edit(&mut asset)?;
    save_asset(&path, &asset)?;
    tracing::debug!(id = %asset.id, path = %path.display(), "saved asset");
    Ok((path, asset))
}

fn run_add_component(args: AddComponentArgs, global: &GlobalOpts) -> Result<()> {
    let subsystem = args
        .subsystem
        .unwrap_or_else(|| args.component_type.default_subsystem());
    let mut component = Component::in_subsystem(args.component_type, subsystem)
        .with_qty(args.qty)
        .with_attributes(ComponentAttributes {
            closed_loop: args.closed_loop,
            rated_power_kw: args.rated_power_kw,
        });
    component.manufacturer = args.manufacturer;
    component.model = args.model;
    component.notes = args.notes;
    let component_id = component.id.clone();

    let (_, asset) = edit_asset(&args.asset, global, |asset| {
        asset.add_component(component);
        Ok(())
    })?;

    if global.quiet {
        println!("{}", component_id);
        return Ok(());
    }
    println!(
        "{} Added {} {} to {}",
        style("✓").green(),
        args.component_type,
        style(&component_id).cyan(),
        style(&asset.name).yellow()
    );
    if !asset.is_enabled(subsystem) {
        println!(
            "{} Subsystem {} is disabled; this component adds no tasks until it is enabled",
            style("!").yellow(),
            style(subsystem).cyan()
        );
    }
    Ok(())
}

fn run_update_component(args: UpdateComponentArgs, global: &GlobalOpts) -> Result<()> {
    let patch = ComponentPatch {
        qty: args.qty,
        manufacturer: args.manufacturer,
        model: args.model,
        notes: args.notes,
        closed_loop: args.closed_loop,
        rated_power_kw: args.rated_power_kw,
    };
    let component = args.component.clone();
    edit_asset(&args.asset, global, |asset| {
        asset.update_component(&component, patch).into_diagnostic()
    })?;

    if !global.quiet {
        println!("{} Updated component {}", style("✓").green(), style(&args.component).cyan());
    }
    Ok(())
}

fn run_remove_component(args: RemoveComponentArgs, global: &GlobalOpts) -> Result<()> {
    let mut removed = None;
    edit_asset(&args.asset, global, |asset| {
        removed = Some(asset.remove_component(&args.component).into_diagnostic()?);
        Ok(())
    })?;

    if let (Some(component), false) = (removed, global.quiet) {
        println!(
            "{} Removed {} {}",
            style("✓").green(),
            component.component_type,
            style(&component.id).cyan()
        );
    }
    Ok(())
}

fn run_toggle_subsystem(args: ToggleSubsystemArgs, global: &GlobalOpts) -> Result<()> {
    let mut enabled = false;
    edit_asset(&args.asset, global, |asset| {
        enabled = asset.toggle_subsystem(args.subsystem);
        Ok(())
    })?;

    if !global.quiet {
        let state = if enabled {
            style("enabled").green()
        } else {
            style("disabled").red()
        };
        println!("{} {} {}", style("✓").green(), args.subsystem, state);
    }
    Ok(())
}

fn run_set_flag(args: SetFlagArgs, global: &GlobalOpts) -> Result<()> {
    let on = !args.off;
    let (_, asset) = edit_asset(&args.asset, global, |asset| {
        asset.environment.set(args.flag, on);
        Ok(())
    })?;

    if !global.quiet {
        let verb = if on { "Set" } else { "Cleared" };
        println!("{} {} {}", style("✓").green(), verb, args.flag);
        if args.flag.affects_severity() || is_severe(&asset.environment) {
            let context = if is_severe(&asset.environment) {
                style("severe").yellow()
            } else {
                style("mild").green()
            };
            println!("  Operating context is now {}", context);
        }
    }
    Ok(())
}

fn run_set_type(args: SetTypeArgs, global: &GlobalOpts) -> Result<()> {
    let (_, asset) = edit_asset(&args.asset, global, |asset| {
        asset.set_asset_type(args.asset_type.trim());
        Ok(())
    })?;

    if !global.quiet {
        let enabled: Vec<String> = asset.subsystems.iter().map(|s| s.to_string()).collect();
        println!(
            "{} Type set to {}; subsystems reset to {}",
            style("✓").green(),
            style(&asset.asset_type).yellow(),
            enabled.join(", ")
        );
    }
    Ok(())
}
