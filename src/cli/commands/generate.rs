//! `pmc generate` command - PM task list for one or all assets

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

use crate::cli::helpers::{batch_output_path, write_output};
use crate::cli::table::{CellValue, ColumnDef, TableConfig, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::identity::EntityId;
use crate::core::loader::{load_all_assets, load_asset};
use crate::core::{Config, Project};
use crate::engine::{generate_for_asset, severity, summarize, TaskSummary};
use crate::entities::asset::{Asset, Criticality};
use crate::entities::environment::EnvFlag;
use crate::entities::task::PmTask;

#[derive(clap::Args, Debug)]
pub struct GenerateArgs {
    /// Asset ID, ID prefix or file path
    #[arg(required_unless_present = "all", conflicts_with = "all")]
    pub asset: Option<String>,

    /// Generate for every asset in the project
    #[arg(long)]
    pub all: bool,

    /// Write to a file (with --all: a directory, one file per asset)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Only tasks whose frequency was escalated
    #[arg(long)]
    pub escalated_only: bool,
}

const TASK_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("component", "COMPONENT", 22),
    ColumnDef::new("task", "TASK", 44),
    ColumnDef::new("frequency", "FREQUENCY", 14),
    ColumnDef::new("method", "METHOD", 18),
    ColumnDef::new("acceptance", "ACCEPTANCE", 40),
    ColumnDef::new("role", "ROLE", 12),
    ColumnDef::new("rationale", "RATIONALE", 40),
];

/// Machine-readable plan for one asset
#[derive(Debug, Serialize)]
struct PmPlan<'a> {
    asset: &'a EntityId,
    name: &'a str,
    asset_type: &'a str,
    criticality: Criticality,
    severe: bool,
    triggering_flags: Vec<EnvFlag>,
    tasks: Vec<PmTask>,
    summary: TaskSummary,
}

impl<'a> PmPlan<'a> {
    fn build(asset: &'a Asset, escalated_only: bool) -> Self {
        let mut tasks = generate_for_asset(asset);
        if escalated_only {
            tasks.retain(PmTask::is_escalated);
        }
        let triggering_flags = severity::triggering_flags(&asset.environment);
        Self {
            asset: &asset.id,
            name: &asset.name,
            asset_type: &asset.asset_type,
            criticality: asset.criticality,
            severe: !triggering_flags.is_empty(),
            triggering_flags,
            summary: summarize(&tasks),
            tasks,
        }
    }
}

pub fn run(args: GenerateArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load_from(global.project.as_deref());
    let format = global
        .format
        .resolve(config.default_format.as_deref(), OutputFormat::Tsv);

    if args.output.is_some() {
        console::set_colors_enabled(false);
    }

    if args.all {
        return run_all(&args, format, global);
    }

    let reference = args
        .asset
        .as_deref()
        .ok_or_else(|| miette::miette!("Specify an asset or use --all"))?;
    let (path, asset) = load_asset(reference, global.project.as_deref())?;
    tracing::debug!(id = %asset.id, path = %path.display(), "generating plan");

    let plan = PmPlan::build(&asset, args.escalated_only);
    if plan.tasks.is_empty() && !global.quiet {
        eprintln!(
            "{} No tasks for {}: no enabled component has catalog entries",
            style("!").yellow(),
            style(&asset.name).yellow()
        );
    }
    let content = render_plan(&plan, format, global.quiet)?;
    write_output(&content, args.output.as_deref())
}

fn run_all(args: &GenerateArgs, format: OutputFormat, global: &GlobalOpts) -> Result<()> {
    let project = Project::open(global.project.as_deref()).map_err(|e| miette::miette!("{}", e))?;
    let assets: Vec<Asset> = load_all_assets(&project)
        .into_iter()
        .map(|(_, asset)| asset)
        .collect();

    if assets.is_empty() {
        if !global.quiet {
            eprintln!("No assets found in {}", project.assets_dir().display());
        }
        return Ok(());
    }

    let plans: Vec<PmPlan> = assets
        .iter()
        .map(|a| PmPlan::build(a, args.escalated_only))
        .collect();

    match &args.output {
        Some(dir) => {
            fs::create_dir_all(dir).into_diagnostic()?;
            for plan in &plans {
                let path = batch_output_path(dir, plan.asset, extension(format));
                let content = render_plan(plan, format, global.quiet)?;
                write_output(&content, Some(&path))?;
            }
        }
        None => match format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&plans).into_diagnostic()?);
            }
            OutputFormat::Yaml => {
                print!("{}", serde_yml::to_string(&plans).into_diagnostic()?);
            }
            _ => {
                let rendered = plans
                    .iter()
                    .map(|plan| render_plan(plan, format, global.quiet))
                    .collect::<Result<Vec<_>>>()?;
                print!("{}", rendered.join("\n"));
            }
        },
    }

    if !global.quiet {
        let total: usize = plans.iter().map(|p| p.tasks.len()).sum();
        eprintln!(
            "{} {} task(s) across {} asset(s)",
            style("✓").green(),
            style(total).cyan(),
            plans.len()
        );
    }
    Ok(())
}

fn extension(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Json => "json",
        OutputFormat::Yaml => "yaml",
        OutputFormat::Md => "md",
        OutputFormat::Csv => "csv",
        _ => "tsv",
    }
}

fn task_rows(tasks: &[PmTask]) -> Vec<TableRow> {
    tasks
        .iter()
        .map(|t| {
            TableRow::new()
                .cell("component", CellValue::Type(t.component_type.to_string()))
                .cell("task", CellValue::Text(t.task.clone()))
                .cell(
                    "frequency",
                    CellValue::Frequency {
                        value: t.frequency,
                        base: t.base_frequency,
                    },
                )
                .cell("method", CellValue::Text(t.method.to_string()))
                .cell("acceptance", CellValue::Text(t.acceptance.clone()))
                .cell("role", CellValue::Role(t.role))
                .cell("rationale", CellValue::Text(t.rationale.clone()))
        })
        .collect()
}

fn context_label(plan: &PmPlan) -> String {
    if plan.severe {
        let flags: Vec<String> = plan.triggering_flags.iter().map(|f| f.to_string()).collect();
        format!("severe ({})", flags.join(", "))
    } else {
        "mild".to_string()
    }
}

fn render_plan(plan: &PmPlan, format: OutputFormat, quiet: bool) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let mut out = serde_json::to_string_pretty(plan).into_diagnostic()?;
            out.push('\n');
            Ok(out)
        }
        OutputFormat::Yaml => serde_yml::to_string(plan).into_diagnostic(),
        OutputFormat::Md => render_md(plan),
        OutputFormat::Csv => {
            TableFormatter::new(TASK_COLUMNS, "task").render(&task_rows(&plan.tasks), format)
        }
        _ => render_tsv(plan, quiet),
    }
}

fn render_tsv(plan: &PmPlan, quiet: bool) -> Result<String> {
    let rows = task_rows(&plan.tasks);
    if quiet {
        return TableFormatter::new(TASK_COLUMNS, "task")
            .with_config(TableConfig::for_pipe())
            .render(&rows, OutputFormat::Tsv);
    }

    let mut out = format!(
        "{} {}  {}  criticality {}  {}\n\n",
        style(plan.asset).cyan(),
        style(plan.name).yellow().bold(),
        plan.asset_type,
        plan.criticality,
        context_label(plan)
    );
    out.push_str(&TableFormatter::new(TASK_COLUMNS, "task").render(&rows, OutputFormat::Tsv)?);
    if plan.summary.escalated > 0 {
        out.push_str(&format!(
            "{} escalated one step for the operating context\n",
            style(plan.summary.escalated).yellow()
        ));
    }
    Ok(out)
}

fn render_md(plan: &PmPlan) -> Result<String> {
    let mut out = String::new();
    out.push_str(&format!("# PM plan: {}\n\n", plan.name));
    out.push_str(&format!("- **Asset:** `{}`\n", plan.asset));
    out.push_str(&format!("- **Type:** {}\n", plan.asset_type));
    out.push_str(&format!("- **Criticality:** {}\n", plan.criticality));
    out.push_str(&format!("- **Operating context:** {}\n\n", context_label(plan)));

    out.push_str(&TableFormatter::new(TASK_COLUMNS, "task").render(&task_rows(&plan.tasks), OutputFormat::Md)?);

    let summary = &plan.summary;
    out.push_str("\n## Summary\n\n");
    out.push_str(&format!("- **Tasks:** {}\n", summary.total));
    out.push_str(&format!("- **Escalated:** {}\n", summary.escalated));
    for (role, n) in &summary.by_role {
        out.push_str(&format!("- **{}:** {}\n", role, n));
    }
    let cadence: Vec<String> = summary
        .by_frequency
        .iter()
        .map(|(f, n)| format!("{} {}", n, f))
        .collect();
    if !cadence.is_empty() {
        out.push_str(&format!("- **By frequency:** {}\n", cadence.join(", ")));
    }
    Ok(out)
}
