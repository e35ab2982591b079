//! `pmc catalog` command - Browse the rule catalog

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use crate::cli::table::{CellValue, ColumnDef, TableConfig, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::engine::catalog;
use crate::entities::component::ComponentType;
use crate::entities::task::{Frequency, Method};

#[derive(clap::Args, Debug)]
pub struct CatalogArgs {
    /// Only templates for this component type
    #[arg(long = "type", short = 't', value_enum)]
    pub component_type: Option<ComponentType>,

    /// List component types with no catalog entries
    #[arg(long)]
    pub unsupported: bool,
}

const CATALOG_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("type", "TYPE", 22),
    ColumnDef::new("method", "METHOD", 18),
    ColumnDef::new("base", "BASE", 14),
    ColumnDef::new("condition", "CONDITION", 20),
    ColumnDef::new("task", "TASK", 50),
];

#[derive(Debug, Serialize)]
struct CatalogEntry {
    component_type: ComponentType,
    task: &'static str,
    method: Method,
    frequency: Frequency,
    acceptance: &'static str,
    rationale: &'static str,
    condition: String,
}

pub fn run(args: CatalogArgs, global: &GlobalOpts) -> Result<()> {
    if args.unsupported {
        for ty in ComponentType::all().iter().filter(|t| !catalog::is_supported(**t)) {
            println!("{}", ty);
        }
        return Ok(());
    }

    let entries: Vec<CatalogEntry> = catalog::entries()
        .filter(|(ty, _)| args.component_type.map_or(true, |wanted| wanted == *ty))
        .map(|(ty, t)| CatalogEntry {
            component_type: ty,
            task: t.task,
            method: t.method,
            frequency: t.frequency,
            acceptance: t.acceptance,
            rationale: t.rationale,
            condition: t.applies.to_string(),
        })
        .collect();

    if entries.is_empty() {
        if let (Some(ty), false) = (args.component_type, global.quiet) {
            println!(
                "{} {} has no catalog entries and generates no tasks",
                style("!").yellow(),
                style(ty).cyan()
            );
        }
        return Ok(());
    }

    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&entries).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&entries).into_diagnostic()?);
        }
        format => {
            let rows: Vec<TableRow> = entries
                .iter()
                .map(|e| {
                    TableRow::new()
                        .cell("type", CellValue::Type(e.component_type.to_string()))
                        .cell("method", CellValue::Text(e.method.to_string()))
                        .cell(
                            "base",
                            CellValue::Frequency {
                                value: e.frequency,
                                base: e.frequency,
                            },
                        )
                        .cell("condition", CellValue::Text(e.condition.clone()))
                        .cell("task", CellValue::Text(e.task.to_string()))
                })
                .collect();
            let config = if global.quiet {
                TableConfig::for_pipe()
            } else {
                TableConfig::default()
            };
            let out = TableFormatter::new(CATALOG_COLUMNS, "template")
                .with_config(config)
                .render(&rows, format)?;
            print!("{}", out);
        }
    }
    Ok(())
}
