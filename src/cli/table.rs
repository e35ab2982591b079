//! Table formatting for task lists, the catalog and asset listings
//!
//! Rows are built from typed cells so each output format can color or
//! escape them appropriately:
//! - TSV is padded and colored for terminals
//! - CSV goes through the `csv` writer (RFC 4180 quoting)
//! - Markdown uses `tabled`

use console::style;
use miette::{IntoDiagnostic, Result};
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::truncate_str;
use crate::cli::OutputFormat;
use crate::entities::asset::Criticality;
use crate::entities::task::{Frequency, Role};

/// Configuration for table output
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Show a count line after the table
    pub show_summary: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self { show_summary: true }
    }
}

impl TableConfig {
    /// Optimized for piping (no summary)
    pub fn for_pipe() -> Self {
        Self {
            show_summary: false,
        }
    }
}

/// A typed cell value with semantic meaning for formatting
#[derive(Debug, Clone)]
pub enum CellValue {
    /// Entity ID (shortened and cyan in TSV)
    Id(String),
    /// Plain text, truncated to the column width in TSV
    Text(String),
    /// Component type or other category label
    Type(String),
    /// Criticality tier with color coding
    Criticality(Criticality),
    /// Task frequency; highlighted when escalated above its base
    Frequency { value: Frequency, base: Frequency },
    /// Responsible role with color coding
    Role(Role),
    Number(usize),
    /// Yes/no indicator
    Flag(bool),
    Empty,
}

impl CellValue {
    /// Plain text value, no styling
    pub fn raw(&self) -> String {
        match self {
            CellValue::Id(s) | CellValue::Text(s) | CellValue::Type(s) => s.clone(),
            CellValue::Criticality(c) => c.to_string(),
            CellValue::Frequency { value, .. } => value.to_string(),
            CellValue::Role(r) => r.to_string(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Flag(true) => "yes".to_string(),
            CellValue::Flag(false) => "no".to_string(),
            CellValue::Empty => "-".to_string(),
        }
    }

    /// Width in characters of the TSV rendering
    pub fn display_width(&self) -> usize {
        match self {
            CellValue::Id(id) if id.len() > 16 => 16,
            _ => self.raw().chars().count(),
        }
    }

    /// Format for TSV output (with colors if terminal)
    pub fn format_tsv(&self, width: usize) -> String {
        match self {
            CellValue::Id(id) => {
                let display = truncate_str(id, 16);
                format!("{:<width$}", style(display).cyan(), width = width)
            }
            CellValue::Text(s) => {
                let truncated = truncate_str(s, width.saturating_sub(2));
                format!("{:<width$}", truncated, width = width)
            }
            CellValue::Type(t) => format!("{:<width$}", style(t).blue(), width = width),
            CellValue::Criticality(c) => {
                let s = c.to_string();
                let styled = match c {
                    Criticality::A => style(s).red().bold(),
                    Criticality::B => style(s).yellow(),
                    Criticality::C => style(s).dim(),
                };
                format!("{:<width$}", styled, width = width)
            }
            CellValue::Frequency { value, base } => {
                let s = value.to_string();
                let styled = if value != base {
                    style(s).yellow().bold()
                } else if value.is_anchor() {
                    style(s).magenta()
                } else {
                    style(s)
                };
                format!("{:<width$}", styled, width = width)
            }
            CellValue::Role(r) => {
                let s = r.to_string();
                let styled = match r {
                    Role::Technician => style(s),
                    Role::TeamLead => style(s).cyan(),
                    Role::Supervisor => style(s).magenta().bold(),
                };
                format!("{:<width$}", styled, width = width)
            }
            CellValue::Flag(true) => format!("{:<width$}", style("yes").red(), width = width),
            CellValue::Flag(false) => format!("{:<width$}", style("no").dim(), width = width),
            CellValue::Number(_) | CellValue::Empty => {
                format!("{:<width$}", self.raw(), width = width)
            }
        }
    }

    /// Format for a Markdown cell (pipes escaped)
    pub fn format_md(&self) -> String {
        match self {
            CellValue::Frequency { value, base } if value != base => {
                format!("**{}** (from {})", value, base)
            }
            _ => self.raw().replace('|', "\\|"),
        }
    }
}

/// Column definition for a table
#[derive(Debug, Clone, Copy)]
pub struct ColumnDef {
    pub key: &'static str,
    pub header: &'static str,
    /// Maximum TSV width
    pub width: usize,
}

impl ColumnDef {
    pub const fn new(key: &'static str, header: &'static str, width: usize) -> Self {
        Self { key, header, width }
    }
}

/// One table row as keyed cells
#[derive(Debug, Clone, Default)]
pub struct TableRow {
    cells: Vec<(&'static str, CellValue)>,
}

impl TableRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cell(mut self, key: &'static str, value: CellValue) -> Self {
        self.cells.push((key, value));
        self
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.cells.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }
}

/// Renders rows in the requested format
pub struct TableFormatter<'a> {
    columns: &'a [ColumnDef],
    noun: &'static str,
    config: TableConfig,
}

impl<'a> TableFormatter<'a> {
    /// `noun` is used in the summary line, e.g. "task" gives "12 task(s)"
    pub fn new(columns: &'a [ColumnDef], noun: &'static str) -> Self {
        Self {
            columns,
            noun,
            config: TableConfig::default(),
        }
    }

    pub fn with_config(mut self, config: TableConfig) -> Self {
        self.config = config;
        self
    }

    /// Render rows; formats without a tabular form fall back to TSV
    pub fn render(&self, rows: &[TableRow], format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Csv => self.render_csv(rows),
            OutputFormat::Md => Ok(self.render_md(rows)),
            _ => Ok(self.render_tsv(rows)),
        }
    }

    fn calculate_widths(&self, rows: &[TableRow]) -> Vec<usize> {
        self.columns
            .iter()
            .map(|col| {
                let max_content = rows
                    .iter()
                    .filter_map(|r| r.get(col.key))
                    .map(CellValue::display_width)
                    .max()
                    .unwrap_or(0);
                col.header
                    .len()
                    .max(max_content.saturating_add(2))
                    .min(col.width)
            })
            .collect()
    }

    fn render_tsv(&self, rows: &[TableRow]) -> String {
        let widths = self.calculate_widths(rows);
        let mut out = String::new();

        let header: Vec<String> = self
            .columns
            .iter()
            .zip(&widths)
            .map(|(col, w)| format!("{:<width$}", style(col.header).bold(), width = *w))
            .collect();
        out.push_str(header.join(" ").trim_end());
        out.push('\n');

        let total_width: usize = widths.iter().sum::<usize>() + widths.len().saturating_sub(1);
        out.push_str(&"-".repeat(total_width));
        out.push('\n');

        for row in rows {
            let parts: Vec<String> = self
                .columns
                .iter()
                .zip(&widths)
                .map(|(col, w)| match row.get(col.key) {
                    Some(value) => value.format_tsv(*w),
                    None => format!("{:<width$}", "-", width = *w),
                })
                .collect();
            out.push_str(parts.join(" ").trim_end());
            out.push('\n');
        }

        if self.config.show_summary {
            out.push('\n');
            out.push_str(&format!("{} {}(s)\n", style(rows.len()).cyan(), self.noun));
        }
        out
    }

    fn render_csv(&self, rows: &[TableRow]) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(self.columns.iter().map(|c| c.key))
            .into_diagnostic()?;
        for row in rows {
            writer
                .write_record(self.columns.iter().map(|c| {
                    row.get(c.key).map(CellValue::raw).unwrap_or_default()
                }))
                .into_diagnostic()?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| miette::miette!("CSV output failed: {}", e))?;
        String::from_utf8(bytes).into_diagnostic()
    }

    fn render_md(&self, rows: &[TableRow]) -> String {
        let mut builder = Builder::default();
        builder.push_record(self.columns.iter().map(|c| c.header.to_string()));
        for row in rows {
            builder.push_record(self.columns.iter().map(|c| {
                row.get(c.key)
                    .map(CellValue::format_md)
                    .unwrap_or_else(|| "-".to_string())
            }));
        }
        let mut out = builder.build().with(Style::markdown()).to_string();
        out.push('\n');
        out
    }
}
