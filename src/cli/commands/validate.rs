//! `pmc validate` command - Validate asset files against the schema

use console::style;
use miette::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::cli::GlobalOpts;
use crate::core::project::{Project, ASSET_EXTENSION};
use crate::engine::catalog;
use crate::entities::asset::Asset;
use crate::schema::registry::SchemaRegistry;
use crate::schema::validator::{prefix_for, Outcome, Validator};

#[derive(clap::Args, Debug)]
pub struct ValidateArgs {
    /// Files or directories to validate (default: every asset in the project)
    #[arg()]
    pub paths: Vec<PathBuf>,

    /// Strict mode - warnings become errors
    #[arg(long)]
    pub strict: bool,

    /// Continue validation after first error
    #[arg(long)]
    pub keep_going: bool,

    /// Show summary only, don't show individual errors
    #[arg(long)]
    pub summary: bool,
}

#[derive(Default)]
struct ValidationStats {
    files_checked: usize,
    files_passed: usize,
    files_failed: usize,
    total_errors: usize,
    total_warnings: usize,
}

pub fn run(args: ValidateArgs, global: &GlobalOpts) -> Result<()> {
    let files = if args.paths.is_empty() {
        let project =
            Project::open(global.project.as_deref()).map_err(|e| miette::miette!("{}", e))?;
        project.iter_asset_files().collect()
    } else {
        expand_paths(&args.paths)
    };

    let validator = Validator::new(&SchemaRegistry::default());
    let mut stats = ValidationStats::default();
    let show_files = !args.summary && !global.quiet;

    if show_files {
        println!("{} Validating {} file(s)...\n", style("→").blue(), files.len());
    }

    for path in &files {
        stats.files_checked += 1;
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                if show_files {
                    println!("{} {} - {}", style("✗").red(), path.display(), e);
                }
                stats.files_failed += 1;
                stats.total_errors += 1;
                if !args.keep_going {
                    break;
                }
                continue;
            }
        };
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        let Some(prefix) = prefix_for(&filename) else {
            if show_files {
                println!("{} {} (not an asset file, skipped)", style("?").yellow(), path.display());
            }
            continue;
        };

        match validator.validate(&content, &filename, prefix) {
            Ok(Outcome::Skipped) => {
                if show_files {
                    println!("{} {} (no schema, skipped)", style("?").yellow(), path.display());
                }
            }
            Ok(Outcome::Valid) => {
                let warnings = check_asset(&content);
                if warnings.is_empty() {
                    stats.files_passed += 1;
                    if show_files {
                        println!("{} {}", style("✓").green(), path.display());
                    }
                    continue;
                }

                stats.total_warnings += warnings.len();
                if show_files {
                    println!(
                        "{} {} - {} warning(s)",
                        style("!").yellow(),
                        path.display(),
                        warnings.len()
                    );
                    for warning in &warnings {
                        println!("    {}", style(warning).yellow());
                    }
                }
                if args.strict {
                    stats.files_failed += 1;
                    if !args.keep_going {
                        break;
                    }
                } else {
                    stats.files_passed += 1;
                }
            }
            Err(e) => {
                stats.files_failed += 1;
                stats.total_errors += e.violation_count();
                tracing::debug!(path = %path.display(), errors = e.violation_count(), "schema validation failed");

                if show_files {
                    println!(
                        "{} {} - {} error(s)",
                        style("✗").red(),
                        path.display(),
                        e.violation_count()
                    );
                    println!("{:?}", miette::Report::new(e));
                }
                if !args.keep_going {
                    break;
                }
            }
        }
    }

    if !global.quiet {
        print_summary(&stats);
    }

    if stats.files_failed > 0 {
        Err(miette::miette!(
            "Validation failed: {} file(s) with errors",
            stats.files_failed
        ))
    } else {
        Ok(())
    }
}

/// Findings on a schema-valid asset that do not make it invalid
fn check_asset(content: &str) -> Vec<String> {
    let Ok(asset) = serde_yml::from_str::<Asset>(content) else {
        return vec!["file matches the schema but could not be loaded as an asset".to_string()];
    };

    let mut warnings = Vec::new();
    for component in &asset.components {
        if !asset.is_enabled(component.subsystem) {
            warnings.push(format!(
                "{} {} is in disabled subsystem {} and generates no tasks",
                component.component_type, component.id, component.subsystem
            ));
        } else if !catalog::is_supported(component.component_type) {
            warnings.push(format!(
                "{} {} has no catalog entries and generates no tasks",
                component.component_type, component.id
            ));
        }
    }
    warnings
}

fn print_summary(stats: &ValidationStats) {
    println!();
    println!("{}", style("─".repeat(60)).dim());
    println!("{}", style("Validation Summary").bold());
    println!("{}", style("─".repeat(60)).dim());
    println!("  Files checked:  {}", style(stats.files_checked).cyan());
    println!("  Files passed:   {}", style(stats.files_passed).green());
    println!("  Files failed:   {}", style(stats.files_failed).red());
    println!("  Total errors:   {}", style(stats.total_errors).red());
    if stats.total_warnings > 0 {
        println!("  Total warnings: {}", style(stats.total_warnings).yellow());
    }
    println!();

    if stats.files_failed == 0 {
        println!("{} All files passed validation!", style("✓").green().bold());
    }
}

/// Expand directories into the asset files below them
fn expand_paths(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            files.extend(
                WalkDir::new(path)
                    .sort_by_file_name()
                    .into_iter()
                    .filter_map(|e| e.ok())
                    .filter(|e| e.file_type().is_file())
                    .map(|e| e.into_path())
                    .filter(|p| is_asset_file(p)),
            );
        } else {
            files.push(path.clone());
        }
    }
    files
}

fn is_asset_file(path: &Path) -> bool {
    path.to_string_lossy().ends_with(ASSET_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::asset::Criticality;
    use crate::entities::component::{Component, ComponentType, Subsystem};
    use tempfile::tempdir;

    fn asset_yaml(components: Vec<Component>) -> String {
        let mut asset = Asset::new(
            "Line 2 conveyor".to_string(),
            "Conveyor".to_string(),
            Criticality::C,
            "test".to_string(),
        );
        asset.subsystems = [Subsystem::Motors, Subsystem::Control].into_iter().collect();
        for c in components {
            asset.add_component(c);
        }
        serde_yml::to_string(&asset).unwrap()
    }

    #[test]
    fn test_clean_asset_has_no_warnings() {
        let yaml = asset_yaml(vec![Component::new(ComponentType::Motor)]);
        assert!(check_asset(&yaml).is_empty());
    }

    #[test]
    fn test_disabled_and_unsupported_components_warn() {
        let yaml = asset_yaml(vec![
            Component::new(ComponentType::Vfd),
            Component::new(ComponentType::Hmi),
        ]);
        let warnings = check_asset(&yaml);
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().any(|w| w.contains("disabled subsystem")));
        assert!(warnings.iter().any(|w| w.contains("no catalog entries")));
    }

    #[test]
    fn test_expand_paths_walks_directories() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("a.pmc.yaml"), "").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub/b.pmc.yaml"), "").unwrap();

        let files = expand_paths(&[dir.path().to_path_buf()]);
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|p| is_asset_file(p)));
    }
}
