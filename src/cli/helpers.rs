//! Shared helper functions for CLI commands

use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::core::identity::EntityId;

/// Truncate a string to `max_len` characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Write rendered output to a file, or to stdout when no path is given
pub fn write_output(content: &str, output_path: Option<&Path>) -> Result<()> {
    match output_path {
        Some(path) => {
            let file = File::create(path).into_diagnostic()?;
            let mut writer = BufWriter::new(file);
            writer.write_all(content.as_bytes()).into_diagnostic()?;
            writer.flush().into_diagnostic()?;
            eprintln!(
                "{} Written to {}",
                style("✓").green(),
                style(path.display()).cyan()
            );
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}

/// Output path for one asset when writing a batch into a directory
pub fn batch_output_path(dir: &Path, id: &EntityId, extension: &str) -> PathBuf {
    dir.join(format!("{}.pm.{}", id, extension))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("hi", 2), "hi");
    }

    #[test]
    fn test_truncate_str_multibyte() {
        assert_eq!(truncate_str("Pressure / ΔP Gauge", 14), "Pressure / ...");
        assert_eq!(truncate_str("ΔΔΔΔ", 4), "ΔΔΔΔ");
    }

    #[test]
    fn test_write_output_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.md");
        write_output("# Plan\n", Some(&path)).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# Plan\n");
    }

    #[test]
    fn test_batch_output_path() {
        let id: EntityId = "AST-01HC2JB7SMQX7RS1Y0GFKBHPTD".parse().unwrap();
        let path = batch_output_path(Path::new("out"), &id, "csv");
        assert_eq!(path, Path::new("out/AST-01HC2JB7SMQX7RS1Y0GFKBHPTD.pm.csv"));
    }
}
