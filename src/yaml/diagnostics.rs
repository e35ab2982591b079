//! YAML error diagnostics for asset files
//!
//! Errors carry the byte span reported by `serde_yml` and a hint tuned to the
//! mistakes people make when hand-editing assets: misspelled subsystems,
//! flags and component types, wrong criticality case, missing fields.

use miette::{Diagnostic, NamedSource, SourceSpan};
use serde::Serialize;
use thiserror::Error;

use crate::entities::component::{ComponentType, Subsystem};
use crate::entities::environment::EnvFlag;

/// Asset file that failed to parse, with source location
#[derive(Debug, Error, Diagnostic)]
#[error("Invalid asset YAML: {message}")]
#[diagnostic(code(pmc::yaml::syntax))]
pub struct YamlSyntaxError {
    #[source_code]
    src: NamedSource<String>,

    #[label("here")]
    span: SourceSpan,

    #[help]
    help: Option<String>,

    message: String,
}

impl YamlSyntaxError {
    pub fn from_serde_error(err: &serde_yml::Error, source: &str, filename: &str) -> Self {
        let offset = err
            .location()
            .map(|loc| loc.index())
            .unwrap_or(0)
            .min(source.len().saturating_sub(1));
        let message = err.to_string();

        Self {
            src: NamedSource::new(filename, source.to_string()),
            span: SourceSpan::from(offset..offset.saturating_add(1)),
            help: asset_help(&message),
            message,
        }
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum YamlError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] YamlSyntaxError),

    #[error("Cannot read {path}: {source}")]
    #[diagnostic(code(pmc::yaml::io))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// The field a serde error points at, e.g. `components[0].type`
fn field_path(message: &str) -> Option<&str> {
    let (path, _) = message.split_once(": ")?;
    (!path.contains(' ')).then_some(path)
}

/// Last path segment without list indices: `components[0].type` -> `type`
fn leaf(path: &str) -> &str {
    let last = path.rsplit('.').next().unwrap_or(path);
    last.split('[').next().unwrap_or(last)
}

/// Kebab-case spellings accepted in asset files
fn spellings<T: Serialize>(values: &[T]) -> String {
    values
        .iter()
        .filter_map(|v| serde_json::to_value(v).ok())
        .filter_map(|v| v.as_str().map(str::to_string))
        .collect::<Vec<_>>()
        .join(", ")
}

fn asset_help(message: &str) -> Option<String> {
    let lower = message.to_lowercase();
    let path = field_path(message).unwrap_or("");
    let in_components = path.starts_with("components");

    if lower.contains("unknown variant") {
        let hint = match leaf(path) {
            "subsystems" | "subsystem" => format!(
                "Subsystems are: {}. `pmc asset toggle-subsystem` edits them without typos",
                spellings(Subsystem::all())
            ),
            "environment" => format!(
                "Environment flags are: {}. `pmc asset set-flag` edits them without typos",
                spellings(EnvFlag::all())
            ),
            "type" if in_components => format!(
                "Component types are: {}. Run `pmc catalog` to see which ones have tasks",
                spellings(ComponentType::all())
            ),
            "criticality" => "Criticality is A, B or C, in upper case".to_string(),
            _ => "Enumerated values are kebab-case, e.g. `io-module`, `high-temperature`".to_string(),
        };
        return Some(hint);
    }

    if lower.contains("missing field") {
        return Some(if in_components {
            "Each component needs `id`, `type` and `subsystem`; \
             `pmc asset add-component` fills them in"
                .to_string()
        } else {
            "Asset files need `id`, `name`, `type`, `created` and `author`; \
             `pmc asset new` writes a complete file"
                .to_string()
        });
    }

    if leaf(path) == "qty" {
        return Some("`qty` is a whole number, 1 or more".to_string());
    }

    if leaf(path) == "id" {
        return Some("IDs look like AST-01J... for assets and CMP-01J... for components".to_string());
    }

    if lower.contains("invalid type: sequence") && matches!(leaf(path), "" | "components") {
        return Some("Components are a list of mappings, each starting with `- id:`".to_string());
    }

    if lower.contains("tab") {
        return Some("Indent with spaces; YAML does not allow tabs".to_string());
    }

    if lower.contains("duplicate") {
        return Some("A key appears twice in the same mapping; keep one".to_string());
    }

    if lower.contains("mapping values are not allowed") || lower.contains("expected block end") {
        return Some(
            "Check indentation, and quote values that contain ':' (e.g. area: \"Line 2: paint\")"
                .to_string(),
        );
    }

    None
}
