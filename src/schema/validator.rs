//! Schema validation with detailed error reporting

use jsonschema::error::ValidationErrorKind;
use jsonschema::{validator_for, ValidationError as JsonSchemaError, Validator as JsonValidator};
use miette::{Diagnostic, NamedSource, SourceSpan};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use thiserror::Error;

use crate::core::project::ASSET_EXTENSION;
use crate::core::EntityPrefix;
use crate::schema::registry::SchemaRegistry;

/// Validation error with source location information
#[derive(Debug, Error, Diagnostic)]
#[error("Schema validation failed: {summary}")]
#[diagnostic(code(pmc::schema::validation_error))]
pub struct ValidationError {
    summary: String,

    #[source_code]
    src: NamedSource<String>,

    #[related]
    violations: Vec<SchemaViolation>,
}

/// A single schema violation
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
pub struct SchemaViolation {
    #[label("{}", self.hint)]
    span: SourceSpan,

    message: String,
    hint: String,

    #[help]
    help: Option<String>,
}

impl SchemaViolation {
    pub fn new(message: String, hint: String, span: SourceSpan, help: Option<String>) -> Self {
        Self {
            span,
            message,
            hint,
            help,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl ValidationError {
    pub fn new(filename: &str, source: &str, violations: Vec<SchemaViolation>) -> Self {
        let count = violations.len();
        let summary = if count == 1 {
            "1 error".to_string()
        } else {
            format!("{} errors", count)
        };
        Self {
            summary,
            src: NamedSource::new(filename, source.to_string()),
            violations,
        }
    }

    pub fn violation_count(&self) -> usize {
        self.violations.len()
    }

    pub fn violations(&self) -> &[SchemaViolation] {
        &self.violations
    }
}

/// Why a file was or was not checked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Valid,
    /// No schema applies to this file
    Skipped,
}

/// Schema validator with compiled schemas
pub struct Validator {
    compiled: HashMap<EntityPrefix, JsonValidator>,
}

impl Validator {
    /// Compile every schema in the registry
    pub fn new(registry: &SchemaRegistry) -> Self {
        let mut compiled = HashMap::new();

        for prefix in registry.prefixes() {
            let Some(schema_str) = registry.get(prefix) else {
                continue;
            };
            let schema_json = match serde_json::from_str::<JsonValue>(schema_str) {
                Ok(json) => json,
                Err(e) => {
                    tracing::warn!(%prefix, "schema is not valid JSON: {}", e);
                    continue;
                }
            };
            match validator_for(&schema_json) {
                Ok(validator) => {
                    compiled.insert(prefix, validator);
                }
                Err(e) => tracing::warn!(%prefix, "schema failed to compile: {}", e),
            }
        }

        Self { compiled }
    }

    /// Validate YAML content, collecting every violation
    pub fn validate(
        &self,
        content: &str,
        filename: &str,
        prefix: EntityPrefix,
    ) -> Result<Outcome, ValidationError> {
        let yaml_value: serde_yml::Value = match serde_yml::from_str(content) {
            Ok(v) => v,
            Err(e) => {
                let span = find_error_span(content, e.location());
                let violation = SchemaViolation::new(
                    format!("YAML parse error: {}", e),
                    "invalid YAML".to_string(),
                    span,
                    Some("Check YAML syntax - proper indentation, colons, quotes".to_string()),
                );
                return Err(ValidationError::new(filename, content, vec![violation]));
            }
        };

        let json_value: JsonValue = match serde_json::to_value(&yaml_value) {
            Ok(v) => v,
            Err(e) => {
                let violation = SchemaViolation::new(
                    format!("Failed to convert YAML to JSON: {}", e),
                    "conversion error".to_string(),
                    (0, content.len()).into(),
                    None,
                );
                return Err(ValidationError::new(filename, content, vec![violation]));
            }
        };

        let Some(schema) = self.compiled.get(&prefix) else {
            return Ok(Outcome::Skipped);
        };

        let violations: Vec<SchemaViolation> = schema
            .iter_errors(&json_value)
            .map(|e| error_to_violation(content, &e))
            .collect();

        if violations.is_empty() {
            Ok(Outcome::Valid)
        } else {
            Err(ValidationError::new(filename, content, violations))
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(&SchemaRegistry::default())
    }
}

/// Entity prefix from an ID-style file name, or any `*.pmc.yaml` as an asset
pub fn prefix_for(filename: &str) -> Option<EntityPrefix> {
    EntityPrefix::from_filename(filename)
        .or_else(|| filename.ends_with(ASSET_EXTENSION).then_some(EntityPrefix::Ast))
}

fn error_to_violation(content: &str, error: &JsonSchemaError) -> SchemaViolation {
    let path = error.instance_path.to_string();
    let message = format_schema_error(error);
    let hint = format_error_hint(error);
    let help = generate_help_message(error);
    let span = find_path_span(content, &path);

    SchemaViolation::new(message, hint, span, help)
}

fn format_schema_error(error: &JsonSchemaError) -> String {
    let path = if error.instance_path.as_str().is_empty() {
        "document root".to_string()
    } else {
        format!("'{}'", error.instance_path)
    };

    match &error.kind {
        ValidationErrorKind::Required { property } => {
            let prop_str = property
                .as_str()
                .map(|s| s.to_string())
                .unwrap_or_else(|| property.to_string());
            format!("Missing required field: {} at {}", prop_str, path)
        }
        ValidationErrorKind::Type { kind } => {
            format!("Wrong type at {}: expected {:?}", path, kind)
        }
        ValidationErrorKind::Enum { options } => {
            format!("Invalid value at {}: must be one of: {}", path, format_enum_options(options))
        }
        ValidationErrorKind::Pattern { pattern } => {
            format!("Value at {} doesn't match pattern: {}", path, pattern)
        }
        ValidationErrorKind::MinLength { limit } => {
            format!("Value at {} is too short: minimum {} characters", path, limit)
        }
        ValidationErrorKind::MaxLength { limit } => {
            format!("Value at {} is too long: maximum {} characters", path, limit)
        }
        ValidationErrorKind::Minimum { limit } => {
            format!("Value at {} is too small: minimum {}", path, limit)
        }
        ValidationErrorKind::UniqueItems => {
            format!("Duplicate entries at {}", path)
        }
        ValidationErrorKind::AdditionalProperties { unexpected } => {
            format!("Unknown field(s) at {}: {}", path, unexpected.join(", "))
        }
        _ => format!("Validation error at {}: {}", path, error),
    }
}

fn format_enum_options(options: &JsonValue) -> String {
    if let Some(arr) = options.as_array() {
        arr.iter()
            .map(|v| v.as_str().map(|s| s.to_string()).unwrap_or_else(|| v.to_string()))
            .collect::<Vec<_>>()
            .join(", ")
    } else {
        options.to_string()
    }
}

/// Short label text for the error span
fn format_error_hint(error: &JsonSchemaError) -> String {
    match &error.kind {
        ValidationErrorKind::Required { .. } => "required field missing",
        ValidationErrorKind::Type { .. } => "wrong type",
        ValidationErrorKind::Enum { .. } => "invalid value",
        ValidationErrorKind::Pattern { .. } => "pattern mismatch",
        ValidationErrorKind::MinLength { .. } => "too short",
        ValidationErrorKind::MaxLength { .. } => "too long",
        ValidationErrorKind::Minimum { .. } => "too small",
        ValidationErrorKind::UniqueItems => "duplicate entry",
        ValidationErrorKind::AdditionalProperties { .. } => "unknown field",
        _ => "validation error",
    }
    .to_string()
}

fn generate_help_message(error: &JsonSchemaError) -> Option<String> {
    match &error.kind {
        ValidationErrorKind::Required { property } => {
            let prop_str = property
                .as_str()
                .map(|s| s.to_string())
                .unwrap_or_else(|| property.to_string());
            Some(format!("Add the '{}' field to your file", prop_str))
        }
        ValidationErrorKind::Enum { options } => {
            Some(format!("Valid values: {}", format_enum_options(options)))
        }
        ValidationErrorKind::Pattern { pattern } if pattern.contains("AST-") => Some(
            "ID format: AST-[26 ULID characters], e.g., AST-01HC2JB7SMQX7RS1Y0GFKBHPTD".to_string(),
        ),
        ValidationErrorKind::Pattern { pattern } if pattern.contains("CMP-") => Some(
            "ID format: CMP-[26 ULID characters], e.g., CMP-01HC2JB7SMQX7RS1Y0GFKBHPTD".to_string(),
        ),
        ValidationErrorKind::Minimum { .. } if error.instance_path.as_str().ends_with("/qty") => {
            Some("Quantities start at 1".to_string())
        }
        ValidationErrorKind::Type { kind } => Some(format!("Expected value of type: {:?}", kind)),
        ValidationErrorKind::AdditionalProperties { unexpected } => {
            if unexpected.len() == 1 {
                Some(format!("Remove the '{}' field or check spelling", unexpected[0]))
            } else {
                Some("Remove unknown fields or check spelling".to_string())
            }
        }
        _ => None,
    }
}

/// Span for a YAML parser error location
fn find_error_span(content: &str, location: Option<serde_yml::Location>) -> SourceSpan {
    if let Some(loc) = location {
        let line = loc.line().saturating_sub(1);
        let column = loc.column().saturating_sub(1);

        let mut offset = 0;
        for (i, line_content) in content.lines().enumerate() {
            if i == line {
                offset += column;
                break;
            }
            offset += line_content.len() + 1;
        }

        let rest_of_content = &content[offset.min(content.len())..];
        let len = rest_of_content
            .find('\n')
            .unwrap_or(rest_of_content.len())
            .max(1);

        (offset, len).into()
    } else {
        first_line_span(content)
    }
}

fn first_line_span(content: &str) -> SourceSpan {
    let len = content.find('\n').unwrap_or(content.len()).max(1);
    (0, len).into()
}

/// Span for a JSON pointer such as `/components/0/type`
fn find_path_span(content: &str, json_path: &str) -> SourceSpan {
    let parts: Vec<&str> = json_path.split('/').filter(|s| !s.is_empty()).collect();

    let Some(search_key) = parts.last() else {
        return first_line_span(content);
    };

    // Array index: point at the parent key
    if search_key.parse::<usize>().is_ok() && parts.len() >= 2 {
        if let Some(span) = find_key_span(content, parts[parts.len() - 2]) {
            return span;
        }
    }

    find_key_span(content, search_key).unwrap_or_else(|| first_line_span(content))
}

/// Span of the first `key:` line, also matching list items (`- key:`)
fn find_key_span(content: &str, key: &str) -> Option<SourceSpan> {
    let search_pattern = format!("{}:", key);

    let mut offset = 0;
    for line in content.lines() {
        let trimmed = line.trim_start();
        let trimmed = trimmed.strip_prefix("- ").unwrap_or(trimmed);
        if trimmed.starts_with(&search_pattern) {
            let key_start = offset + (line.len() - trimmed.len());
            return Some((key_start, trimmed.len()).into());
        }
        offset += line.len() + 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"
id: AST-01HC2JB7SMQX7RS1Y0GFKBHPTD
name: "Top coat oven"
type: "Oven / Air House"
criticality: A
environment:
  - high-temperature
subsystems:
  - control
  - motors
components:
  - id: CMP-01HC2JB7SMQX7RS1Y0GFKBHPTE
    subsystem: motors
    type: motor
    qty: 2
    attributes:
      rated_power_kw: 45.0
created: 2024-01-01T00:00:00Z
author: Test
"#;

    fn validator() -> Validator {
        Validator::default()
    }

    #[test]
    fn test_validator_compiles_asset_schema() {
        assert!(validator().compiled.contains_key(&EntityPrefix::Ast));
    }

    #[test]
    fn test_valid_asset() {
        let result = validator().validate(VALID, "test.pmc.yaml", EntityPrefix::Ast);
        assert!(matches!(result, Ok(Outcome::Valid)), "{:?}", result);
    }

    #[test]
    fn test_missing_required_field() {
        let yaml = VALID.replace("name: \"Top coat oven\"\n", "");
        let err = validator()
            .validate(&yaml, "test.pmc.yaml", EntityPrefix::Ast)
            .unwrap_err();
        assert_eq!(err.violation_count(), 1);
        assert!(err.violations()[0].message().contains("name"));
    }

    #[test]
    fn test_invalid_criticality() {
        let yaml = VALID.replace("criticality: A", "criticality: D");
        let err = validator()
            .validate(&yaml, "test.pmc.yaml", EntityPrefix::Ast)
            .unwrap_err();
        assert!(err.violations()[0].message().contains("must be one of"));
    }

    #[test]
    fn test_invalid_component_type_and_qty() {
        let yaml = VALID
            .replace("type: motor", "type: servo")
            .replace("qty: 2", "qty: 0");
        let err = validator()
            .validate(&yaml, "test.pmc.yaml", EntityPrefix::Ast)
            .unwrap_err();
        assert_eq!(err.violation_count(), 2);
    }

    #[test]
    fn test_invalid_id_pattern() {
        let yaml = VALID.replace("AST-01HC2JB7SMQX7RS1Y0GFKBHPTD", "AST-123");
        let err = validator()
            .validate(&yaml, "test.pmc.yaml", EntityPrefix::Ast)
            .unwrap_err();
        assert!(err.violations()[0].message().contains("pattern"));
    }

    #[test]
    fn test_unknown_field() {
        let yaml = format!("{}status: draft\n", VALID);
        let err = validator()
            .validate(&yaml, "test.pmc.yaml", EntityPrefix::Ast)
            .unwrap_err();
        assert!(err.violations()[0].message().contains("status"));
    }

    #[test]
    fn test_yaml_syntax_error() {
        let err = validator()
            .validate("name: [unclosed", "test.pmc.yaml", EntityPrefix::Ast)
            .unwrap_err();
        assert!(err.violations()[0].message().starts_with("YAML parse error"));
    }

    #[test]
    fn test_component_has_no_schema() {
        let result = validator().validate("qty: 1", "CMP-x.yaml", EntityPrefix::Cmp);
        assert!(matches!(result, Ok(Outcome::Skipped)));
    }

    #[test]
    fn test_prefix_for() {
        assert_eq!(prefix_for("AST-01HC.pmc.yaml"), Some(EntityPrefix::Ast));
        assert_eq!(prefix_for("line4.pmc.yaml"), Some(EntityPrefix::Ast));
        assert_eq!(prefix_for("notes.yaml"), None);
    }

    #[test]
    fn test_find_key_span() {
        let content = "id: AST-1\nname: x\ncomponents:\n  - type: motor\n";
        let span = find_key_span(content, "name").unwrap();
        assert_eq!(span.offset(), 10);
        let span = find_key_span(content, "type").unwrap();
        assert_eq!(span.offset(), 34);
    }
}
