//! YAML parsing with source-located diagnostics

pub mod diagnostics;

pub use diagnostics::{YamlError, YamlSyntaxError};

use serde::de::DeserializeOwned;
use std::path::Path;

/// Parse a YAML string, reporting errors against `filename`
pub fn parse_yaml<T: DeserializeOwned>(content: &str, filename: &str) -> Result<T, YamlError> {
    serde_yml::from_str(content)
        .map_err(|e| YamlSyntaxError::from_serde_error(&e, content, filename).into())
}

/// Read and parse a YAML file
pub fn parse_yaml_file<T: DeserializeOwned>(path: &Path) -> Result<T, YamlError> {
    let content = std::fs::read_to_string(path).map_err(|source| YamlError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    parse_yaml(&content, &filename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Component;

    #[test]
    fn test_parse_yaml_reports_unknown_variant() {
        let src = "id: CMP-01HQ3K4N5M6P7R8S9T0VWXYZ12\nsubsystem: motors\ntype: servo\n";
        let err = parse_yaml::<Component>(src, "bad.pmc.yaml").unwrap_err();
        assert!(matches!(err, YamlError::Syntax(_)));
        assert!(err.to_string().contains("unknown variant"));
    }

    #[test]
    fn test_parse_yaml_file_missing() {
        let err = parse_yaml_file::<Component>(Path::new("/nonexistent/a.pmc.yaml")).unwrap_err();
        assert!(matches!(err, YamlError::Io { .. }));
    }
}
