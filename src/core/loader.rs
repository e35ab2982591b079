//! Asset loading utilities
//!
//! Resolves asset references given on the command line (a path, a full ID
//! or an ID prefix) and loads asset files with YAML diagnostics.

use miette::{IntoDiagnostic, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::project::Project;
use crate::entities::Asset;
use crate::yaml::parse_yaml_file;

/// Load all assets in the project
///
/// Files that fail to parse are skipped with a warning.
pub fn load_all_assets(project: &Project) -> Vec<(PathBuf, Asset)> {
    let mut assets = Vec::new();
    for path in project.iter_asset_files() {
        match parse_yaml_file::<Asset>(&path) {
            Ok(asset) => assets.push((path, asset)),
            Err(e) => tracing::warn!(path = %path.display(), "skipping asset: {}", e),
        }
    }
    assets
}

/// Find an asset file by full ID or unique ID prefix
///
/// An exact ID match wins. A prefix shared by several assets is an error
/// listing the candidates, never an arbitrary pick.
pub fn find_asset_file(dir: &Path, id: &str) -> Result<Option<PathBuf>> {
    if !dir.exists() {
        return Ok(None);
    }

    let wanted = id.trim().to_uppercase();
    let mut matches = Vec::new();
    for entry in fs::read_dir(dir).into_diagnostic()? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), "skipping unreadable entry: {}", e);
                continue;
            }
        };
        let path = entry.path();
        let Some(filename) = path.file_name().and_then(|s| s.to_str()) else {
            continue;
        };
        if !filename.ends_with(".yaml") {
            continue;
        }
        let stem = filename.split('.').next().unwrap_or("").to_uppercase();
        if stem == wanted {
            return Ok(Some(path));
        }
        if stem.starts_with(&wanted) {
            matches.push((stem, path));
        }
    }

    match matches.len() {
        0 => Ok(None),
        1 => Ok(matches.pop().map(|(_, path)| path)),
        _ => {
            matches.sort();
            let ids: Vec<String> = matches.into_iter().map(|(stem, _)| stem).collect();
            Err(miette::miette!(
                help = "Use more characters of the ID",
                "Ambiguous asset reference '{}', matches: {}",
                id,
                ids.join(", ")
            ))
        }
    }
}

/// Resolve an asset reference to a file path
///
/// An existing path wins; otherwise the reference is looked up as an ID in
/// the project's `assets/` directory.
pub fn resolve_asset(reference: &str, project_root: Option<&Path>) -> Result<PathBuf> {
    let as_path = PathBuf::from(reference);
    if as_path.is_file() {
        return Ok(as_path);
    }

    let project = Project::open(project_root).map_err(|e| miette::miette!("{}", e))?;
    find_asset_file(&project.assets_dir(), reference)?
        .ok_or_else(|| miette::miette!("No asset found matching '{}'", reference))
}

/// Load an asset by reference, returning its path too
pub fn load_asset(reference: &str, project_root: Option<&Path>) -> Result<(PathBuf, Asset)> {
    let path = resolve_asset(reference, project_root)?;
    let asset = parse_yaml_file::<Asset>(&path)?;
    Ok((path, asset))
}

/// Write an asset back to disk
pub fn save_asset(path: &Path, asset: &Asset) -> Result<()> {
    let yaml = serde_yml::to_string(asset).into_diagnostic()?;
    fs::write(path, yaml).into_diagnostic()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Criticality;
    use tempfile::tempdir;

    #[test]
    fn test_find_asset_file_nonexistent() {
        assert!(find_asset_file(Path::new("/nonexistent/path"), "AST-123")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_find_asset_file_by_prefix() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("AST-01J123456789ABCDEFGHJKMNPQ.pmc.yaml");
        fs::write(&file_path, "name: x").unwrap();

        let result = find_asset_file(dir.path(), "ast-01j1234").unwrap();
        assert_eq!(result, Some(file_path));
    }

    #[test]
    fn test_find_asset_file_rejects_ambiguous_prefix() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("AST-01AAAAAAAAAAAAAAAAAAAAAAAA.pmc.yaml");
        let second = dir.path().join("AST-01BBBBBBBBBBBBBBBBBBBBBBBB.pmc.yaml");
        fs::write(&first, "name: a").unwrap();
        fs::write(&second, "name: b").unwrap();

        let err = find_asset_file(dir.path(), "AST-01").unwrap_err().to_string();
        assert!(err.contains("Ambiguous"));
        assert!(err.contains("AST-01AAAAAAAAAAAAAAAAAAAAAAAA"));
        assert!(err.contains("AST-01BBBBBBBBBBBBBBBBBBBBBBBB"));

        let result = find_asset_file(dir.path(), "ast-01b").unwrap();
        assert_eq!(result, Some(second));
    }

    #[test]
    fn test_find_asset_file_exact_id_wins_over_prefix() {
        let dir = tempdir().unwrap();
        let exact = dir.path().join("AST-01AAAA.pmc.yaml");
        let longer = dir.path().join("AST-01AAAAB.pmc.yaml");
        fs::write(&exact, "name: a").unwrap();
        fs::write(&longer, "name: b").unwrap();

        let result = find_asset_file(dir.path(), "AST-01AAAA").unwrap();
        assert_eq!(result, Some(exact));
    }

    #[test]
    fn test_save_then_load() {
        let tmp = tempdir().unwrap();
        let project = Project::init(tmp.path()).unwrap();
        let asset = Asset::new(
            "Trolley 3".to_string(),
            "Trolley".to_string(),
            Criticality::B,
            "test".to_string(),
        );
        let path = project.asset_path(&asset.id);
        save_asset(&path, &asset).unwrap();

        let (found, loaded) = load_asset(&asset.id.to_string(), Some(tmp.path())).unwrap();
        assert_eq!(found.file_name(), path.file_name());
        assert_eq!(loaded.name, "Trolley 3");
        assert_eq!(loaded.criticality, Criticality::B);

        let all = load_all_assets(&project);
        assert_eq!(all.len(), 1);
    }
}
