//! Project discovery and structure

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::identity::EntityId;

/// Extension used by asset files
pub const ASSET_EXTENSION: &str = ".pmc.yaml";

/// Represents a PMC project
#[derive(Debug)]
pub struct Project {
    /// Root directory of the project (parent of .pmc/)
    root: PathBuf,
}

impl Project {
    /// Find project root by walking up from the current directory
    pub fn discover() -> Result<Self, ProjectError> {
        let current = std::env::current_dir()
            .map_err(|e| ProjectError::IoError(e.to_string()))?;
        Self::discover_from(&current)
    }

    /// Find project root by walking up from the given directory
    pub fn discover_from(start: &Path) -> Result<Self, ProjectError> {
        let mut current = start
            .canonicalize()
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        loop {
            if current.join(".pmc").is_dir() {
                return Ok(Self { root: current });
            }

            if !current.pop() {
                return Err(ProjectError::NotFound {
                    searched_from: start.to_path_buf(),
                });
            }
        }
    }

    /// Resolve the project from an explicit root, or discover it
    pub fn open(root: Option<&Path>) -> Result<Self, ProjectError> {
        match root {
            Some(path) => Self::discover_from(path),
            None => Self::discover(),
        }
    }

    /// Create a new project structure at the given path
    pub fn init(path: &Path) -> Result<Self, ProjectError> {
        let root = path
            .canonicalize()
            .unwrap_or_else(|_| path.to_path_buf());

        if root.join(".pmc").exists() {
            return Err(ProjectError::AlreadyExists(root));
        }

        Self::init_force(&root)
    }

    /// Force initialization even if .pmc/ exists
    pub fn init_force(path: &Path) -> Result<Self, ProjectError> {
        let root = path
            .canonicalize()
            .unwrap_or_else(|_| path.to_path_buf());

        let pmc_dir = root.join(".pmc");
        std::fs::create_dir_all(&pmc_dir)
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        std::fs::write(pmc_dir.join("config.yaml"), Self::default_config())
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        std::fs::create_dir_all(root.join("assets"))
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        Ok(Self { root })
    }

    fn default_config() -> &'static str {
        r#"# PMC Project Configuration

# Default author for new assets (can be overridden by global config)
# author: ""

# Default output format (auto, yaml, tsv, json, csv, md)
# default_format: auto

# Criticality used by `pmc asset new` when none is given (A, B, C)
# default_criticality: A

# Asset type used by `pmc asset new` when none is given
# default_asset_type: "Oven / Air House"
"#
    }

    /// Get the project root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the .pmc configuration directory
    pub fn pmc_dir(&self) -> PathBuf {
        self.root.join(".pmc")
    }

    /// Directory holding asset files
    pub fn assets_dir(&self) -> PathBuf {
        self.root.join("assets")
    }

    /// Get the path for a new asset file
    pub fn asset_path(&self, id: &EntityId) -> PathBuf {
        self.assets_dir().join(format!("{}{}", id, ASSET_EXTENSION))
    }

    /// Iterate all asset files in the project
    pub fn iter_asset_files(&self) -> impl Iterator<Item = PathBuf> {
        walkdir::WalkDir::new(self.assets_dir())
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.path().to_string_lossy().ends_with(ASSET_EXTENSION))
            .map(|e| e.path().to_path_buf())
    }
}

/// Errors that can occur during project operations
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("not a PMC project (searched from {searched_from:?}). Run 'pmc init' to create one.")]
    NotFound { searched_from: PathBuf },

    #[error("PMC project already exists at {0:?}")]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    IoError(String),
}
