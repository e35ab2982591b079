//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::core::Project;
use crate::entities::asset::{Criticality, DEFAULT_ASSET_TYPE};

/// PMC configuration with layered hierarchy
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default author for new assets
    pub author: Option<String>,

    /// Default output format
    pub default_format: Option<String>,

    /// Criticality used when `asset new` is not given one
    pub default_criticality: Option<Criticality>,

    /// Asset type used when `asset new` is not given one
    pub default_asset_type: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        Self::load_from(None)
    }

    /// Same as [`Config::load`] but with an explicit project root
    pub fn load_from(project_root: Option<&Path>) -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/pmc/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read_file(&global_path) {
                config.merge(global);
            }
        }

        // 3. Project config (.pmc/config.yaml)
        if let Ok(project) = Project::open(project_root) {
            if let Some(project_config) = Self::read_file(&project.pmc_dir().join("config.yaml")) {
                config.merge(project_config);
            }
        }

        // 4. Environment variables
        if let Ok(author) = std::env::var("PMC_AUTHOR") {
            config.author = Some(author);
        }
        if let Ok(crit) = std::env::var("PMC_CRITICALITY") {
            match crit.parse() {
                Ok(c) => config.default_criticality = Some(c),
                Err(e) => tracing::warn!("ignoring PMC_CRITICALITY: {}", e),
            }
        }

        config
    }

    fn read_file(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = std::fs::read_to_string(path).ok()?;
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = %path.display(), "ignoring unreadable config: {}", e);
                None
            }
        }
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "pmc")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.author.is_some() {
            self.author = other.author;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
        if other.default_criticality.is_some() {
            self.default_criticality = other.default_criticality;
        }
        if other.default_asset_type.is_some() {
            self.default_asset_type = other.default_asset_type;
        }
    }

    /// Get the author name, falling back to git config or username
    pub fn author(&self) -> String {
        if let Some(ref author) = self.author {
            return author.clone();
        }

        if let Ok(output) = std::process::Command::new("git")
            .args(["config", "user.name"])
            .output()
        {
            if output.status.success() {
                let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !name.is_empty() {
                    return name;
                }
            }
        }

        std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .unwrap_or_else(|_| "unknown".to_string())
    }

    pub fn criticality(&self) -> Criticality {
        self.default_criticality.unwrap_or_default()
    }

    pub fn asset_type(&self) -> String {
        self.default_asset_type
            .clone()
            .unwrap_or_else(|| DEFAULT_ASSET_TYPE.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_prefers_other() {
        let mut base = Config {
            author: Some("base".to_string()),
            default_criticality: Some(Criticality::C),
            ..Default::default()
        };
        base.merge(Config {
            default_criticality: Some(Criticality::B),
            ..Default::default()
        });
        assert_eq!(base.author.as_deref(), Some("base"));
        assert_eq!(base.criticality(), Criticality::B);
    }

    #[test]
    fn test_parse_yaml_config() {
        let config: Config =
            serde_yml::from_str("default_criticality: B\ndefault_asset_type: Trolley\n").unwrap();
        assert_eq!(config.criticality(), Criticality::B);
        assert_eq!(config.asset_type(), "Trolley");
        assert!(config.default_format.is_none());
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.criticality(), Criticality::A);
        assert_eq!(config.asset_type(), DEFAULT_ASSET_TYPE);
    }
}
