//! Operating context - environmental and duty-cycle flags for an asset

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A recognized environment or operating-condition flag
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum EnvFlag {
    HighTemperature,
    DustOverspray,
    HumidityWashdown,
    Corrosive,
    SolventExplosive,
    ContinuousOperation,
    HighCycling,
    RestrictedAccess,
}

impl EnvFlag {
    pub fn all() -> &'static [EnvFlag] {
        &[
            EnvFlag::HighTemperature,
            EnvFlag::DustOverspray,
            EnvFlag::HumidityWashdown,
            EnvFlag::Corrosive,
            EnvFlag::SolventExplosive,
            EnvFlag::ContinuousOperation,
            EnvFlag::HighCycling,
            EnvFlag::RestrictedAccess,
        ]
    }

    /// Whether the flag takes part in severity classification.
    ///
    /// Humidity, corrosive and restricted access are recorded on the asset
    /// but do not shorten intervals yet.
    pub fn affects_severity(self) -> bool {
        match self {
            EnvFlag::HighTemperature
            | EnvFlag::DustOverspray
            | EnvFlag::SolventExplosive
            | EnvFlag::ContinuousOperation
            | EnvFlag::HighCycling => true,
            EnvFlag::HumidityWashdown | EnvFlag::Corrosive | EnvFlag::RestrictedAccess => false,
        }
    }
}

impl std::fmt::Display for EnvFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnvFlag::HighTemperature => write!(f, "High temperature"),
            EnvFlag::DustOverspray => write!(f, "Dust / overspray"),
            EnvFlag::HumidityWashdown => write!(f, "Humidity / washdown"),
            EnvFlag::Corrosive => write!(f, "Corrosive"),
            EnvFlag::SolventExplosive => write!(f, "Solvents / explosive atmosphere"),
            EnvFlag::ContinuousOperation => write!(f, "Continuous operation (24/7)"),
            EnvFlag::HighCycling => write!(f, "High cycling (starts/hour)"),
            EnvFlag::RestrictedAccess => write!(f, "Restricted access"),
        }
    }
}

impl std::str::FromStr for EnvFlag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <EnvFlag as ValueEnum>::from_str(s, true).map_err(|_| {
            let valid: Vec<String> = EnvFlag::all()
                .iter()
                .filter_map(|f| f.to_possible_value())
                .map(|v| v.get_name().to_string())
                .collect();
            format!("Unknown environment flag: {}. Use one of: {}", s, valid.join(", "))
        })
    }
}

/// The set of flags that hold for an asset; absent flags are false
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnvironmentContext {
    flags: BTreeSet<EnvFlag>,
}

impl EnvironmentContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a context with the given flags set
    pub fn with_flags(flags: impl IntoIterator<Item = EnvFlag>) -> Self {
        Self {
            flags: flags.into_iter().collect(),
        }
    }

    pub fn is_set(&self, flag: EnvFlag) -> bool {
        self.flags.contains(&flag)
    }

    pub fn set(&mut self, flag: EnvFlag, on: bool) {
        if on {
            self.flags.insert(flag);
        } else {
            self.flags.remove(&flag);
        }
    }

    /// Flags that are set, in declaration order
    pub fn iter(&self) -> impl Iterator<Item = EnvFlag> + '_ {
        self.flags.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_clear() {
        let mut env = EnvironmentContext::new();
        assert!(!env.is_set(EnvFlag::Corrosive));
        env.set(EnvFlag::Corrosive, true);
        assert!(env.is_set(EnvFlag::Corrosive));
        env.set(EnvFlag::Corrosive, false);
        assert!(env.is_empty());
    }

    #[test]
    fn test_serializes_as_flag_list() {
        let env = EnvironmentContext::with_flags([EnvFlag::HighCycling, EnvFlag::HighTemperature]);
        let yaml = serde_yml::to_string(&env).unwrap();
        assert!(yaml.contains("- high-temperature"));
        assert!(yaml.contains("- high-cycling"));

        let parsed: EnvironmentContext = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(env, parsed);
    }

    #[test]
    fn test_flag_from_str() {
        assert_eq!("dust-overspray".parse::<EnvFlag>(), Ok(EnvFlag::DustOverspray));
        assert_eq!("HIGH-TEMPERATURE".parse::<EnvFlag>(), Ok(EnvFlag::HighTemperature));
        let err = "steam".parse::<EnvFlag>().unwrap_err();
        assert!(err.contains("continuous-operation"));
    }

    #[test]
    fn test_severity_subset() {
        let severe: Vec<EnvFlag> = EnvFlag::all()
            .iter()
            .copied()
            .filter(|f| f.affects_severity())
            .collect();
        assert_eq!(severe.len(), 5);
        assert!(!EnvFlag::RestrictedAccess.affects_severity());
    }
}
