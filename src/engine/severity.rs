//! Severity classification of an asset's operating context

use crate::entities::environment::{EnvFlag, EnvironmentContext};

/// Flags that make an environment severe
pub fn severity_flags() -> impl Iterator<Item = EnvFlag> {
    EnvFlag::all().iter().copied().filter(|f| f.affects_severity())
}

/// True when any severity flag is set
pub fn is_severe(environment: &EnvironmentContext) -> bool {
    environment.iter().any(EnvFlag::affects_severity)
}

/// Severity flags that are set, for explaining an escalation
pub fn triggering_flags(environment: &EnvironmentContext) -> Vec<EnvFlag> {
    environment.iter().filter(|f| f.affects_severity()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_environment_is_mild() {
        assert!(!is_severe(&EnvironmentContext::new()));
    }

    #[test]
    fn test_each_severity_flag_alone_is_severe() {
        for flag in severity_flags() {
            let env = EnvironmentContext::with_flags([flag]);
            assert!(is_severe(&env), "{} should be severe", flag);
        }
    }

    #[test]
    fn test_non_severity_flags_do_not_escalate() {
        let env = EnvironmentContext::with_flags([
            EnvFlag::HumidityWashdown,
            EnvFlag::Corrosive,
            EnvFlag::RestrictedAccess,
        ]);
        assert!(!is_severe(&env));
        assert!(triggering_flags(&env).is_empty());
    }

    #[test]
    fn test_triggering_flags() {
        let env = EnvironmentContext::with_flags([EnvFlag::Corrosive, EnvFlag::ContinuousOperation]);
        assert_eq!(triggering_flags(&env), vec![EnvFlag::ContinuousOperation]);
    }
}
