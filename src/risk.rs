//! Risk tiers for classified commands.
//!
//! The ordering is load-bearing: aggregation takes the maximum tier across
//! all signals, and the execution gate compares tiers against a configured
//! threshold. Keep the variants in ascending order of severity.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Risk tier assigned to a command.
///
/// Tiers are totally ordered: `Safe < Caution < Dangerous < Critical`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    /// No dangerous signals. Read-only or trivially reversible.
    #[default]
    Safe,

    /// Mutating but plausibly recoverable. Warrants a confirmation prompt.
    /// Examples: `rm -rf ./build`, any `sudo` invocation, `git reset --hard`.
    Caution,

    /// Destructive with broad blast radius or hard to undo.
    /// Examples: `chmod -R 777 /`, `curl ... | sh`, writes into `/etc`.
    Dangerous,

    /// Irreversible system-level damage. Never auto-run.
    /// Examples: `rm -rf /`, `dd of=/dev/sda`, `mkfs`, fork bombs.
    Critical,
}

impl RiskLevel {
    /// Canonical uppercase label, as stored by the persistence layer.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Safe => "SAFE",
            Self::Caution => "CAUTION",
            Self::Dangerous => "DANGEROUS",
            Self::Critical => "CRITICAL",
        }
    }

    /// Returns true if this tier should never run without confirmation.
    #[must_use]
    pub const fn needs_confirmation(&self) -> bool {
        !matches!(self, Self::Safe)
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown risk level name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRiskLevelError {
    pub input: String,
}

impl fmt::Display for ParseRiskLevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown risk level {:?} (expected safe, caution, dangerous, or critical)",
            self.input
        )
    }
}

impl std::error::Error for ParseRiskLevelError {}

impl FromStr for RiskLevel {
    type Err = ParseRiskLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "safe" => Ok(Self::Safe),
            "caution" => Ok(Self::Caution),
            "dangerous" => Ok(Self::Dangerous),
            "critical" => Ok(Self::Critical),
            _ => Err(ParseRiskLevelError {
                input: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_ascending() {
        assert!(RiskLevel::Safe < RiskLevel::Caution);
        assert!(RiskLevel::Caution < RiskLevel::Dangerous);
        assert!(RiskLevel::Dangerous < RiskLevel::Critical);
    }

    #[test]
    fn max_picks_most_severe() {
        let levels = [RiskLevel::Caution, RiskLevel::Critical, RiskLevel::Safe];
        assert_eq!(
            levels.iter().copied().max(),
            Some(RiskLevel::Critical)
        );
    }

    #[test]
    fn labels_round_trip() {
        for level in [
            RiskLevel::Safe,
            RiskLevel::Caution,
            RiskLevel::Dangerous,
            RiskLevel::Critical,
        ] {
            assert_eq!(level.as_str().parse::<RiskLevel>(), Ok(level));
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("Dangerous".parse::<RiskLevel>(), Ok(RiskLevel::Dangerous));
        assert_eq!("CAUTION".parse::<RiskLevel>(), Ok(RiskLevel::Caution));
    }

    #[test]
    fn parse_rejects_unknown() {
        assert!("extreme".parse::<RiskLevel>().is_err());
    }

    #[test]
    fn serde_uses_uppercase_labels() {
        let json = serde_json::to_string(&RiskLevel::Dangerous).unwrap();
        assert_eq!(json, "\"DANGEROUS\"");
        let back: RiskLevel = serde_json::from_str(&json).unwrap();
        assert_eq!(back, RiskLevel::Dangerous);
    }
}
