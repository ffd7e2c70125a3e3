//! Execution gate: turns a [`CommandAnalysis`] into a run/confirm/refuse
//! decision against a caller-configured confirmation threshold.
//!
//! The threshold names the highest tier that may auto-run. Critical never
//! auto-runs, and a blocked-command match refuses outright regardless of
//! threshold.

use crate::analyzer::CommandAnalysis;
use crate::risk::RiskLevel;
use crate::signals::BLOCKED_COMMAND_REASON;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Highest risk tier that runs without confirmation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ConfirmThreshold {
    /// Only Safe commands auto-run.
    #[default]
    Safe,
    /// Safe and Caution commands auto-run.
    Caution,
    /// Everything below Critical auto-runs. For the brave.
    Dangerous,
}

impl ConfirmThreshold {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::Caution => "caution",
            Self::Dangerous => "dangerous",
        }
    }

    /// The highest tier this threshold lets through unprompted.
    #[must_use]
    pub const fn max_auto_level(&self) -> RiskLevel {
        match self {
            Self::Safe => RiskLevel::Safe,
            Self::Caution => RiskLevel::Caution,
            Self::Dangerous => RiskLevel::Dangerous,
        }
    }
}

impl std::fmt::Display for ConfirmThreshold {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown threshold name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseThresholdError {
    pub input: String,
}

impl std::fmt::Display for ParseThresholdError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown confirmation threshold {:?} (expected safe, caution, or dangerous)",
            self.input
        )
    }
}

impl std::error::Error for ParseThresholdError {}

impl FromStr for ConfirmThreshold {
    type Err = ParseThresholdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "safe" => Ok(Self::Safe),
            "caution" => Ok(Self::Caution),
            "dangerous" => Ok(Self::Dangerous),
            _ => Err(ParseThresholdError {
                input: s.to_string(),
            }),
        }
    }
}

/// What the surrounding assistant should do with the command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateDecision {
    /// Run without prompting.
    AutoRun,
    /// Show the analysis and ask the user.
    Confirm,
    /// Never run; explicitly blocked or Critical.
    Refuse,
}

impl GateDecision {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AutoRun => "auto_run",
            Self::Confirm => "confirm",
            Self::Refuse => "refuse",
        }
    }
}

impl std::fmt::Display for GateDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The execution gate.
#[derive(Debug, Clone, Copy, Default)]
pub struct Gate {
    threshold: ConfirmThreshold,
}

impl Gate {
    #[must_use]
    pub const fn new(threshold: ConfirmThreshold) -> Self {
        Self { threshold }
    }

    #[must_use]
    pub const fn threshold(&self) -> ConfirmThreshold {
        self.threshold
    }

    /// Decide for one analysis. Blocked commands and Critical verdicts
    /// refuse regardless of threshold.
    #[must_use]
    pub fn decide(&self, analysis: &CommandAnalysis) -> GateDecision {
        let blocked = analysis
            .risk_reasons
            .iter()
            .any(|r| r == BLOCKED_COMMAND_REASON);
        if blocked || analysis.risk_level == RiskLevel::Critical {
            return GateDecision::Refuse;
        }
        if analysis.risk_level <= self.threshold.max_auto_level() {
            GateDecision::AutoRun
        } else {
            GateDecision::Confirm
        }
    }
}
