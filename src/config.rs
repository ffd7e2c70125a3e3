//! Configuration for the surrounding assistant.
//!
//! Layered sources, highest priority first:
//! 1. Environment variables (`RISKGATE_*`)
//! 2. Project config (`.riskgate.toml` in the working directory)
//! 3. User config (`~/.config/riskgate/config.toml`)
//! 4. Compiled defaults
//!
//! Validation happens at load time, not per classification call: malformed
//! entries (relative allowed paths, unknown policy levels) are rejected
//! before an [`Analyzer`](crate::analyzer::Analyzer) is ever built.

use crate::analyzer::AnalyzerConfig;
use crate::gate::ConfirmThreshold;
use crate::logging::LoggingConfig;
use crate::risk::RiskLevel;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding the blocked-command list (comma separated).
pub const ENV_BLOCKED_COMMANDS: &str = "RISKGATE_BLOCKED_COMMANDS";
/// Environment variable overriding the allowed-path list (comma separated).
pub const ENV_ALLOWED_PATHS: &str = "RISKGATE_ALLOWED_PATHS";
/// Environment variable overriding the confirmation threshold.
pub const ENV_CONFIRM_THRESHOLD: &str = "RISKGATE_CONFIRM_THRESHOLD";

/// Project-level config file name.
const PROJECT_CONFIG_NAME: &str = ".riskgate.toml";
/// User config file name under the config directory.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Safety lists feeding the analyzer.
    pub safety: SafetyConfig,

    /// Execution gate settings.
    pub gate: GateConfig,

    /// Decision logging settings.
    pub logging: LoggingConfig,
}

/// Safety lists and policies.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetyConfig {
    /// Command names that must never run.
    pub blocked_commands: Vec<String>,

    /// Path prefixes writes are confined to. Empty disables the check.
    pub allowed_paths: Vec<String>,

    /// Tier contributed by an allowed-path violation: "caution" or
    /// "dangerous".
    pub allow_path_violation: String,
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            blocked_commands: Vec::new(),
            allowed_paths: Vec::new(),
            allow_path_violation: "caution".to_string(),
        }
    }
}

/// Execution gate settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Highest risk tier that auto-runs without confirmation.
    pub confirm_threshold: ConfirmThreshold,
}

/// Error loading or validating configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// Source file, when the error is tied to one.
    pub path: Option<PathBuf>,
    pub message: String,
}

impl ConfigError {
    fn invalid(message: impl Into<String>) -> Self {
        Self {
            path: None,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.path {
            Some(path) => write!(f, "config {}: {}", path.display(), self.message),
            None => write!(f, "config: {}", self.message),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Load configuration from the standard layered sources.
    ///
    /// Missing files are fine; the first file found (project, then user)
    /// provides the base, env vars override on top, and the result is
    /// validated before being returned.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match first_existing_config_path() {
            Some(path) => Self::parse_file(&path)?,
            None => Self::default(),
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Load from an explicit file, with env overrides and validation.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::parse_file(path)?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    fn parse_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            path: Some(path.to_path_buf()),
            message: format!("failed to read: {e}"),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError {
            path: Some(path.to_path_buf()),
            message: format!("failed to parse: {e}"),
        })
    }

    fn apply_env(&mut self) {
        if let Ok(value) = env::var(ENV_BLOCKED_COMMANDS) {
            self.safety.blocked_commands = split_list(&value);
        }
        if let Ok(value) = env::var(ENV_ALLOWED_PATHS) {
            self.safety.allowed_paths = split_list(&value);
        }
        if let Ok(value) = env::var(ENV_CONFIRM_THRESHOLD) {
            match value.parse::<ConfirmThreshold>() {
                Ok(threshold) => self.gate.confirm_threshold = threshold,
                Err(e) => tracing::warn!(%e, "ignoring {ENV_CONFIRM_THRESHOLD}"),
            }
        }
    }

    /// Validate the loaded configuration. Called by the loaders; exposed for
    /// callers that build a `Config` by hand.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.safety.allow_path_violation.parse::<RiskLevel>() {
            Ok(RiskLevel::Caution | RiskLevel::Dangerous) => {}
            Ok(other) => {
                return Err(ConfigError::invalid(format!(
                    "allow_path_violation must be caution or dangerous, got {other}"
                )));
            }
            Err(e) => return Err(ConfigError::invalid(e.to_string())),
        }
        for entry in &self.safety.blocked_commands {
            if entry.trim().contains(char::is_whitespace) {
                return Err(ConfigError::invalid(format!(
                    "blocked command {entry:?} must be a single command name"
                )));
            }
        }
        for entry in &self.safety.allowed_paths {
            let trimmed = entry.trim();
            if !trimmed.is_empty() && !trimmed.starts_with('/') && !trimmed.starts_with('~') {
                return Err(ConfigError::invalid(format!(
                    "allowed path {entry:?} must be absolute or ~-prefixed"
                )));
            }
        }
        Ok(())
    }

    /// The analyzer configuration this config describes.
    #[must_use]
    pub fn analyzer_config(&self) -> AnalyzerConfig {
        let allow_path_violation = match self.safety.allow_path_violation.parse::<RiskLevel>() {
            Ok(RiskLevel::Dangerous) => RiskLevel::Dangerous,
            _ => RiskLevel::Caution,
        };
        AnalyzerConfig {
            blocked_commands: self.safety.blocked_commands.clone(),
            allowed_paths: self.safety.allowed_paths.clone(),
            allow_path_violation,
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn first_existing_config_path() -> Option<PathBuf> {
    let project = PathBuf::from(PROJECT_CONFIG_NAME);
    if project.is_file() {
        return Some(project);
    }
    let user = dirs::config_dir()?.join("riskgate").join(CONFIG_FILE_NAME);
    user.is_file().then_some(user)
}
