//! Structured logging for classification decisions.
//!
//! Opt-in append-only log of analyses, in text or JSON lines format, with
//! optional command redaction for shared log files. Disabled by default;
//! the engine itself never logs.

use crate::analyzer::CommandAnalysis;
use crate::gate::GateDecision;
use crate::risk::RiskLevel;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::Mutex;

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Whether decision logging is enabled.
    pub enabled: bool,
    /// Path to the log file. Supports `~` expansion.
    pub file: Option<String>,
    /// Output format: "text" or "json".
    pub format: LogFormat,
    /// Replace the command text with a placeholder in log output.
    pub redact_command: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            file: None,
            format: LogFormat::Text,
            redact_command: false,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Error opening or writing the decision log.
#[derive(Debug)]
pub struct LogError {
    pub path: PathBuf,
    pub message: String,
}

impl std::fmt::Display for LogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "decision log {}: {}", self.path.display(), self.message)
    }
}

impl std::error::Error for LogError {}

/// One logged decision, as serialized in JSON mode.
#[derive(Debug, Serialize)]
struct LogRecord<'a> {
    timestamp: String,
    risk_level: RiskLevel,
    decision: GateDecision,
    reversible: bool,
    requires_sudo: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    command: Option<&'a str>,
    reasons: &'a [String],
}

const REDACTED: &str = "[redacted]";

/// Append-only decision logger. Cheap to share behind a reference; the
/// writer is mutex-guarded.
#[derive(Debug)]
pub struct DecisionLogger {
    writer: Mutex<BufWriter<std::fs::File>>,
    format: LogFormat,
    redact_command: bool,
}

impl DecisionLogger {
    /// Open the logger described by `config`. Returns `None` when logging is
    /// disabled or no file is configured.
    pub fn from_config(config: &LoggingConfig) -> Result<Option<Self>, LogError> {
        if !config.enabled {
            return Ok(None);
        }
        let Some(file) = &config.file else {
            return Ok(None);
        };
        let path = expand_home(file);
        let handle = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| LogError {
                path: path.clone(),
                message: e.to_string(),
            })?;
        Ok(Some(Self {
            writer: Mutex::new(BufWriter::new(handle)),
            format: config.format,
            redact_command: config.redact_command,
        }))
    }

    /// Log one decision. Write failures are reported, not panicked on.
    pub fn log(
        &self,
        analysis: &CommandAnalysis,
        decision: GateDecision,
    ) -> Result<(), std::io::Error> {
        let command = if self.redact_command {
            REDACTED
        } else {
            analysis.command.as_str()
        };
        let timestamp = Utc::now().to_rfc3339();

        let line = match self.format {
            LogFormat::Text => format!(
                "{timestamp} decision={decision} risk={} reversible={} sudo={} command={command}\n",
                analysis.risk_level, analysis.reversible, analysis.requires_sudo
            ),
            LogFormat::Json => {
                let record = LogRecord {
                    timestamp,
                    risk_level: analysis.risk_level,
                    decision,
                    reversible: analysis.reversible,
                    requires_sudo: analysis.requires_sudo,
                    command: Some(command),
                    reasons: &analysis.risk_reasons,
                };
                let mut s = serde_json::to_string(&record)?;
                s.push('\n');
                s
            }
        };

        let mut writer = self
            .writer
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        writer.write_all(line.as_bytes())?;
        writer.flush()
    }
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
