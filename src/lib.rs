#![cfg_attr(not(test), forbid(unsafe_code))]
//! riskgate library.
//!
//! Classifies the risk of a single shell command line before an assistant
//! shows or executes it, producing one aggregated verdict plus the evidence
//! behind it. The engine never executes anything and has no side effects.
//!
//! # Architecture
//!
//! ```text
//! raw command string
//!        │
//!        ▼
//! ┌────────────────────┐     ┌─────────────────────────┐
//! │ Pattern Registry    │     │ Structural Extractor     │
//! │ (lexical signatures)│     │ (pipeline, best effort)  │
//! └─────────┬──────────┘     └──────────┬──────────────┘
//!           │                           │
//!           │          ┌────────────────┤
//!           ▼          ▼                ▼
//! ┌─────────────────────────────────────────────────────┐
//! │ Signal Collectors                                    │
//! │ privilege · actions · paths · blocked · allow-paths  │
//! └──────────────────────────┬──────────────────────────┘
//!                            ▼
//! ┌─────────────────────────────────────────────────────┐
//! │ Risk Aggregator (max over all contributions)         │
//! └──────────────────────────┬──────────────────────────┘
//!                            ▼
//!                    CommandAnalysis
//! ```
//!
//! # Usage
//!
//! ```
//! use riskgate::{Analyzer, RiskLevel};
//!
//! let analyzer = Analyzer::with_lists(vec!["dd".to_string()], Vec::new());
//! let analysis = analyzer.analyze("rm -rf /");
//!
//! assert_eq!(analysis.risk_level, RiskLevel::Critical);
//! assert!(!analysis.reversible);
//! ```

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod fs_info;
pub mod gate;
pub mod logging;
pub mod patterns;
pub mod risk;
pub mod shell;
pub mod signals;

// Re-export the engine surface
pub use analyzer::{Analyzer, AnalyzerConfig, CommandAnalysis, MatchedPattern};
pub use risk::{ParseRiskLevelError, RiskLevel};

// Re-export pattern registry types
pub use patterns::{
    all_patterns, by_category, by_risk_level, Category, DangerPattern, LazyPattern,
};

// Re-export structural extractor types
pub use shell::{parse, is_dynamic_token, Pipeline, Redirect, RedirectMode, Stage};

// Re-export signal types
pub use signals::{Action, Signal, BLOCKED_COMMAND_REASON, OUTSIDE_ALLOWED_PATHS_REASON};

// Re-export gate types
pub use gate::{ConfirmThreshold, Gate, GateDecision};

// Re-export config and collaborator types
pub use config::{Config, ConfigError};
pub use fs_info::{stat_paths, FileInfo};
pub use logging::{DecisionLogger, LogFormat, LoggingConfig};
