//! CLI argument parsing and command handling.
//!
//! Two subcommands: `check` classifies a command line and prints the
//! analysis (pretty or JSON), `patterns` lists the signature registry,
//! filterable by category and tier. Exit codes mirror the gate decision so
//! shell callers can branch on `$?`.

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;

use crate::analyzer::{Analyzer, CommandAnalysis};
use crate::config::Config;
use crate::fs_info;
use crate::gate::{ConfirmThreshold, Gate, GateDecision};
use crate::logging::DecisionLogger;
use crate::patterns::{self, Category};
use crate::risk::RiskLevel;

/// Classify the risk of shell commands before an assistant runs them.
#[derive(Parser, Debug)]
#[command(name = "riskgate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Classify a command line and print the analysis
    Check {
        /// The command to classify (quote it, or pass trailing words)
        #[arg(required = true, trailing_var_arg = true)]
        command: Vec<String>,

        /// Output format
        #[arg(long, short, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,

        /// Stat affected paths after classification
        #[arg(long)]
        stat: bool,

        /// Override the configured confirmation threshold
        #[arg(long, value_enum)]
        threshold: Option<ConfirmThreshold>,
    },

    /// List the danger signature registry
    Patterns {
        /// Only show one category (filesystem, disk, git, ...)
        #[arg(long)]
        category: Option<String>,

        /// Only show one tier (caution, dangerous, critical)
        #[arg(long)]
        level: Option<String>,
    },
}

/// Output format for `check`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Pretty,
    Json,
}

/// Exit code for a gate decision: 0 auto-run, 2 confirm, 1 refuse.
#[must_use]
pub const fn exit_code(decision: GateDecision) -> i32 {
    match decision {
        GateDecision::AutoRun => 0,
        GateDecision::Confirm => 2,
        GateDecision::Refuse => 1,
    }
}

/// Run the `check` subcommand. Returns the process exit code.
pub fn run_check(
    config: &Config,
    command_words: &[String],
    format: OutputFormat,
    stat: bool,
    threshold: Option<ConfirmThreshold>,
) -> i32 {
    let command = command_words.join(" ");
    let analyzer = Analyzer::new(config.analyzer_config());
    let mut analysis = analyzer.analyze(&command);

    if stat {
        analysis.affected_files = fs_info::stat_paths(&analysis.affected_paths);
    }

    let gate = Gate::new(threshold.unwrap_or(config.gate.confirm_threshold));
    let decision = gate.decide(&analysis);

    match DecisionLogger::from_config(&config.logging) {
        Ok(Some(logger)) => {
            if let Err(e) = logger.log(&analysis, decision) {
                eprintln!("warning: {e}");
            }
        }
        Ok(None) => {}
        Err(e) => eprintln!("warning: {e}"),
    }

    match format {
        OutputFormat::Pretty => print_pretty(&analysis, decision),
        OutputFormat::Json => print_json(&analysis, decision),
    }

    exit_code(decision)
}

fn level_label(level: RiskLevel) -> colored::ColoredString {
    match level {
        RiskLevel::Safe => level.as_str().green(),
        RiskLevel::Caution => level.as_str().yellow(),
        RiskLevel::Dangerous => level.as_str().red(),
        RiskLevel::Critical => level.as_str().red().bold(),
    }
}

fn print_pretty(analysis: &CommandAnalysis, decision: GateDecision) {
    println!("command:  {}", analysis.command);
    println!("risk:     {}", level_label(analysis.risk_level));
    println!("decision: {decision}");
    println!(
        "reversible: {}   sudo: {}",
        analysis.reversible, analysis.requires_sudo
    );

    if !analysis.actions.is_empty() {
        let actions: Vec<&str> = analysis.actions.iter().map(|a| a.as_str()).collect();
        println!("actions:  {}", actions.join(", "));
    }
    if !analysis.risk_reasons.is_empty() {
        println!("reasons:");
        for reason in &analysis.risk_reasons {
            println!("  - {reason}");
        }
    }
    if !analysis.affected_paths.is_empty() {
        println!("paths:");
        for path in &analysis.affected_paths {
            println!("  - {path}");
        }
    }
    for info in &analysis.affected_files {
        let state = if info.exists {
            if info.is_dir {
                "directory".to_string()
            } else {
                format!("{} bytes", info.size)
            }
        } else {
            "missing".to_string()
        };
        println!("  {} ({state})", info.path);
    }
}

fn print_json(analysis: &CommandAnalysis, decision: GateDecision) {
    #[derive(serde::Serialize)]
    struct CheckOutput<'a> {
        #[serde(flatten)]
        analysis: &'a CommandAnalysis,
        decision: GateDecision,
    }

    match serde_json::to_string_pretty(&CheckOutput { analysis, decision }) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("error: failed to serialize analysis: {e}"),
    }
}

/// Run the `patterns` subcommand. Returns the process exit code.
pub fn run_patterns(category: Option<&str>, level: Option<&str>) -> i32 {
    let category = match category.map(str::parse::<Category>).transpose() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return 1;
        }
    };
    let level = match level.map(str::parse::<RiskLevel>).transpose() {
        Ok(l) => l,
        Err(e) => {
            eprintln!("error: {e}");
            return 1;
        }
    };

    let mut shown = 0;
    for pattern in patterns::all_patterns() {
        if category.is_some_and(|c| pattern.category != c) {
            continue;
        }
        if level.is_some_and(|l| pattern.risk_level != l) {
            continue;
        }
        println!(
            "{:9} {:12} {}  {}",
            level_label(pattern.risk_level),
            pattern.category.as_str(),
            pattern.regex.as_str(),
            pattern.description.dimmed()
        );
        shown += 1;
    }
    println!("{shown} patterns");
    0
}
