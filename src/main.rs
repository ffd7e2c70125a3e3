#![forbid(unsafe_code)]
//! riskgate CLI.
//!
//! Thin binary over the classification engine: loads layered config, runs
//! the requested subcommand, and exits with the gate decision (0 auto-run,
//! 2 confirm, 1 refuse).

use clap::Parser;
use riskgate::cli::{self, Cli, Command};
use riskgate::config::Config;
use std::io::IsTerminal;

/// Disable colors when stdout is not a terminal (e.g. piped to a file).
fn configure_colors() {
    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }
}

fn main() {
    configure_colors();
    let args = Cli::parse();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    let code = match args.command {
        Command::Check {
            command,
            format,
            stat,
            threshold,
        } => cli::run_check(&config, &command, format, stat, threshold),
        Command::Patterns { category, level } => {
            cli::run_patterns(category.as_deref(), level.as_deref())
        }
    };
    std::process::exit(code);
}
