//! Structural signal collectors.
//!
//! Each collector consumes the raw command string and/or the parsed
//! [`Pipeline`] and emits typed signals: a risk-level floor plus a reason
//! string. The aggregator reduces all signals with `max`; no collector
//! decides the verdict on its own.

use crate::risk::RiskLevel;
use crate::shell::{self, Pipeline, RedirectMode};
use serde::{Deserialize, Serialize};

/// Reason attached to a blocked-command signal. The execution gate keys off
/// this string to refuse regardless of threshold.
pub const BLOCKED_COMMAND_REASON: &str = "command is explicitly blocked";

/// Reason attached to the privilege signal.
pub const SUDO_REASON: &str = "requires sudo";

/// Reason attached to writes into /etc detected structurally.
pub const ETC_REDIRECT_REASON: &str = "redirects output into /etc";

/// Reason attached to allowed-path violations.
pub const OUTSIDE_ALLOWED_PATHS_REASON: &str = "writes outside allowed paths";

/// A typed risk contribution from a structural collector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signal {
    /// Minimum tier this signal imposes on the aggregate.
    pub floor: RiskLevel,
    /// Human-readable reason, surfaced in `risk_reasons`.
    pub reason: String,
}

impl Signal {
    #[must_use]
    pub fn new(floor: RiskLevel, reason: impl Into<String>) -> Self {
        Self {
            floor,
            reason: reason.into(),
        }
    }
}

/// Fixed action vocabulary for known mutating commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Delete,
    Move,
    Copy,
    Overwrite,
    Kill,
    Permissions,
    Shutdown,
}

impl Action {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Delete => "DELETE",
            Self::Move => "MOVE",
            Self::Copy => "COPY",
            Self::Overwrite => "OVERWRITE",
            Self::Kill => "KILL",
            Self::Permissions => "PERMISSIONS",
            Self::Shutdown => "SHUTDOWN",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a command name to its action, if known. Unknown names are not an
/// error; they simply contribute nothing.
#[must_use]
pub fn action_for_command(name: &str) -> Option<Action> {
    if name.starts_with("mkfs") {
        return Some(Action::Overwrite);
    }
    match name {
        "rm" | "rmdir" | "unlink" | "shred" => Some(Action::Delete),
        "mv" => Some(Action::Move),
        "cp" | "rsync" | "scp" => Some(Action::Copy),
        "dd" | "truncate" => Some(Action::Overwrite),
        "kill" | "pkill" | "killall" => Some(Action::Kill),
        "chmod" | "chown" | "chgrp" => Some(Action::Permissions),
        "shutdown" | "reboot" | "poweroff" | "halt" => Some(Action::Shutdown),
        _ => None,
    }
}

/// Privilege collector: true iff any stage's command name is exactly `sudo`.
#[must_use]
pub fn requires_sudo(pipeline: &Pipeline) -> bool {
    pipeline.stages.iter().any(|s| s.name == "sudo")
}

/// Degraded privilege check for unparsable commands: leading raw token.
#[must_use]
pub fn raw_requires_sudo(command: &str) -> bool {
    command.split_whitespace().next() == Some("sudo")
}

/// Action collector: actions across all stages and write redirects,
/// deduplicated in first-appearance order.
#[must_use]
pub fn collect_actions(pipeline: &Pipeline) -> Vec<Action> {
    let mut actions = Vec::new();
    for stage in &pipeline.stages {
        if let Some(action) = action_for_command(stage.effective_name()) {
            if !actions.contains(&action) {
                actions.push(action);
            }
        }
        if stage
            .redirects
            .iter()
            .any(|r| r.mode == RedirectMode::Write)
            && !actions.contains(&Action::Overwrite)
        {
            actions.push(Action::Overwrite);
        }
    }
    actions
}

/// Path collector: literal non-flag arguments per stage plus every redirect
/// target. Relative paths stay relative; dynamic tokens stay verbatim.
#[must_use]
pub fn collect_paths(pipeline: &Pipeline) -> Vec<String> {
    let mut paths = Vec::new();
    for stage in &pipeline.stages {
        let mut args: &[String] = &stage.args;
        if stage.name == "sudo" {
            // Drop sudo's own flags (and their values) plus the wrapped
            // command name.
            args = match shell::sudo_command_index(&stage.args) {
                Some(pos) => &stage.args[pos + 1..],
                None => &[],
            };
        }
        for arg in args {
            if !arg.starts_with('-') && !arg.is_empty() && !paths.contains(arg) {
                paths.push(arg.clone());
            }
        }
        for redirect in &stage.redirects {
            if !paths.contains(&redirect.target) {
                paths.push(redirect.target.clone());
            }
        }
    }
    paths
}

/// Allow/block collector, blocking half: fires when the first stage's
/// effective command name is in the blocked list.
///
/// Falls back to raw whitespace tokens when no structure is available, so a
/// blocked command stays blocked even when parsing degrades.
#[must_use]
pub fn blocked_command(
    pipeline: Option<&Pipeline>,
    command: &str,
    blocked: &[String],
) -> Option<Signal> {
    if blocked.is_empty() {
        return None;
    }
    let name = match pipeline {
        Some(p) => p.stages.first().map(|s| s.effective_name().to_string()),
        None => raw_effective_first_token(command),
    }?;
    if blocked.iter().any(|b| b == &name) {
        Some(Signal::new(RiskLevel::Critical, BLOCKED_COMMAND_REASON))
    } else {
        None
    }
}

fn raw_effective_first_token(command: &str) -> Option<String> {
    let tokens: Vec<&str> = command.split_whitespace().collect();
    let first = tokens.first()?;
    if *first == "sudo" {
        shell::sudo_command_index(&tokens[1..]).map(|i| tokens[1 + i].to_string())
    } else {
        Some((*first).to_string())
    }
}

/// Allow/block collector, allow-path half: fires when any collected literal
/// absolute (or `~`) path falls outside every allowed prefix.
///
/// The contributed tier is policy, not a constant; callers configure it
/// (default Caution). Relative and dynamic paths are skipped since they
/// cannot be compared without resolution.
#[must_use]
pub fn allowed_path_violation(
    paths: &[String],
    allowed: &[String],
    level: RiskLevel,
) -> Option<Signal> {
    if allowed.is_empty() {
        return None;
    }
    let violation = paths.iter().find(|path| {
        (path.starts_with('/') || path.starts_with('~'))
            && !shell::is_dynamic_token(path)
            && !allowed.iter().any(|prefix| within_prefix(path, prefix))
    })?;
    Some(Signal::new(
        level,
        format!("{OUTSIDE_ALLOWED_PATHS_REASON}: {violation}"),
    ))
}

/// Prefix containment on component boundaries: `/tmp` covers `/tmp` and
/// `/tmp/x` but not `/tmpfoo`.
fn within_prefix(path: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        return path.starts_with('/');
    }
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// Structural signals derived from the parsed pipeline: privilege floor,
/// redirect overwrites, and writes into /etc.
#[must_use]
pub fn structural_signals(pipeline: &Pipeline) -> Vec<Signal> {
    let mut signals = Vec::new();

    if requires_sudo(pipeline) {
        signals.push(Signal::new(RiskLevel::Caution, SUDO_REASON));
    }

    for stage in &pipeline.stages {
        for redirect in &stage.redirects {
            if redirect.target.starts_with("/etc") {
                signals.push(Signal::new(RiskLevel::Dangerous, ETC_REDIRECT_REASON));
            } else if redirect.mode == RedirectMode::Write {
                signals.push(Signal::new(
                    RiskLevel::Caution,
                    format!("overwrites {} via redirect", redirect.target),
                ));
            }
        }
    }

    signals
}
