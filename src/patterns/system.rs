//! System-level danger signatures: privilege escalation, fork bombs,
//! shutdown, history clearing, service control.

use crate::danger_pattern;
use crate::patterns::DangerPattern;

pub static PATTERNS: [DangerPattern; 6] = [
    danger_pattern!(
        r":\(\)\s*\{\s*:\|:&\s*\}\s*;?\s*:?",
        "fork bomb exhausts the process table",
        Critical,
        System
    ),
    danger_pattern!(
        r"\bsudo\b",
        "runs with elevated privileges",
        Caution,
        System
    ),
    danger_pattern!(
        r"\b(?:shutdown|reboot|poweroff)\b",
        "shuts down or restarts the machine",
        Caution,
        System
    ),
    danger_pattern!(
        r"\bsystemctl\s+(?:stop|disable|mask)\b",
        "stops or disables a system service",
        Caution,
        System
    ),
    danger_pattern!(
        r"\bhistory\s+-c\b",
        "clears shell history",
        Caution,
        System
    ),
    danger_pattern!(
        r"\brm\s+\S*(?:bash_history|zsh_history)",
        "deletes shell history files",
        Caution,
        System
    ),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::RiskLevel;

    fn fires(command: &str) -> bool {
        PATTERNS.iter().any(|p| p.regex.is_match(command))
    }

    #[test]
    fn fork_bomb_is_critical() {
        let hit = PATTERNS
            .iter()
            .find(|p| p.regex.is_match(":(){ :|:& };:"))
            .expect("fork bomb signature should fire");
        assert_eq!(hit.risk_level, RiskLevel::Critical);
    }

    #[test]
    fn sudo_fires_anywhere_in_text() {
        assert!(fires("sudo apt update"));
        assert!(fires("make && sudo make install"));
    }

    #[test]
    fn history_clearing_fires() {
        assert!(fires("history -c"));
        assert!(fires("rm ~/.bash_history"));
    }

    #[test]
    fn ordinary_commands_do_not_fire() {
        assert!(!fires("echo hello"));
        assert!(!fires("cargo build --release"));
    }
}
