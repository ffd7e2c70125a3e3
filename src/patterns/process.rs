//! Process-control danger signatures.

use crate::danger_pattern;
use crate::patterns::DangerPattern;

pub static PATTERNS: [DangerPattern; 2] = [
    danger_pattern!(
        r"\bkill\s+-(?:9|KILL|SIGKILL)\b",
        "force-kills a process without cleanup",
        Caution,
        Process
    ),
    danger_pattern!(
        r"\b(?:pkill|killall)\b",
        "kills processes by name match",
        Caution,
        Process
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn fires(command: &str) -> bool {
        PATTERNS.iter().any(|p| p.regex.is_match(command))
    }

    #[test]
    fn force_kill_fires() {
        assert!(fires("kill -9 1234"));
        assert!(fires("kill -KILL 1234"));
        assert!(fires("pkill -f myserver"));
        assert!(fires("killall node"));
    }

    #[test]
    fn polite_kill_does_not_fire() {
        assert!(!fires("kill 1234"));
        assert!(!fires("kill -TERM 1234"));
    }
}
