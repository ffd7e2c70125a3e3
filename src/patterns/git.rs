//! Git danger signatures: history rewriting and working-tree destruction.

use crate::danger_pattern;
use crate::patterns::DangerPattern;

pub static PATTERNS: [DangerPattern; 4] = [
    danger_pattern!(
        r"\bgit\s+push\s+[^|;]*(?:--force\b|-f\b)",
        "force push rewrites remote history",
        Caution,
        Git
    ),
    danger_pattern!(
        r"\bgit\s+reset\s+--hard\b",
        "hard reset discards uncommitted changes",
        Caution,
        Git
    ),
    danger_pattern!(
        r"\bgit\s+clean\s+-[a-zA-Z]*[fd]",
        "git clean deletes untracked files",
        Caution,
        Git
    ),
    danger_pattern!(
        r"\bgit\s+branch\s+-D\b",
        "force-deletes a branch without merge check",
        Caution,
        Git
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn fires(command: &str) -> bool {
        PATTERNS.iter().any(|p| p.regex.is_match(command))
    }

    #[test]
    fn destructive_git_fires() {
        assert!(fires("git push --force origin main"));
        assert!(fires("git push -f"));
        assert!(fires("git reset --hard HEAD~3"));
        assert!(fires("git clean -fd"));
        assert!(fires("git branch -D feature"));
    }

    #[test]
    fn ordinary_git_does_not_fire() {
        assert!(!fires("git status"));
        assert!(!fires("git push origin main"));
        assert!(!fires("git reset --soft HEAD~1"));
        assert!(!fires("git branch -d merged-branch"));
    }
}
