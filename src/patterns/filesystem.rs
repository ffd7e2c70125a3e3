//! Filesystem danger signatures.
//!
//! Covers recursive/force deletion, root and home tree deletion, wildcard
//! deletes, destructive redirects, and irrecoverable file mutation
//! (shred/truncate).

use crate::danger_pattern;
use crate::patterns::DangerPattern;

pub static PATTERNS: [DangerPattern; 10] = [
    danger_pattern!(
        r"\brm\s+(?:(?:-[a-zA-Z]+|--\S+)\s+)*/(?:\*)?(?:\s|$)",
        "recursively deletes the root directory tree",
        Critical,
        Filesystem
    ),
    danger_pattern!(
        r"\brm\s+(?:(?:-[a-zA-Z]+|--\S+)\s+)*(?:~/?|\$HOME/?|/home/[^/\s]+/?)(?:\s|$)",
        "recursively deletes a home directory tree",
        Critical,
        Filesystem
    ),
    danger_pattern!(
        r"\bsudo\s+rm\s+-[a-zA-Z]*[rR]",
        "privileged recursive delete",
        Dangerous,
        Filesystem
    ),
    danger_pattern!(
        r"\brm\s+(?:-\S+\s+)*\S*\*",
        "wildcard delete can remove far more than intended",
        Dangerous,
        Filesystem
    ),
    danger_pattern!(
        r">\s*/etc/",
        "redirects output into /etc",
        Dangerous,
        Filesystem
    ),
    danger_pattern!(
        r"\brm\s+(?:-\S+\s+)*-[a-zA-Z]*[rR][a-zA-Z]*\b",
        "recursive delete",
        Caution,
        Filesystem
    ),
    danger_pattern!(
        r"\brm\s+(?:-\S+\s+)*-[a-zA-Z]*f[a-zA-Z]*\b",
        "force delete skips confirmation",
        Caution,
        Filesystem
    ),
    danger_pattern!(
        r"(?:^|[^>])>\s*[^>&\s]",
        "output redirection overwrites the target file",
        Caution,
        Filesystem
    ),
    danger_pattern!(
        r"\bshred\b",
        "shred overwrites file contents beyond recovery",
        Caution,
        Filesystem
    ),
    danger_pattern!(
        r"\btruncate\s+(?:-s\s*0|--size[ =]0)\b",
        "truncates a file to zero length",
        Caution,
        Filesystem
    ),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::RiskLevel;

    fn hits(command: &str) -> Vec<&'static DangerPattern> {
        PATTERNS
            .iter()
            .filter(|p| p.regex.is_match(command))
            .collect()
    }

    #[test]
    fn root_deletion_is_critical() {
        for cmd in [
            "rm -rf /",
            "rm -rf / --no-preserve-root",
            "rm -fr /*",
            "rm --force -r /",
            "rm -r --force /",
        ] {
            assert!(
                hits(cmd).iter().any(|p| p.risk_level == RiskLevel::Critical),
                "expected critical hit for {cmd:?}"
            );
        }
    }

    #[test]
    fn home_deletion_is_critical() {
        for cmd in ["rm -rf ~", "rm -rf $HOME", "rm -rf /home/alice"] {
            assert!(
                hits(cmd).iter().any(|p| p.risk_level == RiskLevel::Critical),
                "expected critical hit for {cmd:?}"
            );
        }
    }

    #[test]
    fn subdirectory_deletion_is_not_critical() {
        for cmd in ["rm -rf ./build", "rm -rf /tmp/scratch", "rm -rf ~/project"] {
            assert!(
                hits(cmd).iter().all(|p| p.risk_level < RiskLevel::Critical),
                "unexpected critical hit for {cmd:?}"
            );
        }
    }

    #[test]
    fn recursive_and_force_delete_are_caution() {
        let matched = hits("rm -rf ./build");
        assert!(matched.iter().any(|p| p.description == "recursive delete"));
        assert!(
            matched
                .iter()
                .any(|p| p.description == "force delete skips confirmation")
        );
    }

    #[test]
    fn overwrite_redirect_fires_but_append_does_not() {
        assert!(!hits("echo hi > notes.txt").is_empty());
        assert!(
            hits("echo hi >> notes.txt").is_empty(),
            "append redirect must not trip the overwrite signature"
        );
    }

    #[test]
    fn plain_commands_do_not_fire() {
        assert!(hits("ls -la").is_empty());
        assert!(hits("echo hello").is_empty());
        assert!(hits("grep -r pattern .").is_empty());
    }
}
