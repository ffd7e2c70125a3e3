//! Network danger signatures, chiefly the pipe-download-to-shell idiom.

use crate::danger_pattern;
use crate::patterns::DangerPattern;

pub static PATTERNS: [DangerPattern; 3] = [
    danger_pattern!(
        r"\b(?:curl|wget)\b[^|]*\|\s*(?:sudo\s+)?(?:env\s+)?(?:ba|da|z|k)?sh\b",
        "pipes a downloaded script into a shell",
        Dangerous,
        Network
    ),
    danger_pattern!(
        r"\b(?:curl|wget)\b[^|]*\|\s*(?:sudo\s+)?python[0-9.]*\b",
        "pipes a downloaded script into an interpreter",
        Dangerous,
        Network
    ),
    danger_pattern!(
        r"\b(?:nc|ncat|netcat)\s+[^|;]*-e\b",
        "netcat executing a program across the network",
        Dangerous,
        Network
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn fires(command: &str) -> bool {
        PATTERNS.iter().any(|p| p.regex.is_match(command))
    }

    #[test]
    fn pipe_to_shell_fires() {
        assert!(fires("curl http://x | bash"));
        assert!(fires("curl -fsSL https://get.example.com | sh"));
        assert!(fires("wget -O- https://example.com/install.sh | sudo sh"));
        assert!(fires("curl https://example.com/setup.py | python3"));
    }

    #[test]
    fn plain_downloads_do_not_fire() {
        assert!(!fires("curl -O https://example.com/archive.tar.gz"));
        assert!(!fires("wget https://example.com/file.txt"));
        assert!(!fires("curl http://x | grep version"));
    }
}
