//! Docker danger signatures: bulk removal of containers, images, volumes.

use crate::danger_pattern;
use crate::patterns::DangerPattern;

pub static PATTERNS: [DangerPattern; 4] = [
    danger_pattern!(
        r"\bdocker\s+system\s+prune\b",
        "removes all unused containers, images, and networks",
        Caution,
        Docker
    ),
    danger_pattern!(
        r"\bdocker\s+rm\s+-[a-zA-Z]*f",
        "force-removes a running container",
        Caution,
        Docker
    ),
    danger_pattern!(
        r"\bdocker\s+(?:rm|rmi)\s+[^|;]*\$\(",
        "bulk container or image removal",
        Caution,
        Docker
    ),
    danger_pattern!(
        r"\bdocker\s+volume\s+(?:prune|rm)\b",
        "deletes container volumes",
        Caution,
        Docker
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn fires(command: &str) -> bool {
        PATTERNS.iter().any(|p| p.regex.is_match(command))
    }

    #[test]
    fn bulk_removal_fires() {
        assert!(fires("docker system prune -a"));
        assert!(fires("docker rm -f webserver"));
        assert!(fires("docker rm $(docker ps -aq)"));
        assert!(fires("docker volume prune"));
    }

    #[test]
    fn ordinary_docker_does_not_fire() {
        assert!(!fires("docker ps -a"));
        assert!(!fires("docker build -t app ."));
        assert!(!fires("docker rm stopped-container"));
    }
}
