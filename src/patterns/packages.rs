//! Package-manager danger signatures: bulk or unconfirmed removal.

use crate::danger_pattern;
use crate::patterns::DangerPattern;

pub static PATTERNS: [DangerPattern; 4] = [
    danger_pattern!(
        r"\bapt(?:-get)?\s+(?:-y\s+)?(?:remove|purge|autoremove)\b",
        "removes system packages",
        Caution,
        Packages
    ),
    danger_pattern!(
        r"\b(?:yum|dnf)\s+(?:-y\s+)?remove\b",
        "removes system packages",
        Caution,
        Packages
    ),
    danger_pattern!(
        r"\bnpm\s+(?:uninstall|rm)\s+(?:-g|--global)\b",
        "removes a global npm package",
        Caution,
        Packages
    ),
    danger_pattern!(
        r"\bpip3?\s+uninstall\s+[^|;]*-y\b",
        "removes python packages without confirmation",
        Caution,
        Packages
    ),
];
