//! Permission and ownership danger signatures.

use crate::danger_pattern;
use crate::patterns::DangerPattern;

pub static PATTERNS: [DangerPattern; 4] = [
    danger_pattern!(
        r"\bchmod\s+(?:-[a-zA-Z]+\s+)*0?000\s+/(?:\s|$)",
        "zeroes permissions on the root filesystem",
        Critical,
        Permissions
    ),
    danger_pattern!(
        r"\bchmod\s+-[a-zA-Z]*R[a-zA-Z]*\s+.*777\b",
        "recursive world-writable permissions",
        Dangerous,
        Permissions
    ),
    danger_pattern!(
        r"\bchmod\s+(?:-[a-zA-Z]+\s+)*0?777\s+/",
        "world-writable permissions on a system path",
        Dangerous,
        Permissions
    ),
    danger_pattern!(
        r"\bchown\s+-[a-zA-Z]*R",
        "recursive ownership change",
        Dangerous,
        Permissions
    ),
];
