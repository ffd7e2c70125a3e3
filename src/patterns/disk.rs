//! Disk and block-device danger signatures.
//!
//! Everything in this table is either irreversible outright (raw device
//! writes, formatting) or one confirmation away from it (partition editors).

use crate::danger_pattern;
use crate::patterns::DangerPattern;

pub static PATTERNS: [DangerPattern; 5] = [
    danger_pattern!(
        r"\bdd\s+[^|;]*\bof=/dev/",
        "writes raw bytes over a block device",
        Critical,
        Disk
    ),
    danger_pattern!(
        r"\bmkfs(?:\.[a-z0-9]+)?\b",
        "formats a filesystem, destroying its contents",
        Critical,
        Disk
    ),
    danger_pattern!(
        r">\s*/dev/(?:sd|hd|nvme|vd|mmcblk)",
        "redirects output over a raw block device",
        Critical,
        Disk
    ),
    danger_pattern!(
        r"\b(?:fdisk|parted|sgdisk|cfdisk)\b",
        "partition table editor can destroy the disk layout",
        Dangerous,
        Disk
    ),
    danger_pattern!(
        r"\bwipefs\b",
        "erases filesystem signatures from a device",
        Dangerous,
        Disk
    ),
];
