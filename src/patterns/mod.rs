//! Danger signature registry.
//!
//! This module holds the curated table of danger patterns that drives lexical
//! risk detection. Patterns are organized into per-category submodules
//! (filesystem, disk, system, ...) and flattened into a single process-wide
//! registry built once behind a `LazyLock`.
//!
//! Matching policy: a pattern fires when its regex matches anywhere in the
//! raw command text. All firing patterns are retained; the aggregator takes
//! the maximum tier, never just the first hit.
//!
//! Regexes are compiled lazily on first use so that registry construction
//! stays allocation-free and cheap for callers that never classify anything.

pub mod disk;
pub mod docker;
pub mod filesystem;
pub mod git;
pub mod network;
pub mod packages;
pub mod permissions;
pub mod process;
pub mod system;

use crate::risk::RiskLevel;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::{LazyLock, OnceLock};

/// Category tag for a danger pattern. Closed vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Filesystem,
    Disk,
    System,
    Permissions,
    Network,
    Process,
    Git,
    Docker,
    Packages,
}

impl Category {
    /// All categories, in registry order.
    pub const ALL: [Self; 9] = [
        Self::Filesystem,
        Self::Disk,
        Self::System,
        Self::Permissions,
        Self::Network,
        Self::Process,
        Self::Git,
        Self::Docker,
        Self::Packages,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Filesystem => "filesystem",
            Self::Disk => "disk",
            Self::System => "system",
            Self::Permissions => "permissions",
            Self::Network => "network",
            Self::Process => "process",
            Self::Git => "git",
            Self::Docker => "docker",
            Self::Packages => "packages",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown category name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCategoryError {
    pub input: String,
}

impl std::fmt::Display for ParseCategoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown pattern category {:?}", self.input)
    }
}

impl std::error::Error for ParseCategoryError {}

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|c| c.as_str() == s.to_ascii_lowercase())
            .copied()
            .ok_or_else(|| ParseCategoryError {
                input: s.to_string(),
            })
    }
}

/// A lazily-compiled regex signature.
///
/// Construction is `const` and performs no compilation; the regex is compiled
/// on first match. Compilation failures fail open (`is_match` returns false)
/// rather than panicking inside classification.
pub struct LazyPattern {
    source: &'static str,
    compiled: OnceLock<Result<Regex, regex::Error>>,
}

impl LazyPattern {
    #[must_use]
    pub const fn new(source: &'static str) -> Self {
        Self {
            source,
            compiled: OnceLock::new(),
        }
    }

    fn get_compiled(&self) -> Option<&Regex> {
        let result = self.compiled.get_or_init(|| Regex::new(self.source));
        if let Err(e) = result {
            tracing::warn!(pattern = self.source, error = %e, "danger pattern failed to compile");
        }
        result.as_ref().ok()
    }

    /// Check whether the signature matches anywhere in `haystack`.
    #[must_use]
    pub fn is_match(&self, haystack: &str) -> bool {
        self.get_compiled().is_some_and(|re| re.is_match(haystack))
    }

    /// The signature source text.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        self.source
    }

    /// Whether the regex compiles. Used by the registry audit test.
    #[must_use]
    pub fn compiles(&self) -> bool {
        self.get_compiled().is_some()
    }
}

/// One curated danger signature.
///
/// Invariant (enforced by the registry audit test): non-empty description,
/// a regex that compiles, and a tier above `Safe`.
pub struct DangerPattern {
    /// Lazily-compiled signature regex.
    pub regex: LazyPattern,
    /// Human-readable explanation, surfaced verbatim in `risk_reasons`.
    pub description: &'static str,
    /// Tier contributed to aggregation when this pattern fires.
    pub risk_level: RiskLevel,
    /// Category tag for filtering and display.
    pub category: Category,
}

impl std::fmt::Debug for DangerPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DangerPattern")
            .field("pattern", &self.regex.as_str())
            .field("description", &self.description)
            .field("risk_level", &self.risk_level)
            .field("category", &self.category)
            .finish()
    }
}

/// Macro to declare a danger pattern table entry.
///
/// The regex is lazily compiled on first use, not at construction time.
#[macro_export]
macro_rules! danger_pattern {
    ($re:literal, $desc:literal, $level:ident, $category:ident) => {
        $crate::patterns::DangerPattern {
            regex: $crate::patterns::LazyPattern::new($re),
            description: $desc,
            risk_level: $crate::risk::RiskLevel::$level,
            category: $crate::patterns::Category::$category,
        }
    };
}

/// The canonical registry: every category table flattened, built once.
static REGISTRY: LazyLock<Vec<&'static DangerPattern>> = LazyLock::new(|| {
    let mut table: Vec<&'static DangerPattern> = Vec::new();
    table.extend(filesystem::PATTERNS.iter());
    table.extend(disk::PATTERNS.iter());
    table.extend(system::PATTERNS.iter());
    table.extend(permissions::PATTERNS.iter());
    table.extend(network::PATTERNS.iter());
    table.extend(process::PATTERNS.iter());
    table.extend(git::PATTERNS.iter());
    table.extend(docker::PATTERNS.iter());
    table.extend(packages::PATTERNS.iter());
    table
});

/// All registered patterns, in registry order.
///
/// Returns a fresh `Vec` each call; the canonical table is never exposed
/// mutably.
#[must_use]
pub fn all_patterns() -> Vec<&'static DangerPattern> {
    REGISTRY.clone()
}

/// Patterns tagged with the given category.
#[must_use]
pub fn by_category(category: Category) -> Vec<&'static DangerPattern> {
    REGISTRY
        .iter()
        .copied()
        .filter(|p| p.category == category)
        .collect()
}

/// Patterns at exactly the given tier.
#[must_use]
pub fn by_risk_level(level: RiskLevel) -> Vec<&'static DangerPattern> {
    REGISTRY
        .iter()
        .copied()
        .filter(|p| p.risk_level == level)
        .collect()
}

/// Every pattern that fires against the raw command text.
///
/// All hits are retained, in registry order. Aggregation decides what wins.
#[must_use]
pub fn matching(command: &str) -> Vec<&'static DangerPattern> {
    REGISTRY
        .iter()
        .copied()
        .filter(|p| p.regex.is_match(command))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_audit() {
        let patterns = all_patterns();
        assert!(!patterns.is_empty());
        for p in patterns {
            assert!(
                p.regex.compiles(),
                "pattern {:?} does not compile",
                p.regex.as_str()
            );
            assert!(
                !p.description.is_empty(),
                "pattern {:?} has empty description",
                p.regex.as_str()
            );
            assert!(
                p.risk_level > RiskLevel::Safe,
                "pattern {:?} is tiered Safe, which can never fire usefully",
                p.regex.as_str()
            );
        }
    }

    #[test]
    fn category_filter_is_consistent() {
        let mut total = 0;
        for category in Category::ALL {
            let subset = by_category(category);
            assert!(subset.iter().all(|p| p.category == category));
            total += subset.len();
        }
        assert_eq!(total, all_patterns().len());
    }

    #[test]
    fn level_filter_partitions_registry() {
        let total: usize = [
            RiskLevel::Safe,
            RiskLevel::Caution,
            RiskLevel::Dangerous,
            RiskLevel::Critical,
        ]
        .into_iter()
        .map(|l| by_risk_level(l).len())
        .sum();
        assert_eq!(total, all_patterns().len());
    }

    #[test]
    fn returned_slices_are_fresh() {
        let a = all_patterns();
        let mut b = all_patterns();
        b.clear();
        assert!(!a.is_empty());
        assert_eq!(all_patterns().len(), a.len());
    }

    #[test]
    fn category_names_round_trip() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>(), Ok(category));
        }
        assert!("databases".parse::<Category>().is_err());
    }

    #[test]
    fn all_firing_patterns_are_retained() {
        // rm -rf / trips both the root-deletion signature and the generic
        // recursive-delete signature.
        let hits = matching("rm -rf /");
        assert!(hits.len() >= 2, "expected multiple hits, got {hits:?}");
        assert!(hits.iter().any(|p| p.risk_level == RiskLevel::Critical));
        assert!(hits.iter().any(|p| p.risk_level == RiskLevel::Caution));
    }
}
