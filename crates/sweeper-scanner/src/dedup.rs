//! Audit matching with generic/specific pattern de-duplication.
//!
//! Specific patterns are walked first and every offset they match is
//! claimed for its path. Each generic pattern is then walked with the
//! claims of its own specifics as exclusions, so `data-contrast="auto"` is
//! reported once under `data-contrast` and not again under `data-`.
//! Generic patterns do not claim offsets, so two generic patterns never
//! suppress each other.

use crate::catalog::{Pattern, PatternCatalog};
use crate::walker::{walk, Exclusions, MatchAccumulator, Path, WalkLimits};
use std::collections::HashMap;
use sweeper_core::Record;

/// Matches of one catalog pattern at one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatch {
    /// Pattern label as written in the catalog
    pub pattern: String,
    /// Path of the matching leaf
    pub path: Path,
    /// Occurrences at that path
    pub matches: MatchAccumulator,
}

/// Run every catalog pattern over `record`.
///
/// Results are grouped by pattern, specific patterns first, each group in
/// traversal order.
#[must_use]
pub fn audit_record(
    record: &Record,
    catalog: &PatternCatalog,
    limits: &WalkLimits,
) -> Vec<PatternMatch> {
    let mut claims: HashMap<&str, Exclusions> = HashMap::new();
    let mut found = Vec::new();

    for pattern in catalog.specific_patterns() {
        for (path, matches) in walk(record, pattern.target(), limits, None) {
            claims
                .entry(pattern.as_str())
                .or_default()
                .entry(path.clone())
                .or_default()
                .extend(matches.positions.iter().copied());
            found.push(pattern_match(pattern, path, matches));
        }
    }

    for pattern in catalog.generic_patterns() {
        let excluded = claimed_by(&claims, catalog.specifics_of(pattern.as_str()));
        for (path, matches) in walk(record, pattern.target(), limits, Some(&excluded)) {
            found.push(pattern_match(pattern, path, matches));
        }
    }

    found
}

/// Offsets claimed by any of `specifics`, merged per path.
fn claimed_by(claims: &HashMap<&str, Exclusions>, specifics: &[String]) -> Exclusions {
    let mut merged = Exclusions::new();
    for per_path in specifics.iter().filter_map(|s| claims.get(s.as_str())) {
        for (path, offsets) in per_path {
            merged
                .entry(path.clone())
                .or_default()
                .extend(offsets.iter().copied());
        }
    }
    merged
}

fn pattern_match(pattern: &Pattern, path: Path, matches: MatchAccumulator) -> PatternMatch {
    PatternMatch {
        pattern: pattern.label().to_string(),
        path,
        matches,
    }
}
