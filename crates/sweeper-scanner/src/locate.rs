//! Occurrence location and snippet extraction within a single leaf.
//!
//! Offsets are character offsets into the normalized leaf text. Case
//! folding maps each character to exactly one character, so offsets in
//! the folded copy line up with the text the snippets are cut from.

use crate::normalize::normalize;
use std::collections::HashSet;
use sweeper_core::ScanningConfig;

/// Marker placed where a snippet window was cut short.
pub const ELLIPSIS: &str = "...";

/// Bounds on snippet generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnippetLimits {
    /// Characters of context kept on each side of a match
    pub context_chars: usize,
    /// Snippets generated per leaf; later occurrences are only counted
    pub max_snippets: usize,
}

impl Default for SnippetLimits {
    fn default() -> Self {
        Self {
            context_chars: 100,
            max_snippets: 3,
        }
    }
}

impl From<&ScanningConfig> for SnippetLimits {
    fn from(config: &ScanningConfig) -> Self {
        Self {
            context_chars: config.snippet_context_chars,
            max_snippets: config.max_snippets_per_path.max(1),
        }
    }
}

/// A search term or catalog pattern, normalized and case-folded once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    normalized: String,
    folded: Vec<char>,
    folded_text: String,
}

impl Target {
    /// Prepare a raw term for matching.
    #[must_use]
    pub fn new(raw: &str) -> Self {
        let normalized = normalize(raw);
        let folded: Vec<char> = normalized.chars().map(fold_char).collect();
        let folded_text = folded.iter().collect();
        Self {
            normalized,
            folded,
            folded_text,
        }
    }

    /// The normalized term, original case.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.normalized
    }

    /// The normalized, case-folded term.
    #[must_use]
    pub fn folded(&self) -> &str {
        &self.folded_text
    }

    /// Whether the term is empty after normalization.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.folded.is_empty()
    }

    /// Whether the term is empty or only whitespace.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.normalized.trim().is_empty()
    }
}

/// Lowercase a character without changing the character count.
fn fold_char(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

/// Occurrences of one target within one leaf.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Located {
    /// True number of non-overlapping occurrences
    pub count: usize,
    /// Context snippets for the first occurrences
    pub snippets: Vec<String>,
    /// Character offset of every counted occurrence
    pub positions: Vec<usize>,
    /// Whether the leaf itself has no visible text
    pub blank: bool,
}

impl Located {
    /// Whether nothing was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Find every non-overlapping, case-insensitive occurrence of `target` in
/// already-normalized `text`.
///
/// Occurrences starting at an offset in `excluded` are skipped entirely.
#[must_use]
pub fn locate(
    text: &str,
    target: &Target,
    limits: &SnippetLimits,
    excluded: Option<&HashSet<usize>>,
) -> Located {
    let mut located = Located {
        blank: text.trim().is_empty(),
        ..Located::default()
    };
    if target.is_empty() {
        return located;
    }

    let chars: Vec<char> = text.chars().collect();
    let folded: Vec<char> = chars.iter().copied().map(fold_char).collect();
    let needle = target.folded.as_slice();

    let mut from = 0;
    while let Some(pos) = find_from(&folded, needle, from) {
        from = pos + needle.len();
        if excluded.is_some_and(|claimed| claimed.contains(&pos)) {
            continue;
        }

        located.count += 1;
        located.positions.push(pos);
        if located.snippets.len() < limits.max_snippets {
            located
                .snippets
                .push(snippet(&chars, pos, needle.len(), limits.context_chars));
        }
    }

    located
}

/// Containment check for stringified number and boolean leaves.
///
/// The value is not normalized and yields at most one occurrence, whose
/// snippet is the value itself.
#[must_use]
pub fn locate_scalar(
    value: &str,
    target: &Target,
    excluded: Option<&HashSet<usize>>,
) -> Located {
    if target.is_empty() {
        return Located::default();
    }

    let lowered = value.to_lowercase();
    let Some(byte_pos) = lowered.find(target.folded()) else {
        return Located::default();
    };
    let pos = lowered[..byte_pos].chars().count();
    if excluded.is_some_and(|claimed| claimed.contains(&pos)) {
        return Located::default();
    }

    Located {
        count: 1,
        snippets: vec![value.to_string()],
        positions: vec![pos],
        blank: value.trim().is_empty(),
    }
}

fn find_from(haystack: &[char], needle: &[char], from: usize) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    (from..=haystack.len() - needle.len()).find(|&i| haystack[i..i + needle.len()] == *needle)
}

/// Cut a context window around `chars[start..start + len]`.
///
/// The window extends `context` characters each way, clipped to the text;
/// `"..."` marks a side where text was left out.
#[must_use]
pub fn snippet(chars: &[char], start: usize, len: usize, context: usize) -> String {
    let window_start = start.saturating_sub(context);
    let window_end = (start + len + context).min(chars.len());

    let mut out = String::new();
    if window_start > 0 {
        out.push_str(ELLIPSIS);
    }
    out.extend(&chars[window_start..window_end]);
    if window_end < chars.len() {
        out.push_str(ELLIPSIS);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> SnippetLimits {
        SnippetLimits::default()
    }

    #[test]
    fn test_counts_non_overlapping_case_insensitive() {
        let target = Target::new("aa");
        let located = locate("AAAa aa", &target, &limits(), None);
        assert_eq!(located.count, 3);
        assert_eq!(located.positions, vec![0, 2, 5]);
    }

    #[test]
    fn test_no_match() {
        let located = locate("nothing here", &Target::new("acme"), &limits(), None);
        assert!(located.is_empty());
        assert!(located.snippets.is_empty());
    }

    #[test]
    fn test_empty_target_never_matches() {
        let located = locate("anything", &Target::new(""), &limits(), None);
        assert!(located.is_empty());
    }

    #[test]
    fn test_target_is_normalized() {
        let target = Target::new("Acme\u{00A0}\u{00A0}Corp");
        assert_eq!(target.as_str(), "Acme Corp");
        assert_eq!(target.folded(), "acme corp");

        let located = locate("Welcome to ACME CORP today", &target, &limits(), None);
        assert_eq!(located.count, 1);
        assert_eq!(located.positions, vec![11]);
    }

    #[test]
    fn test_blank_target() {
        assert!(Target::new(" \t ").is_blank());
        assert!(!Target::new(" x ").is_blank());
    }

    #[test]
    fn test_snippet_at_start_has_no_leading_marker() {
        let text = format!("acme{}", "x".repeat(200));
        let located = locate(&text, &Target::new("acme"), &limits(), None);
        let snippet = &located.snippets[0];
        assert!(!snippet.starts_with(ELLIPSIS));
        assert!(snippet.ends_with(ELLIPSIS));
        assert_eq!(snippet.chars().count(), 4 + 100 + 3);
    }

    #[test]
    fn test_snippet_at_end_has_no_trailing_marker() {
        let text = format!("{}acme", "x".repeat(200));
        let located = locate(&text, &Target::new("acme"), &limits(), None);
        let snippet = &located.snippets[0];
        assert!(snippet.starts_with(ELLIPSIS));
        assert!(!snippet.ends_with(ELLIPSIS));
    }

    #[test]
    fn test_snippet_in_middle_has_both_markers() {
        let text = format!("{}acme{}", "x".repeat(150), "y".repeat(150));
        let located = locate(&text, &Target::new("acme"), &limits(), None);
        let snippet = &located.snippets[0];
        assert_eq!(snippet, &format!("...{}acme{}...", "x".repeat(100), "y".repeat(100)));
    }

    #[test]
    fn test_short_text_snippet_is_whole_text() {
        let located = locate("Buy Acme now", &Target::new("acme"), &limits(), None);
        assert_eq!(located.snippets, vec!["Buy Acme now".to_string()]);
    }

    #[test]
    fn test_snippet_cap_keeps_true_count() {
        let text = "acme ".repeat(100);
        let located = locate(&text, &Target::new("acme"), &limits(), None);
        assert_eq!(located.count, 100);
        assert_eq!(located.positions.len(), 100);
        assert_eq!(located.snippets.len(), 3);
    }

    #[test]
    fn test_excluded_offsets_are_skipped() {
        let excluded: HashSet<usize> = [0].into_iter().collect();
        let located = locate("data-x data-y", &Target::new("data-"), &limits(), Some(&excluded));
        assert_eq!(located.count, 1);
        assert_eq!(located.positions, vec![7]);
        assert_eq!(located.snippets, vec!["data-x data-y".to_string()]);
    }

    #[test]
    fn test_offsets_are_character_based() {
        let located = locate("\u{00E9}t\u{00E9} acme", &Target::new("ACME"), &limits(), None);
        assert_eq!(located.positions, vec![4]);
    }

    #[test]
    fn test_locate_scalar() {
        let located = locate_scalar("2024", &Target::new("02"), None);
        assert_eq!(located.count, 1);
        assert_eq!(located.positions, vec![1]);
        assert_eq!(located.snippets, vec!["2024".to_string()]);

        assert_eq!(locate_scalar("true", &Target::new("TRU"), None).count, 1);
        assert!(locate_scalar("false", &Target::new("true"), None).is_empty());
    }

    #[test]
    fn test_limits_from_config() {
        let config = ScanningConfig {
            max_depth: 10,
            snippet_context_chars: 20,
            max_snippets_per_path: 1,
        };
        let limits = SnippetLimits::from(&config);
        assert_eq!(limits.context_chars, 20);
        assert_eq!(limits.max_snippets, 1);
    }

    #[test]
    fn test_zero_snippet_cap_is_raised_to_one() {
        let config = ScanningConfig {
            max_snippets_per_path: 0,
            ..ScanningConfig::default()
        };
        assert_eq!(SnippetLimits::from(&config).max_snippets, 1);
    }

    #[test]
    fn test_blank_flag_follows_leaf_text() {
        let no_snippets = SnippetLimits {
            max_snippets: 0,
            ..limits()
        };
        let located = locate("Acme inside", &Target::new("acme"), &no_snippets, None);
        assert_eq!(located.count, 1);
        assert!(located.snippets.is_empty());
        assert!(!located.blank);

        let located = locate(" ", &Target::new(" "), &limits(), None);
        assert_eq!(located.count, 1);
        assert!(located.blank);
    }
}
