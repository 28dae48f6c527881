//! Recursive record traversal.
//!
//! [`walk`] visits every leaf of a [`Record`], matches it against one
//! [`Target`] and accumulates the result per [`Path`]. Two guards bound
//! the traversal: nodes deeper than `max_depth` are not visited, and an
//! object already on the visited set (keyed by [`NodeId`]) is not entered
//! again. Arrays are not tracked in the visited set; an array that
//! contains itself is stopped by the depth guard instead.

use crate::locate::{locate, locate_scalar, Located, SnippetLimits, Target};
use crate::normalize::normalize;
use std::collections::{HashMap, HashSet};
use serde_json::Number;
use sweeper_core::{Node, NodeId, Record, ScanningConfig};

/// Structural address of a leaf, e.g. `fields.hero.items[2].title`.
pub type Path = String;

/// Path used for a record whose root is itself a scalar.
pub const ROOT_PATH: &str = "root";

/// Offsets already claimed per path, skipped by later walks.
pub type Exclusions = HashMap<Path, HashSet<usize>>;

/// Traversal bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkLimits {
    /// Deepest nesting level visited (root body = 0)
    pub max_depth: usize,
    /// Snippet generation bounds per leaf
    pub snippets: SnippetLimits,
}

impl Default for WalkLimits {
    fn default() -> Self {
        Self {
            max_depth: 10,
            snippets: SnippetLimits::default(),
        }
    }
}

impl From<&ScanningConfig> for WalkLimits {
    fn from(config: &ScanningConfig) -> Self {
        Self {
            max_depth: config.max_depth,
            snippets: SnippetLimits::from(config),
        }
    }
}

/// Matches found at one path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchAccumulator {
    /// Total occurrences at this path
    pub count: usize,
    /// Snippets for the first occurrences
    pub snippets: Vec<String>,
    /// Character offsets of every occurrence in the normalized leaf
    pub positions: Vec<usize>,
    /// Whether the matched leaf has no visible text
    pub blank: bool,
}

impl MatchAccumulator {
    /// Snippet reported to callers.
    #[must_use]
    pub fn first_snippet(&self) -> &str {
        self.snippets.first().map_or("", String::as_str)
    }

    /// Whether the matched leaf carries no visible text.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.blank
    }
}

impl From<Located> for MatchAccumulator {
    fn from(located: Located) -> Self {
        Self {
            count: located.count,
            snippets: located.snippets,
            positions: located.positions,
            blank: located.blank,
        }
    }
}

/// Per-path matches of one walk, in traversal order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkMatches {
    entries: Vec<(Path, MatchAccumulator)>,
    index: HashMap<Path, usize>,
}

impl WalkMatches {
    /// Accumulator for a path, if it matched.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&MatchAccumulator> {
        self.index.get(path).map(|&slot| &self.entries[slot].1)
    }

    /// Iterate `(path, accumulator)` pairs in traversal order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MatchAccumulator)> {
        self.entries.iter().map(|(p, acc)| (p.as_str(), acc))
    }

    /// Number of matching paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no path matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, path: Path, located: Located) {
        if let Some(&slot) = self.index.get(&path) {
            let acc = &mut self.entries[slot].1;
            acc.count += located.count;
            acc.positions.extend(located.positions);
            acc.snippets.extend(located.snippets);
            acc.blank &= located.blank;
        } else {
            self.index.insert(path.clone(), self.entries.len());
            self.entries.push((path, located.into()));
        }
    }
}

impl IntoIterator for WalkMatches {
    type Item = (Path, MatchAccumulator);
    type IntoIter = std::vec::IntoIter<(Path, MatchAccumulator)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Walk `record` and collect every path whose leaf contains `target`.
///
/// Offsets listed in `exclusions` for a path are not counted there.
/// Depth and cycle limits end a branch silently.
#[must_use]
pub fn walk(
    record: &Record,
    target: &Target,
    limits: &WalkLimits,
    exclusions: Option<&Exclusions>,
) -> WalkMatches {
    let mut walker = Walker {
        record,
        target,
        limits,
        exclusions,
        visited: HashSet::new(),
        matches: WalkMatches::default(),
    };
    walker.visit(record.root(), String::new(), 0);
    walker.matches
}

struct Walker<'a> {
    record: &'a Record,
    target: &'a Target,
    limits: &'a WalkLimits,
    exclusions: Option<&'a Exclusions>,
    visited: HashSet<NodeId>,
    matches: WalkMatches,
}

impl Walker<'_> {
    fn visit(&mut self, id: NodeId, path: Path, depth: usize) {
        if depth > self.limits.max_depth {
            return;
        }

        let record = self.record;
        match record.node(id) {
            Node::Null => {}
            Node::String(text) => {
                let path = leaf_path(path);
                let normalized = normalize(text);
                let located = locate(
                    &normalized,
                    self.target,
                    &self.limits.snippets,
                    self.excluded_at(&path),
                );
                self.record_leaf(path, located);
            }
            Node::Number(number) => {
                let path = leaf_path(path);
                let located =
                    locate_scalar(&render_number(number), self.target, self.excluded_at(&path));
                self.record_leaf(path, located);
            }
            Node::Bool(value) => {
                let path = leaf_path(path);
                let located =
                    locate_scalar(&value.to_string(), self.target, self.excluded_at(&path));
                self.record_leaf(path, located);
            }
            Node::Array(items) => {
                for (index, child) in items.iter().enumerate() {
                    self.visit(*child, format!("{path}[{index}]"), depth + 1);
                }
            }
            Node::Object(fields) => {
                if !self.visited.insert(id) {
                    return;
                }
                for (name, child) in fields {
                    self.visit(*child, child_path(&path, name), depth + 1);
                }
            }
        }
    }

    fn excluded_at(&self, path: &str) -> Option<&HashSet<usize>> {
        self.exclusions.and_then(|exclusions| exclusions.get(path))
    }

    fn record_leaf(&mut self, path: Path, located: Located) {
        if !located.is_empty() {
            self.matches.insert(path, located);
        }
    }
}

/// Text form of a numeric leaf. Whole-valued floats drop their fraction,
/// so `10.0` reads as `10`.
fn render_number(number: &Number) -> String {
    match number.as_f64() {
        Some(value) if number.is_f64() && value.is_finite() && value.fract() == 0.0 => {
            if value == 0.0 {
                "0".to_string()
            } else {
                format!("{value:.0}")
            }
        }
        _ => number.to_string(),
    }
}

fn leaf_path(path: Path) -> Path {
    if path.is_empty() {
        ROOT_PATH.to_string()
    } else {
        path
    }
}

fn child_path(parent: &str, name: &str) -> Path {
    if name.is_empty() || name.contains(['.', '[', ']']) {
        format!("{parent}[{name:?}]")
    } else if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}.{name}")
    }
}
