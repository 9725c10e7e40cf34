//! Edge list parsing and normalization.
//!
//! The input is the text emitted by a module graph dump (`go mod graph`):
//! one dependency per line, `<module>[@version] <dependency>[@version]`.
//!
//! Normalization optionally strips version suffixes, collapses duplicate
//! edges and records the order in which identifiers were first seen. That
//! order is what the adjacency-matrix renderer indexes by.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::warning::Warning;

/// Character that separates a module path from its version.
pub const VERSION_SEPARATOR: char = '@';

/// An edge exactly as read from the input, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEdge {
    /// The module declaring the dependency.
    pub module: String,
    /// The module being depended on.
    pub depends_on: String,
}

impl RawEdge {
    /// Create a raw edge.
    pub fn new(module: impl Into<String>, depends_on: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            depends_on: depends_on.into(),
        }
    }
}

/// A normalized dependency edge: `module` depends on `depends_on`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Edge {
    /// The module declaring the dependency.
    pub module: String,
    /// The module being depended on.
    pub depends_on: String,
}

impl Edge {
    /// Create an edge.
    pub fn new(module: impl Into<String>, depends_on: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            depends_on: depends_on.into(),
        }
    }
}

/// Result of splitting an edge list into raw edges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedEdges {
    /// Well-formed edges in input order.
    pub edges: Vec<RawEdge>,
    /// Lines that were skipped.
    pub warnings: Vec<Warning>,
}

/// Split an edge list into raw edges.
///
/// Every non-blank line must hold exactly two whitespace-separated tokens.
/// Other lines are skipped and reported as [`Warning::MalformedLine`];
/// printing them is left to the caller.
pub fn parse_edge_list(text: &str) -> ParsedEdges {
    let mut parsed = ParsedEdges::default();

    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let mut tokens = line.split_whitespace();
        match (tokens.next(), tokens.next(), tokens.next()) {
            (Some(module), Some(depends_on), None) => {
                parsed.edges.push(RawEdge::new(module, depends_on));
            }
            _ => {
                let warning = Warning::MalformedLine {
                    line_number: index + 1,
                    line: line.to_string(),
                };
                tracing::debug!(
                    line_number = warning.line_number(),
                    kind = warning.kind(),
                    line = %line,
                    "Skipping invalid input line"
                );
                parsed.warnings.push(warning);
            }
        }
    }

    tracing::debug!(
        edges = parsed.edges.len(),
        skipped = parsed.warnings.len(),
        "Parsed edge list"
    );
    parsed
}

/// Remove the version suffix from a module identifier.
///
/// Everything from the first [`VERSION_SEPARATOR`] onwards is dropped,
/// unless the separator is the first character.
///
/// ```
/// use modtree_graph::edges::strip_version;
///
/// assert_eq!(strip_version("golang.org/x/mod@v0.4.2"), "golang.org/x/mod");
/// assert_eq!(strip_version("example.com/main"), "example.com/main");
/// ```
#[must_use]
pub fn strip_version(module: &str) -> &str {
    match module.find(VERSION_SEPARATOR) {
        Some(idx) if idx > 0 => &module[..idx],
        _ => module,
    }
}

/// A deduplicated edge set together with its node set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedGraph {
    /// Unique edges, in the order they were first seen.
    pub edges: Vec<Edge>,
    /// Every identifier that appears as an edge endpoint.
    pub nodes: HashSet<String>,
    /// Identifiers in first-seen order.
    pub ordered: Vec<String>,
    /// Anomalies reported while parsing the input, if it was parsed here.
    pub warnings: Vec<Warning>,
}

impl NormalizedGraph {
    /// Parse and normalize an edge list in one step.
    ///
    /// Parser warnings are carried on the result.
    pub fn from_edge_list(text: &str, keep_versions: bool) -> Self {
        let parsed = parse_edge_list(text);
        let mut normalized = normalize(&parsed.edges, keep_versions);
        normalized.warnings = parsed.warnings;
        normalized
    }

    /// Returns `true` if there are no edges.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Normalize raw edges into a deduplicated edge set.
///
/// When `keep_versions` is false every identifier is passed through
/// [`strip_version`] before anything else happens, so stripped and
/// unstripped identifiers never mix. Node order is the first-seen order of
/// the identifiers that end up stored, taking the source before the target
/// within each edge.
pub fn normalize(raw_edges: &[RawEdge], keep_versions: bool) -> NormalizedGraph {
    let mut seen = HashSet::new();
    let mut normalized = NormalizedGraph::default();

    for raw in raw_edges {
        let (module, depends_on) = if keep_versions {
            (raw.module.as_str(), raw.depends_on.as_str())
        } else {
            (strip_version(&raw.module), strip_version(&raw.depends_on))
        };

        for id in [module, depends_on] {
            if normalized.nodes.insert(id.to_string()) {
                normalized.ordered.push(id.to_string());
            }
        }

        let edge = Edge::new(module, depends_on);
        if seen.insert(edge.clone()) {
            normalized.edges.push(edge);
        }
    }

    tracing::debug!(
        raw = raw_edges.len(),
        edges = normalized.edges.len(),
        nodes = normalized.nodes.len(),
        keep_versions,
        "Normalized edges"
    );
    normalized
}
