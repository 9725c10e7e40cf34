//! Module dependency graph model for modtree.
//!
//! This library turns a flat, possibly cyclic list of module dependency edges
//! into a bidirectional graph and flattens that graph into rooted trees.
//!
//! # Pipeline
//!
//! ```text
//! edge list ─► parse_edge_list ─► normalize ─► ModuleGraph::build ─► flatten ─► filter
//! ```
//!
//! # Example
//!
//! ```
//! use modtree_graph::{Direction, ModuleGraph, NormalizedGraph, VisitMode, tree};
//!
//! let normalized = NormalizedGraph::from_edge_list("a@v1 b@v1\nb@v1 c@v2\n", false);
//! let graph = ModuleGraph::from_normalized(&normalized)?;
//!
//! let root = tree::flatten(&graph, "a", Direction::Dependencies, VisitMode::Global);
//! assert!(root.find("c").is_some());
//! # Ok::<(), modtree_graph::Error>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod edges;
pub mod error;
pub mod graph;
pub mod tree;
pub mod warning;

pub use edges::{Edge, NormalizedGraph, ParsedEdges, RawEdge, normalize, parse_edge_list};
pub use error::{EndpointRole, Error, Result};
pub use graph::ModuleGraph;
pub use tree::{Direction, TreeNode, VisitMode};
pub use warning::Warning;
