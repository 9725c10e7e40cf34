//! Bidirectional module dependency graph backed by petgraph.
//!
//! Edge direction follows the dependency: an edge points from the module
//! that declares a dependency to the module it depends on. Forward
//! neighbors (dependencies) are therefore the outgoing edges of a node and
//! reverse neighbors (dependents) the incoming ones.
//!
//! The graph is built once from a normalized edge set and is read-only
//! afterwards.

use petgraph::Direction as EdgeDirection;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::{HashMap, HashSet};

use crate::edges::{Edge, NormalizedGraph};
use crate::error::{EndpointRole, Error, Result};
use crate::tree::Direction;

/// The module dependency graph.
#[derive(Debug, Clone, Default)]
pub struct ModuleGraph {
    graph: DiGraph<String, ()>,
    node_map: HashMap<String, NodeIndex>,
}

impl ModuleGraph {
    /// Build a graph from an edge set and the set of known identifiers.
    ///
    /// One node is created per identifier in `nodes`. Every edge endpoint
    /// must be one of them.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnrecognizedModule`] naming the first endpoint that
    /// is not in `nodes`, and which side of the edge it was on.
    pub fn build(edges: &[Edge], nodes: &HashSet<String>) -> Result<Self> {
        let mut sorted: Vec<&String> = nodes.iter().collect();
        sorted.sort_unstable();

        let mut graph = DiGraph::with_capacity(sorted.len(), edges.len());
        let mut node_map = HashMap::with_capacity(sorted.len());
        for module in sorted {
            let index = graph.add_node(module.clone());
            node_map.insert(module.clone(), index);
        }

        for edge in edges {
            let from = *node_map
                .get(&edge.module)
                .ok_or_else(|| Error::UnrecognizedModule {
                    module: edge.module.clone(),
                    role: EndpointRole::Module,
                })?;
            let to = *node_map
                .get(&edge.depends_on)
                .ok_or_else(|| Error::UnrecognizedModule {
                    module: edge.depends_on.clone(),
                    role: EndpointRole::Dependency,
                })?;
            graph.add_edge(from, to, ());
        }

        tracing::debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Built module graph"
        );
        Ok(Self { graph, node_map })
    }

    /// Build a graph from the output of [`crate::normalize`].
    ///
    /// # Errors
    ///
    /// See [`ModuleGraph::build`]. A normalized graph always satisfies the
    /// endpoint invariant, so this only fails if it was assembled by hand.
    pub fn from_normalized(normalized: &NormalizedGraph) -> Result<Self> {
        Self::build(&normalized.edges, &normalized.nodes)
    }

    /// Returns `true` if `module` is a node of this graph.
    #[must_use]
    pub fn contains(&self, module: &str) -> bool {
        self.node_map.contains_key(module)
    }

    /// Number of modules.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of dependency edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// The graph's own copy of `module`, if it is a node.
    #[must_use]
    pub fn module(&self, module: &str) -> Option<&str> {
        let index = *self.node_map.get(module)?;
        Some(self.graph[index].as_str())
    }

    /// Neighbors of `module` in the given direction, sorted by identifier.
    ///
    /// Returns `None` if `module` is not in the graph.
    #[must_use]
    pub fn neighbors(&self, module: &str, direction: Direction) -> Option<Vec<&str>> {
        let index = *self.node_map.get(module)?;
        let edge_direction = match direction {
            Direction::Dependencies => EdgeDirection::Outgoing,
            Direction::Dependents => EdgeDirection::Incoming,
        };

        let mut neighbors: Vec<&str> = self
            .graph
            .neighbors_directed(index, edge_direction)
            .map(|n| self.graph[n].as_str())
            .collect();
        neighbors.sort_unstable();
        Some(neighbors)
    }

    /// Modules that `module` depends on.
    #[must_use]
    pub fn dependencies(&self, module: &str) -> Option<Vec<&str>> {
        self.neighbors(module, Direction::Dependencies)
    }

    /// Modules that depend on `module`.
    #[must_use]
    pub fn dependents(&self, module: &str) -> Option<Vec<&str>> {
        self.neighbors(module, Direction::Dependents)
    }

    /// All edges of the graph, in insertion order.
    #[must_use]
    pub fn edges(&self) -> Vec<Edge> {
        self.graph
            .edge_references()
            .map(|e| Edge::new(&self.graph[e.source()], &self.graph[e.target()]))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn node_set(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|s| (*s).to_string()).collect()
    }

    fn edge_list(pairs: &[(&str, &str)]) -> Vec<Edge> {
        pairs.iter().map(|(a, b)| Edge::new(*a, *b)).collect()
    }

    #[test]
    fn test_build_registers_every_node() {
        let nodes = node_set(&["a", "b", "c", "isolated"]);
        let graph = ModuleGraph::build(&edge_list(&[("a", "b"), ("b", "c")]), &nodes).unwrap();

        for id in &nodes {
            assert!(graph.contains(id), "{id} should be present");
        }
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.dependencies("isolated"), Some(vec![]));
    }

    #[rstest]
    #[case(("ghost", "a"), "ghost", EndpointRole::Module)]
    #[case(("a", "ghost"), "ghost", EndpointRole::Dependency)]
    fn test_build_rejects_unknown_endpoint(
        #[case] edge: (&str, &str),
        #[case] missing: &str,
        #[case] role: EndpointRole,
    ) {
        let result = ModuleGraph::build(&edge_list(&[edge]), &node_set(&["a"]));

        assert_eq!(
            result.unwrap_err(),
            Error::UnrecognizedModule {
                module: missing.to_string(),
                role,
            }
        );
    }

    #[test]
    fn test_forward_and_reverse_neighbors() {
        let edges = edge_list(&[("a", "c"), ("a", "b"), ("d", "b")]);
        let graph = ModuleGraph::build(&edges, &node_set(&["a", "b", "c", "d"])).unwrap();

        assert_eq!(graph.dependencies("a"), Some(vec!["b", "c"]));
        assert_eq!(graph.dependents("b"), Some(vec!["a", "d"]));
        assert_eq!(graph.dependents("a"), Some(vec![]));
        assert_eq!(graph.dependencies("missing"), None);
    }

    #[test]
    fn test_self_edge_appears_in_both_directions() {
        let graph = ModuleGraph::build(&edge_list(&[("a", "a")]), &node_set(&["a"])).unwrap();

        assert_eq!(graph.dependencies("a"), Some(vec!["a"]));
        assert_eq!(graph.dependents("a"), Some(vec!["a"]));
    }

    #[test]
    fn test_edges_round_trip_in_insertion_order() {
        let edges = edge_list(&[("b", "c"), ("a", "b")]);
        let graph = ModuleGraph::build(&edges, &node_set(&["a", "b", "c"])).unwrap();

        assert_eq!(graph.edges(), edges);
        assert_eq!(graph.module("b"), Some("b"));
        assert_eq!(graph.module("missing"), None);
    }

    #[test]
    fn test_from_normalized() {
        let normalized = NormalizedGraph::from_edge_list("x@v1 y@v1\ny@v1 z@v2\n", false);
        let graph = ModuleGraph::from_normalized(&normalized).unwrap();

        assert_eq!(graph.dependencies("x"), Some(vec!["y"]));
        assert_eq!(graph.dependents("z"), Some(vec!["y"]));
    }

    #[test]
    fn test_empty_graph() {
        let graph = ModuleGraph::build(&[], &HashSet::new()).unwrap();
        assert_eq!(graph.node_count(), 0);
        assert!(graph.edges().is_empty());
    }
}
