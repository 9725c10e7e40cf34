//! Rooted tree views over a [`ModuleGraph`].
//!
//! [`flatten`] expands the graph depth-first from a root module into a
//! [`TreeNode`] tree, following either dependency or dependent edges.
//! Revisits are never expanded a second time: the revisited child becomes a
//! leaf carrying a cycle marker, so the resulting tree is always finite and
//! never contains back-references.
//!
//! [`filter`] prunes such a tree down to the paths that reach a module of
//! interest.
//!
//! # Visit modes
//!
//! With [`VisitMode::Global`] a single visited-set is shared by every branch
//! of one traversal. A module reachable along two independent paths (a
//! "diamond") is expanded under the first branch explored in sorted order
//! and marked as a cycle everywhere else, exactly like a true cycle.
//!
//! With [`VisitMode::Path`] only the modules on the current root-to-node
//! path count as visited, so only genuine cycles are marked. Shared
//! dependencies are expanded under every parent, which can grow
//! exponentially on dense graphs.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

use crate::graph::ModuleGraph;

/// Which edges a traversal follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Follow depends-on edges.
    #[default]
    Dependencies,
    /// Follow depended-on-by edges.
    Dependents,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dependencies => write!(f, "dependencies"),
            Self::Dependents => write!(f, "dependents"),
        }
    }
}

/// How revisits are detected during a traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisitMode {
    /// One visited-set for the whole traversal; shared dependencies are
    /// reported like cycles.
    #[default]
    Global,
    /// Visited-set limited to the current path; only true cycles are marked.
    Path,
}

impl fmt::Display for VisitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => write!(f, "global"),
            Self::Path => write!(f, "path"),
        }
    }
}

/// One position in a rooted expansion of the module graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    /// Module identifier at this position.
    pub module: String,
    /// Identifier whose revisit stopped expansion here, if any.
    pub cycle: Option<String>,
    /// Children keyed by module identifier, iterated in lexicographic order.
    pub children: BTreeMap<String, TreeNode>,
}

impl TreeNode {
    /// A node with no children and no cycle marker.
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            cycle: None,
            children: BTreeMap::new(),
        }
    }

    /// A leaf terminated by a revisit of `marker`.
    pub fn with_cycle(module: impl Into<String>, marker: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            cycle: Some(marker.into()),
            children: BTreeMap::new(),
        }
    }

    /// Add a child, replacing any existing child with the same module.
    #[must_use]
    pub fn with_child(mut self, child: TreeNode) -> Self {
        self.children.insert(child.module.clone(), child);
        self
    }

    /// Returns `true` if this node carries a cycle marker.
    #[must_use]
    pub fn is_cycle(&self) -> bool {
        self.cycle.is_some()
    }

    /// Returns `true` if this node has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Total number of nodes in this tree, including the root.
    #[must_use]
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.walk(&mut |_, _| count += 1);
        count
    }

    /// First node (pre-order) whose module is `module`.
    #[must_use]
    pub fn find(&self, module: &str) -> Option<&TreeNode> {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.module == module {
                return Some(node);
            }
            stack.extend(node.children.values().rev());
        }
        None
    }

    /// Visit every node in pre-order with its depth (root is 0).
    pub fn walk<F>(&self, visit: &mut F)
    where
        F: FnMut(&TreeNode, usize),
    {
        let mut stack = vec![(self, 0)];
        while let Some((node, depth)) = stack.pop() {
            visit(node, depth);
            stack.extend(node.children.values().rev().map(|child| (child, depth + 1)));
        }
    }
}

// Chains can be as long as the graph has modules; drop them without
// recursing once per level.
impl Drop for TreeNode {
    fn drop(&mut self) {
        let mut pending: Vec<TreeNode> = std::mem::take(&mut self.children).into_values().collect();
        while let Some(mut node) = pending.pop() {
            pending.extend(std::mem::take(&mut node.children).into_values());
        }
    }
}

/// A module whose children are still being expanded.
struct Frame<'g> {
    module: &'g str,
    pending: std::vec::IntoIter<&'g str>,
    children: BTreeMap<String, TreeNode>,
}

impl<'g> Frame<'g> {
    fn new(module: &'g str, neighbors: Vec<&'g str>) -> Self {
        Self {
            module,
            pending: neighbors.into_iter(),
            children: BTreeMap::new(),
        }
    }
}

/// Per-call traversal state.
///
/// The depth-first expansion keeps its path on an explicit stack of
/// [`Frame`]s, so the depth of the tree is bounded by memory rather than by
/// the thread's stack.
struct Traversal<'g> {
    graph: &'g ModuleGraph,
    direction: Direction,
    mode: VisitMode,
    visited: HashSet<&'g str>,
}

impl<'g> Traversal<'g> {
    fn new(graph: &'g ModuleGraph, direction: Direction, mode: VisitMode) -> Self {
        Self {
            graph,
            direction,
            mode,
            visited: HashSet::new(),
        }
    }

    /// Start expanding `module`, or `None` if it is unknown or already visited.
    fn enter(&mut self, module: &'g str) -> Option<Frame<'g>> {
        let graph = self.graph;
        let neighbors = graph.neighbors(module, self.direction)?;
        if !self.visited.insert(module) {
            return None;
        }
        Some(Frame::new(module, neighbors))
    }

    /// Children of `root`, expanded depth-first in identifier order.
    fn expand(&mut self, root: &'g str) -> BTreeMap<String, TreeNode> {
        let Some(frame) = self.enter(root) else {
            return BTreeMap::new();
        };
        let mut stack = vec![frame];

        while let Some(top) = stack.last_mut() {
            if let Some(neighbor) = top.pending.next() {
                match self.enter(neighbor) {
                    Some(frame) => stack.push(frame),
                    None => {
                        top.children
                            .insert(neighbor.to_string(), TreeNode::with_cycle(neighbor, neighbor));
                    }
                }
                continue;
            }

            let Some(done) = stack.pop() else { break };
            if self.mode == VisitMode::Path {
                self.visited.remove(done.module);
            }
            match stack.last_mut() {
                Some(parent) => {
                    parent.children.insert(
                        done.module.to_string(),
                        TreeNode {
                            module: done.module.to_string(),
                            cycle: None,
                            children: done.children,
                        },
                    );
                }
                None => return done.children,
            }
        }
        BTreeMap::new()
    }
}

/// Expand `graph` from `root` into a tree.
///
/// Children are ordered by identifier and expanded depth-first in that
/// order, so the result is fully determined by the graph, the root, the
/// direction and the mode. An unknown `root` yields a childless tree; use
/// [`ModuleGraph::contains`] first if that should be an error.
#[must_use]
pub fn flatten(graph: &ModuleGraph, root: &str, direction: Direction, mode: VisitMode) -> TreeNode {
    let mut traversal = Traversal::new(graph, direction, mode);
    let children = match graph.module(root) {
        Some(root) => traversal.expand(root),
        None => BTreeMap::new(),
    };

    let tree = TreeNode {
        module: root.to_string(),
        cycle: None,
        children,
    };
    tracing::debug!(
        root,
        %direction,
        %mode,
        nodes = tree.node_count(),
        "Flattened module graph"
    );
    tree
}

/// A node of the input tree whose children are still being filtered.
struct FilterFrame {
    module: String,
    cycle: Option<String>,
    pending: std::collections::btree_map::IntoIter<String, TreeNode>,
    kept: BTreeMap<String, TreeNode>,
}

impl FilterFrame {
    fn open(mut node: TreeNode) -> Self {
        Self {
            module: std::mem::take(&mut node.module),
            cycle: node.cycle.take(),
            pending: std::mem::take(&mut node.children).into_iter(),
            kept: BTreeMap::new(),
        }
    }

    fn close(self) -> Option<TreeNode> {
        if self.kept.is_empty() {
            return None;
        }
        Some(TreeNode {
            module: self.module,
            cycle: self.cycle,
            children: self.kept,
        })
    }
}

/// Prune `tree` to the paths that reach a module satisfying `predicate`.
///
/// A matching node is kept together with its entire subtree, unchanged.
/// Above the matches only the nodes on a root-to-match path survive.
/// Returns `None` if nothing in the tree matches.
pub fn filter<P>(tree: TreeNode, predicate: P) -> Option<TreeNode>
where
    P: Fn(&str) -> bool,
{
    if predicate(tree.module.as_str()) {
        return Some(tree);
    }

    let mut stack = vec![FilterFrame::open(tree)];
    while let Some(top) = stack.last_mut() {
        if let Some((key, child)) = top.pending.next() {
            if predicate(key.as_str()) {
                top.kept.insert(key, child);
            } else if !child.is_leaf() {
                stack.push(FilterFrame::open(child));
            }
            continue;
        }

        let done = stack.pop()?.close();
        match (stack.last_mut(), done) {
            (Some(parent), Some(node)) => {
                parent.kept.insert(node.module.clone(), node);
            }
            (Some(_), None) => {}
            (None, done) => return done,
        }
    }
    None
}

/// [`filter`] with an exact module match.
#[must_use]
pub fn filter_contains(tree: TreeNode, module: &str) -> Option<TreeNode> {
    filter(tree, |candidate| candidate == module)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edges::NormalizedGraph;
    use rstest::{fixture, rstest};

    fn graph_of(edges: &str) -> ModuleGraph {
        ModuleGraph::from_normalized(&NormalizedGraph::from_edge_list(edges, true))
            .expect("normalized edges always build")
    }

    #[fixture]
    fn cycle() -> ModuleGraph {
        graph_of("a b\nb c\nc a\n")
    }

    #[fixture]
    fn diamond() -> ModuleGraph {
        graph_of("a b\na c\nb d\nc d\n")
    }

    #[rstest]
    fn test_cycle_is_marked_on_revisited_leaf(cycle: ModuleGraph) {
        let tree = flatten(&cycle, "a", Direction::Dependencies, VisitMode::Global);

        let expected = TreeNode::new("a").with_child(
            TreeNode::new("b")
                .with_child(TreeNode::new("c").with_child(TreeNode::with_cycle("a", "a"))),
        );
        assert_eq!(tree, expected);
    }

    #[rstest]
    fn test_cycle_is_marked_in_path_mode(cycle: ModuleGraph) {
        let global = flatten(&cycle, "a", Direction::Dependencies, VisitMode::Global);
        let path = flatten(&cycle, "a", Direction::Dependencies, VisitMode::Path);
        assert_eq!(global, path);
    }

    #[rstest]
    fn test_diamond_expands_shared_node_once(diamond: ModuleGraph) {
        let tree = flatten(&diamond, "a", Direction::Dependencies, VisitMode::Global);

        let under_b = &tree.children["b"].children["d"];
        let under_c = &tree.children["c"].children["d"];
        assert_eq!(under_b.cycle, None);
        assert_eq!(under_c.cycle.as_deref(), Some("d"));
        assert!(under_c.is_leaf());
    }

    #[rstest]
    fn test_diamond_in_path_mode_has_no_marker(diamond: ModuleGraph) {
        let tree = flatten(&diamond, "a", Direction::Dependencies, VisitMode::Path);

        assert_eq!(tree.children["b"].children["d"], TreeNode::new("d"));
        assert_eq!(tree.children["c"].children["d"], TreeNode::new("d"));
    }

    #[rstest]
    fn test_dependents_direction(diamond: ModuleGraph) {
        let tree = flatten(&diamond, "d", Direction::Dependents, VisitMode::Global);

        let expected = TreeNode::new("d")
            .with_child(TreeNode::new("b").with_child(TreeNode::new("a")))
            .with_child(TreeNode::new("c").with_child(TreeNode::with_cycle("a", "a")));
        assert_eq!(tree, expected);
    }

    #[test]
    fn test_unknown_root_has_no_children() {
        let graph = graph_of("a b\n");
        let tree = flatten(&graph, "nope", Direction::Dependencies, VisitMode::Global);

        assert_eq!(tree, TreeNode::new("nope"));
    }

    #[test]
    fn test_self_edge_marks_cycle() {
        let graph = graph_of("a a\n");
        let tree = flatten(&graph, "a", Direction::Dependencies, VisitMode::Global);

        assert_eq!(tree, TreeNode::new("a").with_child(TreeNode::with_cycle("a", "a")));
    }

    #[test]
    fn test_tree_helpers() {
        let graph = graph_of("a b\nb c\na d\n");
        let tree = flatten(&graph, "a", Direction::Dependencies, VisitMode::Global);

        assert_eq!(tree.node_count(), 4);
        assert!(tree.find("c").is_some());
        assert!(tree.find("zzz").is_none());

        let mut seen = Vec::new();
        tree.walk(&mut |node, depth| seen.push((node.module.clone(), depth)));
        assert_eq!(
            seen,
            vec![
                ("a".to_string(), 0),
                ("b".to_string(), 1),
                ("c".to_string(), 2),
                ("d".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_filter_keeps_paths_to_match() {
        let graph = graph_of("a b\na c\nb d\nc e\n");
        let tree = flatten(&graph, "a", Direction::Dependencies, VisitMode::Global);

        let filtered = filter_contains(tree, "d").expect("d is reachable");

        let expected =
            TreeNode::new("a").with_child(TreeNode::new("b").with_child(TreeNode::new("d")));
        assert_eq!(filtered, expected);
    }

    #[test]
    fn test_filter_keeps_full_subtree_below_match() {
        let graph = graph_of("a b\nb c\nc d\na x\n");
        let tree = flatten(&graph, "a", Direction::Dependencies, VisitMode::Global);

        let filtered = filter_contains(tree.clone(), "b").expect("b is reachable");

        assert_eq!(filtered.children.len(), 1);
        assert_eq!(filtered.children["b"], tree.children["b"]);
    }

    #[test]
    fn test_filter_on_root_returns_whole_tree() {
        let graph = graph_of("a b\nb c\n");
        let tree = flatten(&graph, "a", Direction::Dependencies, VisitMode::Global);

        assert_eq!(filter_contains(tree.clone(), "a"), Some(tree));
    }

    #[test]
    fn test_filter_without_match_is_absent() {
        let graph = graph_of("a b\nb c\n");
        let tree = flatten(&graph, "a", Direction::Dependencies, VisitMode::Global);

        assert_eq!(filter_contains(tree, "zzz"), None);
        assert_eq!(filter_contains(TreeNode::new("solo"), "zzz"), None);
    }

    #[rstest]
    fn test_filter_preserves_cycle_markers_below_match(cycle: ModuleGraph) {
        let tree = flatten(&cycle, "b", Direction::Dependencies, VisitMode::Global);

        let filtered = filter_contains(tree, "a").expect("a is reachable");
        let matched = &filtered.children["c"].children["a"];
        assert_eq!(matched.cycle, None);
        assert_eq!(matched.children["b"].cycle.as_deref(), Some("b"));
    }

    #[test]
    fn test_filter_with_predicate() {
        let graph = graph_of("root golang.org/x/mod\nroot example.com/a\nexample.com/a golang.org/x/net\n");
        let tree = flatten(&graph, "root", Direction::Dependencies, VisitMode::Global);

        let filtered = filter(tree, |m| m.starts_with("golang.org/")).expect("matches exist");

        assert_eq!(filtered.node_count(), 4);
        assert!(filtered.find("golang.org/x/net").is_some());
    }

    #[test]
    fn test_json_shape_has_no_back_references() {
        let graph = graph_of("a b\nb a\n");
        let tree = flatten(&graph, "a", Direction::Dependencies, VisitMode::Global);

        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(json["children"]["b"]["children"]["a"]["cycle"], "a");
    }

    fn chain(len: usize) -> ModuleGraph {
        let edges: String = (1..len).map(|i| format!("m{} m{i}\n", i - 1)).collect();
        graph_of(&edges)
    }

    #[rstest]
    #[case(VisitMode::Global)]
    #[case(VisitMode::Path)]
    fn test_long_chain_flattens(#[case] mode: VisitMode) {
        const LEN: usize = 50_000;
        let graph = chain(LEN);
        let tree = flatten(&graph, "m0", Direction::Dependencies, mode);

        assert_eq!(tree.node_count(), LEN);
        let mut deepest = 0;
        tree.walk(&mut |_, depth| deepest = deepest.max(depth));
        assert_eq!(deepest, LEN - 1);

        let last = format!("m{}", LEN - 1);
        assert!(tree.find(&last).is_some_and(TreeNode::is_leaf));
        let filtered = filter_contains(tree, &last).expect("last module is reachable");
        assert_eq!(filtered.node_count(), LEN);
    }

    #[test]
    fn test_long_chain_dependents_without_match() {
        let graph = chain(50_000);
        let tree = flatten(&graph, "m49999", Direction::Dependents, VisitMode::Global);

        assert_eq!(filter_contains(tree, "zzz"), None);
    }
}
