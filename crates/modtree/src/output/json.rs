//! JSON tree shape for `query --json` and the interactive tree page.

use serde::{Deserialize, Serialize};
use std::io::{self, Write};

use modtree_graph::TreeNode;

/// One node of the JSON tree.
///
/// `cycle` is always present (empty when the node is not a cycle leaf);
/// `children` is sorted by name and omitted for leaves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeJson {
    /// Module identifier.
    pub name: String,
    /// Cycle marker, or empty.
    #[serde(default)]
    pub cycle: String,
    /// Children ordered by name.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeJson>,
}

impl TreeJson {
    /// A lone node, used when a filter leaves nothing under the root.
    pub fn childless(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cycle: String::new(),
            children: Vec::new(),
        }
    }
}

impl From<&TreeNode> for TreeJson {
    fn from(node: &TreeNode) -> Self {
        Self {
            name: node.module.clone(),
            cycle: node.cycle.clone().unwrap_or_default(),
            // BTreeMap iteration is already name order.
            children: node.children.values().map(TreeJson::from).collect(),
        }
    }
}

/// Pretty-print `tree` as JSON followed by a newline.
pub fn write_tree_json<W: Write>(w: &mut W, tree: &TreeJson) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *w, tree).map_err(io::Error::other)?;
    writeln!(w)
}
