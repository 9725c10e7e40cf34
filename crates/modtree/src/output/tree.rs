//! Indented text rendering for `modtree graph query`.
//!
//! ```text
//! example.com/main
//!   golang.org/x/mod
//!     golang.org/x/tools
//!       golang.org/x/mod (cycle -> golang.org/x/mod)
//! ```

use std::io::{self, Write};

use modtree_graph::TreeNode;

use super::{OutputConfig, info, warning};

const INDENT: &str = "  ";

/// Write `tree` depth-first, two spaces per level, children in name order.
///
/// A cycle leaf is followed by `(cycle -> <marker>)`. `None` (a filter
/// that matched nothing) writes nothing.
pub fn write_tree_text<W: Write>(
    w: &mut W,
    tree: Option<&TreeNode>,
    config: OutputConfig,
) -> io::Result<()> {
    let Some(tree) = tree else {
        return Ok(());
    };

    let mut result = Ok(());
    tree.walk(&mut |node, depth| {
        if result.is_ok() {
            result = write_node(w, node, depth, config);
        }
    });
    result
}

fn write_node<W: Write>(
    w: &mut W,
    node: &TreeNode,
    depth: usize,
    config: OutputConfig,
) -> io::Result<()> {
    let indent = INDENT.repeat(depth);
    let name = if depth == 0 {
        info(&node.module, config)
    } else {
        node.module.clone()
    };

    match &node.cycle {
        Some(marker) => {
            let note = format!("(cycle -> {marker})");
            writeln!(w, "{indent}{name} {}", warning(&note, config))
        }
        None => writeln!(w, "{indent}{name}"),
    }
}
