//! Graphviz rendering for `modtree graph dot`.
//!
//! The document highlights the root module and lists every normalized edge
//! once, in first-seen order. [`layout`] pipes a document through an
//! external Graphviz binary (`sfdp -Tsvg file.dot` and the like).

use std::fmt::Write as _;
use std::io::{self, Write};

use modtree_graph::Edge;

use crate::error::{Error, Result};
use crate::source::process::ToolCommand;

/// Fill color of the root node.
pub const ROOT_FILL_COLOR: &str = "#E94762";

/// Quote a node identifier for a dot string literal.
fn quote(id: &str) -> String {
    let mut quoted = String::with_capacity(id.len() + 2);
    quoted.push('"');
    for ch in id.chars() {
        if matches!(ch, '"' | '\\') {
            quoted.push('\\');
        }
        quoted.push(ch);
    }
    quoted.push('"');
    quoted
}

/// Render the dot document for `edges` with `root` highlighted.
#[must_use]
pub fn render_dot(root: &str, edges: &[Edge]) -> String {
    let root = quote(root);
    let mut doc = String::new();
    doc.push_str("digraph {\n");
    doc.push_str("\tgraph [overlap=false, size=14];\n");
    let _ = writeln!(doc, "\troot={root};");
    doc.push_str("\tnode [  shape = plaintext, fontname = \"Helvetica\", fontsize=24];\n");
    let _ = writeln!(doc, "\t{root} [style = filled, fillcolor = \"{ROOT_FILL_COLOR}\"];");
    for edge in edges {
        let _ = writeln!(doc, "{} -> {}", quote(&edge.module), quote(&edge.depends_on));
    }
    doc.push_str("}\n");
    doc
}

/// Write the dot document for `edges` to `w`.
pub fn write_dot<W: Write>(w: &mut W, root: &str, edges: &[Edge]) -> io::Result<()> {
    w.write_all(render_dot(root, edges).as_bytes())
}

/// Lay out `document` with `tool`, producing `format` (`svg`, `png`, ...).
///
/// The document is written to a temporary `dot-*.dot` file that is removed
/// afterwards, and the tool is run as `<tool> -T<format> <file>`. Returns
/// the tool's stdout.
pub async fn layout(tool: ToolCommand, format: &str, document: &str) -> Result<Vec<u8>> {
    let mut file = tempfile::Builder::new()
        .prefix("dot-")
        .suffix(".dot")
        .tempfile()?;
    file.write_all(document.as_bytes())?;
    file.flush()?;

    let path = file.path().to_str().ok_or_else(|| {
        Error::Render(format!(
            "temporary file path is not valid UTF-8: {}",
            file.path().display()
        ))
    })?;

    tracing::debug!(tool = tool.program(), format, file = path, "Running layout");
    tool.arg(format!("-T{format}")).arg(path).run().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::process::Cancellation;
    use std::time::Duration;

    #[test]
    fn test_render_header_and_edges() {
        let edges = vec![Edge::new("m", "a"), Edge::new("a", "b")];

        let doc = render_dot("m", &edges);

        assert_eq!(
            doc,
            "digraph {\n\
             \tgraph [overlap=false, size=14];\n\
             \troot=\"m\";\n\
             \tnode [  shape = plaintext, fontname = \"Helvetica\", fontsize=24];\n\
             \t\"m\" [style = filled, fillcolor = \"#E94762\"];\n\
             \"m\" -> \"a\"\n\
             \"a\" -> \"b\"\n\
             }\n"
        );
    }

    #[test]
    fn test_one_statement_per_edge() {
        let edges = vec![Edge::new("a", "b"), Edge::new("b", "a"), Edge::new("a", "a")];
        let doc = render_dot("a", &edges);
        assert_eq!(doc.matches(" -> ").count(), edges.len());
    }

    #[test]
    fn test_identifiers_are_escaped() {
        let doc = render_dot("we\"ird", &[Edge::new("back\\slash", "we\"ird")]);

        assert!(doc.contains("root=\"we\\\"ird\";"));
        assert!(doc.contains("\"back\\\\slash\" -> \"we\\\"ird\""));
    }

    #[test]
    fn test_write_dot_matches_render() {
        let edges = vec![Edge::new("x", "y")];
        let mut buffer = Vec::new();
        write_dot(&mut buffer, "x", &edges).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), render_dot("x", &edges));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_layout_passes_format_and_file() {
        // `sh -c <script> -Tsvg <file>` binds $0 to -Tsvg and $1 to the file.
        let tool = ToolCommand::new("sh", Duration::from_secs(10), Cancellation::never())
            .args(["-c", "printf '%s ' \"$0\"; cat \"$1\""]);

        let out = layout(tool, "svg", "digraph {}\n").await.unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "-Tsvg digraph {}\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_layout_failure_is_reported() {
        let tool = ToolCommand::new("sh", Duration::from_secs(10), Cancellation::never())
            .args(["-c", "echo 'unknown format' >&2; exit 1"]);

        let err = layout(tool, "bogus", "digraph {}\n").await.unwrap_err();

        assert!(matches!(err, Error::ToolFailed { ref stderr, .. } if stderr == "unknown format"));
    }
}
