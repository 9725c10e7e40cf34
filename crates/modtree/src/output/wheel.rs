//! Adjacency matrix and the dependency wheel page.

use std::collections::HashMap;

use modtree_graph::Edge;

use super::html::{escape_text, fill_template, script_json};
use crate::error::Result;

const WHEEL_TEMPLATE: &str = include_str!("../../assets/dependency_wheel.html");
const WHEEL_SCRIPT: &str = include_str!("../../assets/dependency_wheel.js");

/// Square 0/1 matrix over an ordered module list.
///
/// Row `i`, column `j` is 1 when `names[i]` depends on `names[j]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacencyMatrix {
    names: Vec<String>,
    rows: Vec<Vec<u8>>,
}

impl AdjacencyMatrix {
    /// Build the matrix for `ordered` modules from `edges`.
    ///
    /// Edges with an endpoint outside `ordered` are ignored.
    #[must_use]
    pub fn new(ordered: &[String], edges: &[Edge]) -> Self {
        let index: HashMap<&str, usize> = ordered
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_str(), i))
            .collect();
        let mut rows = vec![vec![0u8; ordered.len()]; ordered.len()];

        for edge in edges {
            match (
                index.get(edge.module.as_str()),
                index.get(edge.depends_on.as_str()),
            ) {
                (Some(&from), Some(&to)) => rows[from][to] = 1,
                _ => tracing::debug!(
                    module = %edge.module,
                    depends_on = %edge.depends_on,
                    "Edge outside module order, skipped"
                ),
            }
        }

        Self {
            names: ordered.to_vec(),
            rows,
        }
    }

    /// Module names, in matrix order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Matrix rows.
    #[must_use]
    pub fn rows(&self) -> &[Vec<u8>] {
        &self.rows
    }

    /// The names as a JavaScript array literal.
    pub fn names_literal(&self) -> Result<String> {
        Ok(script_json(&serde_json::to_string(&self.names)?))
    }

    /// The matrix as a JavaScript array literal, one row per line.
    #[must_use]
    pub fn matrix_literal(&self) -> String {
        let rows: Vec<String> = self
            .rows
            .iter()
            .map(|row| {
                let cells: Vec<&str> = row
                    .iter()
                    .map(|&v| if v > 0 { "1" } else { "0" })
                    .collect();
                format!("[{}]", cells.join(","))
            })
            .collect();
        format!("[{}]", rows.join(",\n"))
    }
}

/// Render the dependency wheel page for `matrix`, titled after `name`.
pub fn render_wheel_page(name: &str, matrix: &AdjacencyMatrix) -> Result<String> {
    let title = escape_text(name);
    let modules = matrix.names_literal()?;
    let rows = matrix.matrix_literal();
    fill_template(
        WHEEL_TEMPLATE,
        &[
            ("NAME", title.as_str()),
            ("SCRIPT", WHEEL_SCRIPT),
            ("MODULES", modules.as_str()),
            ("MATRIX", rows.as_str()),
        ],
    )
}
