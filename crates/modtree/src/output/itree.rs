//! The interactive (collapsible, pan/zoom) tree page.

use super::html::{escape_text, fill_template, script_json};
use super::json::TreeJson;
use crate::error::Result;

const TREE_TEMPLATE: &str = include_str!("../../assets/dependency_tree.html");
const TREE_SCRIPT: &str = include_str!("../../assets/dependency_tree.js");

/// Render the interactive tree page for `tree`, titled after `name`.
pub fn render_itree_page(name: &str, tree: &TreeJson) -> Result<String> {
    let title = escape_text(name);
    let data = script_json(&serde_json::to_string_pretty(tree)?);
    fill_template(
        TREE_TEMPLATE,
        &[
            ("NAME", title.as_str()),
            ("SCRIPT", TREE_SCRIPT),
            ("TREE_DATA", data.as_str()),
        ],
    )
}
