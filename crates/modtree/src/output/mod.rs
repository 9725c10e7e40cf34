//! Output formatting for graph commands.
//!
//! Every renderer writes to a `W: Write` so it can be exercised against an
//! in-memory buffer; the `print_*` helpers bind them to stdout.
//!
//! Submodules:
//! - [`tree`]: indented text rendering of a flattened tree
//! - [`json`]: the JSON tree shape shared by `query --json` and `itree`
//! - [`dot`]: Graphviz documents and the external layout step
//! - [`wheel`]: adjacency matrix and the dependency wheel page
//! - [`itree`]: the interactive tree page

pub mod dot;
mod html;
pub mod itree;
pub mod json;
pub mod tree;
pub mod wheel;

use colored::Colorize;
use std::env;
use std::io::{self, Write};

pub use dot::{render_dot, write_dot};
pub use itree::render_itree_page;
pub use json::{TreeJson, write_tree_json};
pub use tree::write_tree_text;
pub use wheel::{AdjacencyMatrix, render_wheel_page};

/// Environment variable that disables colors when set to `0` or `false`.
pub const ENV_COLOR: &str = "MODTREE_COLOR";

/// Configuration for output formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    /// Whether to use colors in output.
    pub use_colors: bool,
}

impl OutputConfig {
    /// Create an `OutputConfig` with explicit values.
    #[must_use]
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Plain output, for tests and piped rendering.
    #[must_use]
    pub fn plain() -> Self {
        Self::new(false)
    }

    /// Create an `OutputConfig` by reading from environment variables.
    ///
    /// Reads:
    /// - `NO_COLOR`: Standard env var to disable colors (any value disables colors)
    /// - `MODTREE_COLOR`: Set to "0" or "false" to disable colors (default: true)
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        // https://no-color.org/
        let use_colors = lookup("NO_COLOR").is_none()
            && lookup(ENV_COLOR).is_none_or(|v| v != "0" && !v.eq_ignore_ascii_case("false"));
        Self { use_colors }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { use_colors: true }
    }
}

/// Output format mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for programmatic use
    Json,
}

// ============================================================================
// Styling helpers
// ============================================================================

/// Apply semantic "warning" color (yellow) to text.
pub fn warning(text: &str, config: OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.yellow().to_string()
}

/// Apply semantic "info" color (cyan) to text.
pub fn info(text: &str, config: OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.cyan().to_string()
}

// ============================================================================
// Stdout helpers
// ============================================================================

/// Write raw bytes to stdout.
pub fn print_bytes(bytes: &[u8]) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle.write_all(bytes)?;
    handle.flush()
}

/// Write a string to stdout as-is.
pub fn print_str(text: &str) -> io::Result<()> {
    print_bytes(text.as_bytes())
}
