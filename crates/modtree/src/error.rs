//! Error types for modtree operations.

use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// The error type for modtree operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The module graph could not be built.
    #[error(transparent)]
    Graph(#[from] modtree_graph::Error),

    /// An external tool ran but exited unsuccessfully.
    #[error("{tool} exited with {status}: {stderr}")]
    ToolFailed {
        /// Program name as invoked.
        tool: String,
        /// Exit status description.
        status: String,
        /// Captured standard error, trimmed.
        stderr: String,
    },

    /// An external tool could not be started.
    #[error("failed to run {tool}")]
    Spawn {
        /// Program name as invoked.
        tool: String,
        /// Underlying spawn error.
        #[source]
        source: io::Error,
    },

    /// The operation was cancelled before the tool finished.
    #[error("{tool} was cancelled")]
    Cancelled {
        /// Program name as invoked, or the input being read.
        tool: String,
    },

    /// The tool did not finish within the configured timeout.
    #[error("{tool} timed out after {}s", timeout.as_secs())]
    TimedOut {
        /// Program name as invoked.
        tool: String,
        /// The timeout that elapsed.
        timeout: Duration,
    },

    /// Output could not be rendered.
    #[error("Render error: {0}")]
    Render(String),

    /// The graph source produced no edges.
    #[error("no module dependencies found in {0}")]
    EmptyGraph(String),

    /// A graph file could not be read.
    #[error("failed to read graph file {}", path.display())]
    GraphFile {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Render(err.to_string())
    }
}

/// A specialized Result type for modtree operations.
pub type Result<T> = std::result::Result<T, Error>;
