//! Error types for modtree-graph operations.

use std::fmt;
use thiserror::Error;

/// Which side of a dependency edge an identifier appeared on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointRole {
    /// The module that declares the dependency (edge source).
    Module,
    /// The module being depended on (edge target).
    Dependency,
}

impl fmt::Display for EndpointRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Module => write!(f, "module"),
            Self::Dependency => write!(f, "module dependency"),
        }
    }
}

/// The error type for modtree-graph operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// An edge endpoint is not part of the node set the graph was built from.
    #[error("unrecognised {role}: {module}")]
    UnrecognizedModule {
        /// The identifier that could not be found.
        module: String,
        /// Whether it was the source or the target of the edge.
        role: EndpointRole,
    },
}

/// A specialized Result type for modtree-graph operations.
pub type Result<T> = std::result::Result<T, Error>;
