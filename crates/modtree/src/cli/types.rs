//! CLI value enums and domain type conversions.

use clap::ValueEnum;

use modtree_graph::{Direction, VisitMode};

/// Revisit detection for CLI arguments
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CyclesArg {
    /// A module is expanded once per tree; later visits are marked
    #[default]
    Global,
    /// Only modules already on the current path are marked
    Path,
}

impl std::fmt::Display for CyclesArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Global => write!(f, "global"),
            Self::Path => write!(f, "path"),
        }
    }
}

impl From<CyclesArg> for VisitMode {
    fn from(arg: CyclesArg) -> Self {
        match arg {
            CyclesArg::Global => VisitMode::Global,
            CyclesArg::Path => VisitMode::Path,
        }
    }
}

/// Map the `--dependencies` flag to a traversal direction.
#[must_use]
pub fn direction_for(dependencies: bool) -> Direction {
    if dependencies {
        Direction::Dependencies
    } else {
        Direction::Dependents
    }
}
