//! Argument structs for the `graph` subcommands.

use clap::{ArgAction, Args};
use std::path::PathBuf;

use super::types::{CyclesArg, direction_for};
use super::validators::{validate_command, validate_format, validate_module};
use crate::config::GraphOptions;

/// Where the graph is read from, shared by every `graph` subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Keep module versions (`module@version`) as distinct nodes
    #[arg(long)]
    pub versioned: bool,

    /// Read the `go mod graph` output from a file instead of running go (`-` for stdin)
    #[arg(long, value_name = "PATH")]
    pub graph_file: Option<PathBuf>,
}

impl SourceArgs {
    /// Load options for these arguments; tree shaping is left at defaults.
    #[must_use]
    pub fn to_options(&self) -> GraphOptions {
        GraphOptions {
            keep_versions: self.versioned,
            ..GraphOptions::default()
        }
    }
}

/// Options selecting and shaping a tree.
#[derive(Args, Debug, Clone)]
pub struct TreeArgs {
    /// Module to start from (defaults to the main module)
    #[arg(long, value_name = "MODULE", value_parser = validate_module)]
    pub start: Option<String>,

    /// Follow dependencies (true) or dependents (false)
    #[arg(
        long,
        value_name = "BOOL",
        default_value_t = true,
        action = ArgAction::Set
    )]
    pub dependencies: bool,

    /// Only show paths that lead to this module
    #[arg(long, value_name = "MODULE", value_parser = validate_module)]
    pub contains: Option<String>,

    /// How revisited modules are detected
    #[arg(long, value_enum, default_value_t = CyclesArg::Global)]
    pub cycles: CyclesArg,
}

impl Default for TreeArgs {
    fn default() -> Self {
        Self {
            start: None,
            dependencies: true,
            contains: None,
            cycles: CyclesArg::Global,
        }
    }
}

impl TreeArgs {
    /// Query options for these arguments.
    #[must_use]
    pub fn to_options(&self, keep_versions: bool) -> GraphOptions {
        GraphOptions {
            keep_versions,
            start: self.start.clone(),
            direction: direction_for(self.dependencies),
            contains: self.contains.clone(),
            visit_mode: self.cycles.into(),
        }
    }
}

/// Arguments for the `graph dot` command
#[derive(Args, Debug, Clone, Default)]
pub struct DotArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Run the layout command and emit this format (svg, png, pdf, ...)
    #[arg(long, value_name = "FORMAT", value_parser = validate_format)]
    pub format: Option<String>,

    /// Graphviz layout command used with --format [default: sfdp]
    #[arg(long, value_name = "COMMAND", value_parser = validate_command)]
    pub command: Option<String>,
}

/// Arguments for the `graph query` command
#[derive(Args, Debug, Clone, Default)]
pub struct QueryArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub tree: TreeArgs,
}

/// Arguments for the `graph dependency-wheel` command
#[derive(Args, Debug, Clone, Default)]
pub struct WheelArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

/// Arguments for the `graph itree` command
#[derive(Args, Debug, Clone, Default)]
pub struct ItreeArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub tree: TreeArgs,
}
