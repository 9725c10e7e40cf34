//! CLI argument parsing and command dispatch.
//!
//! This module provides the command-line interface for modtree using clap's derive API.
//!
//! # Commands
//!
//! - `graph dot`: Graphviz document for the whole graph, optionally laid out
//! - `graph query`: Flattened dependency (or dependent) tree as text or JSON
//! - `graph dependency-wheel`: Chord diagram page of the adjacency matrix
//! - `graph itree`: Interactive collapsible tree page
//!
//! # Global Flags
//!
//! - `--json`: Output in JSON format (`graph query`)
//! - `--config FILE`: Settings file (default: `modtree.yaml` if present)
//! - `-v`: Increase log verbosity (repeatable)
//!
//! # Example
//!
//! ```bash
//! modtree graph query --contains golang.org/x/tools
//! modtree graph query --start golang.org/x/mod --dependencies false
//! modtree graph dot --format svg > deps.svg
//! go mod graph | modtree graph itree --graph-file - > tree.html
//! ```

mod args;
mod execute;
mod types;
mod validators;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

// Re-export argument structs
pub use args::{DotArgs, ItreeArgs, QueryArgs, SourceArgs, TreeArgs, WheelArgs};

// Re-export types
pub use types::{CyclesArg, direction_for};

// Re-export validators for external use
pub use validators::{validate_command, validate_format, validate_module};

use crate::app::App;
use crate::config::Settings;
use crate::output::OutputMode;
use crate::source::process::Cancellation;

/// Modtree - query and visualize Go module dependency graphs
///
/// Reads `go mod graph` (or a saved copy of its output) and renders it as an
/// indented tree, JSON, Graphviz or interactive HTML.
#[derive(Parser, Debug)]
#[command(name = "modtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output in JSON format for programmatic use
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Settings file (defaults to ./modtree.yaml when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Module dependency graph commands
    #[command(subcommand)]
    Graph(GraphCommand),
}

/// Subcommands of `graph`
#[derive(Subcommand, Debug, Clone)]
pub enum GraphCommand {
    /// Print the module graph in Graphviz dot format
    ///
    /// With --format, the document is laid out by the layout command
    /// (sfdp by default) and its output is printed instead.
    Dot(DotArgs),

    /// Print the module graph as a tree
    ///
    /// The tree starts at the main module unless --start is given. Modules
    /// already expanded elsewhere are shown as `(cycle -> module)` leaves.
    Query(QueryArgs),

    /// Write a dependency wheel (chord diagram) HTML page to stdout
    #[command(name = "dependency-wheel")]
    DependencyWheel(WheelArgs),

    /// Write an interactive tree HTML page to stdout
    Itree(ItreeArgs),
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse CLI arguments from an iterator (for testing)
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// The output mode selected by the global flags.
    #[must_use]
    pub fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else {
            OutputMode::Text
        }
    }

    /// Default log filter for the `-v` count.
    #[must_use]
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "modtree=warn,modtree_graph=warn",
            1 => "modtree=info,modtree_graph=info",
            2 => "modtree=debug,modtree_graph=debug",
            _ => "trace",
        }
    }

    /// Execute the CLI command
    pub async fn execute(&self, cancel: Cancellation) -> Result<()> {
        let working_dir = std::env::current_dir()?;
        let settings = Settings::discover(self.config.as_deref(), &working_dir).await?;
        tracing::debug!(?settings, "Resolved settings");

        let Commands::Graph(command) = &self.command;
        let source = command.source();
        let app = App::new(settings, source.graph_file.clone(), &working_dir, cancel);

        match command {
            GraphCommand::Dot(args) => execute::execute_dot(&app, args).await,
            GraphCommand::Query(args) => {
                execute::execute_query(&app, args, self.output_mode()).await
            }
            GraphCommand::DependencyWheel(args) => execute::execute_wheel(&app, args).await,
            GraphCommand::Itree(args) => execute::execute_itree(&app, args).await,
        }
    }
}

impl GraphCommand {
    /// The graph source arguments shared by every subcommand.
    #[must_use]
    pub fn source(&self) -> &SourceArgs {
        match self {
            Self::Dot(args) => &args.source,
            Self::Query(args) => &args.source,
            Self::DependencyWheel(args) => &args.source,
            Self::Itree(args) => &args.source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modtree_graph::{Direction, VisitMode};
    use rstest::rstest;

    // ========== CLI Parsing Tests ==========

    #[test]
    fn test_parse_query_defaults() {
        let cli = Cli::try_parse_from(["modtree", "graph", "query"]).unwrap();

        let Commands::Graph(GraphCommand::Query(args)) = cli.command else {
            panic!("expected graph query");
        };
        assert!(!args.source.versioned);
        assert_eq!(args.source.graph_file, None);

        let options = args.tree.to_options(false);
        assert_eq!(options.direction, Direction::Dependencies);
        assert_eq!(options.visit_mode, VisitMode::Global);
        assert_eq!(options.start, None);
        assert_eq!(options.contains, None);
    }

    #[test]
    fn test_parse_query_all_flags() {
        let cli = Cli::try_parse_from([
            "modtree",
            "--json",
            "graph",
            "query",
            "--versioned",
            "--start",
            "example.com/a",
            "--dependencies",
            "false",
            "--contains",
            "example.com/b",
            "--cycles",
            "path",
            "--graph-file",
            "-",
        ])
        .unwrap();

        assert_eq!(cli.output_mode(), OutputMode::Json);
        let Commands::Graph(GraphCommand::Query(args)) = cli.command else {
            panic!("expected graph query");
        };
        let options = args.tree.to_options(args.source.versioned);
        assert!(options.keep_versions);
        assert_eq!(options.start.as_deref(), Some("example.com/a"));
        assert_eq!(options.direction, Direction::Dependents);
        assert_eq!(options.contains.as_deref(), Some("example.com/b"));
        assert_eq!(options.visit_mode, VisitMode::Path);
        assert_eq!(args.source.graph_file, Some(PathBuf::from("-")));
    }

    #[test]
    fn test_parse_dot_format_and_command() {
        let cli = Cli::try_parse_from([
            "modtree", "graph", "dot", "--format", "svg", "--command", "neato",
        ])
        .unwrap();

        let Commands::Graph(GraphCommand::Dot(args)) = cli.command else {
            panic!("expected graph dot");
        };
        assert_eq!(args.format.as_deref(), Some("svg"));
        assert_eq!(args.command.as_deref(), Some("neato"));
    }

    #[test]
    fn test_parse_dependency_wheel() {
        let cli =
            Cli::try_parse_from(["modtree", "graph", "dependency-wheel", "--versioned"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Graph(GraphCommand::DependencyWheel(WheelArgs {
                source: SourceArgs {
                    versioned: true,
                    ..
                }
            }))
        ));
    }

    #[rstest]
    #[case(&["modtree", "graph", "dot", "--versioned", "--graph-file", "g.txt"])]
    #[case(&["modtree", "graph", "query", "--versioned", "--graph-file", "g.txt"])]
    #[case(&["modtree", "graph", "dependency-wheel", "--versioned", "--graph-file", "g.txt"])]
    #[case(&["modtree", "graph", "itree", "--versioned", "--graph-file", "g.txt"])]
    fn test_every_command_exposes_its_source(#[case] argv: &[&str]) {
        let cli = Cli::try_parse_from(argv).unwrap();
        let Commands::Graph(command) = &cli.command;

        let source = command.source();
        assert_eq!(source.graph_file, Some(PathBuf::from("g.txt")));
        assert!(source.to_options().keep_versions);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "modtree", "graph", "itree", "-vv", "--config", "alt.yaml",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("alt.yaml")));
        assert_eq!(cli.log_filter(), "modtree=debug,modtree_graph=debug");
    }

    #[rstest]
    #[case(&["modtree", "graph", "query", "--dependencies", "maybe"])]
    #[case(&["modtree", "graph", "query", "--cycles", "sometimes"])]
    #[case(&["modtree", "graph", "query", "--start", ""])]
    #[case(&["modtree", "graph", "dot", "--format", "-o/tmp/x"])]
    #[case(&["modtree", "graph", "dot", "--start", "x"])]
    #[case(&["modtree", "graph"])]
    #[case(&["modtree"])]
    fn test_parse_rejects(#[case] argv: &[&str]) {
        assert!(Cli::try_parse_from(argv).is_err());
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
