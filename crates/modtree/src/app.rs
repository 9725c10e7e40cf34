//! Application context for graph commands.
//!
//! [`App`] owns the resolved [`Settings`], the [`GraphSource`] for this
//! invocation and the cancellation signal. [`App::load`] fetches and
//! normalizes the edge list into a [`LoadedGraph`], which answers tree
//! queries for the renderers.
//!
//! # Example
//!
//! ```no_run
//! use modtree::app::App;
//! use modtree::config::{GraphOptions, Settings};
//! use modtree::source::process::Cancellation;
//! use std::path::Path;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let app = App::new(Settings::default(), None, Path::new("."), Cancellation::never());
//!     let options = GraphOptions::default();
//!     let loaded = app.load(&options).await?;
//!     let tree = loaded.query_tree(&options)?;
//!     println!("{tree:?}");
//!     Ok(())
//! }
//! ```

use modtree_graph::tree::{filter_contains, flatten};
use modtree_graph::{ModuleGraph, NormalizedGraph, TreeNode, Warning};
use std::path::{Path, PathBuf};

use crate::config::{GraphOptions, Settings};
use crate::error::{Error, Result};
use crate::source::process::{Cancellation, ToolCommand};
use crate::source::{FileSource, GoModSource, GraphSource};

/// Application context for one CLI invocation.
pub struct App {
    settings: Settings,
    source: Box<dyn GraphSource>,
    cancel: Cancellation,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("settings", &self.settings)
            .field("source", &self.source.describe())
            .finish_non_exhaustive()
    }
}

impl App {
    /// Create an app reading from `graph_file` if given, else from the Go
    /// toolchain run in `working_dir`.
    #[must_use]
    pub fn new(
        settings: Settings,
        graph_file: Option<PathBuf>,
        working_dir: &Path,
        cancel: Cancellation,
    ) -> Self {
        let source: Box<dyn GraphSource> = match graph_file {
            Some(path) => Box::new(FileSource::new(path, cancel.clone())),
            None => Box::new(
                GoModSource::new(settings.go_command.clone(), settings.timeout(), cancel.clone())
                    .with_working_dir(working_dir),
            ),
        };
        Self::with_source(settings, source, cancel)
    }

    /// Create an app over an arbitrary source.
    #[must_use]
    pub fn with_source(
        settings: Settings,
        source: Box<dyn GraphSource>,
        cancel: Cancellation,
    ) -> Self {
        Self {
            settings,
            source,
            cancel,
        }
    }

    /// The effective settings.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// A tool invocation bound to this app's timeout and cancellation.
    pub fn tool(&self, program: impl Into<String>) -> ToolCommand {
        ToolCommand::new(program, self.settings.timeout(), self.cancel.clone())
    }

    /// Fetch the edge list and main module, then normalize and build the graph.
    ///
    /// Malformed input lines do not fail the load; they are returned on
    /// [`LoadedGraph::warnings`]. Versions are kept as distinct modules when
    /// `options.keep_versions` is set.
    pub async fn load(&self, options: &GraphOptions) -> Result<LoadedGraph> {
        let text = self.source.edge_list().await?;
        let main_module = self.source.main_module().await?;
        let normalized = NormalizedGraph::from_edge_list(&text, options.keep_versions);
        let graph = ModuleGraph::from_normalized(&normalized)?;

        tracing::info!(
            source = %self.source.describe(),
            modules = graph.node_count(),
            edges = graph.edge_count(),
            "Loaded module graph"
        );

        Ok(LoadedGraph {
            normalized,
            graph,
            main_module,
            source: self.source.describe(),
        })
    }
}

/// A normalized edge set with its graph, ready for queries.
#[derive(Debug, Clone)]
pub struct LoadedGraph {
    /// Deduplicated edges and first-seen node order.
    pub normalized: NormalizedGraph,
    /// The adjacency structure built from `normalized`.
    pub graph: ModuleGraph,
    /// Main module reported by the source, if any.
    pub main_module: Option<String>,
    source: String,
}

impl LoadedGraph {
    /// Assemble from parts; `source` is used in error messages.
    ///
    /// # Errors
    ///
    /// Fails if an edge endpoint is missing from the node set.
    pub fn new(
        normalized: NormalizedGraph,
        main_module: Option<String>,
        source: impl Into<String>,
    ) -> Result<Self> {
        let graph = ModuleGraph::from_normalized(&normalized)?;
        Ok(Self {
            normalized,
            graph,
            main_module,
            source: source.into(),
        })
    }

    /// Lines skipped while parsing the input.
    #[must_use]
    pub fn warnings(&self) -> &[Warning] {
        &self.normalized.warnings
    }

    /// Fail with [`Error::EmptyGraph`] if there are no edges.
    pub fn require_edges(&self) -> Result<()> {
        if self.normalized.is_empty() {
            return Err(Error::EmptyGraph(self.source.clone()));
        }
        Ok(())
    }

    /// The module a tree query starts from.
    ///
    /// In order: the explicit start, the main module of the source, the
    /// first module of the edge list.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyGraph`] if none of those is available.
    pub fn resolve_root(&self, options: &GraphOptions) -> Result<String> {
        options
            .start
            .clone()
            .or_else(|| self.main_module.clone())
            .or_else(|| self.normalized.ordered.first().cloned())
            .ok_or_else(|| Error::EmptyGraph(self.source.clone()))
    }

    /// Flatten the graph from the resolved root and apply the
    /// `contains` filter.
    ///
    /// Returns `Ok(None)` when the filter matches nothing.
    pub fn query_tree(&self, options: &GraphOptions) -> Result<Option<TreeNode>> {
        let root = self.resolve_root(options)?;
        if !self.graph.contains(&root) {
            tracing::warn!(module = %root, "Start module is not in the graph");
        }

        let tree = flatten(&self.graph, &root, options.direction, options.visit_mode);
        match &options.contains {
            Some(module) => {
                let filtered = filter_contains(tree, module);
                if filtered.is_none() {
                    tracing::info!(module = %module, "No path reaches the requested module");
                }
                Ok(filtered)
            }
            None => Ok(Some(tree)),
        }
    }
}
