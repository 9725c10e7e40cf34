//! Command execution logic.
//!
//! This module contains the implementation of the `graph` commands.

use anyhow::{Context, Result};
use std::io;

use super::args::{DotArgs, ItreeArgs, QueryArgs, WheelArgs};
use crate::app::{App, LoadedGraph};
use crate::config::GraphOptions;
use crate::output::{
    self, AdjacencyMatrix, OutputConfig, OutputMode, TreeJson, render_dot, render_itree_page,
    render_wheel_page, write_dot, write_tree_json, write_tree_text,
};

/// Load the graph and report skipped input lines.
async fn load(app: &App, options: &GraphOptions) -> Result<LoadedGraph> {
    let loaded = app.load(options).await?;
    report_warnings(&loaded);
    Ok(loaded)
}

fn report_warnings(loaded: &LoadedGraph) {
    let config = OutputConfig::from_env();
    for warning in loaded.warnings() {
        eprintln!("{}: {warning}", output::warning("warning", config));
    }
}

/// Execute the `graph dot` command
pub async fn execute_dot(app: &App, args: &DotArgs) -> Result<()> {
    let options = args.source.to_options();
    let loaded = load(app, &options).await?;
    let root = loaded.resolve_root(&options)?;
    let edges = loaded.graph.edges();

    let Some(format) = &args.format else {
        let stdout = io::stdout();
        write_dot(&mut stdout.lock(), &root, &edges)?;
        return Ok(());
    };

    let command = args
        .command
        .clone()
        .unwrap_or_else(|| app.settings().layout_command.clone());
    let document = render_dot(&root, &edges);
    let rendered = output::dot::layout(app.tool(command.clone()), format, &document)
        .await
        .with_context(|| format!("failed to lay out graph with {command} -T{format}"))?;
    output::print_bytes(&rendered)?;
    Ok(())
}

/// Execute the `graph query` command
pub async fn execute_query(app: &App, args: &QueryArgs, output_mode: OutputMode) -> Result<()> {
    let options = args.tree.to_options(args.source.versioned);
    let loaded = load(app, &options).await?;
    let root = loaded.resolve_root(&options)?;
    let tree = loaded.query_tree(&options)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    match output_mode {
        OutputMode::Text => write_tree_text(&mut handle, tree.as_ref(), OutputConfig::from_env())?,
        OutputMode::Json => {
            let json = tree
                .as_ref()
                .map_or_else(|| TreeJson::childless(&root), TreeJson::from);
            write_tree_json(&mut handle, &json)?;
        }
    }
    Ok(())
}

/// Execute the `graph dependency-wheel` command
pub async fn execute_wheel(app: &App, args: &WheelArgs) -> Result<()> {
    let loaded = load(app, &args.source.to_options()).await?;
    loaded.require_edges()?;

    let ordered = &loaded.normalized.ordered;
    let matrix = AdjacencyMatrix::new(ordered, &loaded.graph.edges());
    let name = ordered.first().map_or("", String::as_str);
    let page = render_wheel_page(name, &matrix)?;
    output::print_str(&page)?;
    Ok(())
}

/// Execute the `graph itree` command
pub async fn execute_itree(app: &App, args: &ItreeArgs) -> Result<()> {
    let options = args.tree.to_options(args.source.versioned);
    let loaded = load(app, &options).await?;
    let root = loaded.resolve_root(&options)?;
    let tree = loaded.query_tree(&options)?;

    let json = tree
        .as_ref()
        .map_or_else(|| TreeJson::childless(&root), TreeJson::from);
    let page = render_itree_page(&root, &json)?;
    output::print_str(&page)?;
    Ok(())
}
