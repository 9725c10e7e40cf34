//! Modtree - query and visualize Go module dependency graphs.
//!
//! This crate provides both the `modtree` CLI and a library for loading a
//! module graph (from the Go toolchain or a saved `go mod graph` dump),
//! querying it as trees through [`modtree_graph`], and rendering the results
//! as text, JSON, Graphviz or HTML.

#![forbid(unsafe_code)]

pub mod app;
pub mod config;
pub mod error;
pub mod output;
pub mod source;

// Public CLI module (needed by binary)
pub mod cli;

pub use error::{Error, Result};
