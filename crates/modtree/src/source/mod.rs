//! Where module graphs come from.
//!
//! A [`GraphSource`] yields the raw edge list (the `go mod graph` text
//! format) and, when it knows one, the main module to use as the default
//! tree root.
//!
//! - [`GoModSource`] runs the Go toolchain.
//! - [`FileSource`] reads a saved edge list from a file or stdin.

pub mod process;

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::{Error, Result};
use process::{Cancellation, ToolCommand};

/// Path that selects stdin for [`FileSource`].
pub const STDIN_PATH: &str = "-";

/// A provider of module dependency edges.
#[async_trait]
pub trait GraphSource: Send + Sync {
    /// The main module, if this source knows it.
    async fn main_module(&self) -> Result<Option<String>>;

    /// The edge list text, one `module dependency` pair per line.
    async fn edge_list(&self) -> Result<String>;

    /// Human-readable description for messages.
    fn describe(&self) -> String;
}

/// Reads the graph from the Go toolchain in a module directory.
#[derive(Debug, Clone)]
pub struct GoModSource {
    go_command: String,
    working_dir: Option<PathBuf>,
    timeout: Duration,
    cancel: Cancellation,
}

impl GoModSource {
    /// Create a source that runs `go_command` in the current directory.
    pub fn new(go_command: impl Into<String>, timeout: Duration, cancel: Cancellation) -> Self {
        Self {
            go_command: go_command.into(),
            working_dir: None,
            timeout,
            cancel,
        }
    }

    /// Run the toolchain in `dir`.
    #[must_use]
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    fn command(&self, args: &[&str]) -> ToolCommand {
        let command = ToolCommand::new(&self.go_command, self.timeout, self.cancel.clone())
            .args(args.iter().copied());
        match &self.working_dir {
            Some(dir) => command.current_dir(dir),
            None => command,
        }
    }
}

#[async_trait]
impl GraphSource for GoModSource {
    async fn main_module(&self) -> Result<Option<String>> {
        let listing = self.command(&["list", "-m"]).run_text().await?;
        Ok(first_module(&listing))
    }

    async fn edge_list(&self) -> Result<String> {
        self.command(&["mod", "graph"]).run_text().await
    }

    fn describe(&self) -> String {
        format!("`{} mod graph`", self.go_command)
    }
}

/// First non-empty line of `go list -m` output. In workspace mode the
/// command lists every workspace module; the first one is used.
fn first_module(listing: &str) -> Option<String> {
    listing
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

/// Reads a previously captured edge list.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    cancel: Cancellation,
}

impl FileSource {
    /// Read from `path`, or from stdin when `path` is [`STDIN_PATH`].
    ///
    /// Reading stdin stops with [`Error::Cancelled`] when `cancel` fires.
    pub fn new(path: impl Into<PathBuf>, cancel: Cancellation) -> Self {
        Self {
            path: path.into(),
            cancel,
        }
    }

    /// The configured path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_stdin(&self) -> bool {
        self.path.as_os_str() == STDIN_PATH
    }
}

#[async_trait]
impl GraphSource for FileSource {
    async fn main_module(&self) -> Result<Option<String>> {
        Ok(None)
    }

    async fn edge_list(&self) -> Result<String> {
        if self.is_stdin() {
            return read_until_cancelled(tokio::io::stdin(), "stdin", &self.cancel).await;
        }
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| Error::GraphFile {
                path: self.path.clone(),
                source,
            })
    }

    fn describe(&self) -> String {
        if self.is_stdin() {
            "stdin".to_string()
        } else {
            self.path.display().to_string()
        }
    }
}

/// Read `reader` to the end unless `cancel` fires first.
async fn read_until_cancelled<R>(mut reader: R, name: &str, cancel: &Cancellation) -> Result<String>
where
    R: AsyncRead + Unpin + Send,
{
    let mut text = String::new();
    tokio::select! {
        biased;
        () = cancel.cancelled() => {
            tracing::debug!(source = name, "Read cancelled");
            Err(Error::Cancelled { tool: name.to_string() })
        }
        result = reader.read_to_string(&mut text) => {
            result?;
            Ok(text)
        }
    }
}
