//! Cancellable, time-bounded execution of external tools.
//!
//! Every subprocess modtree starts (`go list -m`, `go mod graph`, the
//! Graphviz layout binary) goes through [`ToolCommand::run`], which races
//! the child against a [`Cancellation`] signal and a timeout. The child is
//! spawned with `kill_on_drop`, so losing either race kills it.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::sync::watch;

use crate::error::{Error, Result};

/// Triggers a [`Cancellation`].
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Signal every linked [`Cancellation`]. Idempotent.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

/// Observes a cancellation request. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Cancellation {
    rx: watch::Receiver<bool>,
}

impl Cancellation {
    /// A cancellation that never fires.
    #[must_use]
    pub fn never() -> Self {
        let (_tx, rx) = watch::channel(false);
        Self { rx }
    }

    /// Returns `true` once the linked handle has cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves when the linked handle cancels; pends forever if it is
    /// dropped without cancelling.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        if rx.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Create a linked cancel handle and cancellation.
#[must_use]
pub fn cancellation() -> (CancelHandle, Cancellation) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, Cancellation { rx })
}

/// An external tool invocation.
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: String,
    args: Vec<String>,
    current_dir: Option<PathBuf>,
    timeout: Duration,
    cancel: Cancellation,
}

impl ToolCommand {
    /// Invoke `program` with no arguments, the given timeout and cancellation.
    pub fn new(program: impl Into<String>, timeout: Duration, cancel: Cancellation) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            timeout,
            cancel,
        }
    }

    /// Add an argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add several arguments.
    #[must_use]
    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Run in `dir` instead of the current directory.
    #[must_use]
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// The program name, as used in error messages.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Run to completion and return the captured stdout.
    ///
    /// # Errors
    ///
    /// - [`Error::Spawn`] if the program cannot be started
    /// - [`Error::Cancelled`] if cancellation fires first
    /// - [`Error::TimedOut`] if the timeout elapses first
    /// - [`Error::ToolFailed`] on a non-zero exit, carrying stderr
    pub async fn run(&self) -> Result<Vec<u8>> {
        if self.cancel.is_cancelled() {
            return Err(Error::Cancelled {
                tool: self.program.clone(),
            });
        }

        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &self.current_dir {
            command.current_dir(dir);
        }

        tracing::debug!(tool = %self.program, args = ?self.args, "Running external tool");

        let child = command.spawn().map_err(|source| Error::Spawn {
            tool: self.program.clone(),
            source,
        })?;

        let output = tokio::select! {
            biased;
            () = self.cancel.cancelled() => {
                tracing::debug!(tool = %self.program, "Cancelled");
                return Err(Error::Cancelled { tool: self.program.clone() });
            }
            result = tokio::time::timeout(self.timeout, child.wait_with_output()) => match result {
                Ok(output) => output?,
                Err(_) => {
                    return Err(Error::TimedOut {
                        tool: self.program.clone(),
                        timeout: self.timeout,
                    });
                }
            },
        };

        if !output.status.success() {
            return Err(Error::ToolFailed {
                tool: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        tracing::debug!(tool = %self.program, bytes = output.stdout.len(), "Tool finished");
        Ok(output.stdout)
    }

    /// [`ToolCommand::run`], decoding stdout as UTF-8 (lossily).
    pub async fn run_text(&self) -> Result<String> {
        let stdout = self.run().await?;
        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }
}
