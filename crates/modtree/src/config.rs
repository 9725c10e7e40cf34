//! Configuration for modtree.
//!
//! [`Settings`] holds the tool-level configuration (which binaries to run
//! and how long to wait for them). It is read from a YAML file and can be
//! overridden through environment variables. [`GraphOptions`] holds the
//! per-invocation query parameters built from command-line arguments.

use modtree_graph::{Direction, VisitMode};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;
use tokio::fs;

use crate::error::{Error, Result};

/// Configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "modtree.yaml";

/// Environment variable overriding [`Settings::go_command`].
pub const ENV_GO: &str = "MODTREE_GO";
/// Environment variable overriding [`Settings::layout_command`].
pub const ENV_LAYOUT: &str = "MODTREE_LAYOUT";
/// Environment variable overriding [`Settings::timeout_secs`].
pub const ENV_TIMEOUT_SECS: &str = "MODTREE_TIMEOUT_SECS";

const DEFAULT_GO_COMMAND: &str = "go";
const DEFAULT_LAYOUT_COMMAND: &str = "sfdp";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Tool-level settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Go toolchain binary used for `go list -m` and `go mod graph`.
    pub go_command: String,
    /// Default Graphviz layout binary for `graph dot --format`.
    pub layout_command: String,
    /// Upper bound for any single external tool invocation.
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            go_command: DEFAULT_GO_COMMAND.to_string(),
            layout_command: DEFAULT_LAYOUT_COMMAND.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    /// Load settings from a YAML file.
    ///
    /// Missing keys take their default values.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await.map_err(|e| {
            Error::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_yaml(&content)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    /// Parse settings from YAML text. An empty document yields the defaults.
    pub fn from_yaml(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Resolve the effective settings for this invocation.
    ///
    /// Uses `explicit` if given, otherwise [`CONFIG_FILE_NAME`] in
    /// `working_dir` if it exists, otherwise the defaults. Environment
    /// overrides are applied last.
    pub async fn discover(explicit: Option<&Path>, working_dir: &Path) -> Result<Self> {
        let mut settings = match explicit {
            Some(path) => Self::load(path).await?,
            None => {
                let candidate = working_dir.join(CONFIG_FILE_NAME);
                if fs::try_exists(&candidate).await.unwrap_or(false) {
                    tracing::debug!(path = %candidate.display(), "Loading configuration");
                    Self::load(&candidate).await?
                } else {
                    Self::default()
                }
            }
        };
        settings.apply_overrides(|key| env::var(key).ok());
        settings.validate()?;
        Ok(settings)
    }

    /// Apply environment-style overrides through `lookup`.
    ///
    /// Empty values are ignored. An unparsable timeout is logged and ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(go) = lookup(ENV_GO).filter(|v| !v.is_empty()) {
            self.go_command = go;
        }
        if let Some(layout) = lookup(ENV_LAYOUT).filter(|v| !v.is_empty()) {
            self.layout_command = layout;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS).filter(|v| !v.is_empty()) {
            match raw.parse() {
                Ok(secs) => self.timeout_secs = secs,
                Err(_) => tracing::warn!(
                    env_var = ENV_TIMEOUT_SECS,
                    value = %raw,
                    default = self.timeout_secs,
                    "Invalid value, keeping configured timeout"
                ),
            }
        }
    }

    /// Reject settings that cannot work.
    pub fn validate(&self) -> Result<()> {
        if self.go_command.trim().is_empty() {
            return Err(Error::Config("go_command cannot be empty".to_string()));
        }
        if self.layout_command.trim().is_empty() {
            return Err(Error::Config("layout_command cannot be empty".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(Error::Config("timeout_secs must be at least 1".to_string()));
        }
        Ok(())
    }

    /// The per-tool timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Query parameters for one graph command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphOptions {
    /// Keep `@version` suffixes on module identifiers.
    pub keep_versions: bool,
    /// Root module; `None` means the main module.
    pub start: Option<String>,
    /// Which edges the tree follows.
    pub direction: Direction,
    /// Keep only paths that reach this module.
    pub contains: Option<String>,
    /// How revisits are detected.
    pub visit_mode: VisitMode,
}
