//! wac Configuration Module
//!
//! Where rendered workflows live. Config is read from `wac.toml` in the
//! working directory.
//!
//! ## Priority Order (highest to lowest)
//!
//! 1. `--dir` flag / `WAC_WORKFLOWS_DIR` environment variable
//! 2. Config file (`wac.toml`)
//! 3. Defaults (`.github/workflows`, `yml`)

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, WacError};
use crate::workflow::Workflow;

pub const DEFAULT_CONFIG_FILE: &str = "wac.toml";
pub const DEFAULT_WORKFLOWS_DIR: &str = ".github/workflows";
pub const DEFAULT_EXTENSION: &str = "yml";

/// Contents of `wac.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct WacConfig {
    /// Directory holding the rendered workflow files
    pub workflows_dir: Option<PathBuf>,

    /// File extension without the dot (`yml` or `yaml`)
    pub extension: Option<String>,
}

impl WacConfig {
    /// Load configuration from `path`
    ///
    /// A missing file yields the default config unless `required` is set
    /// (the user named the file explicitly). A malformed file is an error.
    pub fn load(path: &Path, required: bool) -> Result<Self> {
        if !path.exists() {
            if required {
                return Err(WacError::Config {
                    reason: format!("config file {} does not exist", path.display()),
                });
            }
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| WacError::Config {
            reason: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        Self::from_toml(&content).map_err(|e| match e {
            WacError::Config { reason } => WacError::Config {
                reason: format!("{}: {}", path.display(), reason),
            },
            other => other,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: WacConfig = toml::from_str(content).map_err(|e| WacError::Config {
            reason: format!("Failed to parse config file: {}", e),
        })?;

        if let Some(ext) = &config.extension {
            if ext.is_empty() || ext.starts_with('.') || ext.contains(['/', '\\']) {
                return Err(WacError::Config {
                    reason: format!("invalid extension '{}' (expected e.g. 'yml')", ext),
                });
            }
        }
        Ok(config)
    }

    /// Resolve the output layout; `dir_override` comes from the CLI/env
    pub fn layout(&self, dir_override: Option<PathBuf>) -> Layout {
        Layout {
            dir: dir_override
                .or_else(|| self.workflows_dir.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_WORKFLOWS_DIR)),
            extension: self
                .extension
                .clone()
                .unwrap_or_else(|| DEFAULT_EXTENSION.to_string()),
        }
    }
}

/// Where a workflow's artifact lives on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub dir: PathBuf,
    pub extension: String,
}

impl Default for Layout {
    fn default() -> Self {
        WacConfig::default().layout(None)
    }
}

impl Layout {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    /// `<dir>/<slug>.<extension>`
    pub fn path_for(&self, workflow: &Workflow) -> PathBuf {
        self.dir.join(workflow.file_name(&self.extension))
    }
}
