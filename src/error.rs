//! Error types with fix suggestions
//!
//! Error code ranges:
//! - WAC-001-009: Model errors (malformed or duplicate definitions)
//! - WAC-010-019: Sync errors (missing artifact, drift)
//! - WAC-020-029: IO / serialization errors (021 retired)
//! - WAC-030-039: CLI / configuration errors

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, WacError>;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

#[derive(Error, Debug)]
pub enum WacError {
    // ═══════════════════════════════════════════
    // MODEL ERRORS (001-009)
    // ═══════════════════════════════════════════
    #[error("[WAC-001] Malformed workflow at {location}: {reason}")]
    MalformedWorkflow { location: String, reason: String },

    #[error("[WAC-002] Workflow slug '{slug}' is registered more than once")]
    DuplicateWorkflow { slug: String },

    // ═══════════════════════════════════════════
    // SYNC ERRORS (010-019)
    // ═══════════════════════════════════════════
    #[error("[WAC-010] Workflow '{workflow}' is out of sync: {} does not exist", .path.display())]
    MissingArtifact { workflow: String, path: PathBuf },

    #[error(
        "[WAC-011] Workflow '{workflow}' is out of sync: {} differs from the rendered output (first difference at line {line})",
        .path.display()
    )]
    DriftDetected {
        workflow: String,
        path: PathBuf,
        line: usize,
    },

    // ═══════════════════════════════════════════
    // IO / SERIALIZATION ERRORS (020-029)
    // ═══════════════════════════════════════════
    #[error("[WAC-020] IO error on {}: {source}", .path.display())]
    IoAt {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[WAC-022] YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("[WAC-023] JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    // ═══════════════════════════════════════════
    // CLI / CONFIG ERRORS (030-039)
    // ═══════════════════════════════════════════
    #[error("[WAC-030] {message}")]
    UsageError { message: String },

    #[error("[WAC-031] Invalid configuration: {reason}")]
    Config { reason: String },
}

impl WacError {
    pub(crate) fn malformed(location: impl Into<String>, reason: impl Into<String>) -> Self {
        WacError::MalformedWorkflow {
            location: location.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn io_at(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        WacError::IoAt {
            path: path.into(),
            source,
        }
    }

    /// True when the error means "the committed file does not match"
    pub fn is_out_of_sync(&self) -> bool {
        matches!(
            self,
            WacError::MissingArtifact { .. } | WacError::DriftDetected { .. }
        )
    }

    /// Stable error code, e.g. `WAC-011`
    pub fn code(&self) -> &'static str {
        match self {
            WacError::MalformedWorkflow { .. } => "WAC-001",
            WacError::DuplicateWorkflow { .. } => "WAC-002",
            WacError::MissingArtifact { .. } => "WAC-010",
            WacError::DriftDetected { .. } => "WAC-011",
            WacError::IoAt { .. } => "WAC-020",
            WacError::Yaml(_) => "WAC-022",
            WacError::Json(_) => "WAC-023",
            WacError::UsageError { .. } => "WAC-030",
            WacError::Config { .. } => "WAC-031",
        }
    }
}

/// Remediation shared by every out-of-sync failure
pub const REGENERATE_HINT: &str =
    "Workflows are out of sync! Please regenerate them using `wac generate`.";

impl FixSuggestion for WacError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            WacError::MalformedWorkflow { .. } => {
                Some("Fix the workflow definition: every step needs exactly one of `uses` or `run`, every job at least one step")
            }
            WacError::DuplicateWorkflow { .. } => {
                Some("Give each workflow a unique slug (slugs are compared case-insensitively)")
            }
            WacError::MissingArtifact { .. } | WacError::DriftDetected { .. } => {
                Some(REGENERATE_HINT)
            }
            WacError::IoAt { .. } => Some("Check file path and permissions"),
            WacError::Yaml(_) | WacError::Json(_) => None,
            WacError::UsageError { .. } => Some("Run `wac --help` to list commands and options"),
            WacError::Config { .. } => Some("Check wac.toml: expected `workflows_dir` and `extension` keys"),
        }
    }
}
