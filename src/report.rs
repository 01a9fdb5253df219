//! Per-workflow outcomes of a generate/check run

use std::path::PathBuf;

use serde::Serialize;

use crate::error::{FixSuggestion, Result, WacError};
use crate::sync::Mode;

/// Result of syncing one workflow
#[derive(Debug)]
pub struct Outcome {
    pub workflow: String,
    pub path: PathBuf,
    pub error: Option<WacError>,
}

impl Outcome {
    pub fn ok(workflow: impl Into<String>, path: PathBuf) -> Self {
        Self {
            workflow: workflow.into(),
            path,
            error: None,
        }
    }

    pub fn failed(workflow: impl Into<String>, path: PathBuf, error: WacError) -> Self {
        Self {
            workflow: workflow.into(),
            path,
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// All outcomes of one invocation, in processing order
#[derive(Debug)]
pub struct Report {
    mode: Mode,
    outcomes: Vec<Outcome>,
}

impl Report {
    pub fn new(mode: Mode, outcomes: Vec<Outcome>) -> Self {
        Self { mode, outcomes }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    pub fn failures(&self) -> impl Iterator<Item = &Outcome> {
        self.outcomes.iter().filter(|o| !o.is_ok())
    }

    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(Outcome::is_ok)
    }

    /// True if at least one failure is drift or a missing file
    pub fn has_drift(&self) -> bool {
        self.failures()
            .filter_map(|o| o.error.as_ref())
            .any(WacError::is_out_of_sync)
    }

    /// Machine-readable form for `--format json`
    pub fn to_json(&self) -> Result<String> {
        let view = ReportView {
            command: self.mode.as_str(),
            success: self.is_success(),
            workflows: self
                .outcomes
                .iter()
                .map(|o| OutcomeView {
                    workflow: &o.workflow,
                    path: o.path.display().to_string(),
                    status: match (&o.error, self.mode) {
                        (None, Mode::Generate) => "generated",
                        (None, Mode::Check) => "ok",
                        (Some(e), _) if e.is_out_of_sync() => "out_of_sync",
                        (Some(_), _) => "error",
                    },
                    code: o.error.as_ref().map(WacError::code),
                    error: o.error.as_ref().map(|e| e.to_string()),
                    fix: o.error.as_ref().and_then(|e| e.fix_suggestion()),
                })
                .collect(),
        };
        Ok(serde_json::to_string_pretty(&view)?)
    }
}

#[derive(Serialize)]
struct ReportView<'a> {
    command: &'static str,
    success: bool,
    workflows: Vec<OutcomeView<'a>>,
}

#[derive(Serialize)]
struct OutcomeView<'a> {
    workflow: &'a str,
    path: String,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fix: Option<&'a str>,
}
