//! Jobs: ordered steps bound to a runner

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::error::{Result, WacError};
use crate::step::{Step, StepConfig};

/// GitHub Actions job id grammar
static JOB_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_-]*$").unwrap());

/// Target execution environment (`runs-on:`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RunsOn {
    Label(String),
    Labels(Vec<String>),
}

impl RunsOn {
    pub fn labels(&self) -> Vec<&str> {
        match self {
            RunsOn::Label(label) => vec![label.as_str()],
            RunsOn::Labels(labels) => labels.iter().map(String::as_str).collect(),
        }
    }

    /// No labels at all, or at least one blank label
    fn has_blank(&self) -> bool {
        let labels = self.labels();
        labels.is_empty() || labels.iter().any(|l| l.trim().is_empty())
    }
}

impl From<&str> for RunsOn {
    fn from(label: &str) -> Self {
        RunsOn::Label(label.to_string())
    }
}

impl From<String> for RunsOn {
    fn from(label: String) -> Self {
        RunsOn::Label(label)
    }
}

impl From<Vec<String>> for RunsOn {
    fn from(labels: Vec<String>) -> Self {
        RunsOn::Labels(labels)
    }
}

impl<const N: usize> From<[&str; N]> for RunsOn {
    fn from(labels: [&str; N]) -> Self {
        RunsOn::Labels(labels.iter().map(|l| l.to_string()).collect())
    }
}

/// A job: unique id, runner, ordered steps
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    id: String,
    name: Option<String>,
    runs_on: RunsOn,
    needs: Vec<String>,
    steps: Vec<Step>,
}

impl Job {
    pub fn new(id: impl Into<String>, runs_on: impl Into<RunsOn>) -> Self {
        Self {
            id: id.into(),
            name: None,
            runs_on: runs_on.into(),
            needs: Vec::new(),
            steps: Vec::new(),
        }
    }

    /// Display name (`name:`), distinct from the id
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Declare a job in the same workflow that must finish first
    pub fn needs(mut self, job_id: impl Into<String>) -> Self {
        self.needs.push(job_id.into());
        self
    }

    /// Append one step
    pub fn add_step(mut self, step: impl Into<StepConfig>) -> Result<Self> {
        let index = self.steps.len() + 1;
        let step = Step::from_config(step.into()).map_err(|e| self.locate(index, e))?;
        self.steps.push(step);
        Ok(self)
    }

    /// Append steps in order
    pub fn add_steps<I, S>(self, steps: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<StepConfig>,
    {
        steps.into_iter().try_fold(self, |job, step| job.add_step(step))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn runs_on(&self) -> &RunsOn {
        &self.runs_on
    }

    pub fn dependencies(&self) -> &[String] {
        &self.needs
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Structural checks that do not depend on sibling jobs
    pub fn validate(&self) -> Result<()> {
        let location = format!("job '{}'", self.id);

        if !JOB_ID_PATTERN.is_match(&self.id) {
            return Err(WacError::malformed(
                location,
                "job id must start with a letter or '_' and contain only letters, digits, '-' or '_'",
            ));
        }
        if self.runs_on.has_blank() {
            return Err(WacError::malformed(location, "`runs-on` has no labels or a blank label"));
        }
        if self.steps.is_empty() {
            return Err(WacError::malformed(location, "job has no steps"));
        }
        Ok(())
    }

    fn locate(&self, index: usize, err: WacError) -> WacError {
        match err {
            WacError::MalformedWorkflow { location, reason } => WacError::MalformedWorkflow {
                location: format!("job '{}' {} #{}", self.id, location, index),
                reason,
            },
            other => other,
        }
    }
}
