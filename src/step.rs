//! Steps: the smallest unit of a job
//!
//! A step is either an action invocation (`uses` + `with`) or an inline
//! shell command (`run`, optional `shell`). [`StepConfig`] is the loose
//! configuration record call sites fill in; [`Step`] is the validated value
//! that a [`crate::Job`] stores.

use std::fmt;

use serde::Serialize;

use crate::error::{Result, WacError};

/// Scalar value of a `with:` parameter
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StepInput {
    String(String),
    Bool(bool),
    Int(i64),
    Float(f64),
}

impl From<&str> for StepInput {
    fn from(value: &str) -> Self {
        StepInput::String(value.to_string())
    }
}

impl From<String> for StepInput {
    fn from(value: String) -> Self {
        StepInput::String(value)
    }
}

impl From<bool> for StepInput {
    fn from(value: bool) -> Self {
        StepInput::Bool(value)
    }
}

impl From<i64> for StepInput {
    fn from(value: i64) -> Self {
        StepInput::Int(value)
    }
}

impl From<i32> for StepInput {
    fn from(value: i32) -> Self {
        StepInput::Int(value.into())
    }
}

impl From<f64> for StepInput {
    fn from(value: f64) -> Self {
        StepInput::Float(value)
    }
}

/// Ordered `with:` parameters
///
/// Keys are unique; re-setting a key replaces its value in place so the
/// rendered order stays the order of first insertion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepInputs(Vec<(String, StepInput)>);

impl StepInputs {
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<StepInput>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&StepInput> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StepInput)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// What a step does
#[derive(Debug, Clone, PartialEq)]
pub enum StepKind {
    /// `uses: owner/repo@ref`
    Action { uses: String, with: StepInputs },
    /// `run:` lines joined with `\n` at render time
    Shell { run: Vec<String>, shell: Option<String> },
}

/// A validated step
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    name: Option<String>,
    kind: StepKind,
}

impl Step {
    /// Validate a configuration record into a step
    pub fn from_config(config: StepConfig) -> Result<Self> {
        let location = match &config.name {
            Some(name) => format!("step '{}'", name),
            None => "step".to_string(),
        };

        let kind = match (config.uses, config.run) {
            (Some(_), Some(_)) => {
                return Err(WacError::malformed(
                    location,
                    "both `uses` and `run` are set",
                ))
            }
            (None, None) => {
                return Err(WacError::malformed(
                    location,
                    "neither `uses` nor `run` is set",
                ))
            }
            (Some(uses), None) => {
                if uses.trim().is_empty() {
                    return Err(WacError::malformed(location, "`uses` is empty"));
                }
                if config.shell.is_some() {
                    return Err(WacError::malformed(
                        location,
                        "`shell` only applies to `run` steps",
                    ));
                }
                StepKind::Action {
                    uses,
                    with: config.with,
                }
            }
            (None, Some(run)) => {
                if run.is_empty() {
                    return Err(WacError::malformed(location, "`run` has no command lines"));
                }
                if run.iter().all(|line| line.trim().is_empty()) {
                    return Err(WacError::malformed(location, "`run` has only blank lines"));
                }
                if !config.with.is_empty() {
                    return Err(WacError::malformed(
                        location,
                        "`with` only applies to `uses` steps",
                    ));
                }
                StepKind::Shell {
                    run,
                    shell: config.shell,
                }
            }
        };

        Ok(Step {
            name: config.name,
            kind,
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn kind(&self) -> &StepKind {
        &self.kind
    }

    /// The `run:` script as rendered (lines joined with `\n`)
    pub fn script(&self) -> Option<String> {
        match &self.kind {
            StepKind::Shell { run, .. } => Some(run.join("\n")),
            StepKind::Action { .. } => None,
        }
    }
}

impl TryFrom<StepConfig> for Step {
    type Error = WacError;

    fn try_from(config: StepConfig) -> Result<Self> {
        Step::from_config(config)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.name, &self.kind) {
            (Some(name), _) => write!(f, "{}", name),
            (None, StepKind::Action { uses, .. }) => write!(f, "uses {}", uses),
            (None, StepKind::Shell { run, .. }) => {
                write!(f, "run {}", run.first().map(String::as_str).unwrap_or(""))
            }
        }
    }
}

/// Step configuration record and fluent builder
///
/// Setters never fail. Contradictions (both `uses` and `run`, `with` on a
/// shell step, ...) surface when the record is turned into a [`Step`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepConfig {
    pub name: Option<String>,
    pub uses: Option<String>,
    pub with: StepInputs,
    pub run: Option<Vec<String>>,
    pub shell: Option<String>,
}

impl StepConfig {
    /// Action invocation, e.g. `StepConfig::uses("actions/checkout@v4")`
    pub fn uses(action: impl Into<String>) -> Self {
        Self {
            uses: Some(action.into()),
            ..Self::default()
        }
    }

    /// Single-line shell command
    pub fn run(command: impl Into<String>) -> Self {
        Self {
            run: Some(vec![command.into()]),
            ..Self::default()
        }
    }

    /// Multi-line shell script, one entry per line
    pub fn run_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            run: Some(lines.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Add a `with:` parameter
    pub fn with(mut self, key: impl Into<String>, value: impl Into<StepInput>) -> Self {
        self.with.insert(key, value);
        self
    }

    /// Append a command line to `run:`
    pub fn line(mut self, command: impl Into<String>) -> Self {
        self.run.get_or_insert_with(Vec::new).push(command.into());
        self
    }

    pub fn shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = Some(shell.into());
        self
    }
}

impl From<Step> for StepConfig {
    fn from(step: Step) -> Self {
        match step.kind {
            StepKind::Action { uses, with } => StepConfig {
                name: step.name,
                uses: Some(uses),
                with,
                ..StepConfig::default()
            },
            StepKind::Shell { run, shell } => StepConfig {
                name: step.name,
                run: Some(run),
                shell,
                ..StepConfig::default()
            },
        }
    }
}
