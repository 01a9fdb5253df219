//! Trigger rules (`on:`)
//!
//! Each rule names a repository event and an optional filter. Rules
//! compose with OR semantics: any matching rule starts the workflow.

use std::fmt;

use serde::Serialize;

/// Repository event that starts a workflow
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TriggerEvent {
    Push,
    PullRequest,
    WorkflowDispatch,
    /// Any other event, rendered verbatim
    Other(String),
}

impl TriggerEvent {
    /// Key used under `on:`
    pub fn as_str(&self) -> &str {
        match self {
            TriggerEvent::Push => "push",
            TriggerEvent::PullRequest => "pull_request",
            TriggerEvent::WorkflowDispatch => "workflow_dispatch",
            TriggerEvent::Other(name) => name,
        }
    }
}

impl fmt::Display for TriggerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filter patterns for an event
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TriggerFilter {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub branches: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub paths: Vec<String>,
}

impl TriggerFilter {
    pub fn is_empty(&self) -> bool {
        self.branches.is_empty() && self.tags.is_empty() && self.paths.is_empty()
    }
}

/// One trigger rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    pub event: TriggerEvent,
    pub filter: TriggerFilter,
}

impl Trigger {
    pub fn new(event: TriggerEvent) -> Self {
        Self {
            event,
            filter: TriggerFilter::default(),
        }
    }

    pub fn push() -> Self {
        Self::new(TriggerEvent::Push)
    }

    pub fn pull_request() -> Self {
        Self::new(TriggerEvent::PullRequest)
    }

    pub fn workflow_dispatch() -> Self {
        Self::new(TriggerEvent::WorkflowDispatch)
    }

    pub fn branches<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter.branches.extend(patterns.into_iter().map(Into::into));
        self
    }

    pub fn tags<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter.tags.extend(patterns.into_iter().map(Into::into));
        self
    }

    pub fn paths<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter.paths.extend(patterns.into_iter().map(Into::into));
        self
    }
}
