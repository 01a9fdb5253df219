//! The set of workflows a project renders
//!
//! Slugs name files, so two workflows may never share one. Slugs are
//! compared case-insensitively: `ci` and `CI` would collide on macOS and
//! Windows checkouts.

use tracing::debug;

use crate::error::{Result, WacError};
use crate::workflow::Workflow;

#[derive(Debug, Default)]
pub struct Registry {
    workflows: Vec<Workflow>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a workflow, rejecting a slug that is already taken
    pub fn register(&mut self, workflow: Workflow) -> Result<()> {
        if self.find(workflow.slug()).is_some() {
            return Err(WacError::DuplicateWorkflow {
                slug: workflow.slug().to_string(),
            });
        }
        debug!(workflow = workflow.slug(), "registered workflow");
        self.workflows.push(workflow);
        Ok(())
    }

    /// Chained form of [`Registry::register`]
    pub fn with(mut self, workflow: Workflow) -> Result<Self> {
        self.register(workflow)?;
        Ok(self)
    }

    pub fn get(&self, slug: &str) -> Option<&Workflow> {
        self.find(slug)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Workflow> {
        self.workflows.iter()
    }

    pub fn len(&self) -> usize {
        self.workflows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workflows.is_empty()
    }

    pub fn slugs(&self) -> Vec<&str> {
        self.workflows.iter().map(Workflow::slug).collect()
    }

    /// Workflows to process: all of them, or exactly the requested slugs
    ///
    /// Registration order is kept either way. An unknown slug is a usage error.
    pub fn select(&self, slugs: &[String]) -> Result<Vec<&Workflow>> {
        if slugs.is_empty() {
            return Ok(self.workflows.iter().collect());
        }

        if let Some(unknown) = slugs.iter().find(|s| self.find(s).is_none()) {
            return Err(WacError::UsageError {
                message: format!(
                    "Unknown workflow '{}'. Registered workflows: {}",
                    unknown,
                    self.slugs().join(", ")
                ),
            });
        }

        Ok(self
            .workflows
            .iter()
            .filter(|w| slugs.iter().any(|s| s.eq_ignore_ascii_case(w.slug())))
            .collect())
    }

    fn find(&self, slug: &str) -> Option<&Workflow> {
        self.workflows
            .iter()
            .find(|w| w.slug().eq_ignore_ascii_case(slug))
    }
}
