//! Workflow model: slug, display name, triggers, ordered jobs

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Result, WacError};
use crate::job::Job;
use crate::trigger::Trigger;

/// Filesystem-safe slug: no separators, no leading dot
static SLUG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.-]*$").unwrap());

/// A named CI pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct Workflow {
    slug: String,
    display_name: String,
    triggers: Vec<Trigger>,
    jobs: Vec<Job>,
}

impl Workflow {
    /// Create an empty workflow; fails if the slug is not filesystem-safe
    pub fn new(slug: impl Into<String>, display_name: impl Into<String>) -> Result<Self> {
        let slug = slug.into();
        if !SLUG_PATTERN.is_match(&slug) {
            return Err(WacError::malformed(
                format!("workflow '{}'", slug),
                "slug must start with a letter or digit and contain only letters, digits, '.', '-' or '_'",
            ));
        }

        Ok(Self {
            slug,
            display_name: display_name.into(),
            triggers: Vec::new(),
            jobs: Vec::new(),
        })
    }

    /// Add a trigger rule
    pub fn on(mut self, trigger: Trigger) -> Self {
        self.triggers.push(trigger);
        self
    }

    /// Append a job; its id must be new and its `needs` must name earlier jobs
    pub fn add_job(mut self, job: Job) -> Result<Self> {
        if self.jobs.iter().any(|j| j.id() == job.id()) {
            return Err(WacError::malformed(
                self.location(),
                format!("duplicate job id '{}'", job.id()),
            ));
        }
        self.check_needs(&job, &self.jobs)?;
        self.jobs.push(job);
        Ok(self)
    }

    /// Append jobs in order
    pub fn add_jobs<I>(self, jobs: I) -> Result<Self>
    where
        I: IntoIterator<Item = Job>,
    {
        jobs.into_iter().try_fold(self, Workflow::add_job)
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn triggers(&self) -> &[Trigger] {
        &self.triggers
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    /// File name derived from the slug, e.g. `ci.yml`
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}.{}", self.slug, extension)
    }

    /// Full structural validation, run before every render
    pub fn validate(&self) -> Result<()> {
        if self.display_name.trim().is_empty() {
            return Err(WacError::malformed(self.location(), "display name is empty"));
        }

        if self.triggers.is_empty() {
            return Err(WacError::malformed(self.location(), "workflow has no triggers"));
        }
        let mut events = HashSet::new();
        for trigger in &self.triggers {
            // keyed by rendered name: `Other("push")` collides with `Push`
            if !events.insert(trigger.event.as_str()) {
                return Err(WacError::malformed(
                    self.location(),
                    format!("trigger event '{}' is declared more than once", trigger.event),
                ));
            }
        }

        if self.jobs.is_empty() {
            return Err(WacError::malformed(self.location(), "workflow has no jobs"));
        }
        let mut ids = HashSet::new();
        for (index, job) in self.jobs.iter().enumerate() {
            if !ids.insert(job.id()) {
                return Err(WacError::malformed(
                    self.location(),
                    format!("duplicate job id '{}'", job.id()),
                ));
            }
            job.validate().map_err(|e| self.nest(e))?;
            self.check_needs(job, &self.jobs[..index])?;
        }

        Ok(())
    }

    fn check_needs(&self, job: &Job, earlier: &[Job]) -> Result<()> {
        for dep in job.dependencies() {
            if !earlier.iter().any(|j| j.id() == dep) {
                return Err(WacError::malformed(
                    format!("{} > job '{}'", self.location(), job.id()),
                    format!("`needs` refers to '{}', which is not an earlier job", dep),
                ));
            }
        }
        Ok(())
    }

    fn location(&self) -> String {
        format!("workflow '{}'", self.slug)
    }

    fn nest(&self, err: WacError) -> WacError {
        match err {
            WacError::MalformedWorkflow { location, reason } => WacError::MalformedWorkflow {
                location: format!("{} > {}", self.location(), location),
                reason,
            },
            other => other,
        }
    }
}
