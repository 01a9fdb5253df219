//! wac - CI workflows as code
//!
//! Workflows are built in Rust from [`StepConfig`], [`Job`] and
//! [`Workflow`] values, rendered to GitHub Actions YAML by [`render`], and
//! kept in sync with the committed files by [`sync::generate`] and
//! [`sync::check`].

pub mod config;
pub mod error;
pub mod job;
pub mod registry;
pub mod render;
pub mod report;
pub mod step;
pub mod sync;
pub mod trigger;
pub mod workflow;
pub mod workflows;

pub use config::{Layout, WacConfig};
pub use error::{FixSuggestion, Result, WacError};
pub use job::{Job, RunsOn};
pub use registry::Registry;
pub use render::render;
pub use report::{Outcome, Report};
pub use step::{Step, StepConfig, StepInput, StepKind};
pub use sync::Mode;
pub use trigger::{Trigger, TriggerEvent, TriggerFilter};
pub use workflow::Workflow;
