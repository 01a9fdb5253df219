//! Renderer: Workflow → canonical GitHub Actions YAML
//!
//! Pure and deterministic. Key order is fixed by the view structs below
//! (`name`, `on`, `jobs`; per job `name`, `runs-on`, `needs`, `steps`), and
//! every collection keeps insertion order, so equal workflows render to
//! byte-identical text.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::job::{Job, RunsOn};
use crate::step::{Step, StepInputs, StepKind};
use crate::trigger::Trigger;
use crate::workflow::Workflow;

/// Render a workflow to YAML text ending with a single newline
///
/// Fails with `MalformedWorkflow` if the workflow does not validate.
pub fn render(workflow: &Workflow) -> Result<String> {
    workflow.validate()?;

    let view = WorkflowView::from(workflow);
    let mut yaml = serde_yaml::to_string(&view)?;

    while yaml.ends_with("\n\n") {
        yaml.pop();
    }
    if !yaml.ends_with('\n') {
        yaml.push('\n');
    }

    debug!(
        workflow = workflow.slug(),
        bytes = yaml.len(),
        "rendered workflow"
    );
    Ok(yaml)
}

#[derive(Serialize)]
struct WorkflowView<'a> {
    name: &'a str,
    on: TriggersView<'a>,
    jobs: JobsView<'a>,
}

impl<'a> From<&'a Workflow> for WorkflowView<'a> {
    fn from(workflow: &'a Workflow) -> Self {
        Self {
            name: workflow.display_name(),
            on: TriggersView(workflow.triggers()),
            jobs: JobsView(workflow.jobs()),
        }
    }
}

/// `on:` as a mapping keyed by event name, in declaration order
struct TriggersView<'a>(&'a [Trigger]);

impl Serialize for TriggersView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for trigger in self.0 {
            map.serialize_entry(trigger.event.as_str(), &trigger.filter)?;
        }
        map.end()
    }
}

/// `jobs:` as a mapping keyed by job id, in insertion order
struct JobsView<'a>(&'a [Job]);

impl Serialize for JobsView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for job in self.0 {
            map.serialize_entry(job.id(), &JobView::from(job))?;
        }
        map.end()
    }
}

#[derive(Serialize)]
struct JobView<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(rename = "runs-on")]
    runs_on: &'a RunsOn,
    #[serde(skip_serializing_if = "is_empty_slice")]
    needs: &'a [String],
    steps: Vec<StepView<'a>>,
}

impl<'a> From<&'a Job> for JobView<'a> {
    fn from(job: &'a Job) -> Self {
        Self {
            name: job.display_name(),
            runs_on: job.runs_on(),
            needs: job.dependencies(),
            steps: job.steps().iter().map(StepView::from).collect(),
        }
    }
}

fn is_empty_slice(items: &&[String]) -> bool {
    items.is_empty()
}

#[derive(Serialize)]
struct StepView<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    uses: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    with: Option<InputsView<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    run: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    shell: Option<&'a str>,
}

impl<'a> From<&'a Step> for StepView<'a> {
    fn from(step: &'a Step) -> Self {
        let mut view = StepView {
            name: step.name(),
            uses: None,
            with: None,
            run: None,
            shell: None,
        };
        match step.kind() {
            StepKind::Action { uses, with } => {
                view.uses = Some(uses.as_str());
                view.with = (!with.is_empty()).then_some(InputsView(with));
            }
            StepKind::Shell { shell, .. } => {
                view.run = step.script();
                view.shell = shell.as_deref();
            }
        }
        view
    }
}

struct InputsView<'a>(&'a StepInputs);

impl Serialize for InputsView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in self.0.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
