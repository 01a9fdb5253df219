//! Render / generate / check properties
//!
//! Library-level tests: determinism, round trip, drift and order
//! sensitivity, invariant enforcement.

use std::fs;

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use wac::sync::{check, generate};
use wac::{render, Job, Layout, Step, StepConfig, Trigger, WacError, Workflow};

fn checkout() -> StepConfig {
    StepConfig::uses("actions/checkout@v4").name("Checkout")
}

fn setup_node(version: &str) -> StepConfig {
    StepConfig::uses("actions/setup-node@v4")
        .name("Setup Node")
        .with("node-version", version)
}

fn echo(text: &str) -> StepConfig {
    StepConfig::run(format!("echo {}", text)).name("Say")
}

fn workflow(steps: Vec<StepConfig>) -> Workflow {
    Workflow::new("ci", "CI")
        .unwrap()
        .on(Trigger::push().branches(["main"]))
        .on(Trigger::pull_request().branches(["main"]))
        .add_job(Job::new("Test", "ubuntu-latest").add_steps(steps).unwrap())
        .unwrap()
}

fn baseline() -> Workflow {
    workflow(vec![checkout(), setup_node("20"), echo("hi")])
}

// ═══════════════════════════════════════════════════════════════
// Scenario: ci / Test / checkout + echo hi
// ═══════════════════════════════════════════════════════════════

#[test]
fn test_scenario_generate_then_check() {
    let wf = workflow(vec![
        StepConfig::uses("actions/checkout@v4"),
        StepConfig::run("echo hi"),
    ]);
    let dir = TempDir::new().unwrap();
    let layout = Layout::new(dir.path());

    let yaml = render(&wf).unwrap();
    let doc: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();
    let jobs = doc["jobs"].as_mapping().unwrap();
    assert_eq!(jobs.len(), 1);
    let steps = doc["jobs"]["Test"]["steps"].as_sequence().unwrap();
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[0]["uses"].as_str(), Some("actions/checkout@v4"));
    assert_eq!(steps[1]["run"].as_str(), Some("echo hi"));

    let path = generate(&wf, &layout).unwrap();
    assert_eq!(path, dir.path().join("ci.yml"));
    assert_eq!(check(&wf, &layout).unwrap(), path);
}

#[test]
fn test_render_twice_is_identical() {
    assert_eq!(render(&baseline()).unwrap(), render(&baseline()).unwrap());
}

#[test]
fn test_generate_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let layout = Layout::new(dir.path());

    let path = generate(&baseline(), &layout).unwrap();
    let first = fs::read(&path).unwrap();
    generate(&baseline(), &layout).unwrap();
    assert_eq!(fs::read(&path).unwrap(), first);
    check(&baseline(), &layout).unwrap();
}

// ═══════════════════════════════════════════════════════════════
// Drift sensitivity
// ═══════════════════════════════════════════════════════════════

fn assert_drift(changed: Workflow) {
    let dir = TempDir::new().unwrap();
    let layout = Layout::new(dir.path());
    generate(&baseline(), &layout).unwrap();

    match check(&changed, &layout) {
        Err(WacError::DriftDetected { workflow, line, .. }) => {
            assert_eq!(workflow, "ci");
            assert!(line >= 1);
        }
        other => panic!("expected DriftDetected, got {:?}", other),
    }
}

#[test]
fn test_drift_step_name() {
    assert_drift(workflow(vec![
        checkout().name("Checkout code"),
        setup_node("20"),
        echo("hi"),
    ]));
}

#[test]
fn test_drift_command_text() {
    assert_drift(workflow(vec![checkout(), setup_node("20"), echo("bye")]));
}

#[test]
fn test_drift_action_reference() {
    assert_drift(workflow(vec![
        StepConfig::uses("actions/checkout@v3").name("Checkout"),
        setup_node("20"),
        echo("hi"),
    ]));
}

#[test]
fn test_drift_parameter_value() {
    assert_drift(workflow(vec![checkout(), setup_node("22"), echo("hi")]));
}

#[test]
fn test_drift_step_order() {
    assert_drift(workflow(vec![setup_node("20"), checkout(), echo("hi")]));
}

#[test]
fn test_drift_on_hand_edit() {
    let dir = TempDir::new().unwrap();
    let layout = Layout::new(dir.path());
    let path = generate(&baseline(), &layout).unwrap();

    let mut content = fs::read_to_string(&path).unwrap();
    content.push_str("# edited by hand\n");
    fs::write(&path, content).unwrap();

    assert!(matches!(
        check(&baseline(), &layout),
        Err(WacError::DriftDetected { .. })
    ));
}

#[test]
fn test_missing_artifact() {
    let dir = TempDir::new().unwrap();
    let layout = Layout::new(dir.path().join("does-not-exist"));

    let err = check(&baseline(), &layout).unwrap_err();
    assert!(matches!(err, WacError::MissingArtifact { .. }));
    assert!(err.is_out_of_sync());
}

// ═══════════════════════════════════════════════════════════════
// Invariant enforcement
// ═══════════════════════════════════════════════════════════════

#[test]
fn test_step_with_both_uses_and_run_rejected() {
    let config = StepConfig {
        run: Some(vec!["echo hi".into()]),
        ..StepConfig::uses("actions/checkout@v4")
    };

    assert!(matches!(
        Step::try_from(config.clone()),
        Err(WacError::MalformedWorkflow { .. })
    ));
    assert!(matches!(
        Job::new("Test", "ubuntu-latest").add_step(config),
        Err(WacError::MalformedWorkflow { .. })
    ));
}

#[test]
fn test_step_with_neither_rejected() {
    assert!(matches!(
        Job::new("Test", "ubuntu-latest").add_step(StepConfig::default()),
        Err(WacError::MalformedWorkflow { .. })
    ));
}

#[test]
fn test_malformed_workflow_is_not_written() {
    let dir = TempDir::new().unwrap();
    let layout = Layout::new(dir.path());
    let empty = Workflow::new("ci", "CI").unwrap().on(Trigger::push());

    assert!(matches!(
        generate(&empty, &layout),
        Err(WacError::MalformedWorkflow { .. })
    ));
    assert!(!dir.path().join("ci.yml").exists());
}
