//! This repository's own CI workflows
//!
//! `wac generate` writes these to `.github/workflows/`; the `Validate` job
//! of `ci` runs `wac check` so a definition change without a regenerated
//! file fails CI.

use crate::error::Result;
use crate::job::Job;
use crate::registry::Registry;
use crate::step::StepConfig;
use crate::trigger::Trigger;
use crate::workflow::Workflow;

const MACHINE: &str = "ubuntu-latest";

fn checkout() -> StepConfig {
    StepConfig::uses("actions/checkout@v4").name("Checkout")
}

fn setup_rust() -> StepConfig {
    StepConfig::uses("actions-rs/toolchain@v1")
        .name("Setup Rust")
        .with("profile", "minimal")
        .with("toolchain", "stable")
        .with("override", true)
}

fn rustfmt() -> StepConfig {
    StepConfig::run("cargo fmt --all -- --check").name("Run rustfmt")
}

fn run_tests() -> StepConfig {
    StepConfig::run("cargo test --workspace").name("Run tests")
}

/// Push and pull request on `main`
fn on_main(workflow: Workflow) -> Workflow {
    workflow
        .on(Trigger::push().branches(["main"]))
        .on(Trigger::pull_request().branches(["main"]))
}

pub fn ci() -> Result<Workflow> {
    let test = Job::new("Test", MACHINE).add_steps([
        checkout(),
        rustfmt(),
        StepConfig::run("cargo clippy --all -- -D warnings").name("Run clippy"),
        run_tests(),
    ])?;

    let wasm = Job::new("WASM", MACHINE).add_steps([
        checkout(),
        StepConfig::run("rustup target add wasm32-unknown-unknown"),
        StepConfig::run("cargo build --target wasm32-unknown-unknown --workspace"),
    ])?;

    let validate = Job::new("Validate", MACHINE).add_steps([
        checkout(),
        StepConfig::run_lines(["cargo build --locked --bin wac", "cargo run --locked --bin wac -- check"])
            .name("Validate workflows")
            .shell("bash"),
    ])?;

    on_main(Workflow::new("ci", "CI")?).add_jobs([test, wasm, validate])
}

pub fn rust_lint() -> Result<Workflow> {
    let lint = Job::new("Lint", MACHINE).add_steps([
        checkout(),
        setup_rust().with("components", "rustfmt, clippy"),
        rustfmt(),
        StepConfig::run("cargo clippy --all-targets --all-features -- -D warnings")
            .name("Run clippy"),
    ])?;

    on_main(Workflow::new("rust-lint", "Rust Lint")?).add_job(lint)
}

pub fn rust_test() -> Result<Workflow> {
    let test = Job::new("Test", MACHINE).add_steps([checkout(), setup_rust(), run_tests()])?;

    on_main(Workflow::new("rust-test", "Rust Test")?).add_job(test)
}

/// Every workflow this repository renders, in output order
pub fn registry() -> Result<Registry> {
    Registry::new()
        .with(ci()?)?
        .with(rust_lint()?)?
        .with(rust_test()?)
}
