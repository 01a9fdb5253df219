//! Generate and check: keeping committed workflow files in sync
//!
//! `generate` renders a workflow and atomically replaces its file.
//! `check` renders to memory, reads the committed file and compares bytes.
//! Both run per workflow; [`run`] applies one of them to a set of workflows
//! and collects every outcome instead of stopping at the first failure.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::config::Layout;
use crate::error::{Result, WacError};
use crate::render::render;
use crate::report::{Outcome, Report};
use crate::workflow::Workflow;

/// Which way to sync
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Generate,
    Check,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Generate => "generate",
            Mode::Check => "check",
        }
    }
}

/// Render `workflow` and write it to its path, replacing any existing file
///
/// The text goes to a temporary file next to the destination which is then
/// renamed over it, so a failure never leaves a partial file behind.
pub fn generate(workflow: &Workflow, layout: &Layout) -> Result<PathBuf> {
    let content = render(workflow)?;
    let path = layout.path_for(workflow);
    write_atomic(&path, content.as_bytes())?;

    info!(workflow = workflow.slug(), path = %path.display(), "workflow generated");
    Ok(path)
}

/// Render `workflow` and compare it with the committed file
///
/// Never writes. Fails with `MissingArtifact` if the file does not exist
/// and `DriftDetected` if its bytes differ from the render.
pub fn check(workflow: &Workflow, layout: &Layout) -> Result<PathBuf> {
    let expected = render(workflow)?;
    let path = layout.path_for(workflow);

    let actual = match fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!(workflow = workflow.slug(), path = %path.display(), "workflow file missing");
            return Err(WacError::MissingArtifact {
                workflow: workflow.slug().to_string(),
                path,
            });
        }
        Err(e) => return Err(WacError::io_at(path, e)),
    };

    if let Some(line) = first_difference(expected.as_bytes(), &actual) {
        warn!(workflow = workflow.slug(), path = %path.display(), line, "workflow drift detected");
        return Err(WacError::DriftDetected {
            workflow: workflow.slug().to_string(),
            path,
            line,
        });
    }

    debug!(workflow = workflow.slug(), path = %path.display(), "workflow in sync");
    Ok(path)
}

/// Apply `mode` to every workflow, collecting all outcomes
pub fn run<'a, I>(mode: Mode, workflows: I, layout: &Layout) -> Report
where
    I: IntoIterator<Item = &'a Workflow>,
{
    let outcomes = workflows
        .into_iter()
        .map(|workflow| {
            let result = match mode {
                Mode::Generate => generate(workflow, layout),
                Mode::Check => check(workflow, layout),
            };
            match result {
                Ok(path) => Outcome::ok(workflow.slug(), path),
                Err(error) => Outcome::failed(workflow.slug(), layout.path_for(workflow), error),
            }
        })
        .collect();

    Report::new(mode, outcomes)
}

/// 1-based line of the first byte where `expected` and `actual` differ
///
/// `None` when they are identical.
pub fn first_difference(expected: &[u8], actual: &[u8]) -> Option<usize> {
    if expected == actual {
        return None;
    }
    let offset = expected
        .iter()
        .zip(actual)
        .take_while(|(a, b)| a == b)
        .count();
    let line = expected[..offset].iter().filter(|&&b| b == b'\n').count() + 1;
    Some(line)
}

fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| WacError::io_at(dir, e))?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| WacError::io_at(dir, e))?;
    tmp.write_all(content)
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| WacError::io_at(tmp.path(), e))?;
    // temp files are created owner-only
    let permissions = artifact_permissions(path, tmp.as_file())
        .map_err(|e| WacError::io_at(tmp.path(), e))?;
    tmp.as_file()
        .set_permissions(permissions)
        .map_err(|e| WacError::io_at(tmp.path(), e))?;
    tmp.persist(path)
        .map_err(|e| WacError::io_at(path, e.error))?;

    debug!(path = %path.display(), bytes = content.len(), "wrote file");
    Ok(())
}

/// Keep the mode of the file being replaced; new files get 0644
fn artifact_permissions(path: &Path, tmp: &fs::File) -> std::io::Result<fs::Permissions> {
    match fs::metadata(path) {
        Ok(meta) => Ok(meta.permissions()),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            let mut permissions = tmp.metadata()?.permissions();
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                permissions.set_mode(0o644);
            }
            Ok(permissions)
        }
        Err(e) => Err(e),
    }
}
