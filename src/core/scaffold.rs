//! Template deployment into a target project.
//!
//! Walks a [`TemplateSource`] and materializes every entry under the target
//! root, following the rules in [`crate::core::remap`].
//!
//! - **Never clobbers by default**: an existing destination is skipped unless
//!   `overwrite` is set.
//! - **Best effort**: a failing file is recorded and the walk moves on.
//! - **Additive**: directories are created when missing and never removed.
//!
//! Only a broken bundle walk, an uncreatable target root, or two templates
//! installing to the same path abort the whole run.

use crate::core::assets::{EntryKind, TemplateEntry, TemplateSource};
use crate::core::error::FlowkitError;
use crate::core::remap;
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Deployment configuration.
#[derive(Debug, Clone)]
pub struct DeployOptions {
    /// Directory the templates are installed into (created if missing)
    pub target_root: PathBuf,
    /// Replace files that already exist
    pub overwrite: bool,
}

fn serialize_display<S: Serializer>(error: &FlowkitError, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(error)
}

/// Result of installing one template file.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutcomeStatus {
    Created,
    Skipped,
    Failed {
        #[serde(serialize_with = "serialize_display")]
        error: FlowkitError,
    },
}

#[derive(Debug, Serialize)]
pub struct Outcome {
    pub path: PathBuf,
    #[serde(flatten)]
    pub status: OutcomeStatus,
}

impl Outcome {
    pub fn is_created(&self) -> bool {
        matches!(self.status, OutcomeStatus::Created)
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.status, OutcomeStatus::Skipped)
    }

    pub fn error(&self) -> Option<&FlowkitError> {
        match &self.status {
            OutcomeStatus::Failed { error } => Some(error),
            _ => None,
        }
    }
}

/// Per-file outcomes of one deployment, in traversal order.
#[derive(Debug)]
pub struct DeployReport {
    pub target_root: PathBuf,
    pub outcomes: Vec<Outcome>,
}

impl DeployReport {
    fn new(target_root: &Path) -> Self {
        Self {
            target_root: target_root.to_path_buf(),
            outcomes: Vec::new(),
        }
    }

    fn record(&mut self, path: PathBuf, status: OutcomeStatus) {
        match &status {
            OutcomeStatus::Created => debug!(path = %path.display(), "created"),
            OutcomeStatus::Skipped => debug!(path = %path.display(), "skipped, already exists"),
            OutcomeStatus::Failed { error } => {
                warn!(path = %path.display(), %error, "template install failed")
            }
        }
        self.outcomes.push(Outcome { path, status });
    }

    pub fn created(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_created()).count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_skipped()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.error().is_some()).count()
    }

    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(|o| o.error().is_some())
    }

    /// `path` relative to the target root, for display.
    pub fn relative<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.target_root).unwrap_or(path)
    }
}

/// A deployment that stopped before visiting every template.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct DeployAbort {
    pub error: FlowkitError,
    /// Outcomes recorded before the abort
    pub partial: DeployReport,
}

fn ensure_dir(path: &Path) -> Result<(), FlowkitError> {
    fs::create_dir_all(path).map_err(|source| FlowkitError::DirectoryCreate {
        path: path.to_path_buf(),
        source,
    })
}

fn ensure_parent(path: &Path) -> Result<(), FlowkitError> {
    if let Some(p) = path.parent() {
        ensure_dir(p)?;
    }
    Ok(())
}

/// Stage `content` in a temporary file beside `dest`, then move it into
/// place. A failed write leaves nothing at `dest`; without `overwrite` the
/// move refuses to replace an existing file.
fn write_staged<F>(dest: &Path, overwrite: bool, fill: F) -> io::Result<()>
where
    F: FnOnce(&mut NamedTempFile) -> io::Result<()>,
{
    let parent = dest.parent().unwrap_or_else(|| Path::new("."));
    let mut staged = NamedTempFile::new_in(parent)?;
    fill(&mut staged)?;
    staged.as_file().sync_all()?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        staged
            .as_file()
            .set_permissions(fs::Permissions::from_mode(0o644))?;
    }
    let published = if overwrite {
        staged.persist(dest)
    } else {
        staged.persist_noclobber(dest)
    };
    published.map(|_| ()).map_err(|e| e.error)
}

fn write_status(dest: &Path, written: io::Result<()>, overwrite: bool) -> OutcomeStatus {
    match written {
        Ok(()) => OutcomeStatus::Created,
        // Appeared between the existence check and the publish.
        Err(e) if !overwrite && e.kind() == io::ErrorKind::AlreadyExists => OutcomeStatus::Skipped,
        Err(source) => OutcomeStatus::Failed {
            error: FlowkitError::Write {
                path: dest.to_path_buf(),
                source,
            },
        },
    }
}

fn install_file(dest: &Path, content: &[u8], overwrite: bool) -> OutcomeStatus {
    if !overwrite && dest.symlink_metadata().is_ok() {
        return OutcomeStatus::Skipped;
    }
    if let Err(error) = ensure_parent(dest) {
        return OutcomeStatus::Failed { error };
    }

    let written = write_staged(dest, overwrite, |file| file.write_all(content));
    write_status(dest, written, overwrite)
}

/// Remember which template produced each destination. Two directories may
/// share a destination. A file may not share its destination with anything,
/// and nothing may be installed below a file.
fn claim(
    claimed: &mut HashMap<PathBuf, TemplateEntry>,
    dest: &Path,
    entry: &TemplateEntry,
) -> Result<(), FlowkitError> {
    let collision = |destination: &Path, prev: &TemplateEntry| FlowkitError::DestinationCollision {
        destination: destination.to_path_buf(),
        first: prev.path.clone(),
        second: entry.path.clone(),
    };

    if let Some(prev) = claimed.get(dest) {
        if prev.kind == EntryKind::Directory && entry.kind == EntryKind::Directory {
            return Ok(());
        }
        return Err(collision(dest, prev));
    }
    for ancestor in dest.ancestors().skip(1) {
        if let Some(prev) = claimed.get(ancestor)
            && prev.kind == EntryKind::File
        {
            return Err(collision(ancestor, prev));
        }
    }
    if entry.kind == EntryKind::File
        && let Some((_, prev)) = claimed.iter().find(|(path, _)| path.starts_with(dest))
    {
        return Err(collision(dest, prev));
    }
    claimed.insert(dest.to_path_buf(), entry.clone());
    Ok(())
}

/// Install every template from `templates` under `opts.target_root`.
pub fn deploy(
    templates: &dyn TemplateSource,
    opts: &DeployOptions,
) -> Result<DeployReport, DeployAbort> {
    let mut report = DeployReport::new(&opts.target_root);
    let abort = |error: FlowkitError, partial: DeployReport| {
        error!(%error, recorded = partial.outcomes.len(), "deployment aborted");
        DeployAbort { error, partial }
    };

    if let Err(source) = fs::create_dir_all(&opts.target_root) {
        let error = FlowkitError::TargetRootCreate {
            path: opts.target_root.clone(),
            source,
        };
        return Err(abort(error, report));
    }

    let mut claimed = HashMap::new();
    for entry in templates.walk() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => return Err(abort(error, report)),
        };
        let dest = remap::destination(&opts.target_root, &entry);
        if let Err(error) = claim(&mut claimed, &dest, &entry) {
            return Err(abort(error, report));
        }
        debug!(template = %entry.path, dest = %dest.display(), "visiting");

        if entry.is_dir() {
            // Files below retry the parent and record the failure themselves.
            if let Err(error) = ensure_dir(&dest) {
                warn!(template = %entry.path, %error, "could not create directory");
            }
            continue;
        }

        let status = match templates.read(&entry.path) {
            Ok(content) => install_file(&dest, &content, opts.overwrite),
            Err(error) => OutcomeStatus::Failed { error },
        };
        report.record(dest, status);
    }

    info!(
        target_root = %opts.target_root.display(),
        created = report.created(),
        skipped = report.skipped(),
        failed = report.failed(),
        "deployment finished"
    );
    Ok(report)
}
