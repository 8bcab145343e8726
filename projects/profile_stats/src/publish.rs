use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use interfaces_git_working_copy::{GitError, GitWorkingCopy};
use thiserror::Error;
use tracing::info;

use crate::config::Config;

/// Version-control operations the publisher needs from a checkout.
pub trait WorkingCopy {
    fn root(&self) -> &Path;
    fn is_dirty(&self, file: &str) -> Result<bool, GitError>;
    fn stage(&self, file: &str) -> Result<(), GitError>;
    fn commit(&self, message: &str) -> Result<(), GitError>;
    fn push(&self, remote: &str, branch: &str) -> Result<(), GitError>;
    /// True when the local branch holds commits the remote branch lacks.
    fn has_unpushed_commits(&self, remote: &str, branch: &str) -> Result<bool, GitError>;
}

impl WorkingCopy for GitWorkingCopy {
    fn root(&self) -> &Path {
        GitWorkingCopy::root(self)
    }

    fn is_dirty(&self, file: &str) -> Result<bool, GitError> {
        GitWorkingCopy::is_dirty(self, file)
    }

    fn stage(&self, file: &str) -> Result<(), GitError> {
        GitWorkingCopy::stage(self, file)
    }

    fn commit(&self, message: &str) -> Result<(), GitError> {
        GitWorkingCopy::commit(self, message)
    }

    fn push(&self, remote: &str, branch: &str) -> Result<(), GitError> {
        GitWorkingCopy::push(self, remote, branch)
    }

    fn has_unpushed_commits(&self, remote: &str, branch: &str) -> Result<bool, GitError> {
        GitWorkingCopy::has_unpushed_commits(self, remote, branch)
    }
}

/// Where and how the rendered document is published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishTarget {
    pub file: String,
    pub message: String,
    pub remote: String,
    pub branch: String,
}

impl PublishTarget {
    pub fn from_config(config: &Config) -> Self {
        Self {
            file: config.readme_file.clone(),
            message: config.commit_message.clone(),
            remote: config.remote_name.clone(),
            branch: config.branch_name.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    Published,
    Unchanged,
}

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("ReadPublishedDocument {path}: {source}")]
    ReadCurrent {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("WriteDocument {path}: {source}")]
    WriteDocument {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Status: {source}")]
    Status { source: GitError },

    #[error("Stage: {source}")]
    Stage { source: GitError },

    #[error("Commit: {source}")]
    Commit { source: GitError },

    #[error("Push: {source}")]
    Push { source: GitError },
}

/// Writes `document` into the checkout and commits and pushes it when it changed.
///
/// The file is only rewritten when its bytes differ. The commit decision is
/// taken from the working copy, so a document left uncommitted by an earlier
/// failed run is committed now even if this run rendered the same text, and a
/// commit whose push failed earlier is pushed again.
pub fn publish<W: WorkingCopy + ?Sized>(
    copy: &W,
    document: &str,
    target: &PublishTarget,
) -> Result<PublishOutcome, PublishError> {
    let path = copy.root().join(&target.file);

    let current = match std::fs::read(&path) {
        Ok(current) => Some(current),
        Err(err) if err.kind() == ErrorKind::NotFound => None,
        Err(source) => return Err(PublishError::ReadCurrent { path, source }),
    };

    if current.as_deref() != Some(document.as_bytes()) {
        std::fs::write(&path, document)
            .map_err(|source| PublishError::WriteDocument { path: path.clone(), source })?;
    }

    let dirty = copy
        .is_dirty(&target.file)
        .map_err(|source| PublishError::Status { source })?;
    if dirty {
        copy.stage(&target.file)
            .map_err(|source| PublishError::Stage { source })?;
        copy.commit(&target.message)
            .map_err(|source| PublishError::Commit { source })?;
    } else {
        let unpushed = copy
            .has_unpushed_commits(&target.remote, &target.branch)
            .map_err(|source| PublishError::Status { source })?;
        if !unpushed {
            info!(file = %target.file, "no changes to commit");
            return Ok(PublishOutcome::Unchanged);
        }
        info!(branch = %target.branch, "document unchanged, pushing earlier commit");
    }

    copy.push(&target.remote, &target.branch)
        .map_err(|source| PublishError::Push { source })?;

    info!(
        file = %target.file,
        remote = %target.remote,
        branch = %target.branch,
        "pushed updated document"
    );
    Ok(PublishOutcome::Published)
}
