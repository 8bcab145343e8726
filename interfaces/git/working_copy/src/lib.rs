//! Local working copy driven through the `git` executable.

use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum GitError {
    #[error("NotARepository: {path}")]
    NotARepository { path: PathBuf },

    #[error("Spawn git {command}: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("git {command} failed ({status}): {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },
}

/// Handle on a checked-out repository.
#[derive(Debug, Clone)]
pub struct GitWorkingCopy {
    root: PathBuf,
}

impl GitWorkingCopy {
    /// Opens an existing checkout. The directory must contain `.git`.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, GitError> {
        let root = root.as_ref().to_path_buf();
        if !root.join(".git").exists() {
            return Err(GitError::NotARepository { path: root });
        }
        Ok(Self { root })
    }

    /// Opens `root` when it already exists, otherwise clones `url` into it.
    pub fn open_or_clone(root: impl AsRef<Path>, url: &str) -> Result<Self, GitError> {
        let root = root.as_ref();
        if root.is_dir() {
            debug!(path = %root.display(), "opening existing working copy");
            return Self::open(root);
        }

        info!(url, path = %root.display(), "cloning working copy");
        let target = root.to_string_lossy().into_owned();
        run(None, &["clone", url, target.as_str()])?;
        Self::open(root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// True when `file` has staged, unstaged or untracked changes.
    pub fn is_dirty(&self, file: &str) -> Result<bool, GitError> {
        let status = run(Some(&self.root), &["status", "--porcelain", "--", file])?;
        Ok(!status.trim().is_empty())
    }

    pub fn stage(&self, file: &str) -> Result<(), GitError> {
        run(Some(&self.root), &["add", "--", file]).map(drop)
    }

    pub fn commit(&self, message: &str) -> Result<(), GitError> {
        run(Some(&self.root), &["commit", "-m", message]).map(drop)
    }

    pub fn push(&self, remote: &str, branch: &str) -> Result<(), GitError> {
        run(Some(&self.root), &["push", remote, branch]).map(drop)
    }

    /// True when HEAD has commits missing from `refs/remotes/<remote>/<branch>`.
    /// Without a remote-tracking ref, any existing commit counts as unpushed.
    pub fn has_unpushed_commits(&self, remote: &str, branch: &str) -> Result<bool, GitError> {
        let upstream = format!("refs/remotes/{remote}/{branch}");
        if !self.ref_exists(&upstream)? {
            return self.ref_exists("HEAD");
        }

        let range = format!("{upstream}..HEAD");
        let count = run(Some(&self.root), &["rev-list", "--count", range.as_str()])?;
        Ok(count.trim() != "0")
    }

    fn ref_exists(&self, name: &str) -> Result<bool, GitError> {
        match run(Some(&self.root), &["rev-parse", "--verify", "--quiet", name]) {
            Ok(_) => Ok(true),
            Err(GitError::CommandFailed { .. }) => Ok(false),
            Err(err) => Err(err),
        }
    }
}

fn run(dir: Option<&Path>, args: &[&str]) -> Result<String, GitError> {
    let command = args.join(" ");

    let mut git = Command::new("git");
    git.args(args);
    if let Some(dir) = dir {
        git.current_dir(dir);
    }

    let output = git.output().map_err(|source| GitError::Spawn {
        command: command.clone(),
        source,
    })?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    } else {
        Err(GitError::CommandFailed {
            command,
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}
