use chrono::{DateTime, Utc};
use interfaces_git_working_copy::GitError;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::Config;
use crate::hosting::HostingApi;
use crate::publish::{publish, PublishError, PublishOutcome, PublishTarget, WorkingCopy};
use crate::stats::fetch::fetch_snapshot;
use crate::stats::list::{list_repositories, ListRepositoriesError};
use crate::utils::aggregation::rank;
use crate::utils::markdown::{load_template, render_document, LoadTemplateError};

#[derive(Debug, Error)]
pub enum RunCycleError {
    #[error("ListRepositories: {source}")]
    ListRepositories {
        #[from]
        source: ListRepositoriesError,
    },

    #[error("LoadTemplate: {source}")]
    LoadTemplate {
        #[from]
        source: LoadTemplateError,
    },

    #[error("OpenWorkingCopy: {source}")]
    OpenWorkingCopy {
        #[from]
        source: GitError,
    },

    #[error("Publish: {source}")]
    Publish {
        #[from]
        source: PublishError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub listed: usize,
    /// Repositories left out because their metadata lookup failed
    pub dropped: Vec<String>,
    pub outcome: PublishOutcome,
}

/// Runs list, fetch, rank, render and publish once.
///
/// Repositories are fetched one after another in listing order.
/// `open_working_copy` is only called once there is a document to publish.
pub async fn run_cycle<A, W, F>(
    config: &Config,
    api: &A,
    open_working_copy: F,
    generated_at: DateTime<Utc>,
) -> Result<CycleReport, RunCycleError>
where
    A: HostingApi + ?Sized,
    W: WorkingCopy,
    F: FnOnce(&Config) -> Result<W, GitError>,
{
    let owner = config.username.as_str();

    info!(owner, "fetching list of repositories");
    let names = list_repositories(api, owner).await?;
    info!(count = names.len(), "fetched repositories");

    let mut snapshots = Vec::with_capacity(names.len());
    let mut dropped = Vec::new();
    for name in &names {
        match fetch_snapshot(api, owner, name).await {
            Ok(snapshot) => snapshots.push(snapshot),
            Err(err) => {
                warn!(repository = %name, error = %err, "dropping repository from this cycle");
                dropped.push(name.clone());
            }
        }
    }
    info!(fetched = snapshots.len(), dropped = dropped.len(), "finished fetching repository information");

    let views = rank(&snapshots);

    let template = load_template(&config.template_path)?;
    let document = render_document(&template, &views, owner, generated_at);

    info!(path = %config.local_repo_path.display(), "opening working copy");
    let copy = open_working_copy(config)?;
    let outcome = publish(&copy, &document, &PublishTarget::from_config(config))?;

    Ok(CycleReport {
        listed: names.len(),
        dropped,
        outcome,
    })
}
