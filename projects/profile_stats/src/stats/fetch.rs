use std::fmt::Display;

use interfaces_github_repositories::GitHubRequestError;
use thiserror::Error;
use tracing::warn;

use crate::hosting::HostingApi;
use crate::stats::models::{ReferralPath, RepositorySnapshot};
use crate::utils::aggregation::Tally;

#[derive(Debug, Error)]
pub enum FetchSnapshotError {
    #[error("FetchRepository {name}: {source}")]
    Metadata {
        name: String,
        source: GitHubRequestError,
    },
}

/// Traffic data is best effort: a failing field is logged and left empty.
fn or_empty<T: Default, E: Display>(repository: &str, field: &str, result: Result<T, E>) -> T {
    result.unwrap_or_else(|err| {
        warn!(repository, field, error = %err, "traffic data unavailable, using empty value");
        T::default()
    })
}

/// Collects one repository's metrics.
///
/// Only the metadata lookup is fatal for the repository; every traffic
/// endpoint degrades to an empty value on its own.
pub async fn fetch_snapshot<A: HostingApi + ?Sized>(
    api: &A,
    owner: &str,
    name: &str,
) -> Result<RepositorySnapshot, FetchSnapshotError> {
    let details = api
        .repository(owner, name)
        .await
        .map_err(|source| FetchSnapshotError::Metadata {
            name: name.to_string(),
            source,
        })?;

    let clones = or_empty(name, "clones", api.clones(owner, name).await);
    let paths = or_empty(name, "referral_paths", api.popular_paths(owner, name).await);
    let referrers = or_empty(
        name,
        "referral_sources",
        api.popular_referrers(owner, name).await,
    );
    let views = or_empty(name, "page_views", api.views(owner, name).await);
    let contributors = or_empty(name, "contributors", fetch_contributors(api, owner, name).await);

    Ok(RepositorySnapshot {
        name: name.to_string(),
        star_count: details.stargazers_count,
        fork_count: details.forks_count,
        clone_count: clones.count,
        page_view_count: views.count,
        referral_paths: paths
            .into_iter()
            .map(|p| ReferralPath {
                path: p.path,
                title: p.title,
                count: p.count,
            })
            .collect(),
        referral_sources: referrers
            .into_iter()
            .map(|r| (r.referrer, r.count))
            .collect(),
        contributors,
    })
}

/// All contributor pages folded by login.
async fn fetch_contributors<A: HostingApi + ?Sized>(
    api: &A,
    owner: &str,
    name: &str,
) -> Result<Tally, GitHubRequestError> {
    let mut contributors = Tally::default();
    let mut next = Some(api.contributors_url(owner, name));

    while let Some(url) = next {
        let page = api.contributors_page(&url).await?;
        for contributor in page.items {
            contributors.add(&contributor.login, contributor.contributions);
        }
        next = page.next;
    }

    Ok(contributors)
}
