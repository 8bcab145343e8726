use interfaces_github_repositories::GitHubRequestError;
use thiserror::Error;
use tracing::debug;

use crate::hosting::HostingApi;

#[derive(Debug, Error)]
pub enum ListRepositoriesError {
    #[error("ListRepositoriesPage {page}: {source}")]
    Page {
        page: usize,
        source: GitHubRequestError,
    },
}

/// Names of the non-fork repositories owned by `owner`, in listing order.
///
/// Follows `rel="next"` links until none is left. Any failing page fails the
/// whole listing.
pub async fn list_repositories<A: HostingApi + ?Sized>(
    api: &A,
    owner: &str,
) -> Result<Vec<String>, ListRepositoriesError> {
    let mut names = Vec::new();
    let mut next = Some(api.repositories_url(owner));
    let mut page = 0;

    while let Some(url) = next {
        page += 1;
        let listing = api
            .repositories_page(&url)
            .await
            .map_err(|source| ListRepositoriesError::Page { page, source })?;

        debug!(page, repositories = listing.items.len(), "fetched repository page");

        names.extend(
            listing
                .items
                .into_iter()
                .filter(|repo| !repo.fork)
                .map(|repo| repo.name),
        );
        next = listing.next;
    }

    Ok(names)
}
