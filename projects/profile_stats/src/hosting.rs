//! Seam between the core pipeline and the hosting API.

use async_trait::async_trait;
use interfaces_github_repositories::{
    Contributor, GitHubClient, GitHubRequestError, Page, PopularPath, PopularReferrer,
    RepositoryDetails, RepositorySummary, TrafficCount,
};

/// Read-only view of the hosting API needed for one cycle.
///
/// Paginated endpoints are exposed page by page so that the caller decides
/// how to follow continuation URLs.
#[async_trait]
pub trait HostingApi: Send + Sync {
    fn repositories_url(&self, owner: &str) -> String;
    fn contributors_url(&self, owner: &str, name: &str) -> String;

    async fn repositories_page(
        &self,
        url: &str,
    ) -> Result<Page<RepositorySummary>, GitHubRequestError>;
    async fn repository(
        &self,
        owner: &str,
        name: &str,
    ) -> Result<RepositoryDetails, GitHubRequestError>;
    async fn clones(&self, owner: &str, name: &str) -> Result<TrafficCount, GitHubRequestError>;
    async fn views(&self, owner: &str, name: &str) -> Result<TrafficCount, GitHubRequestError>;
    async fn popular_paths(
        &self,
        owner: &str,
        name: &str,
    ) -> Result<Vec<PopularPath>, GitHubRequestError>;
    async fn popular_referrers(
        &self,
        owner: &str,
        name: &str,
    ) -> Result<Vec<PopularReferrer>, GitHubRequestError>;
    async fn contributors_page(&self, url: &str) -> Result<Page<Contributor>, GitHubRequestError>;
}

#[async_trait]
impl HostingApi for GitHubClient {
    fn repositories_url(&self, owner: &str) -> String {
        GitHubClient::repositories_url(self, owner)
    }

    fn contributors_url(&self, owner: &str, name: &str) -> String {
        GitHubClient::contributors_url(self, owner, name)
    }

    async fn repositories_page(
        &self,
        url: &str,
    ) -> Result<Page<RepositorySummary>, GitHubRequestError> {
        self.list_repositories_page(url).await
    }

    async fn repository(
        &self,
        owner: &str,
        name: &str,
    ) -> Result<RepositoryDetails, GitHubRequestError> {
        self.fetch_repository(owner, name).await
    }

    async fn clones(&self, owner: &str, name: &str) -> Result<TrafficCount, GitHubRequestError> {
        self.fetch_clones(owner, name).await
    }

    async fn views(&self, owner: &str, name: &str) -> Result<TrafficCount, GitHubRequestError> {
        self.fetch_views(owner, name).await
    }

    async fn popular_paths(
        &self,
        owner: &str,
        name: &str,
    ) -> Result<Vec<PopularPath>, GitHubRequestError> {
        self.fetch_popular_paths(owner, name).await
    }

    async fn popular_referrers(
        &self,
        owner: &str,
        name: &str,
    ) -> Result<Vec<PopularReferrer>, GitHubRequestError> {
        self.fetch_popular_referrers(owner, name).await
    }

    async fn contributors_page(&self, url: &str) -> Result<Page<Contributor>, GitHubRequestError> {
        self.fetch_contributors_page(url).await
    }
}
