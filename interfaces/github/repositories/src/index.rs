use reqwest::{header, Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::link::next_page_url;
use crate::models::{
    Contributor, Page, PopularPath, PopularReferrer, RepositoryDetails, RepositorySummary,
    TrafficCount,
};

pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

const USER_AGENT: &str = "profile-stats";
const ACCEPT: &str = "application/vnd.github.v3+json";

/// Raw response kept around long enough to decode or report it.
pub struct GitHubRestResult {
    pub status: StatusCode,
    pub next_page: Option<String>,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum GitHubRequestError {
    #[error("RequestSend {url}: {source}")]
    RequestSend {
        url: String,
        source: reqwest::Error,
    },

    #[error("ResponseRead {url}: {source}")]
    ResponseRead {
        url: String,
        source: reqwest::Error,
    },

    #[error("UnexpectedStatus {url}: {status}, {body}")]
    UnexpectedStatus {
        url: String,
        status: StatusCode,
        body: String,
    },

    #[error("DeserializeResponseBody {url}: {source}")]
    DeserializeResponseBody {
        url: String,
        body: String,
        source: serde_json::Error,
    },
}

/// Authenticated client bound to one API base URL.
#[derive(Clone)]
pub struct GitHubClient {
    http: Client,
    base_url: String,
    token: String,
}

impl GitHubClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    pub fn repositories_url(&self, owner: &str) -> String {
        format!("{}/users/{owner}/repos?per_page=100", self.base_url)
    }

    pub fn contributors_url(&self, owner: &str, name: &str) -> String {
        format!("{}/repos/{owner}/{name}/contributors?per_page=100", self.base_url)
    }

    fn repo_url(&self, owner: &str, name: &str, suffix: &str) -> String {
        format!("{}/repos/{owner}/{name}{suffix}", self.base_url)
    }

    /// Issues one GET. Non-success statuses are returned, not raised.
    pub async fn get(&self, url: &str) -> Result<GitHubRestResult, GitHubRequestError> {
        debug!(url, "GET");

        let response = self
            .http
            .get(url)
            .header(header::AUTHORIZATION, format!("token {}", self.token))
            .header(header::ACCEPT, ACCEPT)
            .header(header::USER_AGENT, USER_AGENT)
            .send()
            .await
            .map_err(|source| GitHubRequestError::RequestSend {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        let next_page = response
            .headers()
            .get(header::LINK)
            .and_then(|value| value.to_str().ok())
            .and_then(next_page_url);

        let body = response
            .text()
            .await
            .map_err(|source| GitHubRequestError::ResponseRead {
                url: url.to_string(),
                source,
            })?;

        Ok(GitHubRestResult {
            status,
            next_page,
            body,
        })
    }

    async fn get_success(&self, url: &str) -> Result<GitHubRestResult, GitHubRequestError> {
        let result = self.get(url).await?;
        if !result.status.is_success() {
            return Err(GitHubRequestError::UnexpectedStatus {
                url: url.to_string(),
                status: result.status,
                body: result.body,
            });
        }
        Ok(result)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, GitHubRequestError> {
        let result = self.get_success(url).await?;
        decode(url, result.body)
    }

    async fn get_page<T: DeserializeOwned>(&self, url: &str) -> Result<Page<T>, GitHubRequestError> {
        let result = self.get_success(url).await?;
        if result.status == StatusCode::NO_CONTENT {
            return Ok(Page {
                items: Vec::new(),
                next: None,
            });
        }
        let items = decode(url, result.body)?;
        Ok(Page {
            items,
            next: result.next_page,
        })
    }

    pub async fn list_repositories_page(
        &self,
        url: &str,
    ) -> Result<Page<RepositorySummary>, GitHubRequestError> {
        self.get_page(url).await
    }

    pub async fn fetch_repository(
        &self,
        owner: &str,
        name: &str,
    ) -> Result<RepositoryDetails, GitHubRequestError> {
        self.get_json(&self.repo_url(owner, name, "")).await
    }

    pub async fn fetch_clones(
        &self,
        owner: &str,
        name: &str,
    ) -> Result<TrafficCount, GitHubRequestError> {
        self.get_json(&self.repo_url(owner, name, "/traffic/clones")).await
    }

    pub async fn fetch_views(
        &self,
        owner: &str,
        name: &str,
    ) -> Result<TrafficCount, GitHubRequestError> {
        self.get_json(&self.repo_url(owner, name, "/traffic/views")).await
    }

    pub async fn fetch_popular_paths(
        &self,
        owner: &str,
        name: &str,
    ) -> Result<Vec<PopularPath>, GitHubRequestError> {
        self.get_json(&self.repo_url(owner, name, "/traffic/popular/paths"))
            .await
    }

    pub async fn fetch_popular_referrers(
        &self,
        owner: &str,
        name: &str,
    ) -> Result<Vec<PopularReferrer>, GitHubRequestError> {
        self.get_json(&self.repo_url(owner, name, "/traffic/popular/referrers"))
            .await
    }

    /// Empty repositories answer `204 No Content`, which yields an empty page.
    pub async fn fetch_contributors_page(
        &self,
        url: &str,
    ) -> Result<Page<Contributor>, GitHubRequestError> {
        self.get_page(url).await
    }
}

fn decode<T: DeserializeOwned>(url: &str, body: String) -> Result<T, GitHubRequestError> {
    serde_json::from_str(&body).map_err(|source| GitHubRequestError::DeserializeResponseBody {
        url: url.to_string(),
        body,
        source,
    })
}
