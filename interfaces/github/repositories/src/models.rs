use serde::Deserialize;

/// Entry of `GET /users/{owner}/repos`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepositorySummary {
    pub name: String,
    #[serde(default)]
    pub fork: bool,
}

/// Subset of `GET /repos/{owner}/{name}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepositoryDetails {
    pub name: String,
    pub stargazers_count: u64,
    #[serde(alias = "forks")]
    pub forks_count: u64,
}

/// Body of `/traffic/clones` and `/traffic/views`. The per-day breakdown is ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct TrafficCount {
    pub count: u64,
    #[serde(default)]
    pub uniques: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PopularPath {
    pub path: String,
    pub title: String,
    pub count: u64,
    #[serde(default)]
    pub uniques: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PopularReferrer {
    pub referrer: String,
    pub count: u64,
    #[serde(default)]
    pub uniques: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Contributor {
    pub login: String,
    pub contributions: u64,
}

/// One page of a paginated listing plus the URL of the following page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Option<String>,
}
