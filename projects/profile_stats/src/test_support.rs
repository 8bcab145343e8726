//! In-memory stand-ins for the hosting API and the git checkout.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

use async_trait::async_trait;
use interfaces_git_working_copy::GitError;
use interfaces_github_repositories::{
    Contributor, GitHubRequestError, Page, PopularPath, PopularReferrer, RepositoryDetails,
    RepositorySummary, TrafficCount,
};
use reqwest::StatusCode;

use crate::hosting::HostingApi;
use crate::publish::WorkingCopy;

fn not_found(url: &str) -> GitHubRequestError {
    GitHubRequestError::UnexpectedStatus {
        url: url.to_string(),
        status: StatusCode::NOT_FOUND,
        body: r#"{"message":"Not Found"}"#.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct RepoFixture {
    name: String,
    stars: u64,
    forks: u64,
    clones: u64,
    views: u64,
    paths: Vec<PopularPath>,
    referrers: Vec<PopularReferrer>,
    contributor_pages: Vec<Vec<Contributor>>,
    metadata_fails: bool,
    traffic_fails: bool,
}

impl RepoFixture {
    pub fn new(name: &str, stars: u64, forks: u64) -> Self {
        Self {
            name: name.to_string(),
            stars,
            forks,
            clones: 0,
            views: 0,
            paths: Vec::new(),
            referrers: Vec::new(),
            contributor_pages: vec![Vec::new()],
            metadata_fails: false,
            traffic_fails: false,
        }
    }

    pub fn clones(mut self, count: u64) -> Self {
        self.clones = count;
        self
    }

    pub fn views(mut self, count: u64) -> Self {
        self.views = count;
        self
    }

    pub fn path(mut self, path: &str, title: &str, count: u64) -> Self {
        self.paths.push(PopularPath {
            path: path.to_string(),
            title: title.to_string(),
            count,
            uniques: count,
        });
        self
    }

    pub fn referrer(mut self, referrer: &str, count: u64) -> Self {
        self.referrers.push(PopularReferrer {
            referrer: referrer.to_string(),
            count,
            uniques: count,
        });
        self
    }

    pub fn contributor(mut self, login: &str, contributions: u64) -> Self {
        if let Some(page) = self.contributor_pages.last_mut() {
            page.push(Contributor {
                login: login.to_string(),
                contributions,
            });
        }
        self
    }

    /// Following contributors land on a new page.
    pub fn contributor_page_break(mut self) -> Self {
        self.contributor_pages.push(Vec::new());
        self
    }

    pub fn failing_metadata(mut self) -> Self {
        self.metadata_fails = true;
        self
    }

    /// Every traffic endpoint and the contributor listing fail.
    pub fn failing_traffic(mut self) -> Self {
        self.traffic_fails = true;
        self
    }
}

/// Pages are addressed as `fake://...?page=N`, starting at 1.
#[derive(Debug, Default)]
pub struct FakeHostingApi {
    owner: String,
    listing: Vec<Option<Vec<RepositorySummary>>>,
    repos: HashMap<String, RepoFixture>,
}

fn page_number(url: &str) -> usize {
    url.rsplit_once("?page=")
        .and_then(|(_, n)| n.parse().ok())
        .unwrap_or(1)
}

fn page_url(base: &str, page: usize) -> String {
    if page == 1 {
        base.to_string()
    } else {
        format!("{base}?page={page}")
    }
}

impl FakeHostingApi {
    pub fn new(owner: &str) -> Self {
        Self {
            owner: owner.to_string(),
            ..Self::default()
        }
    }

    pub fn with_listing_page(mut self, repos: &[(&str, bool)]) -> Self {
        self.listing.push(Some(
            repos
                .iter()
                .map(|(name, fork)| RepositorySummary {
                    name: name.to_string(),
                    fork: *fork,
                })
                .collect(),
        ));
        self
    }

    pub fn with_failing_listing_page(mut self) -> Self {
        self.listing.push(None);
        self
    }

    pub fn with_repo(mut self, repo: RepoFixture) -> Self {
        self.repos.insert(repo.name.clone(), repo);
        self
    }

    fn fixture(&self, owner: &str, name: &str, url: &str) -> Result<&RepoFixture, GitHubRequestError> {
        if owner != self.owner {
            return Err(not_found(url));
        }
        self.repos.get(name).ok_or_else(|| not_found(url))
    }

    fn traffic(&self, owner: &str, name: &str, endpoint: &str) -> Result<&RepoFixture, GitHubRequestError> {
        let url = format!("fake://repos/{owner}/{name}/traffic/{endpoint}");
        let repo = self.fixture(owner, name, &url)?;
        if repo.traffic_fails {
            return Err(not_found(&url));
        }
        Ok(repo)
    }
}

#[async_trait]
impl HostingApi for FakeHostingApi {
    fn repositories_url(&self, owner: &str) -> String {
        format!("fake://users/{owner}/repos")
    }

    fn contributors_url(&self, owner: &str, name: &str) -> String {
        format!("fake://repos/{owner}/{name}/contributors")
    }

    async fn repositories_page(
        &self,
        url: &str,
    ) -> Result<Page<RepositorySummary>, GitHubRequestError> {
        let page = page_number(url);
        let items = self
            .listing
            .get(page - 1)
            .cloned()
            .flatten()
            .ok_or_else(|| not_found(url))?;
        let next = (page < self.listing.len())
            .then(|| page_url(&self.repositories_url(&self.owner), page + 1));
        Ok(Page { items, next })
    }

    async fn repository(
        &self,
        owner: &str,
        name: &str,
    ) -> Result<RepositoryDetails, GitHubRequestError> {
        let url = format!("fake://repos/{owner}/{name}");
        let repo = self.fixture(owner, name, &url)?;
        if repo.metadata_fails {
            return Err(not_found(&url));
        }
        Ok(RepositoryDetails {
            name: repo.name.clone(),
            stargazers_count: repo.stars,
            forks_count: repo.forks,
        })
    }

    async fn clones(&self, owner: &str, name: &str) -> Result<TrafficCount, GitHubRequestError> {
        let repo = self.traffic(owner, name, "clones")?;
        Ok(TrafficCount {
            count: repo.clones,
            uniques: repo.clones,
        })
    }

    async fn views(&self, owner: &str, name: &str) -> Result<TrafficCount, GitHubRequestError> {
        let repo = self.traffic(owner, name, "views")?;
        Ok(TrafficCount {
            count: repo.views,
            uniques: repo.views,
        })
    }

    async fn popular_paths(
        &self,
        owner: &str,
        name: &str,
    ) -> Result<Vec<PopularPath>, GitHubRequestError> {
        Ok(self.traffic(owner, name, "popular/paths")?.paths.clone())
    }

    async fn popular_referrers(
        &self,
        owner: &str,
        name: &str,
    ) -> Result<Vec<PopularReferrer>, GitHubRequestError> {
        Ok(self.traffic(owner, name, "popular/referrers")?.referrers.clone())
    }

    async fn contributors_page(&self, url: &str) -> Result<Page<Contributor>, GitHubRequestError> {
        let base = url.split('?').next().unwrap_or(url);
        let name = base
            .strip_suffix("/contributors")
            .and_then(|rest| rest.rsplit('/').next())
            .ok_or_else(|| not_found(url))?;
        let repo = self.traffic(&self.owner, name, "contributors")?;

        let page = page_number(url);
        let items = repo
            .contributor_pages
            .get(page - 1)
            .cloned()
            .ok_or_else(|| not_found(url))?;
        let next = (page < repo.contributor_pages.len()).then(|| page_url(base, page + 1));
        Ok(Page { items, next })
    }
}

#[derive(Debug, Default)]
struct CopyState {
    committed: HashMap<String, String>,
    staged: Vec<String>,
    commits: Vec<String>,
    pushes: Vec<(String, String)>,
    unpushed: bool,
    fail_push: bool,
}

/// Checkout backed by a temporary directory. A file is dirty when its
/// content differs from what the last fake commit recorded. Commits stay
/// unpushed until a push succeeds.
#[derive(Clone)]
pub struct FakeWorkingCopy {
    dir: Rc<tempfile::TempDir>,
    state: Rc<RefCell<CopyState>>,
}

impl FakeWorkingCopy {
    pub fn empty() -> Self {
        Self {
            dir: Rc::new(tempfile::tempdir().unwrap()),
            state: Rc::default(),
        }
    }

    pub fn with_committed(file: &str, content: &str) -> Self {
        let copy = Self::empty();
        copy.write(file, content);
        copy.state
            .borrow_mut()
            .committed
            .insert(file.to_string(), content.to_string());
        copy
    }

    pub fn failing_push(self) -> Self {
        self.state.borrow_mut().fail_push = true;
        self
    }

    pub fn allow_push(&self) {
        self.state.borrow_mut().fail_push = false;
    }

    pub fn write(&self, file: &str, content: &str) {
        std::fs::write(self.dir.path().join(file), content).unwrap();
    }

    pub fn read(&self, file: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(file)).unwrap()
    }

    fn on_disk(&self, file: &str) -> Option<String> {
        std::fs::read_to_string(self.dir.path().join(file)).ok()
    }

    pub fn staged(&self) -> Vec<String> {
        self.state.borrow().staged.clone()
    }

    pub fn commits(&self) -> Vec<String> {
        self.state.borrow().commits.clone()
    }

    pub fn pushes(&self) -> Vec<(String, String)> {
        self.state.borrow().pushes.clone()
    }
}

impl WorkingCopy for FakeWorkingCopy {
    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn is_dirty(&self, file: &str) -> Result<bool, GitError> {
        let state = self.state.borrow();
        Ok(self.on_disk(file).as_ref() != state.committed.get(file))
    }

    fn stage(&self, file: &str) -> Result<(), GitError> {
        self.state.borrow_mut().staged.push(file.to_string());
        Ok(())
    }

    fn commit(&self, message: &str) -> Result<(), GitError> {
        let staged = self.staged();
        let snapshot: Vec<(String, Option<String>)> = staged
            .iter()
            .map(|file| (file.clone(), self.on_disk(file)))
            .collect();

        let mut state = self.state.borrow_mut();
        for (file, content) in snapshot {
            if let Some(content) = content {
                state.committed.insert(file, content);
            }
        }
        state.commits.push(message.to_string());
        state.unpushed = true;
        Ok(())
    }

    fn push(&self, remote: &str, branch: &str) -> Result<(), GitError> {
        let mut state = self.state.borrow_mut();
        if state.fail_push {
            return Err(GitError::CommandFailed {
                command: format!("push {remote} {branch}"),
                status: "exit status: 1".to_string(),
                stderr: "remote rejected".to_string(),
            });
        }
        state.pushes.push((remote.to_string(), branch.to_string()));
        state.unpushed = false;
        Ok(())
    }

    fn has_unpushed_commits(&self, _remote: &str, _branch: &str) -> Result<bool, GitError> {
        Ok(self.state.borrow().unpushed)
    }
}
