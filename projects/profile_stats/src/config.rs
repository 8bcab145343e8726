use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use interfaces_github_repositories::DEFAULT_API_BASE_URL;
use serde::Deserialize;
use thiserror::Error;

pub const TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";

/// Static settings read once at startup and handed to every component.
#[derive(Clone, Deserialize)]
pub struct Config {
    #[serde(rename = "GH_TOKEN", default)]
    pub token: String,
    #[serde(rename = "GH_USERNAME")]
    pub username: String,
    #[serde(rename = "LOCAL_REPO_PATH")]
    pub local_repo_path: PathBuf,
    #[serde(rename = "BRANCH_NAME")]
    pub branch_name: String,

    #[serde(rename = "API_BASE_URL", default = "default_api_base_url")]
    pub api_base_url: String,
    /// Defaults to the account's profile repository.
    #[serde(rename = "REPO_URL", default)]
    pub repo_url: Option<String>,
    #[serde(rename = "REMOTE_NAME", default = "default_remote_name")]
    pub remote_name: String,
    #[serde(rename = "TEMPLATE_PATH", default = "default_template_path")]
    pub template_path: PathBuf,
    /// Relative to `local_repo_path`.
    #[serde(rename = "README_FILE", default = "default_readme_file")]
    pub readme_file: String,
    #[serde(rename = "COMMIT_MESSAGE", default = "default_commit_message")]
    pub commit_message: String,
    #[serde(rename = "INTERVAL_SECS", default = "default_interval_secs")]
    pub interval_secs: u64,
    #[serde(rename = "FAILURE_LOG", default)]
    pub failure_log: Option<PathBuf>,
    #[serde(rename = "LOG_LEVEL", default = "default_log_level")]
    pub log_level: String,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_remote_name() -> String {
    "origin".to_string()
}

fn default_template_path() -> PathBuf {
    PathBuf::from("README_template.md")
}

fn default_readme_file() -> String {
    "README.md".to_string()
}

fn default_commit_message() -> String {
    "Update README with latest stats".to_string()
}

fn default_interval_secs() -> u64 {
    24 * 60 * 60
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("ReadConfig {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("ParseConfig: {source}")]
    Parse {
        #[from]
        source: serde_json::Error,
    },

    #[error("MissingValue: {key} must not be empty")]
    MissingValue { key: &'static str },

    #[error("InvalidInterval: INTERVAL_SECS must be greater than zero")]
    InvalidInterval,
}

impl Config {
    /// Reads the JSON file at `path`, applies the `GITHUB_TOKEN` override and validates.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json(&raw, std::env::var(TOKEN_ENV_VAR).ok())
    }

    pub fn from_json(raw: &str, token_override: Option<String>) -> Result<Self, ConfigError> {
        let mut config: Config = serde_json::from_str(raw)?;

        if let Some(token) = token_override.filter(|token| !token.trim().is_empty()) {
            config.token = token;
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("GH_TOKEN", self.token.as_str()),
            ("GH_USERNAME", self.username.as_str()),
            ("BRANCH_NAME", self.branch_name.as_str()),
            ("README_FILE", self.readme_file.as_str()),
        ];
        if let Some((key, _)) = required.into_iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(ConfigError::MissingValue { key });
        }
        if self.local_repo_path.as_os_str().is_empty() {
            return Err(ConfigError::MissingValue {
                key: "LOCAL_REPO_PATH",
            });
        }
        if self.interval_secs == 0 {
            return Err(ConfigError::InvalidInterval);
        }
        Ok(())
    }

    pub fn clone_url(&self) -> String {
        self.repo_url
            .clone()
            .unwrap_or_else(|| format!("https://github.com/{0}/{0}.git", self.username))
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("token", &"<redacted>")
            .field("username", &self.username)
            .field("local_repo_path", &self.local_repo_path)
            .field("branch_name", &self.branch_name)
            .field("api_base_url", &self.api_base_url)
            .field("repo_url", &self.repo_url)
            .field("remote_name", &self.remote_name)
            .field("template_path", &self.template_path)
            .field("readme_file", &self.readme_file)
            .field("commit_message", &self.commit_message)
            .field("interval_secs", &self.interval_secs)
            .field("failure_log", &self.failure_log)
            .field("log_level", &self.log_level)
            .finish()
    }
}
