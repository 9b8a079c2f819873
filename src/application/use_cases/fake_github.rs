//! In-memory `GitHubApi` for use case and session tests.

use crate::domain::error::ApiError;
use crate::domain::external_apis::github::GitHubApi;
use crate::domain::models::account::Account;
use crate::domain::models::identifier::Identifier;
use crate::domain::models::repository::Repository;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::time::Duration;

#[derive(Default)]
pub struct FakeGitHub {
    accounts: HashMap<String, Account>,
    repositories: HashMap<String, Vec<Repository>>,
    commits: HashMap<String, String>,
    releases: HashMap<String, String>,
    open_issues: HashMap<String, u64>,
    failing: HashSet<String>,
    latency: HashMap<String, Duration>,
}

impl FakeGitHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(mut self, login: &str, repositories: Vec<Repository>) -> Self {
        self.accounts.insert(login.to_string(), account(login));
        self.repositories.insert(login.to_string(), repositories);
        self
    }

    pub fn with_commit(mut self, repository: &Repository, message: &str) -> Self {
        self.commits
            .insert(repository.commits_endpoint(), message.to_string());
        self
    }

    pub fn with_release(mut self, repository: &Repository, tag: &str) -> Self {
        self.releases
            .insert(repository.releases_endpoint(), tag.to_string());
        self
    }

    pub fn with_open_issues(mut self, repository: &Repository, count: u64) -> Self {
        self.open_issues.insert(repository.url.clone(), count);
        self
    }

    /// Makes every request against `key` fail. Keys are a login, `{login}/repos`,
    /// or an extras endpoint.
    pub fn failing(mut self, key: &str) -> Self {
        self.failing.insert(key.to_string());
        self
    }

    /// Delays every request keyed by `login` before answering.
    pub fn with_latency(mut self, login: &str, latency: Duration) -> Self {
        self.latency.insert(login.to_string(), latency);
        self
    }

    async fn gate(&self, key: &str) -> Result<(), ApiError> {
        if let Some(latency) = self.latency.get(key) {
            tokio::time::sleep(*latency).await;
        }
        if self.failing.contains(key) {
            return Err(ApiError::UnexpectedStatus {
                resource: key.to_string(),
                status: 500,
            });
        }
        Ok(())
    }
}

pub fn account(login: &str) -> Account {
    Account {
        login: login.to_string(),
        name: None,
        bio: None,
        public_repos: 2,
        followers: 5,
        html_url: format!("https://github.com/{login}"),
    }
}

pub fn repository(owner: &str, name: &str) -> Repository {
    let api = format!("https://api.github.com/repos/{owner}/{name}");
    Repository {
        name: Some(name.to_string()),
        description: None,
        stargazers_count: 1,
        forks_count: 0,
        language: Some("Rust".to_string()),
        updated_at: None,
        homepage: None,
        html_url: format!("https://github.com/{owner}/{name}"),
        commits_url: format!("{api}/commits{{/sha}}"),
        releases_url: format!("{api}/releases{{/id}}"),
        url: api,
    }
}

#[async_trait]
impl GitHubApi for FakeGitHub {
    async fn check_account(&self, identifier: &Identifier) -> Result<(), ApiError> {
        self.gate(identifier.as_str()).await?;
        if self.accounts.contains_key(identifier.as_str()) {
            Ok(())
        } else {
            Err(ApiError::NotFound {
                resource: format!("users/{identifier}"),
            })
        }
    }

    async fn fetch_account(&self, identifier: &Identifier) -> Result<Account, ApiError> {
        self.gate(identifier.as_str()).await?;
        self.accounts
            .get(identifier.as_str())
            .cloned()
            .ok_or_else(|| ApiError::NotFound {
                resource: format!("users/{identifier}"),
            })
    }

    async fn fetch_repositories(
        &self,
        identifier: &Identifier,
    ) -> Result<Vec<Repository>, ApiError> {
        self.gate(identifier.as_str()).await?;
        self.gate(&format!("{identifier}/repos")).await?;
        Ok(self
            .repositories
            .get(identifier.as_str())
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_latest_commit(
        &self,
        commits_endpoint: &str,
    ) -> Result<Option<String>, ApiError> {
        self.gate(commits_endpoint).await?;
        Ok(self.commits.get(commits_endpoint).cloned())
    }

    async fn fetch_latest_release(
        &self,
        releases_endpoint: &str,
    ) -> Result<Option<String>, ApiError> {
        self.gate(releases_endpoint).await?;
        Ok(self.releases.get(releases_endpoint).cloned())
    }

    async fn fetch_open_issues(&self, repository_url: &str) -> Result<u64, ApiError> {
        self.gate(repository_url).await?;
        Ok(self.open_issues.get(repository_url).copied().unwrap_or(0))
    }
}
