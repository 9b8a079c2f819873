use crate::domain::error::ApiError;
use crate::domain::external_apis::github::GitHubApi;
use crate::domain::models::account::Account;
use crate::domain::models::identifier::Identifier;
use crate::domain::models::repository::Repository;
use async_trait::async_trait;
use anyhow::Context;
use reqwest::{Client, Response, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

const USER_AGENT: &str = "gh-profile-page-rust-app";
const ACCEPT: &str = "application/vnd.github.v3+json";

#[derive(Deserialize, Debug, Clone)]
struct GitHubUserResponse {
    login: String,
    name: Option<String>,
    bio: Option<String>,
    #[serde(default)]
    public_repos: u64,
    #[serde(default)]
    followers: u64,
    html_url: String,
}

#[derive(Deserialize, Debug, Clone)]
struct GitHubRepositoryResponse {
    name: Option<String>,
    description: Option<String>,
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    forks_count: u64,
    language: Option<String>,
    updated_at: Option<String>, // ISO 8601 format, parse during domain model conversion
    homepage: Option<String>,
    #[serde(default)]
    html_url: String,
    #[serde(default)]
    commits_url: String,
    #[serde(default)]
    releases_url: String,
    #[serde(default)]
    url: String,
}

#[derive(Deserialize, Debug, Clone)]
struct GitHubCommitResponse {
    commit: GitHubCommitDetailResponse,
}

#[derive(Deserialize, Debug, Clone)]
struct GitHubCommitDetailResponse {
    message: String,
}

#[derive(Deserialize, Debug, Clone)]
struct GitHubReleaseResponse {
    tag_name: String,
}

#[derive(Deserialize, Debug, Clone)]
struct GitHubRepositoryDetailResponse {
    open_issues_count: u64,
}

pub struct GitHubApiAdapter {
    client: Client,
    base_url: Url,
}

impl GitHubApiAdapter {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("Invalid API base URL {base_url}"))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("API base URL {base_url} cannot carry a path");
        }
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, base_url })
    }

    /// Appends percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send(&self, resource: &str, url: &str) -> Result<Response, ApiError> {
        let response = self
            .client
            .get(url)
            .header("Accept", ACCEPT)
            .send()
            .await
            .map_err(|e| ApiError::Network {
                resource: resource.to_string(),
                message: e.to_string(),
            })?;
        tracing::debug!(status = %response.status(), "{} answered", resource);
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, resource: &str, url: &str) -> Result<T, ApiError> {
        let response = classify(resource, self.send(resource, url).await?)?;
        let body = response.bytes().await.map_err(|e| ApiError::Network {
            resource: resource.to_string(),
            message: e.to_string(),
        })?;
        serde_json::from_slice(&body).map_err(|e| ApiError::Malformed {
            resource: resource.to_string(),
            message: e.to_string(),
        })
    }
}

/// Maps a non-success status onto an error kind.
fn classify(resource: &str, response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let rate_limit_exhausted = response
        .headers()
        .get("X-RateLimit-Remaining")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.parse::<u32>().ok())
        == Some(0);

    let resource = resource.to_string();
    Err(match status {
        StatusCode::NOT_FOUND => ApiError::NotFound { resource },
        StatusCode::TOO_MANY_REQUESTS => ApiError::RateLimited { resource },
        StatusCode::FORBIDDEN if rate_limit_exhausted => ApiError::RateLimited { resource },
        status => ApiError::UnexpectedStatus {
            resource,
            status: status.as_u16(),
        },
    })
}

impl From<GitHubUserResponse> for Account {
    fn from(user: GitHubUserResponse) -> Self {
        Self {
            login: user.login,
            name: user.name,
            bio: user.bio,
            public_repos: user.public_repos,
            followers: user.followers,
            html_url: user.html_url,
        }
    }
}

impl From<GitHubRepositoryResponse> for Repository {
    fn from(repo: GitHubRepositoryResponse) -> Self {
        // An unparseable timestamp renders as a placeholder rather than
        // failing the whole list.
        let updated_at = repo.updated_at.as_deref().and_then(|raw| {
            match chrono::DateTime::parse_from_rfc3339(raw) {
                Ok(parsed) => Some(parsed.with_timezone(&chrono::Utc)),
                Err(e) => {
                    tracing::warn!("Failed to parse updated_at {:?}: {}", raw, e);
                    None
                }
            }
        });

        Self {
            name: repo.name,
            description: repo.description,
            stargazers_count: repo.stargazers_count,
            forks_count: repo.forks_count,
            language: repo.language,
            updated_at,
            homepage: repo.homepage,
            html_url: repo.html_url,
            commits_url: repo.commits_url,
            releases_url: repo.releases_url,
            url: repo.url,
        }
    }
}

#[async_trait]
impl GitHubApi for GitHubApiAdapter {
    #[tracing::instrument(name = "GitHubApiAdapter::check_account", skip(self, identifier), fields(identifier = %identifier))]
    async fn check_account(&self, identifier: &Identifier) -> Result<(), ApiError> {
        let resource = format!("users/{identifier}");
        let url = self.endpoint(&["users", identifier.as_str()]);
        let response = self.send(&resource, url.as_str()).await?;
        if response.status() == StatusCode::OK {
            return Ok(());
        }
        // Any other success code still does not count as "exists".
        let response = classify(&resource, response)?;
        Err(ApiError::UnexpectedStatus {
            resource,
            status: response.status().as_u16(),
        })
    }

    #[tracing::instrument(name = "GitHubApiAdapter::fetch_account", skip(self, identifier), fields(identifier = %identifier))]
    async fn fetch_account(&self, identifier: &Identifier) -> Result<Account, ApiError> {
        let resource = format!("users/{identifier}");
        let url = self.endpoint(&["users", identifier.as_str()]);
        let user: GitHubUserResponse = self.get_json(&resource, url.as_str()).await?;
        Ok(user.into())
    }

    #[tracing::instrument(name = "GitHubApiAdapter::fetch_repositories", skip(self, identifier), fields(identifier = %identifier))]
    async fn fetch_repositories(
        &self,
        identifier: &Identifier,
    ) -> Result<Vec<Repository>, ApiError> {
        let resource = format!("users/{identifier}/repos");
        let url = self.endpoint(&["users", identifier.as_str(), "repos"]);
        let items: Vec<GitHubRepositoryResponse> =
            self.get_json(&resource, url.as_str()).await?;
        Ok(items.into_iter().map(Repository::from).collect())
    }

    #[tracing::instrument(name = "GitHubApiAdapter::fetch_latest_commit", skip(self))]
    async fn fetch_latest_commit(
        &self,
        commits_endpoint: &str,
    ) -> Result<Option<String>, ApiError> {
        let commits: Vec<GitHubCommitResponse> =
            self.get_json(commits_endpoint, commits_endpoint).await?;
        Ok(commits.into_iter().next().map(|c| c.commit.message))
    }

    #[tracing::instrument(name = "GitHubApiAdapter::fetch_latest_release", skip(self))]
    async fn fetch_latest_release(
        &self,
        releases_endpoint: &str,
    ) -> Result<Option<String>, ApiError> {
        let releases: Vec<GitHubReleaseResponse> =
            self.get_json(releases_endpoint, releases_endpoint).await?;
        Ok(releases.into_iter().next().map(|r| r.tag_name))
    }

    #[tracing::instrument(name = "GitHubApiAdapter::fetch_open_issues", skip(self))]
    async fn fetch_open_issues(&self, repository_url: &str) -> Result<u64, ApiError> {
        let detail: GitHubRepositoryDetailResponse =
            self.get_json(repository_url, repository_url).await?;
        Ok(detail.open_issues_count)
    }
}
