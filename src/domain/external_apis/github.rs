use crate::domain::error::ApiError;
use crate::domain::models::account::Account;
use crate::domain::models::identifier::Identifier;
use crate::domain::models::repository::Repository;
use async_trait::async_trait;

#[async_trait]
pub trait GitHubApi {
    /// Succeeds only when the account lookup answers exactly `200 OK`.
    async fn check_account(&self, identifier: &Identifier) -> Result<(), ApiError>;
    async fn fetch_account(&self, identifier: &Identifier) -> Result<Account, ApiError>;
    /// The upstream default page of repositories, in upstream order.
    async fn fetch_repositories(&self, identifier: &Identifier)
    -> Result<Vec<Repository>, ApiError>;
    /// Message of the most recent commit, if the list is non-empty.
    async fn fetch_latest_commit(&self, commits_endpoint: &str)
    -> Result<Option<String>, ApiError>;
    /// Tag of the most recent release, if the list is non-empty.
    async fn fetch_latest_release(
        &self,
        releases_endpoint: &str,
    ) -> Result<Option<String>, ApiError>;
    async fn fetch_open_issues(&self, repository_url: &str) -> Result<u64, ApiError>;
}
