use crate::domain::error::ApiError;
use crate::domain::external_apis::github::GitHubApi;
use crate::domain::models::account::Account;
use crate::domain::models::extras::{Extras, commit_message_prefix};
use crate::domain::models::identifier::Identifier;
use crate::domain::models::repository::Repository;
use anyhow::{Context, Error};
use async_stream::try_stream;
use futures_util::Stream;
use futures_util::stream::{BoxStream, FuturesUnordered, StreamExt};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct LoadAccountUseCaseInput {
    pub identifier: Identifier,
}

/// Render instructions, in the order they should be applied.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadAccountEvent {
    Profile(Account),
    RepositoriesCleared,
    Repository {
        index: usize,
        repository: Repository,
    },
    /// Every repository has been emitted; only extras follow.
    RepositoriesListed {
        count: usize,
    },
    Extras {
        index: usize,
        extras: Extras,
    },
}

pub trait LoadAccountUseCase {
    fn execute(
        &self,
        input: LoadAccountUseCaseInput,
    ) -> BoxStream<'static, Result<LoadAccountEvent, Error>>;
}

pub struct LoadAccountInteractor<G: GitHubApi + Send + Sync + 'static> {
    github_api: Arc<G>,
}

impl<G: GitHubApi + Send + Sync + 'static> LoadAccountInteractor<G> {
    pub fn new(github_api: Arc<G>) -> Self {
        Self { github_api }
    }
}

impl<G: GitHubApi + Send + Sync + 'static> LoadAccountUseCase for LoadAccountInteractor<G> {
    fn execute(
        &self,
        input: LoadAccountUseCaseInput,
    ) -> BoxStream<'static, Result<LoadAccountEvent, Error>> {
        Box::pin(load_account(self.github_api.clone(), input.identifier))
    }
}

fn load_account<G: GitHubApi + Send + Sync + 'static>(
    github_api: Arc<G>,
    identifier: Identifier,
) -> impl Stream<Item = Result<LoadAccountEvent, Error>> + Send {
    try_stream! {
        tracing::info!("Fetching account {}...", identifier);
        let account = github_api
            .fetch_account(&identifier)
            .await
            .with_context(|| format!("Failed to fetch account {identifier}"))?;
        yield LoadAccountEvent::Profile(account);
        yield LoadAccountEvent::RepositoriesCleared;

        let repositories = github_api
            .fetch_repositories(&identifier)
            .await
            .with_context(|| format!("Failed to fetch repositories for {identifier}"))?;
        tracing::info!("Fetched {} repositories for {}", repositories.len(), identifier);

        // Every fragment goes out before any extras; extras then arrive in
        // completion order.
        let count = repositories.len();
        let mut pending = FuturesUnordered::new();
        for (index, repository) in repositories.into_iter().enumerate() {
            let github_api = github_api.clone();
            let target = repository.clone();
            pending.push(async move { (index, load_extras(github_api.as_ref(), &target).await) });
            yield LoadAccountEvent::Repository { index, repository };
        }
        yield LoadAccountEvent::RepositoriesListed { count };

        while let Some((index, extras)) = pending.next().await {
            yield LoadAccountEvent::Extras { index, extras };
        }
    }
}

/// Joins the three per-repository fetches into a single value.
async fn load_extras<G: GitHubApi + Send + Sync>(github_api: &G, repository: &Repository) -> Extras {
    let commits_endpoint = repository.commits_endpoint();
    let releases_endpoint = repository.releases_endpoint();

    let (commit, release, open_issues) = tokio::join!(
        github_api.fetch_latest_commit(&commits_endpoint),
        github_api.fetch_latest_release(&releases_endpoint),
        github_api.fetch_open_issues(&repository.url),
    );

    Extras {
        last_commit: settle("latest commit", commit)
            .flatten()
            .map(|message| commit_message_prefix(&message)),
        latest_release: settle("latest release", release).flatten(),
        open_issues: settle("open issues", open_issues),
    }
}

fn settle<T>(field: &str, result: Result<T, ApiError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(kind = e.kind(), "Failed to fetch {}: {}", field, e);
            None
        }
    }
}
