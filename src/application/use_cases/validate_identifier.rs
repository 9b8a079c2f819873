use crate::domain::external_apis::github::GitHubApi;
use crate::domain::models::identifier::Identifier;
use async_trait::async_trait;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct ValidateIdentifierUseCaseInput {
    pub identifier: Identifier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidateIdentifierUseCaseOutput {
    pub exists: bool,
}

#[async_trait]
pub trait ValidateIdentifierUseCase {
    async fn execute(&self, input: ValidateIdentifierUseCaseInput)
    -> ValidateIdentifierUseCaseOutput;
}

pub struct ValidateIdentifierInteractor<G: GitHubApi + Send + Sync + 'static> {
    github_api: Arc<G>,
}

impl<G: GitHubApi + Send + Sync + 'static> ValidateIdentifierInteractor<G> {
    pub fn new(github_api: Arc<G>) -> Self {
        Self { github_api }
    }
}

#[async_trait]
impl<G: GitHubApi + Send + Sync + 'static> ValidateIdentifierUseCase
    for ValidateIdentifierInteractor<G>
{
    /// A failed lookup of any kind counts as "does not exist".
    #[tracing::instrument(name = "ValidateIdentifier::execute", skip(self, input), fields(identifier = %input.identifier))]
    async fn execute(
        &self,
        input: ValidateIdentifierUseCaseInput,
    ) -> ValidateIdentifierUseCaseOutput {
        let exists = match self.github_api.check_account(&input.identifier).await {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(kind = e.kind(), "Identifier lookup failed: {}", e);
                false
            }
        };
        tracing::info!(exists, "Validated identifier");
        ValidateIdentifierUseCaseOutput { exists }
    }
}
