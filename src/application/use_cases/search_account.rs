use crate::application::use_cases::load_account::{
    LoadAccountEvent, LoadAccountInteractor, LoadAccountUseCase, LoadAccountUseCaseInput,
};
use crate::application::use_cases::validate_identifier::{
    ValidateIdentifierInteractor, ValidateIdentifierUseCase, ValidateIdentifierUseCaseInput,
};
use crate::domain::external_apis::github::GitHubApi;
use crate::domain::models::identifier::{Identifier, SearchContext};
use crate::domain::models::pulse::{Pulse, PulseDelays, PulseKind};
use async_stream::stream;
use futures_util::Stream;
use futures_util::stream::{BoxStream, StreamExt};
use std::pin::pin;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct SearchAccountUseCaseInput {
    pub query: String,
    pub context: SearchContext,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    Pulse(Pulse),
    Load(LoadAccountEvent),
}

pub trait SearchAccountUseCase {
    /// Validates the query, pulses the outcome, then loads either the
    /// candidate or the context's default identifier.
    fn execute(&self, input: SearchAccountUseCaseInput) -> BoxStream<'static, SearchEvent>;

    /// Loads `identifier` directly. A failure ends with a `LoadError` pulse.
    fn load(&self, identifier: Identifier) -> BoxStream<'static, SearchEvent>;
}

pub struct SearchAccountInteractor<G: GitHubApi + Send + Sync + 'static> {
    validator: Arc<ValidateIdentifierInteractor<G>>,
    loader: Arc<LoadAccountInteractor<G>>,
    delays: PulseDelays,
}

impl<G: GitHubApi + Send + Sync + 'static> SearchAccountInteractor<G> {
    pub fn new(github_api: Arc<G>, delays: PulseDelays) -> Self {
        Self {
            validator: Arc::new(ValidateIdentifierInteractor::new(github_api.clone())),
            loader: Arc::new(LoadAccountInteractor::new(github_api)),
            delays,
        }
    }
}

impl<G: GitHubApi + Send + Sync + 'static> SearchAccountUseCase for SearchAccountInteractor<G> {
    fn execute(&self, input: SearchAccountUseCaseInput) -> BoxStream<'static, SearchEvent> {
        Box::pin(search(
            self.validator.clone(),
            self.loader.clone(),
            self.delays,
            input,
        ))
    }

    fn load(&self, identifier: Identifier) -> BoxStream<'static, SearchEvent> {
        Box::pin(load_with_feedback(
            self.loader.as_ref(),
            identifier,
            self.delays,
        ))
    }
}

fn search<G: GitHubApi + Send + Sync + 'static>(
    validator: Arc<ValidateIdentifierInteractor<G>>,
    loader: Arc<LoadAccountInteractor<G>>,
    delays: PulseDelays,
    input: SearchAccountUseCaseInput,
) -> impl Stream<Item = SearchEvent> + Send {
    stream! {
        let Ok(candidate) = Identifier::parse(&input.query) else {
            tracing::info!("Empty search query");
            yield SearchEvent::Pulse(Pulse::new(PulseKind::Empty, delays));
            return;
        };

        let output = validator
            .execute(ValidateIdentifierUseCaseInput {
                identifier: candidate.clone(),
            })
            .await;
        let kind = if output.exists {
            PulseKind::Found
        } else {
            PulseKind::NotFound
        };
        yield SearchEvent::Pulse(Pulse::new(kind, delays));

        let target = input.context.resolve(output.exists, candidate);
        let mut events = pin!(load_with_feedback(loader.as_ref(), target, delays));
        while let Some(event) = events.next().await {
            yield event;
        }
    }
}

fn load_with_feedback<G: GitHubApi + Send + Sync + 'static>(
    loader: &LoadAccountInteractor<G>,
    identifier: Identifier,
    delays: PulseDelays,
) -> impl Stream<Item = SearchEvent> + Send + use<G> {
    let mut events = loader.execute(LoadAccountUseCaseInput { identifier });
    stream! {
        while let Some(result) = events.next().await {
            match result {
                Ok(event) => yield SearchEvent::Load(event),
                Err(e) => {
                    tracing::error!("Error loading account: {:?}", e);
                    yield SearchEvent::Pulse(Pulse::new(PulseKind::LoadError, delays));
                    break;
                }
            }
        }
    }
}
