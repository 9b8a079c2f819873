use crate::application::use_cases::load_account::LoadAccountEvent;
use crate::application::use_cases::search_account::{
    SearchAccountUseCase, SearchAccountUseCaseInput, SearchEvent,
};
use crate::domain::models::identifier::{Identifier, SearchContext};
use crate::domain::models::pulse::{Pulse, PulseMachine};
use crate::infrastructures::adapters::primary::views;
use futures_util::stream::{BoxStream, Stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::pin::{Pin, pin};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::Sleep;

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Search { query: String },
    /// Streams an already validated account, extras included, with no pulse.
    Load { identifier: Identifier },
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Profile {
        html: String,
    },
    RepositoriesCleared,
    Repository {
        index: usize,
        html: String,
    },
    Extras {
        index: usize,
        html: String,
    },
    Pulse {
        generation: u64,
        #[serde(flatten)]
        pulse: Pulse,
    },
    PulseReset {
        generation: u64,
    },
}

impl ServerMessage {
    /// Renders a load event. Markers with nothing to paint yield `None`.
    fn from_load_event(event: &LoadAccountEvent) -> Option<Self> {
        let message = match event {
            LoadAccountEvent::Profile(account) => Self::Profile {
                html: views::profile_fragment(account).into_string(),
            },
            LoadAccountEvent::RepositoriesCleared => Self::RepositoriesCleared,
            LoadAccountEvent::Repository { index, repository } => Self::Repository {
                index: *index,
                html: views::repository_fragment(*index, repository).into_string(),
            },
            LoadAccountEvent::RepositoriesListed { .. } => return None,
            LoadAccountEvent::Extras { index, extras } => Self::Extras {
                index: *index,
                html: views::extras_fragment(extras).into_string(),
            },
        };
        Some(message)
    }
}

type PendingReset = Option<(u64, Pin<Box<Sleep>>)>;

/// One browser connection. Only the most recent search is ever rendered:
/// a new query drops the stream of the previous one.
pub struct SearchSession<U: SearchAccountUseCase + Send + Sync + 'static> {
    use_case: Arc<U>,
    context: SearchContext,
    pulses: PulseMachine,
}

impl<U: SearchAccountUseCase + Send + Sync + 'static> SearchSession<U> {
    pub fn new(use_case: Arc<U>, context: SearchContext) -> Self {
        Self {
            use_case,
            context,
            pulses: PulseMachine::new(),
        }
    }

    /// Runs until `incoming` ends or `outgoing` is closed.
    pub async fn run<I>(mut self, incoming: I, outgoing: mpsc::Sender<ServerMessage>)
    where
        I: Stream<Item = ClientMessage> + Send,
    {
        let mut incoming = pin!(incoming);
        let mut active: Option<BoxStream<'static, SearchEvent>> = None;
        let mut pending_reset: PendingReset = None;

        loop {
            tokio::select! {
                message = incoming.next() => {
                    let Some(message) = message else {
                        tracing::info!("Client stream ended");
                        break;
                    };
                    if active.is_some() {
                        tracing::debug!("Dropping in-flight search");
                    }
                    active = Some(match message {
                        ClientMessage::Search { query } => {
                            self.use_case.execute(SearchAccountUseCaseInput {
                                query,
                                context: self.context.clone(),
                            })
                        }
                        ClientMessage::Load { identifier } => self.use_case.load(identifier),
                    });
                },
                Some(event) = next_event(&mut active) => {
                    let message = match event {
                        SearchEvent::Pulse(pulse) => {
                            let delay = pulse.delay;
                            let generation = self.pulses.start(pulse.clone());
                            pending_reset = Some((generation, Box::pin(tokio::time::sleep(delay))));
                            Some(ServerMessage::Pulse { generation, pulse })
                        }
                        SearchEvent::Load(event) => ServerMessage::from_load_event(&event),
                    };
                    if let Some(message) = message
                        && outgoing.send(message).await.is_err()
                    {
                        tracing::info!("Client disconnected (send error)");
                        break;
                    }
                },
                generation = wait_for_reset(&mut pending_reset) => {
                    pending_reset = None;
                    if self.pulses.reset(generation)
                        && outgoing.send(ServerMessage::PulseReset { generation }).await.is_err()
                    {
                        tracing::info!("Client disconnected (send error after pulse reset)");
                        break;
                    }
                },
            }
        }
    }
}

async fn next_event(active: &mut Option<BoxStream<'static, SearchEvent>>) -> Option<SearchEvent> {
    let Some(stream) = active.as_mut() else {
        return std::future::pending().await;
    };
    let event = stream.next().await;
    if event.is_none() {
        *active = None;
    }
    event
}

async fn wait_for_reset(pending_reset: &mut PendingReset) -> u64 {
    match pending_reset {
        Some((generation, sleep)) => {
            sleep.as_mut().await;
            *generation
        }
        None => std::future::pending().await,
    }
}
