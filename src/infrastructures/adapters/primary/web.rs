use crate::application::use_cases::load_account::LoadAccountEvent;
use crate::application::use_cases::search_account::{
    SearchAccountInteractor, SearchAccountUseCase, SearchAccountUseCaseInput, SearchEvent,
};
use crate::domain::models::identifier::SearchContext;
use crate::infrastructures::adapters::primary::session::{
    ClientMessage, SearchSession, ServerMessage,
};
use crate::infrastructures::adapters::primary::views::{self, PageOptions, PageView};
use crate::infrastructures::adapters::secondary::external_apis::github::GitHubApiAdapter;
use axum::extract::ws::Utf8Bytes;
use axum::{
    Router,
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::get,
};
use futures_util::stream::BoxStream;
use futures_util::{SinkExt, StreamExt, future};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::mpsc;
use tower_http::trace::TraceLayer;

/// Outgoing messages buffered per connection before the session waits on the socket.
const OUTGOING_BUFFER: usize = 64;

// Structure to hold application state (AppState)
#[derive(Clone)]
pub struct AppState {
    pub use_case: Arc<SearchAccountInteractor<GitHubApiAdapter>>,
    pub context: SearchContext,
    pub page_options: PageOptions,
}

#[derive(Deserialize, Debug)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

/// Renders the page up to the last repository. Dropping the stream there
/// cancels the extras fetches; the websocket session delivers them instead.
async fn render_page(events: BoxStream<'static, SearchEvent>, options: PageOptions) -> Html<String> {
    let view = events
        .take_while(|event| {
            future::ready(!matches!(
                event,
                SearchEvent::Load(LoadAccountEvent::RepositoriesListed { .. })
            ))
        })
        .fold(PageView::default(), |mut view, event| async move {
            view.apply(event);
            view
        })
        .await;
    Html(views::page(&view, options).into_string())
}

#[tracing::instrument(name = "index", skip(state))]
async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let events = state.use_case.load(state.context.default_identifier().clone());
    render_page(events, state.page_options).await
}

#[tracing::instrument(name = "search", skip(state))]
async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> impl IntoResponse {
    let events = state.use_case.execute(SearchAccountUseCaseInput {
        query: params.q,
        context: state.context.clone(),
    });
    render_page(events, state.page_options).await
}

#[axum::debug_handler]
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

fn parse_client_message(message: Message) -> Option<ClientMessage> {
    match message {
        Message::Text(text) => match serde_json::from_str::<ClientMessage>(&text) {
            Ok(message) => Some(message),
            Err(e) => {
                tracing::warn!("Ignoring malformed client message: {}", e);
                None
            }
        },
        // Ping/Pong and Binary messages carry no searches
        _ => None,
    }
}

#[tracing::instrument(name = "handle_socket", skip(socket, state))]
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    tracing::info!("Client connected");
    let (mut sender, receiver) = socket.split();
    let (outgoing, mut pending) = mpsc::channel::<ServerMessage>(OUTGOING_BUFFER);

    let writer = tokio::spawn(async move {
        while let Some(message) = pending.recv().await {
            match serde_json::to_string(&message) {
                Ok(json_string) => {
                    if sender
                        .send(Message::Text(Utf8Bytes::from(json_string)))
                        .await
                        .is_err()
                    {
                        tracing::info!("Client disconnected (send error)");
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!("Failed to serialize output: {:?}", e);
                }
            }
        }
    });

    // Stop at the first close frame or socket error.
    let incoming = receiver
        .take_while(|message| {
            future::ready(matches!(message, Ok(message) if !matches!(message, Message::Close(_))))
        })
        .filter_map(|message| future::ready(message.ok().and_then(parse_client_message)));

    SearchSession::new(state.use_case.clone(), state.context.clone())
        .run(incoming, outgoing)
        .await;

    if let Err(e) = writer.await {
        tracing::error!("Socket writer task failed: {:?}", e);
    }
    tracing::info!("Client disconnected");
}

#[tracing::instrument(name = "health_check")]
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/search", get(search))
        .route("/ws", get(websocket_handler))
        .route("/health", get(health_check))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
}
