use clap::Parser;
use gh_profile_page::application::use_cases::search_account::SearchAccountInteractor;
use gh_profile_page::config::Config;
use gh_profile_page::infrastructures::adapters::primary::views::PageOptions;
use gh_profile_page::infrastructures::adapters::primary::web::{AppState, create_router};
use gh_profile_page::infrastructures::adapters::secondary::external_apis::github::GitHubApiAdapter;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::trace::SdkTracerProvider;
use std::sync::Arc;
use tracing::{info, info_span};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn build_tracer_provider(endpoint: Option<&str>) -> anyhow::Result<Option<SdkTracerProvider>> {
    let Some(endpoint) = endpoint else {
        return Ok(None);
    };
    let otlp_exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()?;
    Ok(Some(
        SdkTracerProvider::builder()
            .with_batch_exporter(otlp_exporter)
            .build(),
    ))
}

fn shutdown_tracer_provider(provider: Option<SdkTracerProvider>) {
    if let Some(provider) = provider
        && let Err(e) = provider.shutdown()
    {
        tracing::error!("Failed to shut down tracer provider: {}", e);
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing
    let provider = build_tracer_provider(config.otlp_endpoint.as_deref())?;
    let telemetry = provider
        .as_ref()
        .map(|provider| tracing_opentelemetry::layer().with_tracer(provider.tracer("gh-profile-page")));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(telemetry)
        .with(fmt_layer)
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let initialize_span = info_span!("initialize");
    let enter = initialize_span.enter();
    info!("Application starting");

    // Build dependencies
    let github_api_adapter = Arc::new(GitHubApiAdapter::new(
        &config.api_base_url,
        config.request_timeout(),
    )?);
    let search_use_case = Arc::new(SearchAccountInteractor::new(
        github_api_adapter,
        config.pulse_delays(),
    ));
    let app_state = Arc::new(AppState {
        use_case: search_use_case,
        context: config.search_context(),
        page_options: PageOptions {
            confirm_unload: config.confirm_unload,
        },
    });

    // Create router
    let app = create_router(app_state);

    // Start server
    info!(
        "Listening on {} (default user {})",
        config.listen, config.default_user
    );
    let listener = tokio::net::TcpListener::bind(config.listen).await?;
    drop(enter);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    shutdown_tracer_provider(provider);

    Ok(())
}
