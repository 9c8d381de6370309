use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use anyhow::Context;
use api_rest::sessions::{SessionRegistry, DEFAULT_IDLE_TIMEOUT_MINS};
use api_rest::AppState;
use api_shared::HealthService;
use ausome_core::config::model_from_env_value;
use ausome_core::constants::{DEFAULT_IMAGE_MODEL, DEFAULT_TEXT_MODEL};
use ausome_core::{CoreConfig, WorksheetService};
use ausome_openai::{OpenAiClient, OpenAiConfig};

/// Main entry point for the Ausome worksheet assistant
///
/// Starts the REST server with OpenAPI/Swagger documentation.
///
/// # Environment Variables
/// - `AUSOME_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `OPENAI_API_KEY`: API key for text and image generation (prompt endpoints work without it)
/// - `OPENAI_BASE_URL`: Generation API base URL (default: "https://api.openai.com/v1")
/// - `AUSOME_TEXT_MODEL`: Text model (default: "gpt-4.1-mini")
/// - `AUSOME_IMAGE_MODEL`: Image model (default: "dall-e-3")
/// - `AUSOME_HTTP_TIMEOUT_SECS`: Generation request timeout (default: 120)
/// - `AUSOME_SESSION_IDLE_MINS`: Minutes before an idle session is discarded (default: 60)
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - a configuration value is invalid,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ausome_run=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("ausome_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("AUSOME_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let cfg = Arc::new(CoreConfig::new(
        model_from_env_value(std::env::var("AUSOME_TEXT_MODEL").ok(), DEFAULT_TEXT_MODEL),
        model_from_env_value(std::env::var("AUSOME_IMAGE_MODEL").ok(), DEFAULT_IMAGE_MODEL),
    )?);

    let openai = OpenAiConfig::from_env_values(
        std::env::var("OPENAI_API_KEY").ok(),
        std::env::var("OPENAI_BASE_URL").ok(),
        std::env::var("AUSOME_HTTP_TIMEOUT_SECS").ok(),
    )?;
    let client = Arc::new(OpenAiClient::new(openai)?);

    let idle_mins = match std::env::var("AUSOME_SESSION_IDLE_MINS") {
        Ok(raw) => raw
            .trim()
            .parse::<u32>()
            .with_context(|| format!("AUSOME_SESSION_IDLE_MINS must be whole minutes, got {raw:?}"))?,
        Err(_) => DEFAULT_IDLE_TIMEOUT_MINS,
    };
    anyhow::ensure!(idle_mins > 0, "AUSOME_SESSION_IDLE_MINS must be at least 1");

    tracing::info!(
        text_model = cfg.text_model(),
        image_model = cfg.image_model(),
        "++ {}",
        HealthService::check_health().message
    );
    tracing::info!(idle_mins, "++ Starting Ausome REST on {}", rest_addr);

    let state = AppState::new(WorksheetService::new(cfg, client))
        .with_sessions(SessionRegistry::with_idle_minutes(idle_mins));
    let app = api_rest::router(state);

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("-- Shutting down Ausome REST");
}
