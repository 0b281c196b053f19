//! services/story_writer/src/bin/story_writer.rs

use clap::Parser;
use std::sync::Arc;
use story_writer_core::{StoryCatalog, StoryWriter};
use story_writer_lib::{
    adapters::{JsonStoryStore, OpenAiStoryAdapter},
    cli::{self, Cli, RunMode},
    config::Config,
    error::ApiError,
    web::{build_router, AppState},
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    let mode = Cli::parse().mode();

    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    info!("Configuration loaded.");

    // --- 2. Initialize Service Adapters ---
    let generator = Arc::new(OpenAiStoryAdapter::from_config(&config)?);
    let stories =
        Arc::new(JsonStoryStore::open(config.stories_file(), config.on_load_error).await?);
    info!("Story file: {}", stories.path().display());

    let writer = StoryWriter::new(generator, stories, StoryCatalog::default());

    // --- 3. Run the Selected Front End ---
    match mode {
        RunMode::Web => serve(config, writer).await,
        RunMode::Quick(request) => cli::quick_generate(&writer, request).await,
        RunMode::Terminal => cli::run_repl(&writer, &config).await,
    }
}

async fn serve(config: Arc<Config>, writer: StoryWriter) -> Result<(), ApiError> {
    let app_state = Arc::new(AppState::new(config.clone(), Arc::new(writer))?);
    let app = build_router(app_state);

    let bind_address = format!("{}:{}", config.host, config.port);
    info!("Starting server on {}", bind_address);
    info!("Dashboard available at http://{}/", bind_address);
    info!("Swagger UI available at http://{}/swagger-ui", bind_address);
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
