//! services/story_writer/src/web/dashboard.rs
//!
//! Renders the browser dashboard shell. The page itself talks to the JSON
//! endpoints; the server only fills in the configured choices.

use crate::web::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::Html,
};
use minijinja::{context, Environment};
use std::sync::Arc;
use tracing::error;

const INDEX_TEMPLATE_NAME: &str = "index.html";
const INDEX_TEMPLATE: &str = include_str!("../../templates/index.html");

/// Builds the template environment once at startup.
pub fn template_env() -> Result<Environment<'static>, minijinja::Error> {
    let mut env = Environment::new();
    env.add_template(INDEX_TEMPLATE_NAME, INDEX_TEMPLATE)?;
    Ok(env)
}

pub async fn dashboard_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Html<String>, (StatusCode, String)> {
    let catalog = app_state.writer.catalog();
    let lengths: Vec<_> = catalog
        .lengths
        .iter()
        .map(|bucket| context! { key => bucket.key, label => bucket.label })
        .collect();

    let page = app_state
        .templates
        .get_template(INDEX_TEMPLATE_NAME)
        .and_then(|template| {
            template.render(context! {
                genres => catalog.genres,
                tones => catalog.tones,
                lengths => lengths,
                default_length => "medium",
                languages => catalog.languages,
                examples => catalog.example_prompts,
            })
        })
        .map_err(|e| {
            error!("Failed to render dashboard: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to render dashboard".to_string(),
            )
        })?;

    Ok(Html(page))
}
