//! services/story_writer/src/web/mod.rs

pub mod dashboard;
pub mod generate;
pub mod rest;
pub mod state;

pub use generate::generate_story_handler;
pub use rest::ApiDoc;
pub use state::AppState;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Builds the complete HTTP application: dashboard, JSON API and Swagger UI.
pub fn build_router(app_state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_router = Router::new()
        .route("/", get(dashboard::dashboard_handler))
        .route("/generate", post(generate_story_handler))
        .route("/stories", get(rest::list_stories_handler))
        .route(
            "/stories/{id}",
            get(rest::get_story_handler).delete(rest::delete_story_handler),
        )
        .route("/stories/{id}/favorite", post(rest::toggle_favorite_handler))
        .route("/favorites", get(rest::list_favorites_handler))
        .route("/search", get(rest::search_stories_handler))
        .route("/stats", get(rest::stats_handler))
        .route("/export/{id}", get(rest::export_story_handler))
        .route("/config", get(rest::catalog_handler))
        .layer(cors)
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
