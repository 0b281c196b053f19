//! services/story_writer/src/web/rest.rs
//!
//! Contains the Axum handlers for the story REST endpoints and the master
//! definition for the OpenAPI document.

use crate::web::generate::{self, GenerateRequest};
use crate::web::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use story_writer_core::{
    ExportFormat, PortError, StoryCatalog, StoryRecord, StoryRepository, StoryStats,
};
use tracing::error;
use utoipa::{IntoParams, OpenApi, ToSchema};
use uuid::Uuid;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        generate::generate_story_handler,
        list_stories_handler,
        get_story_handler,
        delete_story_handler,
        toggle_favorite_handler,
        list_favorites_handler,
        search_stories_handler,
        stats_handler,
        export_story_handler,
        catalog_handler,
    ),
    components(
        schemas(
            GenerateRequest,
            StoryResponse,
            StatsResponse,
            CatalogResponse,
            LengthOption,
            DeletedResponse
        )
    ),
    tags(
        (name = "StoryWriter API", description = "Generate, browse and export AI-written short stories.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

pub(crate) type HandlerError = (StatusCode, String);

/// A stored story as returned by the API.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StoryResponse {
    pub id: Uuid,
    pub prompt: String,
    pub content: String,
    pub genre: String,
    pub tone: String,
    pub length: String,
    pub language: String,
    pub created_at: DateTime<Utc>,
    pub favorite: bool,
    pub word_count: usize,
}

impl From<StoryRecord> for StoryResponse {
    fn from(record: StoryRecord) -> Self {
        Self {
            id: record.id,
            prompt: record.prompt,
            content: record.content,
            genre: record.genre,
            tone: record.tone,
            length: record.length,
            language: record.language,
            created_at: record.created_at,
            favorite: record.favorite,
            word_count: record.word_count,
        }
    }
}

/// Writing statistics over the whole collection.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatsResponse {
    total_stories: usize,
    total_words: usize,
    favorites: usize,
    average_words: usize,
    genres: BTreeMap<String, usize>,
    tones: BTreeMap<String, usize>,
    languages: BTreeMap<String, usize>,
}

impl From<StoryStats> for StatsResponse {
    fn from(stats: StoryStats) -> Self {
        Self {
            total_stories: stats.total_stories,
            total_words: stats.total_words,
            favorites: stats.favorites,
            average_words: stats.average_words,
            genres: stats.genres,
            tones: stats.tones,
            languages: stats.languages,
        }
    }
}

/// Target word range for one length bucket.
#[derive(Debug, Serialize, ToSchema)]
pub struct LengthOption {
    min: u32,
    max: u32,
    label: String,
}

/// The configured choices offered to the user.
#[derive(Debug, Serialize, ToSchema)]
pub struct CatalogResponse {
    genres: Vec<String>,
    tones: Vec<String>,
    lengths: BTreeMap<String, LengthOption>,
    languages: Vec<String>,
    examples: Vec<String>,
}

impl From<&StoryCatalog> for CatalogResponse {
    fn from(catalog: &StoryCatalog) -> Self {
        Self {
            genres: owned(catalog.genres),
            tones: owned(catalog.tones),
            lengths: catalog
                .lengths
                .iter()
                .map(|bucket| {
                    let option = LengthOption {
                        min: bucket.min_words,
                        max: bucket.max_words,
                        label: bucket.label.to_string(),
                    };
                    (bucket.key.to_string(), option)
                })
                .collect(),
            languages: owned(catalog.languages),
            examples: owned(catalog.example_prompts),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeletedResponse {
    status: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchParams {
    /// Case-insensitive text matched against content, prompt and genre.
    q: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ExportParams {
    /// `txt` (default) or `md`.
    format: Option<String>,
}

//=========================================================================================
// Handler Helpers
//=========================================================================================

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

fn not_found() -> HandlerError {
    (StatusCode::NOT_FOUND, "Story not found".to_string())
}

pub(crate) fn internal_error(context: &str, e: PortError) -> HandlerError {
    error!("{}: {:?}", context, e);
    (StatusCode::INTERNAL_SERVER_ERROR, format!("{}: {}", context, e))
}

/// Ids that are not UUIDs cannot name a stored story.
fn parse_story_id(raw: &str) -> Result<Uuid, HandlerError> {
    Uuid::parse_str(raw).map_err(|_| not_found())
}

fn to_responses(records: Vec<StoryRecord>) -> Json<Vec<StoryResponse>> {
    Json(records.into_iter().map(StoryResponse::from).collect())
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// List every story, most recent first.
#[utoipa::path(
    get,
    path = "/stories",
    responses((status = 200, description = "All stories", body = [StoryResponse]))
)]
pub async fn list_stories_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<StoryResponse>>, HandlerError> {
    let stories = app_state
        .stories()
        .list_all()
        .await
        .map_err(|e| internal_error("Failed to list stories", e))?;
    Ok(to_responses(stories))
}

/// Fetch a single story.
#[utoipa::path(
    get,
    path = "/stories/{id}",
    params(("id" = String, Path, description = "The story id.")),
    responses(
        (status = 200, description = "The story", body = StoryResponse),
        (status = 404, description = "Story not found")
    )
)]
pub async fn get_story_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<StoryResponse>, HandlerError> {
    let id = parse_story_id(&id)?;
    let story = app_state
        .stories()
        .get(id)
        .await
        .map_err(|e| internal_error("Failed to load story", e))?
        .ok_or_else(not_found)?;
    Ok(Json(story.into()))
}

/// Delete a story.
#[utoipa::path(
    delete,
    path = "/stories/{id}",
    params(("id" = String, Path, description = "The story id.")),
    responses(
        (status = 200, description = "Story deleted", body = DeletedResponse),
        (status = 404, description = "Story not found")
    )
)]
pub async fn delete_story_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeletedResponse>, HandlerError> {
    let id = parse_story_id(&id)?;
    let deleted = app_state
        .stories()
        .delete(id)
        .await
        .map_err(|e| internal_error("Failed to delete story", e))?;

    if !deleted {
        return Err(not_found());
    }
    Ok(Json(DeletedResponse {
        status: "deleted".to_string(),
    }))
}

/// Flip the favorite flag of a story.
#[utoipa::path(
    post,
    path = "/stories/{id}/favorite",
    params(("id" = String, Path, description = "The story id.")),
    responses(
        (status = 200, description = "The updated story", body = StoryResponse),
        (status = 404, description = "Story not found")
    )
)]
pub async fn toggle_favorite_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<StoryResponse>, HandlerError> {
    let id = parse_story_id(&id)?;
    let story = app_state
        .stories()
        .toggle_favorite(id)
        .await
        .map_err(|e| internal_error("Failed to update story", e))?
        .ok_or_else(not_found)?;
    Ok(Json(story.into()))
}

/// List favorite stories.
#[utoipa::path(
    get,
    path = "/favorites",
    responses((status = 200, description = "Favorite stories", body = [StoryResponse]))
)]
pub async fn list_favorites_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<StoryResponse>>, HandlerError> {
    let stories = app_state
        .stories()
        .favorites()
        .await
        .map_err(|e| internal_error("Failed to list favorites", e))?;
    Ok(to_responses(stories))
}

/// Search stories by content, prompt or genre.
#[utoipa::path(
    get,
    path = "/search",
    params(SearchParams),
    responses((status = 200, description = "Matching stories, most recent first", body = [StoryResponse]))
)]
pub async fn search_stories_handler(
    State(app_state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<StoryResponse>>, HandlerError> {
    let stories = app_state
        .stories()
        .search(&params.q)
        .await
        .map_err(|e| internal_error("Failed to search stories", e))?;
    Ok(to_responses(stories))
}

/// Writing statistics.
#[utoipa::path(
    get,
    path = "/stats",
    responses((status = 200, description = "Aggregate statistics", body = StatsResponse))
)]
pub async fn stats_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<StatsResponse>, HandlerError> {
    let stats = app_state
        .stories()
        .stats()
        .await
        .map_err(|e| internal_error("Failed to compute stats", e))?;
    Ok(Json(stats.into()))
}

/// Download a story as plain text or markdown.
#[utoipa::path(
    get,
    path = "/export/{id}",
    params(
        ("id" = String, Path, description = "The story id."),
        ExportParams
    ),
    responses(
        (status = 200, description = "The rendered story as an attachment"),
        (status = 400, description = "Unsupported format"),
        (status = 404, description = "Story not found")
    )
)]
pub async fn export_story_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<ExportParams>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_story_id(&id)?;
    let format = params
        .format
        .as_deref()
        .unwrap_or("txt")
        .parse::<ExportFormat>()
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let content = app_state
        .stories()
        .export(id, format)
        .await
        .map_err(|e| internal_error("Failed to export story", e))?
        .ok_or_else(not_found)?;

    let short_id: String = id.to_string().chars().take(8).collect();
    let disposition = format!(
        "attachment; filename=story_{}.{}",
        short_id,
        format.extension()
    );
    let headers = [
        (header::CONTENT_TYPE, format.media_type().to_string()),
        (header::CONTENT_DISPOSITION, disposition),
    ];
    Ok((headers, content))
}

/// The configured genres, tones, length buckets, languages and example prompts.
#[utoipa::path(
    get,
    path = "/config",
    responses((status = 200, description = "Configured choices", body = CatalogResponse))
)]
pub async fn catalog_handler(State(app_state): State<Arc<AppState>>) -> Json<CatalogResponse> {
    Json(app_state.writer.catalog().into())
}
