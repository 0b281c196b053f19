//! services/story_writer/src/web/generate.rs
//!
//! The story generation endpoint. Answers either with the finished story as
//! JSON, or with a server-sent-event stream of fragments.

use crate::web::rest::{internal_error, HandlerError, StoryResponse};
use crate::web::state::AppState;
use axum::{
    extract::State,
    response::{
        sse::{Event, Sse},
        IntoResponse, Json, Response,
    },
};
use futures::Stream;
use serde::Deserialize;
use serde_json::json;
use std::convert::Infallible;
use std::sync::Arc;
use story_writer_core::{StoryRequest, StoryStream};
use tracing::{error, info};
use utoipa::ToSchema;

/// The sentinel sent as the last event of a successful stream.
pub const DONE_SENTINEL: &str = "[DONE]";

/// The parameters of a story to generate.
#[derive(Debug, Deserialize, ToSchema)]
pub struct GenerateRequest {
    prompt: String,
    #[serde(default = "default_genre")]
    genre: String,
    #[serde(default = "default_tone")]
    tone: String,
    #[serde(default = "default_length")]
    length: String,
    #[serde(default = "default_language")]
    language: String,
    /// Stream fragments as server-sent events instead of returning the story.
    #[serde(default)]
    stream: bool,
}

fn default_genre() -> String {
    "Fantasy".to_string()
}

fn default_tone() -> String {
    "Serious".to_string()
}

fn default_length() -> String {
    "medium".to_string()
}

fn default_language() -> String {
    "English".to_string()
}

impl GenerateRequest {
    fn into_parts(self) -> (StoryRequest, bool) {
        let request = StoryRequest {
            prompt: self.prompt,
            genre: self.genre,
            tone: self.tone,
            length: self.length,
            language: self.language,
        };
        (request, self.stream)
    }
}

/// Generate a new story.
///
/// With `stream: true` the response is `text/event-stream`: one
/// `{"content": fragment}` event per fragment, then a `[DONE]` event once the
/// story has been saved.
#[utoipa::path(
    post,
    path = "/generate",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "The generated story, or an event stream when `stream` is true", body = StoryResponse),
        (status = 500, description = "The completion API or the story file failed")
    )
)]
pub async fn generate_story_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<GenerateRequest>,
) -> Result<Response, HandlerError> {
    let (request, stream) = payload.into_parts();
    info!(
        genre = %request.genre,
        tone = %request.tone,
        length = %request.length,
        stream,
        "Generating story"
    );

    if stream {
        let story_stream = app_state
            .writer
            .stream_story(request)
            .await
            .map_err(|e| internal_error("Failed to start story stream", e))?;
        return Ok(Sse::new(story_events(story_stream)).into_response());
    }

    let story = app_state
        .writer
        .write_story(request)
        .await
        .map_err(|e| internal_error("Failed to generate story", e))?;
    Ok(Json(StoryResponse::from(story)).into_response())
}

/// Turns a story stream into SSE events.
///
/// If the client goes away the event stream is dropped along with the story
/// stream, so nothing is saved.
fn story_events(mut story_stream: StoryStream) -> impl Stream<Item = Result<Event, Infallible>> {
    async_stream::stream! {
        loop {
            match story_stream.next_fragment().await {
                Some(Ok(fragment)) => {
                    yield Ok(Event::default().data(json!({ "content": fragment }).to_string()));
                }
                Some(Err(e)) => {
                    error!("Story stream failed: {:?}", e);
                    yield Ok(Event::default().data(json!({ "error": e.to_string() }).to_string()));
                    return;
                }
                None => break,
            }
        }

        match story_stream.finish().await {
            Ok(story) => {
                info!(story_id = %story.id, "Streamed story saved");
                yield Ok(Event::default().data(DONE_SENTINEL));
            }
            Err(e) => {
                error!("Failed to save streamed story: {:?}", e);
                yield Ok(Event::default().data(json!({ "error": e.to_string() }).to_string()));
            }
        }
    }
}
