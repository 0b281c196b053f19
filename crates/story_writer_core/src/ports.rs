//! crates/story_writer_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the completion API and of the storage format.

use crate::domain::{ExportFormat, StoryRecord, StoryStats};
use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;
use uuid::Uuid;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., network, disk).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// Authentication, quota and network failures from the completion API.
    #[error("Story generation failed: {0}")]
    Generation(String),
    #[error("Story storage failed: {0}")]
    Storage(String),
    /// A streamed story was asked to persist before its stream completed.
    #[error("Story generation did not complete")]
    Incomplete,
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

/// Text fragments delivered by a streaming completion, in order.
pub type FragmentStream = Pin<Box<dyn Stream<Item = PortResult<String>> + Send>>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait StoryGenerationService: Send + Sync {
    /// Waits for the complete response and returns its text.
    async fn generate_story(&self, instruction: &str) -> PortResult<String>;

    /// Starts a streaming completion. Fragments arrive as the model produces them.
    async fn generate_story_streaming(&self, instruction: &str) -> PortResult<FragmentStream>;
}

#[async_trait]
pub trait StoryRepository: Send + Sync {
    /// Adds a record at the end of the collection and persists it.
    async fn append(&self, record: StoryRecord) -> PortResult<()>;

    async fn get(&self, id: Uuid) -> PortResult<Option<StoryRecord>>;

    /// Returns `false` when no record has this id.
    async fn delete(&self, id: Uuid) -> PortResult<bool>;

    /// Flips the favorite flag and returns the updated record.
    async fn toggle_favorite(&self, id: Uuid) -> PortResult<Option<StoryRecord>>;

    /// All records, most recent first.
    async fn list_all(&self) -> PortResult<Vec<StoryRecord>>;

    /// Case-insensitive match on content, prompt or genre, most recent first.
    async fn search(&self, query: &str) -> PortResult<Vec<StoryRecord>>;

    /// Favorite records in collection order.
    async fn favorites(&self) -> PortResult<Vec<StoryRecord>>;

    async fn stats(&self) -> PortResult<StoryStats>;

    async fn export(&self, id: Uuid, format: ExportFormat) -> PortResult<Option<String>>;
}
