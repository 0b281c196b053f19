//! services/story_writer/src/adapters/json_store.rs
//!
//! This module contains the storage adapter, which is the concrete implementation
//! of the `StoryRepository` port from the `core` crate. The whole collection lives
//! in memory and is rewritten to a single pretty-printed JSON file after every
//! mutation. Concurrent writers from separate processes race; the last write wins.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use story_writer_core::domain::{sort_newest_first, ExportFormat, StoryRecord, StoryStats};
use story_writer_core::export::render_story;
use story_writer_core::ports::{PortError, PortResult, StoryRepository};
use tokio::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

/// What to do when the backing file exists but cannot be read or parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnLoadError {
    /// Start with an empty collection. The next write replaces the bad file.
    ResetToEmpty,
    /// Refuse to open the store.
    Fail,
}

impl FromStr for OnLoadError {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "reset" | "reset_to_empty" | "resettoempty" => Ok(OnLoadError::ResetToEmpty),
            "fail" => Ok(OnLoadError::Fail),
            other => Err(format!("'{}' is not one of 'reset' or 'fail'", other)),
        }
    }
}

impl fmt::Display for OnLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OnLoadError::ResetToEmpty => f.write_str("reset"),
            OnLoadError::Fail => f.write_str("fail"),
        }
    }
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A JSON-file story store that implements the `StoryRepository` port.
pub struct JsonStoryStore {
    path: PathBuf,
    stories: Mutex<Vec<StoryRecord>>,
}

impl JsonStoryStore {
    /// Opens the store, loading the backing file when it exists.
    ///
    /// A missing file is an empty collection. An unreadable or malformed file is
    /// handled according to `on_load_error`.
    pub async fn open(path: impl Into<PathBuf>, on_load_error: OnLoadError) -> PortResult<Self> {
        let path = path.into();
        let stories = match load_records(&path).await {
            Ok(stories) => stories,
            Err(e) => match on_load_error {
                OnLoadError::ResetToEmpty => {
                    warn!(
                        "Ignoring unreadable story file {}, starting empty: {}",
                        path.display(),
                        e
                    );
                    Vec::new()
                }
                OnLoadError::Fail => return Err(e),
            },
        };
        debug!(count = stories.len(), "Loaded stories from {}", path.display());

        Ok(Self {
            path,
            stories: Mutex::new(stories),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rewrites the whole file. The in-memory collection is not rolled back on failure.
    async fn persist(&self, stories: &[StoryRecord]) -> PortResult<()> {
        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await.map_err(|e| {
                PortError::Storage(format!("cannot create {}: {}", dir.display(), e))
            })?;
        }

        let documents: Vec<StoredStory> = stories.iter().map(StoredStory::from_domain).collect();
        let json = serde_json::to_string_pretty(&documents)
            .map_err(|e| PortError::Storage(e.to_string()))?;

        tokio::fs::write(&self.path, json).await.map_err(|e| {
            PortError::Storage(format!("cannot write {}: {}", self.path.display(), e))
        })?;
        debug!(count = stories.len(), "Persisted stories to {}", self.path.display());
        Ok(())
    }
}

async fn load_records(path: &Path) -> PortResult<Vec<StoryRecord>> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(PortError::Storage(format!(
                "cannot read {}: {}",
                path.display(),
                e
            )))
        }
    };

    let documents: Vec<StoredStory> = serde_json::from_str(&raw).map_err(|e| {
        PortError::Storage(format!("malformed story file {}: {}", path.display(), e))
    })?;
    Ok(documents.into_iter().map(StoredStory::to_domain).collect())
}

//=========================================================================================
// "Impure" On-Disk Record Struct
//=========================================================================================

#[derive(Serialize, Deserialize)]
struct StoredStory {
    id: Uuid,
    prompt: String,
    content: String,
    genre: String,
    tone: String,
    length: String,
    language: String,
    created_at: DateTime<Utc>,
    #[serde(default)]
    favorite: bool,
    word_count: usize,
}

impl StoredStory {
    fn from_domain(record: &StoryRecord) -> Self {
        Self {
            id: record.id,
            prompt: record.prompt.clone(),
            content: record.content.clone(),
            genre: record.genre.clone(),
            tone: record.tone.clone(),
            length: record.length.clone(),
            language: record.language.clone(),
            created_at: record.created_at,
            favorite: record.favorite,
            word_count: record.word_count,
        }
    }

    fn to_domain(self) -> StoryRecord {
        StoryRecord {
            id: self.id,
            prompt: self.prompt,
            content: self.content,
            genre: self.genre,
            tone: self.tone,
            length: self.length,
            language: self.language,
            created_at: self.created_at,
            favorite: self.favorite,
            word_count: self.word_count,
        }
    }
}

//=========================================================================================
// `StoryRepository` Trait Implementation
//=========================================================================================

#[async_trait]
impl StoryRepository for JsonStoryStore {
    async fn append(&self, record: StoryRecord) -> PortResult<()> {
        let mut stories = self.stories.lock().await;
        debug!(story_id = %record.id, "Appending story");
        stories.push(record);
        self.persist(&stories).await
    }

    async fn get(&self, id: Uuid) -> PortResult<Option<StoryRecord>> {
        let stories = self.stories.lock().await;
        Ok(stories.iter().find(|story| story.id == id).cloned())
    }

    async fn delete(&self, id: Uuid) -> PortResult<bool> {
        let mut stories = self.stories.lock().await;
        let Some(index) = stories.iter().position(|story| story.id == id) else {
            return Ok(false);
        };
        stories.remove(index);
        debug!(story_id = %id, "Deleted story");
        self.persist(&stories).await?;
        Ok(true)
    }

    async fn toggle_favorite(&self, id: Uuid) -> PortResult<Option<StoryRecord>> {
        let mut stories = self.stories.lock().await;
        let Some(story) = stories.iter_mut().find(|story| story.id == id) else {
            return Ok(None);
        };
        story.favorite = !story.favorite;
        let updated = story.clone();
        debug!(story_id = %id, favorite = updated.favorite, "Toggled favorite");
        self.persist(&stories).await?;
        Ok(Some(updated))
    }

    async fn list_all(&self) -> PortResult<Vec<StoryRecord>> {
        let mut all = self.stories.lock().await.clone();
        sort_newest_first(&mut all);
        Ok(all)
    }

    async fn search(&self, query: &str) -> PortResult<Vec<StoryRecord>> {
        let needle = query.to_lowercase();
        let mut matches: Vec<StoryRecord> = self
            .stories
            .lock()
            .await
            .iter()
            .filter(|story| story.matches(&needle))
            .cloned()
            .collect();
        sort_newest_first(&mut matches);
        Ok(matches)
    }

    async fn favorites(&self) -> PortResult<Vec<StoryRecord>> {
        let stories = self.stories.lock().await;
        Ok(stories.iter().filter(|story| story.favorite).cloned().collect())
    }

    async fn stats(&self) -> PortResult<StoryStats> {
        let stories = self.stories.lock().await;
        Ok(StoryStats::from_records(stories.iter()))
    }

    async fn export(&self, id: Uuid, format: ExportFormat) -> PortResult<Option<String>> {
        Ok(self.get(id).await?.map(|story| render_story(&story, format)))
    }
}
