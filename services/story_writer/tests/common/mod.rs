//! Shared fixtures for the story_writer integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use futures::stream;
use std::sync::Arc;
use story_writer_core::{
    FragmentStream, PortError, PortResult, StoryCatalog, StoryGenerationService, StoryRecord,
    StoryRequest, StoryWriter,
};
use story_writer_lib::{
    adapters::{JsonStoryStore, OnLoadError},
    config::Config,
    web::AppState,
};
use tempfile::TempDir;

/// A generator that answers every request with the same scripted text.
pub struct ScriptedGenerator {
    fragments: Vec<String>,
    fail_after: Option<usize>,
}

impl ScriptedGenerator {
    pub fn new(fragments: &[&str]) -> Self {
        Self {
            fragments: fragments.iter().map(|f| f.to_string()).collect(),
            fail_after: None,
        }
    }

    /// Streams the first `count` fragments, then fails.
    pub fn failing_after(fragments: &[&str], count: usize) -> Self {
        Self {
            fail_after: Some(count),
            ..Self::new(fragments)
        }
    }
}

#[async_trait]
impl StoryGenerationService for ScriptedGenerator {
    async fn generate_story(&self, _instruction: &str) -> PortResult<String> {
        if self.fail_after.is_some() {
            return Err(PortError::Generation("quota exceeded".to_string()));
        }
        Ok(self.fragments.concat())
    }

    async fn generate_story_streaming(&self, _instruction: &str) -> PortResult<FragmentStream> {
        let mut items: Vec<PortResult<String>> = self.fragments.iter().cloned().map(Ok).collect();
        if let Some(count) = self.fail_after {
            items.truncate(count);
            items.push(Err(PortError::Generation("connection reset".to_string())));
        }
        Ok(Box::pin(stream::iter(items)))
    }
}

pub fn story_file(dir: &TempDir) -> std::path::PathBuf {
    dir.path().join("stories.json")
}

pub async fn open_store(dir: &TempDir) -> JsonStoryStore {
    JsonStoryStore::open(story_file(dir), OnLoadError::Fail)
        .await
        .expect("store should open")
}

pub fn test_config(dir: &TempDir) -> Config {
    let stories_dir = dir.path().to_string_lossy().to_string();
    Config::from_lookup(|key| match key {
        "STORIES_DIR" => Some(stories_dir.clone()),
        "OPENAI_API_KEY" => Some("test-key".to_string()),
        _ => None,
    })
    .expect("config should load")
}

/// Application state over a fresh temp-dir store and the given generator.
pub async fn app_state(dir: &TempDir, generator: ScriptedGenerator) -> Arc<AppState> {
    let store = open_store(dir).await;
    let writer = StoryWriter::new(Arc::new(generator), Arc::new(store), StoryCatalog::default());
    Arc::new(
        AppState::new(Arc::new(test_config(dir)), Arc::new(writer))
            .expect("state should build"),
    )
}

pub fn request(prompt: &str, genre: &str) -> StoryRequest {
    StoryRequest {
        prompt: prompt.to_string(),
        genre: genre.to_string(),
        tone: "Serious".to_string(),
        length: "short".to_string(),
        language: "English".to_string(),
    }
}

/// A record with `words` words of content.
pub fn record(prompt: &str, genre: &str, words: usize) -> StoryRecord {
    let content = vec!["word"; words].join(" ");
    StoryRecord::new(&request(prompt, genre), content)
}
