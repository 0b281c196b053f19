//! services/story_writer/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use crate::error::ApiError;
use crate::web::dashboard;
use minijinja::Environment;
use std::sync::Arc;
use story_writer_core::{ports::StoryRepository, StoryWriter};

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub writer: Arc<StoryWriter>,
    pub templates: Arc<Environment<'static>>,
}

impl AppState {
    pub fn new(config: Arc<Config>, writer: Arc<StoryWriter>) -> Result<Self, ApiError> {
        Ok(Self {
            config,
            writer,
            templates: Arc::new(dashboard::template_env()?),
        })
    }

    pub fn stories(&self) -> &Arc<dyn StoryRepository> {
        self.writer.stories()
    }
}
