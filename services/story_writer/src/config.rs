//! services/story_writer/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use crate::adapters::json_store::OnLoadError;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::Level;

pub const STORIES_FILE_NAME: &str = "stories.json";

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: Level,
    pub stories_dir: PathBuf,
    pub on_load_error: OnLoadError,
    pub openai_api_key: Option<String>,
    pub openai_base_url: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any variable lookup, e.g. a map in tests.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        // --- Server Settings ---
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = parse_or("PORT", lookup("PORT"), 8036u16)?;

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Storage Settings ---
        let stories_dir = lookup("STORIES_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("stories"));
        let on_load_error = parse_or(
            "STORIES_ON_LOAD_ERROR",
            lookup("STORIES_ON_LOAD_ERROR"),
            OnLoadError::ResetToEmpty,
        )?;

        // --- Completion API Settings ---
        let openai_api_key = lookup("OPENAI_API_KEY").filter(|key| !key.trim().is_empty());
        let openai_base_url = lookup("OPENAI_BASE_URL");
        let model = lookup("OPENAI_MODEL").unwrap_or_else(|| "gpt-4".to_string());
        let temperature = parse_or("STORY_TEMPERATURE", lookup("STORY_TEMPERATURE"), 0.8f32)?;
        let max_tokens = parse_or("STORY_MAX_TOKENS", lookup("STORY_MAX_TOKENS"), 2000u32)?;

        Ok(Self {
            host,
            port,
            log_level,
            stories_dir,
            on_load_error,
            openai_api_key,
            openai_base_url,
            model,
            temperature,
            max_tokens,
        })
    }

    /// The JSON document holding every story.
    pub fn stories_file(&self) -> PathBuf {
        self.stories_dir.join(STORIES_FILE_NAME)
    }

    /// The credential, required by every path that generates stories.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.openai_api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingVar("OPENAI_API_KEY".to_string()))
    }
}

fn parse_or<T>(name: &str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidValue(name.to_string(), e.to_string())),
        None => Ok(default),
    }
}
