//! services/story_writer/src/error.rs
//!
//! Defines the primary error type for the story writer service.

use crate::config::ConfigError;
use story_writer_core::ports::PortError;

/// The primary error type for the `story_writer` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// Represents an error while rendering the dashboard template.
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    /// Represents an error while reading interactive terminal input.
    #[error("Terminal input error: {0}")]
    Prompt(#[from] dialoguer::Error),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}
