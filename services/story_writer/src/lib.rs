//! services/story_writer/src/lib.rs
//!
//! The StoryWriter service: the completion and storage adapters, the HTTP
//! API with its dashboard, and the terminal client.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod error;
pub mod web;
