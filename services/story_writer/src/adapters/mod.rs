pub mod json_store;
pub mod story_llm;

pub use json_store::{JsonStoryStore, OnLoadError};
pub use story_llm::OpenAiStoryAdapter;
