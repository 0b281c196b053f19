//! crates/story_writer_core/src/prompt.rs
//!
//! Turns a user's story request into the instruction sent to the model.

use crate::catalog::StoryCatalog;
use crate::domain::StoryRequest;

/// The system role line sent alongside every instruction.
pub const SYSTEM_PROMPT: &str = "You are a creative story writer.";

/// Builds the instruction for a story request.
///
/// Genre, tone and language are not checked against the catalog; they are
/// embedded as given. An unknown length key uses the medium word range.
pub fn build_story_prompt(request: &StoryRequest, catalog: &StoryCatalog) -> String {
    let bucket = catalog.length_bucket(&request.length);

    format!(
        "You are a creative story writer. Write an engaging {genre} story with a {tone} tone.

Guidelines:
- Write the story in {language}
- Target length: {min}-{max} words
- Create vivid characters and settings
- Include a clear beginning, middle, and end
- Make the story engaging and memorable
- Match the tone consistently throughout

User's story idea: {prompt}

Write the story now:",
        genre = request.genre.to_lowercase(),
        tone = request.tone.to_lowercase(),
        language = request.language,
        min = bucket.min_words,
        max = bucket.max_words,
        prompt = request.prompt,
    )
}
