//! crates/story_writer_core/src/export.rs
//!
//! Fixed plain-text and markdown templates for downloading a story.

use crate::domain::{ExportFormat, StoryRecord};

/// Renders a record into the requested export format.
pub fn render_story(record: &StoryRecord, format: ExportFormat) -> String {
    let created = record.created_at.to_rfc3339();
    let favorite = if record.favorite { "yes" } else { "no" };

    match format {
        ExportFormat::Text => format!(
            "Title: Story by StoryWriter\n\
             ID: {id}\n\
             Genre: {genre}\n\
             Tone: {tone}\n\
             Length: {length}\n\
             Language: {language}\n\
             Created: {created}\n\
             Words: {words}\n\
             Favorite: {favorite}\n\
             Prompt: {prompt}\n\
             \n\
             ---\n\
             \n\
             {content}\n",
            id = record.id,
            genre = record.genre,
            tone = record.tone,
            length = record.length,
            language = record.language,
            words = record.word_count,
            prompt = record.prompt,
            content = record.content,
        ),
        ExportFormat::Markdown => format!(
            "# Story by StoryWriter\n\
             \n\
             **ID:** {id}  \n\
             **Genre:** {genre}  \n\
             **Tone:** {tone}  \n\
             **Length:** {length}  \n\
             **Language:** {language}  \n\
             **Created:** {created}  \n\
             **Words:** {words}  \n\
             **Favorite:** {favorite}\n\
             \n\
             > *Prompt: {prompt}*\n\
             \n\
             ---\n\
             \n\
             {content}\n",
            id = record.id,
            genre = record.genre,
            tone = record.tone,
            length = record.length,
            language = record.language,
            words = record.word_count,
            prompt = record.prompt,
            content = record.content,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn record() -> StoryRecord {
        StoryRecord {
            id: Uuid::new_v4(),
            prompt: "Two strangers on a train".to_string(),
            content: "The train hummed through the night.".to_string(),
            genre: "Mystery".to_string(),
            tone: "Dramatic".to_string(),
            length: "short".to_string(),
            language: "Spanish".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 3, 9, 18, 30, 0).unwrap(),
            favorite: true,
            word_count: 6,
        }
    }

    fn assert_embeds_every_field(rendered: &str, record: &StoryRecord) {
        for field in [
            record.id.to_string(),
            record.prompt.clone(),
            record.content.clone(),
            record.genre.clone(),
            record.tone.clone(),
            record.length.clone(),
            record.language.clone(),
            record.created_at.to_rfc3339(),
            record.word_count.to_string(),
        ] {
            assert!(rendered.contains(&field), "missing {field:?} in:\n{rendered}");
        }
    }

    #[test]
    fn text_export_embeds_every_field() {
        let record = record();
        let rendered = render_story(&record, ExportFormat::Text);
        assert!(rendered.starts_with("Title: Story by StoryWriter\n"));
        assert!(rendered.contains("Favorite: yes"));
        assert!(rendered.contains("Prompt: Two strangers on a train\n\n---\n\nThe train"));
        assert_embeds_every_field(&rendered, &record);
    }

    #[test]
    fn markdown_export_embeds_every_field() {
        let record = record();
        let rendered = render_story(&record, ExportFormat::Markdown);
        assert!(rendered.starts_with("# Story by StoryWriter\n\n"));
        assert!(rendered.contains("**Genre:** Mystery"));
        assert!(rendered.contains("> *Prompt: Two strangers on a train*"));
        assert!(rendered.contains("**Favorite:** yes"));
        assert_embeds_every_field(&rendered, &record);
    }
}
