//! crates/story_writer_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any storage or serialization format.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// The parameters a user picks before a story is generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryRequest {
    pub prompt: String,
    pub genre: String,
    pub tone: String,
    pub length: String,
    pub language: String,
}

/// Represents one generated story and its metadata.
///
/// Only `favorite` changes after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryRecord {
    pub id: Uuid,
    pub prompt: String,
    pub content: String,
    pub genre: String,
    pub tone: String,
    pub length: String,
    pub language: String,
    pub created_at: DateTime<Utc>,
    pub favorite: bool,
    pub word_count: usize,
}

impl StoryRecord {
    /// Creates a fresh record for a finished generation.
    pub fn new(request: &StoryRequest, content: String) -> Self {
        let word_count = count_words(&content);
        Self {
            id: Uuid::new_v4(),
            prompt: request.prompt.clone(),
            content,
            genre: request.genre.clone(),
            tone: request.tone.clone(),
            length: request.length.clone(),
            language: request.language.clone(),
            created_at: Utc::now(),
            favorite: false,
            word_count,
        }
    }

    /// Case-insensitive substring match against content, prompt, or genre.
    ///
    /// `needle` must already be lower-cased.
    pub fn matches(&self, needle: &str) -> bool {
        self.content.to_lowercase().contains(needle)
            || self.prompt.to_lowercase().contains(needle)
            || self.genre.to_lowercase().contains(needle)
    }

    /// The first eight characters of the id, used in listings and file names.
    pub fn short_id(&self) -> String {
        self.id.to_string().chars().take(8).collect()
    }
}

/// Whitespace-delimited token count.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Orders records most recent first. The sort is stable, so records with equal
/// timestamps keep their insertion order.
pub fn sort_newest_first(records: &mut [StoryRecord]) {
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Aggregate numbers over a story collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoryStats {
    pub total_stories: usize,
    pub total_words: usize,
    pub favorites: usize,
    pub average_words: usize,
    pub genres: BTreeMap<String, usize>,
    pub tones: BTreeMap<String, usize>,
    pub languages: BTreeMap<String, usize>,
}

impl StoryStats {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a StoryRecord>) -> Self {
        let mut stats = Self::default();
        for record in records {
            stats.total_stories += 1;
            stats.total_words += record.word_count;
            if record.favorite {
                stats.favorites += 1;
            }
            *stats.genres.entry(record.genre.clone()).or_insert(0) += 1;
            *stats.tones.entry(record.tone.clone()).or_insert(0) += 1;
            *stats.languages.entry(record.language.clone()).or_insert(0) += 1;
        }
        if stats.total_stories > 0 {
            stats.average_words = stats.total_words / stats.total_stories;
        }
        stats
    }
}

/// The textual formats a story can be exported to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Text,
    Markdown,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Text => "txt",
            ExportFormat::Markdown => "md",
        }
    }

    pub fn media_type(&self) -> &'static str {
        match self {
            ExportFormat::Text => "text/plain",
            ExportFormat::Markdown => "text/markdown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported export format '{0}', expected 'txt' or 'md'")]
pub struct UnknownExportFormat(pub String);

impl FromStr for ExportFormat {
    type Err = UnknownExportFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "txt" => Ok(ExportFormat::Text),
            "md" => Ok(ExportFormat::Markdown),
            other => Err(UnknownExportFormat(other.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(genre: &str, words: usize, favorite: bool) -> StoryRecord {
        StoryRecord {
            id: Uuid::new_v4(),
            prompt: "idea".to_string(),
            content: "word ".repeat(words),
            genre: genre.to_string(),
            tone: "Serious".to_string(),
            length: "medium".to_string(),
            language: "English".to_string(),
            created_at: Utc::now(),
            favorite,
            word_count: words,
        }
    }

    #[test]
    fn word_count_splits_on_any_whitespace() {
        assert_eq!(count_words("  Once upon\ta\n time  "), 4);
        assert_eq!(count_words(""), 0);
    }

    #[test]
    fn new_record_derives_word_count_from_content() {
        let request = StoryRequest {
            prompt: "A dragon chef".to_string(),
            genre: "Fantasy".to_string(),
            tone: "Funny".to_string(),
            length: "short".to_string(),
            language: "English".to_string(),
        };
        let record = StoryRecord::new(&request, "The dragon cooked soup.".to_string());
        assert_eq!(record.word_count, 4);
        assert!(!record.favorite);
        assert_eq!(record.prompt, "A dragon chef");
        assert_eq!(record.short_id().len(), 8);
    }

    #[test]
    fn stats_on_empty_collection_are_zero() {
        let stats = StoryStats::from_records(&Vec::<StoryRecord>::new());
        assert_eq!(stats.total_stories, 0);
        assert_eq!(stats.average_words, 0);
        assert!(stats.genres.is_empty());
        assert!(stats.tones.is_empty());
        assert!(stats.languages.is_empty());
    }

    #[test]
    fn stats_sum_and_average_match_word_counts() {
        let records = vec![
            record("Fantasy", 100, true),
            record("Horror", 200, false),
            record("Fantasy", 300, false),
        ];
        let stats = StoryStats::from_records(&records);
        assert_eq!(stats.total_stories, 3);
        assert_eq!(stats.total_words, 600);
        assert_eq!(stats.average_words, 200);
        assert_eq!(stats.favorites, 1);
        assert_eq!(stats.genres.get("Fantasy"), Some(&2));
        assert_eq!(stats.genres.get("Horror"), Some(&1));
        assert_eq!(stats.tones.get("Serious"), Some(&3));
    }

    #[test]
    fn average_is_truncated() {
        let records = vec![record("Fantasy", 10, false), record("Fantasy", 5, false)];
        assert_eq!(StoryStats::from_records(&records).average_words, 7);
    }

    #[test]
    fn sort_is_newest_first_and_stable_on_ties() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let mut a = record("A", 1, false);
        a.created_at = t0;
        let mut b = record("B", 1, false);
        b.created_at = t1;
        let mut c = record("C", 1, false);
        c.created_at = t1;

        let mut records = vec![a, b, c];
        sort_newest_first(&mut records);
        let genres: Vec<_> = records.iter().map(|r| r.genre.as_str()).collect();
        assert_eq!(genres, ["B", "C", "A"]);
    }

    #[test]
    fn matching_ignores_case_across_fields() {
        let mut story = record("Fantasy", 3, false);
        story.prompt = "A Dragon who cooks".to_string();
        assert!(story.matches("dragon"));
        assert!(story.matches("fantasy"));
        assert!(!story.matches("spaceship"));
    }

    #[test]
    fn export_format_parses_known_extensions() {
        assert_eq!("txt".parse::<ExportFormat>(), Ok(ExportFormat::Text));
        assert_eq!("MD".parse::<ExportFormat>(), Ok(ExportFormat::Markdown));
        assert!("pdf".parse::<ExportFormat>().is_err());
    }
}
