//! crates/story_writer_core/src/catalog.rs
//!
//! The fixed set of choices offered to the user when requesting a story.

/// A named length category and the word-count range the model is asked to hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthBucket {
    pub key: &'static str,
    pub min_words: u32,
    pub max_words: u32,
    pub label: &'static str,
}

pub const MEDIUM: LengthBucket = LengthBucket {
    key: "medium",
    min_words: 300,
    max_words: 600,
    label: "Medium (300-600 words)",
};

const LENGTHS: &[LengthBucket] = &[
    LengthBucket {
        key: "short",
        min_words: 100,
        max_words: 300,
        label: "Short (100-300 words)",
    },
    MEDIUM,
    LengthBucket {
        key: "long",
        min_words: 600,
        max_words: 1000,
        label: "Long (600+ words)",
    },
];

const GENRES: &[&str] = &["Fantasy", "Sci-Fi", "Mystery", "Romance", "Horror", "Children's"];

const TONES: &[&str] = &["Serious", "Funny", "Inspirational", "Dramatic"];

const LANGUAGES: &[&str] = &["English", "Urdu", "Arabic", "Spanish", "French", "German"];

const EXAMPLE_PROMPTS: &[&str] = &[
    "A dragon who wanted to become a chef",
    "A robot learning to love in a world without emotions",
    "A detective solving crimes in a haunted mansion",
    "Two strangers meeting on a train to nowhere",
    "A child discovering a magical door in their closet",
    "An astronaut finding signs of ancient civilization on Mars",
];

/// The configured enumerations shared by every front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoryCatalog {
    pub genres: &'static [&'static str],
    pub tones: &'static [&'static str],
    pub lengths: &'static [LengthBucket],
    pub languages: &'static [&'static str],
    pub example_prompts: &'static [&'static str],
}

impl Default for StoryCatalog {
    fn default() -> Self {
        Self {
            genres: GENRES,
            tones: TONES,
            lengths: LENGTHS,
            languages: LANGUAGES,
            example_prompts: EXAMPLE_PROMPTS,
        }
    }
}

impl StoryCatalog {
    /// Looks up a length bucket by key. Unknown keys fall back to "medium".
    pub fn length_bucket(&self, key: &str) -> &LengthBucket {
        self.lengths
            .iter()
            .find(|bucket| bucket.key == key)
            .or_else(|| self.lengths.iter().find(|bucket| bucket.key == MEDIUM.key))
            .unwrap_or(&MEDIUM)
    }

    pub fn default_genre(&self) -> &'static str {
        self.genres.first().copied().unwrap_or("Fantasy")
    }

    pub fn default_tone(&self) -> &'static str {
        self.tones.first().copied().unwrap_or("Serious")
    }

    pub fn default_language(&self) -> &'static str {
        self.languages.first().copied().unwrap_or("English")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_keys_resolve_to_their_bucket() {
        let catalog = StoryCatalog::default();
        assert_eq!(catalog.length_bucket("short").min_words, 100);
        assert_eq!(catalog.length_bucket("long").max_words, 1000);
    }

    #[test]
    fn unknown_key_falls_back_to_medium() {
        let catalog = StoryCatalog::default();
        assert_eq!(*catalog.length_bucket("epic"), MEDIUM);
        assert_eq!(*catalog.length_bucket(""), MEDIUM);
    }

    #[test]
    fn catalog_without_medium_still_falls_back() {
        let catalog = StoryCatalog {
            lengths: &[],
            ..StoryCatalog::default()
        };
        assert_eq!(catalog.length_bucket("short").key, "medium");
    }
}
