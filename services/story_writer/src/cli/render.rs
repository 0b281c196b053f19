//! services/story_writer/src/cli/render.rs
//!
//! Plain-text views printed by the terminal client.

use crate::config::Config;
use std::fmt::Write;
use story_writer_core::{StoryCatalog, StoryRecord, StoryStats};

pub const BANNER: &str = r#"
╔══════════════════════════════════════════════════════════╗
║                                                          ║
║   StoryWriter - AI Creative Writing Assistant            ║
║                                                          ║
╚══════════════════════════════════════════════════════════╝
"#;

pub const HELP: &str = r#"
Available Commands:
  generate [idea]   - Generate a new story interactively
  list              - Display all saved stories
  search <query>    - Search stories by content, prompt or genre
  favorites         - Show favorite stories
  stats             - Display writing statistics
  examples          - Show example prompts
  config            - View current settings
  help              - Show this help message
  exit/quit         - Exit the application

Keyboard Shortcuts:
  Ctrl+C            - Cancel the story being generated
"#;

pub const RULE: &str = "────────────────────────────────────────────────────────────";

fn star(record: &StoryRecord) -> &'static str {
    if record.favorite {
        "★"
    } else {
        "☆"
    }
}

fn excerpt(text: &str, max_chars: usize) -> String {
    let mut short: String = text.chars().take(max_chars).collect();
    if text.chars().count() > max_chars {
        short.push_str("...");
    }
    short
}

pub fn story_list(stories: &[StoryRecord]) -> String {
    if stories.is_empty() {
        return "\nNo stories found. Generate your first story!\n".to_string();
    }

    let mut out = format!("\n=== Your Stories ({} total) ===\n\n", stories.len());
    for story in stories {
        let _ = writeln!(
            out,
            "  {} [{}] {} | {} | {} words",
            star(story),
            story.short_id(),
            story.genre,
            story.tone,
            story.word_count
        );
        let _ = writeln!(out, "    Prompt: {}\n", excerpt(&story.prompt, 50));
    }
    out
}

pub fn search_results(query: &str, stories: &[StoryRecord]) -> String {
    if stories.is_empty() {
        return format!("\nNo stories found matching '{}'\n", query);
    }

    let mut out = format!("\n=== Search Results ({} found) ===\n\n", stories.len());
    for story in stories {
        let _ = writeln!(
            out,
            "  {} [{}] {} | {}",
            star(story),
            story.short_id(),
            story.genre,
            excerpt(&story.prompt, 40)
        );
    }
    out
}

pub fn favorites(stories: &[StoryRecord]) -> String {
    if stories.is_empty() {
        return "\nNo favorite stories yet.\n".to_string();
    }

    let mut out = format!("\n=== Favorite Stories ({}) ===\n\n", stories.len());
    for story in stories {
        let _ = writeln!(
            out,
            "  ★ [{}] {} | {}",
            story.short_id(),
            story.genre,
            excerpt(&story.prompt, 40)
        );
    }
    out
}

pub fn stats(stats: &StoryStats) -> String {
    let mut out = String::from("\n=== Writing Statistics ===\n\n");
    let _ = writeln!(out, "  Total Stories: {}", stats.total_stories);
    let _ = writeln!(out, "  Total Words: {}", stats.total_words);
    let _ = writeln!(out, "  Average Words/Story: {}", stats.average_words);
    let _ = writeln!(out, "  Favorites: {}", stats.favorites);

    for (title, counts) in [
        ("Genres", &stats.genres),
        ("Tones", &stats.tones),
        ("Languages", &stats.languages),
    ] {
        if counts.is_empty() {
            continue;
        }
        let _ = writeln!(out, "\n  {}:", title);
        for (name, count) in counts {
            let _ = writeln!(out, "    {}: {}", name, count);
        }
    }
    out
}

pub fn examples(catalog: &StoryCatalog) -> String {
    let mut out = String::from("\n=== Example Prompts ===\n\n");
    for (i, example) in catalog.example_prompts.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", i + 1, example);
    }
    out
}

pub fn settings(config: &Config) -> String {
    format!(
        "\n=== Configuration ===\n\n  Model: {}\n  Host: {}\n  Port: {}\n  Stories Dir: {}\n",
        config.model,
        config.host,
        config.port,
        config.stories_dir.display()
    )
}
