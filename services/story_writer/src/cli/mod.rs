//! services/story_writer/src/cli/mod.rs
//!
//! Command-line flags and the interactive terminal client.

pub mod commands;
pub mod render;
pub mod repl;

pub use commands::ReplCommand;
pub use repl::{quick_generate, run_repl, stream_into};

use clap::Parser;
use story_writer_core::StoryRequest;

/// StoryWriter - AI creative writing assistant.
#[derive(Debug, Parser)]
#[command(name = "story_writer", version, about)]
pub struct Cli {
    /// Serve the HTTP API and the web dashboard
    #[arg(long)]
    pub web: bool,

    /// Run the interactive terminal client (the default)
    #[arg(long)]
    pub terminal: bool,

    /// Generate one story from this idea, print it and exit
    #[arg(long, value_name = "PROMPT")]
    pub quick: Option<String>,

    /// Genre used by --quick
    #[arg(long, default_value = "Fantasy")]
    pub genre: String,

    /// Tone used by --quick
    #[arg(long, default_value = "Serious")]
    pub tone: String,

    /// Length key used by --quick (short, medium, long)
    #[arg(long, default_value = "medium")]
    pub length: String,

    /// Language used by --quick
    #[arg(long, default_value = "English")]
    pub language: String,
}

/// What the process should do, after flag precedence is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    Web,
    Quick(StoryRequest),
    Terminal,
}

impl Cli {
    /// `--web` wins over `--quick`, which wins over the terminal client.
    pub fn mode(self) -> RunMode {
        if self.web {
            return RunMode::Web;
        }
        match self.quick {
            Some(prompt) => RunMode::Quick(StoryRequest {
                prompt,
                genre: self.genre,
                tone: self.tone,
                length: self.length,
                language: self.language,
            }),
            None => RunMode::Terminal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("story_writer").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    #[test]
    fn no_flags_runs_the_terminal_client() {
        assert_eq!(parse(&[]).mode(), RunMode::Terminal);
        assert_eq!(parse(&["--terminal"]).mode(), RunMode::Terminal);
    }

    #[test]
    fn quick_uses_the_default_options() {
        let mode = parse(&["--quick", "A robot learning to love"]).mode();
        assert_eq!(
            mode,
            RunMode::Quick(StoryRequest {
                prompt: "A robot learning to love".to_string(),
                genre: "Fantasy".to_string(),
                tone: "Serious".to_string(),
                length: "medium".to_string(),
                language: "English".to_string(),
            })
        );
    }

    #[test]
    fn quick_accepts_story_options() {
        let mode = parse(&[
            "--quick",
            "A cat who runs a bakery",
            "--genre",
            "Comedy",
            "--tone",
            "Whimsical",
            "--length",
            "short",
            "--language",
            "French",
        ])
        .mode();
        let RunMode::Quick(request) = mode else {
            panic!("expected quick mode");
        };
        assert_eq!(request.genre, "Comedy");
        assert_eq!(request.tone, "Whimsical");
        assert_eq!(request.length, "short");
        assert_eq!(request.language, "French");
    }

    #[test]
    fn web_takes_precedence() {
        assert_eq!(parse(&["--web", "--quick", "idea"]).mode(), RunMode::Web);
        assert_eq!(parse(&["--web", "--terminal"]).mode(), RunMode::Web);
    }
}
