//! services/story_writer/src/cli/commands.rs
//!
//! Parsing of the lines typed at the `StoryWriter>` prompt.

/// A command entered in the interactive terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// Start an interactive generation, optionally with the idea already given.
    Generate(Option<String>),
    List,
    Search(String),
    Favorites,
    Stats,
    Examples,
    Config,
    Help,
    Exit,
    Empty,
    Unknown(String),
}

impl ReplCommand {
    /// Parses one input line. The command word is case-insensitive.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return ReplCommand::Empty;
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_lowercase().as_str() {
            "generate" if rest.is_empty() => ReplCommand::Generate(None),
            "generate" => ReplCommand::Generate(Some(rest.to_string())),
            "list" => ReplCommand::List,
            "search" if !rest.is_empty() => ReplCommand::Search(rest.to_string()),
            "favorites" => ReplCommand::Favorites,
            "stats" => ReplCommand::Stats,
            "examples" => ReplCommand::Examples,
            "config" => ReplCommand::Config,
            "help" => ReplCommand::Help,
            "exit" | "quit" | "q" => ReplCommand::Exit,
            _ => ReplCommand::Unknown(line.to_string()),
        }
    }
}
