//! services/story_writer/src/cli/repl.rs
//!
//! The interactive `StoryWriter>` loop and the one-shot `--quick` mode.

use crate::cli::commands::ReplCommand;
use crate::cli::render;
use crate::config::Config;
use crate::error::ApiError;
use dialoguer::{Input, Select};
use std::io::{self, BufRead, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use story_writer_core::{
    StoryCatalog, StoryRecord, StoryRepository, StoryRequest, StoryStream, StoryWriter,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

const PROMPT: &str = "StoryWriter> ";

/// Routes Ctrl+C for the whole terminal session. A press cancels the
/// generation in progress; at the prompt it is only reported.
#[derive(Clone, Default)]
pub struct Interrupts {
    active: Arc<Mutex<Option<CancellationToken>>>,
}

impl Interrupts {
    /// Installs the process-wide Ctrl+C listener.
    pub fn install() -> Self {
        let interrupts = Self::default();
        let listener = interrupts.clone();
        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                if !listener.interrupt() {
                    println!("\n⚠️  Operation cancelled. Type 'exit' to quit.");
                }
            }
        });
        interrupts
    }

    /// Registers a new generation. The next Ctrl+C cancels the returned token.
    pub fn begin(&self) -> CancellationToken {
        let token = CancellationToken::new();
        *self.lock() = Some(token.clone());
        token
    }

    pub fn end(&self) {
        self.lock().take();
    }

    /// Cancels the registered generation. `false` when none was running.
    pub fn interrupt(&self) -> bool {
        match self.lock().take() {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<CancellationToken>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Runs the interactive client until the user exits or stdin closes.
///
/// A failing command is reported and the loop keeps going.
pub async fn run_repl(writer: &StoryWriter, config: &Config) -> Result<(), ApiError> {
    println!("{}", render::BANNER);
    println!("{}", render::HELP);

    let interrupts = Interrupts::install();
    loop {
        let Some(line) = read_command_line().await? else {
            println!();
            break;
        };

        let outcome = match ReplCommand::parse(&line) {
            ReplCommand::Exit => break,
            ReplCommand::Empty => continue,
            ReplCommand::Generate(idea) => {
                interactive_generate(writer, idea, &interrupts).await
            }
            command => {
                let mut stdout = io::stdout();
                run_command(command, writer, config, &mut stdout).await
            }
        };

        if let Err(e) = outcome {
            warn!("Terminal command failed: {:?}", e);
            eprintln!("❌ Error: {}", e);
        }
    }

    println!("Goodbye! Happy writing!");
    Ok(())
}

/// Streams one story to stdout and exits. Used by `--quick`.
pub async fn quick_generate(writer: &StoryWriter, request: StoryRequest) -> Result<(), ApiError> {
    println!("{}", render::BANNER);
    println!(
        "Generating a {} {} story ({}, {})...\n{}",
        request.tone.to_lowercase(),
        request.genre.to_lowercase(),
        request.length,
        request.language,
        render::RULE
    );
    stream_to_terminal(writer, request, &Interrupts::install()).await
}

/// Executes every command that does not need interactive input.
pub async fn run_command<W: Write>(
    command: ReplCommand,
    writer: &StoryWriter,
    config: &Config,
    out: &mut W,
) -> Result<(), ApiError> {
    let stories = writer.stories();
    let text = match command {
        ReplCommand::List => render::story_list(&stories.list_all().await?),
        ReplCommand::Search(query) => {
            render::search_results(&query, &stories.search(&query).await?)
        }
        ReplCommand::Favorites => render::favorites(&stories.favorites().await?),
        ReplCommand::Stats => render::stats(&stories.stats().await?),
        ReplCommand::Examples => render::examples(writer.catalog()),
        ReplCommand::Config => render::settings(config),
        ReplCommand::Help => render::HELP.to_string(),
        ReplCommand::Unknown(line) => {
            format!("Unknown command: {}\nType 'help' for available commands\n", line)
        }
        ReplCommand::Generate(_) | ReplCommand::Exit | ReplCommand::Empty => String::new(),
    };
    write!(out, "{}", text)?;
    out.flush()?;
    Ok(())
}

/// Prints fragments to `out` as they arrive and saves the story once the
/// stream has ended.
///
/// Returns `Ok(None)` when `cancel` fires first; the partial story is dropped.
pub async fn stream_into<W: Write>(
    mut stream: StoryStream,
    out: &mut W,
    cancel: &CancellationToken,
) -> Result<Option<StoryRecord>, ApiError> {
    let completed = loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break false,
            fragment = stream.next_fragment() => match fragment {
                Some(Ok(text)) => {
                    write!(out, "{}", text)?;
                    out.flush()?;
                }
                Some(Err(e)) => return Err(e.into()),
                None => break true,
            },
        }
    };

    if !completed {
        let partial = stream.abort();
        debug!(discarded = partial.len(), "Streamed story cancelled");
        return Ok(None);
    }

    Ok(Some(stream.finish().await?))
}

async fn interactive_generate(
    writer: &StoryWriter,
    idea: Option<String>,
    interrupts: &Interrupts,
) -> Result<(), ApiError> {
    let catalog = *writer.catalog();
    let request = tokio::task::spawn_blocking(move || ask_story_request(&catalog, idea))
        .await
        .map_err(|e| ApiError::Internal(format!("Prompt task failed: {e}")))??;

    let Some(request) = request else {
        return Ok(());
    };

    println!("\nGenerating your story...\n{}", render::RULE);
    stream_to_terminal(writer, request, interrupts).await
}

/// Asks for the idea and the story options. `None` when the idea is empty or
/// the user backs out of a selection.
fn ask_story_request(
    catalog: &StoryCatalog,
    idea: Option<String>,
) -> Result<Option<StoryRequest>, ApiError> {
    let prompt = match idea {
        Some(idea) => idea,
        None => Input::<String>::new()
            .with_prompt("Enter your story idea")
            .allow_empty(true)
            .interact_text()?,
    };
    let prompt = prompt.trim().to_string();
    if prompt.is_empty() {
        eprintln!("❌ Please enter a story idea.");
        return Ok(None);
    }

    let Some((genre, tone, length, language)) = choose_options(catalog)? else {
        println!("Generation cancelled.");
        return Ok(None);
    };

    Ok(Some(StoryRequest {
        prompt,
        genre,
        tone,
        length,
        language,
    }))
}

fn choose_options(
    catalog: &StoryCatalog,
) -> Result<Option<(String, String, String, String)>, dialoguer::Error> {
    let Some(genre) = select_one("Genre", catalog.genres, catalog.default_genre())? else {
        return Ok(None);
    };
    let Some(tone) = select_one("Tone", catalog.tones, catalog.default_tone())? else {
        return Ok(None);
    };

    let length_labels: Vec<String> = catalog
        .lengths
        .iter()
        .map(|bucket| bucket.label.to_string())
        .collect();
    let default_length = catalog
        .lengths
        .iter()
        .position(|bucket| bucket.key == "medium")
        .unwrap_or(0);
    let Some(length) = Select::new()
        .with_prompt("Length")
        .items(&length_labels)
        .default(default_length)
        .interact_opt()?
    else {
        return Ok(None);
    };

    let Some(language) = select_one("Language", catalog.languages, catalog.default_language())?
    else {
        return Ok(None);
    };

    Ok(Some((genre, tone, catalog.lengths[length].key.to_string(), language)))
}

fn select_one(
    title: &str,
    options: &[&'static str],
    default: &str,
) -> Result<Option<String>, dialoguer::Error> {
    let default = options.iter().position(|o| *o == default).unwrap_or(0);
    let choice = Select::new()
        .with_prompt(title)
        .items(options)
        .default(default)
        .interact_opt()?;
    Ok(choice.map(|i| options[i].to_string()))
}

/// Streams a story to stdout. Ctrl+C cancels the generation.
async fn stream_to_terminal(
    writer: &StoryWriter,
    request: StoryRequest,
    interrupts: &Interrupts,
) -> Result<(), ApiError> {
    let stream = writer.stream_story(request).await?;

    let cancel = interrupts.begin();
    let mut stdout = io::stdout();
    let outcome = stream_into(stream, &mut stdout, &cancel).await;
    interrupts.end();

    match outcome? {
        Some(story) => println!(
            "\n{}\n✅ Story saved ({} words, id {})",
            render::RULE,
            story.word_count,
            story.short_id()
        ),
        None => println!("\n{}\n⚠️  Operation cancelled. Nothing was saved.", render::RULE),
    }
    Ok(())
}

/// Reads one line from stdin off the async runtime. `None` at end of input.
async fn read_command_line() -> Result<Option<String>, ApiError> {
    tokio::task::spawn_blocking(|| -> io::Result<Option<String>> {
        print!("{}", PROMPT);
        io::stdout().flush()?;
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line)? {
            0 => Ok(None),
            _ => Ok(Some(line)),
        }
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Input task failed: {e}")))?
    .map_err(ApiError::from)
}
