//! crates/story_writer_core/src/generation.rs
//!
//! The generate-then-persist pipeline shared by the terminal client and the
//! HTTP service. A record is only ever written once the whole story exists.

use crate::catalog::StoryCatalog;
use crate::domain::{StoryRecord, StoryRequest};
use crate::ports::{FragmentStream, PortError, PortResult, StoryGenerationService, StoryRepository};
use crate::prompt::build_story_prompt;
use futures::StreamExt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Drives story generation and stores the finished stories.
#[derive(Clone)]
pub struct StoryWriter {
    generator: Arc<dyn StoryGenerationService>,
    stories: Arc<dyn StoryRepository>,
    catalog: StoryCatalog,
}

impl StoryWriter {
    pub fn new(
        generator: Arc<dyn StoryGenerationService>,
        stories: Arc<dyn StoryRepository>,
        catalog: StoryCatalog,
    ) -> Self {
        Self {
            generator,
            stories,
            catalog,
        }
    }

    pub fn catalog(&self) -> &StoryCatalog {
        &self.catalog
    }

    pub fn stories(&self) -> &Arc<dyn StoryRepository> {
        &self.stories
    }

    /// Generates a whole story in one call and appends it to the store.
    pub async fn write_story(&self, request: StoryRequest) -> PortResult<StoryRecord> {
        let instruction = build_story_prompt(&request, &self.catalog);
        let content = self.generator.generate_story(&instruction).await?;

        let record = StoryRecord::new(&request, content);
        self.stories.append(record.clone()).await?;
        info!(story_id = %record.id, words = record.word_count, "Story generated");
        Ok(record)
    }

    /// Starts a streamed generation. Nothing is stored until
    /// [`StoryStream::finish`] is called on a completed stream.
    pub async fn stream_story(&self, request: StoryRequest) -> PortResult<StoryStream> {
        let instruction = build_story_prompt(&request, &self.catalog);
        let fragments = self.generator.generate_story_streaming(&instruction).await?;
        debug!("Story stream opened");

        Ok(StoryStream {
            fragments,
            request,
            content: String::new(),
            state: StreamState::Streaming,
            stories: self.stories.clone(),
        })
    }
}

/// Where a streamed generation currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Streaming,
    Completed,
    Aborted,
}

/// A single streamed generation in progress.
///
/// Fragments are accumulated as they are handed out. Dropping the stream, or
/// calling [`StoryStream::abort`], discards the partial story.
pub struct StoryStream {
    fragments: FragmentStream,
    request: StoryRequest,
    content: String,
    state: StreamState,
    stories: Arc<dyn StoryRepository>,
}

impl StoryStream {
    /// Returns the next fragment, or `None` once the stream has ended.
    ///
    /// An upstream error aborts the stream; later calls return `None`.
    pub async fn next_fragment(&mut self) -> Option<PortResult<String>> {
        if self.state != StreamState::Streaming {
            return None;
        }

        match self.fragments.next().await {
            Some(Ok(fragment)) => {
                self.content.push_str(&fragment);
                Some(Ok(fragment))
            }
            Some(Err(e)) => {
                warn!("Story stream failed: {}", e);
                self.state = StreamState::Aborted;
                Some(Err(e))
            }
            None => {
                self.state = StreamState::Completed;
                None
            }
        }
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    /// The text received so far.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Stops consuming the stream and returns the partial text. Nothing is stored.
    pub fn abort(mut self) -> String {
        self.state = StreamState::Aborted;
        debug!(received = self.content.len(), "Story stream aborted");
        std::mem::take(&mut self.content)
    }

    /// Stores the finished story. Fails with [`PortError::Incomplete`] unless
    /// the stream ran to its end.
    pub async fn finish(self) -> PortResult<StoryRecord> {
        if self.state != StreamState::Completed {
            return Err(PortError::Incomplete);
        }

        let record = StoryRecord::new(&self.request, self.content);
        self.stories.append(record.clone()).await?;
        info!(story_id = %record.id, words = record.word_count, "Streamed story generated");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ExportFormat, StoryStats};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use uuid::Uuid;

    struct ScriptedGenerator {
        fragments: Vec<PortResult<String>>,
    }

    impl ScriptedGenerator {
        fn new(fragments: &[&str]) -> Self {
            Self {
                fragments: fragments.iter().map(|f| Ok(f.to_string())).collect(),
            }
        }

        fn failing_after(fragments: &[&str]) -> Self {
            let mut generator = Self::new(fragments);
            generator
                .fragments
                .push(Err(PortError::Generation("connection reset".to_string())));
            generator
        }

        fn take(&self) -> Vec<PortResult<String>> {
            self.fragments
                .iter()
                .map(|f| match f {
                    Ok(text) => Ok(text.clone()),
                    Err(e) => Err(PortError::Generation(e.to_string())),
                })
                .collect()
        }
    }

    #[async_trait]
    impl StoryGenerationService for ScriptedGenerator {
        async fn generate_story(&self, _instruction: &str) -> PortResult<String> {
            self.take().into_iter().collect()
        }

        async fn generate_story_streaming(&self, _instruction: &str) -> PortResult<FragmentStream> {
            Ok(Box::pin(futures::stream::iter(self.take())))
        }
    }

    #[derive(Default)]
    struct MemoryStories {
        records: Mutex<Vec<StoryRecord>>,
    }

    impl MemoryStories {
        fn all(&self) -> Vec<StoryRecord> {
            self.records.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl StoryRepository for MemoryStories {
        async fn append(&self, record: StoryRecord) -> PortResult<()> {
            self.records.lock().unwrap().push(record);
            Ok(())
        }

        async fn get(&self, id: Uuid) -> PortResult<Option<StoryRecord>> {
            Ok(self.all().into_iter().find(|r| r.id == id))
        }

        async fn delete(&self, _id: Uuid) -> PortResult<bool> {
            unimplemented!()
        }

        async fn toggle_favorite(&self, _id: Uuid) -> PortResult<Option<StoryRecord>> {
            unimplemented!()
        }

        async fn list_all(&self) -> PortResult<Vec<StoryRecord>> {
            Ok(self.all())
        }

        async fn search(&self, _query: &str) -> PortResult<Vec<StoryRecord>> {
            unimplemented!()
        }

        async fn favorites(&self) -> PortResult<Vec<StoryRecord>> {
            unimplemented!()
        }

        async fn stats(&self) -> PortResult<StoryStats> {
            Ok(StoryStats::from_records(&self.all()))
        }

        async fn export(&self, _id: Uuid, _format: ExportFormat) -> PortResult<Option<String>> {
            unimplemented!()
        }
    }

    fn request() -> StoryRequest {
        StoryRequest {
            prompt: "A dragon who wanted to become a chef".to_string(),
            genre: "Fantasy".to_string(),
            tone: "Funny".to_string(),
            length: "short".to_string(),
            language: "English".to_string(),
        }
    }

    fn writer(generator: ScriptedGenerator) -> (StoryWriter, Arc<MemoryStories>) {
        let stories = Arc::new(MemoryStories::default());
        let writer = StoryWriter::new(
            Arc::new(generator),
            stories.clone(),
            StoryCatalog::default(),
        );
        (writer, stories)
    }

    #[tokio::test]
    async fn buffered_generation_persists_one_record() {
        let (writer, stories) = writer(ScriptedGenerator::new(&["Once upon a time."]));
        let record = writer.write_story(request()).await.unwrap();

        assert_eq!(record.content, "Once upon a time.");
        assert_eq!(record.word_count, 4);
        assert_eq!(stories.all(), vec![record]);
    }

    #[tokio::test]
    async fn buffered_failure_saves_nothing() {
        let (writer, stories) = writer(ScriptedGenerator::failing_after(&[]));
        let result = writer.write_story(request()).await;

        assert!(matches!(result, Err(PortError::Generation(_))));
        assert!(stories.all().is_empty());
    }

    #[tokio::test]
    async fn completed_stream_persists_concatenated_fragments() {
        let (writer, stories) = writer(ScriptedGenerator::new(&["Once ", "upon ", "a time."]));
        let mut stream = writer.stream_story(request()).await.unwrap();

        let mut seen = Vec::new();
        while let Some(fragment) = stream.next_fragment().await {
            seen.push(fragment.unwrap());
        }
        assert_eq!(stream.state(), StreamState::Completed);

        let record = stream.finish().await.unwrap();
        assert_eq!(record.content, seen.concat());
        assert_eq!(record.genre, "Fantasy");
        assert_eq!(stories.all().len(), 1);
    }

    #[tokio::test]
    async fn aborted_stream_persists_nothing() {
        let (writer, stories) = writer(ScriptedGenerator::new(&["Once ", "upon ", "a time."]));
        let mut stream = writer.stream_story(request()).await.unwrap();

        let first = stream.next_fragment().await.unwrap().unwrap();
        assert_eq!(first, "Once ");
        let partial = stream.abort();

        assert_eq!(partial, "Once ");
        assert!(stories.all().is_empty());
    }

    #[tokio::test]
    async fn unfinished_stream_refuses_to_persist() {
        let (writer, stories) = writer(ScriptedGenerator::new(&["Once ", "upon"]));
        let mut stream = writer.stream_story(request()).await.unwrap();
        stream.next_fragment().await;

        assert!(matches!(stream.finish().await, Err(PortError::Incomplete)));
        assert!(stories.all().is_empty());
    }

    #[tokio::test]
    async fn upstream_error_aborts_the_stream() {
        let (writer, stories) = writer(ScriptedGenerator::failing_after(&["Once "]));
        let mut stream = writer.stream_story(request()).await.unwrap();

        assert!(stream.next_fragment().await.unwrap().is_ok());
        assert!(stream.next_fragment().await.unwrap().is_err());
        assert_eq!(stream.state(), StreamState::Aborted);
        assert!(stream.next_fragment().await.is_none());
        assert_eq!(stream.content(), "Once ");

        assert!(matches!(stream.finish().await, Err(PortError::Incomplete)));
        assert!(stories.all().is_empty());
    }
}
