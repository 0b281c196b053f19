//! services/story_writer/src/adapters/story_llm.rs
//!
//! This module contains the adapter for the story-writing LLM.
//! It implements the `StoryGenerationService` port from the `core` crate.

use crate::config::{Config, ConfigError};
use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequest,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use futures::StreamExt;
use story_writer_core::{
    ports::{FragmentStream, PortError, PortResult, StoryGenerationService},
    prompt::SYSTEM_PROMPT,
};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `StoryGenerationService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiStoryAdapter {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiStoryAdapter {
    /// Creates a new `OpenAiStoryAdapter`.
    pub fn new(
        client: Client<OpenAIConfig>,
        model: String,
        temperature: f32,
        max_tokens: u32,
    ) -> Self {
        Self {
            client,
            model,
            temperature,
            max_tokens,
        }
    }

    /// Builds the client from the loaded configuration. Fails when no API key is set.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let mut openai_config = OpenAIConfig::new().with_api_key(config.require_api_key()?);
        if let Some(base_url) = &config.openai_base_url {
            openai_config = openai_config.with_api_base(base_url);
        }

        Ok(Self::new(
            Client::with_config(openai_config),
            config.model.clone(),
            config.temperature,
            config.max_tokens,
        ))
    }

    fn build_request(&self, instruction: &str) -> PortResult<CreateChatCompletionRequest> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SYSTEM_PROMPT)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(instruction)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        ];

        CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))
    }
}

/// Authentication, quota and network failures all end up here; none are retried.
fn generation_error(e: OpenAIError) -> PortError {
    PortError::Generation(e.to_string())
}

//=========================================================================================
// `StoryGenerationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl StoryGenerationService for OpenAiStoryAdapter {
    async fn generate_story(&self, instruction: &str) -> PortResult<String> {
        let request = self.build_request(instruction)?;

        // Call the API and manually map the error if it occurs, which respects the orphan rule.
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(generation_error)?;

        // Extract the text content from the first choice in the response.
        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                PortError::Generation("Story LLM response contained no text content.".to_string())
            })
    }

    async fn generate_story_streaming(&self, instruction: &str) -> PortResult<FragmentStream> {
        let request = self.build_request(instruction)?;

        let stream = self
            .client
            .chat()
            .create_stream(request)
            .await
            .map_err(generation_error)?;

        // Chunks without text (role announcements, the final stop chunk) are skipped.
        let fragments = stream.filter_map(|chunk| async move {
            match chunk {
                Ok(response) => response
                    .choices
                    .into_iter()
                    .next()
                    .and_then(|choice| choice.delta.content)
                    .filter(|text| !text.is_empty())
                    .map(Ok),
                Err(e) => Some(Err(generation_error(e))),
            }
        });

        Ok(Box::pin(fragments))
    }
}
