//! OpenAI Chat Completions client implementing `PredictionClient`.
//!
//! Uses the real OpenAI Chat Completions API. Requires `OPENAI_API_KEY` (or
//! explicit config). The prompt context maps to a system message carrying the
//! task instructions and a user message carrying the conversation excerpt and
//! the turn under consideration.
//!
//! **Interaction**: implements `PredictionClient`; used by edges and nodes
//! exactly like `ScriptedPrediction`. Depends on `async_openai` (feature
//! `openai`).

use async_trait::async_trait;

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
        ChatCompletionRequestUserMessage, CreateChatCompletionRequestArgs,
    },
    Client,
};

use super::{PredictionClient, PredictionError, PromptContext};

/// OpenAI Chat Completions client implementing `PredictionClient`.
///
/// Uses `OPENAI_API_KEY` from the environment by default; or provide config
/// via `OpenAiPrediction::with_config`.
pub struct OpenAiPrediction {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: Option<f32>,
}

impl OpenAiPrediction {
    /// Build client with default config (API key from `OPENAI_API_KEY` env).
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            model: model.into(),
            temperature: None,
        }
    }

    /// Build client with custom config (e.g. custom API key or base URL).
    pub fn with_config(config: OpenAIConfig, model: impl Into<String>) -> Self {
        Self {
            client: Client::with_config(config),
            model: model.into(),
            temperature: None,
        }
    }

    /// Set temperature (0–2). Lower values are more deterministic.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Render the prompt context as chat messages: instructions become the
    /// system message, history and input together the user message.
    fn context_to_request(context: &PromptContext) -> Vec<ChatCompletionRequestMessage> {
        let user = if context.history.is_empty() {
            context.input.clone()
        } else {
            format!(
                "Conversation history:\n{}\n\nInput: {}",
                context.history, context.input
            )
        };
        vec![
            ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage::from(
                context.instructions.as_str(),
            )),
            ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage::from(
                user.as_str(),
            )),
        ]
    }
}

#[async_trait]
impl PredictionClient for OpenAiPrediction {
    async fn predict(&self, context: &PromptContext) -> Result<String, PredictionError> {
        let messages = Self::context_to_request(context);
        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(self.model.clone());
        args.messages(messages);
        if let Some(t) = self.temperature {
            args.temperature(t);
        }

        let request = args
            .build()
            .map_err(|e| PredictionError::Transport(format!("request build failed: {}", e)))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| PredictionError::Transport(format!("OpenAI API error: {}", e)))?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or(PredictionError::EmptyCompletion)?;

        match choice.message.content {
            Some(content) if !content.is_empty() => Ok(content),
            _ => Err(PredictionError::EmptyCompletion),
        }
    }
}
