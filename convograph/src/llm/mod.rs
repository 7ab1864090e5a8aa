//! Prediction-service boundary.
//!
//! The engine never produces text itself; every completion goes through
//! `PredictionClient`. Edges use it for guard checks and extraction, nodes
//! for capability-less default responses. Implementations: `ScriptedPrediction`
//! (canned completions for tests and offline runs) and `OpenAiPrediction`
//! (real API, feature `openai`).

mod scripted;

#[cfg(feature = "openai")]
mod openai;

pub use scripted::ScriptedPrediction;

#[cfg(feature = "openai")]
pub use openai::OpenAiPrediction;

use async_trait::async_trait;
use thiserror::Error;

/// Assembled context for one completion request: task instructions, a
/// rendered slice of the conversation, and the turn under consideration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PromptContext {
    /// Task-specific instructions, including any format instructions.
    pub instructions: String,
    /// Rendered conversation excerpt preceding the turn under consideration.
    pub history: String,
    /// The turn being judged or parsed, usually the latest user message.
    pub input: String,
}

/// Failure of the underlying prediction call.
///
/// The engine does not retry these: they propagate out of `Session::step`
/// with session state untouched, so the caller can retry the whole step.
#[derive(Debug, Error)]
pub enum PredictionError {
    /// Transport-level failure (connection refused, HTTP error, ...).
    #[error("prediction transport failed: {0}")]
    Transport(String),

    /// The call did not complete within the backend's deadline.
    #[error("prediction timed out: {0}")]
    Timeout(String),

    /// The backend answered but produced no completion text.
    #[error("prediction returned an empty completion")]
    EmptyCompletion,
}

/// Prediction client: given an assembled context, returns a raw completion.
///
/// **Interaction**: consumed by edges (guard check, extraction) and by the
/// session's capability-less response paths. Implementations decide how the
/// three context parts become an actual request.
#[async_trait]
pub trait PredictionClient: Send + Sync {
    /// Produce one completion for the given context.
    async fn predict(&self, context: &PromptContext) -> Result<String, PredictionError>;
}
