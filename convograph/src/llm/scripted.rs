//! Scripted prediction client for tests, examples and offline runs.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{PredictionClient, PredictionError, PromptContext};

/// Prediction client that replays a fixed script of completions.
///
/// `predict` pops the next scripted completion; when the script is exhausted
/// it falls back to a configured default, or fails with a transport error so
/// callers can exercise the failed-step path.
///
/// **Interaction**: implements `PredictionClient`; used by edge and session
/// tests and by the CLI's offline mode.
pub struct ScriptedPrediction {
    script: Mutex<VecDeque<String>>,
    fallback: Option<String>,
}

impl ScriptedPrediction {
    /// Creates a client that replays `completions` in order and fails once
    /// they run out.
    pub fn new<I, S>(completions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            script: Mutex::new(completions.into_iter().map(Into::into).collect()),
            fallback: None,
        }
    }

    /// Creates a client that answers every request with the same completion.
    pub fn always(completion: impl Into<String>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Some(completion.into()),
        }
    }

    /// Sets the completion returned once the script runs out (builder style).
    pub fn with_fallback(mut self, completion: impl Into<String>) -> Self {
        self.fallback = Some(completion.into());
        self
    }
}

#[async_trait]
impl PredictionClient for ScriptedPrediction {
    async fn predict(&self, _context: &PromptContext) -> Result<String, PredictionError> {
        let next = self.script.lock().expect("script lock poisoned").pop_front();
        match next {
            Some(text) => Ok(text),
            None => match &self.fallback {
                Some(text) => Ok(text.clone()),
                None => Err(PredictionError::Transport("script exhausted".into())),
            },
        }
    }
}
