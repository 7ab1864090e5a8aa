//! Tool-augmented reasoning boundary.
//!
//! A `Capability` is an external reasoning procedure the engine can delegate
//! to: a tool-driving agent, a retrieval-backed answerer, a database lookup.
//! The engine only sees text in, text out; how the answer is produced is the
//! capability's business.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm::PredictionError;
use crate::message::MessageHistory;

/// One downstream reasoning procedure: given the conversation, produce an
/// answer. Failures are boundary failures and propagate like prediction
/// failures.
///
/// **Interaction**: consumed by capability-backed nodes (default responses,
/// greeting work) and by unguarded edges (the check-less transition variant).
#[async_trait]
pub trait Capability: Send + Sync {
    /// Run the procedure over the conversation and return its answer.
    async fn run(&self, history: &MessageHistory) -> Result<String, PredictionError>;
}

/// Capability that replays a fixed script of answers, with an optional
/// fallback once the script runs out.
///
/// **Interaction**: implements `Capability`; used by node and session tests
/// and by the runnable examples in place of real tool stacks.
pub struct ScriptedCapability {
    script: Mutex<VecDeque<String>>,
    fallback: Option<String>,
}

impl ScriptedCapability {
    /// Creates a capability that replays `answers` in order and fails once
    /// they run out.
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            script: Mutex::new(answers.into_iter().map(Into::into).collect()),
            fallback: None,
        }
    }

    /// Creates a capability that answers every request the same way.
    pub fn always(answer: impl Into<String>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Some(answer.into()),
        }
    }

    /// Sets the answer returned once the script runs out (builder style).
    pub fn with_fallback(mut self, answer: impl Into<String>) -> Self {
        self.fallback = Some(answer.into());
        self
    }
}

#[async_trait]
impl Capability for ScriptedCapability {
    async fn run(&self, _history: &MessageHistory) -> Result<String, PredictionError> {
        let next = self.script.lock().expect("script lock poisoned").pop_front();
        match next {
            Some(text) => Ok(text),
            None => match &self.fallback {
                Some(text) => Ok(text.clone()),
                None => Err(PredictionError::Transport(
                    "capability script exhausted".into(),
                )),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: scripted answers replay in order, then the fallback holds.
    #[tokio::test]
    async fn scripted_capability_replays_then_falls_back() {
        let cap = ScriptedCapability::new(["looked it up"]).with_fallback("done");
        let history = MessageHistory::new();
        assert_eq!(cap.run(&history).await.unwrap(), "looked it up");
        assert_eq!(cap.run(&history).await.unwrap(), "done");
    }

    /// **Scenario**: without a fallback, exhaustion is a boundary failure.
    #[tokio::test]
    async fn exhausted_capability_fails() {
        let cap = ScriptedCapability::new(Vec::<String>::new());
        let history = MessageHistory::new();
        assert!(matches!(
            cap.run(&history).await,
            Err(PredictionError::Transport(_))
        ));
    }
}
