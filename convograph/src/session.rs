//! Session controller: the one-step-per-turn driving surface.
//!
//! A `Session` holds the conversation history, the current node, and the
//! session-scoped retry state, and is the only component that mutates any of
//! them; nodes and edges receive the history and return data. Each external
//! input drives exactly one `step`: append the input, let the current node
//! sweep its edges, fold the resulting messages back into the history, and
//! switch nodes when an edge fired with a target.
//!
//! A step commits nothing until all of its fallible work has succeeded, so a
//! step that fails on a prediction boundary leaves the session exactly as it
//! was and can simply be retried.

use std::sync::Arc;

use crate::error::FlowError;
use crate::graph::logging;
use crate::graph::{CompiledFlow, EdgeResult, FailCounts, NodeId, NodeOutcome};
use crate::message::{Message, MessageHistory, Role};

/// Messages produced by one step, filtered for display, plus whether the
/// session is finished.
#[derive(Clone, Debug)]
pub struct StepOutput {
    /// ASSISTANT-role messages to show the user. SYSTEM-role messages are
    /// recorded in the history for model context but never shown.
    pub messages: Vec<Message>,
    /// True once the current node is terminal.
    pub finished: bool,
}

/// One conversation's state over a shared, immutable flow.
///
/// Created by `CompiledFlow::session`; lives for the conversation and is
/// discarded when finished or abandoned. All mutable state (history, fail
/// counts, pending input) is owned here, so concurrent sessions over one
/// flow never interfere.
pub struct Session {
    flow: Arc<CompiledFlow>,
    history: MessageHistory,
    current: Option<NodeId>,
    pending_input: Option<EdgeResult>,
    fail_counts: FailCounts,
    finished: bool,
}

impl Session {
    /// Opens a fresh, not-yet-started session over the flow.
    pub fn new(flow: Arc<CompiledFlow>) -> Self {
        Self {
            flow,
            history: MessageHistory::new(),
            current: None,
            pending_input: None,
            fail_counts: FailCounts::new(),
            finished: false,
        }
    }

    /// The conversation so far.
    pub fn history(&self) -> &MessageHistory {
        &self.history
    }

    /// True once a terminal node became current.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Id of the current node; `None` before the first step.
    pub fn current_node(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// The data handed to the current node by the edge that led here.
    pub fn pending_input(&self) -> Option<&EdgeResult> {
        self.pending_input.as_ref()
    }

    /// Enters the start node and returns its greeting. No edge evaluation.
    pub async fn start(&mut self) -> Result<StepOutput, FlowError> {
        if self.current.is_some() {
            return Err(FlowError::AlreadyStarted);
        }
        self.step("").await
    }

    /// Drives one turn: record `user_text` (when non-empty), let the current
    /// node take its turn, and fold the outcome back into the session.
    ///
    /// Returns the ASSISTANT messages to display and whether the session
    /// finished. Stepping a finished session is an error.
    pub async fn step(&mut self, user_text: &str) -> Result<StepOutput, FlowError> {
        if self.finished {
            return Err(FlowError::SessionFinished);
        }

        let Some(current_id) = self.current.clone() else {
            return self.enter_start(user_text).await;
        };

        logging::log_step_start(&current_id);
        let node = self.flow.node(&current_id).clone();
        let mut working = self.history.clone();
        if !user_text.is_empty() {
            working.push_user(user_text);
        }
        let mut fails = self.fail_counts.clone();

        match node.execute(&working, &mut fails).await? {
            NodeOutcome::Stay { messages } => {
                for m in &messages {
                    working.push(m.clone());
                }
                self.history = working;
                self.fail_counts = fails;
                Ok(StepOutput {
                    messages: displayable(&messages),
                    finished: false,
                })
            }
            NodeOutcome::Transition {
                to,
                input,
                messages,
            } => {
                let next = self.flow.node(&to).clone();
                // Edge-produced messages are recorded before the entered
                // node's greeting, and the greeting sees them.
                for m in &messages {
                    working.push(m.clone());
                }
                let greeting = next.greeting(Some(&input), &working).await?;
                for m in &greeting {
                    working.push(m.clone());
                }

                logging::log_transition(&current_id, &to);
                self.history = working;
                self.fail_counts = fails;
                self.current = Some(to.clone());
                self.pending_input = Some(input);
                self.finished = next.is_terminal();
                if self.finished {
                    logging::log_session_finished(&to);
                }

                let mut shown = displayable(&messages);
                shown.extend(displayable(&greeting));
                Ok(StepOutput {
                    messages: shown,
                    finished: self.finished,
                })
            }
        }
    }

    /// First turn: enter the start node and run its greeting.
    async fn enter_start(&mut self, user_text: &str) -> Result<StepOutput, FlowError> {
        let start = self.flow.node(self.flow.start_id()).clone();
        let mut working = self.history.clone();
        if !user_text.is_empty() {
            working.push_user(user_text);
        }
        let greeting = start.greeting(None, &working).await?;
        for m in &greeting {
            working.push(m.clone());
        }
        self.history = working;
        self.current = Some(start.id().to_string());
        self.finished = start.is_terminal();
        if self.finished {
            logging::log_session_finished(start.id());
        }
        Ok(StepOutput {
            messages: displayable(&greeting),
            finished: self.finished,
        })
    }
}

fn displayable(messages: &[Message]) -> Vec<Message> {
    messages
        .iter()
        .filter(|m| m.role == Role::Assistant)
        .cloned()
        .collect()
}
