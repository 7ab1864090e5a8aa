//! Session execution error types.

use thiserror::Error;

use crate::graph::GraphError;
use crate::llm::PredictionError;

/// Error returned by the session driving surface.
///
/// Edge-local failures (condition not met, extraction parse failures) are
/// retry bookkeeping, not errors; they never surface here. What does surface
/// is a prediction boundary failure (the step can be retried: state is left
/// unmodified), a flow construction problem, or misuse of a finished session.
#[derive(Debug, Error)]
pub enum FlowError {
    /// The prediction service failed; the step made no state changes.
    #[error(transparent)]
    Prediction(#[from] PredictionError),

    /// The flow definition is not runnable.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// The session already reached a terminal node; no further steps are
    /// accepted.
    #[error("session is finished")]
    SessionFinished,

    /// `start` was called on a session that is already active.
    #[error("session is already started")]
    AlreadyStarted,
}
