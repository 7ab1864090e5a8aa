//! Logging utilities for flow execution.
//!
//! Structured logging for session steps, edge outcomes and node transitions.
//! With the `tracing` feature the events go through the tracing crate;
//! without it they fall back to stderr.

/// Log the start of a session step on the given node.
pub fn log_step_start(node_id: &str) {
    #[cfg(feature = "tracing")]
    tracing::debug!(node_id = node_id, "Starting session step");

    #[cfg(not(feature = "tracing"))]
    eprintln!("[DEBUG] Starting session step on node: {}", node_id);
}

/// Log one edge invocation's outcome during a node's sweep.
pub fn log_edge_outcome(node_id: &str, edge_index: usize, fired: bool, fail_count: u32) {
    #[cfg(feature = "tracing")]
    tracing::debug!(
        node_id = node_id,
        edge_index = edge_index,
        fired = fired,
        fail_count = fail_count,
        "Edge evaluated"
    );

    #[cfg(not(feature = "tracing"))]
    eprintln!(
        "[DEBUG] Edge evaluated: {}#{} fired={} fail_count={}",
        node_id, edge_index, fired, fail_count
    );
}

/// Log a transition between nodes.
pub fn log_transition(from: &str, to: &str) {
    #[cfg(feature = "tracing")]
    tracing::info!(from = from, to = to, "Transition");

    #[cfg(not(feature = "tracing"))]
    eprintln!("[INFO] Transition: {} -> {}", from, to);
}

/// Log that the session reached a terminal node.
pub fn log_session_finished(node_id: &str) {
    #[cfg(feature = "tracing")]
    tracing::info!(node_id = node_id, "Session finished");

    #[cfg(not(feature = "tracing"))]
    eprintln!("[INFO] Session finished on node: {}", node_id);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_functions() {
        // These should not panic
        log_step_start("welcome");
        log_edge_outcome("welcome", 0, true, 0);
        log_transition("welcome", "help");
        log_session_finished("wrap-up");
    }
}
