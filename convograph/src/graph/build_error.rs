//! Flow construction error.
//!
//! Returned by `FlowGraph::compile` when the declared nodes and edges do not
//! form a runnable flow. All of these are construction-time failures; a
//! compiled flow never produces them at runtime.

use thiserror::Error;

/// Error when compiling a flow graph (e.g. an edge targets an unknown node).
///
/// Returned by `FlowGraph::compile()`. Validation ensures the start node is
/// declared and registered, every edge target resolves, and every node can
/// make progress (outgoing edges, or the terminal flag).
#[derive(Debug, Error)]
pub enum GraphError {
    /// No start node was declared before compiling.
    #[error("flow must declare a start node")]
    MissingStart,

    /// The declared start node id was never registered.
    #[error("start node not found: {0}")]
    StartNotFound(String),

    /// Two nodes were registered under the same id.
    #[error("duplicate node id: {0}")]
    DuplicateNode(String),

    /// An edge targets a node id that was never registered.
    #[error("edge from '{from}' targets unknown node '{to}'")]
    DanglingEdge { from: String, to: String },

    /// A node has no outgoing edges and is not terminal: the flow could
    /// never advance past it or finish on it.
    #[error("node '{0}' has no outgoing edges and is not terminal")]
    DeadEnd(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: Display names the offending ids.
    #[test]
    fn graph_error_display_names_ids() {
        let err = GraphError::DanglingEdge {
            from: "welcome".into(),
            to: "missing".into(),
        };
        let s = err.to_string();
        assert!(s.contains("welcome"));
        assert!(s.contains("missing"));
        assert!(GraphError::DeadEnd("stuck".into())
            .to_string()
            .contains("stuck"));
    }
}
