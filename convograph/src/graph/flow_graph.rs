//! Flow graph: node registry + start node, compile and run sessions.
//!
//! Register nodes with `add_node`, name the entry state with `start`, then
//! `compile` to get a `CompiledFlow`. Compilation resolves every edge target
//! against the registry so a running session never meets a dangling
//! reference. Cycles are allowed: a flow may loop back to an earlier state.

use std::collections::HashMap;
use std::sync::Arc;

use crate::session::Session;

use super::build_error::GraphError;
use super::node::Node;
use super::NodeId;

/// Flow under construction: nodes plus a declared start node.
///
/// **Interaction**: accepts `Node`s; produces `CompiledFlow` via `compile`.
#[derive(Default)]
pub struct FlowGraph {
    nodes: Vec<Node>,
    start: Option<NodeId>,
}

impl FlowGraph {
    /// Creates an empty flow.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a node. Ids must be unique; duplicates fail at compile.
    ///
    /// Returns `&mut Self` for method chaining.
    pub fn add_node(&mut self, node: Node) -> &mut Self {
        self.nodes.push(node);
        self
    }

    /// Declares the entry node of the flow.
    pub fn start(&mut self, id: impl Into<NodeId>) -> &mut Self {
        self.start = Some(id.into());
        self
    }

    /// Validates the declared flow and builds the immutable, runnable form.
    ///
    /// Checks that the start node is declared and registered, that every
    /// edge target resolves, that no id is registered twice, and that every
    /// node can either advance (outgoing edges) or finish (terminal flag).
    pub fn compile(self) -> Result<CompiledFlow, GraphError> {
        let start = self.start.ok_or(GraphError::MissingStart)?;

        let mut nodes: HashMap<NodeId, Arc<Node>> = HashMap::new();
        for node in self.nodes {
            if nodes.contains_key(node.id()) {
                return Err(GraphError::DuplicateNode(node.id().to_string()));
            }
            nodes.insert(node.id().to_string(), Arc::new(node));
        }

        if !nodes.contains_key(&start) {
            return Err(GraphError::StartNotFound(start));
        }

        for node in nodes.values() {
            if node.edges().is_empty() && !node.is_terminal() {
                return Err(GraphError::DeadEnd(node.id().to_string()));
            }
            for edge in node.edges() {
                if let Some(target) = edge.target() {
                    if !nodes.contains_key(target) {
                        return Err(GraphError::DanglingEdge {
                            from: node.id().to_string(),
                            to: target.to_string(),
                        });
                    }
                }
            }
        }

        Ok(CompiledFlow { nodes, start })
    }
}

/// Compiled flow: immutable node registry, safe to share across sessions.
///
/// All session-scoped mutation (history, fail counts, pending input) lives on
/// `Session`; a `CompiledFlow` behind an `Arc` serves any number of
/// concurrent sessions.
pub struct CompiledFlow {
    nodes: HashMap<NodeId, Arc<Node>>,
    start: NodeId,
}

impl CompiledFlow {
    /// The entry node's id.
    pub fn start_id(&self) -> &str {
        &self.start
    }

    /// Looks up a node by id.
    pub fn get(&self, id: &str) -> Option<&Arc<Node>> {
        self.nodes.get(id)
    }

    /// Resolves a node id that compilation guaranteed to exist.
    pub(crate) fn node(&self, id: &str) -> &Arc<Node> {
        self.nodes.get(id).expect("compiled flow has all nodes")
    }

    /// Opens a fresh session over this flow.
    pub fn session(self: &Arc<Self>) -> Session {
        Session::new(Arc::clone(self))
    }
}
