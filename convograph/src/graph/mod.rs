//! Graph kernel: nodes, guarded edges, and the built flow.
//!
//! A flow is a registry of nodes indexed by id; each node owns an ordered
//! list of outgoing edges whose targets are node ids, resolved and validated
//! when the flow is built. Cycles are legal: edges store ids, not owning
//! references, so a transition may point back at an ancestor.

mod build_error;
mod edge;
mod flow_graph;
pub(crate) mod logging;
mod node;
mod output;

pub use build_error::GraphError;
pub use edge::{DisplayFn, Edge};
pub use flow_graph::{CompiledFlow, FlowGraph};
pub use node::Node;
pub(crate) use node::NodeOutcome;
pub use output::{EdgeOutput, EdgeResult};

use std::collections::HashMap;

/// Identifier of a node in the flow.
pub type NodeId = String;

/// Per-session consecutive-failure counters, keyed by the owning node's id
/// and the edge's position in that node's edge list. Kept off the shared
/// flow so one built flow can serve concurrent sessions.
pub(crate) type FailCounts = HashMap<(NodeId, usize), u32>;
