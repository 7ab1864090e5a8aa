//! # convograph
//!
//! A conversational-flow engine: drive a multi-turn dialogue by walking a
//! directed graph of conversational states (nodes) joined by guarded,
//! data-extracting transitions (edges). The engine is domain-agnostic: it
//! knows how to prompt, check conditions, parse, retry, and advance state,
//! and nothing about what the conversation is for.
//!
//! ## Design Principles
//!
//! - **One shared state**: the append-only `MessageHistory` is the single
//!   state every component reads; only the `Session` writes it.
//! - **Failures as data**: an edge that is mid-retry returns a non-firing
//!   output, never an error. Only prediction boundary failures and flow
//!   construction problems surface as errors.
//! - **Immutable flows, session-local state**: a `CompiledFlow` never
//!   mutates after `compile()`; retry counters and the pending-input slot
//!   live on each `Session`, so one flow serves concurrent sessions.
//!
//! ## Main Modules
//!
//! - [`graph`]: `FlowGraph`, `CompiledFlow`, `Node`, `Edge`; build flows.
//! - [`session`]: `Session`, the `start`/`step` driving surface.
//! - [`llm`]: `PredictionClient` trait, `ScriptedPrediction`, and optional
//!   `OpenAiPrediction` via the `openai` feature.
//! - [`parse`]: the structured-parser boundary (`Extractor`,
//!   `SchemaExtractor`, the boolean `Validation` guard schema).
//! - [`capability`]: the tool/retrieval reasoning boundary.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use convograph::{Edge, FlowGraph, Node, ScriptedPrediction};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), convograph::FlowError> {
//! let client = Arc::new(ScriptedPrediction::always(r#"{"is_valid": true}"#));
//!
//! let mut flow = FlowGraph::new();
//! flow.add_node(
//!     Node::static_prompt("welcome", ["Hi! What do you need?"], ["Could you rephrase?"])
//!         .with_edge(Edge::guarded("did the user state a request?", "summarize it", client).to("done")),
//! );
//! flow.add_node(Node::static_prompt("done", ["On it!"], Vec::<String>::new()).terminal());
//! flow.start("welcome");
//!
//! let flow = Arc::new(flow.compile()?);
//! let mut session = flow.session();
//! let _greeting = session.start().await?;
//! let turn = session.step("I need help with my order").await?;
//! assert!(turn.finished);
//! # Ok(())
//! # }
//! ```

pub mod capability;
pub mod error;
pub mod graph;
pub mod llm;
pub mod message;
pub mod parse;
pub mod session;

pub use capability::{Capability, ScriptedCapability};
pub use error::FlowError;
pub use graph::{
    CompiledFlow, DisplayFn, Edge, EdgeOutput, EdgeResult, FlowGraph, GraphError, Node, NodeId,
};
pub use llm::{PredictionClient, PredictionError, PromptContext, ScriptedPrediction};
#[cfg(feature = "openai")]
pub use llm::OpenAiPrediction;
pub use message::{Message, MessageHistory, Role};
pub use parse::{Extractor, FieldSpec, ParseError, SchemaExtractor, Validation};
pub use session::{Session, StepOutput};
