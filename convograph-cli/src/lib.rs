//! convograph-cli library: reusable run logic for the support-flow REPL.
//!
//! Builds the customer-support flow over a scripted backend (offline demo)
//! or the OpenAI backend (feature `openai`), and drives a session over
//! stdin/stdout one step per line.

mod config;
mod flow;
mod repl;

pub use config::{Backend, RunConfig};
pub use flow::build_flow;
pub use repl::run;

#[cfg(test)]
mod tests;
