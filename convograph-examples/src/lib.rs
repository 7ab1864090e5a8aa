//! Runnable flows built from convograph parts.
//!
//! The centerpiece is a customer-support flow: identify the user, help them,
//! and wrap up with a phone call. Three nodes whose edges extract typed
//! data from the conversation as it advances. The examples drive it with
//! scripted backends; swap in real ones for production use.

pub mod schemas;
pub mod support;

pub use schemas::{PhoneCallRequest, PhoneCallTicket, UserProfile};
pub use support::{build_support_flow, UserDirectory};
