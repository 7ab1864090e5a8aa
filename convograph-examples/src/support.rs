//! The customer-support flow: identify, help, call back.
//!
//! Three conversational states. `welcome` identifies the user through a
//! directory-lookup capability and hands the extracted profile to `help`;
//! `help` answers questions through a help-desk capability until the user
//! asks to be called; `call` runs the phone-call capability and ends the
//! session.

use std::sync::Arc;

use async_trait::async_trait;

use convograph::{
    Capability, CompiledFlow, Edge, EdgeResult, FlowGraph, GraphError, Message, MessageHistory,
    Node, PredictionClient, PredictionError, Role,
};

use crate::schemas::{phone_call_request_extractor, user_profile_extractor, UserProfile};

/// Directory lookup standing in for a user database: finds a profile whose
/// email or phone appears in the latest user message and answers with the
/// profile as JSON.
///
/// **Interaction**: implements `Capability`; drives the identity edge of the
/// support flow. A real deployment would query an actual directory here.
pub struct UserDirectory {
    profiles: Vec<UserProfile>,
}

impl UserDirectory {
    pub fn new(profiles: Vec<UserProfile>) -> Self {
        Self { profiles }
    }
}

#[async_trait]
impl Capability for UserDirectory {
    async fn run(&self, history: &MessageHistory) -> Result<String, PredictionError> {
        let query = history
            .last_of(Role::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default();
        let found = self
            .profiles
            .iter()
            .find(|p| query.contains(&p.email) || query.contains(&p.phone));
        match found {
            Some(profile) => serde_json::to_string(profile)
                .map_err(|e| PredictionError::Transport(e.to_string())),
            None => Ok("No matching user found for that contact detail.".to_string()),
        }
    }
}

/// Wires the three-node support flow over the given backends.
///
/// `client` judges the call-request condition; `directory` resolves user
/// identities; `help_desk` answers support questions; `caller` performs the
/// closing phone call.
pub fn build_support_flow(
    client: Arc<dyn PredictionClient>,
    directory: Arc<dyn Capability>,
    help_desk: Arc<dyn Capability>,
    caller: Arc<dyn Capability>,
) -> Result<Arc<CompiledFlow>, GraphError> {
    let identify = Edge::capability_driven(directory)
        .to("help")
        .with_extractor(user_profile_extractor())
        .with_max_retries(3)
        .with_display(|result| match result {
            EdgeResult::Extracted(profile) => {
                vec![Message::system(format!("User info retrieved: {}", profile))]
            }
            _ => Vec::new(),
        });

    let call_request = Edge::guarded(
        "Is there any pending call request coming from the user?",
        "Extract the phone number from the user message",
        client,
    )
    .to("call")
    .with_extractor(phone_call_request_extractor())
    .with_max_retries(3)
    .with_display(|result| match result.as_value() {
        Some(v) => vec![
            Message::system("User has been called as per their request"),
            Message::assistant(format!(
                "Sure, we are calling you now on: {}",
                v["phone_number"].as_str().unwrap_or("?")
            )),
        ],
        None => Vec::new(),
    });

    let mut flow = FlowGraph::new();
    flow.add_node(
        Node::static_prompt(
            "welcome",
            ["Hi, welcome to our online support. To proceed we need to identify you first: \
              could you share your full email address or phone number?"],
            ["I'm sorry, I didn't catch that. Please provide a full email address or a \
              phone number in the format xxx-xxx-xxxx"],
        )
        .with_edge(identify),
    );
    flow.add_node(
        Node::capability("help", help_desk)
            .with_greeting_templates([
                "Hi {name}, I am your support agent for today. You have the {subscription} \
                 subscription. Ask me anything, or ask me to call you at any time!",
            ])
            .with_edge(call_request),
    );
    flow.add_node(
        Node::capability("call", caller)
            .with_greeting_prompt("Call the user on their phone number: {phone_number}")
            .terminal(),
    );
    flow.start("welcome");

    flow.compile().map(Arc::new)
}
