//! Wires the support flow over the configured backend.

use std::sync::Arc;

use convograph::{
    Capability, CompiledFlow, GraphError, PredictionClient, ScriptedCapability, ScriptedPrediction,
};
use convograph_examples::{build_support_flow, UserDirectory, UserProfile};

use crate::config::{Backend, RunConfig};

/// The demo user the scripted directory can identify.
fn demo_profile() -> UserProfile {
    UserProfile {
        name: "Ada Lovelace".into(),
        email: "ada@example.com".into(),
        subscription: "premium".into(),
        user_id: 42,
        phone: "555-123-4567".into(),
        language: "en".into(),
    }
}

/// Completions for the demo conversation: one question without a call
/// request, then a call request with its number. Anything after the script
/// reads as "no call request" so the help node keeps answering.
fn demo_script() -> ScriptedPrediction {
    ScriptedPrediction::new([
        r#"{"is_valid": false}"#,
        r#"{"is_valid": true}"#,
        r#"{"phone_number": "555-123-4567"}"#,
    ])
    .with_fallback(r#"{"is_valid": false}"#)
}

fn prediction_client(config: &RunConfig) -> Arc<dyn PredictionClient> {
    match &config.backend {
        Backend::Scripted => Arc::new(demo_script()),
        #[cfg(feature = "openai")]
        Backend::OpenAi { model } => {
            Arc::new(convograph::OpenAiPrediction::new(model.clone()).with_temperature(0.0))
        }
        #[cfg(not(feature = "openai"))]
        Backend::OpenAi { .. } => {
            unreachable!("openai backend requires building with --features openai")
        }
    }
}

/// Builds the customer-support flow for the configured backend. The
/// directory, help desk and caller stay scripted in both modes; a real
/// deployment would swap in its own capabilities here.
pub fn build_flow(config: &RunConfig) -> Result<Arc<CompiledFlow>, GraphError> {
    let client = prediction_client(config);
    let directory: Arc<dyn Capability> = Arc::new(UserDirectory::new(vec![demo_profile()]));
    let help_desk: Arc<dyn Capability> = Arc::new(ScriptedCapability::always(
        "Our help center says: you can reset your password from the account page.",
    ));
    let caller: Arc<dyn Capability> = Arc::new(ScriptedCapability::always(
        "Thanks for your time today; a ticket has been created on your behalf.",
    ));
    build_support_flow(client, directory, help_desk, caller)
}
