//! Customer-support flow with real condition judging via OpenAI.
//!
//! Run: `cargo run -p convograph-examples --example customer_support_openai \
//!       --features openai`
//!
//! Requires `OPENAI_API_KEY` in the environment. The capabilities stay
//! scripted; only the guard checks and extractions hit the API.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use convograph::{OpenAiPrediction, ScriptedCapability};
use convograph_examples::{build_support_flow, UserDirectory, UserProfile};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());
    let client = Arc::new(OpenAiPrediction::new(model).with_temperature(0.0));
    let directory = Arc::new(UserDirectory::new(vec![UserProfile {
        name: "Ada Lovelace".into(),
        email: "ada@example.com".into(),
        subscription: "premium".into(),
        user_id: 42,
        phone: "555-123-4567".into(),
        language: "en".into(),
    }]));
    let help_desk = Arc::new(ScriptedCapability::always(
        "Our help center says: you can reset your password from the account page.",
    ));
    let caller = Arc::new(ScriptedCapability::always(
        "Thanks for your time today; a ticket has been created on your behalf.",
    ));

    let flow = build_support_flow(client, directory, help_desk, caller)?;
    let mut session = flow.session();

    for m in &session.start().await?.messages {
        println!("Agent: {}", m.content);
    }

    let stdin = io::stdin();
    while !session.is_finished() {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = stdin.lock().lines().next() else {
            break;
        };
        let out = session.step(line?.trim()).await?;
        for m in &out.messages {
            println!("Agent: {}", m.content);
        }
    }

    Ok(())
}
