//! Scripted walk through the customer-support flow.
//!
//! Run: `cargo run -p convograph-examples --example customer_support`
//!
//! Every backend is scripted, so the conversation is deterministic: the user
//! identifies by email, asks a question, then requests a call back.

use std::sync::Arc;

use convograph::{ScriptedCapability, ScriptedPrediction};
use convograph_examples::{build_support_flow, UserDirectory, UserProfile};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = Arc::new(ScriptedPrediction::new([
        // "how do I reset my password?" carries no call request...
        r#"{"is_valid": false}"#,
        // ...but "call me at 555-123-4567" does.
        r#"{"is_valid": true}"#,
        r#"{"phone_number": "555-123-4567"}"#,
    ]));
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

    let greeting = session.start().await?;
    for m in &greeting.messages {
        println!("Agent: {}", m.content);
    }

    let turns = [
        "my email is ada@example.com",
        "how do I reset my password?",
        "great, now call me at 555-123-4567",
    ];
    for text in turns {
        println!("User: {}", text);
        let out = session.step(text).await?;
        for m in &out.messages {
            println!("Agent: {}", m.content);
        }
        if out.finished {
            println!("(session finished)");
            break;
        }
    }

    Ok(())
}
