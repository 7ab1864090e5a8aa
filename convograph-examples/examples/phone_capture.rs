//! Minimal flow: one guarded edge that extracts a phone number.
//!
//! Run: `cargo run -p convograph-examples --example phone_capture`

use std::sync::Arc;

use convograph::{Edge, FieldSpec, FlowGraph, Message, Node, SchemaExtractor, ScriptedPrediction};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = Arc::new(ScriptedPrediction::new([
        r#"{"is_valid": true}"#,
        r#"{"phone_number": "555-123-4567"}"#,
    ]));

    let capture = Edge::guarded(
        "Did the user provide a phone number?",
        "Extract the phone number from the user message",
        client,
    )
    .to("done")
    .with_extractor(Arc::new(SchemaExtractor::new(
        "PhoneCallRequest",
        vec![FieldSpec::new("phone_number", "the number to call")],
    )))
    .with_max_retries(2)
    .with_display(|result| match result.as_value() {
        Some(v) => vec![Message::assistant(format!(
            "Got it, we will call {}",
            v["phone_number"].as_str().unwrap_or("?")
        ))],
        None => Vec::new(),
    });

    let mut flow = FlowGraph::new();
    flow.add_node(
        Node::static_prompt(
            "ask",
            ["Where can we reach you?"],
            ["A number in the format xxx-xxx-xxxx works best."],
        )
        .with_edge(capture),
    );
    flow.add_node(Node::static_prompt("done", ["Talk soon!"], Vec::<String>::new()).terminal());
    flow.start("ask");
    let flow = Arc::new(flow.compile()?);

    let mut session = flow.session();
    for m in &session.start().await?.messages {
        println!("Agent: {}", m.content);
    }
    println!("User: call me at 555-123-4567");
    let out = session.step("call me at 555-123-4567").await?;
    for m in &out.messages {
        println!("Agent: {}", m.content);
    }
    println!("finished: {}", out.finished);

    Ok(())
}
