use crate::config::RunConfig;
use crate::flow::build_flow;

/// **Scenario**: the scripted flow compiles with the three support nodes.
#[test]
fn scripted_flow_builds() {
    let flow = build_flow(&RunConfig::scripted()).expect("flow compiles");
    assert_eq!(flow.start_id(), "welcome");
    assert!(flow.get("help").is_some());
    assert!(flow.get("call").is_some());
}

/// **Scenario**: the demo conversation runs to completion against the
/// scripted backend: identify, ask a question, request the call.
#[tokio::test]
async fn demo_conversation_finishes() {
    let flow = build_flow(&RunConfig::scripted()).expect("flow compiles");
    let mut session = flow.session();

    let greeting = session.start().await.unwrap();
    assert!(greeting.messages[0].content.contains("identify"));

    let identified = session.step("my email is ada@example.com").await.unwrap();
    assert!(identified.messages[0].content.contains("Ada Lovelace"));

    let answered = session.step("how do I reset my password?").await.unwrap();
    assert!(!answered.finished);
    assert!(answered.messages[0].content.contains("help center"));

    let called = session.step("call me at 555-123-4567").await.unwrap();
    assert!(called.finished);
    assert!(session.is_finished());
}
