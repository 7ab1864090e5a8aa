//! Edge: a guarded, optionally data-extracting transition.
//!
//! An edge fires in two steps: a **check** (a boolean guard judged over the
//! conversation) and an **extraction** (a structured parse of the data the
//! transition carries). Either step can fail; consecutive failures are
//! counted per session and, once a retry budget is exhausted, the edge gives
//! up gracefully instead of trapping the conversation. A second variant
//! skips the check and lets a capability drive the reasoning directly.

use std::sync::Arc;

use crate::capability::Capability;
use crate::llm::{PredictionClient, PredictionError};
use crate::message::{Message, MessageHistory};
use crate::parse::{from_completion, Extractor, Validation};

use super::output::{EdgeOutput, EdgeResult};
use super::NodeId;

/// Mapping from an edge's extraction result to the messages it wants
/// recorded, e.g. a SYSTEM note plus an ASSISTANT confirmation.
pub type DisplayFn = Arc<dyn Fn(&EdgeResult) -> Vec<Message> + Send + Sync>;

/// A transition between nodes.
///
/// Build with `Edge::guarded` (condition check + extraction) or
/// `Edge::capability_driven` (no check; a capability produces the text to
/// parse), then chain `to`, `with_extractor`, `with_max_retries`,
/// `with_display`. Without `to`, a firing edge does not advance the flow:
/// the owning node falls through to its default response.
pub struct Edge {
    target: Option<NodeId>,
    max_retries: Option<u32>,
    display: Option<DisplayFn>,
    kind: EdgeKind,
}

enum EdgeKind {
    /// Condition check via the prediction service, then schema extraction.
    Guarded {
        condition: String,
        parse_prompt: String,
        extractor: Option<Arc<dyn Extractor>>,
        client: Arc<dyn PredictionClient>,
    },
    /// No guard: a capability drives the reasoning, its answer is parsed.
    Unguarded {
        capability: Arc<dyn Capability>,
        extractor: Option<Arc<dyn Extractor>>,
    },
}

impl Edge {
    /// Creates a guarded edge: `condition` is a yes/no question about the
    /// conversation, `parse_prompt` tells the extraction step what to pull
    /// out once the condition holds.
    pub fn guarded(
        condition: impl Into<String>,
        parse_prompt: impl Into<String>,
        client: Arc<dyn PredictionClient>,
    ) -> Self {
        Self {
            target: None,
            max_retries: None,
            display: None,
            kind: EdgeKind::Guarded {
                condition: condition.into(),
                parse_prompt: parse_prompt.into(),
                extractor: None,
                client,
            },
        }
    }

    /// Creates an unguarded edge whose check always proceeds: the capability
    /// produces the text the extraction step parses.
    pub fn capability_driven(capability: Arc<dyn Capability>) -> Self {
        Self {
            target: None,
            max_retries: None,
            display: None,
            kind: EdgeKind::Unguarded {
                capability,
                extractor: None,
            },
        }
    }

    /// Sets the node this edge leads to.
    pub fn to(mut self, target: impl Into<NodeId>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Sets the extraction schema. Without one, a passing edge carries the
    /// raw completion text.
    pub fn with_extractor(mut self, extractor: Arc<dyn Extractor>) -> Self {
        match &mut self.kind {
            EdgeKind::Guarded { extractor: e, .. } => *e = Some(extractor),
            EdgeKind::Unguarded { extractor: e, .. } => *e = Some(extractor),
        }
        self
    }

    /// Bounds consecutive failures; once reached, the edge fires empty
    /// instead of retrying forever. Unset means infinite patience.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Sets the mapping from extraction result to recorded messages.
    pub fn with_display(
        mut self,
        display: impl Fn(&EdgeResult) -> Vec<Message> + Send + Sync + 'static,
    ) -> Self {
        self.display = Some(Arc::new(display));
        self
    }

    /// The node this edge leads to, when it advances the flow.
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Runs the check and extraction steps against the conversation.
    ///
    /// `fail_count` is this edge's session-local consecutive-failure counter;
    /// it is incremented on either failure mode and reset only by a full
    /// check-plus-extraction success. Prediction transport failures propagate
    /// untouched so the session can leave its state unmodified.
    pub(crate) async fn execute(
        &self,
        history: &MessageHistory,
        fail_count: &mut u32,
    ) -> Result<EdgeOutput, PredictionError> {
        match &self.kind {
            EdgeKind::Guarded {
                condition,
                parse_prompt,
                extractor,
                client,
            } => {
                if !self.check(condition, client, history).await? {
                    *fail_count += 1;
                    if let Some(max) = self.max_retries {
                        if *fail_count >= max {
                            // Give up gracefully: fire without data and let
                            // the node fall through to its default response.
                            return Ok(EdgeOutput {
                                should_continue: true,
                                result: Some(EdgeResult::Skipped),
                                display: Vec::new(),
                                fail_count: *fail_count,
                                next_node: None,
                            });
                        }
                    }
                    return Ok(EdgeOutput::retry(*fail_count, Vec::new()));
                }

                let instructions = match extractor {
                    Some(e) => format!("{}\n{}", parse_prompt, e.instructions()),
                    None => parse_prompt.clone(),
                };
                let completion = client.predict(&history.prompt_context(instructions)).await?;
                Ok(self.conclude(extractor.as_ref(), completion, fail_count))
            }
            EdgeKind::Unguarded {
                capability,
                extractor,
            } => {
                let answer = capability.run(history).await?;
                Ok(self.conclude(extractor.as_ref(), answer, fail_count))
            }
        }
    }

    /// Judge the guard condition. A completion the boolean validator cannot
    /// parse counts as condition-not-met, not as an extraction failure.
    async fn check(
        &self,
        condition: &str,
        client: &Arc<dyn PredictionClient>,
        history: &MessageHistory,
    ) -> Result<bool, PredictionError> {
        let instructions = format!(
            "Decide whether the input satisfies the condition.\n\
             Condition: {}\n\
             Respond with a single JSON object with exactly one key \"is_valid\" (boolean).",
            condition
        );
        let completion = client.predict(&history.prompt_context(instructions)).await?;
        Ok(from_completion::<Validation>(&completion)
            .map(|v| v.is_valid)
            .unwrap_or(false))
    }

    /// Parse the produced text and finish the invocation: success resets the
    /// fail count and fires with data; a parse failure retries or, once the
    /// budget is exhausted, fires empty with a SYSTEM diagnostic while still
    /// advancing.
    fn conclude(
        &self,
        extractor: Option<&Arc<dyn Extractor>>,
        completion: String,
        fail_count: &mut u32,
    ) -> EdgeOutput {
        let result = match extractor {
            Some(extractor) => match extractor.parse(&completion) {
                Ok(value) => EdgeResult::Extracted(value),
                Err(err) => {
                    *fail_count += 1;
                    let diagnostic = Message::system(err.raw);
                    if let Some(max) = self.max_retries {
                        if *fail_count >= max {
                            return EdgeOutput {
                                should_continue: true,
                                result: Some(EdgeResult::Skipped),
                                display: vec![diagnostic],
                                fail_count: *fail_count,
                                next_node: self.target.clone(),
                            };
                        }
                    }
                    return EdgeOutput::retry(*fail_count, vec![diagnostic]);
                }
            },
            None => EdgeResult::Raw(completion),
        };

        *fail_count = 0;
        let display = self
            .display
            .as_ref()
            .map(|f| f(&result))
            .unwrap_or_default();
        EdgeOutput {
            should_continue: true,
            result: Some(result),
            display,
            fail_count: 0,
            next_node: self.target.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::ScriptedCapability;
    use crate::llm::ScriptedPrediction;
    use crate::message::Role;
    use crate::parse::{FieldSpec, SchemaExtractor};

    const NO: &str = r#"{"is_valid": false}"#;
    const YES: &str = r#"{"is_valid": true}"#;

    fn history() -> MessageHistory {
        let mut h = MessageHistory::new();
        h.push_assistant("who are you?");
        h.push_user("call me at 555-123-4567");
        h
    }

    fn phone_extractor() -> Arc<dyn Extractor> {
        Arc::new(SchemaExtractor::new(
            "PhoneCallRequest",
            vec![FieldSpec::new("phone_number", "the number to call")],
        ))
    }

    /// **Scenario**: a failed check under the retry budget increments the
    /// fail count and does not fire.
    #[tokio::test]
    async fn failed_check_under_budget_retries() {
        let client = Arc::new(ScriptedPrediction::new([NO]));
        let edge = Edge::guarded("pending call request?", "extract the number", client)
            .to("call")
            .with_max_retries(3);
        let mut fails = 0;
        let out = edge.execute(&history(), &mut fails).await.unwrap();
        assert!(!out.should_continue);
        assert!(out.result.is_none());
        assert_eq!(fails, 1);
        assert!(out.next_node.is_none());
    }

    /// **Scenario**: with max_retries = 2, the 2nd consecutive check failure
    /// fires empty with no target: give up, do not trap the user.
    #[tokio::test]
    async fn check_exhaustion_fires_empty_without_target() {
        let client = Arc::new(ScriptedPrediction::always(NO));
        let edge = Edge::guarded("pending call request?", "extract the number", client)
            .to("call")
            .with_max_retries(2);
        let mut fails = 0;
        let first = edge.execute(&history(), &mut fails).await.unwrap();
        assert!(!first.should_continue);
        let second = edge.execute(&history(), &mut fails).await.unwrap();
        assert!(second.should_continue);
        assert_eq!(second.result, Some(EdgeResult::Skipped));
        assert!(second.next_node.is_none(), "a give-up must not advance");
        assert!(second.display.is_empty(), "condition path has no diagnostic");
    }

    /// **Scenario**: without max_retries, failed checks never fire, however
    /// many times they repeat.
    #[tokio::test]
    async fn unset_budget_means_infinite_patience() {
        let client = Arc::new(ScriptedPrediction::always(NO));
        let edge =
            Edge::guarded("pending call request?", "extract the number", client).to("call");
        let mut fails = 0;
        for expected in 1..=5u32 {
            let out = edge.execute(&history(), &mut fails).await.unwrap();
            assert!(!out.should_continue);
            assert_eq!(fails, expected);
        }
    }

    /// **Scenario**: a passing check with an unparseable extraction records a
    /// SYSTEM diagnostic and retries.
    #[tokio::test]
    async fn extraction_failure_under_budget_retries_with_diagnostic() {
        let client = Arc::new(ScriptedPrediction::new([YES, "sorry, no JSON here"]));
        let edge = Edge::guarded("pending call request?", "extract the number", client)
            .to("call")
            .with_extractor(phone_extractor())
            .with_max_retries(3);
        let mut fails = 0;
        let out = edge.execute(&history(), &mut fails).await.unwrap();
        assert!(!out.should_continue);
        assert_eq!(fails, 1);
        assert_eq!(out.display.len(), 1);
        assert_eq!(out.display[0].role, Role::System);
        assert!(out.display[0].content.contains("no JSON here"));
    }

    /// **Scenario**: exhausting the budget on extraction failures fires with
    /// a diagnostic and still advances to the target.
    #[tokio::test]
    async fn extraction_exhaustion_advances_with_diagnostic() {
        let client =
            Arc::new(ScriptedPrediction::new([YES, "garbage", YES, "more garbage"]));
        let edge = Edge::guarded("pending call request?", "extract the number", client)
            .to("call")
            .with_extractor(phone_extractor())
            .with_max_retries(2);
        let mut fails = 0;
        let first = edge.execute(&history(), &mut fails).await.unwrap();
        assert!(!first.should_continue);
        let second = edge.execute(&history(), &mut fails).await.unwrap();
        assert!(second.should_continue);
        assert_eq!(second.result, Some(EdgeResult::Skipped));
        assert_eq!(second.next_node.as_deref(), Some("call"));
        assert_eq!(second.display[0].role, Role::System);
    }

    /// **Scenario**: a full success resets the fail count; the next failure
    /// counts from 1, not from the prior accumulated value.
    #[tokio::test]
    async fn success_resets_fail_count() {
        let client = Arc::new(ScriptedPrediction::new([
            NO,
            YES,
            r#"{"phone_number": "555-123-4567"}"#,
            NO,
        ]));
        let edge = Edge::guarded("pending call request?", "extract the number", client)
            .to("call")
            .with_extractor(phone_extractor())
            .with_max_retries(5);
        let mut fails = 0;
        edge.execute(&history(), &mut fails).await.unwrap();
        assert_eq!(fails, 1);
        let ok = edge.execute(&history(), &mut fails).await.unwrap();
        assert!(ok.should_continue);
        assert_eq!(fails, 0);
        assert_eq!(
            ok.result.unwrap().as_value().unwrap()["phone_number"],
            "555-123-4567"
        );
        edge.execute(&history(), &mut fails).await.unwrap();
        assert_eq!(fails, 1);
    }

    /// **Scenario**: a schema-less edge carries the raw completion text.
    #[tokio::test]
    async fn schemaless_edge_carries_raw_text() {
        let client = Arc::new(ScriptedPrediction::new([YES, "their order is delayed"]));
        let edge =
            Edge::guarded("did the user describe a problem?", "summarize it", client).to("help");
        let mut fails = 0;
        let out = edge.execute(&history(), &mut fails).await.unwrap();
        assert_eq!(
            out.result,
            Some(EdgeResult::Raw("their order is delayed".into()))
        );
    }

    /// **Scenario**: the display mapping turns the extraction result into
    /// recorded messages.
    #[tokio::test]
    async fn display_mapping_runs_on_success() {
        let client =
            Arc::new(ScriptedPrediction::new([YES, r#"{"phone_number": "555-0001"}"#]));
        let edge = Edge::guarded("pending call request?", "extract the number", client)
            .to("call")
            .with_extractor(phone_extractor())
            .with_display(|result| {
                let number = result.as_value().unwrap()["phone_number"]
                    .as_str()
                    .unwrap()
                    .to_string();
                vec![
                    Message::system("call request recorded"),
                    Message::assistant(format!("Calling you now on {}", number)),
                ]
            });
        let mut fails = 0;
        let out = edge.execute(&history(), &mut fails).await.unwrap();
        assert_eq!(out.display.len(), 2);
        assert_eq!(out.display[0].role, Role::System);
        assert!(out.display[1].content.contains("555-0001"));
    }

    /// **Scenario**: a capability-driven edge skips the check and parses the
    /// capability's answer.
    #[tokio::test]
    async fn capability_edge_skips_check() {
        let capability = Arc::new(ScriptedCapability::new([
            r#"{"phone_number": "555-9999"}"#,
        ]));
        let edge = Edge::capability_driven(capability)
            .to("call")
            .with_extractor(phone_extractor());
        let mut fails = 0;
        let out = edge.execute(&history(), &mut fails).await.unwrap();
        assert!(out.should_continue);
        assert_eq!(
            out.result.unwrap().as_value().unwrap()["phone_number"],
            "555-9999"
        );
    }

    /// **Scenario**: a prediction transport failure propagates instead of
    /// counting as an edge failure.
    #[tokio::test]
    async fn transport_failure_propagates() {
        let client = Arc::new(ScriptedPrediction::new(Vec::<String>::new()));
        let edge = Edge::guarded("anything?", "extract", client).to("next");
        let mut fails = 0;
        let err = edge.execute(&history(), &mut fails).await.unwrap_err();
        assert!(matches!(err, PredictionError::Transport(_)));
        assert_eq!(fails, 0, "transport failures are not edge failures");
    }
}
