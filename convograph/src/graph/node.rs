//! Node: a conversational state.
//!
//! A node owns an ordered list of outgoing edges and sweeps them in declared
//! order against the conversation; the first edge that fires wins, so edge
//! order is part of the flow's meaning. When no edge fires the node produces
//! its default response and the conversation stays put. How a node speaks is
//! its kind: fixed templates, or delegation to one reasoning capability.

use std::sync::Arc;

use rand::seq::SliceRandom;
use serde_json::Value;

use crate::capability::Capability;
use crate::llm::PredictionError;
use crate::message::{Message, MessageHistory};

use super::edge::Edge;
use super::output::EdgeResult;
use super::{logging, FailCounts, NodeId};

/// A conversational state: ordered outgoing edges plus a way to speak.
///
/// Build with `Node::static_prompt` or `Node::capability`, chain `with_edge`
/// per transition (order matters), and mark the flow's end states with
/// `terminal()`.
pub struct Node {
    id: NodeId,
    kind: NodeKind,
    edges: Vec<Edge>,
    terminal: bool,
}

enum NodeKind {
    /// Fixed template responses; no model call.
    Static {
        greetings: Vec<String>,
        retries: Vec<String>,
    },
    /// Delegates responses to one reasoning capability. Greeting templates,
    /// when present, take precedence over running the capability; a greeting
    /// prompt sends interpolated work to the capability on entry.
    Capability {
        capability: Arc<dyn Capability>,
        greetings: Vec<String>,
        greeting_prompt: Option<String>,
    },
}

/// What a node's turn concluded: stay and re-prompt, or hand control to
/// another node along with the firing edge's result.
pub(crate) enum NodeOutcome {
    Stay {
        messages: Vec<Message>,
    },
    Transition {
        to: NodeId,
        input: EdgeResult,
        messages: Vec<Message>,
    },
}

impl Node {
    /// Creates a node that speaks from fixed templates: one of `greetings`
    /// on entry, one of `retries` when no edge fires.
    pub fn static_prompt<I, J, S, T>(id: impl Into<NodeId>, greetings: I, retries: J) -> Self
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            id: id.into(),
            kind: NodeKind::Static {
                greetings: greetings.into_iter().map(Into::into).collect(),
                retries: retries.into_iter().map(Into::into).collect(),
            },
            edges: Vec::new(),
            terminal: false,
        }
    }

    /// Creates a node that delegates its responses to one capability.
    pub fn capability(id: impl Into<NodeId>, capability: Arc<dyn Capability>) -> Self {
        Self {
            id: id.into(),
            kind: NodeKind::Capability {
                capability,
                greetings: Vec::new(),
                greeting_prompt: None,
            },
            edges: Vec::new(),
            terminal: false,
        }
    }

    /// Sets fixed greeting templates on a capability node; placeholders like
    /// `{name}` are filled from the entering edge's extracted data.
    pub fn with_greeting_templates<I, S>(mut self, templates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let NodeKind::Capability { greetings, .. } = &mut self.kind {
            *greetings = templates.into_iter().map(Into::into).collect();
        }
        self
    }

    /// Sets a prompt the capability runs on entry, interpolated from the
    /// entering edge's extracted data.
    pub fn with_greeting_prompt(mut self, prompt: impl Into<String>) -> Self {
        if let NodeKind::Capability {
            greeting_prompt, ..
        } = &mut self.kind
        {
            *greeting_prompt = Some(prompt.into());
        }
        self
    }

    /// Appends an outgoing edge. Declaration order is evaluation order.
    pub fn with_edge(mut self, edge: Edge) -> Self {
        self.edges.push(edge);
        self
    }

    /// Marks this node as an end state: entering it finishes the session.
    pub fn terminal(mut self) -> Self {
        self.terminal = true;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    pub(crate) fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Sweeps the outgoing edges in declared order; the first edge that
    /// fires decides the outcome. Display messages from attempted edges are
    /// kept in order even when the turn ends in a retry, so extraction
    /// diagnostics reach the history.
    pub(crate) async fn execute(
        &self,
        history: &MessageHistory,
        fails: &mut FailCounts,
    ) -> Result<NodeOutcome, PredictionError> {
        let mut gathered: Vec<Message> = Vec::new();
        for (index, edge) in self.edges.iter().enumerate() {
            let count = fails.entry((self.id.clone(), index)).or_insert(0);
            let out = edge.execute(history, count).await?;
            logging::log_edge_outcome(&self.id, index, out.should_continue, out.fail_count);
            gathered.extend(out.display);
            if out.should_continue {
                if let Some(to) = out.next_node {
                    let input = out.result.unwrap_or(EdgeResult::Skipped);
                    return Ok(NodeOutcome::Transition {
                        to,
                        input,
                        messages: gathered,
                    });
                }
                // Fired without a target (give-up or terminal check): the
                // node speaks for itself and the conversation stays here.
                gathered.extend(self.fallback(history).await?);
                return Ok(NodeOutcome::Stay { messages: gathered });
            }
        }
        gathered.extend(self.fallback(history).await?);
        Ok(NodeOutcome::Stay { messages: gathered })
    }

    /// Produces the node's entry messages. `input` is the extracted result
    /// of the edge that led here; the start node enters with `None`.
    pub(crate) async fn greeting(
        &self,
        input: Option<&EdgeResult>,
        _history: &MessageHistory,
    ) -> Result<Vec<Message>, PredictionError> {
        match &self.kind {
            NodeKind::Static { greetings, .. } => Ok(choose(greetings)
                .map(|t| vec![Message::assistant(fill_template(t, input))])
                .unwrap_or_default()),
            NodeKind::Capability {
                capability,
                greetings,
                greeting_prompt,
            } => {
                if let Some(template) = choose(greetings) {
                    return Ok(vec![Message::assistant(fill_template(template, input))]);
                }
                match greeting_prompt {
                    Some(prompt) => {
                        let mut task = MessageHistory::new();
                        task.push_user(fill_template(prompt, input));
                        let answer = capability.run(&task).await?;
                        Ok(vec![Message::assistant(answer)])
                    }
                    None => Ok(Vec::new()),
                }
            }
        }
    }

    /// The default response when no edge fires: a retry template, or the
    /// capability answering the conversation directly.
    async fn fallback(&self, history: &MessageHistory) -> Result<Vec<Message>, PredictionError> {
        match &self.kind {
            NodeKind::Static { retries, .. } => Ok(choose(retries)
                .map(|t| vec![Message::assistant(t.clone())])
                .unwrap_or_default()),
            NodeKind::Capability { capability, .. } => {
                let answer = capability.run(history).await?;
                Ok(vec![Message::assistant(answer)])
            }
        }
    }
}

/// Picks one template from a small fixed set.
fn choose(templates: &[String]) -> Option<&String> {
    templates.choose(&mut rand::thread_rng())
}

/// Fills `{field}` placeholders from the extracted value: object fields by
/// name for extracted data, `{input}` for raw text. Placeholders without a
/// matching field are left untouched.
fn fill_template(template: &str, input: Option<&EdgeResult>) -> String {
    match input {
        Some(EdgeResult::Extracted(Value::Object(fields))) => {
            let mut out = template.to_string();
            for (name, value) in fields {
                let rendered = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                out = out.replace(&format!("{{{}}}", name), &rendered);
            }
            out
        }
        Some(EdgeResult::Raw(text)) => template.replace("{input}", text),
        _ => template.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::ScriptedCapability;
    use crate::message::Role;
    use serde_json::json;

    fn history() -> MessageHistory {
        let mut h = MessageHistory::new();
        h.push_user("hello there");
        h
    }

    fn firing_edge(target: &str, payload: &str) -> Edge {
        Edge::capability_driven(Arc::new(ScriptedCapability::always(payload))).to(target)
    }

    /// **Scenario**: with two edges that would both fire, the first declared
    /// wins; swapping declaration order changes the chosen transition.
    #[tokio::test]
    async fn first_firing_edge_wins_and_order_matters() {
        let node = Node::static_prompt("start", ["hi"], ["again?"])
            .with_edge(firing_edge("a", "payload-a"))
            .with_edge(firing_edge("b", "payload-b"));
        let mut fails = FailCounts::new();
        match node.execute(&history(), &mut fails).await.unwrap() {
            NodeOutcome::Transition { to, .. } => assert_eq!(to, "a"),
            NodeOutcome::Stay { .. } => panic!("expected a transition"),
        }

        let swapped = Node::static_prompt("start", ["hi"], ["again?"])
            .with_edge(firing_edge("b", "payload-b"))
            .with_edge(firing_edge("a", "payload-a"));
        match swapped.execute(&history(), &mut fails).await.unwrap() {
            NodeOutcome::Transition { to, .. } => assert_eq!(to, "b"),
            NodeOutcome::Stay { .. } => panic!("expected a transition"),
        }
    }

    /// **Scenario**: when no edge fires, the node's retry template answers
    /// and the conversation stays put.
    #[tokio::test]
    async fn no_firing_edge_falls_back_to_retry() {
        let client = Arc::new(crate::llm::ScriptedPrediction::always(
            r#"{"is_valid": false}"#,
        ));
        let node = Node::static_prompt("start", ["hi"], ["could you rephrase?"])
            .with_edge(Edge::guarded("a call request?", "extract it", client).to("call"));
        let mut fails = FailCounts::new();
        match node.execute(&history(), &mut fails).await.unwrap() {
            NodeOutcome::Stay { messages } => {
                assert_eq!(messages.len(), 1);
                assert_eq!(messages[0], Message::assistant("could you rephrase?"));
            }
            NodeOutcome::Transition { .. } => panic!("expected to stay"),
        }
        assert_eq!(fails[&("start".to_string(), 0)], 1);
    }

    /// **Scenario**: the firing edge's transition carries its result as the
    /// next node's input.
    #[tokio::test]
    async fn transition_carries_edge_result() {
        let node = Node::static_prompt("start", ["hi"], ["again?"])
            .with_edge(firing_edge("next", "the answer"));
        let mut fails = FailCounts::new();
        match node.execute(&history(), &mut fails).await.unwrap() {
            NodeOutcome::Transition { input, .. } => {
                assert_eq!(input, EdgeResult::Raw("the answer".into()));
            }
            NodeOutcome::Stay { .. } => panic!("expected a transition"),
        }
    }

    /// **Scenario**: greeting templates interpolate fields from the entering
    /// edge's extracted data.
    #[tokio::test]
    async fn greeting_interpolates_extracted_fields() {
        let node = Node::capability("help", Arc::new(ScriptedCapability::always("n/a")))
            .with_greeting_templates(["Hi {name}, you have the {subscription} plan"]);
        let input = EdgeResult::Extracted(json!({"name": "Ada", "subscription": "premium"}));
        let messages = node.greeting(Some(&input), &history()).await.unwrap();
        assert_eq!(
            messages[0].content,
            "Hi Ada, you have the premium plan"
        );
        assert_eq!(messages[0].role, Role::Assistant);
    }

    /// **Scenario**: without templates, a greeting prompt sends interpolated
    /// work to the capability and wraps its answer.
    #[tokio::test]
    async fn greeting_prompt_runs_capability() {
        let node = Node::capability(
            "call",
            Arc::new(ScriptedCapability::always("Called them, all sorted")),
        )
        .with_greeting_prompt("Call the user on {phone_number}")
        .terminal();
        let input = EdgeResult::Extracted(json!({"phone_number": "555-0001"}));
        let messages = node.greeting(Some(&input), &history()).await.unwrap();
        assert_eq!(messages[0].content, "Called them, all sorted");
        assert!(node.is_terminal());
    }

    /// **Scenario**: a capability node with no edge firing answers from the
    /// conversation itself.
    #[tokio::test]
    async fn capability_fallback_answers_from_history() {
        let node = Node::capability(
            "help",
            Arc::new(ScriptedCapability::always("here is what I found")),
        );
        let mut fails = FailCounts::new();
        match node.execute(&history(), &mut fails).await.unwrap() {
            NodeOutcome::Stay { messages } => {
                assert_eq!(messages[0].content, "here is what I found");
            }
            NodeOutcome::Transition { .. } => panic!("expected to stay"),
        }
    }

    /// **Scenario**: placeholders fill from object fields, `{input}` from raw
    /// text, and unknown placeholders survive untouched.
    #[test]
    fn fill_template_cases() {
        let extracted = EdgeResult::Extracted(json!({"name": "Ada", "user_id": 7}));
        assert_eq!(
            fill_template("{name} (#{user_id}) {missing}", Some(&extracted)),
            "Ada (#7) {missing}"
        );
        let raw = EdgeResult::Raw("plain text".into());
        assert_eq!(fill_template("got: {input}", Some(&raw)), "got: plain text");
        assert_eq!(fill_template("hello {name}", None), "hello {name}");
        assert_eq!(
            fill_template("hello {name}", Some(&EdgeResult::Skipped)),
            "hello {name}"
        );
    }
}
