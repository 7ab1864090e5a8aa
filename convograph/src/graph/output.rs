//! Edge invocation results.

use serde_json::Value;

use crate::message::Message;

use super::NodeId;

/// What a fired edge carries forward.
///
/// Distinguishes real success (`Extracted`/`Raw`) from a graceful give-up
/// (`Skipped`), so a node entered after retry exhaustion can tell it received
/// no data rather than empty data.
#[derive(Clone, Debug, PartialEq)]
pub enum EdgeResult {
    /// Extraction produced a value of the edge's declared schema.
    Extracted(Value),
    /// The guard passed on a schema-less edge; the raw completion text.
    Raw(String),
    /// The edge fired by exhausting its retry budget; no data.
    Skipped,
}

impl EdgeResult {
    /// The extracted value, when this is a real extraction.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            EdgeResult::Extracted(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, EdgeResult::Skipped)
    }
}

/// Outcome of one edge invocation.
///
/// `should_continue` means the edge fired, either by passing its check and
/// extraction or by exhausting its retry budget. `next_node` is `None` for a
/// non-advancing edge (a give-up, or a terminal check). `display` carries the
/// messages this invocation wants recorded, in order; SYSTEM-role entries are
/// context for the model, never shown to the user.
#[derive(Clone, Debug)]
pub struct EdgeOutput {
    pub should_continue: bool,
    pub result: Option<EdgeResult>,
    pub display: Vec<Message>,
    pub fail_count: u32,
    pub next_node: Option<NodeId>,
}

impl EdgeOutput {
    /// A non-firing outcome: the edge stays mid-retry, the node re-prompts.
    pub(crate) fn retry(fail_count: u32, display: Vec<Message>) -> Self {
        Self {
            should_continue: false,
            result: None,
            display,
            fail_count,
            next_node: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// **Scenario**: as_value exposes extracted data and nothing else.
    #[test]
    fn edge_result_accessors() {
        let extracted = EdgeResult::Extracted(json!({"phone_number": "555-0000"}));
        assert_eq!(
            extracted.as_value().unwrap()["phone_number"],
            "555-0000"
        );
        assert!(EdgeResult::Skipped.as_value().is_none());
        assert!(EdgeResult::Skipped.is_skipped());
        assert!(!EdgeResult::Raw("text".into()).is_skipped());
    }
}
