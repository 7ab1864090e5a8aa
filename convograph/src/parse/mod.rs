//! Structured-output parsing boundary.
//!
//! Completions come back as prose with a JSON object somewhere inside; this
//! module locates that object and checks it against a declared schema. The
//! `Extractor` trait is the seam edges use for their extraction step;
//! `SchemaExtractor` implements it over a plain field list. The boolean
//! `Validation` schema drives edge guard checks.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Structured-parse failure, carrying the offending completion text so
/// callers can log or surface it.
#[derive(Debug, Error)]
#[error("could not parse structured output: {reason}")]
pub struct ParseError {
    /// Why the text did not conform.
    pub reason: String,
    /// The raw completion that failed to parse.
    pub raw: String,
}

impl ParseError {
    pub fn new(reason: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            raw: raw.into(),
        }
    }
}

/// Boolean guard schema: the validator-as-parser used by edge checks.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Validation {
    /// Whether the condition is satisfied by the conversation.
    pub is_valid: bool,
}

/// Locates the first JSON object in a completion and deserializes it into `T`.
///
/// Tolerates prose and markdown fences around the object; only the outermost
/// `{...}` span is considered.
pub fn from_completion<T: DeserializeOwned>(text: &str) -> Result<T, ParseError> {
    let slice = json_slice(text)
        .ok_or_else(|| ParseError::new("no JSON object in completion", text))?;
    serde_json::from_str(slice).map_err(|e| ParseError::new(e.to_string(), text))
}

/// Returns the span of the first balanced `{...}` object, respecting strings
/// and escapes, or None when no complete object is present.
fn json_slice(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// One field of a declared extraction schema: a name plus the description
/// shown to the model in format instructions.
#[derive(Clone, Debug)]
pub struct FieldSpec {
    pub name: String,
    pub description: String,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Structured parser: format instructions for the prompt, plus a parse of the
/// completion into a JSON value of the target schema.
///
/// **Interaction**: consumed by the edge extraction step; object-safe so
/// edges can hold `Arc<dyn Extractor>` for any schema.
pub trait Extractor: Send + Sync {
    /// Format instructions injected into the extraction prompt.
    fn instructions(&self) -> String;

    /// Parse a completion into a value of the target schema.
    fn parse(&self, text: &str) -> Result<Value, ParseError>;
}

/// Extractor over a declared field list: instructions enumerate the fields,
/// parse requires a JSON object carrying every declared field.
pub struct SchemaExtractor {
    name: String,
    fields: Vec<FieldSpec>,
}

impl SchemaExtractor {
    pub fn new(name: impl Into<String>, fields: Vec<FieldSpec>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }
}

impl Extractor for SchemaExtractor {
    fn instructions(&self) -> String {
        let mut out = format!(
            "Respond with a single JSON object ({}) with exactly these keys:\n",
            self.name
        );
        for field in &self.fields {
            out.push_str(&format!("- \"{}\": {}\n", field.name, field.description));
        }
        out
    }

    fn parse(&self, text: &str) -> Result<Value, ParseError> {
        let value: Value = from_completion(text)?;
        let object = value
            .as_object()
            .ok_or_else(|| ParseError::new("completion is not a JSON object", text))?;
        for field in &self.fields {
            if !object.contains_key(&field.name) {
                return Err(ParseError::new(
                    format!("missing field '{}'", field.name),
                    text,
                ));
            }
        }
        Ok(value)
    }
}
