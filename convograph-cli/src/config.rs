//! Run configuration: which backend judges conditions and extracts data.

/// Prediction backend for the run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Backend {
    /// Canned completions; follows the demo conversation offline.
    Scripted,
    /// Real OpenAI Chat Completions (build with `--features openai`).
    OpenAi { model: String },
}

/// Resolved configuration for one CLI run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunConfig {
    pub backend: Backend,
}

impl RunConfig {
    /// Offline demo configuration.
    pub fn scripted() -> Self {
        Self {
            backend: Backend::Scripted,
        }
    }

    /// OpenAI configuration; `model` falls back to `OPENAI_MODEL`, then to a
    /// small default.
    pub fn openai(model: Option<String>) -> Self {
        let model = model
            .or_else(|| std::env::var("OPENAI_MODEL").ok())
            .unwrap_or_else(|| "gpt-4o-mini".to_string());
        Self {
            backend: Backend::OpenAi { model },
        }
    }
}
