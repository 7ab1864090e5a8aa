use crate::config::{Backend, RunConfig};

/// **Scenario**: the offline configuration selects the scripted backend.
#[test]
fn scripted_config() {
    assert_eq!(RunConfig::scripted().backend, Backend::Scripted);
}

/// **Scenario**: an explicit model wins over environment defaults.
#[test]
fn openai_config_prefers_explicit_model() {
    let config = RunConfig::openai(Some("gpt-4.1".into()));
    assert_eq!(
        config.backend,
        Backend::OpenAi {
            model: "gpt-4.1".into()
        }
    );
}
