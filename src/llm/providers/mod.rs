//! LLM provider implementations.
//!
//! `build(config, api_key)` is the factory — called at startup.
//! Adding a new backend = new module + new match arm.

pub mod dummy;
pub mod fixed;
pub mod openai_compatible;

use crate::config::LlmConfig;
use crate::llm::{LlmProvider, ProviderError};

/// Construct a `LlmProvider` from config and an optional API key.
///
/// `api_key` is sourced from `LLM_API_KEY` env (never TOML) and is `None`
/// for keyless local models. The `"none"` provider name is the caller's to
/// handle — a loop with no backend skips the factory entirely.
pub fn build(config: &LlmConfig, api_key: Option<String>) -> Result<LlmProvider, ProviderError> {
    match config.provider.as_str() {
        "dummy" => Ok(LlmProvider::Dummy(dummy::DummyProvider)),
        "openai" | "openai-compatible" => {
            let oai = &config.openai;
            let p = openai_compatible::OpenAiCompatibleProvider::new(
                oai.api_base_url.clone(),
                oai.model.clone(),
                oai.temperature,
                oai.timeout_seconds,
                api_key,
            )?;
            Ok(LlmProvider::OpenAiCompatible(p))
        }
        _ => Err(ProviderError::UnknownProvider(config.provider.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OpenAiConfig;

    fn llm_config(provider: &str) -> LlmConfig {
        LlmConfig {
            provider: provider.to_string(),
            openai: OpenAiConfig {
                api_base_url: "http://localhost:11434/v1/chat/completions".into(),
                model: "smollm:1.7b".into(),
                temperature: 0.0,
                timeout_seconds: 5,
            },
        }
    }

    #[test]
    fn builds_dummy() {
        let p = build(&llm_config("dummy"), None).unwrap();
        assert!(matches!(p, LlmProvider::Dummy(_)));
    }

    #[test]
    fn builds_openai_compatible() {
        let p = build(&llm_config("openai"), Some("sk-test".into())).unwrap();
        assert!(matches!(p, LlmProvider::OpenAiCompatible(_)));
    }

    #[test]
    fn unknown_provider_is_error() {
        let err = build(&llm_config("clippy"), None).unwrap_err();
        assert!(err.to_string().contains("unknown provider"));
    }
}
