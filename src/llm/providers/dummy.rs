//! Dummy LLM provider — echoes input back prefixed with `[echo]`.
//!
//! The echo is never valid proposal or feedback JSON, so wiring this
//! provider in exercises the planner/reviewer fallback paths end to end
//! without a real API key.

use crate::llm::ProviderError;

#[derive(Debug, Clone)]
pub struct DummyProvider;

impl DummyProvider {
    pub async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        Ok(format!("[echo] {prompt}"))
    }
}
