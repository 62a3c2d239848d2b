//! Fixed LLM provider — returns one configured reply for every prompt.
//!
//! Built programmatically rather than from config. Handy for deterministic
//! runs and for forcing a specific structured reply (for example a reviewer
//! verdict that always rejects) through the full loop.

use std::sync::Arc;

use crate::llm::ProviderError;

#[derive(Debug, Clone)]
pub struct FixedProvider {
    reply: Arc<str>,
}

impl FixedProvider {
    pub fn new(reply: impl Into<String>) -> Self {
        Self { reply: reply.into().into() }
    }

    pub async fn complete(&self, _prompt: &str) -> Result<String, ProviderError> {
        Ok(self.reply.to_string())
    }
}
