//! Configuration loading with env-var overrides.
//!
//! Reads `config/default.toml` relative to the current working directory,
//! then applies the `REVISOR_LOG_LEVEL` env override. The LLM API key comes
//! from the `LLM_API_KEY` env var only, never from TOML.

use std::{env, fs, path::Path};

use serde::Deserialize;

use crate::error::AppError;

/// OpenAI / OpenAI-compatible provider configuration.
/// Populated from `[llm.openai]` in the TOML.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Full chat completions endpoint URL.
    pub api_base_url: String,
    /// Model name passed in the request body.
    pub model: String,
    /// Sampling temperature. Defaults to 0.0 so repeated reviews of the
    /// same proposal reach the same verdict.
    pub temperature: f32,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
}

/// LLM backend configuration.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Which backend is active (`"none"`, `"dummy"`, `"openai"`).
    /// Maps to `default` in `[llm]` TOML — named `default` there to signal
    /// that other provider sections can coexist without being loaded.
    pub provider: String,
    /// Config for the OpenAI / OpenAI-compatible provider (`[llm.openai]`).
    pub openai: OpenAiConfig,
}

/// Revision loop configuration.
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    /// Hard bound on worker dispatches per run.
    pub max_turns: u32,
}

/// Fully-resolved runner configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    /// Default review mode when the CLI does not pass `--strict`.
    pub strict: bool,
    pub workflow: WorkflowConfig,
    pub llm: LlmConfig,
    /// API key from `LLM_API_KEY` env var — `None` for keyless local models.
    pub llm_api_key: Option<String>,
}

/// Raw TOML shape — `serde` target before resolution.
#[derive(Deserialize)]
struct RawConfig {
    runner: RawRunner,
    #[serde(default)]
    workflow: RawWorkflow,
    #[serde(default)]
    llm: RawLlm,
}

#[derive(Deserialize)]
struct RawRunner {
    log_level: String,
    #[serde(default = "default_false")]
    strict: bool,
}

#[derive(Deserialize, Default)]
struct RawWorkflow {
    #[serde(default)]
    max_turns: Option<u32>,
}

#[derive(Deserialize)]
struct RawLlm {
    /// Maps to `default = "..."` in `[llm]`.
    #[serde(rename = "default", default = "default_llm_provider")]
    provider: String,
    #[serde(default)]
    openai: RawOpenAiConfig,
}

impl Default for RawLlm {
    fn default() -> Self {
        Self { provider: default_llm_provider(), openai: RawOpenAiConfig::default() }
    }
}

#[derive(Deserialize)]
struct RawOpenAiConfig {
    #[serde(default = "default_openai_api_base_url")]
    api_base_url: String,
    #[serde(default = "default_openai_model")]
    model: String,
    #[serde(default = "default_openai_temperature")]
    temperature: f32,
    #[serde(default = "default_openai_timeout_seconds")]
    timeout_seconds: u64,
}

impl Default for RawOpenAiConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_openai_api_base_url(),
            model: default_openai_model(),
            temperature: default_openai_temperature(),
            timeout_seconds: default_openai_timeout_seconds(),
        }
    }
}

fn default_llm_provider() -> String { "none".to_string() }
fn default_openai_api_base_url() -> String { "https://api.openai.com/v1/chat/completions".to_string() }
fn default_openai_model() -> String { "gpt-4o-mini".to_string() }
fn default_openai_temperature() -> f32 { 0.0 }
fn default_openai_timeout_seconds() -> u64 { 60 }

fn default_false() -> bool {
    false
}

/// Load config from `config/default.toml`, then apply env-var overrides.
pub fn load() -> Result<Config, AppError> {
    let log_level_override = env::var("REVISOR_LOG_LEVEL").ok();
    let api_key = env::var("LLM_API_KEY").ok().filter(|k| !k.is_empty());
    load_from(
        Path::new("config/default.toml"),
        log_level_override.as_deref(),
        api_key,
    )
}

/// Internal loader — accepts an explicit path and optional overrides.
/// Tests pass overrides directly instead of mutating env vars.
pub fn load_from(
    path: &Path,
    log_level_override: Option<&str>,
    llm_api_key: Option<String>,
) -> Result<Config, AppError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;

    let parsed: RawConfig = toml::from_str(&raw)
        .map_err(|e| AppError::Config(format!("parse error in {}: {e}", path.display())))?;

    let log_level = log_level_override.unwrap_or(&parsed.runner.log_level).to_string();

    Ok(Config {
        log_level,
        strict: parsed.runner.strict,
        workflow: WorkflowConfig {
            max_turns: parsed.workflow.max_turns.unwrap_or(crate::workflow::MAX_TURNS),
        },
        llm: LlmConfig {
            provider: parsed.llm.provider,
            openai: OpenAiConfig {
                api_base_url: parsed.llm.openai.api_base_url,
                model: parsed.llm.openai.model,
                temperature: parsed.llm.openai.temperature,
                timeout_seconds: parsed.llm.openai.timeout_seconds,
            },
        },
        llm_api_key,
    })
}
