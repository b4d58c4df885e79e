//! AI client adapter.
//!
//! Turns a request [`Mode`] into a prompt plus response schema, hands it to
//! the configured [`AiProvider`] and returns the reply text. Provider failures
//! never reach the caller: they are logged and replaced with
//! [`EMPTY_SENTINEL`], which the normalizer reads as "no result".

pub mod gemini;
pub mod prompts;

use async_trait::async_trait;
use rand::Rng;
use serde_json::Value;
use std::sync::Arc;

use crate::config::AiConfig;

pub use gemini::GeminiProvider;

/// Reply substituted for any provider failure (an empty JSON array)
pub const EMPTY_SENTINEL: &str = "[]";

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
  #[error("no AI provider configured (GEMINI_API_KEY missing)")]
  NotConfigured,
  #[error("request to provider failed: {0}")]
  Transport(#[source] reqwest::Error),
  #[error("provider returned HTTP {status}: {body}")]
  Status { status: u16, body: String },
  #[error("could not decode provider reply: {0}")]
  Decode(#[source] reqwest::Error),
  #[error("provider reply contained no text")]
  EmptyReply,
}

/// A text completion backend that honours a JSON response schema
#[async_trait]
pub trait AiProvider: Send + Sync {
  fn name(&self) -> &'static str;

  /// Single completion attempt; no retries
  async fn complete(&self, prompt: &str, schema: &Value) -> Result<String, ProviderError>;
}

/// What the provider is asked to do
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
  /// Produce one question; `custom_prompt` replaces the built-in template
  Generate {
    topic: String,
    custom_prompt: Option<String>,
  },
  /// Grade an answer using a prompt that embeds question and answer
  Evaluate { prompt: String },
}

impl Mode {
  pub fn name(&self) -> &'static str {
    match self {
      Self::Generate { .. } => "generate",
      Self::Evaluate { .. } => "evaluate",
    }
  }

  /// Prompt text and response schema for this mode
  pub fn build_request<R: Rng>(&self, rng: &mut R) -> (String, Value) {
    match self {
      Self::Generate { topic, custom_prompt } => {
        let prompt = match custom_prompt {
          Some(custom) => custom.clone(),
          None => prompts::generation_prompt(topic, rng),
        };
        (prompt, prompts::question_list_schema())
      }
      Self::Evaluate { prompt } => (prompt.clone(), prompts::evaluation_schema()),
    }
  }
}

/// Process-wide handle to the provider, cheap to clone into handlers
#[derive(Clone)]
pub struct AiClient {
  provider: Option<Arc<dyn AiProvider>>,
}

impl AiClient {
  pub fn new(provider: Option<Arc<dyn AiProvider>>) -> Self {
    Self { provider }
  }

  /// Build the Gemini-backed client, or an unconfigured one without a key
  pub fn from_config(config: &AiConfig) -> Self {
    match &config.api_key {
      Some(key) => {
        tracing::info!("Using Gemini model {}", config.model);
        let provider = GeminiProvider::new(
          key.clone(),
          config.model.clone(),
          config.base_url.clone(),
          config.temperature,
        );
        Self::new(Some(Arc::new(provider)))
      }
      None => {
        tracing::error!("GEMINI_API_KEY is missing; AI endpoints will serve fallback results");
        Self::new(None)
      }
    }
  }

  /// Run one provider call, returning the raw reply or [`EMPTY_SENTINEL`]
  pub async fn invoke(&self, mode: &Mode) -> String {
    match self.try_invoke(mode).await {
      Ok(text) => text,
      Err(e) => {
        tracing::error!("AI {} call failed: {}", mode.name(), e);
        EMPTY_SENTINEL.to_string()
      }
    }
  }

  async fn try_invoke(&self, mode: &Mode) -> Result<String, ProviderError> {
    let provider = self.provider.as_ref().ok_or(ProviderError::NotConfigured)?;
    let (prompt, schema) = mode.build_request(&mut rand::rng());
    tracing::debug!("Sending {} prompt to {}", mode.name(), provider.name());
    provider.complete(&prompt, &schema).await
  }
}
