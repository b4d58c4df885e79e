//! Google Gemini `generateContent` over plain REST.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{AiProvider, ProviderError};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
  contents: Vec<Content<'a>>,
  generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
  parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
  text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
  response_mime_type: &'static str,
  response_schema: &'a Value,
  temperature: f32,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
  #[serde(default)]
  candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
  content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
  #[serde(default)]
  parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
  text: Option<String>,
}

impl GenerateContentResponse {
  /// Concatenated text parts of the first candidate
  fn text(self) -> Option<String> {
    let content = self.candidates.into_iter().next()?.content?;
    let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
    (!text.trim().is_empty()).then_some(text)
  }
}

pub struct GeminiProvider {
  client: reqwest::Client,
  api_key: String,
  model: String,
  base_url: String,
  temperature: f32,
}

impl GeminiProvider {
  pub fn new(api_key: String, model: String, base_url: String, temperature: f32) -> Self {
    Self {
      client: reqwest::Client::new(),
      api_key,
      model,
      base_url,
      temperature,
    }
  }

  fn endpoint(&self) -> String {
    format!(
      "{}/v1beta/models/{}:generateContent",
      self.base_url.trim_end_matches('/'),
      self.model
    )
  }
}

#[async_trait]
impl AiProvider for GeminiProvider {
  fn name(&self) -> &'static str {
    "gemini"
  }

  async fn complete(&self, prompt: &str, schema: &Value) -> Result<String, ProviderError> {
    let body = GenerateContentRequest {
      contents: vec![Content {
        parts: vec![RequestPart { text: prompt }],
      }],
      generation_config: GenerationConfig {
        response_mime_type: "application/json",
        response_schema: schema,
        temperature: self.temperature,
      },
    };

    let response = self
      .client
      .post(self.endpoint())
      .header("x-goog-api-key", &self.api_key)
      .json(&body)
      .send()
      .await
      .map_err(ProviderError::Transport)?;

    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      return Err(ProviderError::Status {
        status: status.as_u16(),
        body,
      });
    }

    let reply: GenerateContentResponse = response.json().await.map_err(ProviderError::Decode)?;
    reply.text().ok_or(ProviderError::EmptyReply)
  }
}
