use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Deserialize;
use serde_json::Value;

use crate::ai::Mode;
use crate::db::{self, try_lock, Collection};
use crate::domain::{now_millis, resolve_topic, Question};
use crate::error::ApiError;
use crate::normalizer::normalize;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct GenerateRequest {
  #[serde(default)]
  pub topic: Option<String>,
  /// Replaces the built-in question prompt entirely
  #[serde(default, alias = "customPrompt")]
  pub custom_prompt: Option<String>,
}

/// Generate, store and return one question.
///
/// POST /api/generate
pub async fn generate_question(
  State(state): State<AppState>,
  payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<Question>, ApiError> {
  let Json(request) = payload?;
  let topic = resolve_topic(request.topic.as_deref());
  let custom_prompt = request.custom_prompt.filter(|p| !p.trim().is_empty());

  let mode = Mode::Generate {
    topic: topic.clone(),
    custom_prompt,
  };
  let raw = state.ai.invoke(&mode).await;

  let timestamp = now_millis();
  let mut question = match normalize(Value::from(raw), &topic).into_question(&topic, timestamp) {
    Some(question) => question,
    None => {
      tracing::warn!("No usable question for topic '{}', using template", topic);
      Question::fallback(&topic, timestamp)
    }
  };

  let doc = db::to_document(&question)?;
  let id = {
    let conn = try_lock(&state.db)?;
    db::insert_document(&conn, Collection::Questions, doc, timestamp)?
  };
  tracing::info!("Stored question {} ({})", id, question.difficulty.as_str());

  question.id = Some(id);
  Ok(Json(question))
}
