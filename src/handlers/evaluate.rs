use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Deserialize;
use serde_json::Value;

use crate::ai::{prompts, Mode};
use crate::domain::{resolve_topic, Evaluation};
use crate::error::ApiError;
use crate::normalizer::normalize;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct EvaluateRequest {
  #[serde(default)]
  pub question: Option<Value>,
  #[serde(default, alias = "userAnswer")]
  pub user_answer: Option<String>,
}

/// Fields needed to grade an answer
#[derive(Debug, PartialEq)]
struct GradingInput {
  question_text: String,
  topic: String,
  user_answer: String,
}

impl EvaluateRequest {
  fn into_input(self) -> Result<GradingInput, ApiError> {
    let missing = || ApiError::BadRequest("Missing data".to_string());

    let question = self.question.ok_or_else(missing)?;
    let question_text = question
      .get("text")
      .and_then(Value::as_str)
      .map(str::trim)
      .filter(|t| !t.is_empty())
      .ok_or_else(missing)?
      .to_string();
    let topic = resolve_topic(question.get("topic").and_then(Value::as_str));

    let user_answer = self
      .user_answer
      .filter(|a| !a.trim().is_empty())
      .ok_or_else(missing)?;

    Ok(GradingInput {
      question_text,
      topic,
      user_answer,
    })
  }
}

/// Grade an answer. The result is not stored; clients save the full
/// attempt through `POST /api/attempts`.
///
/// POST /api/evaluate
pub async fn evaluate_answer(
  State(state): State<AppState>,
  payload: Result<Json<EvaluateRequest>, JsonRejection>,
) -> Result<Json<Evaluation>, ApiError> {
  let Json(request) = payload?;
  let input = request.into_input()?;

  let prompt = prompts::evaluation_prompt(&input.question_text, &input.user_answer);
  let raw = state.ai.invoke(&Mode::Evaluate { prompt }).await;

  let evaluation = match normalize(Value::from(raw), &input.topic).into_evaluation() {
    Some(evaluation) => evaluation,
    None => {
      tracing::warn!("Could not read grading for '{}', returning zero score", input.question_text);
      Evaluation::parse_error()
    }
  };

  tracing::info!("Graded answer: score {}", evaluation.score);
  Ok(Json(evaluation))
}
