use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::HISTORY_LIMIT;
use crate::db::{self, try_lock, Collection};
use crate::domain::{now_millis, Attempt};
use crate::error::ApiError;
use crate::state::AppState;

use super::SavedResponse;

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
  pub history: Vec<Value>,
}

/// All attempts, newest first.
///
/// GET /api/attempts
pub async fn list_attempts(State(state): State<AppState>) -> Result<Json<Vec<Value>>, ApiError> {
  let conn = try_lock(&state.db)?;
  let attempts = db::find_documents(&conn, Collection::Attempts, None)?;
  Ok(Json(attempts))
}

/// Latest attempts wrapped in `{"history": [...]}`.
///
/// GET /api/check
pub async fn check_history(State(state): State<AppState>) -> Result<Json<HistoryResponse>, ApiError> {
  let conn = try_lock(&state.db)?;
  let history = db::find_documents(&conn, Collection::Attempts, Some(HISTORY_LIMIT))?;
  Ok(Json(HistoryResponse { history }))
}

/// Store a caller-built attempt as-is, minus any identifier it carries.
///
/// The body must read as an [`Attempt`]; extra fields are kept.
///
/// POST /api/attempts
pub async fn save_attempt(
  State(state): State<AppState>,
  payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SavedResponse>, ApiError> {
  let Json(body) = payload?;
  let not_object = || ApiError::BadRequest("Attempt must be a JSON object".to_string());
  if !body.is_object() {
    return Err(not_object());
  }
  Attempt::deserialize(&body)
    .map_err(|e| ApiError::BadRequest(format!("Body is not a valid attempt: {}", e)))?;
  let Value::Object(mut doc) = body else {
    return Err(not_object());
  };

  let timestamp = match doc.get("timestamp").and_then(Value::as_i64) {
    Some(timestamp) => timestamp,
    None => {
      let now = now_millis();
      doc.insert("timestamp".to_string(), Value::from(now));
      now
    }
  };

  let conn = try_lock(&state.db)?;
  let id = db::insert_document(&conn, Collection::Attempts, doc, timestamp)?;
  tracing::info!("Saved attempt {}", id);

  Ok(Json(SavedResponse::new("Attempt saved", id)))
}
