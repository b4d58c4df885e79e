use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde_json::Value;

use crate::db::{self, try_lock, Collection};
use crate::domain::now_millis;
use crate::error::ApiError;
use crate::state::AppState;

use super::SavedResponse;

/// Store user feedback verbatim.
///
/// POST /api/feedback
pub async fn submit_feedback(
  State(state): State<AppState>,
  payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SavedResponse>, ApiError> {
  let Json(body) = payload?;
  let Value::Object(doc) = body else {
    return Err(ApiError::BadRequest("Feedback must be a JSON object".to_string()));
  };
  if doc.is_empty() {
    return Err(ApiError::BadRequest("Feedback is empty".to_string()));
  }

  let conn = try_lock(&state.db)?;
  let id = db::insert_document(&conn, Collection::Feedback, doc, now_millis())?;
  tracing::info!("Saved feedback {}", id);

  Ok(Json(SavedResponse::new("Feedback saved", id)))
}
