use axum::{extract::State, Json};

use crate::db::{self, try_lock, Collection};
use crate::domain::Question;
use crate::error::ApiError;
use crate::state::AppState;

/// Most recently generated question, or `null` when there is none.
///
/// GET /api/questions/latest
pub async fn latest_question(State(state): State<AppState>) -> Result<Json<Option<Question>>, ApiError> {
  let conn = try_lock(&state.db)?;
  let question = db::find_latest(&conn, Collection::Questions)?
    .map(serde_json::from_value::<Question>)
    .transpose()?;
  Ok(Json(question))
}
