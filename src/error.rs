//! Errors surfaced to HTTP callers.

use axum::{
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};

use crate::db::DbLockError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
  /// Missing or malformed request data
  #[error("{0}")]
  BadRequest(String),
  /// Document store unavailable or failing
  #[error("{0}")]
  Storage(String),
  #[error("{0}")]
  Internal(String),
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match self {
      Self::BadRequest(_) => StatusCode::BAD_REQUEST,
      Self::Storage(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl From<rusqlite::Error> for ApiError {
  fn from(e: rusqlite::Error) -> Self {
    Self::Storage(e.to_string())
  }
}

impl From<DbLockError> for ApiError {
  fn from(e: DbLockError) -> Self {
    Self::Storage(e.to_string())
  }
}

impl From<serde_json::Error> for ApiError {
  fn from(e: serde_json::Error) -> Self {
    Self::Internal(e.to_string())
  }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    Self::BadRequest(rejection.body_text())
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!("Request failed: {}", self);
    } else {
      tracing::warn!("Rejected request: {}", self);
    }
    (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
  }
}
