pub mod attempts;
pub mod evaluate;
pub mod feedback;
pub mod generate;
pub mod questions;

use axum::{
  routing::{get, post},
  Router,
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

pub use attempts::{check_history, list_attempts, save_attempt};
pub use evaluate::evaluate_answer;
pub use feedback::submit_feedback;
pub use generate::generate_question;
pub use questions::latest_question;

/// Acknowledgement for stored documents
#[derive(Debug, Serialize)]
pub struct SavedResponse {
  pub message: &'static str,
  pub id: String,
}

impl SavedResponse {
  pub fn new(message: &'static str, id: String) -> Self {
    Self { message, id }
  }
}

/// All API routes with permissive CORS and request tracing
pub fn router(state: AppState) -> Router {
  Router::new()
    .route("/api/generate", post(generate_question))
    .route("/api/evaluate", post(evaluate_answer))
    .route("/api/attempts", get(list_attempts).post(save_attempt))
    .route("/api/check", get(check_history))
    .route("/api/feedback", post(submit_feedback))
    .route("/api/questions/latest", get(latest_question))
    .layer(CorsLayer::permissive())
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
