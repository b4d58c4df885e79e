use serde::{Deserialize, Serialize};

use super::{Evaluation, Question};

/// A question paired with the candidate's answer and its grading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attempt {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id: Option<String>,
  pub question: Question,
  pub user_answer: String,
  pub evaluation: Evaluation,
  /// Stamped by the server when the caller leaves it out
  #[serde(default)]
  pub timestamp: i64,
}

impl Attempt {
  pub fn new(
    question: Question,
    user_answer: String,
    evaluation: Evaluation,
    timestamp: i64,
  ) -> Self {
    Self {
      id: None,
      question,
      user_answer,
      evaluation,
      timestamp,
    }
  }
}
