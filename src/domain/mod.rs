mod attempt;
mod evaluation;
mod question;

pub use attempt::Attempt;
pub use evaluation::Evaluation;
pub use question::{resolve_topic, Difficulty, Question, DEFAULT_TOPIC};

/// Current wall-clock time as milliseconds since the Unix epoch
pub fn now_millis() -> i64 {
  chrono::Utc::now().timestamp_millis()
}
