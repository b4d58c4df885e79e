use serde::{Deserialize, Serialize};

/// Topic used when a request does not name one
pub const DEFAULT_TOPIC: &str = "Software Engineering";

/// How hard a generated question is.
///
/// `Unknown` is never requested from the provider; it marks questions that
/// were salvaged from free text and carry no difficulty of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum Difficulty {
  Beginner,
  Intermediate,
  Advanced,
  Unknown,
}

impl Difficulty {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Beginner => "Beginner",
      Self::Intermediate => "Intermediate",
      Self::Advanced => "Advanced",
      Self::Unknown => "Unknown",
    }
  }

  /// Lenient parse: case-insensitive, anything unrecognised is `Unknown`
  pub fn parse(s: &str) -> Self {
    match s.trim().to_ascii_lowercase().as_str() {
      "beginner" => Self::Beginner,
      "intermediate" => Self::Intermediate,
      "advanced" => Self::Advanced,
      _ => Self::Unknown,
    }
  }
}

impl From<String> for Difficulty {
  fn from(s: String) -> Self {
    Self::parse(&s)
  }
}

/// A generated interview question.
///
/// `id` is only present once the question has been stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id: Option<String>,
  pub text: String,
  pub difficulty: Difficulty,
  pub topic: String,
  pub timestamp: i64,
}

impl Question {
  pub fn new(text: String, difficulty: Difficulty, topic: String, timestamp: i64) -> Self {
    Self {
      id: None,
      text,
      difficulty,
      topic,
      timestamp,
    }
  }

  /// Templated question used when the provider produced nothing usable
  pub fn fallback(topic: &str, timestamp: i64) -> Self {
    Self::new(
      format!("Explain the core concepts of {}.", topic),
      Difficulty::Intermediate,
      topic.to_string(),
      timestamp,
    )
  }
}

/// Trimmed topic from a request, or the default when absent or blank
pub fn resolve_topic(topic: Option<&str>) -> String {
  topic
    .map(str::trim)
    .filter(|t| !t.is_empty())
    .unwrap_or(DEFAULT_TOPIC)
    .to_string()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_difficulty_parse_is_lenient() {
    assert_eq!(Difficulty::parse("Beginner"), Difficulty::Beginner);
    assert_eq!(Difficulty::parse(" advanced "), Difficulty::Advanced);
    assert_eq!(Difficulty::parse("INTERMEDIATE"), Difficulty::Intermediate);
    assert_eq!(Difficulty::parse("Medium"), Difficulty::Unknown);
    assert_eq!(Difficulty::parse(""), Difficulty::Unknown);
  }

  #[test]
  fn test_difficulty_serializes_as_name() {
    let json = serde_json::to_string(&Difficulty::Unknown).unwrap();
    assert_eq!(json, "\"Unknown\"");
    let parsed: Difficulty = serde_json::from_str("\"hard\"").unwrap();
    assert_eq!(parsed, Difficulty::Unknown);
  }

  #[test]
  fn test_fallback_question() {
    let q = Question::fallback("Rust", 42);
    assert_eq!(q.text, "Explain the core concepts of Rust.");
    assert_eq!(q.difficulty, Difficulty::Intermediate);
    assert_eq!(q.topic, "Rust");
    assert_eq!(q.timestamp, 42);
    assert!(q.id.is_none());
  }

  #[test]
  fn test_unsaved_question_has_no_id_key() {
    let q = Question::fallback("Rust", 1);
    let value = serde_json::to_value(&q).unwrap();
    assert!(value.get("id").is_none());
    assert!(value.get("_id").is_none());
  }

  #[test]
  fn test_resolve_topic() {
    assert_eq!(resolve_topic(None), DEFAULT_TOPIC);
    assert_eq!(resolve_topic(Some("   ")), DEFAULT_TOPIC);
    assert_eq!(resolve_topic(Some(" Databases ")), "Databases");
  }
}
