use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Highest score a graded answer can receive
pub const MAX_SCORE: u8 = 100;

/// Grading result for a single answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
  #[serde(deserialize_with = "deserialize_score")]
  pub score: u8,
  #[serde(default, deserialize_with = "deserialize_flag")]
  pub is_correct: bool,
  #[serde(default, deserialize_with = "deserialize_string_list")]
  pub spelling_errors: Vec<String>,
  #[serde(default, deserialize_with = "deserialize_string_list")]
  pub key_concepts_missed: Vec<String>,
  #[serde(default, deserialize_with = "deserialize_text")]
  pub technical_accuracy: String,
  #[serde(default, deserialize_with = "deserialize_text")]
  pub improved_answer: String,
}

impl Evaluation {
  /// Zero-score result returned when the grader reply could not be read
  pub fn parse_error() -> Self {
    Self {
      score: 0,
      is_correct: false,
      spelling_errors: Vec::new(),
      key_concepts_missed: Vec::new(),
      technical_accuracy: "parse error".to_string(),
      improved_answer: String::new(),
    }
  }
}

/// Accepts integers, floats and numeric strings, clamped into 0..=100
fn deserialize_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
  D: Deserializer<'de>,
{
  let value = Value::deserialize(deserializer)?;
  let raw = match &value {
    Value::Number(n) => n.as_f64(),
    Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
    _ => None,
  };
  let raw = raw.ok_or_else(|| serde::de::Error::custom(format!("invalid score: {}", value)))?;
  Ok(raw.round().clamp(0.0, MAX_SCORE as f64) as u8)
}

// Optional fields never reject a grading: null or a wrong type becomes the default

fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(match Value::deserialize(deserializer)? {
    Value::Bool(flag) => flag,
    Value::String(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "yes"),
    Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
    _ => false,
  })
}

fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(match Value::deserialize(deserializer)? {
    Value::String(s) => s,
    Value::Number(n) => n.to_string(),
    _ => String::new(),
  })
}

/// A list of strings; a lone string becomes a one-item list
fn deserialize_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(match Value::deserialize(deserializer)? {
    Value::Array(items) => items
      .into_iter()
      .filter_map(|item| match item {
        Value::String(s) => Some(s),
        _ => None,
      })
      .collect(),
    Value::String(s) if !s.trim().is_empty() => vec![s],
    _ => Vec::new(),
  })
}
