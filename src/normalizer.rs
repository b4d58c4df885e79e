//! Coerces provider replies into a single structured record.
//!
//! The provider is asked for JSON matching a schema, but nothing guarantees it
//! complies. Replies are run through a cascade, first match wins:
//!
//! 1. Already-structured values (objects, arrays) skip text parsing.
//! 2. Text is trimmed, stripped of markdown code fences and decoded as JSON.
//! 3. Undecodable text is searched for a `"text": "..."` field.
//! 4. Anything else is echoed back verbatim as the question text.
//!
//! Arrays resolve to their first element. Each level is a distinct
//! [`Normalized`] variant so callers can tell how degraded the result is.

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

use crate::domain::{Difficulty, Evaluation, Question};

/// Difficulty assigned to records rebuilt from a lone `"text"` field
pub const PARTIAL_DIFFICULTY: Difficulty = Difficulty::Intermediate;

/// Difficulty assigned to records that echo raw provider text
pub const RAW_TEXT_DIFFICULTY: Difficulty = Difficulty::Unknown;

static TEXT_FIELD: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r#""text"\s*:\s*"((?:[^"\\]|\\.)*)""#).expect("text field pattern is valid")
});

/// Outcome of normalizing one provider reply
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
  /// A JSON object, either given directly or decoded from text
  Full(Map<String, Value>),
  /// Only a `"text"` field could be salvaged from malformed JSON
  Partial { text: String, topic: String },
  /// No JSON at all; the cleaned reply itself
  RawText { text: String, topic: String },
  /// Nothing usable (null, blank text, empty array)
  NoResult,
}

/// Normalize an arbitrary reply value.
///
/// Never fails: the worst case is [`Normalized::NoResult`], and callers
/// substitute their own fallback record for it.
pub fn normalize(response: Value, default_topic: &str) -> Normalized {
  match response {
    Value::String(text) => normalize_text(&text, default_topic),
    Value::Object(_) | Value::Array(_) => select_record(response),
    _ => Normalized::NoResult,
  }
}

/// Text branch of [`normalize`]
pub fn normalize_text(raw: &str, default_topic: &str) -> Normalized {
  let cleaned = strip_code_fence(raw);
  if cleaned.is_empty() {
    return Normalized::NoResult;
  }

  if let Some(structured) = decode_structured(cleaned) {
    return select_record(structured);
  }

  match extract_text_field(cleaned) {
    Some(text) => Normalized::Partial {
      text,
      topic: default_topic.to_string(),
    },
    None => Normalized::RawText {
      text: cleaned.to_string(),
      topic: default_topic.to_string(),
    },
  }
}

/// Language tags recognised after an opening fence
const FENCE_TAGS: [&str; 8] = [
  "json",
  "jsonc",
  "json5",
  "javascript",
  "js",
  "text",
  "txt",
  "plaintext",
];

/// Trim the reply and remove a surrounding markdown code fence.
///
/// Accepts a bare opening fence or one carrying a known language tag
/// (`` ```json ``), and an optional closing fence. Any other first line is
/// kept as part of the reply.
pub fn strip_code_fence(raw: &str) -> &str {
  let mut text = raw.trim();

  if let Some(rest) = text.strip_prefix("```") {
    text = match rest.split_once('\n') {
      Some((tag, body)) if is_fence_tag(tag) => body,
      _ if rest.get(..4).is_some_and(|tag| tag.eq_ignore_ascii_case("json")) => &rest[4..],
      _ => rest,
    };
  }

  let text = text.trim();
  text.strip_suffix("```").unwrap_or(text).trim()
}

fn is_fence_tag(line: &str) -> bool {
  let tag = line.trim();
  tag.is_empty() || FENCE_TAGS.iter().any(|known| known.eq_ignore_ascii_case(tag))
}

/// Strict JSON decode, keeping only objects and arrays.
///
/// A JSON string holding encoded JSON is decoded one level further.
fn decode_structured(text: &str) -> Option<Value> {
  match serde_json::from_str::<Value>(text) {
    Ok(value @ (Value::Object(_) | Value::Array(_))) => Some(value),
    Ok(Value::String(inner)) => match serde_json::from_str::<Value>(strip_code_fence(&inner)) {
      Ok(value @ (Value::Object(_) | Value::Array(_))) => Some(value),
      _ => None,
    },
    Ok(_) => None,
    Err(e) => {
      tracing::debug!("Reply is not valid JSON: {}", e);
      None
    }
  }
}

/// Pull the value of a `"text": "..."` field out of otherwise broken JSON
pub fn extract_text_field(text: &str) -> Option<String> {
  let raw = TEXT_FIELD.captures(text)?.get(1)?.as_str();
  // Decode JSON escapes; keep the raw capture if they are malformed
  let value = serde_json::from_str::<String>(&format!("\"{}\"", raw))
    .unwrap_or_else(|_| raw.to_string());
  let value = value.trim();
  (!value.is_empty()).then(|| value.to_string())
}

fn select_record(value: Value) -> Normalized {
  match value {
    Value::Object(map) => Normalized::Full(map),
    Value::Array(items) => match items.into_iter().next() {
      Some(Value::Object(map)) => Normalized::Full(map),
      _ => Normalized::NoResult,
    },
    _ => Normalized::NoResult,
  }
}

fn string_field<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
  map
    .get(key)
    .and_then(Value::as_str)
    .map(str::trim)
    .filter(|s| !s.is_empty())
}

impl Normalized {
  /// Build a question from this result.
  ///
  /// Returns `None` for [`Normalized::NoResult`] and for objects without any
  /// question text.
  pub fn into_question(self, default_topic: &str, timestamp: i64) -> Option<Question> {
    match self {
      Self::Full(map) => {
        let text = string_field(&map, "text").or_else(|| string_field(&map, "question"))?;
        let difficulty = string_field(&map, "difficulty")
          .map(Difficulty::parse)
          .unwrap_or(Difficulty::Unknown);
        let topic = string_field(&map, "topic").unwrap_or(default_topic);
        Some(Question::new(text.to_string(), difficulty, topic.to_string(), timestamp))
      }
      Self::Partial { text, topic } => Some(Question::new(text, PARTIAL_DIFFICULTY, topic, timestamp)),
      Self::RawText { text, topic } => Some(Question::new(text, RAW_TEXT_DIFFICULTY, topic, timestamp)),
      Self::NoResult => None,
    }
  }

  /// Build an evaluation from this result.
  ///
  /// Only full objects carrying a score qualify; salvaged text is not a grading.
  pub fn into_evaluation(self) -> Option<Evaluation> {
    match self {
      Self::Full(map) => match serde_json::from_value(Value::Object(map)) {
        Ok(evaluation) => Some(evaluation),
        Err(e) => {
          tracing::warn!("Grader reply has the wrong shape: {}", e);
          None
        }
      },
      _ => None,
    }
  }
}
