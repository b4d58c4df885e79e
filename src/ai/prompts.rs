//! Prompt text and response schemas sent to the provider.

use rand::seq::IndexedRandom;
use rand::Rng;
use serde_json::{json, Value};

/// Question angles rotated through to keep consecutive questions varied
pub const QUESTION_STYLES: [&str; 4] = ["conceptual", "debugging", "system design", "best practices"];

/// Upper bound (inclusive) of the seed embedded in generation prompts
pub const MAX_PROMPT_SEED: u32 = 100_000;

/// Prompt asking for one interview question about `topic`.
///
/// A random style and seed are embedded so identical topics do not keep
/// producing identical questions.
pub fn generation_prompt<R: Rng>(topic: &str, rng: &mut R) -> String {
  let style = QUESTION_STYLES.choose(rng).copied().unwrap_or(QUESTION_STYLES[0]);
  let seed = rng.random_range(1..=MAX_PROMPT_SEED);
  format!(
    "Generate 1 unique technical interview question about {}. Focus on a {} aspect. Random Seed: {}",
    topic, style, seed
  )
}

pub fn evaluation_prompt(question_text: &str, user_answer: &str) -> String {
  format!(
    r#"You are a senior technical interviewer.
Question: "{question_text}"
Candidate Answer: "{user_answer}"

Evaluate this answer rigorously. Return ONLY a JSON object with these keys:
- "score": number (0-100).
- "spellingErrors": array of strings (list any typos, or empty array).
- "technicalAccuracy": string (brief comment on technical correctness).
- "improvedAnswer": string (a concise, ideal answer).
- "keyConceptsMissed": array of strings (list concepts the candidate missed).
- "isCorrect": boolean."#
  )
}

/// Schema for a list of questions (without id/timestamp)
pub fn question_list_schema() -> Value {
  json!({
    "type": "ARRAY",
    "items": {
      "type": "OBJECT",
      "properties": {
        "text": { "type": "STRING" },
        "difficulty": {
          "type": "STRING",
          "format": "enum",
          "enum": ["Beginner", "Intermediate", "Advanced"]
        },
        "topic": { "type": "STRING" }
      },
      "required": ["text", "difficulty", "topic"]
    }
  })
}

pub fn evaluation_schema() -> Value {
  json!({
    "type": "OBJECT",
    "properties": {
      "score": { "type": "INTEGER" },
      "spellingErrors": { "type": "ARRAY", "items": { "type": "STRING" } },
      "technicalAccuracy": { "type": "STRING" },
      "improvedAnswer": { "type": "STRING" },
      "keyConceptsMissed": { "type": "ARRAY", "items": { "type": "STRING" } },
      "isCorrect": { "type": "BOOLEAN" }
    },
    "required": ["score", "technicalAccuracy", "improvedAnswer", "isCorrect"]
  })
}
