//! JSON document collections stored in SQLite.

use rusqlite::types::Type;
use rusqlite::{params, Connection, Result};
use serde::Serialize;
use serde_json::{Map, Value};

/// Identifier key exposed to callers
pub const ID_FIELD: &str = "id";

/// Store-internal identifier key; never persisted in a body or returned
pub const INTERNAL_ID_FIELD: &str = "_id";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
  Questions,
  Attempts,
  Feedback,
}

impl Collection {
  pub const ALL: [Collection; 3] = [Self::Questions, Self::Attempts, Self::Feedback];

  pub fn table_name(&self) -> &'static str {
    match self {
      Self::Questions => "questions",
      Self::Attempts => "attempts",
      Self::Feedback => "feedback",
    }
  }
}

/// Serialize a record into a document body; only records that serialize to an object qualify
pub fn to_document<T: Serialize>(record: &T) -> serde_json::Result<Map<String, Value>> {
  match serde_json::to_value(record)? {
    Value::Object(map) => Ok(map),
    _ => Err(serde::ser::Error::custom("document body must be a JSON object")),
  }
}

/// Remove any caller-supplied identifiers
pub fn strip_identifiers(doc: &mut Map<String, Value>) {
  doc.remove(INTERNAL_ID_FIELD);
  doc.remove(ID_FIELD);
}

/// Insert a document and return its new id
pub fn insert_document(
  conn: &Connection,
  collection: Collection,
  mut doc: Map<String, Value>,
  timestamp: i64,
) -> Result<String> {
  strip_identifiers(&mut doc);
  let body = Value::Object(doc).to_string();
  conn.execute(
    &format!("INSERT INTO {} (timestamp, body) VALUES (?1, ?2)", collection.table_name()),
    params![timestamp, body],
  )?;
  let id = conn.last_insert_rowid().to_string();
  tracing::debug!("Inserted {} document {}", collection.table_name(), id);
  Ok(id)
}

/// Documents newest first (by timestamp, then insertion order), each with `id` set
pub fn find_documents(conn: &Connection, collection: Collection, limit: Option<i64>) -> Result<Vec<Value>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT id, body FROM {} ORDER BY timestamp DESC, id DESC LIMIT ?1",
    collection.table_name()
  ))?;

  // SQLite treats a negative LIMIT as unbounded
  let rows = stmt.query_map([limit.unwrap_or(-1)], |row| {
    let id: i64 = row.get(0)?;
    let body: String = row.get(1)?;
    Ok((id, body))
  })?;

  rows
    .map(|row| row.and_then(|(id, body)| document_with_id(id, &body)))
    .collect()
}

/// Most recent document of a collection, if any
pub fn find_latest(conn: &Connection, collection: Collection) -> Result<Option<Value>> {
  Ok(find_documents(conn, collection, Some(1))?.into_iter().next())
}

fn document_with_id(id: i64, body: &str) -> Result<Value> {
  let mut value: Value = serde_json::from_str(body)
    .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))?;
  if let Value::Object(map) = &mut value {
    map.remove(INTERNAL_ID_FIELD);
    map.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
  }
  Ok(value)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::db::run_migrations;
  use serde_json::json;

  fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    run_migrations(&conn).unwrap();
    conn
  }

  fn doc(value: Value) -> Map<String, Value> {
    match value {
      Value::Object(map) => map,
      _ => panic!("not an object"),
    }
  }

  #[test]
  fn test_insert_and_find_exposes_string_id() {
    let conn = setup();
    let id = insert_document(&conn, Collection::Questions, doc(json!({"text": "Q"})), 10).unwrap();

    let docs = find_documents(&conn, Collection::Questions, None).unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0]["id"], Value::String(id));
    assert_eq!(docs[0]["text"], "Q");
    assert!(docs[0].get("_id").is_none());
  }

  #[test]
  fn test_caller_identifiers_are_stripped() {
    let conn = setup();
    let id = insert_document(
      &conn,
      Collection::Attempts,
      doc(json!({"_id": {"$oid": "abc"}, "id": "spoofed", "userAnswer": "x"})),
      1,
    )
    .unwrap();

    let stored: String = conn
      .query_row("SELECT body FROM attempts WHERE id = ?1", [id.parse::<i64>().unwrap()], |row| row.get(0))
      .unwrap();
    assert!(!stored.contains("_id"));
    assert!(!stored.contains("spoofed"));

    let latest = find_latest(&conn, Collection::Attempts).unwrap().unwrap();
    assert_eq!(latest["id"], Value::String(id));
  }

  #[test]
  fn test_sorted_newest_first_with_limit() {
    let conn = setup();
    for (text, ts) in [("old", 100), ("newest", 300), ("middle", 200)] {
      insert_document(&conn, Collection::Attempts, doc(json!({"text": text})), ts).unwrap();
    }

    let docs = find_documents(&conn, Collection::Attempts, None).unwrap();
    let texts: Vec<&str> = docs.iter().map(|d| d["text"].as_str().unwrap()).collect();
    assert_eq!(texts, vec!["newest", "middle", "old"]);

    let limited = find_documents(&conn, Collection::Attempts, Some(2)).unwrap();
    assert_eq!(limited.len(), 2);
    assert_eq!(limited[0]["text"], "newest");
  }

  #[test]
  fn test_equal_timestamps_prefer_later_insert() {
    let conn = setup();
    insert_document(&conn, Collection::Questions, doc(json!({"text": "first"})), 5).unwrap();
    insert_document(&conn, Collection::Questions, doc(json!({"text": "second"})), 5).unwrap();

    let latest = find_latest(&conn, Collection::Questions).unwrap().unwrap();
    assert_eq!(latest["text"], "second");
  }

  #[test]
  fn test_collections_are_separate() {
    let conn = setup();
    insert_document(&conn, Collection::Feedback, doc(json!({"rating": 5})), 1).unwrap();

    assert!(find_latest(&conn, Collection::Questions).unwrap().is_none());
    assert!(find_documents(&conn, Collection::Attempts, None).unwrap().is_empty());
    assert_eq!(find_documents(&conn, Collection::Feedback, None).unwrap().len(), 1);
  }

  #[test]
  fn test_to_document() {
    #[derive(Serialize)]
    struct Record {
      name: &'static str,
    }
    let map = to_document(&Record { name: "x" }).unwrap();
    assert_eq!(map["name"], "x");
  }

  #[test]
  fn test_scalar_is_not_a_document() {
    assert!(to_document(&42).is_err());
    assert!(to_document(&vec!["a", "b"]).is_err());
  }
}
