use rusqlite::{Connection, Result};

use super::Collection;

/// Create one document table per collection.
///
/// Each row holds a JSON object in `body`; `id` is the store's own
/// identifier and is never written into the body.
pub fn run_migrations(conn: &Connection) -> Result<()> {
  for collection in Collection::ALL {
    let table = collection.table_name();
    conn.execute_batch(&format!(
      r#"
    CREATE TABLE IF NOT EXISTS {table} (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      timestamp INTEGER NOT NULL,
      body TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_{table}_timestamp ON {table}(timestamp);
    "#
    ))?;
  }
  Ok(())
}
