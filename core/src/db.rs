use crate::schema;
use rusqlite::{params, Connection, Result};
use std::path::Path;

/// Open or create a sprout database at the specified path
pub fn open_db(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    schema::migrate(&conn)?;
    Ok(conn)
}

/// Open a throwaway in-memory database
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    schema::migrate(&conn)?;
    Ok(conn)
}

/// Get a stored value
pub fn get_value(conn: &Connection, key: &str) -> Result<Option<String>> {
    let mut stmt = conn.prepare("SELECT value FROM kv WHERE key = ?1")?;

    let value = stmt.query_row(params![key], |row| row.get(0));

    match value {
        Ok(v) => Ok(Some(v)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Insert or replace a stored value
pub fn set_value(conn: &Connection, key: &str, value: &str) -> Result<()> {
    let now = chrono::Utc::now().timestamp_millis();

    conn.execute(
        "INSERT OR REPLACE INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)",
        params![key, value, now],
    )?;
    Ok(())
}

/// Remove a stored value, missing keys are ignored
pub fn remove_value(conn: &Connection, key: &str) -> Result<()> {
    conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
    Ok(())
}

/// List keys starting with `prefix`, sorted
pub fn keys_with_prefix(conn: &Connection, prefix: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT key FROM kv WHERE substr(key, 1, ?1) = ?2 ORDER BY key")?;

    let rows = stmt.query_map(params![prefix.chars().count() as i64, prefix], |row| {
        row.get(0)
    })?;

    let mut keys = Vec::new();
    for key in rows {
        keys.push(key?);
    }

    Ok(keys)
}
