/// SQL schema for the local key-value store
pub const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS kv (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL
);

PRAGMA user_version = 1;
"#;

/// Migration from V1 to V2: track write time per key
pub const MIGRATION_V1_TO_V2: &str = r#"
ALTER TABLE kv ADD COLUMN updated_at INTEGER NOT NULL DEFAULT 0;

CREATE INDEX IF NOT EXISTS idx_kv_updated_at ON kv(updated_at);

PRAGMA user_version = 2;
"#;

pub const CURRENT_VERSION: i32 = 2;

/// Get current schema version from database
pub fn get_schema_version(conn: &rusqlite::Connection) -> Result<i32, rusqlite::Error> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
}

/// Run migrations to bring database to current schema version
pub fn migrate(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    let mut version = get_schema_version(conn)?;

    if version == 0 {
        conn.execute_batch(SCHEMA_V1)?;
        version = 1;
    }

    if version == 1 {
        conn.execute_batch(MIGRATION_V1_TO_V2)?;
        version = 2;
    }

    if version == CURRENT_VERSION {
        Ok(())
    } else {
        Err(rusqlite::Error::InvalidQuery)
    }
}
