use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Row};
use sprout_core::{
    Clock, Error, NotificationPlatform, NotificationRequest, Permission, ScheduledNotification,
};
use tokio::sync::Mutex;

const SPOOL_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS notification_spool (
    handle TEXT PRIMARY KEY NOT NULL,
    title TEXT NOT NULL,
    body TEXT NOT NULL,
    category TEXT NOT NULL,
    trigger_at TEXT NOT NULL,
    plant_ids TEXT NOT NULL,
    delivered_at INTEGER
);

CREATE INDEX IF NOT EXISTS idx_spool_trigger_at ON notification_spool(trigger_at);
"#;

const TRIGGER_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const SELECT_COLUMNS: &str =
    "SELECT handle, title, body, category, trigger_at, plant_ids FROM notification_spool";

/// Local notification platform for the terminal.
///
/// Reminders are spooled in the profile database and handed out by
/// `deliver_due` once their trigger time has passed. A reminder whose time
/// has come counts as delivered: cancelling it is a no-op, so it waits in the
/// spool until `deliver_due` shows it.
pub struct SpoolPlatform {
    conn: Mutex<Connection>,
    enabled: bool,
    clock: Arc<dyn Clock>,
}

impl SpoolPlatform {
    /// Open the spool inside the database at `path`
    pub fn open(path: &Path, enabled: bool, clock: Arc<dyn Clock>) -> anyhow::Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open notification spool at {:?}", path))?;
        Self::with_connection(conn, enabled, clock)
    }

    pub fn with_connection(
        conn: Connection,
        enabled: bool,
        clock: Arc<dyn Clock>,
    ) -> anyhow::Result<Self> {
        conn.execute_batch(SPOOL_SCHEMA)
            .context("Failed to create notification spool")?;
        Ok(Self {
            conn: Mutex::new(conn),
            enabled,
            clock,
        })
    }

    fn now(&self) -> String {
        self.clock.now().format(TRIGGER_FORMAT).to_string()
    }

    /// Mark pending reminders due at `now` as delivered and return them
    pub async fn deliver_due(&self, now: NaiveDateTime) -> anyhow::Result<Vec<ScheduledNotification>> {
        let conn = self.conn.lock().await;
        let now_str = now.format(TRIGGER_FORMAT).to_string();

        let mut stmt = conn.prepare(&format!(
            "{} WHERE delivered_at IS NULL AND trigger_at <= ?1 ORDER BY trigger_at",
            SELECT_COLUMNS
        ))?;
        let rows = stmt.query_map(params![now_str], read_row)?;

        let mut due = Vec::new();
        for row in rows {
            due.push(row?);
        }

        let delivered_at = chrono::Utc::now().timestamp_millis();
        for notification in &due {
            conn.execute(
                "UPDATE notification_spool SET delivered_at = ?1 WHERE handle = ?2",
                params![delivered_at, notification.handle],
            )?;
        }

        Ok(due)
    }

    /// Look up a reminder by handle, delivered or not
    pub async fn find(&self, handle: &str) -> anyhow::Result<Option<ScheduledNotification>> {
        let conn = self.conn.lock().await;
        let found = conn
            .query_row(
                &format!("{} WHERE handle = ?1", SELECT_COLUMNS),
                params![handle],
                read_row,
            )
            .optional()?;
        Ok(found)
    }
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<ScheduledNotification> {
    let trigger: String = row.get(4)?;
    let trigger = NaiveDateTime::parse_from_str(&trigger, TRIGGER_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
    })?;

    let ids_json: String = row.get(5)?;
    let plant_ids: Vec<i64> = serde_json::from_str(&ids_json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(ScheduledNotification {
        handle: row.get(0)?,
        request: NotificationRequest {
            title: row.get(1)?,
            body: row.get(2)?,
            category: row.get(3)?,
            trigger,
            plant_ids,
        },
    })
}

fn db_error(e: rusqlite::Error) -> Error {
    Error::Notification(e.to_string())
}

#[async_trait]
impl NotificationPlatform for SpoolPlatform {
    async fn permission(&self) -> Result<Permission, Error> {
        Ok(if self.enabled {
            Permission::Granted
        } else {
            Permission::Denied
        })
    }

    async fn request_permission(&self) -> Result<Permission, Error> {
        self.permission().await
    }

    async fn schedule(&self, request: NotificationRequest) -> Result<String, Error> {
        let handle = ulid::Ulid::new().to_string();
        let ids_json = serde_json::to_string(&request.plant_ids)?;
        let conn = self.conn.lock().await;

        conn.execute(
            "INSERT INTO notification_spool (handle, title, body, category, trigger_at, plant_ids) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                handle,
                request.title,
                request.body,
                request.category,
                request.trigger.format(TRIGGER_FORMAT).to_string(),
                ids_json
            ],
        )
        .map_err(db_error)?;

        Ok(handle)
    }

    async fn cancel(&self, handle: &str) -> Result<(), Error> {
        let conn = self.conn.lock().await;
        conn.execute(
            "DELETE FROM notification_spool WHERE handle = ?1 AND delivered_at IS NULL AND trigger_at > ?2",
            params![handle, self.now()],
        )
        .map_err(db_error)?;
        Ok(())
    }

    async fn cancel_all(&self) -> Result<(), Error> {
        let conn = self.conn.lock().await;
        conn.execute(
            "DELETE FROM notification_spool WHERE delivered_at IS NULL AND trigger_at > ?1",
            params![self.now()],
        )
        .map_err(db_error)?;
        Ok(())
    }

    async fn dismiss(&self, handle: &str) -> Result<(), Error> {
        let conn = self.conn.lock().await;
        conn.execute(
            "DELETE FROM notification_spool WHERE handle = ?1",
            params![handle],
        )
        .map_err(db_error)?;
        Ok(())
    }

    async fn list_scheduled(&self) -> Result<Vec<ScheduledNotification>, Error> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare(&format!(
                "{} WHERE delivered_at IS NULL ORDER BY trigger_at",
                SELECT_COLUMNS
            ))
            .map_err(db_error)?;

        let rows = stmt.query_map([], read_row).map_err(db_error)?;

        let mut pending = Vec::new();
        for row in rows {
            pending.push(row.map_err(db_error)?);
        }
        Ok(pending)
    }
}
