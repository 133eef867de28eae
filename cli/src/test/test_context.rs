#![allow(clippy::unwrap_used)]
#![allow(deprecated)]

use assert_cmd::Command;
use rusqlite::params;
use std::path::PathBuf;
use tempfile::TempDir;

/// Backend address nothing listens on, so every remote call fails fast
pub const OFFLINE_API_URL: &str = "http://127.0.0.1:9";

/// Isolated profile with its own XDG directories and database
pub struct TestContext {
    temp_dir: TempDir,
    pub profile_name: String,
    pub profile_path: PathBuf,
    pub db_path: PathBuf,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_notifications(true)
    }

    pub fn with_notifications(notifications: bool) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let profile_name = format!("test_{}", uuid::Uuid::new_v4().simple());

        let profile_config_dir = temp_dir.path().join("config").join("sprout").join("profiles");
        let profile_data_dir = temp_dir
            .path()
            .join("data")
            .join("sprout")
            .join("profiles")
            .join(&profile_name);
        std::fs::create_dir_all(&profile_config_dir).unwrap();
        std::fs::create_dir_all(&profile_data_dir).unwrap();

        let db_path = profile_data_dir.join("sprout.db");

        let profile = crate::profile::Profile {
            db_path: Some(db_path.to_str().unwrap().to_string()),
            api_url: Some(OFFLINE_API_URL.to_string()),
            token_path: None,
            notifications,
        };
        let profile_path = profile_config_dir.join(format!("{}.toml", profile_name));
        profile.save(&profile_path).unwrap();

        Self {
            temp_dir,
            profile_name,
            profile_path,
            db_path,
        }
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("sprout").unwrap();
        cmd.env("XDG_CONFIG_HOME", self.temp_dir.path().join("config"));
        cmd.env("XDG_DATA_HOME", self.temp_dir.path().join("data"));
        cmd.env("SPROUT_PROFILE", &self.profile_name);
        cmd.env_remove("SPROUT_API_URL");
        cmd.env_remove("SPROUT_TOKEN");
        cmd.env_remove("RUST_LOG");
        cmd
    }

    pub fn set_notifications(&self, enabled: bool) {
        let mut profile = crate::profile::Profile::from_path(&self.profile_path)
            .unwrap()
            .unwrap();
        profile.notifications = enabled;
        profile.save(&self.profile_path).unwrap();
    }

    /// Put plants into the local cache as if a previous sync stored them
    pub fn seed_plants(&self, plants: serde_json::Value) {
        let conn = sprout_core::open_db(&self.db_path).unwrap();
        sprout_core::db::set_value(&conn, "plants", &plants.to_string()).unwrap();
    }

    pub fn cached_plants(&self) -> Vec<sprout_core::Plant> {
        let conn = sprout_core::open_db(&self.db_path).unwrap();
        let json = sprout_core::db::get_value(&conn, "plants").unwrap().unwrap();
        serde_json::from_str(&json).unwrap()
    }

    pub fn reminder_keys(&self) -> Vec<String> {
        let conn = sprout_core::open_db(&self.db_path).unwrap();
        sprout_core::db::keys_with_prefix(&conn, "notification:").unwrap()
    }

    /// Put an already delivered reminder into the spool
    pub fn deliver_reminder(&self, handle: &str, plant_ids: &[i64]) {
        let conn = rusqlite::Connection::open(&self.db_path).unwrap();
        conn.execute(
            "INSERT INTO notification_spool (handle, title, body, category, trigger_at, plant_ids, delivered_at) VALUES (?1, 'Time to water your plants!', 'The following need water: Fern', 'WATER_PLANT_CATEGORY', '2024-05-20T18:00:00', ?2, 1)",
            params![handle, serde_json::to_string(plant_ids).unwrap()],
        )
        .unwrap();
    }

    /// Move every pending reminder's trigger into the past
    pub fn backdate_reminders(&self) {
        let conn = rusqlite::Connection::open(&self.db_path).unwrap();
        conn.execute(
            "UPDATE notification_spool SET trigger_at = '2000-01-01T18:00:00' WHERE delivered_at IS NULL",
            [],
        )
        .unwrap();
    }

    pub fn spool_contains(&self, handle: &str) -> bool {
        let conn = rusqlite::Connection::open(&self.db_path).unwrap();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM notification_spool WHERE handle = ?1",
                params![handle],
                |row| row.get(0),
            )
            .unwrap();
        count > 0
    }
}
