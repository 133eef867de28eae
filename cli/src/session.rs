use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use sprout_core::{
    NotificationScheduler, PlantService, PlantStore, ServiceHandle, SqliteStore, SystemClock,
};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::{app_config::AppConfig, spool::SpoolPlatform, web_client::HttpPlantApi};

/// A running plant service wired to the profile's database, backend and
/// notification spool.
pub struct Session {
    pub plants: ServiceHandle,
    pub spool: Arc<SpoolPlatform>,
    join: JoinHandle<()>,
}

impl Session {
    /// Start the service and load the plant list once.
    pub async fn start(config: &AppConfig) -> anyhow::Result<Self> {
        let db_path = Path::new(&config.db_path);
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create data directory")?;
        }

        let storage = Arc::new(SqliteStore::open(db_path).context("Failed to open database")?);
        let clock = Arc::new(SystemClock);
        let spool = Arc::new(SpoolPlatform::open(
            db_path,
            config.notifications,
            clock.clone(),
        )?);
        let token = config.token();
        let authenticated = token.is_some();
        let api = Arc::new(HttpPlantApi::new(&config.api_url, token)?);

        let store = PlantStore::new(api, storage.clone(), clock.clone());
        let scheduler = NotificationScheduler::new(spool.clone(), storage, clock);
        let (plants, join) = PlantService::spawn(store, scheduler);

        let loaded = if authenticated {
            plants.authenticated().await?
        } else {
            plants.load_plants().await?
        };
        debug!(count = loaded.len(), authenticated, "session started");

        Ok(Self {
            plants,
            spool,
            join,
        })
    }

    /// Stop the service once the queued commands have been handled
    pub async fn close(self) -> anyhow::Result<()> {
        drop(self.plants);
        self.join.await.context("Plant service stopped unexpectedly")?;
        Ok(())
    }
}
