#![deny(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

pub mod api;
pub mod clock;
pub mod db;
pub mod error;
pub mod models;
pub mod notifications;
pub mod schedule;
pub mod schema;
pub mod service;
pub mod storage;
pub mod store;
pub mod sync;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use api::PlantApi;
pub use clock::{Clock, FixedClock, SystemClock};
pub use db::open_db;
pub use error::{Error, Result};
pub use models::{
    CareProfile, NewCareProfile, NewPlant, NotificationTime, Plant, ScheduledRecord,
    DEFAULT_WATERING_FREQUENCY,
};
pub use notifications::{
    NotificationAction, NotificationPlatform, NotificationRequest, NotificationResponse,
    Permission, ScheduledNotification,
};
pub use schedule::{group_by_date, trigger_for, NotificationScheduler};
pub use service::{PlantService, ServiceHandle};
pub use storage::{KeyValueStore, MemoryStore, SqliteStore};
pub use store::PlantStore;
pub use sync::merge_plants;
