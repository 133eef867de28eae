use thiserror::Error;

/// Errors raised by the plant store, scheduler and storage layer
#[derive(Debug, Error)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Remote plant API failure (transport or non-success response)
    #[error("Remote API error: {0}")]
    Api(String),

    #[error("Invalid plant: {0}")]
    InvalidPlant(String),

    #[error("Invalid notification time: {0}")]
    InvalidTime(String),

    #[error("Plant not found: {0}")]
    PlantNotFound(i64),

    #[error("Notification platform error: {0}")]
    Notification(String),

    #[error("Plant service is no longer running")]
    ServiceClosed,
}

pub type Result<T> = std::result::Result<T, Error>;
