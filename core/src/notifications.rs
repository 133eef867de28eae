use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const WATER_PLANT_CATEGORY: &str = "WATER_PLANT_CATEGORY";
pub const ACTION_WATERED: &str = "WATERED";
pub const ACTION_SNOOZE: &str = "SNOOZE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Permission {
    Granted,
    Denied,
    Undetermined,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationRequest {
    pub title: String,
    pub body: String,
    pub category: String,
    /// Local wall-clock trigger time
    pub trigger: NaiveDateTime,
    /// Plants the reminder is about
    pub plant_ids: Vec<i64>,
}

/// A notification the platform still holds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledNotification {
    pub handle: String,
    pub request: NotificationRequest,
}

/// User interaction with a delivered notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationResponse {
    pub handle: String,
    pub action_id: String,
    pub plant_ids: Vec<i64>,
}

/// What a response asks the plant store to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationAction {
    /// Advance by the plant's watering frequency
    Watered,
    /// Advance by one day
    Snooze,
    /// Plain tap, nothing to update
    Open,
}

impl NotificationAction {
    pub fn from_action_id(id: &str) -> Self {
        match id {
            ACTION_WATERED => Self::Watered,
            ACTION_SNOOZE => Self::Snooze,
            _ => Self::Open,
        }
    }
}

/// Device notification service
#[async_trait]
pub trait NotificationPlatform: Send + Sync {
    async fn permission(&self) -> Result<Permission>;
    async fn request_permission(&self) -> Result<Permission>;
    /// Returns the platform-assigned handle
    async fn schedule(&self, request: NotificationRequest) -> Result<String>;
    async fn cancel(&self, handle: &str) -> Result<()>;
    /// Cancel everything still pending. The scheduler never calls this, it
    /// only cancels the handles it recorded.
    async fn cancel_all(&self) -> Result<()>;
    /// Remove an already delivered notification from view
    async fn dismiss(&self, handle: &str) -> Result<()>;
    async fn list_scheduled(&self) -> Result<Vec<ScheduledNotification>>;
}
