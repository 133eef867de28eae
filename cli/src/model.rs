use serde::{Deserialize, Serialize};

/// List payload, either a bare array or a `{"results": [...]}` envelope
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    Plain(Vec<T>),
    Paginated { results: Vec<T> },
}

impl<T> ListResponse<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            ListResponse::Plain(items) => items,
            ListResponse::Paginated { results } => results,
        }
    }
}

/// Reminder as shown by `notify list` and `notify due`
#[derive(Debug, Serialize)]
pub struct ReminderView {
    pub handle: String,
    pub trigger: String,
    pub title: String,
    pub body: String,
    pub plant_ids: Vec<i64>,
}

impl From<sprout_core::ScheduledNotification> for ReminderView {
    fn from(n: sprout_core::ScheduledNotification) -> Self {
        ReminderView {
            handle: n.handle,
            trigger: n.request.trigger.format("%Y-%m-%d %H:%M").to_string(),
            title: n.request.title,
            body: n.request.body,
            plant_ids: n.request.plant_ids,
        }
    }
}
