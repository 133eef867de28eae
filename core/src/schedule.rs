use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::models::{NotificationTime, Plant, ScheduledRecord};
use crate::notifications::{
    NotificationAction, NotificationPlatform, NotificationRequest, NotificationResponse,
    Permission, WATER_PLANT_CATEGORY,
};
use crate::storage::{
    load_json, save_json, KeyValueStore, NOTIFICATION_RECORD_PREFIX, NOTIFICATION_TIME_KEY,
};

pub const NOTIFICATION_TITLE: &str = "Time to water your plants!";

/// Calendar key used for grouping and record storage (YYYY-MM-DD)
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn record_key(date: NaiveDate) -> String {
    format!("{}{}", NOTIFICATION_RECORD_PREFIX, date_key(date))
}

/// Instant at which a plant due in `days` should be announced.
///
/// A plant due today whose reminder time has already passed moves to
/// tomorrow, and any candidate not strictly after `now` moves one more day.
pub fn trigger_for(
    now: NaiveDateTime,
    days: u32,
    time: NotificationTime,
) -> Option<NaiveDateTime> {
    let at = NaiveTime::from_hms_opt(time.hour, time.minute, 0)?;
    let mut candidate = now
        .date()
        .checked_add_days(Days::new(u64::from(days)))?
        .and_time(at);

    let passed_today = (now.hour(), now.minute()) >= (time.hour, time.minute);
    if days == 0 && passed_today {
        candidate = candidate.checked_add_days(Days::new(1))?;
    }

    if candidate <= now {
        candidate = candidate.checked_add_days(Days::new(1))?;
    }

    Some(candidate)
}

/// Group plants by the calendar date of their next reminder
pub fn group_by_date<'a>(
    now: NaiveDateTime,
    plants: &'a [Plant],
    time: NotificationTime,
) -> BTreeMap<NaiveDate, Vec<&'a Plant>> {
    let mut groups: BTreeMap<NaiveDate, Vec<&Plant>> = BTreeMap::new();

    for plant in plants {
        let Some(days) = plant.next_watering else {
            continue;
        };
        match trigger_for(now, days, time) {
            Some(trigger) => groups.entry(trigger.date()).or_default().push(plant),
            None => warn!(id = plant.id, days, "watering date out of range, skipping"),
        }
    }

    groups
}

fn build_request(
    date: NaiveDate,
    plants: &[&Plant],
    time: NotificationTime,
) -> Option<NotificationRequest> {
    let at = NaiveTime::from_hms_opt(time.hour, time.minute, 0)?;
    let names: Vec<&str> = plants.iter().map(|p| p.name.as_str()).collect();

    Some(NotificationRequest {
        title: NOTIFICATION_TITLE.to_string(),
        body: format!("The following need water: {}", names.join(", ")),
        category: WATER_PLANT_CATEGORY.to_string(),
        trigger: date.and_time(at),
        plant_ids: plants.iter().map(|p| p.id).collect(),
    })
}

/// Keeps one pending reminder per watering date on the device.
///
/// Only notifications recorded under `notification:<date>` keys are ever
/// cancelled, anything else on the platform is left alone.
pub struct NotificationScheduler {
    platform: Arc<dyn NotificationPlatform>,
    storage: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    time: NotificationTime,
}

impl NotificationScheduler {
    pub fn new(
        platform: Arc<dyn NotificationPlatform>,
        storage: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            platform,
            storage,
            clock,
            time: NotificationTime::default(),
        }
    }

    pub fn notification_time(&self) -> NotificationTime {
        self.time
    }

    /// Load the configured reminder time, keeping the default on bad data
    pub async fn load_notification_time(&mut self) -> NotificationTime {
        match load_json::<NotificationTime>(self.storage.as_ref(), NOTIFICATION_TIME_KEY).await {
            Some(time) if time.is_valid() => self.time = time,
            Some(time) => warn!(%time, "ignoring out of range notification time"),
            None => {}
        }
        self.time
    }

    pub async fn set_notification_time(&mut self, time: NotificationTime) -> Result<()> {
        if !time.is_valid() {
            return Err(Error::InvalidTime(time.to_string()));
        }
        save_json(self.storage.as_ref(), NOTIFICATION_TIME_KEY, &time).await?;
        info!(%time, "notification time updated");
        self.time = time;
        Ok(())
    }

    async fn permission_granted(&self) -> Result<bool> {
        let status = match self.platform.permission().await? {
            Permission::Undetermined => self.platform.request_permission().await?,
            status => status,
        };
        Ok(status == Permission::Granted)
    }

    /// Replace every reminder this scheduler created with a fresh set.
    ///
    /// Previous reminders are cancelled even when permission is missing, only
    /// the scheduling step is skipped then.
    ///
    /// Returns the number of notifications scheduled. A failure for one date
    /// is logged and the remaining dates are still scheduled.
    pub async fn reschedule(&self, plants: &[Plant]) -> Result<usize> {
        self.cancel_previous().await?;

        if !self.permission_granted().await? {
            warn!("notification permission not granted, skipping reminders");
            return Ok(0);
        }

        let now = self.clock.now();
        let groups = group_by_date(now, plants, self.time);
        let mut scheduled = 0;

        for (date, group) in &groups {
            let Some(request) = build_request(*date, group, self.time) else {
                continue;
            };
            let plant_ids = request.plant_ids.clone();

            let handle = match self.platform.schedule(request).await {
                Ok(handle) => handle,
                Err(e) => {
                    warn!(date = %date_key(*date), error = %e, "failed to schedule reminder");
                    continue;
                }
            };

            let record = ScheduledRecord { handle, plant_ids };
            save_json(self.storage.as_ref(), &record_key(*date), &record).await?;
            scheduled += 1;
        }

        if let Ok(pending) = self.platform.list_scheduled().await {
            debug!(pending = pending.len(), scheduled, "reminders rescheduled");
        }

        Ok(scheduled)
    }

    /// Cancel recorded reminders and drop their records
    pub async fn cancel_previous(&self) -> Result<()> {
        let keys = self
            .storage
            .keys_with_prefix(NOTIFICATION_RECORD_PREFIX)
            .await?;

        for key in keys {
            if let Some(record) = load_json::<ScheduledRecord>(self.storage.as_ref(), &key).await {
                if let Err(e) = self.platform.cancel(&record.handle).await {
                    warn!(key = %key, handle = %record.handle, error = %e, "failed to cancel reminder");
                }
            }
            self.storage.remove(&key).await?;
        }

        Ok(())
    }

    /// Recorded reminders, ordered by date
    pub async fn records(&self) -> Result<Vec<(String, ScheduledRecord)>> {
        let keys = self
            .storage
            .keys_with_prefix(NOTIFICATION_RECORD_PREFIX)
            .await?;

        let mut records = Vec::new();
        for key in keys {
            if let Some(record) = load_json::<ScheduledRecord>(self.storage.as_ref(), &key).await {
                let date = key.trim_start_matches(NOTIFICATION_RECORD_PREFIX).to_string();
                records.push((date, record));
            }
        }
        Ok(records)
    }

    /// Work out what a delivered-notification interaction refers to.
    ///
    /// Dismisses the notification. Plant ids come from the payload, or from
    /// the stored record for the handle when the payload is empty.
    pub async fn resolve_response(
        &self,
        response: &NotificationResponse,
    ) -> Result<(Vec<i64>, NotificationAction)> {
        if let Err(e) = self.platform.dismiss(&response.handle).await {
            warn!(handle = %response.handle, error = %e, "failed to dismiss notification");
        }

        let action = NotificationAction::from_action_id(&response.action_id);
        if !response.plant_ids.is_empty() {
            return Ok((response.plant_ids.clone(), action));
        }

        let ids = self
            .records()
            .await?
            .into_iter()
            .find(|(_, record)| record.handle == response.handle)
            .map(|(_, record)| record.plant_ids)
            .unwrap_or_default();
        Ok((ids, action))
    }
}
