//! In-memory stand-ins for the backend and the notification platform.
#![allow(clippy::unwrap_used)]

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};

use crate::api::PlantApi;
use crate::clock::FixedClock;
use crate::error::{Error, Result};
use crate::models::{CareProfile, NewCareProfile, NewPlant, Plant};
use crate::notifications::{
    NotificationPlatform, NotificationRequest, Permission, ScheduledNotification,
};

pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

pub fn fixed_clock(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> FixedClock {
    FixedClock(at(year, month, day, hour, minute))
}

pub fn care(id: i64, frequency: u32) -> CareProfile {
    CareProfile {
        id,
        name: format!("Profile {}", id),
        scientific_name: None,
        water_frequency: frequency,
        light_requirements: "Indirect".to_string(),
        humidity_level: None,
        temperature_range: None,
        soil_type: None,
        fertilizer_frequency: None,
        care_summary: None,
    }
}

/// Backend-shaped plant record, no local overrides
pub fn plant(id: i64, name: &str, frequency: u32) -> Plant {
    Plant {
        id,
        name: name.to_string(),
        care: Some(care(100 + id, frequency)),
        last_watered: None,
        last_fertilized: None,
        watering_frequency: None,
        next_watering: None,
    }
}

#[derive(Default)]
pub struct FakeApi {
    plants: Mutex<Vec<Plant>>,
    profiles: Mutex<Vec<CareProfile>>,
    calls: Mutex<Vec<&'static str>>,
    failing: bool,
}

impl FakeApi {
    pub fn with_plants(plants: Vec<Plant>) -> Self {
        Self {
            plants: Mutex::new(plants),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &'static str) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        if self.failing {
            return Err(Error::Api("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl PlantApi for FakeApi {
    async fn list_plants(&self) -> Result<Vec<Plant>> {
        self.record("list")?;
        Ok(self.plants.lock().unwrap().clone())
    }

    async fn create_plant(&self, new: &NewPlant) -> Result<()> {
        self.record("create")?;
        let mut plants = self.plants.lock().unwrap();
        let id = plants.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        let profile = new.care_profile_id.and_then(|pid| {
            self.profiles
                .lock()
                .unwrap()
                .iter()
                .find(|c| c.id == pid)
                .cloned()
        });
        let name = new
            .name
            .clone()
            .or_else(|| profile.as_ref().map(|c| c.name.clone()))
            .unwrap_or_default();
        plants.push(Plant {
            id,
            name,
            care: profile,
            last_watered: None,
            last_fertilized: None,
            watering_frequency: None,
            next_watering: None,
        });
        Ok(())
    }

    async fn delete_plant(&self, id: i64) -> Result<()> {
        self.record("delete")?;
        self.plants.lock().unwrap().retain(|p| p.id != id);
        Ok(())
    }

    async fn mark_watered(&self, id: i64) -> Result<()> {
        self.record("water")?;
        for plant in self.plants.lock().unwrap().iter_mut().filter(|p| p.id == id) {
            plant.last_watered = NaiveDate::from_ymd_opt(2024, 5, 20);
        }
        Ok(())
    }

    async fn list_care_profiles(&self) -> Result<Vec<CareProfile>> {
        self.record("profiles")?;
        Ok(self.profiles.lock().unwrap().clone())
    }

    async fn create_care_profile(&self, new: &NewCareProfile) -> Result<CareProfile> {
        self.record("create_profile")?;
        let mut profiles = self.profiles.lock().unwrap();
        let mut created = care(profiles.len() as i64 + 1, new.water_frequency.unwrap_or(7));
        created.name = new.name.clone();
        profiles.push(created.clone());
        Ok(created)
    }
}

pub struct FakePlatform {
    permission: Mutex<Permission>,
    pending: Mutex<Vec<ScheduledNotification>>,
    cancelled: Mutex<Vec<String>>,
    dismissed: Mutex<Vec<String>>,
    fail_dates: Mutex<Vec<NaiveDate>>,
    counter: Mutex<u32>,
}

impl FakePlatform {
    pub fn granted() -> Self {
        Self::with_permission(Permission::Granted)
    }

    pub fn with_permission(permission: Permission) -> Self {
        Self {
            permission: Mutex::new(permission),
            pending: Mutex::new(Vec::new()),
            cancelled: Mutex::new(Vec::new()),
            dismissed: Mutex::new(Vec::new()),
            fail_dates: Mutex::new(Vec::new()),
            counter: Mutex::new(0),
        }
    }

    pub fn set_permission(&self, permission: Permission) {
        *self.permission.lock().unwrap() = permission;
    }

    pub fn fail_on(&self, date: NaiveDate) {
        self.fail_dates.lock().unwrap().push(date);
    }

    pub fn cancelled(&self) -> Vec<String> {
        self.cancelled.lock().unwrap().clone()
    }

    pub fn dismissed(&self) -> Vec<String> {
        self.dismissed.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationPlatform for FakePlatform {
    async fn permission(&self) -> Result<Permission> {
        Ok(*self.permission.lock().unwrap())
    }

    async fn request_permission(&self) -> Result<Permission> {
        Ok(match *self.permission.lock().unwrap() {
            Permission::Undetermined => Permission::Granted,
            other => other,
        })
    }

    async fn schedule(&self, request: NotificationRequest) -> Result<String> {
        if self
            .fail_dates
            .lock()
            .unwrap()
            .contains(&request.trigger.date())
        {
            return Err(Error::Notification("scheduler unavailable".to_string()));
        }
        let mut counter = self.counter.lock().unwrap();
        *counter += 1;
        let handle = format!("n-{}", *counter);
        self.pending.lock().unwrap().push(ScheduledNotification {
            handle: handle.clone(),
            request,
        });
        Ok(handle)
    }

    async fn cancel(&self, handle: &str) -> Result<()> {
        self.pending.lock().unwrap().retain(|n| n.handle != handle);
        self.cancelled.lock().unwrap().push(handle.to_string());
        Ok(())
    }

    async fn cancel_all(&self) -> Result<()> {
        self.pending.lock().unwrap().clear();
        Ok(())
    }

    async fn dismiss(&self, handle: &str) -> Result<()> {
        self.dismissed.lock().unwrap().push(handle.to_string());
        Ok(())
    }

    async fn list_scheduled(&self) -> Result<Vec<ScheduledNotification>> {
        Ok(self.pending.lock().unwrap().clone())
    }
}
