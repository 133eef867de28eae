use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Watering interval used when a plant has no care profile
pub const DEFAULT_WATERING_FREQUENCY: u32 = 7;

/// Species-level care information shared between plants
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CareProfile {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub scientific_name: Option<String>,
    /// Watering frequency in days
    #[serde(default = "default_water_frequency")]
    pub water_frequency: u32,
    #[serde(default)]
    pub light_requirements: String,
    #[serde(default)]
    pub humidity_level: Option<String>,
    #[serde(default)]
    pub temperature_range: Option<String>,
    #[serde(default)]
    pub soil_type: Option<String>,
    #[serde(default)]
    pub fertilizer_frequency: Option<String>,
    #[serde(default)]
    pub care_summary: Option<String>,
}

fn default_water_frequency() -> u32 {
    DEFAULT_WATERING_FREQUENCY
}

/// Care profile creation payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NewCareProfile {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scientific_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub water_frequency: Option<u32>,
    pub light_requirements: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub humidity_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub care_summary: Option<String>,
}

/// A plant owned by the user
///
/// Descriptive fields come from the backend. `watering_frequency` and
/// `next_watering` are device-local overrides kept in the plant cache.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Plant {
    pub id: i64,
    pub name: String,
    /// Embedded care profile as returned by the backend
    #[serde(default)]
    pub care: Option<CareProfile>,
    #[serde(default)]
    pub last_watered: Option<NaiveDate>,
    #[serde(default)]
    pub last_fertilized: Option<NaiveDate>,
    /// Days between waterings (local override)
    #[serde(
        default,
        rename = "wateringFrequency",
        skip_serializing_if = "Option::is_none"
    )]
    pub watering_frequency: Option<u32>,
    /// Days until the next watering, 0 = due today
    #[serde(
        default,
        rename = "nextWatering",
        skip_serializing_if = "Option::is_none"
    )]
    pub next_watering: Option<u32>,
}

impl Plant {
    /// Frequency from the care profile, ignoring any local override
    pub fn profile_frequency(&self) -> u32 {
        self.care
            .as_ref()
            .map(|c| c.water_frequency)
            .unwrap_or(DEFAULT_WATERING_FREQUENCY)
    }

    /// Effective watering frequency
    pub fn frequency(&self) -> u32 {
        self.watering_frequency
            .unwrap_or_else(|| self.profile_frequency())
    }
}

/// Partial plant record used for creation
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NewPlant {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "plant", skip_serializing_if = "Option::is_none")]
    pub care_profile_id: Option<i64>,
}

impl NewPlant {
    pub fn validate(&self) -> Result<(), Error> {
        match (&self.name, self.care_profile_id) {
            (Some(name), _) if name.trim().is_empty() => {
                Err(Error::InvalidPlant("name must not be blank".to_string()))
            }
            (None, None) => Err(Error::InvalidPlant(
                "either a name or a care profile is required".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

/// Wall-clock time at which daily reminders fire
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationTime {
    pub hour: u32,
    pub minute: u32,
}

impl NotificationTime {
    pub fn new(hour: u32, minute: u32) -> Result<Self, Error> {
        if hour > 23 || minute > 59 {
            return Err(Error::InvalidTime(format!("{:02}:{:02}", hour, minute)));
        }
        Ok(Self { hour, minute })
    }

    pub fn is_valid(&self) -> bool {
        self.hour <= 23 && self.minute <= 59
    }
}

impl Default for NotificationTime {
    fn default() -> Self {
        Self {
            hour: 18,
            minute: 0,
        }
    }
}

impl fmt::Display for NotificationTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for NotificationTime {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidTime(s.to_string());
        let (hour, minute) = s.trim().split_once(':').ok_or_else(invalid)?;
        let hour = hour.parse::<u32>().map_err(|_| invalid())?;
        let minute = minute.parse::<u32>().map_err(|_| invalid())?;
        Self::new(hour, minute).map_err(|_| invalid())
    }
}

/// Record of one scheduled notification, stored per date key
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduledRecord {
    pub handle: String,
    #[serde(rename = "plantIds")]
    pub plant_ids: Vec<i64>,
}
