use std::fmt;
use std::str::FromStr;

use chrono::{Days, NaiveDate};
use serde::Serialize;

/// When a plant should be watered next, as typed by the user
#[derive(Debug, Clone, PartialEq)]
pub enum DueDate {
    Today,
    Tomorrow,
    NextWeek,
    InDays(u32),
    Specific(NaiveDate),
}

impl DueDate {
    /// Days left until the due date, counted from `today`.
    /// Dates in the past are an error.
    pub fn days_from(&self, today: NaiveDate) -> anyhow::Result<u32> {
        match self {
            DueDate::Today => Ok(0),
            DueDate::Tomorrow => Ok(1),
            DueDate::NextWeek => Ok(7),
            DueDate::InDays(days) => Ok(*days),
            DueDate::Specific(date) => {
                let days = (*date - today).num_days();
                if days < 0 {
                    anyhow::bail!("{} is in the past", date);
                }
                u32::try_from(days).map_err(|_| anyhow::anyhow!("{} is too far ahead", date))
            }
        }
    }

    pub fn to_date(&self, today: NaiveDate) -> anyhow::Result<NaiveDate> {
        let days = self.days_from(today)?;
        today
            .checked_add_days(Days::new(u64::from(days)))
            .ok_or_else(|| anyhow::anyhow!("date out of range"))
    }
}

impl FromStr for DueDate {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "today" | "now" => Ok(Self::Today),
            "tomorrow" => Ok(Self::Tomorrow),
            "next week" => Ok(Self::NextWeek),
            s => {
                if let Ok(days) = s.parse::<u32>() {
                    return Ok(Self::InDays(days));
                }
                match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                    Ok(dt) => Ok(Self::Specific(dt)),
                    Err(e) => anyhow::bail!("Invalid due date: {}", e),
                }
            }
        }
    }
}

impl fmt::Display for DueDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DueDate::Today => write!(f, "today"),
            DueDate::Tomorrow => write!(f, "tomorrow"),
            DueDate::NextWeek => write!(f, "next week"),
            DueDate::InDays(days) => write!(f, "{}", days),
            DueDate::Specific(dt) => write!(f, "{}", dt),
        }
    }
}

impl Serialize for DueDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
