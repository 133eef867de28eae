use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use sprout_core::notifications::{ACTION_SNOOZE, ACTION_WATERED};
use sprout_core::NotificationTime;

use crate::utils::due_date::DueDate;

#[derive(Parser, Debug)]
#[command(
    name = "sprout",
    version,
    about,
    long_about = "Keep track of when your houseplants need water"
)]
pub struct CliArgs {
    #[clap(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(Debug, Args, Serialize)]
pub struct ConfigArgs {
    /// Profile name to use
    #[arg(long, short, env = "SPROUT_PROFILE")]
    pub profile_path: Option<String>,

    /// Base URL of the plant backend
    #[arg(long, env = "SPROUT_API_URL")]
    pub api_url: Option<String>,
}

#[derive(Debug, Subcommand, Serialize, PartialEq)]
pub enum Command {
    /// Prints out curent configuration
    Config,
    /// Initializes a new profile
    Init,
    /// Manage profiles
    #[clap(subcommand)]
    Profile(ProfileCommand),
    /// Stores the backend access token
    Login(LoginArgs),
    /// Plant subcommands
    #[clap(subcommand)]
    Plant(PlantCommand),
    /// Care profile subcommands
    #[clap(subcommand)]
    Care(CareCommand),
    /// Watering reminder subcommands
    #[clap(subcommand)]
    Notify(NotifyCommand),
}

#[derive(Debug, Subcommand, Serialize, PartialEq)]
pub enum ProfileCommand {
    /// Switch to a profile, creating it if needed
    Use { name: String },
    /// List available profiles
    List,
    /// Show the active profile
    Current,
}

#[derive(Debug, Args, Serialize, PartialEq)]
pub struct LoginArgs {
    /// Bearer token issued by the authentication provider
    #[arg(long, env = "SPROUT_TOKEN")]
    pub token: String,
}

#[derive(Debug, Subcommand, Serialize, PartialEq)]
pub enum PlantCommand {
    /// Lists plants and when they need water.
    List(PlantListArgs),
    /// Adds a plant.
    Add(PlantAddArgs),
    /// Deletes a plant.
    Delete(PlantIdArgs),
    /// Marks a plant as watered.
    Water(PlantIdArgs),
    /// Sets when a plant needs water next.
    Next(PlantNextArgs),
    /// Overrides how often a plant needs water.
    Frequency(PlantFrequencyArgs),
}

#[derive(Debug, Clone, ValueEnum, PartialEq, Serialize, Deserialize, Default)]
pub enum OutputFormat {
    #[default]
    Pretty,
    Plain,
    Json,
}

#[derive(Debug, Args, PartialEq, Serialize, Default)]
pub struct PlantListArgs {
    /// Only show plants due within this many days
    #[arg(long, value_name = "DAYS")]
    pub due_within: Option<u32>,

    /// Output format (pretty, plain, or json)
    #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
    pub output: OutputFormat,
}

#[derive(Debug, Args, Serialize, PartialEq)]
pub struct PlantAddArgs {
    /// Plant name
    #[arg(trailing_var_arg = true)]
    pub name: Vec<String>,
    /// Care profile id
    #[arg(long, short = 'c')]
    pub care: Option<i64>,
}

#[derive(Debug, Args, Serialize, PartialEq)]
pub struct PlantIdArgs {
    /// Plant ID
    #[arg(value_name = "ID")]
    pub id: i64,
}

#[derive(Debug, Args, Serialize, PartialEq)]
pub struct PlantNextArgs {
    /// Plant ID
    #[arg(value_name = "ID")]
    pub id: i64,
    /// Days from now, or a date ("today", "tomorrow", "next week", "2024-03-16")
    #[arg(value_name = "WHEN", value_parser = parse_due_date)]
    pub when: DueDate,
}

#[derive(Debug, Args, Serialize, PartialEq)]
pub struct PlantFrequencyArgs {
    /// Plant ID
    #[arg(value_name = "ID")]
    pub id: i64,
    /// Days between waterings
    #[arg(value_name = "DAYS", value_parser = clap::value_parser!(u32).range(1..))]
    pub days: u32,
}

#[derive(Debug, Subcommand, Serialize, PartialEq)]
pub enum CareCommand {
    /// Lists care profiles.
    List,
    /// Defines a new care profile.
    Add(CareAddArgs),
}

#[derive(Debug, Args, Serialize, PartialEq)]
pub struct CareAddArgs {
    /// Species display name
    pub name: String,
    /// Scientific name
    #[arg(long)]
    pub scientific_name: Option<String>,
    /// Days between waterings
    #[arg(long, short = 'f')]
    pub frequency: Option<u32>,
    /// Light requirements
    #[arg(long, default_value = "")]
    pub light: String,
    /// Humidity level
    #[arg(long)]
    pub humidity: Option<String>,
    /// Temperature range
    #[arg(long)]
    pub temperature: Option<String>,
    /// Free-text care summary
    #[arg(long)]
    pub summary: Option<String>,
}

#[derive(Debug, Subcommand, Serialize, PartialEq)]
pub enum NotifyCommand {
    /// Shows or sets the daily reminder time (HH:MM)
    Time {
        #[arg(value_parser = parse_notification_time)]
        time: Option<NotificationTime>,
    },
    /// Lists pending reminders
    List,
    /// Delivers reminders whose time has come
    Due,
    /// Responds to a delivered reminder
    Respond {
        /// Reminder handle
        handle: String,
        /// Action to take
        #[arg(value_enum)]
        action: ReminderAction,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Serialize)]
pub enum ReminderAction {
    /// The plants were watered
    Watered,
    /// Remind again tomorrow
    Snooze,
    /// Just open the reminder
    Open,
}

impl ReminderAction {
    pub fn action_id(self) -> &'static str {
        match self {
            ReminderAction::Watered => ACTION_WATERED,
            ReminderAction::Snooze => ACTION_SNOOZE,
            ReminderAction::Open => "OPEN",
        }
    }
}

pub fn parse_due_date(s: &str) -> anyhow::Result<DueDate> {
    s.parse()
}

pub fn parse_notification_time(s: &str) -> anyhow::Result<NotificationTime> {
    Ok(s.parse()?)
}
