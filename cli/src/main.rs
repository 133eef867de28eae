#![deny(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
#![warn(clippy::expect_used)]

use crate::app_config::AppConfig;
use args::{CliArgs, Command};
use clap::Parser;
use commands::{
    care::care_cmd, config::config_cmd, init::init_cmd, login::login_cmd, notify::notify_cmd,
    plant::plant_cmd, profile::profile_cmd,
};
use profile::{get_profile_config_path, get_profile_name, Profile};
use session::Session;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod app_config;
mod args;
mod commands;
mod formatters;
mod model;
mod profile;
mod session;
mod spool;
mod utils;
mod web_client;

#[cfg(test)]
mod test;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();

    let args = CliArgs::parse();

    let profile_name = get_profile_name(&args.config.profile_path);
    let profile_path = get_profile_config_path(&profile_name);

    if let Some(command) = args.command {
        let profile = Profile::from_path(&profile_path)?;
        let config =
            AppConfig::from_args(args.config, &profile_name, &profile_path, profile.as_ref());

        match command {
            Command::Config => config_cmd(&config)?,
            Command::Init => init_cmd(&config, &profile_path)?,
            Command::Profile(subcommand) => profile_cmd(subcommand)?,
            command => {
                let runtime = tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()?;
                runtime.block_on(run_session_command(&config, command))?;
            }
        }
    }

    Ok(())
}

async fn run_session_command(config: &AppConfig, command: Command) -> anyhow::Result<()> {
    if let Command::Login(args) = command {
        return login_cmd(config, &args.token).await;
    }

    let session = Session::start(config).await?;

    let result = match command {
        Command::Plant(subcommand) => plant_cmd(&session, subcommand).await,
        Command::Care(subcommand) => care_cmd(&session, subcommand).await,
        Command::Notify(subcommand) => notify_cmd(&session, subcommand).await,
        _ => Ok(()),
    };

    session.close().await?;
    result
}

fn setup_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "{crate_name}=warn,sprout_core=warn",
                    crate_name = env!("CARGO_CRATE_NAME")
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
