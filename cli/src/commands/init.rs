use std::path::Path;

use crate::{app_config::AppConfig, profile::Profile};

/// Write a profile file with the resolved settings
pub fn init_cmd(config: &AppConfig, profile_path: &Path) -> anyhow::Result<()> {
    if profile_path.exists() {
        println!("Profile already exists at {}", profile_path.display());
        return Ok(());
    }

    let profile = Profile {
        db_path: Some(config.db_path.clone()),
        api_url: Some(config.api_url.clone()),
        token_path: Some(config.token_path.clone()),
        notifications: config.notifications,
    };
    profile.save(profile_path)?;

    println!("Profile created at {}", profile_path.display());
    Ok(())
}
