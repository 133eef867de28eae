use crate::{
    args::ProfileCommand,
    profile::{self, Profile},
};

pub fn profile_cmd(subcommand: ProfileCommand) -> Result<(), anyhow::Error> {
    match subcommand {
        ProfileCommand::Use { name } => {
            profile::set_current_profile_name(&name)?;

            let config_path = profile::get_profile_config_path(&name);
            if !config_path.exists() {
                Profile::default().save(&config_path)?;
                println!("Created new profile: {}", name);
            }

            println!("Switched to profile: {}", name);
        }
        ProfileCommand::List => {
            let profiles = profile::list_profiles()?;
            let current =
                profile::get_current_profile_name().unwrap_or_else(|_| "default".to_string());

            println!("Available profiles:");
            for profile_name in profiles {
                let marker = if profile_name == current { "*" } else { " " };
                let data_dir = profile::get_profile_data_dir(&profile_name);
                println!("{} {} ({})", marker, profile_name, data_dir.display());
            }
        }
        ProfileCommand::Current => {
            let current = profile::get_current_profile_name()?;
            let data_dir = profile::get_profile_data_dir(&current);
            println!("Current profile: {} ({})", current, data_dir.display());
        }
    }

    Ok(())
}
