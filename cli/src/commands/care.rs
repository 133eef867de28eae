use sprout_core::NewCareProfile;

use crate::{args::CareCommand, formatters::print_care_profiles, session::Session};

pub async fn care_cmd(session: &Session, subcommand: CareCommand) -> anyhow::Result<()> {
    match subcommand {
        CareCommand::List => {
            let profiles = session.plants.care_profiles().await?;
            print_care_profiles(&profiles);
        }
        CareCommand::Add(args) => {
            let profile = NewCareProfile {
                name: args.name,
                scientific_name: args.scientific_name,
                water_frequency: args.frequency,
                light_requirements: args.light,
                humidity_level: args.humidity,
                temperature_range: args.temperature,
                care_summary: args.summary,
            };

            let created = session.plants.add_care_profile(profile).await?;
            println!("Care profile added successfully ({})", created.id);
        }
    }

    Ok(())
}
