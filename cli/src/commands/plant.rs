use chrono::Local;
use sprout_core::{NewPlant, Plant};

use crate::{
    args::{PlantCommand, PlantListArgs},
    formatters::{due_label, PlantFormatter},
    session::Session,
};

pub async fn plant_cmd(session: &Session, subcommand: PlantCommand) -> anyhow::Result<()> {
    match subcommand {
        PlantCommand::List(args) => {
            let plants = session.plants.plants().await?;
            let plants = filter_plants(plants, &args);

            let mut formatter = PlantFormatter::new(args.output);
            formatter
                .print_plants(&plants)
                .map_err(|e| anyhow::anyhow!("Error while formatting plants: {}", e))?;
        }
        PlantCommand::Add(args) => {
            let name = args.name.join(" ");
            let plant = NewPlant {
                name: (!name.is_empty()).then_some(name),
                care_profile_id: args.care,
            };

            let plants = session.plants.add_plant(plant).await?;
            println!("Plant added successfully ({} plants)", plants.len());
        }
        PlantCommand::Delete(args) => {
            session.plants.delete_plant(args.id).await?;
            println!("Plant {} deleted", args.id);
        }
        PlantCommand::Water(args) => {
            let plants = session.plants.mark_as_watered(args.id).await?;
            match find(&plants, args.id) {
                Some(plant) => println!(
                    "{} watered, next watering {}",
                    plant.name,
                    due_label(plant.next_watering)
                ),
                None => println!("Plant {} watered", args.id),
            }
        }
        PlantCommand::Next(args) => {
            let today = Local::now().date_naive();
            let days = args.when.days_from(today)?;
            let date = args.when.to_date(today)?;
            let plants = session.plants.set_next_watering(args.id, days).await?;
            if let Some(plant) = find(&plants, args.id) {
                println!(
                    "{} needs water on {} ({})",
                    plant.name,
                    date,
                    due_label(plant.next_watering)
                );
            }
        }
        PlantCommand::Frequency(args) => {
            let plants = session
                .plants
                .set_watering_frequency(args.id, args.days)
                .await?;
            if let Some(plant) = find(&plants, args.id) {
                println!("{} will be watered every {} days", plant.name, plant.frequency());
            }
        }
    };

    Ok(())
}

fn find(plants: &[Plant], id: i64) -> Option<&Plant> {
    plants.iter().find(|p| p.id == id)
}

/// Apply the `--due-within` filter and order by urgency
fn filter_plants(plants: Vec<Plant>, args: &PlantListArgs) -> Vec<Plant> {
    let mut plants: Vec<Plant> = plants
        .into_iter()
        .filter(|p| match args.due_within {
            Some(limit) => p.next_watering.is_some_and(|days| days <= limit),
            None => true,
        })
        .collect();

    plants.sort_by_key(|p| (p.next_watering.unwrap_or(u32::MAX), p.id));
    plants
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plant(id: i64, next: Option<u32>) -> Plant {
        Plant {
            id,
            name: format!("plant {}", id),
            care: None,
            last_watered: None,
            last_fertilized: None,
            watering_frequency: None,
            next_watering: next,
        }
    }

    #[test]
    fn test_filter_orders_by_next_watering() {
        let plants = vec![plant(1, Some(4)), plant(2, None), plant(3, Some(0))];

        let filtered = filter_plants(plants, &PlantListArgs::default());

        let ids: Vec<i64> = filtered.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_filter_due_within() {
        let plants = vec![plant(1, Some(4)), plant(2, None), plant(3, Some(2))];
        let args = PlantListArgs {
            due_within: Some(2),
            ..Default::default()
        };

        let filtered = filter_plants(plants, &args);

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, 3);
    }
}
