use std::io::{self, Write};

use serde::Serialize;
use sprout_core::{CareProfile, Plant};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::{args::OutputFormat, model::ReminderView};

#[derive(Serialize)]
struct PlantRow<'a> {
    id: i64,
    name: &'a str,
    next_watering: Option<u32>,
    watering_frequency: u32,
    care_profile: Option<&'a str>,
}

impl<'a> From<&'a Plant> for PlantRow<'a> {
    fn from(plant: &'a Plant) -> Self {
        PlantRow {
            id: plant.id,
            name: &plant.name,
            next_watering: plant.next_watering,
            watering_frequency: plant.frequency(),
            care_profile: plant.care.as_ref().map(|c| c.name.as_str()),
        }
    }
}

pub fn due_label(next_watering: Option<u32>) -> String {
    match next_watering {
        None => "not scheduled".to_string(),
        Some(0) => "due today".to_string(),
        Some(1) => "tomorrow".to_string(),
        Some(days) => format!("in {} days", days),
    }
}

fn due_color(next_watering: Option<u32>) -> Option<Color> {
    match next_watering {
        Some(0) => Some(Color::Red),
        Some(1) => Some(Color::Yellow),
        Some(_) => Some(Color::Green),
        None => None,
    }
}

pub struct PlantFormatter {
    output: OutputFormat,
    stdout: StandardStream,
}

impl PlantFormatter {
    pub fn new(output: OutputFormat) -> Self {
        let choice = match output {
            OutputFormat::Pretty => ColorChoice::Auto,
            _ => ColorChoice::Never,
        };
        Self {
            output,
            stdout: StandardStream::stdout(choice),
        }
    }

    pub fn print_plants(&mut self, plants: &[Plant]) -> io::Result<()> {
        match self.output {
            OutputFormat::Json => {
                let rows: Vec<PlantRow> = plants.iter().map(PlantRow::from).collect();
                let json = serde_json::to_string_pretty(&rows)?;
                writeln!(self.stdout, "{}", json)
            }
            OutputFormat::Plain => {
                for plant in plants {
                    writeln!(
                        self.stdout,
                        "{}\t{}\t{}\t{}",
                        plant.id,
                        plant.name,
                        plant
                            .next_watering
                            .map(|d| d.to_string())
                            .unwrap_or_else(|| "-".to_string()),
                        plant.frequency()
                    )?;
                }
                Ok(())
            }
            OutputFormat::Pretty => {
                if plants.is_empty() {
                    return writeln!(self.stdout, "No plants found");
                }
                for plant in plants {
                    self.print_pretty(plant)?;
                }
                Ok(())
            }
        }
    }

    fn print_pretty(&mut self, plant: &Plant) -> io::Result<()> {
        self.stdout.set_color(ColorSpec::new().set_dimmed(true))?;
        write!(self.stdout, "[{}] ", plant.id)?;
        self.stdout.set_color(ColorSpec::new().set_bold(true))?;
        write!(self.stdout, "{}", plant.name)?;
        self.stdout.reset()?;

        write!(self.stdout, "  ")?;
        self.stdout
            .set_color(ColorSpec::new().set_fg(due_color(plant.next_watering)))?;
        write!(self.stdout, "{}", due_label(plant.next_watering))?;
        self.stdout.reset()?;

        write!(self.stdout, "  every {} days", plant.frequency())?;
        if let Some(care) = &plant.care {
            write!(self.stdout, " ({})", care.name)?;
        }
        writeln!(self.stdout)
    }
}

pub fn print_care_profiles(profiles: &[CareProfile]) {
    if profiles.is_empty() {
        println!("No care profiles found");
        return;
    }
    for profile in profiles {
        match &profile.scientific_name {
            Some(scientific) => println!(
                "[{}] {} ({}), water every {} days",
                profile.id, profile.name, scientific, profile.water_frequency
            ),
            None => println!(
                "[{}] {}, water every {} days",
                profile.id, profile.name, profile.water_frequency
            ),
        }
    }
}

pub fn print_reminders(reminders: &[ReminderView]) {
    if reminders.is_empty() {
        println!("No reminders");
        return;
    }
    for reminder in reminders {
        println!("{}  {}  {}", reminder.handle, reminder.trigger, reminder.body);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_due_label() {
        assert_eq!(due_label(Some(0)), "due today");
        assert_eq!(due_label(Some(1)), "tomorrow");
        assert_eq!(due_label(Some(5)), "in 5 days");
        assert_eq!(due_label(None), "not scheduled");
    }
}
