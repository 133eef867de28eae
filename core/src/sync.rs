use std::collections::HashMap;

use chrono::NaiveDate;

use crate::models::Plant;

/// Merge the backend plant list with the device cache.
///
/// Identity and descriptive fields always come from `remote`. The watering
/// overrides (`watering_frequency`, `next_watering`) come from the cached
/// record with the same id when it has them, otherwise they are derived from
/// the care profile. Cached plants missing from `remote` are dropped.
pub fn merge_plants(remote: Vec<Plant>, cached: &[Plant], today: NaiveDate) -> Vec<Plant> {
    let local: HashMap<i64, &Plant> = cached.iter().map(|p| (p.id, p)).collect();

    remote
        .into_iter()
        .map(|mut plant| {
            let overrides = local.get(&plant.id);

            let frequency = overrides
                .and_then(|p| p.watering_frequency)
                .unwrap_or_else(|| plant.profile_frequency());
            let next = overrides
                .and_then(|p| p.next_watering)
                .unwrap_or_else(|| derive_next_watering(&plant, frequency, today));

            plant.watering_frequency = Some(frequency);
            plant.next_watering = Some(next);
            plant
        })
        .collect()
}

/// Days until the next watering, from the last watering date and frequency.
///
/// Overdue plants are due today. A plant that was never watered gets a full
/// interval.
pub fn derive_next_watering(plant: &Plant, frequency: u32, today: NaiveDate) -> u32 {
    match plant.last_watered {
        Some(last) => {
            let elapsed = (today - last).num_days().max(0);
            let remaining = i64::from(frequency) - elapsed;
            u32::try_from(remaining.max(0)).unwrap_or(0)
        }
        None => frequency,
    }
}

/// Drop a plant from a cached list. Returns true if something was removed.
pub fn purge_plant(cached: &mut Vec<Plant>, id: i64) -> bool {
    let before = cached.len();
    cached.retain(|p| p.id != id);
    cached.len() != before
}
