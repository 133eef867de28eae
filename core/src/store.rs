use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::api::PlantApi;
use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::models::{CareProfile, NewCareProfile, NewPlant, Plant};
use crate::notifications::NotificationAction;
use crate::storage::{load_json, save_json, KeyValueStore, PLANTS_KEY};
use crate::sync::{merge_plants, purge_plant};

/// Single source of truth for the user's plants.
///
/// Remote mutations go to the backend and are followed by a full reload.
/// Watering overrides are local only and are written to the plant cache
/// before the in-memory list changes.
pub struct PlantStore {
    api: Arc<dyn PlantApi>,
    storage: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    plants: Vec<Plant>,
    care_profiles: Vec<CareProfile>,
}

impl PlantStore {
    pub fn new(
        api: Arc<dyn PlantApi>,
        storage: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            api,
            storage,
            clock,
            plants: Vec::new(),
            care_profiles: Vec::new(),
        }
    }

    pub fn plants(&self) -> &[Plant] {
        &self.plants
    }

    pub fn care_profiles(&self) -> &[CareProfile] {
        &self.care_profiles
    }

    /// Refresh the plant list from the backend, falling back to the cache
    pub async fn load_plants(&mut self) {
        let cached: Option<Vec<Plant>> = load_json(self.storage.as_ref(), PLANTS_KEY).await;

        match self.api.list_plants().await {
            Ok(remote) => {
                let today = self.clock.now().date();
                let merged = merge_plants(remote, cached.as_deref().unwrap_or_default(), today);

                if let Err(e) = save_json(self.storage.as_ref(), PLANTS_KEY, &merged).await {
                    warn!(error = %e, "failed to cache plant list");
                }
                debug!(count = merged.len(), "loaded plants from backend");
                self.plants = merged;
            }
            Err(e) => {
                let plants = cached.unwrap_or_default();
                warn!(error = %e, cached = plants.len(), "backend unavailable, using local cache");
                self.plants = plants;
            }
        }
    }

    pub async fn add_plant(&mut self, plant: NewPlant) -> Result<()> {
        plant.validate()?;
        self.api.create_plant(&plant).await?;
        info!(name = ?plant.name, profile = ?plant.care_profile_id, "plant created");
        self.load_plants().await;
        Ok(())
    }

    pub async fn delete_plant(&mut self, id: i64) -> Result<()> {
        self.api.delete_plant(id).await?;

        if let Some(mut cached) =
            load_json::<Vec<Plant>>(self.storage.as_ref(), PLANTS_KEY).await
        {
            if purge_plant(&mut cached, id) {
                save_json(self.storage.as_ref(), PLANTS_KEY, &cached).await?;
            }
        }

        info!(id, "plant deleted");
        self.load_plants().await;
        Ok(())
    }

    /// Record a watering remotely and restart the local countdown
    pub async fn mark_as_watered(&mut self, id: i64) -> Result<()> {
        self.api.mark_watered(id).await?;
        info!(id, "plant marked as watered");

        if let Some(mut cached) =
            load_json::<Vec<Plant>>(self.storage.as_ref(), PLANTS_KEY).await
        {
            if let Some(plant) = cached.iter_mut().find(|p| p.id == id) {
                plant.next_watering = Some(plant.frequency());
                save_json(self.storage.as_ref(), PLANTS_KEY, &cached).await?;
            }
        }

        self.load_plants().await;
        Ok(())
    }

    /// Set the local countdown without contacting the backend
    pub async fn set_next_watering(&mut self, id: i64, days_left: u32) -> Result<()> {
        self.update_local(id, |plant| plant.next_watering = Some(days_left))
            .await
    }

    /// Override the watering interval locally
    pub async fn set_watering_frequency(&mut self, id: i64, frequency_days: u32) -> Result<()> {
        if frequency_days == 0 {
            return Err(Error::InvalidPlant(
                "watering frequency must be at least one day".to_string(),
            ));
        }
        self.update_local(id, |plant| plant.watering_frequency = Some(frequency_days))
            .await
    }

    /// Apply a notification action to the cached plants.
    ///
    /// Re-reads the cache right before writing so edits made since the last
    /// load are kept.
    pub async fn apply_notification_action(
        &mut self,
        plant_ids: &[i64],
        action: NotificationAction,
    ) -> Result<()> {
        if plant_ids.is_empty() || action == NotificationAction::Open {
            return Ok(());
        }

        let Some(mut plants) = load_json::<Vec<Plant>>(self.storage.as_ref(), PLANTS_KEY).await
        else {
            debug!("no cached plants, ignoring notification action");
            return Ok(());
        };

        for plant in plants.iter_mut().filter(|p| plant_ids.contains(&p.id)) {
            let step = match action {
                NotificationAction::Watered => plant.frequency(),
                NotificationAction::Snooze => 1,
                NotificationAction::Open => 0,
            };
            plant.next_watering = Some(plant.next_watering.unwrap_or(0).saturating_add(step));
        }

        save_json(self.storage.as_ref(), PLANTS_KEY, &plants).await?;
        info!(?action, ids = ?plant_ids, "applied notification action");
        self.plants = plants;
        Ok(())
    }

    pub async fn load_care_profiles(&mut self) -> Result<()> {
        self.care_profiles = self.api.list_care_profiles().await?;
        Ok(())
    }

    pub async fn add_care_profile(&mut self, profile: NewCareProfile) -> Result<CareProfile> {
        if profile.name.trim().is_empty() {
            return Err(Error::InvalidPlant(
                "care profile name must not be blank".to_string(),
            ));
        }
        let created = self.api.create_care_profile(&profile).await?;
        info!(id = created.id, name = %created.name, "care profile created");
        self.care_profiles.push(created.clone());
        Ok(created)
    }

    async fn update_local(&mut self, id: i64, apply: impl Fn(&mut Plant)) -> Result<()> {
        let mut updated = self.plants.clone();
        let plant = updated
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(Error::PlantNotFound(id))?;
        apply(plant);

        save_json(self.storage.as_ref(), PLANTS_KEY, &updated).await?;
        self.plants = updated;
        Ok(())
    }
}
