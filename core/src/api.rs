use async_trait::async_trait;

use crate::error::Result;
use crate::models::{CareProfile, NewCareProfile, NewPlant, Plant};

/// Remote plant backend.
///
/// The backend is authoritative for plant identity and descriptive fields.
#[async_trait]
pub trait PlantApi: Send + Sync {
    async fn list_plants(&self) -> Result<Vec<Plant>>;
    async fn create_plant(&self, plant: &NewPlant) -> Result<()>;
    async fn delete_plant(&self, id: i64) -> Result<()>;
    async fn mark_watered(&self, id: i64) -> Result<()>;
    async fn list_care_profiles(&self) -> Result<Vec<CareProfile>>;
    async fn create_care_profile(&self, profile: &NewCareProfile) -> Result<CareProfile>;
}
