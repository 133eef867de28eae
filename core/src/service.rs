use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use crate::error::{Error, Result};
use crate::models::{CareProfile, NewCareProfile, NewPlant, NotificationTime, Plant};
use crate::notifications::NotificationResponse;
use crate::schedule::NotificationScheduler;
use crate::store::PlantStore;

type Reply<T> = oneshot::Sender<T>;

/// Work items processed one at a time by [`PlantService`]
#[derive(Debug)]
pub enum Command {
    /// A user signed in, triggers the initial load
    Authenticated(Reply<Vec<Plant>>),
    LoadPlants(Reply<Vec<Plant>>),
    Plants(Reply<Vec<Plant>>),
    AddPlant(NewPlant, Reply<Result<Vec<Plant>>>),
    DeletePlant(i64, Reply<Result<Vec<Plant>>>),
    MarkWatered(i64, Reply<Result<Vec<Plant>>>),
    SetNextWatering {
        id: i64,
        days: u32,
        reply: Reply<Result<Vec<Plant>>>,
    },
    SetWateringFrequency {
        id: i64,
        frequency: u32,
        reply: Reply<Result<Vec<Plant>>>,
    },
    NotificationTime(Reply<NotificationTime>),
    SetNotificationTime(NotificationTime, Reply<Result<()>>),
    /// Delivered-notification interaction reported by the platform
    NotificationResponse(NotificationResponse, Reply<Result<Vec<Plant>>>),
    CareProfiles(Reply<Result<Vec<CareProfile>>>),
    AddCareProfile(NewCareProfile, Reply<Result<CareProfile>>),
}

/// Owns the plant store and the scheduler and applies commands in order.
///
/// Every change to the plant list or the reminder time is followed by a
/// reschedule before the next command is taken. Storage is only written from
/// this task, so writes to a key never interleave.
pub struct PlantService {
    store: PlantStore,
    scheduler: NotificationScheduler,
    commands: mpsc::Receiver<Command>,
    scheduled_for: Option<(Vec<Plant>, NotificationTime)>,
}

impl PlantService {
    pub fn new(store: PlantStore, scheduler: NotificationScheduler) -> (Self, ServiceHandle) {
        let (tx, rx) = mpsc::channel(64);
        let service = Self {
            store,
            scheduler,
            commands: rx,
            scheduled_for: None,
        };
        (service, ServiceHandle { tx })
    }

    /// Run the service on the current runtime
    pub fn spawn(
        store: PlantStore,
        scheduler: NotificationScheduler,
    ) -> (ServiceHandle, JoinHandle<()>) {
        let (service, handle) = Self::new(store, scheduler);
        let join = tokio::spawn(service.run());
        (handle, join)
    }

    /// Process commands until every handle is dropped
    pub async fn run(mut self) {
        let time = self.scheduler.load_notification_time().await;
        debug!(%time, "plant service started");

        while let Some(command) = self.commands.recv().await {
            self.handle(command).await;
        }

        debug!("plant service stopped");
    }

    #[instrument(skip(self), level = "debug")]
    async fn handle(&mut self, command: Command) {
        match command {
            Command::Authenticated(reply) => {
                info!("user authenticated, loading plants");
                self.store.load_plants().await;
                if let Err(e) = self.store.load_care_profiles().await {
                    warn!(error = %e, "failed to load care profiles");
                }
                self.after_change().await;
                let _ = reply.send(self.snapshot());
            }
            Command::LoadPlants(reply) => {
                self.store.load_plants().await;
                self.after_change().await;
                let _ = reply.send(self.snapshot());
            }
            Command::Plants(reply) => {
                let _ = reply.send(self.snapshot());
            }
            Command::AddPlant(plant, reply) => {
                let result = self.store.add_plant(plant).await;
                let _ = reply.send(self.finish("add plant", result).await);
            }
            Command::DeletePlant(id, reply) => {
                let result = self.store.delete_plant(id).await;
                let _ = reply.send(self.finish("delete plant", result).await);
            }
            Command::MarkWatered(id, reply) => {
                let result = self.store.mark_as_watered(id).await;
                let _ = reply.send(self.finish("mark as watered", result).await);
            }
            Command::SetNextWatering { id, days, reply } => {
                let result = self.store.set_next_watering(id, days).await;
                let _ = reply.send(self.finish("set next watering", result).await);
            }
            Command::SetWateringFrequency {
                id,
                frequency,
                reply,
            } => {
                let result = self.store.set_watering_frequency(id, frequency).await;
                let _ = reply.send(self.finish("set watering frequency", result).await);
            }
            Command::NotificationTime(reply) => {
                let _ = reply.send(self.scheduler.notification_time());
            }
            Command::SetNotificationTime(time, reply) => {
                let result = self.scheduler.set_notification_time(time).await;
                match &result {
                    Ok(()) => self.after_change().await,
                    Err(e) => error!(error = %e, "failed to set notification time"),
                }
                let _ = reply.send(result);
            }
            Command::NotificationResponse(response, reply) => {
                let result = match self.scheduler.resolve_response(&response).await {
                    Ok((ids, action)) => self.store.apply_notification_action(&ids, action).await,
                    Err(e) => Err(e),
                };
                let _ = reply.send(self.finish("notification action", result).await);
            }
            Command::CareProfiles(reply) => {
                let result = self
                    .store
                    .load_care_profiles()
                    .await
                    .map(|()| self.store.care_profiles().to_vec());
                let _ = reply.send(result);
            }
            Command::AddCareProfile(profile, reply) => {
                let result = self.store.add_care_profile(profile).await;
                if let Err(e) = &result {
                    error!(error = %e, "failed to add care profile");
                }
                let _ = reply.send(result);
            }
        }
    }

    fn snapshot(&self) -> Vec<Plant> {
        self.store.plants().to_vec()
    }

    async fn finish(&mut self, operation: &str, result: Result<()>) -> Result<Vec<Plant>> {
        match result {
            Ok(()) => {
                self.after_change().await;
                Ok(self.snapshot())
            }
            Err(e) => {
                error!(operation, error = %e, "plant operation failed");
                Err(e)
            }
        }
    }

    /// Recompute reminders when the plants or the reminder time changed
    async fn after_change(&mut self) {
        let current = (self.snapshot(), self.scheduler.notification_time());
        if self.scheduled_for.as_ref() == Some(&current) {
            return;
        }

        match self.scheduler.reschedule(&current.0).await {
            Ok(count) => {
                debug!(count, "reminders updated");
                self.scheduled_for = Some(current);
            }
            Err(e) => error!(error = %e, "failed to reschedule reminders"),
        }
    }
}

/// Cloneable front-end of a running [`PlantService`]
#[derive(Debug, Clone)]
pub struct ServiceHandle {
    tx: mpsc::Sender<Command>,
}

impl ServiceHandle {
    async fn request<T>(&self, make: impl FnOnce(Reply<T>) -> Command) -> Result<T> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(make(reply))
            .await
            .map_err(|_| Error::ServiceClosed)?;
        rx.await.map_err(|_| Error::ServiceClosed)
    }

    pub async fn authenticated(&self) -> Result<Vec<Plant>> {
        self.request(Command::Authenticated).await
    }

    pub async fn load_plants(&self) -> Result<Vec<Plant>> {
        self.request(Command::LoadPlants).await
    }

    pub async fn plants(&self) -> Result<Vec<Plant>> {
        self.request(Command::Plants).await
    }

    pub async fn add_plant(&self, plant: NewPlant) -> Result<Vec<Plant>> {
        self.request(|reply| Command::AddPlant(plant, reply)).await?
    }

    pub async fn delete_plant(&self, id: i64) -> Result<Vec<Plant>> {
        self.request(|reply| Command::DeletePlant(id, reply)).await?
    }

    pub async fn mark_as_watered(&self, id: i64) -> Result<Vec<Plant>> {
        self.request(|reply| Command::MarkWatered(id, reply)).await?
    }

    pub async fn set_next_watering(&self, id: i64, days: u32) -> Result<Vec<Plant>> {
        self.request(|reply| Command::SetNextWatering { id, days, reply })
            .await?
    }

    pub async fn set_watering_frequency(&self, id: i64, frequency: u32) -> Result<Vec<Plant>> {
        self.request(|reply| Command::SetWateringFrequency {
            id,
            frequency,
            reply,
        })
        .await?
    }

    pub async fn notification_time(&self) -> Result<NotificationTime> {
        self.request(Command::NotificationTime).await
    }

    pub async fn set_notification_time(&self, time: NotificationTime) -> Result<()> {
        self.request(|reply| Command::SetNotificationTime(time, reply))
            .await?
    }

    pub async fn notification_response(
        &self,
        response: NotificationResponse,
    ) -> Result<Vec<Plant>> {
        self.request(|reply| Command::NotificationResponse(response, reply))
            .await?
    }

    pub async fn care_profiles(&self) -> Result<Vec<CareProfile>> {
        self.request(Command::CareProfiles).await?
    }

    pub async fn add_care_profile(&self, profile: NewCareProfile) -> Result<CareProfile> {
        self.request(|reply| Command::AddCareProfile(profile, reply))
            .await?
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::sync::Arc;

    use super::*;
    use crate::notifications::{NotificationPlatform, ACTION_WATERED};
    use crate::storage::MemoryStore;
    use crate::testing::{at, fixed_clock, plant, FakeApi, FakePlatform};

    fn start(api: FakeApi, platform: Arc<FakePlatform>) -> (ServiceHandle, JoinHandle<()>) {
        let storage = Arc::new(MemoryStore::new());
        let clock = Arc::new(fixed_clock(2024, 5, 20, 9, 0));
        let store = PlantStore::new(Arc::new(api), storage.clone(), clock.clone());
        let scheduler = NotificationScheduler::new(platform, storage, clock);
        PlantService::spawn(store, scheduler)
    }

    #[tokio::test]
    async fn test_authenticated_loads_and_schedules() {
        let platform = Arc::new(FakePlatform::granted());
        let (handle, _join) = start(
            FakeApi::with_plants(vec![plant(1, "Fern", 2), plant(2, "Ivy", 2)]),
            platform.clone(),
        );

        let plants = handle.authenticated().await.unwrap();

        assert_eq!(plants.len(), 2);
        let pending = platform.list_scheduled().await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].request.trigger, at(2024, 5, 22, 18, 0));
    }

    #[tokio::test]
    async fn test_local_edit_reschedules() {
        let platform = Arc::new(FakePlatform::granted());
        let (handle, _join) = start(FakeApi::with_plants(vec![plant(1, "Fern", 7)]), platform.clone());
        handle.load_plants().await.unwrap();

        handle.set_next_watering(1, 0).await.unwrap();

        let pending = platform.list_scheduled().await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].request.trigger, at(2024, 5, 20, 18, 0));
    }

    #[tokio::test]
    async fn test_watered_response_goes_through_queue() {
        let platform = Arc::new(FakePlatform::granted());
        let (handle, _join) = start(
            FakeApi::with_plants(vec![plant(1, "Fern", 3), plant(2, "Ivy", 7)]),
            platform.clone(),
        );
        handle.load_plants().await.unwrap();
        handle.set_next_watering(1, 0).await.unwrap();
        handle.set_next_watering(2, 0).await.unwrap();
        let delivered = platform.list_scheduled().await.unwrap().remove(0);

        let plants = handle
            .notification_response(NotificationResponse {
                handle: delivered.handle.clone(),
                action_id: ACTION_WATERED.to_string(),
                plant_ids: delivered.request.plant_ids.clone(),
            })
            .await
            .unwrap();

        let next: Vec<_> = plants.iter().map(|p| p.next_watering).collect();
        assert_eq!(next, vec![Some(3), Some(7)]);
        assert_eq!(platform.dismissed(), vec![delivered.handle]);
        assert_eq!(platform.list_scheduled().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_edits_apply_in_order() {
        let (handle, _join) = start(
            FakeApi::with_plants(vec![plant(1, "Fern", 7)]),
            Arc::new(FakePlatform::granted()),
        );
        handle.load_plants().await.unwrap();

        let (a, b, c) = tokio::join!(
            handle.set_next_watering(1, 4),
            handle.set_watering_frequency(1, 2),
            handle.set_next_watering(1, 1),
        );
        a.unwrap();
        b.unwrap();
        c.unwrap();

        let plants = handle.plants().await.unwrap();
        assert_eq!(plants[0].next_watering, Some(1));
        assert_eq!(plants[0].watering_frequency, Some(2));
    }

    #[tokio::test]
    async fn test_failed_mutation_reports_and_keeps_state() {
        let (handle, _join) = start(FakeApi::failing(), Arc::new(FakePlatform::granted()));

        let result = handle
            .add_plant(NewPlant {
                name: Some("Basil".to_string()),
                care_profile_id: None,
            })
            .await;

        assert!(matches!(result, Err(Error::Api(_))));
        assert!(handle.plants().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_notification_time_change_reschedules() {
        let platform = Arc::new(FakePlatform::granted());
        let (handle, _join) = start(FakeApi::with_plants(vec![plant(1, "Fern", 7)]), platform.clone());
        handle.load_plants().await.unwrap();
        handle.set_next_watering(1, 0).await.unwrap();

        handle
            .set_notification_time(NotificationTime::new(8, 30).unwrap())
            .await
            .unwrap();

        let pending = platform.list_scheduled().await.unwrap();
        assert_eq!(pending.len(), 1);
        // 08:30 has already passed at 09:00, so the reminder moves to tomorrow
        assert_eq!(pending[0].request.trigger, at(2024, 5, 21, 8, 30));
        assert_eq!(
            handle.notification_time().await.unwrap(),
            NotificationTime::new(8, 30).unwrap()
        );
    }
}
