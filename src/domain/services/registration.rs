use std::sync::Arc;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::CapacityPolicy;
use crate::domain::models::{
    auth::Identity,
    event::Event,
    registration::{Registration, REGISTRATION_STATUS_CONFIRMED},
};
use crate::domain::ports::{EventRepository, RegistrationRepository};
use crate::domain::services::calendar::google_calendar_url;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationState {
    Registered,
    Unregistered,
}

#[derive(Debug, Serialize)]
pub struct EventDetail {
    pub event: Event,
    /// `None` for guests.
    pub registration_status: Option<RegistrationState>,
    pub calendar_url: Option<String>,
}

impl EventDetail {
    fn new(event: Event, registration_status: Option<RegistrationState>) -> Self {
        let calendar_url = (registration_status == Some(RegistrationState::Registered))
            .then(|| google_calendar_url(&event));
        Self { event, registration_status, calendar_url }
    }
}

/// Register / unregister with attendee-count bookkeeping.
///
/// Registration is two writes: insert the row, then bump the counter. When the
/// bump fails the inserted row is deleted again on a best-effort basis.
pub struct RegistrationService {
    events: Arc<dyn EventRepository>,
    registrations: Arc<dyn RegistrationRepository>,
    policy: CapacityPolicy,
}

impl RegistrationService {
    pub fn new(events: Arc<dyn EventRepository>, registrations: Arc<dyn RegistrationRepository>, policy: CapacityPolicy) -> Self {
        Self { events, registrations, policy }
    }

    async fn fetch_event(&self, event_id: &str) -> Result<Event, AppError> {
        self.events.find_by_id(event_id).await?
            .ok_or_else(|| AppError::NotFound(format!("Event '{}' not found", event_id)))
    }

    async fn find_confirmed(&self, event_id: &str, user_id: &str) -> Result<Option<Registration>, AppError> {
        self.registrations
            .find_by_event_and_user(event_id, user_id, REGISTRATION_STATUS_CONFIRMED)
            .await
    }

    pub async fn load(&self, event_id: &str, user: Option<&Identity>) -> Result<EventDetail, AppError> {
        let event = self.fetch_event(event_id).await?;

        let status = match user {
            Some(user) => match self.find_confirmed(event_id, &user.id).await? {
                Some(_) => Some(RegistrationState::Registered),
                None => Some(RegistrationState::Unregistered),
            },
            None => None,
        };

        Ok(EventDetail::new(event, status))
    }

    pub async fn register(&self, event_id: &str, user: &Identity) -> Result<EventDetail, AppError> {
        let event = self.fetch_event(event_id).await?;

        if self.find_confirmed(event_id, &user.id).await?.is_some() {
            return Err(AppError::Conflict("Already registered for this event".into()));
        }

        if self.policy.enforce_capacity && event.is_full() {
            return Err(AppError::Conflict("Event is full".into()));
        }

        let registration = self.registrations
            .create(&Registration::new(event_id.to_string(), user.id.clone()))
            .await
            .map_err(|e| {
                if e.is_unique_violation() {
                    AppError::Conflict("Already registered for this event".into())
                } else {
                    e
                }
            })?;

        match self.events.increment_attendees(event_id, self.policy.enforce_capacity).await {
            Ok(Some(updated)) => {
                info!(
                    event_id = %event_id,
                    user_id = %user.id,
                    current_attendees = updated.current_attendees,
                    "Registration confirmed"
                );
                Ok(EventDetail::new(updated, Some(RegistrationState::Registered)))
            }
            Ok(None) => {
                self.compensate(&registration).await;
                if self.policy.enforce_capacity {
                    Err(AppError::Conflict("Event is full".into()))
                } else {
                    Err(AppError::NotFound(format!("Event '{}' not found", event_id)))
                }
            }
            Err(e) => {
                warn!("Attendee increment failed for event {}: {}", event_id, e);
                self.compensate(&registration).await;
                Err(e)
            }
        }
    }

    /// Fire-and-forget rollback of a registration whose counter update failed.
    async fn compensate(&self, registration: &Registration) {
        if let Err(e) = self.registrations.delete(&registration.id).await {
            warn!(
                registration_id = %registration.id,
                event_id = %registration.event_id,
                "Compensating delete failed, registration left orphaned: {}", e
            );
        }
    }

    pub async fn unregister(&self, event_id: &str, user: &Identity) -> Result<EventDetail, AppError> {
        self.fetch_event(event_id).await?;

        let removed = self.registrations.delete_by_event_and_user(event_id, &user.id).await?;
        if removed > 0 && self.policy.decrement_on_unregister {
            self.events.decrement_attendees(event_id).await?;
        }
        info!(event_id = %event_id, user_id = %user.id, removed, "Registration removed");

        let event = self.fetch_event(event_id).await?;
        Ok(EventDetail::new(event, Some(RegistrationState::Unregistered)))
    }

    /// The event and the caller's confirmed registration, or 404.
    pub async fn registration_for(&self, event_id: &str, user: &Identity) -> Result<(Event, Registration), AppError> {
        let event = self.fetch_event(event_id).await?;
        let registration = self.find_confirmed(event_id, &user.id).await?
            .ok_or(AppError::NotFound("Registration not found".into()))?;
        Ok((event, registration))
    }
}
