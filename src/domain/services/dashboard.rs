use std::sync::Arc;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;

use crate::config::CapacityPolicy;
use crate::domain::models::registration::RegisteredEvent;
use crate::domain::ports::{EventRepository, RegistrationRepository};
use crate::error::AppError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DashboardFilter {
    #[default]
    All,
    Upcoming,
    Past,
}

impl DashboardFilter {
    pub fn matches(self, date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self {
            DashboardFilter::All => true,
            DashboardFilter::Upcoming => date >= now,
            DashboardFilter::Past => date < now,
        }
    }
}

/// Filters and orders a user's joined registrations.
pub fn select(mut registrations: Vec<RegisteredEvent>, filter: DashboardFilter, now: DateTime<Utc>) -> Vec<RegisteredEvent> {
    registrations.retain(|r| filter.matches(r.event.date, now));
    registrations.sort_by_key(|r| r.event.date);
    registrations
}

pub struct DashboardService {
    events: Arc<dyn EventRepository>,
    registrations: Arc<dyn RegistrationRepository>,
    policy: CapacityPolicy,
}

impl DashboardService {
    pub fn new(events: Arc<dyn EventRepository>, registrations: Arc<dyn RegistrationRepository>, policy: CapacityPolicy) -> Self {
        Self { events, registrations, policy }
    }

    pub async fn list(&self, user_id: &str, filter: DashboardFilter, now: DateTime<Utc>) -> Result<Vec<RegisteredEvent>, AppError> {
        let rows = self.registrations.list_by_user_with_events(user_id).await?;
        Ok(select(rows, filter, now))
    }

    /// Removes one of the caller's registrations and returns the refetched list.
    /// A registration owned by somebody else is reported as missing.
    pub async fn cancel(&self, user_id: &str, registration_id: &str, now: DateTime<Utc>) -> Result<Vec<RegisteredEvent>, AppError> {
        let registration = self.registrations.find_by_id(registration_id).await?
            .filter(|r| r.user_id == user_id)
            .ok_or(AppError::NotFound("Registration not found".into()))?;

        self.registrations.delete(&registration.id).await?;
        if self.policy.decrement_on_unregister {
            self.events.decrement_attendees(&registration.event_id).await?;
        }
        info!(registration_id = %registration.id, user_id = %user_id, "Registration cancelled from dashboard");

        self.list(user_id, DashboardFilter::All, now).await
    }
}
