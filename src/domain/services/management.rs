use std::sync::Arc;
use chrono::{DateTime, NaiveDate, Utc};
use tracing::info;

use crate::domain::models::event::{Event, NewEventParams, EVENT_STATUS_ACTIVE, EVENT_STATUS_CANCELLED};
use crate::domain::models::registration::REGISTRATION_STATUS_CONFIRMED;
use crate::domain::ports::{EventRepository, RegistrationRepository};
use crate::error::AppError;

/// A parsed creation form. Optional numbers are `None` when the form field was left empty.
#[derive(Debug, Clone, Default)]
pub struct EventDraft {
    pub name: String,
    pub description: String,
    pub date: Option<DateTime<Utc>>,
    pub location: String,
    pub price: Option<f64>,
    pub image_url: String,
    pub category: Option<String>,
    pub max_attendees: Option<i32>,
    pub status: Option<String>,
}

/// A partial edit. The outer `Option` is "leave unchanged", the inner one clears nullable columns.
#[derive(Debug, Clone, Default)]
pub struct EventChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub price: Option<Option<f64>>,
    pub image_url: Option<String>,
    pub category: Option<Option<String>>,
    pub max_attendees: Option<Option<i32>>,
    pub status: Option<String>,
}

/// Accepts a plain calendar date (midnight UTC) or a full RFC 3339 timestamp.
pub fn parse_event_date(raw: &str) -> Result<DateTime<Utc>, AppError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AppError::Validation("Event date is required".into()));
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| AppError::Validation(format!("Invalid event date: {}", raw)))
}

fn validate(event: &Event) -> Result<(), AppError> {
    if event.name.trim().is_empty() {
        return Err(AppError::Validation("Event name is required".into()));
    }
    if let Some(price) = event.price
        && (!price.is_finite() || price < 0.0) {
        return Err(AppError::Validation("Price must be zero or more".into()));
    }
    if let Some(max) = event.max_attendees
        && max < 1 {
        return Err(AppError::Validation("Max attendees must be at least 1".into()));
    }
    if event.status != EVENT_STATUS_ACTIVE && event.status != EVENT_STATUS_CANCELLED {
        return Err(AppError::Validation(format!("Unknown event status: {}", event.status)));
    }
    Ok(())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

pub struct ManagementService {
    events: Arc<dyn EventRepository>,
    registrations: Arc<dyn RegistrationRepository>,
}

impl ManagementService {
    pub fn new(events: Arc<dyn EventRepository>, registrations: Arc<dyn RegistrationRepository>) -> Self {
        Self { events, registrations }
    }

    async fn owned(&self, organizer_id: &str, event_id: &str) -> Result<Event, AppError> {
        let event = self.events.find_by_id(event_id).await?
            .ok_or_else(|| AppError::NotFound(format!("Event '{}' not found", event_id)))?;

        if event.organizer_id != organizer_id {
            return Err(AppError::Forbidden("Event belongs to another organizer".into()));
        }
        Ok(event)
    }

    pub async fn list_owned(&self, organizer_id: &str) -> Result<Vec<Event>, AppError> {
        self.events.list_by_organizer(organizer_id).await
    }

    pub async fn create(&self, organizer_id: &str, draft: EventDraft) -> Result<Event, AppError> {
        let date = draft.date
            .ok_or(AppError::Validation("Event date is required".into()))?;

        let event = Event::new(NewEventParams {
            organizer_id: organizer_id.to_string(),
            name: draft.name.trim().to_string(),
            description: draft.description,
            date,
            location: draft.location,
            price: draft.price,
            image_url: draft.image_url,
            category: non_empty(draft.category),
            max_attendees: draft.max_attendees,
            status: non_empty(draft.status).unwrap_or_else(|| EVENT_STATUS_ACTIVE.to_string()),
        });
        validate(&event)?;

        let created = self.events.create(&event).await?;
        info!(event_id = %created.id, organizer_id = %organizer_id, "Event created");
        Ok(created)
    }

    pub async fn update(&self, organizer_id: &str, event_id: &str, changes: EventChanges) -> Result<Event, AppError> {
        let mut event = self.owned(organizer_id, event_id).await?;

        if let Some(name) = changes.name { event.name = name.trim().to_string(); }
        if let Some(description) = changes.description { event.description = description; }
        if let Some(date) = changes.date { event.date = date; }
        if let Some(location) = changes.location { event.location = location; }
        if let Some(price) = changes.price { event.price = price; }
        if let Some(image_url) = changes.image_url { event.image_url = image_url; }
        if let Some(category) = changes.category { event.category = non_empty(category); }
        if let Some(max_attendees) = changes.max_attendees { event.max_attendees = max_attendees; }
        if let Some(status) = changes.status { event.status = status; }

        validate(&event)?;
        self.events.update(&event).await
    }

    /// Deletes an owned event (its registrations cascade) and returns the remaining list.
    pub async fn delete(&self, organizer_id: &str, event_id: &str) -> Result<Vec<Event>, AppError> {
        self.owned(organizer_id, event_id).await?;
        self.events.delete(event_id).await?;
        info!(event_id = %event_id, organizer_id = %organizer_id, "Event deleted");

        self.list_owned(organizer_id).await
    }

    /// Resets `current_attendees` to the number of confirmed registrations.
    pub async fn reconcile(&self, organizer_id: &str, event_id: &str) -> Result<Event, AppError> {
        let event = self.owned(organizer_id, event_id).await?;
        let count = self.registrations.count_by_event(event_id, REGISTRATION_STATUS_CONFIRMED).await?;
        let count = i32::try_from(count).map_err(|_| AppError::Internal)?;

        if count != event.current_attendees {
            info!(
                event_id = %event_id,
                before = event.current_attendees,
                after = count,
                "Reconciling attendee count"
            );
        }
        self.events.set_attendees(event_id, count).await
    }
}
