use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

pub const EVENT_STATUS_ACTIVE: &str = "active";
pub const EVENT_STATUS_CANCELLED: &str = "cancelled";

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct Event {
    pub id: String,
    pub name: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub price: Option<f64>,
    pub image_url: String,
    pub category: Option<String>,
    pub max_attendees: Option<i32>,
    pub current_attendees: i32,
    pub status: String,
    pub organizer_id: String,
    pub created_at: DateTime<Utc>,
}

pub struct NewEventParams {
    pub organizer_id: String,
    pub name: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub price: Option<f64>,
    pub image_url: String,
    pub category: Option<String>,
    pub max_attendees: Option<i32>,
    pub status: String,
}

impl Event {
    pub fn new(params: NewEventParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: params.name,
            description: params.description,
            date: params.date,
            location: params.location,
            price: params.price,
            image_url: params.image_url,
            category: params.category,
            max_attendees: params.max_attendees,
            current_attendees: 0,
            status: params.status,
            organizer_id: params.organizer_id,
            created_at: Utc::now(),
        }
    }

    /// An event without `max_attendees` has no ceiling.
    pub fn is_full(&self) -> bool {
        self.max_attendees
            .is_some_and(|max| self.current_attendees >= max)
    }
}
