use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use crate::domain::models::event::Event;

pub const REGISTRATION_STATUS_CONFIRMED: &str = "confirmed";

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Registration {
    pub id: String,
    pub event_id: String,
    pub user_id: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl Registration {
    pub fn new(event_id: String, user_id: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            event_id,
            user_id,
            status: REGISTRATION_STATUS_CONFIRMED.to_string(),
            created_at: Utc::now(),
        }
    }
}

/// A registration row inner-joined with its event.
#[derive(Debug, Serialize, FromRow, Clone)]
pub struct RegisteredEvent {
    pub registration_id: String,
    pub registration_status: String,
    pub registered_at: DateTime<Utc>,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub event: Event,
}
