use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

pub const ROLE_USER: &str = "user";
pub const ROLE_STAFF: &str = "staff";

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Profile {
    pub id: String,
    pub full_name: String,
    pub avatar_url: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn new(id: String, full_name: String, avatar_url: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            full_name,
            avatar_url,
            role: ROLE_USER.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_staff(&self) -> bool {
        self.role == ROLE_STAFF
    }
}
