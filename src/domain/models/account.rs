use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Credentials held by the local identity provider.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Account {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(email: String, password_hash: String, full_name: Option<String>, avatar_url: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email,
            password_hash,
            full_name,
            avatar_url,
            created_at: Utc::now(),
        }
    }
}
