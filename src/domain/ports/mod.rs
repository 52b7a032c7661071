use crate::domain::models::{
    account::Account, auth::{Identity, RefreshTokenRecord, Session, SignInRequest, SignUpRequest},
    event::Event, profile::Profile, registration::{RegisteredEvent, Registration},
};
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, event: &Event) -> Result<Event, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError>;
    /// Ordered by date ascending.
    async fn list_by_status(&self, status: &str) -> Result<Vec<Event>, AppError>;
    /// Ordered by date ascending.
    async fn list_by_organizer(&self, organizer_id: &str) -> Result<Vec<Event>, AppError>;
    async fn update(&self, event: &Event) -> Result<Event, AppError>;
    /// Adds one attendee in a single update expression. With `respect_capacity`
    /// the row only changes while `current_attendees < max_attendees`.
    /// Returns `None` when no row was updated.
    async fn increment_attendees(&self, id: &str, respect_capacity: bool) -> Result<Option<Event>, AppError>;
    /// Removes one attendee, never going below zero.
    async fn decrement_attendees(&self, id: &str) -> Result<Option<Event>, AppError>;
    async fn set_attendees(&self, id: &str, count: i32) -> Result<Event, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    async fn create(&self, registration: &Registration) -> Result<Registration, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Registration>, AppError>;
    async fn find_by_event_and_user(&self, event_id: &str, user_id: &str, status: &str) -> Result<Option<Registration>, AppError>;
    async fn list_by_user_with_events(&self, user_id: &str) -> Result<Vec<RegisteredEvent>, AppError>;
    async fn count_by_event(&self, event_id: &str, status: &str) -> Result<i64, AppError>;
    /// Returns the number of deleted rows.
    async fn delete_by_event_and_user(&self, event_id: &str, user_id: &str) -> Result<u64, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Inserts the profile or refreshes name and avatar of an existing row.
    /// An existing role is never overwritten.
    async fn upsert(&self, profile: &Profile) -> Result<Profile, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Profile>, AppError>;
    async fn set_role(&self, id: &str, role: &str) -> Result<Profile, AppError>;
}

#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn create(&self, account: &Account) -> Result<Account, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Account>, AppError>;
}

#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn create_refresh_token(&self, record: &RefreshTokenRecord) -> Result<(), AppError>;
    async fn find_refresh_token(&self, token_hash: &str) -> Result<Option<RefreshTokenRecord>, AppError>;
    async fn delete_refresh_token(&self, token_hash: &str) -> Result<(), AppError>;
    async fn delete_refresh_family(&self, family_id: Uuid) -> Result<(), AppError>;
}

/// Source of truth for who a caller is.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolves an access token. Invalid or expired tokens yield `Ok(None)`.
    async fn get_session(&self, access_token: &str) -> Result<Option<Identity>, AppError>;
    async fn sign_up(&self, request: &SignUpRequest) -> Result<Session, AppError>;
    async fn sign_in_with_password(&self, request: &SignInRequest) -> Result<Session, AppError>;
    /// Returns the URL the browser must visit to continue with the provider.
    async fn sign_in_with_provider(&self, provider: &str) -> Result<String, AppError>;
    async fn refresh(&self, refresh_token: &str) -> Result<Session, AppError>;
    async fn sign_out(&self, refresh_token: &str) -> Result<(), AppError>;
}
