use axum::{
    extract::{FromRequestParts, FromRef},
    http::{request::Parts, StatusCode},
};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::{auth::Identity, profile::Profile};
use std::sync::Arc;
use tracing::{error, warn};

/// A signed-in caller whose profile carries the staff role.
pub struct StaffUser(pub Identity, pub Profile);

impl<S> FromRequestParts<S> for StaffUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(identity) = AuthUser::from_request_parts(parts, state).await?;
        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);

        let profile = app_state.profile_repo.find_by_id(&identity.id).await
            .map_err(|e| {
                error!("Profile lookup failed: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            })?
            .ok_or(StatusCode::FORBIDDEN)?;

        if !profile.is_staff() {
            warn!(user_id = %identity.id, "Non-staff caller on management route");
            return Err(StatusCode::FORBIDDEN);
        }

        Ok(StaffUser(identity, profile))
    }
}
