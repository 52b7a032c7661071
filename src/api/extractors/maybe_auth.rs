use axum::{
    extract::{FromRequestParts, FromRef},
    http::{request::Parts, StatusCode},
};
use crate::state::AppState;
use crate::domain::models::auth::Identity;
use crate::api::extractors::auth::identity_from_claims;
use std::sync::Arc;
use tower_cookies::Cookies;
use tracing::{debug, Span};

/// Like [`super::auth::AuthUser`] but a missing or invalid token means "guest".
pub struct MaybeAuthUser(pub Option<Identity>);

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);

        let Some(cookies) = parts.extensions.get::<Cookies>() else {
            return Ok(MaybeAuthUser(None));
        };

        let access_token = match cookies.get("access_token") {
            Some(cookie) => cookie.value().to_string(),
            None => return Ok(MaybeAuthUser(None)),
        };

        let claims = match app_state.auth_service.verify_access_token(&access_token) {
            Ok(claims) => claims,
            Err(_) => {
                // Expired or bad signature
                debug!("MaybeAuth: token rejected, continuing as guest");
                return Ok(MaybeAuthUser(None));
            }
        };

        let identity = identity_from_claims(claims);
        Span::current().record("user_id", &identity.id);

        Ok(MaybeAuthUser(Some(identity)))
    }
}
