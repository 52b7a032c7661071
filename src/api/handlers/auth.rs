use axum::{extract::{Path, State}, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::responses::{ProviderRedirectResponse, SessionResponse};
use crate::domain::models::{
    auth::{AuthResponse, Identity, Session, SignInRequest, SignUpRequest, UserProfile},
    profile::{Profile, ROLE_USER},
};
use crate::domain::services::session::SessionContext;
use std::sync::Arc;
use tower_cookies::{Cookies, Cookie};
use tower_cookies::cookie::SameSite;
use time::Duration;
use tracing::info;

fn cookie_value(cookies: &Cookies, name: &str) -> Option<String> {
    cookies.get(name).map(|c| c.value().to_string())
}

fn user_profile(identity: &Identity, profile: Option<&Profile>) -> UserProfile {
    UserProfile {
        id: identity.id.clone(),
        email: identity.email.clone(),
        full_name: identity.full_name.clone(),
        avatar_url: identity.avatar_url.clone(),
        role: profile.map(|p| p.role.clone()).unwrap_or_else(|| ROLE_USER.to_string()),
    }
}

fn respond(cookies: &Cookies, session: Session, ctx: &SessionContext) -> Json<AuthResponse> {
    set_cookies(cookies, &session.access_token, &session.refresh_token);

    Json(AuthResponse {
        user: user_profile(&session.identity, ctx.profile()),
        csrf_token: session.csrf_token,
    })
}

pub async fn signup(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Json(payload): Json<SignUpRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut ctx = state.session(None, None).await?;
    let session = ctx.sign_up(&payload).await?;

    info!("User signed up: {}", session.identity.id);

    Ok((StatusCode::CREATED, respond(&cookies, session, &ctx)))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Json(payload): Json<SignInRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut ctx = state.session(None, None).await?;
    let session = ctx.sign_in(&payload).await?;

    info!("User logged in: {}", session.identity.id);

    Ok(respond(&cookies, session, &ctx))
}

pub async fn oauth_redirect(
    State(state): State<Arc<AppState>>,
    Path(provider): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let ctx = state.session(None, None).await?;
    let url = ctx.sign_in_with_provider(&provider).await?;

    Ok(Json(ProviderRedirectResponse { url }))
}

pub async fn refresh(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
) -> Result<impl IntoResponse, AppError> {
    let raw_token = cookie_value(&cookies, "refresh_token").ok_or(AppError::Unauthorized)?;

    let mut ctx = state.session(None, Some(raw_token)).await?;
    let session = ctx.refresh().await?;

    info!("Token refreshed for user: {}", session.identity.id);

    Ok(respond(&cookies, session, &ctx))
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
) -> Result<impl IntoResponse, AppError> {
    let refresh_token = cookie_value(&cookies, "refresh_token");

    cookies.remove(Cookie::build(("access_token", "")).path("/").into());
    cookies.remove(Cookie::build(("refresh_token", "")).path("/").into());

    let mut ctx = state.session(None, refresh_token).await?;
    ctx.sign_out().await;
    ctx.teardown();

    Ok(StatusCode::OK)
}

pub async fn current_session(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
) -> Result<impl IntoResponse, AppError> {
    let access_token = cookie_value(&cookies, "access_token");
    let ctx = state.session(access_token.as_deref(), None).await?;

    let user = ctx.current().map(|identity| user_profile(&identity, ctx.profile()));
    Ok(Json(SessionResponse { user }))
}

fn set_cookies(cookies: &Cookies, access: &str, refresh: &str) {
    let mut access_c = Cookie::new("access_token", access.to_string());
    access_c.set_http_only(true);
    access_c.set_secure(true);
    access_c.set_same_site(SameSite::Strict);
    access_c.set_path("/");
    access_c.set_max_age(Duration::minutes(15));
    cookies.add(access_c);

    let mut refresh_c = Cookie::new("refresh_token", refresh.to_string());
    refresh_c.set_http_only(true);
    refresh_c.set_secure(true);
    refresh_c.set_same_site(SameSite::Strict);
    refresh_c.set_path("/");
    refresh_c.set_max_age(Duration::days(7));
    cookies.add(refresh_c);
}
