use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use crate::state::AppState;
use crate::api::extractors::{auth::AuthUser, maybe_auth::MaybeAuthUser};
use crate::api::dtos::responses::CalendarLinkResponse;
use crate::domain::services::calendar::{generate_ics, google_calendar_url};
use crate::error::AppError;
use std::sync::Arc;

pub async fn get_event(
    State(state): State<Arc<AppState>>,
    MaybeAuthUser(user): MaybeAuthUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let detail = state.registrations().load(&event_id, user.as_ref()).await?;
    Ok(Json(detail))
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let detail = state.registrations().register(&event_id, &user).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

pub async fn unregister(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let detail = state.registrations().unregister(&event_id, &user).await?;
    Ok(Json(detail))
}

pub async fn calendar_link(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_id(&event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    Ok(Json(CalendarLinkResponse { calendar_url: google_calendar_url(&event) }))
}

pub async fn calendar_ics(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let (event, registration) = state.registrations().registration_for(&event_id, &user).await?;
    let ics = generate_ics(&event, &registration);

    Ok((
        [
            (header::CONTENT_TYPE, "text/calendar; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"event.ics\""),
        ],
        ics,
    ))
}
