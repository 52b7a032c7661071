use axum::{extract::{Path, Query, State}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::staff::StaffUser;
use crate::api::dtos::requests::{ConfirmQuery, CreateEventRequest, UpdateEventRequest};
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn list_events(
    State(state): State<Arc<AppState>>,
    StaffUser(user, _): StaffUser,
) -> Result<impl IntoResponse, AppError> {
    let events = state.management().list_owned(&user.id).await?;
    Ok(Json(events))
}

pub async fn create_event(
    State(state): State<Arc<AppState>>,
    StaffUser(user, _): StaffUser,
    Json(payload): Json<CreateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    let draft = payload.into_draft()?;
    let event = state.management().create(&user.id, draft).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

pub async fn update_event(
    State(state): State<Arc<AppState>>,
    StaffUser(user, _): StaffUser,
    Path(event_id): Path<String>,
    Json(payload): Json<UpdateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    let changes = payload.into_changes()?;
    let event = state.management().update(&user.id, &event_id, changes).await?;

    info!("Event updated: {}", event.id);
    Ok(Json(event))
}

pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    StaffUser(user, _): StaffUser,
    Path(event_id): Path<String>,
    Query(query): Query<ConfirmQuery>,
) -> Result<impl IntoResponse, AppError> {
    if !query.confirm {
        return Err(AppError::Validation("Deletion must be confirmed".into()));
    }

    let remaining = state.management().delete(&user.id, &event_id).await?;
    Ok(Json(remaining))
}

pub async fn reconcile_event(
    State(state): State<Arc<AppState>>,
    StaffUser(user, _): StaffUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.management().reconcile(&user.id, &event_id).await?;
    Ok(Json(event))
}
