use axum::{extract::{Path, Query, State}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::{ConfirmQuery, DashboardQuery};
use crate::error::AppError;
use chrono::Utc;
use std::sync::Arc;

pub async fn list_registrations(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Query(query): Query<DashboardQuery>,
) -> Result<impl IntoResponse, AppError> {
    let rows = state.dashboard().list(&user.id, query.filter, Utc::now()).await?;
    Ok(Json(rows))
}

pub async fn cancel_registration(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(registration_id): Path<String>,
    Query(query): Query<ConfirmQuery>,
) -> Result<impl IntoResponse, AppError> {
    if !query.confirm {
        return Err(AppError::Validation("Cancellation must be confirmed".into()));
    }

    let rows = state.dashboard().cancel(&user.id, &registration_id, Utc::now()).await?;
    Ok(Json(rows))
}
