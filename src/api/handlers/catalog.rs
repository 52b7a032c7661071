use axum::{extract::{Query, State}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::{requests::CatalogQuery, responses::CatalogResponse};
use crate::error::AppError;
use chrono::Utc;
use std::sync::Arc;

pub async fn list_events(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CatalogQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (filters, page) = query.into_parts();
    let page = state.catalog().browse(filters, page, Utc::now()).await?;

    Ok(Json(CatalogResponse {
        events: page.items,
        page: page.page,
        page_size: page.page_size,
        total_items: page.total_items,
        total_pages: page.total_pages,
    }))
}
