use serde::Serialize;

use crate::domain::models::event::Event;

#[derive(Serialize)]
pub struct CatalogResponse {
    pub events: Vec<Event>,
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

#[derive(Serialize)]
pub struct CalendarLinkResponse {
    pub calendar_url: String,
}

#[derive(Serialize)]
pub struct ProviderRedirectResponse {
    pub url: String,
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub user: Option<crate::domain::models::auth::UserProfile>,
}
