use serde::Deserialize;

use crate::domain::services::{
    catalog::{DateRange, EventFilters, PriceRange},
    dashboard::DashboardFilter,
    management::{parse_event_date, EventChanges, EventDraft},
};
use crate::error::AppError;

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct CatalogQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub date_range: DateRange,
    pub price_range: PriceRange,
    pub location: Option<String>,
    pub page: Option<usize>,
}

impl CatalogQuery {
    pub fn into_parts(self) -> (EventFilters, usize) {
        let filters = EventFilters {
            search: self.search,
            category: self.category,
            date_range: self.date_range,
            price_range: self.price_range,
            location: self.location,
        };
        (filters, self.page.unwrap_or(1))
    }
}

#[derive(Deserialize)]
pub struct DashboardQuery {
    #[serde(default)]
    pub filter: DashboardFilter,
}

#[derive(Deserialize)]
pub struct ConfirmQuery {
    #[serde(default)]
    pub confirm: bool,
}

/// A numeric form field as browsers send it: a JSON number or the raw input text.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum FormNumber {
    Number(f64),
    Text(String),
}

impl FormNumber {
    /// Empty text is "no value", never zero.
    pub fn parse(self, field: &str) -> Result<Option<f64>, AppError> {
        match self {
            FormNumber::Number(n) => Ok(Some(n)),
            FormNumber::Text(text) if text.trim().is_empty() => Ok(None),
            FormNumber::Text(text) => text.trim().parse::<f64>()
                .map(Some)
                .map_err(|_| AppError::Validation(format!("{} must be a number", field))),
        }
    }

    pub fn parse_whole(self, field: &str) -> Result<Option<i32>, AppError> {
        match self.parse(field)? {
            None => Ok(None),
            Some(n) if n.fract() == 0.0 && n >= i32::MIN as f64 && n <= i32::MAX as f64 => Ok(Some(n as i32)),
            Some(_) => Err(AppError::Validation(format!("{} must be a whole number", field))),
        }
    }
}

fn optional_number(value: Option<FormNumber>, field: &str) -> Result<Option<f64>, AppError> {
    Ok(value.map(|v| v.parse(field)).transpose()?.flatten())
}

fn optional_whole(value: Option<FormNumber>, field: &str) -> Result<Option<i32>, AppError> {
    Ok(value.map(|v| v.parse_whole(field)).transpose()?.flatten())
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct CreateEventRequest {
    pub name: String,
    pub description: String,
    pub date: String,
    pub location: String,
    pub price: Option<FormNumber>,
    pub image_url: String,
    pub category: Option<String>,
    pub max_attendees: Option<FormNumber>,
    pub status: Option<String>,
}

impl CreateEventRequest {
    pub fn into_draft(self) -> Result<EventDraft, AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("Event name is required".into()));
        }

        Ok(EventDraft {
            date: Some(parse_event_date(&self.date)?),
            price: optional_number(self.price, "price")?,
            max_attendees: optional_whole(self.max_attendees, "max_attendees")?,
            name: self.name,
            description: self.description,
            location: self.location,
            image_url: self.image_url,
            category: self.category,
            status: self.status,
        })
    }
}

/// Absent fields stay unchanged. An empty string clears `price`,
/// `max_attendees` and `category`.
#[derive(Deserialize, Default)]
#[serde(default)]
pub struct UpdateEventRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub location: Option<String>,
    pub price: Option<FormNumber>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub max_attendees: Option<FormNumber>,
    pub status: Option<String>,
}

impl UpdateEventRequest {
    pub fn into_changes(self) -> Result<EventChanges, AppError> {
        Ok(EventChanges {
            date: self.date.as_deref().map(parse_event_date).transpose()?,
            price: self.price.map(|p| p.parse("price")).transpose()?,
            max_attendees: self.max_attendees.map(|m| m.parse_whole("max_attendees")).transpose()?,
            category: self.category.map(Some),
            name: self.name,
            description: self.description,
            location: self.location,
            image_url: self.image_url,
            status: self.status,
        })
    }
}
