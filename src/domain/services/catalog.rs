use std::sync::Arc;
use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::models::event::{Event, EVENT_STATUS_ACTIVE};
use crate::domain::ports::EventRepository;
use crate::error::AppError;

pub const PAGE_SIZE: usize = 8;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateRange {
    #[default]
    All,
    Today,
    Week,
    Month,
}

impl DateRange {
    pub fn matches(self, date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self {
            DateRange::All => true,
            DateRange::Today => date.date_naive() == now.date_naive(),
            DateRange::Week => date >= now - Duration::days(7),
            DateRange::Month => {
                let month_ago = now.checked_sub_months(Months::new(1)).unwrap_or(now);
                date >= month_ago
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceRange {
    #[default]
    All,
    Free,
    Paid,
    Under50,
    Under100,
}

impl PriceRange {
    /// Events without a price only pass the `All` bucket.
    pub fn matches(self, price: Option<f64>) -> bool {
        match (self, price) {
            (PriceRange::All, _) => true,
            (_, None) => false,
            (PriceRange::Free, Some(p)) => p == 0.0,
            (PriceRange::Paid, Some(p)) => p > 0.0,
            (PriceRange::Under50, Some(p)) => p < 50.0,
            (PriceRange::Under100, Some(p)) => p < 100.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventFilters {
    pub search: Option<String>,
    pub category: Option<String>,
    pub date_range: DateRange,
    pub price_range: PriceRange,
    pub location: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Applies search, category, date, price and location filters, in that order.
pub fn apply_filters(events: &[Event], filters: &EventFilters, now: DateTime<Utc>) -> Vec<Event> {
    let search = non_empty(&filters.search).map(str::to_lowercase);
    let category = non_empty(&filters.category);
    let location = non_empty(&filters.location).map(str::to_lowercase);

    events.iter()
        .filter(|e| match &search {
            Some(term) => contains_ci(&e.name, term)
                || contains_ci(&e.description, term)
                || contains_ci(&e.location, term),
            None => true,
        })
        .filter(|e| match category {
            Some(cat) => e.category.as_deref() == Some(cat),
            None => true,
        })
        .filter(|e| filters.date_range.matches(e.date, now))
        .filter(|e| filters.price_range.matches(e.price))
        .filter(|e| match &location {
            Some(loc) => contains_ci(&e.location, loc),
            None => true,
        })
        .cloned()
        .collect()
}

#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    total_items.div_ceil(page_size)
}

/// One-based page slice; pages past the end are empty.
pub fn page_slice<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let start = page.saturating_sub(1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = (start + page_size).min(items.len());
    &items[start..end]
}

/// The browsing state over an already loaded set of active events.
///
/// Changing filters recomputes the visible subset and goes back to page 1;
/// moving between pages never touches the store.
pub struct CatalogView {
    events: Vec<Event>,
    filters: EventFilters,
    filtered: Vec<Event>,
    current_page: usize,
    now: DateTime<Utc>,
}

impl CatalogView {
    pub fn new(events: Vec<Event>, now: DateTime<Utc>) -> Self {
        let filtered = events.clone();
        Self { events, filters: EventFilters::default(), filtered, current_page: 1, now }
    }

    pub fn set_filters(&mut self, filters: EventFilters) {
        self.filters = filters;
        self.recompute();
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.filters.search = Some(term.into());
        self.recompute();
    }

    fn recompute(&mut self) {
        self.filtered = apply_filters(&self.events, &self.filters, self.now);
        self.current_page = 1;
    }

    /// Moves to `page`, clamped into the valid range. Returns the page shown.
    pub fn go_to_page(&mut self, page: usize) -> usize {
        let last = self.total_pages().max(1);
        self.current_page = page.clamp(1, last);
        self.current_page
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.filtered.len(), PAGE_SIZE)
    }

    pub fn page_items(&self) -> &[Event] {
        page_slice(&self.filtered, self.current_page, PAGE_SIZE)
    }

    pub fn page(&self) -> Page<Event> {
        Page {
            items: self.page_items().to_vec(),
            page: self.current_page,
            page_size: PAGE_SIZE,
            total_items: self.filtered.len(),
            total_pages: self.total_pages(),
        }
    }
}

pub struct CatalogService {
    events: Arc<dyn EventRepository>,
}

impl CatalogService {
    pub fn new(events: Arc<dyn EventRepository>) -> Self {
        Self { events }
    }

    pub async fn load(&self, now: DateTime<Utc>) -> Result<CatalogView, AppError> {
        let events = self.events.list_by_status(EVENT_STATUS_ACTIVE).await?;
        debug!("Catalog loaded {} active events", events.len());
        Ok(CatalogView::new(events, now))
    }

    pub async fn browse(&self, filters: EventFilters, page: usize, now: DateTime<Utc>) -> Result<Page<Event>, AppError> {
        let mut view = self.load(now).await?;
        view.set_filters(filters);
        view.go_to_page(page);
        Ok(view.page())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use crate::domain::models::event::NewEventParams;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn event(name: &str, location: &str, days: i64, price: Option<f64>, category: Option<&str>) -> Event {
        Event::new(NewEventParams {
            organizer_id: "org-1".into(),
            name: name.into(),
            description: format!("{} description", name),
            date: now() + Duration::days(days),
            location: location.into(),
            price,
            image_url: String::new(),
            category: category.map(Into::into),
            max_attendees: Some(50),
            status: EVENT_STATUS_ACTIVE.into(),
        })
    }

    fn fixture() -> Vec<Event> {
        let locations = ["London", "Leeds", "Manchester", "Online"];
        let categories = [Some("music"), Some("tech"), None];
        let prices = [Some(0.0), Some(25.0), Some(75.0), Some(150.0), None];
        (0..23)
            .map(|i| {
                event(
                    &format!("Event {}", i),
                    locations[i % locations.len()],
                    i as i64 * 3 - 20,
                    prices[i % prices.len()],
                    categories[i % categories.len()],
                )
            })
            .collect()
    }

    fn all_filter_combinations() -> Vec<EventFilters> {
        let mut combos = Vec::new();
        for search in [None, Some("event 1".to_string()), Some("zzz".to_string())] {
            for category in [None, Some("music".to_string())] {
                for date_range in [DateRange::All, DateRange::Today, DateRange::Week, DateRange::Month] {
                    for price_range in [PriceRange::All, PriceRange::Free, PriceRange::Paid, PriceRange::Under50, PriceRange::Under100] {
                        for location in [None, Some("lee".to_string())] {
                            combos.push(EventFilters {
                                search: search.clone(),
                                category: category.clone(),
                                date_range,
                                price_range,
                                location: location.clone(),
                            });
                        }
                    }
                }
            }
        }
        combos
    }

    #[test]
    fn test_pages_partition_filtered_set() {
        let mut view = CatalogView::new(fixture(), now());

        for filters in all_filter_combinations() {
            view.set_filters(filters.clone());
            let expected = apply_filters(&view.events, &filters, now());

            let mut union = Vec::new();
            for page in 1..=view.total_pages().max(1) {
                view.go_to_page(page);
                let items = view.page_items();
                assert!(items.len() <= PAGE_SIZE, "page {} too large for {:?}", page, filters);
                union.extend(items.iter().map(|e| e.id.clone()));
            }

            let expected_ids: Vec<String> = expected.iter().map(|e| e.id.clone()).collect();
            assert_eq!(union, expected_ids, "pages do not cover filtered set for {:?}", filters);
        }
    }

    #[test]
    fn test_changing_filters_resets_page() {
        let mut view = CatalogView::new(fixture(), now());
        assert_eq!(view.total_pages(), 3);
        assert_eq!(view.go_to_page(3), 3);

        view.set_filters(EventFilters { price_range: PriceRange::Paid, ..Default::default() });
        assert_eq!(view.current_page(), 1);

        view.go_to_page(2);
        view.set_search("event");
        assert_eq!(view.current_page(), 1);
    }

    #[test]
    fn test_go_to_page_clamps() {
        let mut view = CatalogView::new(fixture(), now());
        assert_eq!(view.go_to_page(0), 1);
        assert_eq!(view.go_to_page(99), 3);

        view.set_search("nothing matches this");
        assert_eq!(view.go_to_page(5), 1);
        assert!(view.page_items().is_empty());
        assert_eq!(view.total_pages(), 0);
    }

    #[test]
    fn test_search_is_case_insensitive_over_name_description_location() {
        let events = vec![
            event("Rust Meetup", "Berlin", 1, Some(0.0), None),
            event("Pottery", "Leeds", 1, Some(10.0), None),
            event("Yoga", "Online", 1, Some(10.0), None),
        ];
        let by_name = apply_filters(&events, &EventFilters { search: Some("RUST".into()), ..Default::default() }, now());
        assert_eq!(by_name.len(), 1);

        let by_location = apply_filters(&events, &EventFilters { search: Some("leeds".into()), ..Default::default() }, now());
        assert_eq!(by_location[0].name, "Pottery");

        let by_description = apply_filters(&events, &EventFilters { search: Some("yoga desc".into()), ..Default::default() }, now());
        assert_eq!(by_description[0].name, "Yoga");

        let empty = apply_filters(&events, &EventFilters { search: Some(String::new()), ..Default::default() }, now());
        assert_eq!(empty.len(), 3);

        // Whitespace is a real term, not a cleared box
        let blank = apply_filters(&events, &EventFilters { search: Some("   ".into()), ..Default::default() }, now());
        assert!(blank.is_empty());
    }

    #[test]
    fn test_price_buckets() {
        assert!(PriceRange::Free.matches(Some(0.0)));
        assert!(!PriceRange::Free.matches(Some(0.5)));
        assert!(PriceRange::Paid.matches(Some(0.5)));
        assert!(PriceRange::Under50.matches(Some(0.0)));
        assert!(!PriceRange::Under50.matches(Some(50.0)));
        assert!(PriceRange::Under100.matches(Some(99.99)));
        assert!(!PriceRange::Paid.matches(None));
        assert!(PriceRange::All.matches(None));
    }

    #[test]
    fn test_date_buckets() {
        let n = now();
        assert!(DateRange::Today.matches(n + Duration::hours(3), n));
        assert!(!DateRange::Today.matches(n + Duration::days(1), n));
        assert!(DateRange::Week.matches(n - Duration::days(6), n));
        assert!(!DateRange::Week.matches(n - Duration::days(8), n));
        assert!(DateRange::Month.matches(n - Duration::days(20), n));
        assert!(!DateRange::Month.matches(n - Duration::days(40), n));
    }

    #[test]
    fn test_category_is_exact_match() {
        let events = vec![
            event("A", "X", 1, None, Some("music")),
            event("B", "X", 1, None, Some("musical")),
            event("C", "X", 1, None, None),
        ];
        let out = apply_filters(&events, &EventFilters { category: Some("music".into()), ..Default::default() }, now());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "A");
    }

    #[test]
    fn test_filter_deserializes_from_query_names() {
        let filters: EventFilters = serde_json::from_value(serde_json::json!({
            "date_range": "week",
            "price_range": "under50"
        })).unwrap();
        assert_eq!(filters.date_range, DateRange::Week);
        assert_eq!(filters.price_range, PriceRange::Under50);
    }
}
