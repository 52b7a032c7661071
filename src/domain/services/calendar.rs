use chrono::Duration;
use icalendar::{Calendar, Component, Event as IcalEvent, EventLike};

use crate::domain::models::{event::Event, registration::Registration};

const GOOGLE_CALENDAR_URL: &str = "https://www.google.com/calendar/render";
const DEFAULT_EVENT_LENGTH_HOURS: i64 = 2;
const COMPACT_UTC_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// "Add to Google Calendar" template link. Events carry no end time so a fixed
/// two hour window is assumed.
pub fn google_calendar_url(event: &Event) -> String {
    let start = event.date;
    let end = start + Duration::hours(DEFAULT_EVENT_LENGTH_HOURS);
    let details = format!("{}\nLocation: {}", event.description, event.location);

    format!(
        "{}?action=TEMPLATE&text={}&dates={}/{}&details={}&location={}",
        GOOGLE_CALENDAR_URL,
        urlencoding::encode(&event.name),
        start.format(COMPACT_UTC_FORMAT),
        end.format(COMPACT_UTC_FORMAT),
        urlencoding::encode(&details),
        urlencoding::encode(&event.location),
    )
}

/// Generates an iCalendar (.ics) string for a confirmed registration
pub fn generate_ics(event: &Event, registration: &Registration) -> String {
    let mut calendar = Calendar::new();

    let ical_event = IcalEvent::new()
        .summary(&event.name)
        .description(&event.description)
        .location(&event.location)
        .starts(event.date)
        .ends(event.date + Duration::hours(DEFAULT_EVENT_LENGTH_HOURS))
        .uid(&registration.id)
        .done();

    calendar.push(ical_event);
    calendar.to_string()
}
