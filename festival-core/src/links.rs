//! Outbound links: event pages, Google Calendar templates, map pins.

use url::form_urlencoded;

use crate::event::{Event, non_empty};

const GOOGLE_CALENDAR_TEMPLATE: &str = "https://calendar.google.com/calendar/render";
const GOOGLE_MAPS: &str = "https://www.google.com/maps";

/// Canonical public page for an event.
pub fn event_page_url(base: &str, id: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), id)
}

/// Pre-filled "add to Google Calendar" link.
///
/// Location prefers the venue name, then the address, then the country.
pub fn google_calendar_url(event: &Event) -> String {
    let dates = format!(
        "{}/{}",
        event.start_utc().format("%Y%m%dT%H%M%SZ"),
        event.end_utc().format("%Y%m%dT%H%M%SZ")
    );
    let location = non_empty(event.venue_name.as_deref())
        .or_else(|| non_empty(event.address.as_deref()))
        .or_else(|| non_empty(event.country.as_deref()))
        .unwrap_or("");

    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("action", "TEMPLATE")
        .append_pair("text", &event.title)
        .append_pair("dates", &dates)
        .append_pair("details", event.summary.as_deref().unwrap_or(""))
        .append_pair("location", location)
        .finish();
    format!("{}?{}", GOOGLE_CALENDAR_TEMPLATE, query)
}

/// Google Maps pin for events with coordinates.
pub fn google_maps_url(event: &Event) -> Option<String> {
    let (lat, lng) = event.coordinates()?;
    Some(format!("{}?q={},{}", GOOGLE_MAPS, lat, lng))
}
