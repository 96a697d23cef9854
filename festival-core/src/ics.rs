//! iCalendar (.ics) export.
//!
//! The output is a fixed template that calendar applications consume as-is, so
//! it is written by hand rather than through a generic iCalendar builder:
//! CRLF line endings, no trailing newline, UTC timestamps, and text values with
//! backslash, comma, semicolon and double quote escaped.

use chrono::{DateTime, Utc};

use crate::constants::{DEFAULT_EVENT_URL_BASE, DEFAULT_SITE_DOMAIN, ICS_PRODID};
use crate::event::Event;
use crate::links::event_page_url;

/// Site-specific values baked into each VEVENT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IcsOptions {
    /// Right-hand side of `UID:evt-<id>@<domain>`
    pub domain: String,
    /// `URL:<event_url_base>/<id>`
    pub event_url_base: String,
}

impl Default for IcsOptions {
    fn default() -> Self {
        IcsOptions {
            domain: DEFAULT_SITE_DOMAIN.to_string(),
            event_url_base: DEFAULT_EVENT_URL_BASE.to_string(),
        }
    }
}

const CALENDAR_HEADER: [&str; 5] = [
    "BEGIN:VCALENDAR",
    "VERSION:2.0",
    // PRODID is filled in below
    "",
    "CALSCALE:GREGORIAN",
    "METHOD:PUBLISH",
];

/// Single-event calendar file. `stamp` becomes DTSTAMP.
pub fn build_ics(event: &Event, options: &IcsOptions, stamp: DateTime<Utc>) -> String {
    build_ics_feed(std::slice::from_ref(&event), options, stamp)
}

/// One VCALENDAR with a VEVENT per event, in the given order.
pub fn build_ics_feed(events: &[&Event], options: &IcsOptions, stamp: DateTime<Utc>) -> String {
    let mut lines = calendar_header();
    for event in events {
        lines.extend(vevent_lines(event, options, stamp));
    }
    lines.push("END:VCALENDAR".to_string());
    lines.join("\r\n")
}

/// Download name for a single-event export.
pub fn ics_filename(event: &Event) -> String {
    format!("event-{}.ics", event.id)
}

fn calendar_header() -> Vec<String> {
    CALENDAR_HEADER
        .iter()
        .map(|line| {
            if line.is_empty() {
                format!("PRODID:{}", ICS_PRODID)
            } else {
                line.to_string()
            }
        })
        .collect()
}

fn vevent_lines(event: &Event, options: &IcsOptions, stamp: DateTime<Utc>) -> Vec<String> {
    vec![
        "BEGIN:VEVENT".to_string(),
        format!("UID:evt-{}@{}", event.id, options.domain),
        format!("DTSTAMP:{}", utc_stamp(stamp)),
        format!("DTSTART:{}", utc_stamp(event.start_utc())),
        format!("DTEND:{}", utc_stamp(event.end_utc())),
        format!("SUMMARY:{}", escape_text(&event.title)),
        format!("DESCRIPTION:{}", escape_text(event.summary.as_deref().unwrap_or(""))),
        format!("LOCATION:{}", escape_text(event.location_label())),
        format!("URL:{}", event_page_url(&options.event_url_base, &event.id)),
        "END:VEVENT".to_string(),
    ]
}

/// `YYYYMMDDTHHMMSSZ`, sub-second precision dropped.
fn utc_stamp(instant: DateTime<Utc>) -> String {
    instant.format("%Y%m%dT%H%M%SZ").to_string()
}

fn escape_text(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | ',' | ';' | '"') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
