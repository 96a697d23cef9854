//! Event records as they arrive from the data source.
//!
//! Field names follow the JSON data files (`start_datetime`, `organizer_name`,
//! `campaign_id`, ...). Optional fields are real `Option`s, and a few fields are
//! deserialized leniently so that one odd record never fails a whole snapshot.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Whether an event happens at a venue, online, or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Modality {
    #[serde(rename = "In-person")]
    InPerson,
    Online,
    Hybrid,
}

impl Modality {
    pub const ALL: [Modality; 3] = [Modality::InPerson, Modality::Online, Modality::Hybrid];

    /// Accepts the display spelling (`In-person`) as well as `in_person`,
    /// `in-person`, `in person` and any casing of `online` / `hybrid`.
    pub fn parse(s: &str) -> Option<Self> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| match c {
                '_' | ' ' => '-',
                c => c.to_ascii_lowercase(),
            })
            .collect();

        match normalized.as_str() {
            "in-person" | "inperson" => Some(Modality::InPerson),
            "online" => Some(Modality::Online),
            "hybrid" => Some(Modality::Hybrid),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Modality::InPerson => "In-person",
            Modality::Online => "Online",
            Modality::Hybrid => "Hybrid",
        }
    }

    /// In-person and hybrid events take place somewhere on the map.
    pub fn is_physical(&self) -> bool {
        !matches!(self, Modality::Online)
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A festival event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,

    #[serde(rename = "start_datetime")]
    pub start: DateTime<FixedOffset>,
    /// Draft records may leave this out; see [`Event::end`]
    #[serde(rename = "end_datetime", default)]
    pub end: Option<DateTime<FixedOffset>>,
    /// IANA zone used for display and day keys, never for comparison
    #[serde(default)]
    pub timezone: Option<String>,

    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub topics: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,

    #[serde(default, deserialize_with = "lenient_modality")]
    pub modality: Option<Modality>,
    #[serde(default, alias = "country_code")]
    pub country: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub venue_name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient_coordinate")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_coordinate")]
    pub longitude: Option<f64>,

    #[serde(default)]
    pub organizer_name: Option<String>,
    #[serde(default)]
    pub campaign_id: Option<String>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Event {
    /// Minimal event, mostly useful for fixtures and builders.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> Self {
        Event {
            id: id.into(),
            title: title.into(),
            summary: None,
            description: None,
            start,
            end: Some(end),
            timezone: None,
            category: None,
            topics: Vec::new(),
            tags: Vec::new(),
            modality: None,
            country: None,
            city: None,
            venue_name: None,
            address: None,
            latitude: None,
            longitude: None,
            organizer_name: None,
            campaign_id: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// The display zone, if the record carries a recognisable IANA identifier.
    pub fn display_tz(&self) -> Option<Tz> {
        let name = self.timezone.as_deref()?.trim();
        if name.is_empty() {
            return None;
        }
        match name.parse::<Tz>() {
            Ok(tz) => Some(tz),
            Err(_) => {
                tracing::warn!(event = %self.id, timezone = name, "unrecognised timezone, using start offset");
                None
            }
        }
    }

    /// Calendar date the event starts on, in its own display zone.
    ///
    /// Falls back to the offset the start instant was written with.
    pub fn start_date(&self) -> NaiveDate {
        match self.display_tz() {
            Some(tz) => self.start.with_timezone(&tz).date_naive(),
            None => self.start.date_naive(),
        }
    }

    pub fn start_utc(&self) -> DateTime<Utc> {
        self.start.with_timezone(&Utc)
    }

    /// End instant. An event without one ends when it starts.
    pub fn end(&self) -> DateTime<FixedOffset> {
        self.end.unwrap_or(self.start)
    }

    pub fn end_utc(&self) -> DateTime<Utc> {
        self.end().with_timezone(&Utc)
    }

    /// Latitude/longitude pair when both are present and finite.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => Some((lat, lng)),
            _ => None,
        }
    }

    /// Address, else venue name, else empty.
    pub fn location_label(&self) -> &str {
        non_empty(self.address.as_deref())
            .or_else(|| non_empty(self.venue_name.as_deref()))
            .unwrap_or("")
    }

    /// Case-insensitive substring match on title, summary or organizer.
    /// `needle` must already be lowercase.
    pub(crate) fn matches_text(&self, needle: &str) -> bool {
        let hit = |field: Option<&str>| field.is_some_and(|s| s.to_lowercase().contains(needle));
        hit(Some(&self.title)) || hit(self.summary.as_deref()) || hit(self.organizer_name.as_deref())
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

pub(crate) fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_modality<'de, D>(deserializer: D) -> Result<Option<Modality>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| {
        let parsed = Modality::parse(&s);
        if parsed.is_none() && !s.trim().is_empty() {
            tracing::warn!(modality = %s, "unknown modality, treating as absent");
        }
        parsed
    }))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Coordinate {
    Number(f64),
    Text(String),
}

/// Coordinates show up as numbers or numeric strings depending on the source.
fn lenient_coordinate<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Coordinate>::deserialize(deserializer)?;
    Ok(value
        .and_then(|c| match c {
            Coordinate::Number(n) => Some(n),
            Coordinate::Text(s) => s.trim().parse::<f64>().ok(),
        })
        .filter(|n| n.is_finite()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Event {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn modality_accepts_source_spellings() {
        assert_eq!(Modality::parse("In-person"), Some(Modality::InPerson));
        assert_eq!(Modality::parse("in_person"), Some(Modality::InPerson));
        assert_eq!(Modality::parse("IN PERSON"), Some(Modality::InPerson));
        assert_eq!(Modality::parse("online"), Some(Modality::Online));
        assert_eq!(Modality::parse("Hybrid"), Some(Modality::Hybrid));
        assert_eq!(Modality::parse("hologram"), None);
    }

    #[test]
    fn deserializes_data_file_record() {
        let event = parse(
            r#"{
                "id": "evt-mvp-001",
                "title": "Beach Cleanup & Coastal Conservation",
                "summary": "Join us",
                "start_datetime": "2025-07-05T09:00:00+08:00",
                "end_datetime": "2025-07-05T11:00:00+08:00",
                "timezone": "Asia/Manila",
                "category": "cleanup",
                "topics": ["ocean-conservation", "community-action"],
                "tags": null,
                "modality": "In-person",
                "country": "Philippines",
                "city": "Manila",
                "latitude": "14.5995",
                "longitude": 120.9842,
                "organizer_name": "Ocean Guardians Philippines",
                "campaign_id": null
            }"#,
        );

        assert_eq!(event.modality, Some(Modality::InPerson));
        assert!(event.tags.is_empty());
        assert_eq!(event.coordinates(), Some((14.5995, 120.9842)));
        assert_eq!(event.campaign_id, None);
        assert_eq!(event.start_date(), NaiveDate::from_ymd_opt(2025, 7, 5).unwrap());
    }

    #[test]
    fn unknown_modality_and_bad_coordinates_become_absent() {
        let event = parse(
            r#"{
                "id": "x",
                "title": "Webinar",
                "start_datetime": "2025-07-05T09:00:00Z",
                "end_datetime": "2025-07-05T10:00:00Z",
                "modality": "Metaverse",
                "latitude": "n/a",
                "longitude": null
            }"#,
        );

        assert_eq!(event.modality, None);
        assert_eq!(event.coordinates(), None);
        assert_eq!(event.location_label(), "");
    }

    #[test]
    fn start_date_uses_display_timezone() {
        // 23:30 UTC is already the next day in Manila
        let mut event = parse(
            r#"{
                "id": "late",
                "title": "Late",
                "start_datetime": "2025-07-04T23:30:00Z",
                "end_datetime": "2025-07-05T01:00:00Z"
            }"#,
        );
        assert_eq!(event.start_date(), NaiveDate::from_ymd_opt(2025, 7, 4).unwrap());

        event.timezone = Some("Asia/Manila".into());
        assert_eq!(event.start_date(), NaiveDate::from_ymd_opt(2025, 7, 5).unwrap());

        event.timezone = Some("Mars/Olympus".into());
        assert_eq!(event.start_date(), NaiveDate::from_ymd_opt(2025, 7, 4).unwrap());
    }

    #[test]
    fn location_label_prefers_address() {
        let mut event = parse(
            r#"{"id":"a","title":"A","start_datetime":"2025-01-01T00:00:00Z","end_datetime":"2025-01-01T01:00:00Z","venue_name":"Green Hub"}"#,
        );
        assert_eq!(event.location_label(), "Green Hub");
        event.address = Some("Pier 1".into());
        assert_eq!(event.location_label(), "Pier 1");
    }

    #[test]
    fn missing_or_null_end_ends_at_start() {
        let missing = parse(r#"{"id":"d1","title":"Draft","start_datetime":"2025-07-05T09:00:00+08:00"}"#);
        let null = parse(
            r#"{"id":"d2","title":"Draft","start_datetime":"2025-07-05T09:00:00+08:00","end_datetime":null}"#,
        );

        assert_eq!(missing.end(), missing.start);
        assert_eq!(null.end_utc(), null.start_utc());
    }
}
