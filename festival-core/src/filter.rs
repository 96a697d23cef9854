//! Filter criteria and the filtered-events derivation.
//!
//! A `FilterCriteria` is a plain value: updates return a new record instead of
//! mutating in place, so a caller can compare old and new criteria to detect
//! change. Every field's empty state means "no constraint". Values are never
//! validated; a value that cannot be interpreted just matches nothing.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Serialize, Serializer};
use std::collections::BTreeSet;

use crate::event::{Event, Modality};

/// A date-from / date-to bound as entered, plus the instant it denotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateBound {
    raw: String,
    instant: Option<DateTime<Utc>>,
}

impl DateBound {
    /// `None` for an empty input (no constraint). Anything else yields a bound;
    /// if it doesn't parse the bound matches no event.
    ///
    /// Accepts RFC 3339, `YYYY-MM-DDTHH:MM[:SS]` (read as UTC) and
    /// `YYYY-MM-DD` (UTC midnight).
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() {
            return None;
        }
        let instant = parse_instant(raw.trim());
        if instant.is_none() {
            tracing::debug!(value = raw, "date filter value does not parse, it will match nothing");
        }
        Some(DateBound {
            raw: raw.to_string(),
            instant,
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn instant(&self) -> Option<DateTime<Utc>> {
        self.instant
    }
}

impl Serialize for DateBound {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

fn parse_instant(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// The active filter selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterCriteria {
    pub query: String,
    pub country: Option<String>,
    pub category: Option<String>,
    /// Kept as entered; an unknown spelling matches nothing
    pub modality: Option<String>,
    pub topics: BTreeSet<String>,
    pub tags: BTreeSet<String>,
    pub date_from: Option<DateBound>,
    pub date_to: Option<DateBound>,
    pub campaign: Option<String>,
}

/// Replacement of a single criterion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterUpdate {
    Query(String),
    Country(String),
    Category(String),
    Modality(String),
    Topics(Vec<String>),
    Tags(Vec<String>),
    DateFrom(String),
    DateTo(String),
    Campaign(String),
}

/// Bulk update: every `Some` field replaces the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPatch {
    pub query: Option<String>,
    pub country: Option<String>,
    pub category: Option<String>,
    pub modality: Option<String>,
    pub topics: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub campaign: Option<String>,
}

impl FilterPatch {
    pub fn is_empty(&self) -> bool {
        *self == FilterPatch::default()
    }

    fn updates(self) -> impl Iterator<Item = FilterUpdate> {
        [
            self.query.map(FilterUpdate::Query),
            self.country.map(FilterUpdate::Country),
            self.category.map(FilterUpdate::Category),
            self.modality.map(FilterUpdate::Modality),
            self.topics.map(FilterUpdate::Topics),
            self.tags.map(FilterUpdate::Tags),
            self.date_from.map(FilterUpdate::DateFrom),
            self.date_to.map(FilterUpdate::DateTo),
            self.campaign.map(FilterUpdate::Campaign),
        ]
        .into_iter()
        .flatten()
    }
}

fn optional(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

fn value_set(values: Vec<String>) -> BTreeSet<String> {
    values.into_iter().filter(|v| !v.is_empty()).collect()
}

impl FilterCriteria {
    /// A copy of these criteria with one field replaced.
    pub fn with(&self, update: FilterUpdate) -> Self {
        let mut next = self.clone();
        match update {
            FilterUpdate::Query(q) => next.query = q,
            FilterUpdate::Country(c) => next.country = optional(c),
            FilterUpdate::Category(c) => next.category = optional(c),
            FilterUpdate::Modality(m) => next.modality = optional(m),
            FilterUpdate::Topics(t) => next.topics = value_set(t),
            FilterUpdate::Tags(t) => next.tags = value_set(t),
            FilterUpdate::DateFrom(d) => next.date_from = DateBound::parse(&d),
            FilterUpdate::DateTo(d) => next.date_to = DateBound::parse(&d),
            FilterUpdate::Campaign(c) => next.campaign = optional(c),
        }
        next
    }

    /// A copy of these criteria with every field named in `patch` replaced.
    pub fn merged(&self, patch: FilterPatch) -> Self {
        patch
            .updates()
            .fold(self.clone(), |criteria, update| criteria.with(update))
    }

    /// True when at least one criterion constrains the result.
    pub fn is_active(&self) -> bool {
        *self != FilterCriteria::default()
    }

    /// Whether `event` satisfies every active criterion.
    pub fn matches(&self, event: &Event) -> bool {
        Matcher::new(self).matches(event)
    }
}

/// Criteria with the per-call work (lowercasing, modality parsing) done once.
struct Matcher<'a> {
    criteria: &'a FilterCriteria,
    needle: Option<String>,
    modality: Option<Option<Modality>>,
}

impl<'a> Matcher<'a> {
    fn new(criteria: &'a FilterCriteria) -> Self {
        Matcher {
            criteria,
            needle: (!criteria.query.is_empty()).then(|| criteria.query.to_lowercase()),
            modality: criteria.modality.as_deref().map(Modality::parse),
        }
    }

    fn matches(&self, event: &Event) -> bool {
        let c = self.criteria;

        if let Some(needle) = &self.needle {
            if !event.matches_text(needle) {
                return false;
            }
        }
        if !equals(c.country.as_deref(), event.country.as_deref())
            || !equals(c.category.as_deref(), event.category.as_deref())
            || !equals(c.campaign.as_deref(), event.campaign_id.as_deref())
        {
            return false;
        }
        if let Some(wanted) = self.modality {
            if wanted.is_none() || event.modality != wanted {
                return false;
            }
        }
        if !intersects(&c.topics, &event.topics) || !intersects(&c.tags, &event.tags) {
            return false;
        }
        if let Some(from) = &c.date_from {
            if !from.instant().is_some_and(|bound| event.start_utc() >= bound) {
                return false;
            }
        }
        if let Some(to) = &c.date_to {
            if !to.instant().is_some_and(|bound| event.start_utc() <= bound) {
                return false;
            }
        }
        true
    }
}

/// An unset criterion always passes; a set one needs an exact match.
fn equals(wanted: Option<&str>, actual: Option<&str>) -> bool {
    match wanted {
        None => true,
        Some(w) => actual == Some(w),
    }
}

/// An empty selection always passes; otherwise at least one shared value.
fn intersects(selected: &BTreeSet<String>, values: &[String]) -> bool {
    selected.is_empty() || values.iter().any(|v| selected.contains(v))
}

/// The events matching `criteria`, in source order.
pub fn filter_events<'a>(events: &'a [Event], criteria: &FilterCriteria) -> Vec<&'a Event> {
    let matcher = Matcher::new(criteria);
    events.iter().filter(|e| matcher.matches(e)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(8 * 3600)
            .unwrap()
            .with_ymd_and_hms(y, m, d, h, 0, 0)
            .unwrap()
    }

    fn event(id: &str, title: &str) -> Event {
        Event::new(id, title, at(2025, 7, 5, 9), at(2025, 7, 5, 11))
    }

    fn fixture() -> Vec<Event> {
        let mut cleanup = event("1", "Beach Cleanup");
        cleanup.country = Some("Philippines".into());
        cleanup.topics = vec!["ocean-conservation".into()];
        cleanup.tags = vec!["beginner-friendly".into()];
        cleanup.modality = Some(Modality::InPerson);
        cleanup.organizer_name = Some("Ocean Guardians".into());

        let mut compost = event("2", "Composting 101");
        compost.country = Some("Philippines".into());
        compost.topics = vec!["composting".into()];
        compost.summary = Some("Turn food waste into gold".into());
        compost.modality = Some(Modality::Hybrid);
        compost.start = at(2025, 7, 12, 9);

        let mut film = event("3", "Film Night: A Plastic Ocean");
        film.country = Some("Singapore".into());
        film.topics = vec!["ocean-conservation".into()];
        film.campaign_id = Some("pfj".into());
        film.start = at(2025, 7, 20, 19);

        vec![cleanup, compost, film]
    }

    fn ids(events: &[&Event]) -> Vec<String> {
        events.iter().map(|e| e.id.clone()).collect()
    }

    #[test]
    fn default_criteria_match_everything_in_order() {
        let events = fixture();
        let criteria = FilterCriteria::default();
        assert!(!criteria.is_active());
        assert_eq!(ids(&filter_events(&events, &criteria)), ["1", "2", "3"]);
    }

    #[test]
    fn text_query_searches_title_summary_and_organizer() {
        let events = fixture();
        let by = |q: &str| {
            let criteria = FilterCriteria::default().with(FilterUpdate::Query(q.into()));
            ids(&filter_events(&events, &criteria))
        };

        assert_eq!(by("BEACH"), ["1"]);
        assert_eq!(by("food waste"), ["2"]);
        assert_eq!(by("guardians"), ["1"]);
        assert_eq!(by("ocean"), ["1", "3"]);
        assert!(by("volcano").is_empty());
    }

    #[test]
    fn multi_valued_criteria_match_any_selected_value() {
        let events = fixture();
        let criteria = FilterCriteria::default().with(FilterUpdate::Topics(vec![
            "composting".into(),
            "ocean-conservation".into(),
        ]));
        assert_eq!(ids(&filter_events(&events, &criteria)), ["1", "2", "3"]);

        let criteria = FilterCriteria::default().with(FilterUpdate::Tags(vec!["beginner-friendly".into()]));
        assert_eq!(ids(&filter_events(&events, &criteria)), ["1"]);
    }

    #[test]
    fn criteria_combine_with_and() {
        let events = fixture();
        let criteria = FilterCriteria::default().merged(FilterPatch {
            country: Some("Philippines".into()),
            topics: Some(vec!["ocean-conservation".into()]),
            ..Default::default()
        });
        assert_eq!(ids(&filter_events(&events, &criteria)), ["1"]);
    }

    #[test]
    fn modality_matches_any_spelling_and_unknown_matches_nothing() {
        let events = fixture();
        let criteria = FilterCriteria::default().with(FilterUpdate::Modality("hybrid".into()));
        assert_eq!(ids(&filter_events(&events, &criteria)), ["2"]);

        let criteria = FilterCriteria::default().with(FilterUpdate::Modality("teleport".into()));
        assert!(filter_events(&events, &criteria).is_empty());
    }

    #[test]
    fn date_bounds_compare_start_instants() {
        let events = fixture();
        let criteria = FilterCriteria::default().merged(FilterPatch {
            date_from: Some("2025-07-06".into()),
            date_to: Some("2025-07-20T11:00:00Z".into()),
            ..Default::default()
        });
        assert_eq!(ids(&filter_events(&events, &criteria)), ["2", "3"]);
    }

    #[test]
    fn unparseable_date_matches_nothing() {
        let events = fixture();
        let criteria = FilterCriteria::default().with(FilterUpdate::DateFrom("next tuesday-ish".into()));
        assert!(criteria.is_active());
        assert!(filter_events(&events, &criteria).is_empty());
    }

    #[test]
    fn missing_event_fields_do_not_match() {
        let events = vec![event("bare", "Bare event")];
        for update in [
            FilterUpdate::Country("Philippines".into()),
            FilterUpdate::Category("workshop".into()),
            FilterUpdate::Modality("Online".into()),
            FilterUpdate::Campaign("pfj".into()),
            FilterUpdate::Tags(vec!["x".into()]),
        ] {
            let criteria = FilterCriteria::default().with(update.clone());
            assert!(filter_events(&events, &criteria).is_empty(), "{:?} matched", update);
        }
    }

    #[test]
    fn empty_values_clear_a_criterion() {
        let criteria = FilterCriteria::default()
            .with(FilterUpdate::Country("Singapore".into()))
            .with(FilterUpdate::Country(String::new()))
            .with(FilterUpdate::Topics(vec![String::new()]))
            .with(FilterUpdate::DateTo(String::new()));
        assert_eq!(criteria, FilterCriteria::default());
    }

    #[test]
    fn with_leaves_original_untouched() {
        let original = FilterCriteria::default();
        let updated = original.with(FilterUpdate::Campaign("pfj".into()));
        assert_eq!(original, FilterCriteria::default());
        assert_eq!(updated.campaign.as_deref(), Some("pfj"));
    }

    #[test]
    fn adding_a_constraint_never_grows_the_result() {
        let events = fixture();
        let base = FilterCriteria::default().with(FilterUpdate::Query("o".into()));
        let before = filter_events(&events, &base).len();

        for update in [
            FilterUpdate::Country("Philippines".into()),
            FilterUpdate::Topics(vec!["ocean-conservation".into()]),
            FilterUpdate::DateTo("2025-07-10".into()),
            FilterUpdate::Modality("In-person".into()),
        ] {
            let narrowed = base.with(update);
            assert!(filter_events(&events, &narrowed).len() <= before);
        }
    }
}
