pub mod calendar;
pub mod campaigns;
pub mod config;
pub mod countries;
pub mod events;
pub mod gcal;
pub mod ics;
pub mod link;
pub mod map;
pub mod show;

use anyhow::Result;
use chrono::{DateTime, NaiveTime, SecondsFormat, TimeZone, Utc};
use chrono_tz::Tz;
use clap::Args;
use festival_core::calendar::MonthRef;
use festival_core::filter::DateBound;
use festival_core::{Event, EventStore, FestivalError, FilterCriteria, FilterPatch};

/// Filter flags shared by the listing commands.
#[derive(Args, Debug, Default, Clone)]
pub struct FilterArgs {
    /// Text to find in title, summary or organizer
    #[arg(short, long)]
    pub query: Option<String>,

    #[arg(long)]
    pub country: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    /// In-person, Online or Hybrid
    #[arg(long)]
    pub modality: Option<String>,

    /// Match events with any of these topics (repeatable)
    #[arg(long = "topic")]
    pub topics: Vec<String>,

    /// Match events with any of these tags (repeatable)
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// Events starting at or after (YYYY-MM-DD, RFC 3339, or e.g. "next friday")
    #[arg(long)]
    pub from: Option<String>,

    /// Events starting at or before (same formats as --from)
    #[arg(long)]
    pub to: Option<String>,

    #[arg(long)]
    pub campaign: Option<String>,

    /// Start from a shared link's query string, e.g. "country=Philippines&topics=composting"
    #[arg(long)]
    pub link: Option<String>,
}

impl FilterArgs {
    /// Flags as a patch; list flags only count when given.
    fn patch(&self, now: &DateTime<Tz>) -> FilterPatch {
        let list = |values: &[String]| (!values.is_empty()).then(|| values.to_vec());
        FilterPatch {
            query: self.query.clone(),
            country: self.country.clone(),
            category: self.category.clone(),
            modality: self.modality.clone(),
            topics: list(&self.topics),
            tags: list(&self.tags),
            date_from: self.from.as_deref().map(|d| normalize_date_input(d, now)),
            date_to: self.to.as_deref().map(|d| normalize_date_input(d, now)),
            campaign: self.campaign.clone(),
        }
    }

    /// The resulting selection: the shared link first, then individual flags on top.
    /// Relative dates such as "tomorrow" resolve against `now` in its zone.
    pub fn criteria(&self, now: &DateTime<Tz>) -> FilterCriteria {
        let base = self
            .link
            .as_deref()
            .map(FilterCriteria::from_query)
            .unwrap_or_default();
        base.merged(self.patch(now))
    }

    pub fn apply(&self, store: &mut EventStore, now: &DateTime<Tz>) {
        store.replace_filters(self.criteria(now));
    }
}

/// Exact formats pass through untouched. Natural-language input is resolved
/// with fuzzydate in the viewer's zone and written back as RFC 3339; without a
/// time of day it means the start of that day. Anything else is passed on and
/// will match nothing.
fn normalize_date_input(input: &str, now: &DateTime<Tz>) -> String {
    if DateBound::parse(input).is_none_or(|b| b.instant().is_some()) {
        return input.to_string();
    }

    let tz = now.timezone();
    let resolved = match fuzzydate::aware_parse(input, Some(now.clone()), tz) {
        Ok(dt) => dt,
        Err(_) => {
            tracing::warn!(input, "could not understand date, no events will match");
            return input.to_string();
        }
    };

    let resolved = if has_time_component(input) {
        resolved
    } else {
        let midnight = resolved.date_naive().and_time(NaiveTime::MIN);
        tz.from_local_datetime(&midnight).earliest().unwrap_or(resolved)
    };
    resolved.fixed_offset().to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Whether the input names a time of day: am/pm, HH:MM, noon, midnight or "at <n>".
fn has_time_component(input: &str) -> bool {
    let lower = input.to_lowercase();
    if lower.contains("noon") || lower.contains("midnight") {
        return true;
    }

    let bytes = lower.as_bytes();
    for i in 1..bytes.len() {
        let (prev, b) = (bytes[i - 1], bytes[i]);

        // 6pm, 11am, 6 pm
        let digit_before = prev.is_ascii_digit() || (prev == b' ' && i > 1 && bytes[i - 2].is_ascii_digit());
        if (b == b'a' || b == b'p') && bytes.get(i + 1) == Some(&b'm') && digit_before {
            return true;
        }

        // 9:30
        if b == b':' && prev.is_ascii_digit() && bytes.get(i + 1).is_some_and(|n| n.is_ascii_digit()) {
            return true;
        }
    }

    lower
        .split_whitespace()
        .collect::<Vec<_>>()
        .windows(2)
        .any(|w| w[0] == "at" && w[1].starts_with(|c: char| c.is_ascii_digit()))
}

/// Current time in the viewer's zone.
pub fn now_in(tz: Tz) -> DateTime<Tz> {
    Utc::now().with_timezone(&tz)
}

/// `--month` or the month containing today.
pub fn resolve_month(month: Option<&str>, tz: Tz) -> Result<MonthRef> {
    match month {
        Some(s) => MonthRef::parse(s)
            .ok_or_else(|| anyhow::anyhow!("Invalid month '{}'. Expected YYYY-MM", s)),
        None => Ok(MonthRef::of(now_in(tz).date_naive())),
    }
}

pub fn require_event<'a>(store: &'a EventStore, id: &str) -> Result<&'a Event> {
    store
        .event(id)
        .ok_or_else(|| FestivalError::EventNotFound(id.to_string()).into())
}
