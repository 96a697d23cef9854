//! Display formatting for event dates.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime};
use chrono_tz::Tz;

/// Parse an IANA zone identifier such as `Asia/Manila`.
pub fn parse_tz(name: &str) -> Option<Tz> {
    name.trim().parse::<Tz>().ok()
}

/// Wall-clock time of `instant` in `tz`, or in its own offset when no zone is given.
fn wall_clock(instant: &DateTime<FixedOffset>, tz: Option<Tz>) -> NaiveDateTime {
    match tz {
        Some(tz) => instant.with_timezone(&tz).naive_local(),
        None => instant.naive_local(),
    }
}

/// Format a start/end pair, e.g. `Jul 5, 09:00 – 11:00 Asia/Manila`.
///
/// The end repeats the date only when it falls on a different day.
pub fn fmt_range(start: &DateTime<FixedOffset>, end: &DateTime<FixedOffset>, tz: Option<Tz>) -> String {
    let sd = wall_clock(start, tz);
    let ed = wall_clock(end, tz);
    let zone = tz.map(|tz| tz.name()).unwrap_or("");

    let end_fmt = if sd.date() == ed.date() { "%H:%M" } else { "%b %-d, %H:%M" };

    format!("{} – {} {}", sd.format("%b %-d, %H:%M"), ed.format(end_fmt), zone)
        .trim_end()
        .to_string()
}

/// `HH:MM` in the given zone.
pub fn fmt_time(instant: &DateTime<FixedOffset>, tz: Option<Tz>) -> String {
    wall_clock(instant, tz).format("%H:%M").to_string()
}

/// `Jul 5, 2025`
pub fn fmt_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Heading for a day group: `Today, Jul 5`, `Tomorrow, Jul 6` or `Sat, Jul 12, 2025`.
pub fn day_label(day: NaiveDate, today: NaiveDate) -> String {
    if day == today {
        format!("Today, {}", day.format("%b %-d"))
    } else if Some(day) == today.checked_add_signed(Duration::days(1)) {
        format!("Tomorrow, {}", day.format("%b %-d"))
    } else {
        day.format("%a, %b %-d, %Y").to_string()
    }
}
