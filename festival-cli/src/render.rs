//! Colored terminal rendering for festival-core types.

use chrono::Weekday;
use chrono_tz::Tz;
use festival_core::Event;
use festival_core::calendar::{DayCell, WeekStart};
use festival_core::date::{fmt_range, fmt_time};
use festival_core::reference::{Campaign, CampaignPhase};
use owo_colors::OwoColorize;

pub trait Render {
    fn render(&self) -> String;
}

/// One line in a day group: time in the viewer's zone, title, place.
pub fn event_line(event: &Event, tz: Tz) -> String {
    let time = fmt_time(&event.start, Some(tz));
    let mut line = format!("  {} {}", time, event.title);

    let place = event.city.as_deref().or(event.country.as_deref());
    if let Some(place) = place {
        line.push_str(&format!(" {}", format!("({})", place).dimmed()));
    }
    if let Some(modality) = event.modality {
        line.push_str(&format!(" {}", format!("[{}]", modality).cyan()));
    }
    line
}

impl Render for Event {
    /// Title with the time range in the event's own zone.
    fn render(&self) -> String {
        let when = fmt_range(&self.start, &self.end(), self.display_tz());
        format!("{} {}", self.title.bold(), when.dimmed())
    }
}

impl Render for DayCell {
    fn render(&self) -> String {
        let day = format!("{:>2}", self.date.format("%-d"));
        let marked = if self.has_events { format!("{}*", day) } else { format!("{} ", day) };

        if !self.in_month {
            marked.dimmed().to_string()
        } else if self.is_selected {
            marked.reversed().to_string()
        } else if self.is_today {
            marked.yellow().bold().to_string()
        } else if self.has_events {
            marked.green().to_string()
        } else {
            marked
        }
    }
}

impl Render for Campaign {
    fn render(&self) -> String {
        format!("{} {}", self.label().bold(), format!("({})", self.id).dimmed())
    }
}

impl Render for CampaignPhase {
    fn render(&self) -> String {
        match self {
            CampaignPhase::Ongoing => "ongoing".green().to_string(),
            CampaignPhase::Upcoming => "upcoming".yellow().to_string(),
            CampaignPhase::Ended => "ended".dimmed().to_string(),
        }
    }
}

/// Two-letter weekday header for the month grid.
pub fn weekday_header(week_start: WeekStart) -> String {
    let mut day = week_start.weekday();
    let mut cols = Vec::with_capacity(7);
    for _ in 0..7 {
        cols.push(format!("{:<3}", short_weekday(day)));
        day = day.succ();
    }
    cols.join(" ").trim_end().to_string()
}

fn short_weekday(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mo",
        Weekday::Tue => "Tu",
        Weekday::Wed => "We",
        Weekday::Thu => "Th",
        Weekday::Fri => "Fr",
        Weekday::Sat => "Sa",
        Weekday::Sun => "Su",
    }
}

pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 { word.to_string() } else { format!("{}s", word) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_follows_week_start() {
        assert!(weekday_header(WeekStart::Sunday).starts_with("Su"));
        assert!(weekday_header(WeekStart::Monday).starts_with("Mo"));
        assert!(weekday_header(WeekStart::Monday).ends_with("Su"));
    }

    #[test]
    fn pluralize_counts() {
        assert_eq!(pluralize("event", 1), "event");
        assert_eq!(pluralize("event", 3), "events");
    }
}
