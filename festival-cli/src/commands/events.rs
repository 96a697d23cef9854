use anyhow::Result;
use chrono::NaiveDate;
use chrono_tz::Tz;
use festival_core::{Event, EventStore};
use festival_core::calendar::{CalendarView, ViewToggles};
use festival_core::date::day_label;
use owo_colors::OwoColorize;

use super::{now_in, resolve_month};
use crate::render::{event_line, pluralize};

pub fn run(store: &EventStore, tz: Tz, month: Option<&str>, all_upcoming: bool, all_past: bool) -> Result<()> {
    let now = now_in(tz);
    let today = now.date_naive();
    let month = resolve_month(month, tz)?;

    let filtered = store.filtered_events();
    let toggles = ViewToggles {
        show_all_upcoming: all_upcoming,
        show_all_past: all_past,
    };
    let view = CalendarView::build(&filtered, &now, month, toggles);

    let heading = format!("{} ({} {})", month, view.total, pluralize("event", view.total));
    println!("{}", heading.bold());
    if store.has_active_filters() {
        println!("{}", "Filters active. Run without filter flags to see everything.".dimmed());
    }

    if view.total == 0 {
        println!("\n{}", "No events found".dimmed());
        return Ok(());
    }

    println!("\n{}", "Upcoming".green().bold());
    if view.upcoming.is_empty() {
        println!("  {}", empty_upcoming_message(all_upcoming).dimmed());
    }
    print_groups(view.upcoming.ascending(), today, tz);
    if view.hidden_upcoming() > 0 {
        let hint = format!("  {} more upcoming, use --all-upcoming", view.hidden_upcoming());
        println!("{}", hint.dimmed());
    }

    if view.past_total > 0 {
        println!("\n{}", "Past".dimmed().bold());
        print_groups(view.past.descending(), today, tz);
        if view.hidden_past() > 0 {
            let hint = format!("  {} more past, use --all-past", view.hidden_past());
            println!("{}", hint.dimmed());
        }
    }

    Ok(())
}

fn empty_upcoming_message(all_upcoming: bool) -> &'static str {
    if all_upcoming { "Nothing upcoming" } else { "Nothing upcoming this month" }
}

fn print_groups<'s, 'e: 's, I>(groups: I, today: NaiveDate, tz: Tz)
where
    I: Iterator<Item = (NaiveDate, &'s [&'e Event])>,
{
    for (day, events) in groups {
        println!("{}", day_label(day, today).bold());
        for event in events {
            println!("{}", event_line(event, tz));
        }
    }
}
