use anyhow::Result;
use chrono::NaiveDate;
use chrono_tz::Tz;
use festival_core::EventStore;
use festival_core::calendar::{MonthRef, events_on, month_grid};
use festival_core::config::SiteConfig;
use festival_core::date::day_label;
use owo_colors::OwoColorize;

use super::{now_in, resolve_month};
use crate::render::{Render, event_line, weekday_header};

pub fn run(store: &EventStore, tz: Tz, config: &SiteConfig, month: Option<&str>, day: Option<&str>) -> Result<()> {
    let today = now_in(tz).date_naive();
    let selected = day
        .map(|d| {
            NaiveDate::parse_from_str(d, "%Y-%m-%d")
                .map_err(|_| anyhow::anyhow!("Invalid day '{}'. Expected YYYY-MM-DD", d))
        })
        .transpose()?;

    // A selected day implies its month unless one is given.
    let month = match (month, selected) {
        (None, Some(date)) => MonthRef::of(date),
        _ => resolve_month(month, tz)?,
    };

    let filtered = store.filtered_events();
    let weeks = month_grid(month, config.week_start, &filtered, today, selected);

    println!("{}", month.to_string().bold());
    println!("{}", weekday_header(config.week_start).dimmed());
    for week in &weeks {
        let cells: Vec<String> = week.iter().map(|cell| cell.render()).collect();
        println!("{}", cells.join(" "));
    }

    if let Some(date) = selected {
        println!("\n{}", day_label(date, today).bold());
        let events = events_on(&filtered, date);
        if events.is_empty() {
            println!("  {}", "No events on this day".dimmed());
        }
        for event in events {
            println!("{}", event_line(event, tz));
        }
    }

    Ok(())
}
