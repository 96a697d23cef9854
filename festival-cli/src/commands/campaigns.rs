use anyhow::Result;
use chrono::NaiveDate;
use chrono_tz::Tz;
use festival_core::{Event, EventStore};
use festival_core::date::{day_label, fmt_date};
use festival_core::store::CampaignHighlight;
use owo_colors::OwoColorize;

use super::now_in;
use crate::render::{Render, event_line};

pub fn run(store: &EventStore, tz: Tz) -> Result<()> {
    let now = now_in(tz);
    let today = now.date_naive();

    let featured = store.featured_campaigns();
    println!("{}", "Campaigns".bold());
    if featured.is_empty() {
        println!("  {}", "No featured campaigns".dimmed());
    }
    for campaign in &featured {
        let dates = match (campaign.start_date, campaign.end_date) {
            (Some(start), Some(end)) => format!("{} – {}", fmt_date(start), fmt_date(end)),
            (Some(start), None) => format!("from {}", fmt_date(start)),
            (None, Some(end)) => format!("until {}", fmt_date(end)),
            (None, None) => String::new(),
        };
        println!("  {} {} {}", campaign.render(), campaign.phase(today).render(), dates.dimmed());
    }

    let highlights = store.campaign_highlights(today);
    if let Some(highlight) = &highlights.ongoing {
        print_highlight("Happening now", highlight, tz);
    }
    if let Some(highlight) = &highlights.upcoming {
        print_highlight("Coming up", highlight, tz);
    }

    println!("\n{}", "This week".bold());
    let week = store.this_week(&now);
    if week.is_empty() {
        println!("  {}", "Nothing in the next 7 days".dimmed());
    }
    for event in week {
        println!("{}", week_line(event, today, tz));
    }

    Ok(())
}

/// Day labels use the event's own calendar date, as the day groups do.
fn week_line(event: &Event, today: NaiveDate, tz: Tz) -> String {
    format!("{} {}", event_line(event, tz), day_label(event.start_date(), today).dimmed())
}

fn print_highlight(heading: &str, highlight: &CampaignHighlight<'_>, tz: Tz) {
    println!("\n{} {}", heading.bold(), highlight.campaign.label());
    if highlight.events.is_empty() {
        println!("  {}", "No events yet".dimmed());
    }
    for event in &highlight.events {
        println!("{}", event_line(event, tz));
    }
}
