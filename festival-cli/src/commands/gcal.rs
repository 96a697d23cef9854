use anyhow::{Context, Result};
use festival_core::EventStore;
use festival_core::links::google_calendar_url;

use super::require_event;

pub fn run(store: &EventStore, id: &str, open: bool) -> Result<()> {
    let event = require_event(store, id)?;
    let url = google_calendar_url(event);

    println!("{}", url);
    if open {
        open::that(&url).context("Failed to open browser")?;
    }
    Ok(())
}
