use anyhow::{Context, Result};
use chrono::Utc;
use festival_core::EventStore;
use festival_core::config::SiteConfig;
use festival_core::ics::{build_ics, build_ics_feed, ics_filename};
use owo_colors::OwoColorize;
use std::path::PathBuf;

use super::require_event;
use crate::render::pluralize;

pub fn run(store: &EventStore, config: &SiteConfig, id: &str, output: Option<PathBuf>) -> Result<()> {
    let event = require_event(store, id)?;
    let ics = build_ics(event, &config.ics_options(), Utc::now());

    match output {
        Some(path) => {
            // A directory gets the conventional file name.
            let path = if path.is_dir() { path.join(ics_filename(event)) } else { path };
            write(&path, &ics)?;
            println!("{} {}", "Wrote".green(), path.display());
        }
        None => print!("{}", ics),
    }
    Ok(())
}

pub fn export(store: &EventStore, config: &SiteConfig, output: Option<PathBuf>) -> Result<()> {
    let events = store.filtered_events();
    let ics = build_ics_feed(&events, &config.ics_options(), Utc::now());

    match output {
        Some(path) => {
            write(&path, &ics)?;
            let count = format!("{} {}", events.len(), pluralize("event", events.len()));
            println!("{} {} to {}", "Exported".green(), count, path.display());
        }
        None => print!("{}", ics),
    }
    Ok(())
}

fn write(path: &std::path::Path, ics: &str) -> Result<()> {
    std::fs::write(path, ics).with_context(|| format!("Failed to write {}", path.display()))
}
