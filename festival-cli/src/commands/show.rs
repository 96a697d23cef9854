use anyhow::Result;
use festival_core::EventStore;
use festival_core::config::SiteConfig;
use festival_core::links::{event_page_url, google_maps_url};
use owo_colors::OwoColorize;

use super::require_event;
use crate::render::Render;

pub fn run(store: &EventStore, config: &SiteConfig, id: &str) -> Result<()> {
    let event = require_event(store, id)?;
    let reference = store.reference();

    println!("{}", event.render());
    if let Some(summary) = &event.summary {
        println!("\n{}", summary);
    }

    println!();
    let location = event.location_label();
    if !location.is_empty() {
        println!("  Where:      {}", location);
    }
    if let Some(country) = &event.country {
        println!("  Country:    {}", country);
    }
    if let Some(modality) = event.modality {
        println!("  Format:     {}", modality);
    }
    if let Some(category) = &event.category {
        println!("  Category:   {}", reference.category_name(category));
    }
    if !event.topics.is_empty() {
        let names: Vec<&str> = event.topics.iter().map(|t| reference.topic_name(t)).collect();
        println!("  Topics:     {}", names.join(", "));
    }
    if !event.tags.is_empty() {
        println!("  Tags:       {}", event.tags.join(", "));
    }
    if let Some(organizer) = &event.organizer_name {
        println!("  Organizer:  {}", organizer);
    }
    if let Some(campaign) = &event.campaign_id {
        println!("  Campaign:   {}", reference.campaign_name(campaign));
    }

    println!();
    println!("  {}", event_page_url(&config.event_url_base, &event.id).underline());
    if let Some(map) = google_maps_url(event) {
        println!("  {}", map.dimmed());
    }

    if let Some(description) = &event.description {
        println!("\n{}", description);
    }

    Ok(())
}
