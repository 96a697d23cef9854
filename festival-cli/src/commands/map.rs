use anyhow::Result;
use festival_core::EventStore;
use festival_core::map::{Bounds, markers};
use owo_colors::OwoColorize;

use crate::render::pluralize;

pub fn run(store: &EventStore) -> Result<()> {
    let filtered = store.filtered_events();
    let markers = markers(&filtered);

    let Some(bounds) = Bounds::enclosing(&markers) else {
        println!("{}", "No events with a location".dimmed());
        return Ok(());
    };

    let (lat, lng) = bounds.center();
    let heading = format!("{} {} on the map", markers.len(), pluralize("event", markers.len()));
    println!("{}", heading.bold());
    println!(
        "{}",
        format!(
            "  bounds {:.4},{:.4} to {:.4},{:.4}, center {:.4},{:.4}",
            bounds.south, bounds.west, bounds.north, bounds.east, lat, lng
        )
        .dimmed()
    );

    for marker in &markers {
        let modality = marker.modality.map(|m| m.to_string()).unwrap_or_default();
        println!(
            "  {:>9.4} {:>10.4}  {} {}",
            marker.latitude,
            marker.longitude,
            marker.title,
            modality.cyan()
        );
    }
    Ok(())
}
