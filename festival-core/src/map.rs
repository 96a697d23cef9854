//! Map marker extraction for events with a physical location.

use serde::Serialize;

use crate::event::{Event, Modality};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub id: String,
    pub title: String,
    pub latitude: f64,
    pub longitude: f64,
    pub modality: Option<Modality>,
}

/// Markers for every event carrying finite coordinates, in input order.
pub fn markers(events: &[&Event]) -> Vec<MapMarker> {
    events
        .iter()
        .filter_map(|event| {
            let (latitude, longitude) = event.coordinates()?;
            Some(MapMarker {
                id: event.id.clone(),
                title: event.title.clone(),
                latitude,
                longitude,
                modality: event.modality,
            })
        })
        .collect()
}

/// Smallest latitude/longitude box holding a set of markers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    pub fn enclosing(markers: &[MapMarker]) -> Option<Self> {
        let (first, rest) = markers.split_first()?;
        let start = Bounds {
            south: first.latitude,
            west: first.longitude,
            north: first.latitude,
            east: first.longitude,
        };
        Some(rest.iter().fold(start, |b, m| Bounds {
            south: b.south.min(m.latitude),
            west: b.west.min(m.longitude),
            north: b.north.max(m.latitude),
            east: b.east.max(m.longitude),
        }))
    }

    pub fn center(&self) -> (f64, f64) {
        ((self.south + self.north) / 2.0, (self.west + self.east) / 2.0)
    }
}
