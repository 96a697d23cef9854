//! Core of the zero-waste festival calendar.
//!
//! - `store`: the event list and filter selection, with the filtered-events derivation
//! - `calendar`: upcoming/past partitions, month windows and day groups
//! - `ics` and `links`: calendar exports
//! - `source` and `config`: where events come from and site settings

pub mod calendar;
pub mod config;
pub mod constants;
pub mod date;
pub mod error;
pub mod event;
pub mod filter;
pub mod ics;
pub mod links;
pub mod map;
pub mod query;
pub mod reference;
pub mod source;
pub mod store;

pub use error::{FestivalError, FestivalResult};
pub use event::{Event, Modality};
pub use filter::{FilterCriteria, FilterPatch, FilterUpdate};
pub use store::EventStore;
