//! The event store: the authoritative event list plus the active filter.
//!
//! All mutation goes through the methods here. Derived views (filtered events,
//! country options, highlights) are recomputed on each call; nothing is cached.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use std::collections::BTreeSet;

use crate::calendar::sort_by_start;
use crate::constants::{HIGHLIGHT_LIMIT, THIS_WEEK_DAYS};
use crate::event::Event;
use crate::filter::{FilterCriteria, FilterPatch, FilterUpdate, filter_events};
use crate::reference::{Campaign, CampaignPhase, ReferenceData};
use crate::source::Snapshot;

#[derive(Debug, Clone, Default)]
pub struct EventStore {
    events: Vec<Event>,
    reference: ReferenceData,
    criteria: FilterCriteria,
}

/// A featured campaign with a preview of its events.
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignHighlight<'a> {
    pub campaign: &'a Campaign,
    pub events: Vec<&'a Event>,
}

/// The home-page campaign strip.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CampaignHighlights<'a> {
    pub ongoing: Option<CampaignHighlight<'a>>,
    pub upcoming: Option<CampaignHighlight<'a>>,
}

impl EventStore {
    pub fn new(snapshot: Snapshot) -> Self {
        EventStore {
            events: snapshot.events,
            reference: snapshot.reference,
            criteria: FilterCriteria::default(),
        }
    }

    /// Swap in a freshly loaded snapshot. The filter selection is kept.
    pub fn replace_snapshot(&mut self, snapshot: Snapshot) {
        tracing::debug!(events = snapshot.events.len(), "replacing event snapshot");
        self.events = snapshot.events;
        self.reference = snapshot.reference;
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn event(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    // FILTERS:

    pub fn set_filter(&mut self, update: FilterUpdate) {
        self.criteria = self.criteria.with(update);
    }

    pub fn set_filters(&mut self, patch: FilterPatch) {
        self.criteria = self.criteria.merged(patch);
    }

    /// Replace the whole selection at once.
    pub fn replace_filters(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
    }

    pub fn reset_filters(&mut self) {
        self.criteria = FilterCriteria::default();
    }

    /// Select `campaign_id`, or clear the campaign filter if it is already selected.
    pub fn toggle_campaign(&mut self, campaign_id: &str) {
        let next = if self.criteria.campaign.as_deref() == Some(campaign_id) {
            String::new()
        } else {
            campaign_id.to_string()
        };
        self.set_filter(FilterUpdate::Campaign(next));
    }

    pub fn has_active_filters(&self) -> bool {
        self.criteria.is_active()
    }

    /// Events matching the current criteria, in source order.
    pub fn filtered_events(&self) -> Vec<&Event> {
        let filtered = filter_events(&self.events, &self.criteria);
        tracing::debug!(total = self.events.len(), matched = filtered.len(), "filtered events");
        filtered
    }

    // DERIVED LISTS:

    /// Distinct non-empty countries across all events, sorted.
    pub fn distinct_countries(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| e.country.as_deref())
            .filter(|c| !c.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(String::from)
            .collect()
    }

    pub fn featured_campaigns(&self) -> Vec<&Campaign> {
        self.reference.campaigns.iter().filter(|c| c.featured).collect()
    }

    /// The earliest-starting ongoing and upcoming featured campaigns, each with
    /// a short list of its events.
    pub fn campaign_highlights(&self, today: NaiveDate) -> CampaignHighlights<'_> {
        let earliest_in = |phase: CampaignPhase| {
            self.featured_campaigns()
                .into_iter()
                .filter(|c| c.phase(today) == phase)
                .min_by_key(|c| c.start_date)
                .map(|campaign| CampaignHighlight {
                    campaign,
                    events: self.campaign_events(&campaign.id, HIGHLIGHT_LIMIT),
                })
        };

        CampaignHighlights {
            ongoing: earliest_in(CampaignPhase::Ongoing),
            upcoming: earliest_in(CampaignPhase::Upcoming),
        }
    }

    /// Up to `limit` events of a campaign, soonest first.
    pub fn campaign_events(&self, campaign_id: &str, limit: usize) -> Vec<&Event> {
        let members: Vec<&Event> = self
            .events
            .iter()
            .filter(|e| e.campaign_id.as_deref() == Some(campaign_id))
            .collect();
        let mut sorted = sort_by_start(&members);
        sorted.truncate(limit);
        sorted
    }

    /// Events starting within the next week, soonest first.
    pub fn this_week<T: TimeZone>(&self, now: &DateTime<T>) -> Vec<&Event> {
        let from = now.with_timezone(&Utc);
        let until = from + Duration::days(THIS_WEEK_DAYS);

        let window: Vec<&Event> = self
            .events
            .iter()
            .filter(|e| (from..=until).contains(&e.start_utc()))
            .collect();
        let mut sorted = sort_by_start(&window);
        sorted.truncate(HIGHLIGHT_LIMIT);
        sorted
    }
}
