//! Read-only lookup lists used to populate filter options and resolve names.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
}

/// A themed, time-bounded grouping of events (e.g. Plastic Free July).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: String,
    #[serde(alias = "title")]
    pub name: String,
    #[serde(default)]
    pub emoji: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default, deserialize_with = "date_prefix")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "date_prefix")]
    pub end_date: Option<NaiveDate>,
}

/// Campaign dates arrive either as `YYYY-MM-DD` or as full timestamps;
/// only the date part is kept.
fn date_prefix<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| {
        let head = s.get(..10).unwrap_or(&s);
        NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
    }))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampaignPhase {
    Upcoming,
    Ongoing,
    Ended,
}

impl Campaign {
    /// Where `today` sits relative to the campaign's dates.
    /// A missing bound is treated as open-ended.
    pub fn phase(&self, today: NaiveDate) -> CampaignPhase {
        if self.start_date.is_some_and(|start| start > today) {
            CampaignPhase::Upcoming
        } else if self.end_date.is_some_and(|end| end < today) {
            CampaignPhase::Ended
        } else {
            CampaignPhase::Ongoing
        }
    }

    /// Name prefixed with the emoji, if any.
    pub fn label(&self) -> String {
        match self.emoji.as_deref() {
            Some(emoji) if !emoji.is_empty() => format!("{} {}", emoji, self.name),
            _ => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organizer {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub website: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Partner {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

/// All reference lists from one snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceData {
    pub topics: Vec<Topic>,
    pub categories: Vec<Category>,
    pub campaigns: Vec<Campaign>,
    pub organizers: Vec<Organizer>,
    pub partners: Vec<Partner>,
}

impl ReferenceData {
    pub fn campaign(&self, id: &str) -> Option<&Campaign> {
        self.campaigns.iter().find(|c| c.id == id)
    }

    // Unknown ids resolve to themselves so a stale reference still renders.

    pub fn topic_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.topics
            .iter()
            .find(|t| t.id == id || t.slug.as_deref() == Some(id))
            .map(|t| t.name.as_str())
            .unwrap_or(id)
    }

    pub fn category_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.categories
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.as_str())
            .unwrap_or(id)
    }

    pub fn campaign_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.campaign(id).map(|c| c.name.as_str()).unwrap_or(id)
    }
}
