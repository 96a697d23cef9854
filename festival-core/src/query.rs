//! Sharing filter criteria through URL query strings.
//!
//! Keys: `q`, `country`, `category`, `modality`, `topics`, `tags`, `dateFrom`,
//! `dateTo`, `campaign`. Multi-valued fields are comma-joined and empty values
//! are left out, so default criteria encode to an empty string.

use url::form_urlencoded;

use crate::filter::{FilterCriteria, FilterPatch};

impl FilterCriteria {
    /// `(key, value)` pairs for every active criterion.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let join = |set: &std::collections::BTreeSet<String>| {
            set.iter().map(String::as_str).collect::<Vec<_>>().join(",")
        };

        let pairs = [
            ("q", Some(self.query.clone())),
            ("country", self.country.clone()),
            ("category", self.category.clone()),
            ("modality", self.modality.clone()),
            ("topics", Some(join(&self.topics))),
            ("tags", Some(join(&self.tags))),
            ("dateFrom", self.date_from.as_ref().map(|d| d.raw().to_string())),
            ("dateTo", self.date_to.as_ref().map(|d| d.raw().to_string())),
            ("campaign", self.campaign.clone()),
        ];

        pairs
            .into_iter()
            .filter_map(|(key, value)| value.filter(|v| !v.is_empty()).map(|v| (key, v)))
            .collect()
    }

    /// URL-encoded query string, without a leading `?`.
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.to_query_pairs())
            .finish()
    }

    /// Criteria from a query string (with or without a leading `?`).
    /// Unknown keys are ignored.
    pub fn from_query(query: &str) -> Self {
        FilterCriteria::default().merged(FilterPatch::from_query(query))
    }
}

impl FilterPatch {
    /// Patch naming only the keys present in `query`.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let split = |v: &str| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect::<Vec<_>>()
        };

        let mut patch = FilterPatch::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "q" => patch.query = Some(value.into_owned()),
                "country" => patch.country = Some(value.into_owned()),
                "category" => patch.category = Some(value.into_owned()),
                "modality" => patch.modality = Some(value.into_owned()),
                "topics" => patch.topics = Some(split(&value)),
                "tags" => patch.tags = Some(split(&value)),
                "dateFrom" => patch.date_from = Some(value.into_owned()),
                "dateTo" => patch.date_to = Some(value.into_owned()),
                "campaign" => patch.campaign = Some(value.into_owned()),
                other => tracing::debug!(key = other, "ignoring unknown query parameter"),
            }
        }
        patch
    }
}
