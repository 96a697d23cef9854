//! Bulk loading of events and reference data.
//!
//! A data source is either a directory or an http(s) base URL holding one
//! `<dataset>.json` file per dataset. All datasets load concurrently and the
//! load is all-or-nothing.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{FestivalError, FestivalResult};
use crate::event::Event;
use crate::reference::ReferenceData;

/// Everything the store needs, delivered in one piece.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub events: Vec<Event>,
    pub reference: ReferenceData,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Directory(PathBuf),
    Http(Url),
}

impl DataSource {
    /// `http://` and `https://` inputs are URLs, anything else is a
    /// directory (with `~` expanded).
    pub fn parse(s: &str) -> FestivalResult<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(FestivalError::InvalidDataSource(s.to_string()));
        }

        if s.starts_with("http://") || s.starts_with("https://") {
            let url = Url::parse(s).map_err(|_| FestivalError::InvalidDataSource(s.to_string()))?;
            return Ok(DataSource::Http(url));
        }

        Ok(DataSource::Directory(PathBuf::from(shellexpand::tilde(s).into_owned())))
    }

    pub async fn load(&self) -> FestivalResult<Snapshot> {
        let client = reqwest::Client::new();

        let (events, topics, categories, campaigns, organizers, partners) = tokio::try_join!(
            self.dataset::<Event>(&client, "events", true),
            self.dataset(&client, "topics", false),
            self.dataset(&client, "categories", false),
            self.dataset(&client, "campaigns", false),
            self.dataset(&client, "organizers", false),
            self.dataset(&client, "partners", false),
        )?;

        tracing::debug!(source = %self, events = events.len(), "loaded snapshot");

        Ok(Snapshot {
            events,
            reference: ReferenceData {
                topics,
                categories,
                campaigns,
                organizers,
                partners,
            },
        })
    }

    async fn dataset<T: DeserializeOwned>(
        &self,
        client: &reqwest::Client,
        name: &str,
        required: bool,
    ) -> FestivalResult<Vec<T>> {
        let body = match self {
            DataSource::Directory(dir) => read_dataset_file(dir, name, required).await?,
            DataSource::Http(base) => Some(fetch_dataset(client, base, name).await?),
        };

        match body {
            Some(bytes) => serde_json::from_slice(&bytes).map_err(|e| FestivalError::unavailable(name, e)),
            None => Ok(Vec::new()),
        }
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            DataSource::Directory(dir) => write!(f, "{}", dir.display()),
            DataSource::Http(url) => write!(f, "{}", url),
        }
    }
}

/// `None` when an optional dataset file is absent.
async fn read_dataset_file(dir: &Path, name: &str, required: bool) -> FestivalResult<Option<Vec<u8>>> {
    let path = dir.join(format!("{}.json", name));
    match tokio::fs::read(&path).await {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && !required => {
            tracing::debug!(path = %path.display(), "optional dataset missing, using empty list");
            Ok(None)
        }
        Err(e) => Err(FestivalError::unavailable(name, format!("{}: {}", path.display(), e))),
    }
}

async fn fetch_dataset(client: &reqwest::Client, base: &Url, name: &str) -> FestivalResult<Vec<u8>> {
    let url = format!("{}/{}.json", base.as_str().trim_end_matches('/'), name);

    let response = client
        .get(&url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| FestivalError::unavailable(name, e))?;

    let bytes = response
        .bytes()
        .await
        .map_err(|e| FestivalError::unavailable(name, e))?;

    Ok(bytes.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EVENTS: &str = r#"[
        {"id":"evt-1","title":"Beach Cleanup","start_datetime":"2025-07-05T09:00:00+08:00",
         "end_datetime":"2025-07-05T11:00:00+08:00","country":"Philippines"},
        {"id":"evt-2","title":"Zero Waste Product Fair","start_datetime":"2025-07-12T10:00:00+07:00",
         "end_datetime":"2025-07-12T14:00:00+07:00","country":"Thailand"}
    ]"#;

    #[test]
    fn parses_urls_and_directories() {
        assert!(matches!(
            DataSource::parse("https://example.org/festival-2025/data").unwrap(),
            DataSource::Http(_)
        ));
        assert_eq!(
            DataSource::parse("/srv/festival").unwrap(),
            DataSource::Directory(PathBuf::from("/srv/festival"))
        );
        assert!(matches!(
            DataSource::parse("~/festival").unwrap(),
            DataSource::Directory(p) if !p.starts_with("~")
        ));
        assert!(DataSource::parse("  ").is_err());
        assert!(DataSource::parse("http://").is_err());
    }

    #[tokio::test]
    async fn loads_directory_with_missing_reference_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("events.json"), EVENTS).unwrap();
        std::fs::write(
            dir.path().join("topics.json"),
            r#"[{"id":"ocean-conservation","name":"Ocean Conservation"}]"#,
        )
        .unwrap();

        let snapshot = DataSource::Directory(dir.path().to_path_buf()).load().await.unwrap();

        assert_eq!(snapshot.events.len(), 2);
        assert_eq!(snapshot.events[1].id, "evt-2");
        assert_eq!(snapshot.reference.topics.len(), 1);
        assert!(snapshot.reference.campaigns.is_empty());
    }

    #[tokio::test]
    async fn draft_event_without_end_still_loads() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("events.json"),
            r#"[{"id":"evt-9","title":"Draft","start_datetime":"2025-07-05T09:00:00+08:00","end_datetime":null}]"#,
        )
        .unwrap();

        let snapshot = DataSource::Directory(dir.path().to_path_buf()).load().await.unwrap();
        assert_eq!(snapshot.events[0].end(), snapshot.events[0].start);
    }

    #[tokio::test]
    async fn missing_events_file_fails_the_load() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("topics.json"), "[]").unwrap();

        let err = DataSource::Directory(dir.path().to_path_buf()).load().await.unwrap_err();
        assert!(matches!(err, FestivalError::DataUnavailable { ref dataset, .. } if dataset == "events"));
    }

    #[tokio::test]
    async fn malformed_reference_file_fails_the_load() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("events.json"), EVENTS).unwrap();
        std::fs::write(dir.path().join("campaigns.json"), "{ not json").unwrap();

        let err = DataSource::Directory(dir.path().to_path_buf()).load().await.unwrap_err();
        assert!(matches!(err, FestivalError::DataUnavailable { ref dataset, .. } if dataset == "campaigns"));
    }
}
