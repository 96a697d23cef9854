//! Site configuration at ~/.config/festival/config.toml

use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::calendar::WeekStart;
use crate::constants::{DEFAULT_EVENT_URL_BASE, DEFAULT_SITE_DOMAIN};
use crate::date::parse_tz;
use crate::error::{FestivalError, FestivalResult};
use crate::ics::IcsOptions;
use crate::source::DataSource;

static DEFAULT_DATA_SOURCE: &str = "~/festival/data";

fn default_data_source() -> String {
    DEFAULT_DATA_SOURCE.to_string()
}

fn default_site_domain() -> String {
    DEFAULT_SITE_DOMAIN.to_string()
}

fn default_event_url_base() -> String {
    DEFAULT_EVENT_URL_BASE.to_string()
}

/// Values can also be set through `FESTIVAL_<FIELD>` environment variables,
/// e.g. `FESTIVAL_DATA_SOURCE=https://example.org/festival-2025/data`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SiteConfig {
    /// Directory holding `<dataset>.json` files, or an http(s) base URL
    #[serde(default = "default_data_source")]
    pub data_source: String,

    #[serde(default = "default_site_domain")]
    pub site_domain: String,

    #[serde(default = "default_event_url_base")]
    pub event_url_base: String,

    /// Viewer timezone; the system zone is used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,

    #[serde(default)]
    pub week_start: WeekStart,
}

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfig {
            data_source: default_data_source(),
            site_domain: default_site_domain(),
            event_url_base: default_event_url_base(),
            timezone: None,
            week_start: WeekStart::default(),
        }
    }
}

impl SiteConfig {
    pub fn config_path() -> FestivalResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| FestivalError::Config("Could not determine config directory".into()))?
            .join("festival");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the config file, writing a commented default on first run.
    pub fn load() -> FestivalResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> FestivalResult<Self> {
        let config: SiteConfig = Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix("FESTIVAL"))
            .build()
            .map_err(|e| FestivalError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| FestivalError::Config(e.to_string()))?;

        tracing::debug!(path = %path.display(), source = %config.data_source, "loaded site config");
        Ok(config)
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> FestivalResult<()> {
        let contents = format!(
            "\
# festival configuration

# Where event data is loaded from (directory or http(s) URL):
# data_source = \"{}\"

# Domain used in exported calendar UIDs:
# site_domain = \"{}\"

# Public event page base:
# event_url_base = \"{}\"

# Viewer timezone (defaults to the system timezone):
# timezone = \"Asia/Manila\"

# First column of the month grid (sunday or monday):
# week_start = \"sunday\"
",
            DEFAULT_DATA_SOURCE, DEFAULT_SITE_DOMAIN, DEFAULT_EVENT_URL_BASE
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;

        Ok(())
    }

    /// Effective configuration as TOML.
    pub fn to_toml(&self) -> FestivalResult<String> {
        toml::to_string_pretty(self).map_err(|e| FestivalError::Serialization(e.to_string()))
    }

    pub fn data_source(&self) -> FestivalResult<DataSource> {
        DataSource::parse(&self.data_source)
    }

    pub fn ics_options(&self) -> IcsOptions {
        IcsOptions {
            domain: self.site_domain.clone(),
            event_url_base: self.event_url_base.clone(),
        }
    }

    /// Configured viewer zone, if set and recognised.
    pub fn timezone(&self) -> Option<Tz> {
        let name = self.timezone.as_deref()?;
        let tz = parse_tz(name);
        if tz.is_none() {
            tracing::warn!(timezone = name, "unrecognised timezone in config, ignoring");
        }
        tz
    }
}
