/// Domain used in ICS UIDs (`evt-<id>@<domain>`).
pub const DEFAULT_SITE_DOMAIN: &str = "zerowaste.asia";

/// Base of the canonical public event page.
pub const DEFAULT_EVENT_URL_BASE: &str = "https://zerowaste.asia/festival/event";

pub const ICS_PRODID: &str = "-//Zero Waste Asia//Festival//EN";

/// Forward window for the "this week" strip.
pub const THIS_WEEK_DAYS: i64 = 7;

/// How many events a highlight strip shows.
pub const HIGHLIGHT_LIMIT: usize = 6;
