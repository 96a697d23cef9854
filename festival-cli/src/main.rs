mod commands;
mod render;
mod utils;

use anyhow::{Context, Result};
use chrono_tz::Tz;
use clap::{Parser, Subcommand};
use festival_core::EventStore;
use festival_core::config::SiteConfig;
use festival_core::date::parse_tz;
use festival_core::source::DataSource;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::commands::FilterArgs;
use crate::utils::tui::create_spinner;

#[derive(Parser)]
#[command(name = "festival")]
#[command(about = "Browse, filter and export zero-waste festival events")]
struct Cli {
    /// Data directory or http(s) base URL (overrides config)
    #[arg(long, global = true)]
    data: Option<String>,

    /// Viewer timezone, e.g. "Asia/Manila" (overrides config)
    #[arg(long, global = true)]
    tz: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Data(DataCommand),

    /// Shareable query string for a filter selection
    Link {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Show the effective configuration
    Config,
}

/// Commands that need the event data loaded.
#[derive(Subcommand)]
enum DataCommand {
    /// List upcoming and past events grouped by day
    Events {
        #[command(flatten)]
        filters: FilterArgs,

        /// Month to list (YYYY-MM, defaults to the current month)
        #[arg(long)]
        month: Option<String>,

        /// List every upcoming event, not only the month's
        #[arg(long)]
        all_upcoming: bool,

        /// List every past event, not only the month's
        #[arg(long)]
        all_past: bool,
    },
    /// Month grid with event markers
    Calendar {
        #[command(flatten)]
        filters: FilterArgs,

        /// Month to show (YYYY-MM, defaults to the current month)
        #[arg(long)]
        month: Option<String>,

        /// Also list the events of this day (YYYY-MM-DD)
        #[arg(long)]
        day: Option<String>,
    },
    /// Show one event
    Show { id: String },
    /// Write one event as an .ics file
    Ics {
        id: String,

        /// Output file (prints to stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Write all filtered events as one .ics feed
    Export {
        #[command(flatten)]
        filters: FilterArgs,

        /// Output file (prints to stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Google Calendar link for one event
    Gcal {
        id: String,

        /// Open the link in the browser
        #[arg(long)]
        open: bool,
    },
    /// Countries that have events
    Countries,
    /// Featured campaigns and this week's events
    Campaigns,
    /// Events with a location on the map
    Map {
        #[command(flatten)]
        filters: FilterArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = SiteConfig::load()?;
    let tz = resolve_timezone(cli.tz.as_deref(), &config)?;

    let command = match cli.command {
        Commands::Config => return commands::config::run(&config),
        Commands::Link { filters } => return commands::link::run(filters, tz),
        Commands::Data(command) => command,
    };

    let mut store = load_store(cli.data.as_deref(), &config).await?;
    let now = commands::now_in(tz);

    match command {
        DataCommand::Events {
            filters,
            month,
            all_upcoming,
            all_past,
        } => {
            filters.apply(&mut store, &now);
            commands::events::run(&store, tz, month.as_deref(), all_upcoming, all_past)
        }
        DataCommand::Calendar { filters, month, day } => {
            filters.apply(&mut store, &now);
            commands::calendar::run(&store, tz, &config, month.as_deref(), day.as_deref())
        }
        DataCommand::Show { id } => commands::show::run(&store, &config, &id),
        DataCommand::Ics { id, output } => commands::ics::run(&store, &config, &id, output),
        DataCommand::Export { filters, output } => {
            filters.apply(&mut store, &now);
            commands::ics::export(&store, &config, output)
        }
        DataCommand::Gcal { id, open } => commands::gcal::run(&store, &id, open),
        DataCommand::Countries => commands::countries::run(&store),
        DataCommand::Campaigns => commands::campaigns::run(&store, tz),
        DataCommand::Map { filters } => {
            filters.apply(&mut store, &now);
            commands::map::run(&store)
        }
    }
}

/// `--tz`, then the config file, then the system zone, then UTC.
fn resolve_timezone(flag: Option<&str>, config: &SiteConfig) -> Result<Tz> {
    if let Some(name) = flag {
        return parse_tz(name).with_context(|| format!("Unknown timezone '{}'", name));
    }
    if let Some(tz) = config.timezone() {
        return Ok(tz);
    }
    let system = iana_time_zone::get_timezone().ok().and_then(|name| parse_tz(&name));
    Ok(system.unwrap_or(Tz::UTC))
}

async fn load_store(data_flag: Option<&str>, config: &SiteConfig) -> Result<EventStore> {
    let source = match data_flag {
        Some(s) => DataSource::parse(s)?,
        None => config.data_source()?,
    };

    let spinner = create_spinner(format!("Loading events from {}", source));
    let result = source.load().await;
    spinner.finish_and_clear();

    let snapshot = result.with_context(|| {
        format!(
            "Could not load event data from {}.\n\n\
            Point festival at a data directory or URL with:\n  \
            festival --data <path-or-url> events",
            source
        )
    })?;

    Ok(EventStore::new(snapshot))
}
