// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Shows the time around the world in the terminal.
//!
//! # Usage
//!
//! ```bash
//! meridian-clock add Tokyo
//! meridian-clock add "São Paulo"
//! meridian-clock show
//! meridian-clock share --origin https://clocks.example
//! meridian-clock show --query "locations=Lima%2CNairobi"
//! ```
//!
//! Places are resolved against a JSON catalog of location records (`--catalog`), and the
//! displayed list is kept in a JSON file (`--store`).

use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::pin::pin;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use meridian::RefreshOptions;
use meridian::timing::DialClock;
use meridian_dashboard::{Catalog, Dashboard, LocationLookup, LocationStore, share, startup_locations};
use tracing::Level;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::Layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser, Debug)]
#[command(name = "meridian-clock", version, about = "Shows the time around the world")]
struct Cli {
    /// File holding the displayed locations
    #[arg(long, value_name = "PATH", default_value = "meridian.json", global = true)]
    store: PathBuf,

    /// JSON catalog of known locations
    #[arg(long, value_name = "PATH", default_value = "catalog.json", global = true)]
    catalog: PathBuf,

    /// Refresh period of the dials in milliseconds, at most 1000
    #[arg(long, value_name = "MILLIS", default_value_t = 1000, global = true)]
    period_ms: u64,

    /// Most verbose level of the log written to standard error
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: Level,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Shows the dashboard until interrupted
    Show {
        /// Stop after this many refreshes
        #[arg(long, value_name = "N")]
        ticks: Option<u64>,

        /// Share-link query naming the cities to show instead of the stored ones
        #[arg(long, value_name = "QUERY")]
        query: Option<String>,
    },

    /// Looks up a place and adds it to the dashboard
    Add {
        /// City name as found in the catalog
        place: String,
    },

    /// Removes a city from the dashboard
    Remove {
        /// City name as shown by `list`
        city: String,
    },

    /// Lists the displayed locations
    List,

    /// Prints a link that opens the dashboard with the displayed cities
    Share {
        /// Address of the dashboard
        #[arg(long, value_name = "URL", default_value = "https://meridian.example")]
        origin: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    let store = LocationStore::open(&cli.store);

    match cli.command.unwrap_or(Command::Show { ticks: None, query: None }) {
        Command::Show { ticks, query } => {
            let options = RefreshOptions::default().with_period(Duration::from_millis(cli.period_ms));
            show(&store, &cli.catalog, options, ticks, query.as_deref()).await
        }
        Command::Add { place } => add(&store, &cli.catalog, &place),
        Command::Remove { city } => remove(&store, &city),
        Command::List => list(&store),
        Command::Share { origin } => {
            let locations = store.load()?;
            println!("{}", share::share_link(&origin, &locations));
            Ok(())
        }
    }
}

fn init_logging(level: Level) {
    let terminal_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(LevelFilter::from_level(level));

    tracing_subscriber::registry().with(terminal_layer).init();
}

fn open_catalog(path: &Path) -> Result<Catalog> {
    Catalog::from_path(path).with_context(|| format!("cannot load the location catalog from '{}'", path.display()))
}

async fn show(
    store: &LocationStore,
    catalog_path: &Path,
    options: RefreshOptions,
    ticks: Option<u64>,
    query: Option<&str>,
) -> Result<()> {
    let shares_cities = query.is_some_and(|query| !share::query_locations(query).is_empty());
    let catalog = if shares_cities { open_catalog(catalog_path)? } else { Catalog::default() };

    let locations = startup_locations(store, &catalog, query).context("cannot determine the locations to show")?;

    let clock = DialClock::new_tokio();
    let mut dashboard = Dashboard::new(&clock, options, locations);
    let redraw = std::io::stdout().is_terminal();

    draw(&dashboard, redraw);

    let mut shutdown = pin!(tokio::signal::ctrl_c());
    let mut remaining = ticks;

    while remaining != Some(0) {
        tokio::select! {
            ticked = dashboard.next_tick() => {
                if ticked == 0 {
                    break;
                }

                draw(&dashboard, redraw);
                remaining = remaining.map(|left| left.saturating_sub(1));
            }
            _ = &mut shutdown => break,
        }
    }

    tracing::debug!(timers = clock.active_timers(), "dashboard closed");
    Ok(())
}

fn draw(dashboard: &Dashboard, redraw: bool) {
    if redraw {
        // Clear the screen and move the cursor home.
        print!("\x1B[2J\x1B[H");
    }

    println!("{}", dashboard.render());
}

fn add(store: &LocationStore, catalog_path: &Path, place: &str) -> Result<()> {
    let location = open_catalog(catalog_path)?.lookup(place)?;
    let mut locations = store.load()?;

    if locations.iter().any(|known| known.city == location.city && known.timezone == location.timezone) {
        println!("{} is already shown", location.title());
        return Ok(());
    }

    println!("Added {} ({})", location.title(), location.timezone);
    locations.push(location);
    store.save(&locations)?;

    Ok(())
}

fn remove(store: &LocationStore, city: &str) -> Result<()> {
    let mut locations = store.load()?;

    let Some(index) = locations
        .iter()
        .position(|location| location.title().eq_ignore_ascii_case(city.trim()))
    else {
        bail!("'{city}' is not shown");
    };

    let removed = locations.remove(index);
    store.save(&locations)?;
    println!("Removed {}", removed.title());

    Ok(())
}

fn list(store: &LocationStore) -> Result<()> {
    let locations = store.load()?;

    if locations.is_empty() {
        println!("No locations yet. Add one with `meridian-clock add <PLACE>`.");
    }

    for location in &locations {
        println!("{:<28}{}", location.title(), location.description());
    }

    Ok(())
}
