//! `slots` CLI — find free meeting slots and book them from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Free 30-minute slots in a window, busy intervals as JSON on stdin
//! echo '[{"start":"2026-03-02T10:00:00","end":"2026-03-02T10:30:00"}]' \
//!   | slots find --window-start 2026-03-02T09:00:00 --window-end 2026-03-02T12:00:00 --duration 30
//!
//! # Business-hours availability across whole days, against a calendar file
//! slots --calendar team.json check --from 2026-03-02 --to 2026-03-06 --duration 60
//!
//! # Existing commitments, using the offline calendar
//! slots --offline busy --from 2026-03-02 --to 2026-03-02
//!
//! # Book a slot (refused if it overlaps anything)
//! slots --calendar team.json book --title "Design sync" \
//!   --start 2026-03-02T14:00:00 --end 2026-03-02T15:00:00 --attendee a@example.com
//! ```
//!
//! Results are JSON on stdout. Logs go to stderr and are controlled by `RUST_LOG`.

use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use slot_engine::calendar::CalendarBackend;
use slot_engine::service::BookingRequest;
use slot_engine::{
    BusyInterval, JsonFileCalendar, OfflineCalendar, SchedulerConfig, SchedulingService,
    SearchWindow,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "slots",
    version,
    about = "Find free meeting slots and book them"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// IANA time zone to schedule in (overrides the config file)
    #[arg(long, global = true)]
    timezone: Option<String>,

    /// JSON calendar file to read busy times from and book into
    #[arg(long, global = true, conflicts_with = "offline")]
    calendar: Option<PathBuf>,

    /// Use the built-in offline calendar instead of a real one
    #[arg(long, global = true)]
    offline: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute free slots from busy intervals given as JSON
    Find {
        /// Start of the search window
        #[arg(long)]
        window_start: String,
        /// End of the search window
        #[arg(long)]
        window_end: String,
        /// Meeting length in minutes (defaults to the configured duration)
        #[arg(short, long)]
        duration: Option<i64>,
        /// JSON array of {start, end, summary?} busy intervals (reads stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Offer slots at any hour, not just business hours
        #[arg(long)]
        all_hours: bool,
        /// Maximum number of slots to return
        #[arg(long)]
        max_results: Option<usize>,
    },
    /// Business-hours availability across whole days of the calendar
    Check {
        /// First day (YYYY-MM-DD)
        #[arg(long)]
        from: String,
        /// Last day, inclusive (YYYY-MM-DD)
        #[arg(long)]
        to: String,
        /// Meeting length in minutes (defaults to the configured duration)
        #[arg(short, long)]
        duration: Option<i64>,
    },
    /// List existing commitments across whole days of the calendar
    Busy {
        /// First day (YYYY-MM-DD)
        #[arg(long)]
        from: String,
        /// Last day, inclusive (YYYY-MM-DD)
        #[arg(long)]
        to: String,
    },
    /// Create an event if it overlaps nothing on the calendar
    Book {
        #[arg(long)]
        title: String,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Attendee email (repeatable)
        #[arg(long = "attendee")]
        attendees: Vec<String>,
    },
}

/// Busy interval as accepted on the `find` input.
#[derive(Deserialize)]
struct BusyInput {
    start: String,
    end: String,
    #[serde(default)]
    summary: Option<String>,
}

#[derive(Serialize)]
struct SlotOutput {
    start: String,
    end: String,
    duration_minutes: i64,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Find {
            window_start,
            window_end,
            duration,
            input,
            all_hours,
            max_results,
        } => {
            let zone = config.zone()?;
            let window = SearchWindow::parse(&zone, &window_start, &window_end)
                .context("Invalid search window")?;

            let raw = read_input(input.as_deref())?;
            let busy = parse_busy(&raw, &zone)?;

            let duration = duration.unwrap_or(config.default_duration_minutes);
            let slots = config.finder()?.find_slots(
                &window,
                &busy,
                slot_engine::duration_from_minutes(duration)?,
                !all_hours,
                max_results.unwrap_or(config.max_results),
            )?;
            tracing::debug!(busy = busy.len(), slots = slots.len(), "find complete");

            let output: Vec<SlotOutput> = slots
                .iter()
                .map(|s| SlotOutput {
                    start: s.start.to_rfc3339(),
                    end: s.end.to_rfc3339(),
                    duration_minutes: s.duration_minutes,
                })
                .collect();
            print_json(&output)?;
        }
        Commands::Check { from, to, duration } => {
            let service = build_service(&config)?;
            let duration = duration.unwrap_or(service.default_duration_minutes());
            let report = service
                .check_availability(&from, &to, duration)
                .context("Failed to check availability")?;
            print_json(&report)?;
        }
        Commands::Busy { from, to } => {
            let service = build_service(&config)?;
            let report = service
                .busy_times(&from, &to)
                .context("Failed to list busy times")?;
            print_json(&report)?;
        }
        Commands::Book {
            title,
            start,
            end,
            description,
            attendees,
        } => {
            let service = build_service(&config)?;
            let booking = service
                .book(&BookingRequest {
                    title,
                    start,
                    end,
                    description,
                    attendees,
                })
                .context("Failed to book event")?;
            print_json(&booking)?;
        }
    }

    Ok(())
}

/// Load the config file (if any) and apply command-line overrides.
fn load_config(cli: &Cli) -> Result<SchedulerConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            SchedulerConfig::from_toml_str(&text)
                .with_context(|| format!("Invalid config: {}", path.display()))?
        }
        None => SchedulerConfig::default(),
    };

    if let Some(tz) = &cli.timezone {
        config.timezone = tz.clone();
    }
    if let Some(path) = &cli.calendar {
        config.calendar.file = Some(path.clone());
        config.calendar.offline = false;
    }
    if cli.offline {
        config.calendar.offline = true;
    }

    config.validate()?;
    Ok(config)
}

/// Pick the calendar backend the configuration names. There is no implicit
/// fallback: without `--offline` or a calendar file this is an error.
fn build_service(config: &SchedulerConfig) -> Result<SchedulingService<Box<dyn CalendarBackend>>> {
    let backend: Box<dyn CalendarBackend> = if config.calendar.offline {
        tracing::info!("using offline calendar");
        Box::new(OfflineCalendar::new())
    } else if let Some(path) = &config.calendar.file {
        Box::new(JsonFileCalendar::new(path.clone(), config.zone()?))
    } else {
        anyhow::bail!(
            "No calendar configured. Pass --offline or --calendar FILE, \
             or set [calendar] in the config file."
        );
    };

    Ok(SchedulingService::new(config, backend)?)
}

fn parse_busy(raw: &str, zone: &slot_engine::SchedulingZone) -> Result<Vec<BusyInterval>> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    let inputs: Vec<BusyInput> =
        serde_json::from_str(raw).context("Busy intervals must be a JSON array")?;

    inputs
        .iter()
        .map(|b| {
            BusyInterval::parse(zone, &b.start, &b.end, b.summary.as_deref())
                .with_context(|| format!("Invalid busy interval {} - {}", b.start, b.end))
        })
        .collect()
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
