//! `clinic-slots` CLI — inspect a clinic availability config from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Open hours of a clinic on a date
//! clinic-slots -c clinic.json resolve --date 2026-03-16
//!
//! # Bookable slots for a room, as JSON
//! clinic-slots -c clinic.json --json slots --date 2026-03-21 --room R1
//!
//! # Same slots pinned to the clinic timezone
//! clinic-slots -c clinic.json slots --date 2026-03-21 --utc
//!
//! # Periods the calendar greys out
//! clinic-slots -c clinic.json blackout --date 2026-03-16
//!
//! # Would this appointment be accepted? (exit code 1 if not)
//! clinic-slots -c clinic.json check --start 2026-03-16T09:00 --end 2026-03-16T09:30
//!
//! # Lint a config before saving it (exit code 1 on issues)
//! cat clinic.json | clinic-slots -c - validate
//!
//! # Print the fallback config used for clinics without a record
//! clinic-slots default-config
//! ```
//!
//! Without `--config` the fallback clinic hours are used. Logging goes to
//! stderr and is controlled with `RUST_LOG` (default `warn`).

use std::io::{self, Read};
use std::process;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use clap::{Parser, Subcommand};
use serde::Serialize;
use slot_engine::{AvailabilityConfig, ClinicAvailability, DstPolicy, SlotTime};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "clinic-slots",
    version,
    about = "Clinic availability, bookable slots and booking checks"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Availability config JSON file ("-" reads stdin; fallback hours if omitted)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the open intervals for a date
    Resolve {
        /// Date to resolve (YYYY-MM-DD)
        #[arg(short, long)]
        date: NaiveDate,
        /// Room id (clinic-wide hours if omitted)
        #[arg(short, long)]
        room: Option<String>,
    },
    /// List bookable slots of the configured length
    Slots {
        #[arg(short, long)]
        date: NaiveDate,
        #[arg(short, long)]
        room: Option<String>,
        /// Print slots as absolute times in the clinic timezone
        #[arg(long)]
        utc: bool,
        /// Drop slots that fall into a DST gap instead of shifting them
        #[arg(long, requires = "utc")]
        skip_dst_gaps: bool,
    },
    /// List the non-bookable periods of a date
    Blackout {
        #[arg(short, long)]
        date: NaiveDate,
        #[arg(short, long)]
        room: Option<String>,
    },
    /// Check whether an appointment fits the available hours
    Check {
        /// Appointment start (YYYY-MM-DDTHH:MM[:SS])
        #[arg(long, value_parser = parse_datetime)]
        start: NaiveDateTime,
        /// Appointment end (YYYY-MM-DDTHH:MM[:SS])
        #[arg(long, value_parser = parse_datetime)]
        end: NaiveDateTime,
        #[arg(short, long)]
        room: Option<String>,
    },
    /// Validate the config and report problems
    Validate,
    /// Print the fallback config as JSON
    DefaultConfig,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if matches!(cli.command, Commands::DefaultConfig) {
        let pretty = serde_json::to_string_pretty(&AvailabilityConfig::default())?;
        println!("{}", pretty);
        return Ok(());
    }

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Resolve { date, room } => {
            note_room_fallback(&config, room.as_deref());
            let ranges = slot_engine::resolve_availability(&config, date, room.as_deref());
            print_spans(&ranges, cli.json, "closed")?;
        }
        Commands::Slots {
            date,
            room,
            utc,
            skip_dst_gaps,
        } => {
            note_room_fallback(&config, room.as_deref());
            let clinic = ClinicAvailability::configured(config);
            if utc {
                let policy = if skip_dst_gaps {
                    DstPolicy::Skip
                } else {
                    DstPolicy::ShiftForward
                };
                let zoned = clinic
                    .zoned_slots(date, room.as_deref(), policy)
                    .context("Failed to localize slots")?;
                let rows: Vec<ZonedRow> = zoned
                    .iter()
                    .map(|z| ZonedRow {
                        start: z.start.to_rfc3339(),
                        end: z.end.to_rfc3339(),
                    })
                    .collect();
                if cli.json {
                    println!("{}", serde_json::to_string_pretty(&rows)?);
                } else {
                    for row in &rows {
                        println!("{}/{}", row.start, row.end);
                    }
                }
            } else {
                let slots = clinic
                    .try_available_slots(date, room.as_deref())
                    .context("Failed to generate slots")?;
                print_spans(&slots, cli.json, "closed")?;
            }
        }
        Commands::Blackout { date, room } => {
            note_room_fallback(&config, room.as_deref());
            let periods = ClinicAvailability::configured(config)
                .try_non_bookable_periods(date, room.as_deref())
                .context("Failed to compute non-bookable periods")?;
            print_spans(&periods, cli.json, "none")?;
        }
        Commands::Check { start, end, room } => {
            note_room_fallback(&config, room.as_deref());
            let clinic = ClinicAvailability::configured(config);
            let mut reason = None;
            let available =
                clinic.validate_and_notify(start, end, room.as_deref(), |m| {
                    reason = Some(m.to_string())
                });

            if cli.json {
                let out = CheckResult { available, reason };
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else if available {
                println!("available");
            } else {
                println!("rejected: {}", reason.unwrap_or_default());
            }
            if !available {
                process::exit(1);
            }
        }
        Commands::Validate => {
            let issues: Vec<String> = slot_engine::validate_config(&config)
                .iter()
                .map(ToString::to_string)
                .collect();

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&issues)?);
            } else if issues.is_empty() {
                println!("ok");
            } else {
                for issue in &issues {
                    println!("{}", issue);
                }
            }
            if !issues.is_empty() {
                process::exit(1);
            }
        }
        Commands::DefaultConfig => unreachable!("handled before loading a config"),
    }

    Ok(())
}

#[derive(Serialize)]
struct ZonedRow {
    start: String,
    end: String,
}

#[derive(Serialize)]
struct CheckResult {
    available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

/// Parse a local date-time with or without seconds.
fn parse_datetime(s: &str) -> std::result::Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .map_err(|e| format!("expected YYYY-MM-DDTHH:MM[:SS]: {}", e))
}

fn load_config(path: Option<&str>) -> Result<AvailabilityConfig> {
    match path {
        Some(path) => {
            let json = read_input(path)?;
            AvailabilityConfig::from_json(&json)
                .with_context(|| format!("Failed to parse availability config: {}", path))
        }
        None => {
            info!("no config given, using fallback clinic hours");
            Ok(AvailabilityConfig::default())
        }
    }
}

fn note_room_fallback(config: &AvailabilityConfig, room: Option<&str>) {
    if let Some(room) = room {
        if config.room(Some(room)).is_none() {
            debug!("room {} has no schedule of its own, using clinic hours", room);
        }
    }
}

/// `HH:MM-HH:MM`, with a span ending at the next midnight shown as `24:00`.
fn format_span(span: &SlotTime) -> String {
    let end = if span.end.date() > span.start.date() && span.end.time() == NaiveTime::MIN {
        "24:00".to_string()
    } else {
        span.end.format("%H:%M").to_string()
    };
    format!("{}-{}", span.start.format("%H:%M"), end)
}

/// Print spans as text lines (or `empty_label` when there are none), or as JSON.
fn print_spans(spans: &[SlotTime], json: bool, empty_label: &str) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(spans)?);
    } else if spans.is_empty() {
        println!("{}", empty_label);
    } else {
        for span in spans {
            println!("{}", format_span(span));
        }
    }
    Ok(())
}

fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read from stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
    }
}
