mod render;

use std::fs;
use std::io::{self, Read};
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono_tz::Tz;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use viewing_engine::{
    build_schedule, check_conflict, parse_appointments, parse_gap, parse_timezone, Appointment,
    ScheduleOptions, TimeInterval,
};

#[derive(Parser)]
#[command(name = "viewings", version)]
#[command(about = "Check viewing-appointment conflicts and lay out an agent's daily schedule")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a candidate viewing window against existing appointments.
    /// Exits with status 2 when the window is rejected and 1 on bad input.
    Check {
        /// Candidate start (RFC 3339)
        #[arg(short, long)]
        start: String,

        /// Candidate end (RFC 3339)
        #[arg(short, long)]
        end: String,

        /// Id of the appointment being edited; it is never checked against itself
        #[arg(long)]
        exclude: Option<String>,

        #[command(flatten)]
        snapshot: SnapshotArgs,
    },
    /// Merge appointments into per-day sessions with free time between parties
    Schedule {
        /// Largest gap that still joins two viewings of the same party (e.g. "30m", "1h")
        #[arg(long, default_value = "30m", env = "VIEWINGS_MERGE_GAP")]
        merge_gap: String,

        /// Also lay out completed and cancelled appointments
        #[arg(long)]
        include_inactive: bool,

        #[command(flatten)]
        snapshot: SnapshotArgs,
    },
}

/// Exit status of `check` for a rejected window. Errors exit with 1.
const EXIT_REJECTED: u8 = 2;

#[derive(Args)]
struct SnapshotArgs {
    /// JSON array of appointment records; "-" reads stdin
    #[arg(short, long, default_value = "-")]
    appointments: String,

    /// IANA timezone for calendar days and messages
    #[arg(long, default_value = "UTC", env = "VIEWINGS_TIMEZONE")]
    timezone: String,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Text,
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            start,
            end,
            exclude,
            snapshot,
        } => run_check(&start, &end, exclude.as_deref(), &snapshot),
        Commands::Schedule {
            merge_gap,
            include_inactive,
            snapshot,
        } => run_schedule(&merge_gap, include_inactive, &snapshot),
    }
}

fn run_check(start: &str, end: &str, exclude: Option<&str>, snapshot: &SnapshotArgs) -> Result<ExitCode> {
    let candidate = TimeInterval::parse(start, end).context("Invalid candidate window")?;
    let (appointments, tz) = load_snapshot(snapshot)?;

    let check = check_conflict(&candidate, &appointments, exclude);
    info!(
        has_conflict = check.has_conflict(),
        checked = appointments.len(),
        "conflict check complete"
    );

    match snapshot.format {
        Format::Json => {
            println!("{}", serde_json::to_string_pretty(&check.report(&tz))?);
        }
        Format::Text => match check.message(&tz) {
            Some(message) => println!("{message}"),
            None => println!("No conflict"),
        },
    }

    Ok(if check.has_conflict() {
        ExitCode::from(EXIT_REJECTED)
    } else {
        ExitCode::SUCCESS
    })
}

fn run_schedule(merge_gap: &str, include_inactive: bool, snapshot: &SnapshotArgs) -> Result<ExitCode> {
    let merge_gap = parse_gap(merge_gap).context("Invalid --merge-gap")?;
    let (appointments, timezone) = load_snapshot(snapshot)?;

    let options = ScheduleOptions {
        merge_gap,
        timezone,
        include_inactive,
    };
    let schedule = build_schedule(&appointments, &options);
    info!(days = schedule.len(), "schedule built");

    match snapshot.format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&schedule)?),
        Format::Text => print!("{}", render::schedule_text(&schedule, &timezone)),
    }
    Ok(ExitCode::SUCCESS)
}

fn load_snapshot(args: &SnapshotArgs) -> Result<(Vec<Appointment>, Tz)> {
    let tz = parse_timezone(&args.timezone)?;

    let json = if args.appointments == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read appointments from stdin")?;
        buf
    } else {
        fs::read_to_string(&args.appointments)
            .with_context(|| format!("Failed to read {}", args.appointments))?
    };

    let appointments = parse_appointments(&json)
        .with_context(|| format!("Failed to parse appointments from {}", args.appointments))?;
    debug!(count = appointments.len(), timezone = %tz, "loaded appointment snapshot");
    Ok((appointments, tz))
}
