//! avtrack CLI library
//!
//! Argument parsing, fleet and configuration resolution, and the printers
//! behind each subcommand. Printers write to any `Write` so tests can capture
//! their output.

pub mod logging;

use avtrack_common::{format_date, format_datetime, format_hours, parse_date, truncate_string};
use avtrack_core::dates::resolve_local;
use avtrack_core::{
    plan_refresh, plan_transitions, Aircraft, AvtrackConfig, AvtrackError, ComputedStatus,
    ConfigLoader, ExportFormat, Fleet, FleetLoader, Gauge, NotificationState, Reminder,
    ReportExporter, Result, StatusEngine, StatusPalette, StatusReport, StatusType, WeeklyDigest,
};
use chrono::{DateTime, Local, NaiveDate, NaiveTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const NAME_WIDTH: usize = 24;
const GAUGE_WIDTH: usize = 10;

#[derive(Parser, Debug)]
#[command(name = "avtrack")]
#[command(about = "Aircraft maintenance status tracker")]
#[command(version)]
pub struct Cli {
    /// Fleet document path (overrides configuration)
    #[arg(long, short, global = true)]
    pub fleet: Option<PathBuf>,

    /// Configuration file; replaces the default search locations
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Evaluate as of this date instead of today (YYYY-MM-DD)
    #[arg(long, global = true, value_parser = parse_date)]
    pub today: Option<NaiveDate>,

    /// Verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Show maintenance status, most urgent first
    Status {
        /// Aircraft id or tail number (defaults to the active aircraft)
        #[arg(long, short)]
        aircraft: Option<String>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// List aircraft in the fleet
    Aircraft,
    /// Plan reminders for items whose status escalated
    Notify {
        /// Aircraft id or tail number (defaults to the active aircraft)
        #[arg(long, short)]
        aircraft: Option<String>,
        /// Notification state file (defaults to the state in the fleet document)
        #[arg(long, short)]
        state: Option<PathBuf>,
        /// Save the updated state back to the state file
        #[arg(long, requires = "state")]
        write: bool,
        /// Plan the full reminder set instead of only escalations
        #[arg(long)]
        refresh: bool,
    },
    /// Show the weekly summary
    Digest {
        /// Aircraft id or tail number (defaults to the active aircraft)
        #[arg(long, short)]
        aircraft: Option<String>,
    },
    /// Export a status report
    Export {
        /// Aircraft id or tail number (defaults to the active aircraft)
        #[arg(long, short)]
        aircraft: Option<String>,
        /// Export format (json, csv, markdown)
        #[arg(long, default_value = "json")]
        format: String,
        /// Output file (defaults to stdout)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Print a sample fleet document
    Sample,
    /// Print the effective configuration
    Config {
        /// Print YAML instead of JSON
        #[arg(long)]
        yaml: bool,
    },
}

/// Load configuration for the given arguments
///
/// With `--config` only that file is read and it must exist. `--fleet`
/// overrides whatever path the configuration names.
///
/// # Errors
/// Returns an error if a configuration source is invalid
pub fn resolve_config(cli: &Cli, loader: ConfigLoader) -> Result<AvtrackConfig> {
    let loader = match &cli.config {
        Some(path) => loader.with_config_paths(vec![path]).strict(),
        None => loader,
    };
    let mut config = loader.load()?;
    if let Some(fleet) = &cli.fleet {
        config.data.fleet_path.clone_from(fleet);
    }
    Ok(config)
}

/// Load the fleet named by the configuration
///
/// # Errors
/// Returns an error if the fleet file is missing or malformed
pub fn load_fleet(config: &AvtrackConfig) -> Result<Fleet> {
    FleetLoader::new()
        .with_default_thresholds(config.thresholds.clone())
        .load_file(&config.data.fleet_path)
}

/// The evaluation instant: midnight of `today` if given, otherwise now
#[must_use]
pub fn current_time(today: Option<NaiveDate>) -> DateTime<Local> {
    match today {
        Some(date) => resolve_local(&Local, date.and_time(NaiveTime::MIN)),
        None => Local::now(),
    }
}

/// Status engine for `--today`, or for the system clock when absent
#[must_use]
pub fn engine_for(today: Option<NaiveDate>) -> StatusEngine<Local> {
    match today {
        Some(_) => StatusEngine::new(current_time(today)),
        None => StatusEngine::local(),
    }
}

/// One row of `status --json` output
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusView<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub status: StatusType,
    pub label: &'static str,
    pub color: &'a str,
    pub due_text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_remaining: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours_remaining: Option<f64>,
    pub gauge: Gauge,
}

impl<'a> StatusView<'a> {
    #[must_use]
    pub fn new(status: &'a ComputedStatus, palette: &'a StatusPalette) -> Self {
        Self {
            id: &status.item.id,
            name: &status.item.name,
            status: status.status,
            label: status.status.label(),
            color: palette.color_for(status.status),
            due_text: &status.due_text,
            due_date: status.due_date.map(|due| format_date(&due.date_naive())),
            days_remaining: status.days_remaining,
            hours_remaining: status.hours_remaining,
            gauge: Gauge::from_status(status),
        }
    }
}

/// Print an aircraft's statuses as a table
///
/// # Errors
/// Returns an error if writing fails
pub fn print_statuses<W: Write>(
    aircraft: &Aircraft,
    statuses: &[ComputedStatus],
    writer: &mut W,
) -> Result<()> {
    writeln!(
        writer,
        "{} ({}): {}",
        aircraft.tail,
        aircraft.model,
        avtrack_core::overall_status(statuses)
    )?;
    if statuses.is_empty() {
        writeln!(writer, "  No maintenance items")?;
        return Ok(());
    }

    for status in statuses {
        let gauge = Gauge::from_status(status);
        let name = truncate_string(&status.item.name, NAME_WIDTH);
        write!(
            writer,
            "  {name:<NAME_WIDTH$} {:<9} {} {:<10} {}",
            status.status.label(),
            gauge.bar(GAUGE_WIDTH),
            gauge.label,
            status.due_text
        )?;
        if let Some(due) = status.due_date {
            write!(writer, " (due {})", format_date(&due.date_naive()))?;
        }
        if let Some(hours) = status.due_hours {
            write!(writer, " (due at {} hrs)", format_hours(hours))?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Print an aircraft's statuses as JSON
///
/// # Errors
/// Returns an error if serialization or writing fails
pub fn print_statuses_json<W: Write>(
    statuses: &[ComputedStatus],
    palette: &StatusPalette,
    writer: &mut W,
) -> Result<()> {
    let views: Vec<StatusView<'_>> = statuses
        .iter()
        .map(|status| StatusView::new(status, palette))
        .collect();
    serde_json::to_writer_pretty(&mut *writer, &views)?;
    writeln!(writer)?;
    Ok(())
}

/// Print every aircraft, marking the active one
///
/// # Errors
/// Returns an error if writing fails
pub fn print_aircraft<W: Write>(
    fleet: &Fleet,
    engine: &StatusEngine<Local>,
    writer: &mut W,
) -> Result<()> {
    let active_id = fleet.active_aircraft().map(|aircraft| aircraft.id.as_str());
    writeln!(writer, "Found {} aircraft:", fleet.aircraft_list.len())?;
    for aircraft in &fleet.aircraft_list {
        let marker = if Some(aircraft.id.as_str()) == active_id {
            "*"
        } else {
            " "
        };
        let statuses = aircraft.statuses(engine);
        writeln!(
            writer,
            "{marker} {} {} [{}] {} item(s), {}",
            aircraft.tail,
            aircraft.model,
            aircraft.id,
            aircraft.maintenance_items.len(),
            avtrack_core::overall_status(&statuses)
        )?;
    }
    Ok(())
}

/// Print planned reminders
///
/// # Errors
/// Returns an error if writing fails
pub fn print_reminders<W: Write>(reminders: &[Reminder], writer: &mut W) -> Result<()> {
    if reminders.is_empty() {
        writeln!(writer, "No reminders")?;
        return Ok(());
    }
    for reminder in reminders {
        writeln!(writer, "{}: {}", reminder.title, reminder.body)?;
        writeln!(writer, "    {} -> {}", reminder.id, reminder.deep_link)?;
    }
    Ok(())
}

/// Print a weekly digest
///
/// # Errors
/// Returns an error if writing fails
pub fn print_digest<W: Write>(digest: &WeeklyDigest, writer: &mut W) -> Result<()> {
    writeln!(writer, "{}", digest.title)?;
    writeln!(writer, "{}", digest.body)?;
    Ok(())
}

/// Print the effective configuration
///
/// # Errors
/// Returns an error if serialization or writing fails
pub fn print_config<W: Write>(config: &AvtrackConfig, yaml: bool, writer: &mut W) -> Result<()> {
    let rendered = if yaml {
        config.to_yaml()?
    } else {
        config.to_json()?
    };
    writeln!(writer, "{}", rendered.trim_end())?;
    Ok(())
}

/// Read notification state; a missing file is an empty state
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed
pub fn load_state(path: &Path) -> Result<NotificationState> {
    if !path.exists() {
        debug!("No notification state at {}", path.display());
        return Ok(NotificationState::default());
    }
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Write notification state as pretty JSON
///
/// # Errors
/// Returns an error if serialization or writing fails
pub fn save_state(path: &Path, state: &NotificationState) -> Result<()> {
    std::fs::write(path, serde_json::to_string_pretty(state)?)?;
    info!("Saved notification state to {}", path.display());
    Ok(())
}

/// Outcome of a `notify` run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyPlan {
    pub reminders: Vec<Reminder>,
    pub digest: Option<WeeklyDigest>,
    pub state: NotificationState,
}

/// Plan reminders, and the weekly digest when one is due
#[must_use]
pub fn plan_notifications(
    aircraft: &Aircraft,
    statuses: &[ComputedStatus],
    previous: &NotificationState,
    enabled: bool,
    refresh: bool,
    now: DateTime<Utc>,
) -> NotifyPlan {
    let (reminders, mut state) = if refresh {
        let mut state = previous.clone();
        if enabled {
            state.record(statuses);
        }
        (plan_refresh(statuses, enabled), state)
    } else {
        plan_transitions(statuses, previous, enabled)
    };

    let digest = (enabled && previous.digest_due(now)).then(|| {
        state.last_weekly_digest = Some(now.to_rfc3339());
        WeeklyDigest::build(statuses, &aircraft.tail)
    });

    NotifyPlan {
        reminders,
        digest,
        state,
    }
}

/// Build and write an export, to `output` or to `writer`
///
/// # Errors
/// Returns an error for an unknown format or if writing fails
pub fn export_report<W: Write>(
    aircraft: &Aircraft,
    statuses: Vec<ComputedStatus>,
    format: &str,
    output: Option<&Path>,
    generated_at: DateTime<Utc>,
    writer: &mut W,
) -> Result<()> {
    let format: ExportFormat = format.parse()?;
    let report = StatusReport::new(aircraft, statuses, generated_at);
    let content = ReportExporter::new().export(&report, format)?;

    match output {
        Some(path) => {
            std::fs::write(path, &content)?;
            writeln!(
                writer,
                "Exported {} item(s) to {} at {}",
                report.statuses.len(),
                path.display(),
                format_datetime(&generated_at)
            )?;
        }
        None => writeln!(writer, "{}", content.trim_end())?,
    }
    Ok(())
}

/// Run one command against a loaded configuration
///
/// # Errors
/// Returns an error if the fleet cannot be loaded or output fails
pub fn run<W: Write>(cli: &Cli, config: &AvtrackConfig, writer: &mut W) -> Result<()> {
    let now = current_time(cli.today);
    let engine = engine_for(cli.today);
    let now_utc = now.with_timezone(&Utc);

    match &cli.command {
        Commands::Status { aircraft, json } => {
            let fleet = load_fleet(config)?;
            let selected = fleet.select(aircraft.as_deref())?;
            let statuses = selected.statuses(&engine);
            if *json {
                print_statuses_json(&statuses, &config.palette, writer)?;
            } else {
                print_statuses(selected, &statuses, writer)?;
            }
        }
        Commands::Aircraft => {
            let fleet = load_fleet(config)?;
            print_aircraft(&fleet, &engine, writer)?;
        }
        Commands::Notify {
            aircraft,
            state,
            write,
            refresh,
        } => {
            let fleet = load_fleet(config)?;
            let selected = fleet.select(aircraft.as_deref())?;
            let statuses = selected.statuses(&engine);
            let previous = match state {
                Some(path) => load_state(path)?,
                None => fleet.notification_state.clone(),
            };
            let enabled = config.notifications.resolve(fleet.notifications_enabled);
            if !enabled {
                writeln!(writer, "Notifications are disabled")?;
            }

            let plan =
                plan_notifications(selected, &statuses, &previous, enabled, *refresh, now_utc);
            print_reminders(&plan.reminders, writer)?;
            if let Some(digest) = &plan.digest {
                writeln!(writer)?;
                print_digest(digest, writer)?;
            }
            if *write {
                let path = state
                    .as_deref()
                    .ok_or_else(|| AvtrackError::validation("--write needs --state"))?;
                save_state(path, &plan.state)?;
            }
        }
        Commands::Digest { aircraft } => {
            let fleet = load_fleet(config)?;
            let selected = fleet.select(aircraft.as_deref())?;
            let digest = WeeklyDigest::build(&selected.statuses(&engine), &selected.tail);
            print_digest(&digest, writer)?;
        }
        Commands::Export {
            aircraft,
            format,
            output,
        } => {
            let fleet = load_fleet(config)?;
            let selected = fleet.select(aircraft.as_deref())?;
            export_report(
                selected,
                selected.statuses(&engine),
                format,
                output.as_deref(),
                now_utc,
                writer,
            )?;
        }
        Commands::Sample => {
            let sample = Fleet::sample(&now);
            serde_json::to_writer_pretty(&mut *writer, &sample)?;
            writeln!(writer)?;
        }
        Commands::Config { yaml } => print_config(config, *yaml, writer)?,
    }
    Ok(())
}
