//! Command tests: argument parsing and full runs against fleet files on disk

use clap::Parser;
use avtrack_cli::{current_time, load_state, resolve_config, run, Cli, Commands};
use avtrack_core::{AvtrackError, ConfigLoader, Fleet, Result, StatusType};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const FLEET: &str = r#"{
    "aircraftList": [
        {
            "id": "abc123",
            "tail": "N4521K",
            "model": "Cessna 182",
            "current": {"hobbs": 2210.4, "tach": 1980.0, "updatedAt": "2024-09-14"},
            "maintenanceItems": [
                {"id": "1", "name": "Annual Inspection", "ruleType": "DATE",
                 "intervalDays": 365, "lastCompletedAt": "2023-10-01T00:00:00"},
                {"id": "2", "name": "Oil Change", "ruleType": "HOURS",
                 "intervalHours": 50, "hourSource": "TACH", "lastCompletedHours": 1940.0},
                {"id": "3", "name": "ELT Battery", "ruleType": "DATE",
                 "intervalDays": 730, "lastCompletedAt": "2022-08-01T00:00:00"}
            ]
        },
        {
            "id": "def456",
            "tail": "N12345",
            "model": "Piper PA-28",
            "maintenanceItems": [
                {"id": "9", "name": "Pitot-Static Check", "ruleType": "DATE",
                 "intervalDays": 730, "lastCompletedAt": "2024-01-01T00:00:00"}
            ]
        }
    ],
    "activeAircraftId": "abc123",
    "notificationsEnabled": true
}"#;

const TODAY: &str = "2024-09-15";

fn parse(args: &[&str]) -> std::result::Result<Cli, clap::Error> {
    Cli::try_parse_from(std::iter::once("avtrack").chain(args.iter().copied()))
}

fn execute(args: &[&str]) -> Result<String> {
    let cli = parse(args).unwrap();
    let loader = ConfigLoader::new()
        .with_config_paths(Vec::<PathBuf>::new())
        .without_env_loading();
    let config = resolve_config(&cli, loader)?;

    let mut output = Vec::new();
    run(&cli, &config, &mut output)?;
    Ok(String::from_utf8(output).unwrap())
}

fn fleet_file(dir: &TempDir) -> String {
    let path = dir.path().join("fleet.json");
    std::fs::write(&path, FLEET).unwrap();
    path_arg(&path)
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

// ===========================
// Parsing
// ===========================

#[test]
fn test_parse_status_command() {
    let cli = parse(&["status", "--aircraft", "N4521K", "--json"]).unwrap();
    assert_eq!(
        cli.command,
        Commands::Status {
            aircraft: Some("N4521K".to_string()),
            json: true,
        }
    );
    assert!(!cli.verbose);
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = parse(&["status", "--today", TODAY, "--fleet", "other.json", "-v"]).unwrap();
    assert_eq!(cli.today.map(|d| d.to_string()), Some(TODAY.to_string()));
    assert_eq!(cli.fleet, Some(PathBuf::from("other.json")));
    assert!(cli.verbose);
}

#[test]
fn test_invalid_today_rejected() {
    assert!(parse(&["--today", "tomorrow", "status"]).is_err());
}

#[test]
fn test_write_requires_state() {
    assert!(parse(&["notify", "--write"]).is_err());
    assert!(parse(&["notify", "--write", "--state", "state.json"]).is_ok());
}

#[test]
fn test_export_defaults_to_json() {
    let cli = parse(&["export"]).unwrap();
    assert_eq!(
        cli.command,
        Commands::Export {
            aircraft: None,
            format: "json".to_string(),
            output: None,
        }
    );
}

#[test]
fn test_subcommand_required() {
    assert!(parse(&[]).is_err());
}

// ===========================
// Commands
// ===========================

#[test]
fn test_status_json_most_urgent_first() {
    let dir = TempDir::new().unwrap();
    let fleet = fleet_file(&dir);
    let output = execute(&["--fleet", &fleet, "--today", TODAY, "status", "--json"]).unwrap();

    let rows: serde_json::Value = serde_json::from_str(&output).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["id"], "3");
    assert_eq!(rows[0]["status"], "overdue");
    assert_eq!(rows[0]["daysRemaining"], -46);
    assert_eq!(rows[1]["dueText"], "due in 15 days");
    assert_eq!(rows[1]["dueDate"], "2024-09-30");
    assert_eq!(rows[2]["hoursRemaining"], 10.0);
    assert_eq!(rows[2]["color"], "#FFD60A");
}

#[test]
fn test_status_table_by_tail() {
    let dir = TempDir::new().unwrap();
    let fleet = fleet_file(&dir);
    let output = execute(&[
        "--fleet", &fleet, "--today", TODAY, "status", "--aircraft", "n12345",
    ])
    .unwrap();

    assert!(output.starts_with("N12345 (Piper PA-28): GOOD"));
    assert!(output.contains("Pitot-Static Check"));
    assert!(output.contains("(due 2025-12-31)"));
}

#[test]
fn test_status_unknown_aircraft() {
    let dir = TempDir::new().unwrap();
    let fleet = fleet_file(&dir);
    let result = execute(&["--fleet", &fleet, "status", "--aircraft", "N999ZZ"]);
    assert!(matches!(result, Err(AvtrackError::AircraftNotFound { .. })));
}

#[test]
fn test_missing_fleet_file() {
    let dir = TempDir::new().unwrap();
    let missing = path_arg(&dir.path().join("nope.json"));
    let result = execute(&["--fleet", &missing, "status"]);
    assert!(matches!(result, Err(AvtrackError::FleetNotFound { .. })));
}

#[test]
fn test_aircraft_list_marks_active() {
    let dir = TempDir::new().unwrap();
    let fleet = fleet_file(&dir);
    let output = execute(&["--fleet", &fleet, "--today", TODAY, "aircraft"]).unwrap();

    assert!(output.starts_with("Found 2 aircraft:"));
    assert!(output.contains("* N4521K Cessna 182 [abc123] 3 item(s), OVERDUE"));
    assert!(output.contains("  N12345 Piper PA-28 [def456] 1 item(s), GOOD"));
}

#[test]
fn test_notify_writes_state_and_goes_quiet() {
    let dir = TempDir::new().unwrap();
    let fleet = fleet_file(&dir);
    let state = path_arg(&dir.path().join("state.json"));
    let args: [&str; 8] = [
        "--fleet", &fleet, "--today", TODAY, "notify", "--state", &state, "--write",
    ];

    let first = execute(&args).unwrap();
    assert!(first.starts_with("Overdue: ELT Battery is overdue"));
    assert!(first.contains("Due soon: Annual Inspection due in 15 days"));
    assert!(first.contains("avtrack_maintenance_2_due_soon -> avtrack://maintenance/2"));
    assert!(first.contains("Weekly Summary: N4521K\n1 overdue. 2 due soon."));

    let saved = load_state(Path::new(&state)).unwrap();
    assert_eq!(saved.last_notified_status["3"], StatusType::Overdue);
    assert!(saved.last_weekly_digest.is_some());

    let second = execute(&args).unwrap();
    assert_eq!(second, "No reminders\n");
}

#[test]
fn test_notify_disabled_by_config() {
    let dir = TempDir::new().unwrap();
    let fleet = fleet_file(&dir);
    let config = dir.path().join("avtrack.json");
    std::fs::write(&config, r#"{"notifications": {"enabled": false}}"#).unwrap();

    let output = execute(&[
        "--fleet",
        &fleet,
        "--config",
        &path_arg(&config),
        "--today",
        TODAY,
        "notify",
    ])
    .unwrap();
    assert_eq!(output, "Notifications are disabled\nNo reminders\n");
}

#[test]
fn test_digest_for_second_aircraft() {
    let dir = TempDir::new().unwrap();
    let fleet = fleet_file(&dir);
    let output = execute(&[
        "--fleet", &fleet, "--today", TODAY, "digest", "--aircraft", "def456",
    ])
    .unwrap();
    assert_eq!(
        output,
        "Weekly Summary: N12345\nAll maintenance items are current. Great job!\n"
    );
}

#[test]
fn test_export_csv_to_file() {
    let dir = TempDir::new().unwrap();
    let fleet = fleet_file(&dir);
    let out = dir.path().join("report.csv");
    let output = execute(&[
        "--fleet",
        &fleet,
        "--today",
        TODAY,
        "export",
        "--format",
        "csv",
        "--output",
        &path_arg(&out),
    ])
    .unwrap();

    assert!(output.starts_with("Exported 3 item(s) to "));
    let content = std::fs::read_to_string(&out).unwrap();
    assert!(content.starts_with("Item,Rule,Status,Due Date,Due Hours"));
    assert!(content.contains("ELT Battery"));
}

#[test]
fn test_export_stamped_with_given_day() {
    let dir = TempDir::new().unwrap();
    let fleet = fleet_file(&dir);
    let output = execute(&["--fleet", &fleet, "--today", TODAY, "export"]).unwrap();

    let report: serde_json::Value = serde_json::from_str(&output).unwrap();
    let generated: DateTime<Utc> =
        serde_json::from_value(report["generatedAt"].clone()).unwrap();
    let expected = current_time(Some(TODAY.parse().unwrap())).with_timezone(&Utc);
    assert_eq!(generated, expected);
    assert_eq!(report["statuses"].as_array().unwrap().len(), 3);
}

#[test]
fn test_export_markdown_to_stdout() {
    let dir = TempDir::new().unwrap();
    let fleet = fleet_file(&dir);
    let output = execute(&[
        "--fleet", &fleet, "--today", TODAY, "export", "--format", "md",
    ])
    .unwrap();
    assert!(output.starts_with("# Maintenance Status: N4521K"));
    assert!(output.contains("**Overall:** OVERDUE"));
}

#[test]
fn test_sample_is_a_loadable_fleet() {
    let output = execute(&["--today", TODAY, "sample"]).unwrap();
    let fleet = Fleet::from_json(&output).unwrap();

    assert_eq!(fleet.aircraft_list.len(), 1);
    assert_eq!(fleet.active_aircraft().unwrap().tail, "N28PA");
}

#[test]
fn test_config_yaml_reflects_overrides() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("avtrack.yaml");
    std::fs::write(&config, "logging:\n  level: debug\n").unwrap();

    let output = execute(&[
        "--config",
        &path_arg(&config),
        "--fleet",
        "/srv/fleet.json",
        "config",
        "--yaml",
    ])
    .unwrap();
    assert!(output.contains("level: debug"));
    assert!(output.contains("/srv/fleet.json"));
}

#[test]
fn test_explicit_config_must_exist() {
    let dir = TempDir::new().unwrap();
    let missing = path_arg(&dir.path().join("missing.yaml"));
    let result = execute(&["--config", &missing, "config"]);
    assert!(matches!(result, Err(AvtrackError::Configuration { .. })));
}
