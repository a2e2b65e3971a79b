//! Status report export

use crate::error::{AvtrackError, Result};
use crate::gauge::Gauge;
use crate::models::{Aircraft, ComputedStatus, RuleType, StatusType};
use crate::status::overall_status;
use avtrack_common::format_hours;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Export format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Markdown,
}

impl std::str::FromStr for ExportFormat {
    type Err = AvtrackError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "markdown" | "md" => Ok(Self::Markdown),
            _ => Err(AvtrackError::validation(format!(
                "Unsupported export format: {s}"
            ))),
        }
    }
}

/// Evaluated maintenance for one aircraft at a point in time
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub tail: String,
    pub model: String,
    pub overall_status: StatusType,
    /// Most urgent first
    pub statuses: Vec<ComputedStatus>,
    pub generated_at: DateTime<Utc>,
}

impl StatusReport {
    #[must_use]
    pub fn new(
        aircraft: &Aircraft,
        statuses: Vec<ComputedStatus>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            tail: aircraft.tail.clone(),
            model: aircraft.model.clone(),
            overall_status: overall_status(&statuses),
            statuses,
            generated_at,
        }
    }

    /// Number of items with the given status
    #[must_use]
    pub fn count(&self, status: StatusType) -> usize {
        self.statuses.iter().filter(|s| s.status == status).count()
    }
}

/// Renders a [`StatusReport`] in one of the export formats
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportExporter;

impl ReportExporter {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Export a report in the specified format
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn export(&self, report: &StatusReport, format: ExportFormat) -> Result<String> {
        match format {
            ExportFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            ExportFormat::Csv => Ok(Self::export_csv(report)?),
            ExportFormat::Markdown => Ok(Self::export_markdown(report)?),
        }
    }

    fn export_csv(report: &StatusReport) -> std::result::Result<String, std::fmt::Error> {
        let mut csv = String::new();

        csv.push_str(
            "Item,Rule,Status,Due Date,Due Hours,Days Remaining,Hours Remaining,Due Text,Urgency\n",
        );
        for status in &report.statuses {
            writeln!(
                csv,
                "{},{},{},{},{},{},{},{},{}",
                escape_csv(&status.item.name),
                format_rule_type(status.item.rule_type),
                status.status.as_str(),
                format_due_date(status),
                status.due_hours.map(format_hours).unwrap_or_default(),
                status
                    .days_remaining
                    .map(|d| d.to_string())
                    .unwrap_or_default(),
                status.hours_remaining.map(format_hours).unwrap_or_default(),
                escape_csv(&status.due_text),
                status.urgency_score,
            )?;
        }

        Ok(csv)
    }

    fn export_markdown(report: &StatusReport) -> std::result::Result<String, std::fmt::Error> {
        let mut md = String::new();

        writeln!(md, "# Maintenance Status: {}\n", report.tail)?;
        writeln!(md, "**Aircraft:** {}", report.model)?;
        writeln!(md, "**Overall:** {}", report.overall_status)?;
        writeln!(
            md,
            "**Generated:** {}",
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(
            md,
            "**Summary:** {} overdue, {} due soon, {} good\n",
            report.count(StatusType::Overdue),
            report.count(StatusType::DueSoon),
            report.count(StatusType::Good)
        )?;

        if report.statuses.is_empty() {
            md.push_str("_No maintenance items._\n");
            return Ok(md);
        }

        md.push_str("| Item | Status | Due | Remaining |\n");
        md.push_str("|------|--------|-----|-----------|\n");
        for status in &report.statuses {
            writeln!(
                md,
                "| {} | {} | {} | {} |",
                escape_markdown(&status.item.name),
                status.status,
                status.due_text,
                Gauge::from_status(status).label
            )?;
        }

        Ok(md)
    }
}

const fn format_rule_type(rule_type: RuleType) -> &'static str {
    match rule_type {
        RuleType::Date => "DATE",
        RuleType::Hours => "HOURS",
        RuleType::DateOrHours => "DATE_OR_HOURS",
    }
}

fn format_due_date(status: &ComputedStatus) -> String {
    status
        .due_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn escape_csv(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Table cells are single-line, so line breaks become spaces
fn escape_markdown(s: &str) -> String {
    s.replace("\r\n", " ")
        .replace(['\r', '\n'], " ")
        .replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fleet::FleetLoader;
    use crate::models::Fleet;
    use crate::status::StatusEngine;
    use chrono::TimeZone;

    fn sample_report() -> StatusReport {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap();
        let fleet = Fleet::sample(&now);
        let aircraft = fleet.active_aircraft().unwrap();
        let statuses = aircraft.statuses(&StatusEngine::new(now));
        StatusReport::new(aircraft, statuses, now)
    }

    #[test]
    fn test_export_format_from_str() {
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!(
            "markdown".parse::<ExportFormat>().unwrap(),
            ExportFormat::Markdown
        );
        assert_eq!("md".parse::<ExportFormat>().unwrap(), ExportFormat::Markdown);
        assert!("opml".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_report_summary() {
        let report = sample_report();
        assert_eq!(report.tail, "N28PA");
        assert_eq!(report.overall_status, StatusType::DueSoon);
        assert_eq!(report.count(StatusType::DueSoon), 2);
        assert_eq!(report.count(StatusType::Good), 3);
        assert_eq!(report.count(StatusType::Overdue), 0);
    }

    #[test]
    fn test_export_json() {
        let report = sample_report();
        let json = ReportExporter::new()
            .export(&report, ExportFormat::Json)
            .unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["tail"], "N28PA");
        assert_eq!(parsed["overallStatus"], "due_soon");
        assert_eq!(parsed["statuses"].as_array().unwrap().len(), 5);
        assert_eq!(parsed["statuses"][0]["item"]["name"], "Annual Inspection");
        assert_eq!(parsed["statuses"][0]["daysRemaining"], 23);
    }

    #[test]
    fn test_export_csv() {
        let report = sample_report();
        let csv = ReportExporter::new()
            .export(&report, ExportFormat::Csv)
            .unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 6);
        assert!(lines[0].starts_with("Item,Rule,Status"));
        assert!(lines[1].starts_with("Annual Inspection,DATE,due_soon,2024-06-24,,23,,due in 23 days,"));
        assert!(lines[2].starts_with("Oil Change,HOURS,due_soon,,1250.0,,6.4,due in 6.4 hours,"));
    }

    #[test]
    fn test_export_csv_escapes_names() {
        let json = r#"{
            "aircraftList": [{
                "id": "a1", "tail": "N1", "model": "Test",
                "maintenanceItems": [
                    {"id": "1", "name": "Mag check, \"left\"", "ruleType": "DATE"}
                ]
            }],
            "activeAircraftId": "a1"
        }"#;
        let fleet = FleetLoader::new().load_str(json).unwrap();
        let aircraft = fleet.active_aircraft().unwrap();
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let report = StatusReport::new(aircraft, aircraft.statuses(&StatusEngine::new(now)), now);

        let csv = ReportExporter::new()
            .export(&report, ExportFormat::Csv)
            .unwrap();
        assert!(csv.contains("\"Mag check, \"\"left\"\"\",DATE,good"));
    }

    #[test]
    fn test_escape_csv_quotes_line_breaks() {
        assert_eq!(escape_csv("plain"), "plain");
        assert_eq!(escape_csv("line\nbreak"), "\"line\nbreak\"");
        assert_eq!(escape_csv("carriage\rreturn"), "\"carriage\rreturn\"");
    }

    #[test]
    fn test_escape_markdown_keeps_rows_single_line() {
        assert_eq!(escape_markdown("Mags | left\r\nright"), "Mags \\| left right");
        assert_eq!(escape_markdown("a\nb\rc"), "a b c");
    }

    #[test]
    fn test_export_markdown() {
        let report = sample_report();
        let md = ReportExporter::new()
            .export(&report, ExportFormat::Markdown)
            .unwrap();

        assert!(md.starts_with("# Maintenance Status: N28PA"));
        assert!(md.contains("**Overall:** DUE SOON"));
        assert!(md.contains("**Summary:** 0 overdue, 2 due soon, 3 good"));
        assert!(md.contains("| Annual Inspection | DUE SOON | due in 23 days | 23 days |"));
        assert!(md.contains("| Oil Change | DUE SOON | due in 6.4 hours | 6.4 hrs |"));
    }

    #[test]
    fn test_export_markdown_empty() {
        let report = StatusReport {
            tail: "N1".to_string(),
            model: "Test".to_string(),
            overall_status: StatusType::Good,
            statuses: Vec::new(),
            generated_at: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
        };
        let md = ReportExporter::new()
            .export(&report, ExportFormat::Markdown)
            .unwrap();
        assert!(md.contains("_No maintenance items._"));
    }
}
