//! `logvigil analyze` command handler

use std::io::Write;
use std::path::PathBuf;

use chrono::{Datelike, Utc};
use colored::Colorize;
use serde::Serialize;
use tracing::info;

use logvigil_analyzer::{AnalysisEngine, Blacklist};
use logvigil_core::config::VigilConfig;
use logvigil_core::error::VigilError;
use logvigil_core::types::{Incident, IncidentDetails};

use crate::cli::AnalyzeArgs;
use crate::error::CliError;
use crate::export::export_incidents;
use crate::output::{OutputWriter, Render};

/// Execute the `analyze` command.
///
/// Parses the given log files, runs the detection engine, renders the
/// incident report, and writes report files unless `--no-export` is set.
pub fn execute(
    args: AnalyzeArgs,
    config: &VigilConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    if args.http_log.is_none() && args.ssh_log.is_none() {
        return Err(CliError::Command(
            "nothing to analyze: pass --http-log and/or --ssh-log".to_owned(),
        ));
    }

    let engine = AnalysisEngine::from_config(config)?;

    let http_events = match &args.http_log {
        Some(path) => logvigil_parser::apache::parse_file(path)?,
        None => Vec::new(),
    };

    // auth.log timestamps carry no year, so one must be supplied
    let reference_year = args.year.unwrap_or_else(|| Utc::now().year());
    let auth_events = match &args.ssh_log {
        Some(path) => logvigil_parser::ssh::parse_file(path, reference_year)?,
        None => Vec::new(),
    };

    let blacklist = if config.blacklist.enabled {
        Blacklist::load(&config.blacklist.path).map_err(VigilError::from)?
    } else {
        Blacklist::empty()
    };

    let incidents = engine.run(&http_events, &auth_events, &blacklist);

    let report = AnalysisReport {
        http_events: http_events.len(),
        auth_events: auth_events.len(),
        blacklist_entries: blacklist.len(),
        incidents,
    };

    writer.render(&report)?;

    if !args.no_export {
        let out_dir = args
            .out_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.report.out_dir));
        let written = export_incidents(
            &report.incidents,
            &out_dir,
            &config.report.base_name,
            &config.report.formats,
        )?;
        info!(files = written.len(), "export complete");
    }

    Ok(())
}

/// Final payload of an `analyze` run.
#[derive(Debug, Serialize)]
pub struct AnalysisReport {
    /// Number of HTTP events analyzed.
    pub http_events: usize,
    /// Number of SSH auth events analyzed.
    pub auth_events: usize,
    /// Number of blacklist entries loaded.
    pub blacklist_entries: usize,
    /// Final deduplicated, enriched incident collection.
    pub incidents: Vec<Incident>,
}

/// One-line metric summary for an incident, e.g. `max_count=25`.
fn metric_summary(details: &IncidentDetails) -> String {
    match details {
        IncidentDetails::HttpBruteForce {
            status_code,
            max_count,
        } => format!("status={status_code} max_count={max_count}"),
        IncidentDetails::SshBruteForce { max_failed } => format!("max_failed={max_failed}"),
        IncidentDetails::RequestFlood { requests_in_minute } => {
            format!("requests_in_minute={requests_in_minute}")
        }
        IncidentDetails::EndpointScan { distinct_endpoints } => {
            format!("distinct_endpoints={distinct_endpoints}")
        }
    }
}

impl Render for AnalysisReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(
            w,
            "Analyzed {} HTTP events, {} auth events ({} blacklist entries)",
            self.http_events, self.auth_events, self.blacklist_entries
        )?;

        if self.incidents.is_empty() {
            writeln!(w, "{}", "No incidents found.".green())?;
            return Ok(());
        }

        writeln!(
            w,
            "Found {} incident(s):",
            self.incidents.len().to_string().red().bold()
        )?;
        writeln!(
            w,
            "{:<16} {:<18} {:<27} {:<9} {:<6} {}",
            "Type", "Source", "Time", "Severity", "Listed", "Metrics"
        )?;
        writeln!(w, "{}", "-".repeat(92))?;

        for incident in &self.incidents {
            let time = incident
                .time
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| "-".to_owned());
            writeln!(
                w,
                "{:<16} {:<18} {:<27} {:<9} {:<6} {}",
                incident.kind().to_string(),
                incident.source_key,
                time,
                incident.severity.to_string(),
                if incident.blacklisted { "yes" } else { "no" },
                metric_summary(&incident.details),
            )?;
        }
        Ok(())
    }
}
