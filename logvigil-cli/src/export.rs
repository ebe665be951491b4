//! Report file export (JSON and CSV)
//!
//! Writes the final incident collection to `<out_dir>/<base_name>.json`
//! and/or `<out_dir>/<base_name>.csv` according to the report config.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use logvigil_core::types::{Incident, IncidentDetails};

use crate::error::CliError;

/// Write incident reports in the requested formats.
///
/// Creates `out_dir` if it does not exist. Returns the paths written.
/// Unknown format names were already rejected by config validation.
pub fn export_incidents(
    incidents: &[Incident],
    out_dir: &Path,
    base_name: &str,
    formats: &[String],
) -> Result<Vec<PathBuf>, CliError> {
    fs::create_dir_all(out_dir)?;

    let mut written = Vec::new();
    for format in formats {
        let path = out_dir.join(format!("{base_name}.{format}"));
        match format.as_str() {
            "json" => write_json(incidents, &path)?,
            "csv" => write_csv(incidents, &path)?,
            other => {
                return Err(CliError::Command(format!(
                    "unsupported report format '{other}'"
                )));
            }
        }
        info!(path = %path.display(), count = incidents.len(), "report written");
        written.push(path);
    }
    Ok(written)
}

fn write_json(incidents: &[Incident], path: &Path) -> Result<(), CliError> {
    let mut file = fs::File::create(path)?;
    serde_json::to_writer_pretty(&mut file, incidents)?;
    writeln!(file)?;
    Ok(())
}

const CSV_HEADER: &str = "id,type,source,time,severity,blacklisted,metric,value";

fn write_csv(incidents: &[Incident], path: &Path) -> Result<(), CliError> {
    let mut file = fs::File::create(path)?;
    writeln!(file, "{CSV_HEADER}")?;
    for incident in incidents {
        let (metric, value) = metric_column(&incident.details);
        let time = incident
            .time
            .map(|t| t.to_rfc3339())
            .unwrap_or_default();
        writeln!(
            file,
            "{},{},{},{},{},{},{},{}",
            csv_field(&incident.id),
            csv_field(&incident.kind().to_string()),
            csv_field(&incident.source_key),
            csv_field(&time),
            incident.severity,
            incident.blacklisted,
            metric,
            value,
        )?;
    }
    Ok(())
}

/// Metric column name and value for the CSV row.
fn metric_column(details: &IncidentDetails) -> (&'static str, u64) {
    match details {
        IncidentDetails::HttpBruteForce { max_count, .. } => ("max_count", *max_count),
        IncidentDetails::SshBruteForce { max_failed } => ("max_failed", *max_failed),
        IncidentDetails::RequestFlood { requests_in_minute } => {
            ("requests_in_minute", *requests_in_minute)
        }
        IncidentDetails::EndpointScan { distinct_endpoints } => {
            ("distinct_endpoints", *distinct_endpoints)
        }
    }
}

/// Quote a CSV field if it contains a comma, quote, or newline.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_owned()
    }
}
