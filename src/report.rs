use std::io::Write;
use std::path::Path;

use serde_json::{json, Value};

use crate::analysis::Report;
use crate::error::Result;
use crate::exclusion::ExclusionSet;

const RULE_WIDTH: usize = 100;

pub fn write_text<W: Write>(
	out: &mut W,
	log_file: &Path,
	excluded: &ExclusionSet,
	report: &Report,
) -> Result<()> {
	let heavy: String = "=".repeat(RULE_WIDTH);
	let light: String = "-".repeat(RULE_WIDTH);

	writeln!(out, "=== DOVECOT LOGIN ANALYSIS ===")?;
	writeln!(out, "Log file: {}", log_file.display())?;
	writeln!(out, "Excluded IPs: {}", excluded)?;
	writeln!(out, "Login attempts found: {}", report.events.len())?;
	writeln!(out, "{}", heavy)?;
	writeln!(
		out,
		"{:<4} {:<16} {:<20} {:<16} {:<15} {}",
		"No.", "Date/Time", "User", "IP address", "Status", "Service"
	)?;
	writeln!(out, "{}", light)?;

	for (i, event) in report.events.iter().enumerate() {
		writeln!(
			out,
			"{:<4} {:<16} {:<20} {:<16} {:<15} {}",
			i + 1,
			event.timestamp(),
			event.user(),
			event.ip(),
			event.status(),
			event.service()
		)?;
	}

	writeln!(out, "{}", heavy)?;
	writeln!(out, "SUMMARY:")?;
	writeln!(out, "- Successful logins: {}", report.summary.successful)?;
	writeln!(out, "- Failed logins: {}", report.summary.failed)?;
	writeln!(out, "- Unique IP addresses: {}", report.summary.unique_ips)?;
	writeln!(out, "- Unique users: {}", report.summary.unique_users)?;
	writeln!(out, "- Excluded IPs: {}", excluded)?;

	Ok(())
}

/// Same content as [`write_text`]; `year`, when known, adds a resolved
/// `datetime` to each event.
pub fn to_json(log_file: &Path, excluded: &ExclusionSet, report: &Report, year: Option<i32>) -> Value {
	let events: Vec<Value> = report
		.events
		.iter()
		.enumerate()
		.map(|(i, event)| {
			let mut value: Value = json!({
				"index": i + 1,
				"timestamp": event.timestamp(),
				"user": event.user(),
				"ip": event.ip(),
				"status": event.status().label(),
				"service": event.service().label(),
			});
			if let Some(year) = year {
				value["datetime"] = event
					.datetime(year)
					.map(|d| Value::from(d.format("%Y-%m-%dT%H:%M:%S").to_string()))
					.unwrap_or(Value::Null);
			}
			value
		})
		.collect();

	json!({
		"log_file": log_file.display().to_string(),
		"excluded_ips": excluded.entries(),
		"total": report.events.len(),
		"events": events,
		"summary": {
			"successful": report.summary.successful,
			"failed": report.summary.failed,
			"unique_ips": report.summary.unique_ips,
			"unique_users": report.summary.unique_users,
		},
	})
}

pub fn write_json<W: Write>(
	out: &mut W,
	log_file: &Path,
	excluded: &ExclusionSet,
	report: &Report,
	year: Option<i32>,
) -> Result<()> {
	serde_json::to_writer_pretty(&mut *out, &to_json(log_file, excluded, report, year))?;
	writeln!(out)?;
	Ok(())
}
