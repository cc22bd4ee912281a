//! Human-readable run reports
//!
//! Rendering is a pure function of the [`ChangeSet`] / [`SyncReport`], so it
//! is testable without a filesystem and cannot drift from what the diff
//! actually found. Each section is emitted only when non-empty.

use std::fmt::Write;

use crate::diff::ChangeSet;
use crate::sync::{SyncOutcome, SyncReport};

/// Render the change report for one run
pub fn render_changes(change_set: &ChangeSet) -> String {
	if change_set.is_empty() {
		return "No changes detected. Everything is up to date.\n".to_string();
	}

	let mut out = String::new();
	out.push_str("----- Change report -----\n");

	if !change_set.added.is_empty() {
		let _ = writeln!(out, "\n[Added] {} new file(s):", change_set.added.len());
		for path in &change_set.added {
			let _ = writeln!(out, " - {}", path);
		}
	}

	if !change_set.modified.is_empty() {
		let _ = writeln!(out, "\n[Modified] {} file(s) have been changed:", change_set.modified.len());
		for path in &change_set.modified {
			let _ = writeln!(out, " - {}", path);
		}
	}

	if !change_set.deleted.is_empty() {
		let _ = writeln!(out, "\n[Deleted] {} file(s) have been removed:", change_set.deleted.len());
		for path in &change_set.deleted {
			let _ = writeln!(out, " - {}", path);
		}
	}

	out
}

/// Render per-file upload outcomes
pub fn render_sync(report: &SyncReport) -> String {
	if report.records.is_empty() {
		return String::new();
	}

	let mut out = String::new();
	let _ = writeln!(
		out,
		"----- Upload report: {} succeeded, {} failed -----",
		report.succeeded(),
		report.failed()
	);
	for record in &report.records {
		match &record.outcome {
			SyncOutcome::Uploaded(id) => {
				let _ = writeln!(out, " + {} -> {}", record.path, id);
			}
			SyncOutcome::Failed(e) => {
				let _ = writeln!(out, " ! {}: {}", record.path, e);
			}
		}
	}

	if report.systemic_auth_failure() {
		out.push_str("All uploads failed with authorization errors; check the remote session.\n");
	}

	out
}


// vim: ts=4
