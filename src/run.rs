//! Run driver: the scan → load → diff → sync → persist pipeline

use std::path::Path;

use crate::config::Config;
use crate::diff::{diff, ChangeSet};
use crate::error::TrackError;
use crate::logging::*;
use crate::remote::RemoteStore;
use crate::snapshot::{scan_directory, Snapshot};
use crate::state::{acquire_lock, StateStore};
use crate::sync::{confirmed_snapshot, sync, SyncReport};

/// Everything one run found and did, for reporting
#[derive(Debug)]
pub struct RunSummary {
	/// Number of files in the current snapshot
	pub scanned: usize,

	pub changes: ChangeSet,

	/// Empty when nothing was uploaded (no changes, or dry run)
	pub report: SyncReport,
}

/// Execute a full run against `root`.
///
/// The run completes successfully even when individual uploads fail; only a
/// failed scan of the root, a lock conflict, or a failed state persist are
/// fatal. A fatal persist leaves the previous state file intact.
pub async fn run(
	root: &Path,
	config: &Config,
	remote: &dyn RemoteStore,
) -> Result<RunSummary, TrackError> {
	config.validate()?;

	// Exclusive access for the whole run; released on drop, error or not
	let _lock = acquire_lock(&config.trackr_dir)?;

	info!("Scanning {}...", root.display());
	let current = scan_directory(root, config)?;

	let store = StateStore::new(config.state_path());
	let previous = store.load().await;

	let changes = diff(&previous, &current);
	info!(
		"{} added, {} modified, {} deleted ({} files scanned)",
		changes.added.len(),
		changes.modified.len(),
		changes.deleted.len(),
		current.len()
	);

	if config.dry_run {
		return Ok(RunSummary { scanned: current.len(), changes, report: SyncReport::default() });
	}

	let report = sync(&changes, root, remote, config).await;

	let to_persist = confirmed_snapshot(&previous, &current, &report, config.persist);
	store.save(&to_persist).await?;

	Ok(RunSummary { scanned: current.len(), changes, report })
}

/// Scan and diff only: no upload, no state write, no lock.
pub async fn status(root: &Path, config: &Config) -> Result<(ChangeSet, Snapshot), TrackError> {
	config.validate()?;

	let current = scan_directory(root, config)?;
	let store = StateStore::new(config.state_path());
	let previous = store.load().await;

	Ok((diff(&previous, &current), current))
}

// vim: ts=4
