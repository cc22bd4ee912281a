//! Sync coordinator
//!
//! Consumes the Added (and, when configured, Modified) sets of a
//! [`ChangeSet`] and drives per-file uploads to the remote store. The
//! central design decision is failure isolation: a failed upload never
//! aborts the run — every file in the change set is attempted and all
//! outcomes are aggregated into the [`SyncReport`] before returning.
//!
//! There are no retries within a run. A failed file resurfaces in the next
//! run's change set (under the default persist policy), which is where
//! retry, if desired, happens.

use futures::stream::{self, StreamExt};
use std::path::Path;

use crate::config::{Config, PersistPolicy};
use crate::diff::ChangeSet;
use crate::error::UploadError;
use crate::logging::*;
use crate::remote::{RemoteId, RemoteStore};
use crate::snapshot::Snapshot;

///////////////////
// Sync outcomes //
///////////////////

/// Terminal state of one attempted upload
#[derive(Debug)]
pub enum SyncOutcome {
	/// Remote accepted the file and assigned an identifier
	Uploaded(RemoteId),

	/// Upload failed; the reason is recorded, the run continues
	Failed(UploadError),
}

/// Per-file record of an attempted upload
#[derive(Debug)]
pub struct SyncRecord {
	/// Relative path within the tracked directory
	pub path: String,

	pub outcome: SyncOutcome,
}

impl SyncRecord {
	pub fn is_success(&self) -> bool {
		matches!(self.outcome, SyncOutcome::Uploaded(_))
	}
}

/// Aggregated outcome of one sync stage
#[derive(Debug, Default)]
pub struct SyncReport {
	/// One record per attempted file, ordered by path
	pub records: Vec<SyncRecord>,
}

impl SyncReport {
	pub fn attempted(&self) -> usize {
		self.records.len()
	}

	pub fn succeeded(&self) -> usize {
		self.records.iter().filter(|r| r.is_success()).count()
	}

	pub fn failed(&self) -> usize {
		self.records.len() - self.succeeded()
	}

	/// Paths whose upload failed
	pub fn failed_paths(&self) -> impl Iterator<Item = &str> {
		self.records.iter().filter(|r| !r.is_success()).map(|r| r.path.as_str())
	}

	/// True when every attempted upload failed with an authorization
	/// error — a systemic cause worth surfacing as such, rather than as
	/// N unrelated per-file failures.
	pub fn systemic_auth_failure(&self) -> bool {
		!self.records.is_empty()
			&& self.records.iter().all(|r| match &r.outcome {
				SyncOutcome::Failed(e) => e.is_auth(),
				SyncOutcome::Uploaded(_) => false,
			})
	}
}

//////////////////////
// Sync coordinator //
//////////////////////

/// Upload the files named by `change_set` from `local_root` to `remote`.
///
/// Added paths are always attempted; Modified paths only when
/// `config.upload_modified` is set. Deleted paths are never propagated.
/// Uploads run with `config.parallel_uploads` in flight; records are
/// aggregated after the stream drains and sorted by path.
pub async fn sync(
	change_set: &ChangeSet,
	local_root: &Path,
	remote: &dyn RemoteStore,
	config: &Config,
) -> SyncReport {
	let mut paths: Vec<&String> = change_set.added.iter().collect();
	if config.upload_modified {
		paths.extend(change_set.modified.iter());
	}

	if paths.is_empty() {
		return SyncReport::default();
	}
	info!("Uploading {} file(s)...", paths.len());

	let mut records: Vec<SyncRecord> = stream::iter(paths)
		.map(|path| upload_one(local_root, path, remote))
		.buffer_unordered(config.parallel_uploads.max(1))
		.collect()
		.await;
	records.sort_by(|a, b| a.path.cmp(&b.path));

	let report = SyncReport { records };
	if report.systemic_auth_failure() {
		warn!(
			"All {} upload(s) failed with authorization errors; the session is likely invalid",
			report.attempted()
		);
	}
	report
}

/// One file through `Pending -> Uploading -> {Succeeded, Failed}`.
/// Never returns an error; failures become part of the record.
async fn upload_one(local_root: &Path, path: &str, remote: &dyn RemoteStore) -> SyncRecord {
	let full_path = local_root.join(path);

	let content = match tokio::fs::read(&full_path).await {
		Ok(c) => c,
		Err(e) => {
			warn!("Cannot read {} for upload: {}", full_path.display(), e);
			return SyncRecord {
				path: path.to_string(),
				outcome: SyncOutcome::Failed(UploadError::LocalRead {
					path: path.to_string(),
					source: e,
				}),
			};
		}
	};

	match remote.create(path, &content).await {
		Ok(id) => {
			debug!("Uploaded {} -> {}", path, id);
			SyncRecord { path: path.to_string(), outcome: SyncOutcome::Uploaded(id) }
		}
		Err(e) => {
			warn!("Upload of {} failed: {}", path, e);
			SyncRecord { path: path.to_string(), outcome: SyncOutcome::Failed(e) }
		}
	}
}

/// Decide which snapshot to persist after the sync stage.
///
/// Under `PersistPolicy::Confirmed`, entries for files whose upload failed
/// are rolled back: a failed Added path is dropped (it will be Added again
/// next run) and a failed Modified path keeps its previous fingerprint (it
/// will be Modified again next run). Files that were not attempted, or that
/// succeeded, keep their current fingerprint.
///
/// Under `PersistPolicy::Entire`, the full current snapshot is persisted
/// regardless of outcome; failed uploads are then not retried automatically.
pub fn confirmed_snapshot(
	previous: &Snapshot,
	current: &Snapshot,
	report: &SyncReport,
	policy: PersistPolicy,
) -> Snapshot {
	let mut confirmed = current.clone();
	if policy == PersistPolicy::Entire {
		return confirmed;
	}

	for path in report.failed_paths() {
		match previous.get(path) {
			Some(old) => confirmed.insert(path.to_string(), old.clone()),
			None => {
				confirmed.remove(path);
			}
		}
	}
	confirmed
}


// vim: ts=4
