//! Persistence of the last-accepted snapshot
//!
//! The state file is pretty-printed JSON (relative path -> fingerprint), so
//! it doubles as a human-inspectable audit trail. It is owned exclusively by
//! the [`StateStore`] and written only at the end of a run.

use std::path::{Path, PathBuf};

use crate::error::StateError;
use crate::logging::*;
use crate::snapshot::Snapshot;

/// Durable store for the last-accepted snapshot of one profile
pub struct StateStore {
	path: PathBuf,
}

impl StateStore {
	pub fn new(path: PathBuf) -> Self {
		StateStore { path }
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Load the previous snapshot.
	///
	/// An absent file means first run; an unreadable or unparseable file is
	/// logged and degrades to the empty snapshot, so every file is treated
	/// as newly added rather than failing the run.
	pub async fn load(&self) -> Snapshot {
		if !self.path.exists() {
			debug!("No previous state at {}, starting fresh", self.path.display());
			return Snapshot::empty();
		}

		let contents = match tokio::fs::read_to_string(&self.path).await {
			Ok(c) => c,
			Err(e) => {
				warn!(
					"Cannot read state file {}, treating all files as new: {}",
					self.path.display(),
					e
				);
				return Snapshot::empty();
			}
		};

		match serde_json::from_str(&contents) {
			Ok(snapshot) => snapshot,
			Err(e) => {
				warn!(
					"State file {} is corrupt, treating all files as new: {}",
					self.path.display(),
					e
				);
				Snapshot::empty()
			}
		}
	}

	/// Persist a snapshot atomically.
	///
	/// Writes to a temporary file in the same directory, then renames over
	/// the target, so an interrupted save never leaves a half-written state
	/// file; the previous state survives as the fallback.
	pub async fn save(&self, snapshot: &Snapshot) -> Result<(), StateError> {
		if let Some(parent) = self.path.parent() {
			if !parent.exists() {
				tokio::fs::create_dir_all(parent)
					.await
					.map_err(|e| StateError::SaveFailed { source: Box::new(e) })?;
			}
		}

		let json = serde_json::to_string_pretty(snapshot)
			.map_err(|e| StateError::SaveFailed { source: Box::new(e) })?;

		let tmp_path = self.path.with_extension("json.TrAcKr-TmP");
		tokio::fs::write(&tmp_path, json)
			.await
			.map_err(|e| StateError::SaveFailed { source: Box::new(e) })?;

		tokio::fs::rename(&tmp_path, &self.path).await.map_err(|e| {
			// Leave no temp file behind on a failed rename
			let _ = std::fs::remove_file(&tmp_path);
			StateError::SaveFailed { source: Box::new(e) }
		})?;

		debug!("Persisted {} entries to {}", snapshot.len(), self.path.display());
		Ok(())
	}
}

/// Acquire an exclusive lock for one run against a state directory.
///
/// Overlapping runs would race on the state file and the tracked directory;
/// the lock file holds the owning PID for diagnostics.
pub fn acquire_lock(state_dir: &Path) -> Result<RunLock, StateError> {
	let lock_path = state_dir.join(".TrAcKr-LOCK");

	if lock_path.exists() {
		return Err(StateError::LockFailed {
			message: format!(
				"Run already in progress (lock file exists). If stale, delete: {}",
				lock_path.display()
			),
		});
	}

	if !state_dir.exists() {
		std::fs::create_dir_all(state_dir).map_err(|e| StateError::LockFailed {
			message: format!("Cannot create state directory: {}", e),
		})?;
	}

	let pid = std::process::id();
	std::fs::write(&lock_path, pid.to_string()).map_err(|e| StateError::LockFailed {
		message: format!("Failed to create lock file: {}", e),
	})?;

	Ok(RunLock { path: lock_path })
}

/// RAII lock guard for exclusive run access
pub struct RunLock {
	path: PathBuf,
}

impl Drop for RunLock {
	fn drop(&mut self) {
		// Remove lock file on drop (whether success or failure)
		let _ = std::fs::remove_file(&self.path);
	}
}


// vim: ts=4
