//! Configuration for trackr runs
//!
//! All tunables live in a single `Config` struct that is passed explicitly
//! into each component, so multiple independent tracked directories can run
//! in the same process and tests can inject their own paths.
//!
//! Priority chain:
//! 1. Built-in defaults (Config::default())
//! 2. Config file (<state-dir>/config.toml)
//! 3. CLI flags (applied by the caller, highest priority)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::TrackError;
use crate::logging::*;

/// How a file's fingerprint is computed during a scan.
///
/// Last-access time is deliberately not an option: reads (backups, virus
/// scans, the upload step itself) rewrite atime, so it cannot distinguish
/// content changes from mere observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FingerprintMode {
	/// (size, mtime) pair. Cheap, catches everything except in-place
	/// edits that preserve both size and mtime.
	#[default]
	SizeMtime,
	/// blake3 content hash. Reads every file on every scan, but detects
	/// byte-level changes regardless of metadata.
	Hash,
}

/// What to persist after the sync stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PersistPolicy {
	/// Roll back snapshot entries for files whose upload failed, so they
	/// are picked up again on the next run.
	#[default]
	Confirmed,
	/// Persist the entire current snapshot regardless of upload outcome.
	/// Failed uploads are then not retried automatically.
	Entire,
}

/// Unified configuration for a tracked directory
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
	/// Home directory for trackr state (~/.trackr)
	pub trackr_dir: PathBuf,

	/// Profile name; state is persisted to <trackr_dir>/<profile>.json
	pub profile: String,

	/// Glob patterns to exclude from scanning (e.g. "*.tmp", "build/**")
	pub exclude_patterns: Vec<String>,

	/// Fingerprint computation mode
	pub fingerprint: FingerprintMode,

	/// Also upload files classified as Modified (Added is always uploaded)
	pub upload_modified: bool,

	/// Snapshot persist policy after sync
	pub persist: PersistPolicy,

	/// Number of parallel uploads (1 = sequential)
	pub parallel_uploads: usize,

	/// Plan and report changes without uploading or persisting
	pub dry_run: bool,
}

impl Default for Config {
	fn default() -> Self {
		Config {
			trackr_dir: std::env::var("HOME")
				.ok()
				.map(|h| PathBuf::from(h).join(".trackr"))
				.unwrap_or_else(|| PathBuf::from(".trackr")),
			profile: "default".to_string(),
			exclude_patterns: vec![],
			fingerprint: FingerprintMode::SizeMtime,
			upload_modified: false,
			persist: PersistPolicy::Confirmed,
			parallel_uploads: 1,
			dry_run: false,
		}
	}
}

impl Config {
	/// Load configuration from a TOML file, falling back to defaults for
	/// any missing field.
	pub fn from_file(path: &Path) -> Result<Self, TrackError> {
		let contents = std::fs::read_to_string(path)
			.map_err(|e| TrackError::InvalidConfig {
				message: format!("Cannot read {}: {}", path.display(), e),
			})?;
		toml::from_str(&contents).map_err(|e| TrackError::InvalidConfig {
			message: format!("Cannot parse {}: {}", path.display(), e),
		})
	}

	/// Load <trackr_dir>/config.toml if present, defaults otherwise.
	pub fn load_or_default(trackr_dir: &Path) -> Self {
		let path = trackr_dir.join("config.toml");
		if path.exists() {
			match Config::from_file(&path) {
				Ok(mut config) => {
					config.trackr_dir = trackr_dir.to_path_buf();
					return config;
				}
				Err(e) => {
					warn!("Ignoring config file: {}", e);
				}
			}
		}
		Config { trackr_dir: trackr_dir.to_path_buf(), ..Config::default() }
	}

	/// Path of the persisted-state file for this profile
	pub fn state_path(&self) -> PathBuf {
		self.trackr_dir.join(format!("{}.json", self.profile))
	}

	/// Basic sanity checks before a run
	pub fn validate(&self) -> Result<(), TrackError> {
		if self.profile.is_empty() {
			return Err(TrackError::InvalidConfig { message: "profile must not be empty".into() });
		}
		if self.parallel_uploads == 0 {
			return Err(TrackError::InvalidConfig {
				message: "parallelUploads must be at least 1".into(),
			});
		}
		Ok(())
	}
}


// vim: ts=4
