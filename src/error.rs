//! Error types for trackr operations

use std::error::Error;
use std::fmt;
use std::io;

/// Main error type for a tracking run
#[derive(Debug)]
pub enum TrackError {
	/// Directory scan failed
	Scan(ScanError),

	/// State load/save failed
	State(StateError),

	/// I/O error
	Io(io::Error),

	/// Invalid configuration
	InvalidConfig { message: String },

	/// Lock acquisition failed (another run in progress)
	LockFailed { message: String },

	/// Generic error message
	Other { message: String },
}

impl fmt::Display for TrackError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			TrackError::Scan(e) => write!(f, "Scan error: {}", e),
			TrackError::State(e) => write!(f, "State error: {}", e),
			TrackError::Io(e) => write!(f, "I/O error: {}", e),
			TrackError::InvalidConfig { message } => {
				write!(f, "Invalid configuration: {}", message)
			}
			TrackError::LockFailed { message } => {
				write!(f, "Lock acquisition failed: {}", message)
			}
			TrackError::Other { message } => write!(f, "{}", message),
		}
	}
}

impl Error for TrackError {}

impl From<io::Error> for TrackError {
	fn from(e: io::Error) -> Self {
		TrackError::Io(e)
	}
}

impl From<String> for TrackError {
	fn from(e: String) -> Self {
		TrackError::Other { message: e }
	}
}

impl From<ScanError> for TrackError {
	fn from(e: ScanError) -> Self {
		TrackError::Scan(e)
	}
}

impl From<StateError> for TrackError {
	fn from(e: StateError) -> Self {
		TrackError::State(e)
	}
}

/// Directory scan errors
#[derive(Debug)]
pub enum ScanError {
	/// Tracked root directory does not exist or is not a directory
	DirectoryNotFound { path: String },

	/// Root directory itself cannot be read
	AccessDenied { path: String, source: io::Error },

	/// Invalid exclude pattern in configuration
	BadPattern { pattern: String, message: String },
}

impl fmt::Display for ScanError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ScanError::DirectoryNotFound { path } => {
				write!(f, "Tracked directory not found: {}", path)
			}
			ScanError::AccessDenied { path, source } => {
				write!(f, "Cannot read {}: {}", path, source)
			}
			ScanError::BadPattern { pattern, message } => {
				write!(f, "Invalid exclude pattern '{}': {}", pattern, message)
			}
		}
	}
}

impl Error for ScanError {}

/// State persistence errors
#[derive(Debug)]
pub enum StateError {
	/// Failed to read the state file
	LoadFailed { source: io::Error },

	/// Failed to write the state file
	SaveFailed { source: Box<dyn Error + Send + Sync> },

	/// State file exists but does not parse
	Corrupted { message: String },

	/// Lock file already present
	LockFailed { message: String },
}

impl fmt::Display for StateError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			StateError::LoadFailed { source } => write!(f, "Failed to load state: {}", source),
			StateError::SaveFailed { source } => write!(f, "Failed to save state: {}", source),
			StateError::Corrupted { message } => write!(f, "State corrupted: {}", message),
			StateError::LockFailed { message } => write!(f, "Lock failed: {}", message),
		}
	}
}

impl Error for StateError {}

/// Per-file upload failures, recorded in the sync report.
///
/// None of these abort the run. A systemic cause (every upload failing
/// with `Auth`) is surfaced by the report, but the run still completes.
#[derive(Debug)]
pub enum UploadError {
	/// Local file could not be read for upload
	LocalRead { path: String, source: io::Error },

	/// Remote rejected the session/credentials
	Auth { message: String },

	/// Remote quota or size limit exceeded
	Quota { message: String },

	/// Network-level failure talking to the remote
	Network { message: String },

	/// Any other remote-side failure
	Remote { message: String },
}

impl fmt::Display for UploadError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			UploadError::LocalRead { path, source } => {
				write!(f, "Failed to read {}: {}", path, source)
			}
			UploadError::Auth { message } => write!(f, "Authorization failed: {}", message),
			UploadError::Quota { message } => write!(f, "Quota exceeded: {}", message),
			UploadError::Network { message } => write!(f, "Network error: {}", message),
			UploadError::Remote { message } => write!(f, "Remote error: {}", message),
		}
	}
}

impl Error for UploadError {}

impl UploadError {
	/// True when the failure is an authorization problem, used for
	/// systemic-failure detection in the sync report.
	pub fn is_auth(&self) -> bool {
		matches!(self, UploadError::Auth { .. })
	}
}

// vim: ts=4
