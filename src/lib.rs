//! # trackr - Snapshot-Diff Directory Change Detector
//!
//! trackr captures the contents of a tracked directory into a snapshot,
//! diffs it against the snapshot persisted by the previous run, classifies
//! every file as added/modified/deleted, and uploads new files to a remote
//! store. It runs as a one-shot batch process, not a watcher.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use trackr::config::Config;
//! use trackr::remote::DirRemote;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let remote = DirRemote::new("/mnt/backup".into());
//!     let summary = trackr::run::run("tracked_folder".as_ref(), &config, &remote).await?;
//!     println!("{} file(s) uploaded", summary.report.succeeded());
//!     Ok(())
//! }
//! ```
//!
//! Real cloud backends plug in by implementing [`remote::RemoteStore`]
//! around an already-authenticated client; the core never handles
//! credentials.

pub mod config;
pub mod diff;
pub mod error;
pub mod logging;
pub mod remote;
pub mod report;
pub mod run;
pub mod snapshot;
pub mod state;
pub mod sync;

// Re-export commonly used types and functions
pub use config::{Config, FingerprintMode, PersistPolicy};
pub use diff::{diff, ChangeSet};
pub use error::{ScanError, StateError, TrackError, UploadError};
pub use remote::{DirRemote, RemoteId, RemoteStore};
pub use snapshot::{scan_directory, Fingerprint, Snapshot};
pub use sync::{SyncOutcome, SyncRecord, SyncReport};

// vim: ts=4
