//! Remote store interface
//!
//! The remote side of the pipeline is an injected capability: something that
//! accepts named content and hands back an identifier. Authentication and
//! token refresh happen entirely in whatever constructs the [`RemoteStore`]
//! implementation — the core never sees credentials.

use async_trait::async_trait;
use std::path::PathBuf;

use crate::error::UploadError;
use crate::logging::*;

/// Identifier assigned by the remote store on a successful upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteId(pub String);

impl std::fmt::Display for RemoteId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// An authenticated handle to an object store.
///
/// One call per file; resumable/chunked transfer mechanics and per-upload
/// timeouts are the implementation's concern. The coordinator only sees
/// success (with an id) or a classified failure.
#[async_trait]
pub trait RemoteStore: Send + Sync {
	/// Create or overwrite the object `name` with `content`.
	async fn create(&self, name: &str, content: &[u8]) -> Result<RemoteId, UploadError>;
}

/// Filesystem-backed remote store.
///
/// Mirrors uploads into a target directory, preserving relative paths. The
/// built-in backend for the CLI and the test double of choice; real cloud
/// backends implement [`RemoteStore`] around their own client.
pub struct DirRemote {
	target: PathBuf,
}

impl DirRemote {
	pub fn new(target: PathBuf) -> Self {
		DirRemote { target }
	}
}

#[async_trait]
impl RemoteStore for DirRemote {
	async fn create(&self, name: &str, content: &[u8]) -> Result<RemoteId, UploadError> {
		let dest = self.target.join(name);

		if let Some(parent) = dest.parent() {
			tokio::fs::create_dir_all(parent).await.map_err(|e| classify_io(name, e))?;
		}
		tokio::fs::write(&dest, content).await.map_err(|e| classify_io(name, e))?;

		debug!("Stored {} ({} bytes)", dest.display(), content.len());
		Ok(RemoteId(dest.display().to_string()))
	}
}

fn classify_io(name: &str, e: std::io::Error) -> UploadError {
	match e.kind() {
		std::io::ErrorKind::PermissionDenied => {
			UploadError::Auth { message: format!("{}: {}", name, e) }
		}
		_ => UploadError::Remote { message: format!("{}: {}", name, e) },
	}
}


// vim: ts=4
