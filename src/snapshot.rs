//! Snapshot capture: directory walk and fingerprinting
//!
//! A [`Snapshot`] is a point-in-time mapping from relative file path to
//! [`Fingerprint`]. Snapshots are immutable once captured; every run builds
//! a fresh one with [`scan_directory`] and diffs it against the persisted
//! previous one.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::UNIX_EPOCH;
use std::{fs, io};

use crate::config::{Config, FingerprintMode};
use crate::error::ScanError;
use crate::logging::*;

/// Change fingerprint for a single file.
///
/// Any content change is very likely to change the fingerprint, and a file
/// whose content is untouched keeps the same fingerprint across scans. This
/// is why mtime is used and atime is not: atime changes whenever anything
/// reads the file, including our own upload stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Fingerprint {
	/// Size in bytes plus mtime in seconds since the epoch
	Meta { size: u64, mtime: i64 },

	/// blake3 content hash, hex encoded
	Hash(String),
}

impl Fingerprint {
	fn from_metadata(meta: &fs::Metadata) -> io::Result<Self> {
		let mtime = match meta.modified()?.duration_since(UNIX_EPOCH) {
			Ok(d) => d.as_secs() as i64,
			// mtime before the epoch (clock skew, archive extraction)
			Err(e) => -(e.duration().as_secs() as i64),
		};
		Ok(Fingerprint::Meta { size: meta.len(), mtime })
	}

	fn from_content(path: &Path) -> io::Result<Self> {
		let buf = fs::read(path)?;
		Ok(Fingerprint::Hash(blake3::hash(&buf).to_hex().to_string()))
	}
}

/// Point-in-time view of the tracked directory
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
	files: BTreeMap<String, Fingerprint>,
}

impl Snapshot {
	/// Create an empty snapshot (first run, or recovered corrupt state)
	pub fn empty() -> Self {
		Snapshot { files: BTreeMap::new() }
	}

	pub fn len(&self) -> usize {
		self.files.len()
	}

	pub fn is_empty(&self) -> bool {
		self.files.is_empty()
	}

	pub fn get(&self, path: &str) -> Option<&Fingerprint> {
		self.files.get(path)
	}

	pub fn contains(&self, path: &str) -> bool {
		self.files.contains_key(path)
	}

	pub fn insert(&mut self, path: String, fingerprint: Fingerprint) {
		self.files.insert(path, fingerprint);
	}

	pub fn remove(&mut self, path: &str) -> Option<Fingerprint> {
		self.files.remove(path)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&String, &Fingerprint)> {
		self.files.iter()
	}

	pub fn paths(&self) -> impl Iterator<Item = &String> {
		self.files.keys()
	}
}

impl FromIterator<(String, Fingerprint)> for Snapshot {
	fn from_iter<T: IntoIterator<Item = (String, Fingerprint)>>(iter: T) -> Self {
		Snapshot { files: iter.into_iter().collect() }
	}
}

/// Scan the tracked directory and build the current snapshot.
///
/// Visits every regular file in every subdirectory. Symlinks and special
/// files are skipped, not followed. Relative paths use forward slashes
/// regardless of host conventions, so persisted snapshots stay portable.
///
/// A missing or non-directory root is fatal. Unreadable entries below the
/// root are skipped with a warning so a partial scan is still usable.
pub fn scan_directory(root: &Path, config: &Config) -> Result<Snapshot, ScanError> {
	match fs::metadata(root) {
		Ok(meta) if meta.is_dir() => {}
		Ok(_) => {
			return Err(ScanError::DirectoryNotFound { path: root.display().to_string() });
		}
		Err(e) if e.kind() == io::ErrorKind::NotFound => {
			return Err(ScanError::DirectoryNotFound { path: root.display().to_string() });
		}
		Err(e) => {
			return Err(ScanError::AccessDenied { path: root.display().to_string(), source: e });
		}
	}

	let mut exclude = Vec::with_capacity(config.exclude_patterns.len());
	for pattern in &config.exclude_patterns {
		let compiled = glob::Pattern::new(pattern).map_err(|e| ScanError::BadPattern {
			pattern: pattern.clone(),
			message: e.to_string(),
		})?;
		exclude.push(compiled);
	}

	let mut snapshot = Snapshot::empty();
	scan_dir(root, root, &exclude, config.fingerprint, &mut snapshot, true)?;
	debug!("Scanned {}: {} files", root.display(), snapshot.len());
	Ok(snapshot)
}

fn scan_dir(
	root: &Path,
	dir: &Path,
	exclude: &[glob::Pattern],
	mode: FingerprintMode,
	snapshot: &mut Snapshot,
	is_root: bool,
) -> Result<(), ScanError> {
	let entries = match fs::read_dir(dir) {
		Ok(e) => e,
		Err(e) if is_root => {
			// The root itself must be readable; partial scans only apply below it
			return Err(ScanError::AccessDenied { path: dir.display().to_string(), source: e });
		}
		Err(e) => {
			warn!("Skipping unreadable directory {}: {}", dir.display(), e);
			return Ok(());
		}
	};

	for entry_result in entries {
		let entry = match entry_result {
			Ok(e) => e,
			Err(e) => {
				warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
				continue;
			}
		};

		let path = entry.path();
		let relative = relative_key(root, &path);
		if exclude.iter().any(|p| p.matches(&relative)) {
			debug!("Excluded: {}", relative);
			continue;
		}

		// symlink_metadata so links are classified as links, not followed
		let meta = match fs::symlink_metadata(&path) {
			Ok(m) => m,
			Err(e) => {
				warn!("Skipping inaccessible entry {}: {}", path.display(), e);
				continue;
			}
		};

		if meta.is_dir() {
			scan_dir(root, &path, exclude, mode, snapshot, false)?;
		} else if meta.is_file() {
			let fingerprint = match mode {
				FingerprintMode::SizeMtime => Fingerprint::from_metadata(&meta),
				FingerprintMode::Hash => Fingerprint::from_content(&path),
			};
			match fingerprint {
				Ok(fp) => snapshot.insert(relative, fp),
				Err(e) => {
					warn!("Skipping unreadable file {}: {}", path.display(), e);
				}
			}
		}
		// symlinks and special files fall through
	}

	Ok(())
}

/// Relative path from root with forward-slash separators
fn relative_key(root: &Path, path: &Path) -> String {
	let relative = path.strip_prefix(root).unwrap_or(path);
	let parts: Vec<String> =
		relative.components().map(|c| c.as_os_str().to_string_lossy().into_owned()).collect();
	parts.join("/")
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::fs::File;
	use std::io::Write;
	use tempfile::TempDir;

	fn write_file(dir: &Path, name: &str, content: &[u8]) {
		let path = dir.join(name);
		if let Some(parent) = path.parent() {
			fs::create_dir_all(parent).unwrap();
		}
		let mut f = File::create(path).unwrap();
		f.write_all(content).unwrap();
	}

	#[test]
	fn test_scan_missing_root_is_fatal() {
		let tmp = TempDir::new().unwrap();
		let missing = tmp.path().join("nope");
		let err = scan_directory(&missing, &Config::default()).unwrap_err();
		assert!(matches!(err, ScanError::DirectoryNotFound { .. }));
	}

	#[test]
	fn test_scan_finds_nested_files_with_forward_slashes() {
		let tmp = TempDir::new().unwrap();
		write_file(tmp.path(), "a.txt", b"aaa");
		write_file(tmp.path(), "sub/deep/b.txt", b"bbb");

		let snapshot = scan_directory(tmp.path(), &Config::default()).unwrap();
		assert_eq!(snapshot.len(), 2);
		assert!(snapshot.contains("a.txt"));
		assert!(snapshot.contains("sub/deep/b.txt"));
	}

	#[test]
	fn test_scan_skips_directories_themselves() {
		let tmp = TempDir::new().unwrap();
		fs::create_dir(tmp.path().join("empty")).unwrap();
		write_file(tmp.path(), "a.txt", b"aaa");

		let snapshot = scan_directory(tmp.path(), &Config::default()).unwrap();
		assert_eq!(snapshot.len(), 1);
	}

	#[cfg(unix)]
	#[test]
	fn test_scan_skips_symlinks() {
		let tmp = TempDir::new().unwrap();
		write_file(tmp.path(), "real.txt", b"data");
		std::os::unix::fs::symlink(tmp.path().join("real.txt"), tmp.path().join("link.txt"))
			.unwrap();

		let snapshot = scan_directory(tmp.path(), &Config::default()).unwrap();
		assert!(snapshot.contains("real.txt"));
		assert!(!snapshot.contains("link.txt"));
	}

	#[test]
	fn test_exclude_patterns() {
		let tmp = TempDir::new().unwrap();
		write_file(tmp.path(), "keep.txt", b"k");
		write_file(tmp.path(), "drop.tmp", b"d");
		write_file(tmp.path(), "build/out.bin", b"o");

		let config = Config {
			exclude_patterns: vec!["*.tmp".to_string(), "build/*".to_string()],
			..Config::default()
		};
		let snapshot = scan_directory(tmp.path(), &config).unwrap();
		assert_eq!(snapshot.len(), 1);
		assert!(snapshot.contains("keep.txt"));
	}

	#[test]
	fn test_bad_exclude_pattern_is_reported() {
		let tmp = TempDir::new().unwrap();
		let config =
			Config { exclude_patterns: vec!["[".to_string()], ..Config::default() };
		let err = scan_directory(tmp.path(), &config).unwrap_err();
		assert!(matches!(err, ScanError::BadPattern { .. }));
	}

	#[test]
	fn test_fingerprint_stable_across_reads() {
		// Reading a file between scans must not change its fingerprint
		let tmp = TempDir::new().unwrap();
		write_file(tmp.path(), "a.txt", b"stable");

		let first = scan_directory(tmp.path(), &Config::default()).unwrap();
		let _ = fs::read(tmp.path().join("a.txt")).unwrap();
		let second = scan_directory(tmp.path(), &Config::default()).unwrap();
		assert_eq!(first.get("a.txt"), second.get("a.txt"));
	}

	#[test]
	fn test_fingerprint_changes_with_mtime() {
		let tmp = TempDir::new().unwrap();
		write_file(tmp.path(), "a.txt", b"v1");
		let first = scan_directory(tmp.path(), &Config::default()).unwrap();

		filetime::set_file_mtime(
			tmp.path().join("a.txt"),
			filetime::FileTime::from_unix_time(1_000_000, 0),
		)
		.unwrap();
		let second = scan_directory(tmp.path(), &Config::default()).unwrap();
		assert_ne!(first.get("a.txt"), second.get("a.txt"));
	}

	#[test]
	fn test_hash_fingerprint_tracks_content_not_mtime() {
		let tmp = TempDir::new().unwrap();
		write_file(tmp.path(), "a.txt", b"same content");
		let config = Config { fingerprint: FingerprintMode::Hash, ..Config::default() };

		let first = scan_directory(tmp.path(), &config).unwrap();
		filetime::set_file_mtime(
			tmp.path().join("a.txt"),
			filetime::FileTime::from_unix_time(1_000_000, 0),
		)
		.unwrap();
		let second = scan_directory(tmp.path(), &config).unwrap();
		assert_eq!(first.get("a.txt"), second.get("a.txt"));

		write_file(tmp.path(), "a.txt", b"different content");
		let third = scan_directory(tmp.path(), &config).unwrap();
		assert_ne!(second.get("a.txt"), third.get("a.txt"));
	}
}

// vim: ts=4
