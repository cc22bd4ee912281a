//! Snapshot diffing
//!
//! [`diff`] is the one pure component of the pipeline: it touches no I/O and
//! classifies every path in two snapshots as Added, Modified, Deleted or
//! (implicitly) Unchanged.

use std::collections::BTreeSet;

use crate::snapshot::Snapshot;

/// Classification of paths between two snapshots.
///
/// The three sets are disjoint by construction; unchanged paths are not
/// materialized. Set semantics only — any ordering in reports is a
/// presentation concern, not a diff concern.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
	/// Paths present only in the current snapshot
	pub added: BTreeSet<String>,

	/// Paths present in both snapshots with differing fingerprints
	pub modified: BTreeSet<String>,

	/// Paths present only in the previous snapshot
	pub deleted: BTreeSet<String>,
}

impl ChangeSet {
	pub fn is_empty(&self) -> bool {
		self.added.is_empty() && self.modified.is_empty() && self.deleted.is_empty()
	}

	/// Total number of classified paths
	pub fn len(&self) -> usize {
		self.added.len() + self.modified.len() + self.deleted.len()
	}
}

/// Compare two snapshots. O(|previous| + |current|), no side effects.
pub fn diff(previous: &Snapshot, current: &Snapshot) -> ChangeSet {
	let mut change_set = ChangeSet::default();

	for (path, fingerprint) in current.iter() {
		match previous.get(path) {
			None => {
				change_set.added.insert(path.clone());
			}
			Some(old) if old != fingerprint => {
				change_set.modified.insert(path.clone());
			}
			Some(_) => {}
		}
	}

	for path in previous.paths() {
		if !current.contains(path) {
			change_set.deleted.insert(path.clone());
		}
	}

	change_set
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::snapshot::Fingerprint;

	fn meta(size: u64) -> Fingerprint {
		Fingerprint::Meta { size, mtime: 1_700_000_000 }
	}

	fn snapshot(entries: &[(&str, u64)]) -> Snapshot {
		entries.iter().map(|(p, s)| (p.to_string(), meta(*s))).collect()
	}

	#[test]
	fn test_diff_identical_is_empty() {
		let a = snapshot(&[("a.txt", 100), ("b.txt", 200)]);
		let result = diff(&a, &a);
		assert!(result.is_empty());
	}

	#[test]
	fn test_diff_empty_snapshots() {
		let result = diff(&Snapshot::empty(), &Snapshot::empty());
		assert!(result.is_empty());
	}

	#[test]
	fn test_added_modified_deleted_classification() {
		// previous {a:100, b:200}, current {a:100, b:250, c:300}
		let previous = snapshot(&[("a.txt", 100), ("b.txt", 200)]);
		let current = snapshot(&[("a.txt", 100), ("b.txt", 250), ("c.txt", 300)]);

		let result = diff(&previous, &current);
		assert_eq!(result.added.iter().collect::<Vec<_>>(), vec!["c.txt"]);
		assert_eq!(result.modified.iter().collect::<Vec<_>>(), vec!["b.txt"]);
		assert!(result.deleted.is_empty());
	}

	#[test]
	fn test_everything_deleted() {
		let previous = snapshot(&[("a.txt", 100)]);
		let result = diff(&previous, &Snapshot::empty());
		assert!(result.added.is_empty());
		assert!(result.modified.is_empty());
		assert_eq!(result.deleted.iter().collect::<Vec<_>>(), vec!["a.txt"]);
	}

	#[test]
	fn test_everything_added_from_empty_previous() {
		let current = snapshot(&[("a.txt", 1), ("b.txt", 2)]);
		let result = diff(&Snapshot::empty(), &current);
		assert_eq!(result.added.len(), 2);
		assert!(result.modified.is_empty());
		assert!(result.deleted.is_empty());
	}

	#[test]
	fn test_diff_anti_symmetry() {
		let a = snapshot(&[("x.txt", 1), ("y.txt", 2)]);
		let b = snapshot(&[("y.txt", 2), ("z.txt", 3)]);

		let forward = diff(&a, &b);
		let backward = diff(&b, &a);
		assert_eq!(forward.added, backward.deleted);
		assert_eq!(forward.deleted, backward.added);
		assert_eq!(forward.modified, backward.modified);
	}

	#[test]
	fn test_mtime_change_is_modified() {
		let previous: Snapshot =
			[("a.txt".to_string(), Fingerprint::Meta { size: 5, mtime: 100 })]
				.into_iter()
				.collect();
		let current: Snapshot =
			[("a.txt".to_string(), Fingerprint::Meta { size: 5, mtime: 200 })]
				.into_iter()
				.collect();

		let result = diff(&previous, &current);
		assert_eq!(result.modified.len(), 1);
		assert!(result.added.is_empty() && result.deleted.is_empty());
	}

	#[test]
	fn test_sets_are_disjoint() {
		let previous = snapshot(&[("a", 1), ("b", 2), ("c", 3)]);
		let current = snapshot(&[("b", 20), ("c", 3), ("d", 4)]);
		let result = diff(&previous, &current);

		for path in &result.added {
			assert!(!result.modified.contains(path));
			assert!(!result.deleted.contains(path));
		}
		for path in &result.modified {
			assert!(!result.deleted.contains(path));
		}
	}
}

// vim: ts=4
