//! Bounded, most-recent-first list of previously selected entities.

use crate::storage::{KeyValueStore, RECENT_SEARCHES_KEY, StoreError};
use crate::types::SearchableEntity;

/// Maximum number of entries kept in the recency list.
pub const RECENCY_CAPACITY: usize = 5;

/// Persisted recency list plus its in-memory copy.
///
/// The list is read from the backend once when the store is opened and
/// afterwards only changes through [`RecencyStore::record`].
#[derive(Debug)]
pub struct RecencyStore<S> {
	backend: S,
	entries: Vec<SearchableEntity>,
}

impl<S: KeyValueStore> RecencyStore<S> {
	/// Open the store and load whatever the backend currently holds.
	pub fn open(backend: S) -> Self {
		let entries = load_entries(&backend);
		Self { backend, entries }
	}

	/// Entries in most-recent-first order.
	#[must_use]
	pub fn entries(&self) -> &[SearchableEntity] {
		&self.entries
	}

	#[must_use]
	pub fn backend(&self) -> &S {
		&self.backend
	}

	/// Read the last persisted list. Missing or malformed data yields an
	/// empty list.
	#[must_use]
	pub fn load(&self) -> Vec<SearchableEntity> {
		load_entries(&self.backend)
	}

	/// Move `entity` to the front, dropping any entry with the same identity
	/// and anything past the capacity, then persist.
	///
	/// The in-memory list is updated even when persisting fails.
	pub fn record(&mut self, entity: SearchableEntity) -> Result<(), StoreError> {
		self.entries.retain(|existing| !existing.same_identity(&entity));
		self.entries.insert(0, entity);
		self.entries.truncate(RECENCY_CAPACITY);
		self.persist()
	}

	fn persist(&self) -> Result<(), StoreError> {
		let payload = serde_json::to_string(&self.entries)?;
		self.backend.set(RECENT_SEARCHES_KEY, &payload)
	}
}

fn load_entries<S: KeyValueStore>(backend: &S) -> Vec<SearchableEntity> {
	let raw = match backend.get(RECENT_SEARCHES_KEY) {
		Ok(Some(raw)) => raw,
		Ok(None) => return Vec::new(),
		Err(err) => {
			tracing::warn!(error = %err, "failed to read recent searches");
			return Vec::new();
		}
	};

	let parsed: Vec<SearchableEntity> = match serde_json::from_str(&raw) {
		Ok(parsed) => parsed,
		Err(err) => {
			tracing::warn!(error = %err, "ignoring malformed recent searches");
			return Vec::new();
		}
	};

	let mut entries: Vec<SearchableEntity> = Vec::with_capacity(RECENCY_CAPACITY);
	for entity in parsed {
		if entries.len() == RECENCY_CAPACITY {
			break;
		}
		if entries.iter().all(|kept| !kept.same_identity(&entity)) {
			entries.push(entity);
		}
	}
	entries
}
