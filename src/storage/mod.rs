//! Key-value persistence used for recent searches and the selected company.
//!
//! The store only deals in strings; callers own the JSON encoding of the
//! values they keep under each key.

mod file;
mod memory;

use std::io;
use std::rc::Rc;

use thiserror::Error;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

/// Key holding the serialized recency list.
pub const RECENT_SEARCHES_KEY: &str = "recentSearches";
/// Key holding the name of the company the dashboard should show.
pub const SELECTED_COMPANY_KEY: &str = "selectedCompany";

/// Failures raised by a [`KeyValueStore`] backend.
#[derive(Debug, Error)]
pub enum StoreError {
	#[error("storage I/O failed for {path}: {source}")]
	Io {
		path: String,
		#[source]
		source: io::Error,
	},

	#[error("failed to encode stored value: {0}")]
	Encode(#[from] serde_json::Error),

	#[error("stored data at {path} is corrupt")]
	Corrupt { path: String },
}

/// A string store scoped to one user profile.
pub trait KeyValueStore {
	/// Return the value stored under `key`, if any.
	fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

	/// Replace the value stored under `key`.
	fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

	/// Remove `key`. Removing an absent key is not an error.
	fn remove(&self, key: &str) -> Result<(), StoreError>;
}

impl<S> KeyValueStore for &S
where
	S: KeyValueStore + ?Sized,
{
	fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
		<S as KeyValueStore>::get(*self, key)
	}

	fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
		<S as KeyValueStore>::set(*self, key, value)
	}

	fn remove(&self, key: &str) -> Result<(), StoreError> {
		<S as KeyValueStore>::remove(*self, key)
	}
}

impl<S> KeyValueStore for Rc<S>
where
	S: KeyValueStore + ?Sized,
{
	fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
		<S as KeyValueStore>::get(self, key)
	}

	fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
		<S as KeyValueStore>::set(self, key, value)
	}

	fn remove(&self, key: &str) -> Result<(), StoreError> {
		<S as KeyValueStore>::remove(self, key)
	}
}

impl<S> KeyValueStore for Box<S>
where
	S: KeyValueStore + ?Sized,
{
	fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
		<S as KeyValueStore>::get(self, key)
	}

	fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
		<S as KeyValueStore>::set(self, key, value)
	}

	fn remove(&self, key: &str) -> Result<(), StoreError> {
		<S as KeyValueStore>::remove(self, key)
	}
}
