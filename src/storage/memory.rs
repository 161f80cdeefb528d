use std::cell::RefCell;
use std::collections::HashMap;

use super::{KeyValueStore, StoreError};

/// Volatile store that forgets everything when dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
	values: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Seed the store with `value` under `key`.
	#[must_use]
	pub fn with_value(self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.values.borrow_mut().insert(key.into(), value.into());
		self
	}
}

impl KeyValueStore for MemoryStore {
	fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
		Ok(self.values.borrow().get(key).cloned())
	}

	fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
		self.values
			.borrow_mut()
			.insert(key.to_owned(), value.to_owned());
		Ok(())
	}

	fn remove(&self, key: &str) -> Result<(), StoreError> {
		self.values.borrow_mut().remove(key);
		Ok(())
	}
}
