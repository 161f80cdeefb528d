use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::{KeyValueStore, StoreError};

/// Store backed by a single JSON object file mapping keys to string values.
///
/// Every write rewrites the whole file through a temporary sibling that is
/// renamed into place, so readers never observe a half-written document.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
	path: PathBuf,
}

impl JsonFileStore {
	#[must_use]
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	#[must_use]
	pub fn path(&self) -> &Path {
		&self.path
	}

	fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
		let bytes = match fs::read(&self.path) {
			Ok(bytes) => bytes,
			Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
			Err(source) => return Err(self.io_error(source)),
		};
		if bytes.iter().all(u8::is_ascii_whitespace) {
			return Ok(BTreeMap::new());
		}

		serde_json::from_slice(&bytes).map_err(|_| StoreError::Corrupt {
			path: self.path.display().to_string(),
		})
	}

	fn write_all(&self, values: &BTreeMap<String, String>) -> Result<(), StoreError> {
		if let Some(dir) = self.path.parent() {
			if !dir.as_os_str().is_empty() {
				fs::create_dir_all(dir).map_err(|source| self.io_error(source))?;
			}
		}

		let data = serde_json::to_vec_pretty(values)?;
		let tmp_path = self.path.with_extension("tmp");
		{
			let mut file = fs::File::create(&tmp_path).map_err(|source| self.io_error(source))?;
			file.write_all(&data)
				.map_err(|source| self.io_error(source))?;
			file.sync_all().map_err(|source| self.io_error(source))?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|source| self.io_error(source))
	}

	/// Load the document for a mutation. A corrupt document is replaced
	/// rather than blocking every future write.
	fn read_for_update(&self) -> Result<BTreeMap<String, String>, StoreError> {
		match self.read_all() {
			Err(StoreError::Corrupt { path }) => {
				tracing::warn!(%path, "discarding corrupt storage file");
				Ok(BTreeMap::new())
			}
			other => other,
		}
	}

	fn io_error(&self, source: io::Error) -> StoreError {
		StoreError::Io {
			path: self.path.display().to_string(),
			source,
		}
	}
}

impl KeyValueStore for JsonFileStore {
	fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
		Ok(self.read_all()?.remove(key))
	}

	fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
		let mut values = self.read_for_update()?;
		values.insert(key.to_owned(), value.to_owned());
		self.write_all(&values)
	}

	fn remove(&self, key: &str) -> Result<(), StoreError> {
		let mut values = self.read_for_update()?;
		if values.remove(key).is_some() {
			self.write_all(&values)?;
		}
		Ok(())
	}
}
