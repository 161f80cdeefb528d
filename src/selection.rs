//! Committing a picked entity: recency update, selected slot, navigation.

use serde::Serialize;

use crate::recency::RecencyStore;
use crate::storage::{KeyValueStore, SELECTED_COMPANY_KEY, StoreError};
use crate::types::SearchableEntity;

/// Sector shown by the dashboard when nothing has been selected yet.
pub const DEFAULT_SELECTION: &str = "Banks and NBFC";

/// Where the host should go after a selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Navigation {
	pub url: Option<String>,
	pub name: String,
}

impl From<&SearchableEntity> for Navigation {
	fn from(entity: &SearchableEntity) -> Self {
		Self {
			url: entity.url.clone(),
			name: entity.name.clone(),
		}
	}
}

/// Receives the close/navigate signal once a selection is committed.
pub trait Navigator {
	fn navigate(&mut self, target: Navigation);
}

impl<F> Navigator for F
where
	F: FnMut(Navigation),
{
	fn navigate(&mut self, target: Navigation) {
		self(target);
	}
}

/// The single "currently selected company" value read by the dashboard.
pub struct SelectionSlot;

impl SelectionSlot {
	pub fn write<S: KeyValueStore>(backend: &S, name: &str) -> Result<(), StoreError> {
		let payload = serde_json::to_string(name)?;
		backend.set(SELECTED_COMPANY_KEY, &payload)
	}

	/// Stored name, or `None` when unset, unreadable or not a JSON string.
	pub fn read<S: KeyValueStore>(backend: &S) -> Option<String> {
		let raw = match backend.get(SELECTED_COMPANY_KEY) {
			Ok(raw) => raw?,
			Err(err) => {
				tracing::warn!(error = %err, "failed to read selected company");
				return None;
			}
		};
		serde_json::from_str(&raw).ok()
	}

	pub fn read_or_default<S: KeyValueStore>(backend: &S) -> String {
		Self::read(backend).unwrap_or_else(|| DEFAULT_SELECTION.to_owned())
	}
}

/// Applies a user's pick to the recency list and the selected slot and
/// tells the host to move on.
#[derive(Debug)]
pub struct SelectionCommitter<S> {
	recency: RecencyStore<S>,
}

impl<S: KeyValueStore> SelectionCommitter<S> {
	pub fn new(recency: RecencyStore<S>) -> Self {
		Self { recency }
	}

	#[must_use]
	pub fn recency(&self) -> &RecencyStore<S> {
		&self.recency
	}

	/// Persistence failures are logged and do not stop the navigation signal.
	pub fn select<N>(&mut self, entity: &SearchableEntity, navigator: &mut N)
	where
		N: Navigator + ?Sized,
	{
		if let Err(err) = self.recency.record(entity.clone()) {
			tracing::warn!(error = %err, name = %entity.name, "failed to persist recent searches");
		}
		if let Err(err) = SelectionSlot::write(self.recency.backend(), &entity.name) {
			tracing::warn!(error = %err, name = %entity.name, "failed to persist selected company");
		}
		tracing::debug!(name = %entity.name, "selection committed");
		navigator.navigate(Navigation::from(entity));
	}
}
