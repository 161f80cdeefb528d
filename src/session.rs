//! The search surface: one input, its dispatcher, and the commit path.

use std::thread;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::recency::RecencyStore;
use crate::search::{QueryDispatcher, QueryState, ViewModel, reconcile};
use crate::selection::{Navigator, SelectionCommitter};
use crate::storage::KeyValueStore;
use crate::types::{SearchableEntity, recommended_companies};

/// Longest single wait while settling, so the debounce deadline is never
/// overslept by much.
const WAIT_SLICE: Duration = Duration::from_millis(50);

/// Where the surface is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchPhase {
	/// No query typed.
	Idle,
	/// A lookup is scheduled and waiting out the quiet period.
	Typing,
	/// The authoritative lookup is in flight.
	Loading,
	/// Results for the current text have settled.
	Ready,
	/// A selection was made; the surface is closing.
	Committed,
}

/// A modal or landing-page search box.
pub struct SearchSession<S, N> {
	dispatcher: QueryDispatcher,
	committer: SelectionCommitter<S>,
	recommended: Vec<SearchableEntity>,
	navigator: N,
	committed: Option<SearchableEntity>,
}

impl<S, N> SearchSession<S, N>
where
	S: KeyValueStore,
	N: Navigator,
{
	/// Mount the surface. Recent selections are loaded here and only here.
	pub fn new(dispatcher: QueryDispatcher, store: S, navigator: N) -> Self {
		Self {
			dispatcher,
			committer: SelectionCommitter::new(RecencyStore::open(store)),
			recommended: recommended_companies(),
			navigator,
			committed: None,
		}
	}

	#[must_use]
	pub fn with_recommended(mut self, recommended: Vec<SearchableEntity>) -> Self {
		self.recommended = recommended;
		self
	}

	/// Show the surface again with a fresh, empty input.
	pub fn open(&mut self) {
		self.dispatcher.reset();
		self.committed = None;
	}

	pub fn on_input(&mut self, text: impl Into<String>, now: Instant) {
		if self.committed.is_some() {
			return;
		}
		self.dispatcher.on_input(text, now);
	}

	/// Returns whether the view may have changed.
	pub fn poll(&mut self, now: Instant) -> bool {
		self.dispatcher.poll(now)
	}

	/// Drive the debounce and the lookup with the wall clock until the
	/// surface stops typing or loading, or `timeout` elapses. A timeout too
	/// large to represent as an instant waits without a deadline.
	pub fn settle(&mut self, timeout: Duration) -> SearchPhase {
		let deadline = Instant::now().checked_add(timeout);
		loop {
			let now = Instant::now();
			self.poll(now);
			let phase = self.phase();
			let expired = deadline.is_some_and(|deadline| now >= deadline);
			if !matches!(phase, SearchPhase::Typing | SearchPhase::Loading) || expired {
				return phase;
			}

			let remaining = match deadline {
				Some(deadline) => deadline.saturating_duration_since(now).min(WAIT_SLICE),
				None => WAIT_SLICE,
			};
			match self.dispatcher.next_deadline() {
				Some(due) => thread::sleep(due.saturating_duration_since(now).min(remaining)),
				None => {
					self.dispatcher.wait_for_response(remaining);
				}
			}
		}
	}

	#[must_use]
	pub fn view(&self) -> ViewModel<'_> {
		reconcile(
			self.dispatcher.state(),
			self.committer.recency().entries(),
			&self.recommended,
		)
	}

	#[must_use]
	pub fn phase(&self) -> SearchPhase {
		let query = self.dispatcher.state();
		if self.committed.is_some() {
			SearchPhase::Committed
		} else if !query.has_query() {
			SearchPhase::Idle
		} else if self.dispatcher.is_pending() {
			SearchPhase::Typing
		} else if query.is_loading {
			SearchPhase::Loading
		} else {
			SearchPhase::Ready
		}
	}

	/// Commit `entity`: recent list, selected slot, navigation signal.
	pub fn select(&mut self, entity: &SearchableEntity) {
		if self.committed.is_some() {
			return;
		}
		self.committer.select(entity, &mut self.navigator);
		self.committed = Some(entity.clone());
	}

	/// Pick the first live result, as pressing enter in the input does.
	pub fn submit(&mut self) -> Option<SearchableEntity> {
		if self.committed.is_some() {
			return None;
		}
		let first = match self.view() {
			ViewModel::Results { results } => results.first().cloned(),
			_ => None,
		}?;
		self.select(&first);
		Some(first)
	}

	#[must_use]
	pub fn query(&self) -> &QueryState {
		self.dispatcher.state()
	}

	#[must_use]
	pub fn recent(&self) -> &[SearchableEntity] {
		self.committer.recency().entries()
	}

	#[must_use]
	pub fn recommended(&self) -> &[SearchableEntity] {
		&self.recommended
	}

	#[must_use]
	pub fn committed(&self) -> Option<&SearchableEntity> {
		self.committed.as_ref()
	}

	#[must_use]
	pub fn store(&self) -> &S {
		self.committer.recency().backend()
	}
}

#[cfg(test)]
mod tests;
