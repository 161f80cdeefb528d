use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::{Duration, Instant};

use super::commands::{LookupCommand, LookupResponse};
use super::debounce::Debouncer;
use super::lookup::LookupService;
use super::worker;
use crate::types::SearchableEntity;

/// Quiet period used when none is configured.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// What the search input currently shows and what the last lookup found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryState {
	pub raw_text: String,
	pub is_loading: bool,
	pub results: Vec<SearchableEntity>,
}

impl QueryState {
	/// Whitespace-only input counts as no query.
	#[must_use]
	pub fn has_query(&self) -> bool {
		!self.raw_text.trim().is_empty()
	}
}

/// Turns keystrokes into debounced lookups and keeps only the newest answer.
pub struct QueryDispatcher {
	tx: Sender<LookupCommand>,
	rx: Receiver<LookupResponse>,
	latest_request_id: Arc<AtomicU64>,
	debouncer: Debouncer<String>,
	state: QueryState,
	next_request_id: u64,
	/// Request whose response may still be committed.
	authoritative: Option<u64>,
}

impl QueryDispatcher {
	/// Start a dispatcher with its own lookup worker.
	pub fn spawn<L: LookupService>(service: L, debounce: Duration) -> Self {
		let (tx, rx, latest_request_id) = worker::spawn(service);
		Self::with_channels(tx, rx, latest_request_id, debounce)
	}

	pub(crate) fn with_channels(
		tx: Sender<LookupCommand>,
		rx: Receiver<LookupResponse>,
		latest_request_id: Arc<AtomicU64>,
		debounce: Duration,
	) -> Self {
		Self {
			tx,
			rx,
			latest_request_id,
			debouncer: Debouncer::new(debounce),
			state: QueryState::default(),
			next_request_id: 0,
			authoritative: None,
		}
	}

	#[must_use]
	pub fn state(&self) -> &QueryState {
		&self.state
	}

	#[must_use]
	pub fn debounce(&self) -> Duration {
		self.debouncer.quiet_period()
	}

	/// A lookup is scheduled but its quiet period has not elapsed yet.
	#[must_use]
	pub fn is_pending(&self) -> bool {
		self.debouncer.is_pending()
	}

	/// When the scheduled lookup becomes due, if one is scheduled.
	#[must_use]
	pub fn next_deadline(&self) -> Option<Instant> {
		self.debouncer.deadline()
	}

	/// Record a keystroke. Clearing the input empties the results at once.
	pub fn on_input(&mut self, text: impl Into<String>, now: Instant) {
		self.state.raw_text = text.into();
		if self.state.has_query() {
			self.debouncer.schedule(self.state.raw_text.clone(), now);
		} else {
			self.debouncer.cancel();
			self.abandon_in_flight();
			self.state.results.clear();
		}
	}

	/// Back to an empty input with nothing scheduled or authoritative.
	pub fn reset(&mut self) {
		self.debouncer.cancel();
		self.abandon_in_flight();
		self.state = QueryState::default();
	}

	/// Fire a due lookup and apply any finished responses.
	///
	/// Returns whether the visible state changed.
	pub fn poll(&mut self, now: Instant) -> bool {
		let mut changed = false;
		if let Some(query) = self.debouncer.fire_due(now) {
			self.issue(query);
			changed = true;
		}

		loop {
			match self.rx.try_recv() {
				Ok(response) => changed |= self.apply(response),
				Err(TryRecvError::Empty) => break,
				Err(TryRecvError::Disconnected) => {
					changed |= self.worker_gone();
					break;
				}
			}
		}
		changed
	}

	/// Block for at most `timeout` waiting for one response and apply it.
	///
	/// Returns whether the visible state changed.
	pub fn wait_for_response(&mut self, timeout: Duration) -> bool {
		match self.rx.recv_timeout(timeout) {
			Ok(response) => self.apply(response),
			Err(RecvTimeoutError::Timeout) => false,
			Err(RecvTimeoutError::Disconnected) => self.worker_gone(),
		}
	}

	fn issue(&mut self, query: String) {
		self.next_request_id = self.next_request_id.saturating_add(1);
		let id = self.next_request_id;
		self.latest_request_id.store(id, AtomicOrdering::Release);
		tracing::debug!(id, %query, "debounce elapsed; dispatching lookup");

		if self.tx.send(LookupCommand::Query { id, query }).is_err() {
			tracing::warn!(id, "lookup worker is not running; treating as no results");
			self.authoritative = None;
			self.state.is_loading = false;
			self.state.results.clear();
			return;
		}
		self.authoritative = Some(id);
		self.state.is_loading = true;
	}

	fn apply(&mut self, response: LookupResponse) -> bool {
		if self.authoritative != Some(response.id) {
			tracing::debug!(id = response.id, query = %response.query, "discarding superseded response");
			return false;
		}

		self.authoritative = None;
		self.state.is_loading = false;
		if response.query != self.state.raw_text {
			tracing::debug!(id = response.id, query = %response.query, "discarding response for stale input");
			return true;
		}

		if response.failed {
			tracing::debug!(id = response.id, "lookup failed; showing no results");
		}
		self.state.results = response.entities;
		true
	}

	fn abandon_in_flight(&mut self) {
		self.authoritative = None;
		self.state.is_loading = false;
		// Lets the worker skip anything still queued.
		self.next_request_id = self.next_request_id.saturating_add(1);
		self.latest_request_id
			.store(self.next_request_id, AtomicOrdering::Release);
	}

	fn worker_gone(&mut self) -> bool {
		if self.authoritative.take().is_none() {
			return false;
		}
		tracing::warn!("lookup worker stopped; treating in-flight lookup as no results");
		self.state.is_loading = false;
		self.state.results.clear();
		true
	}
}

impl Drop for QueryDispatcher {
	fn drop(&mut self) {
		let _ = self.tx.send(LookupCommand::Shutdown);
	}
}
