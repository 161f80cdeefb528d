use crate::types::SearchableEntity;

/// Commands understood by the background lookup worker.
#[derive(Debug)]
pub(crate) enum LookupCommand {
	/// Look up entities matching the query.
	Query {
		/// Identifier that lets the dispatcher correlate the response with its request.
		id: u64,
		/// Input text at the moment the debounce fired.
		query: String,
	},
	/// Stop the background worker thread.
	Shutdown,
}

/// Completed lookup emitted back to the dispatcher.
#[derive(Debug)]
pub(crate) struct LookupResponse {
	/// Identifier matching the [`LookupCommand::Query`] that produced the response.
	pub(crate) id: u64,
	pub(crate) query: String,
	/// Matches, or an empty list when the lookup failed.
	pub(crate) entities: Vec<SearchableEntity>,
	pub(crate) failed: bool,
}
