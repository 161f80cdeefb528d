//! Core crate exports for the `coseek` incremental company search.
//!
//! The root module re-exports the search surface, its persistence and the
//! lookup plumbing so that hosts can mount a search box without digging
//! through the module hierarchy.

pub mod app_dirs;
pub mod logging;
pub mod recency;
pub mod search;
pub mod selection;
pub mod session;
pub mod storage;
pub mod types;

pub use recency::{RECENCY_CAPACITY, RecencyStore};
pub use search::{
	DEFAULT_DEBOUNCE, HttpLookup, LookupError, LookupService, QueryDispatcher, QueryState,
	ViewModel, decode_results, reconcile,
};
pub use selection::{
	DEFAULT_SELECTION, Navigation, Navigator, SelectionCommitter, SelectionSlot,
};
pub use session::{SearchPhase, SearchSession};
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore, StoreError};
pub use types::{EntityId, Identity, SearchableEntity, recommended_companies};
