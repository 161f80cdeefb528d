//! Debounced lookups against the company search service and the view they
//! feed.

mod commands;
mod debounce;
mod dispatcher;
mod lookup;
mod view;
mod worker;

#[cfg(test)]
pub(crate) use commands::{LookupCommand, LookupResponse};
pub use dispatcher::{DEFAULT_DEBOUNCE, QueryDispatcher, QueryState};
pub use lookup::{HttpLookup, LookupError, LookupService, decode_results};
pub use view::{ViewModel, reconcile};
