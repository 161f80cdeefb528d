//! Types shared by the search pipeline, the recency store and the host.

mod entity;
mod recommended;

pub use entity::{EntityId, Identity, SearchableEntity};
pub use recommended::recommended_companies;
