use serde::Serialize;

use super::dispatcher::QueryState;
use crate::types::SearchableEntity;

/// What the search surface should render, borrowed from its inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ViewModel<'a> {
	/// Empty input: recent selections (possibly none) above the recommendations.
	Suggestions {
		recent: &'a [SearchableEntity],
		recommended: &'a [SearchableEntity],
	},
	Loading,
	Results {
		results: &'a [SearchableEntity],
	},
	NoResults,
}

impl ViewModel<'_> {
	/// Entities the user can pick from, in display order.
	pub fn entries(&self) -> impl Iterator<Item = &SearchableEntity> {
		const NONE: &[SearchableEntity] = &[];
		let (first, second) = match *self {
			Self::Suggestions {
				recent,
				recommended,
			} => (recent, recommended),
			Self::Results { results } => (results, NONE),
			Self::Loading | Self::NoResults => (NONE, NONE),
		};
		first.iter().chain(second)
	}

	#[must_use]
	pub fn shows_recent(&self) -> bool {
		matches!(self, Self::Suggestions { recent, .. } if !recent.is_empty())
	}
}

/// Precedence between live results, recent selections and recommendations.
#[must_use]
pub fn reconcile<'a>(
	query: &'a QueryState,
	recent: &'a [SearchableEntity],
	recommended: &'a [SearchableEntity],
) -> ViewModel<'a> {
	if !query.has_query() {
		ViewModel::Suggestions {
			recent,
			recommended,
		}
	} else if query.is_loading {
		ViewModel::Loading
	} else if query.results.is_empty() {
		ViewModel::NoResults
	} else {
		ViewModel::Results {
			results: &query.results,
		}
	}
}
