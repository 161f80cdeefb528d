use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Identifier attached to an entity by the lookup service.
///
/// The service is not consistent about the JSON type of ids, so any number
/// and any string is accepted and written back in the shape it arrived in.
/// Numbers compare by value representation, so `1` and `1.0` are distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
	Number(Number),
	Text(String),
}

impl EntityId {
	/// The id as an integer, when it is a number that fits in `i64`.
	#[must_use]
	pub fn as_i64(&self) -> Option<i64> {
		match self {
			Self::Number(number) => number.as_i64(),
			Self::Text(_) => None,
		}
	}
}

impl fmt::Display for EntityId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Number(value) => write!(f, "{value}"),
			Self::Text(value) => f.write_str(value),
		}
	}
}

impl From<i64> for EntityId {
	fn from(value: i64) -> Self {
		Self::Number(value.into())
	}
}

impl From<&str> for EntityId {
	fn from(value: &str) -> Self {
		Self::Text(value.to_owned())
	}
}

impl From<String> for EntityId {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}

/// Key used to decide whether two entities refer to the same company.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identity<'a> {
	Id(&'a EntityId),
	Name(&'a str),
}

/// A company (or sector) that can be searched for and selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchableEntity {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<EntityId>,
	pub name: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub url: Option<String>,
}

impl SearchableEntity {
	/// Build an entity that is identified only by its name.
	#[must_use]
	pub fn named(name: impl Into<String>) -> Self {
		Self {
			id: None,
			name: name.into(),
			url: None,
		}
	}

	#[must_use]
	pub fn with_id(mut self, id: impl Into<EntityId>) -> Self {
		self.id = Some(id.into());
		self
	}

	#[must_use]
	pub fn with_url(mut self, url: impl Into<String>) -> Self {
		self.url = Some(url.into());
		self
	}

	/// Identity is the id when present, otherwise the name.
	#[must_use]
	pub fn identity(&self) -> Identity<'_> {
		match &self.id {
			Some(id) => Identity::Id(id),
			None => Identity::Name(&self.name),
		}
	}

	#[must_use]
	pub fn same_identity(&self, other: &SearchableEntity) -> bool {
		self.identity() == other.identity()
	}
}
