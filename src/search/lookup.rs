//! The external company lookup service.

use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::types::{EntityId, SearchableEntity};

/// Failures talking to the lookup service. None of these reach the view:
/// the worker logs them and reports an empty result set.
#[derive(Debug, Error)]
pub enum LookupError {
	#[error("invalid lookup base url '{0}'")]
	InvalidBaseUrl(String),

	#[error("lookup request failed: {0}")]
	Transport(#[from] reqwest::Error),

	#[error("lookup service answered with status {0}")]
	Status(u16),

	#[error("lookup response could not be decoded: {0}")]
	Decode(#[from] serde_json::Error),

	#[error("lookup response has an unexpected shape: {0}")]
	Shape(String),
}

/// Anything able to turn a query into matching entities.
pub trait LookupService: Send + 'static {
	fn search(&self, query: &str) -> Result<Vec<SearchableEntity>, LookupError>;
}

impl<F> LookupService for F
where
	F: Fn(&str) -> Result<Vec<SearchableEntity>, LookupError> + Send + 'static,
{
	fn search(&self, query: &str) -> Result<Vec<SearchableEntity>, LookupError> {
		self(query)
	}
}

/// `GET {base}/search/{query}` against the company search backend.
#[derive(Debug, Clone)]
pub struct HttpLookup {
	client: Client,
	base_url: Url,
}

impl HttpLookup {
	pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, LookupError> {
		let base_url =
			Url::parse(base_url).map_err(|_| LookupError::InvalidBaseUrl(base_url.to_owned()))?;
		if base_url.cannot_be_a_base() {
			return Err(LookupError::InvalidBaseUrl(base_url.to_string()));
		}

		let mut builder = Client::builder();
		if let Some(timeout) = timeout {
			builder = builder.timeout(timeout);
		}
		let client = builder.build()?;
		Ok(Self { client, base_url })
	}

	/// The request url for `query`, which is encoded as one path segment.
	pub fn search_url(&self, query: &str) -> Result<Url, LookupError> {
		let mut url = self.base_url.clone();
		url.path_segments_mut()
			.map_err(|()| LookupError::InvalidBaseUrl(self.base_url.to_string()))?
			.pop_if_empty()
			.push("search")
			.push(query);
		Ok(url)
	}
}

impl LookupService for HttpLookup {
	fn search(&self, query: &str) -> Result<Vec<SearchableEntity>, LookupError> {
		let url = self.search_url(query)?;
		tracing::debug!(%url, "issuing lookup");
		let response = self.client.get(url).send()?;
		let status = response.status();
		if !status.is_success() {
			return Err(LookupError::Status(status.as_u16()));
		}
		let body = response.text()?;
		decode_results(&body)
	}
}

#[derive(Deserialize)]
struct WireEntity {
	#[serde(default)]
	id: Option<EntityId>,
	name: String,
	#[serde(default)]
	url: Option<String>,
	#[serde(default, rename = "isSearchEverywhere")]
	search_everywhere: bool,
}

/// Decode a lookup response body.
///
/// Accepts a bare array or an object with a `results` array. Entries that do
/// not describe an entity are skipped one by one. Entries flagged
/// `isSearchEverywhere` are "search the whole site" shortcuts rather than
/// companies and are dropped.
pub fn decode_results(body: &str) -> Result<Vec<SearchableEntity>, LookupError> {
	let entries = match serde_json::from_str::<Value>(body)? {
		Value::Array(entries) => entries,
		Value::Object(mut fields) => match fields.remove("results") {
			Some(Value::Array(entries)) => entries,
			None | Some(Value::Null) => Vec::new(),
			Some(other) => {
				return Err(LookupError::Shape(format!(
					"`results` is {}, expected an array",
					kind_of(&other)
				)));
			}
		},
		other => {
			return Err(LookupError::Shape(format!(
				"body is {}, expected an array or an object",
				kind_of(&other)
			)));
		}
	};

	Ok(entries
		.into_iter()
		.enumerate()
		.filter_map(|(index, entry)| match serde_json::from_value::<WireEntity>(entry) {
			Ok(entry) => Some(entry),
			Err(err) => {
				tracing::debug!(index, error = %err, "skipping undecodable lookup entry");
				None
			}
		})
		.filter(|entry| !entry.search_everywhere)
		.map(|entry| SearchableEntity {
			id: entry.id,
			name: entry.name,
			url: entry.url,
		})
		.collect())
}

fn kind_of(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "a boolean",
		Value::Number(_) => "a number",
		Value::String(_) => "a string",
		Value::Array(_) => "an array",
		Value::Object(_) => "an object",
	}
}
