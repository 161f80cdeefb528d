use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Error, Result};
use coseek::app_dirs::AppDir;
use reqwest::Url;
use serde::Deserialize;

use crate::cli::CliArgs;

use super::resolved::{ConfigError, ResolvedConfig, SettingSource, StorageTarget};

const DEFAULT_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_DEBOUNCE_MS: u64 = 300;
const DEFAULT_SETTLE_TIMEOUT_SECS: u64 = 10;
const MAX_DEBOUNCE_MS: u64 = 60_000;
/// Store file created inside the data directory when no path is configured.
const STORAGE_FILE: &str = "storage.json";

/// Mirror of the configuration file representation before CLI overrides and
/// validation are applied.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct RawConfig {
	service: ServiceSection,
	search: SearchSection,
	storage: StorageSection,
}

/// The lookup backend.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ServiceSection {
	base_url: Option<String>,
	timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct SearchSection {
	debounce_ms: Option<u64>,
	settle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct StorageSection {
	path: Option<PathBuf>,
	ephemeral: Option<bool>,
}

impl RawConfig {
	/// Apply CLI overrides on top of the raw configuration values.
	pub(super) fn apply_cli_overrides(&mut self, cli: &CliArgs) {
		if let Some(url) = cli.base_url.clone() {
			self.service.base_url = Some(url);
		}
		if let Some(secs) = cli.timeout_secs {
			self.service.timeout_secs = Some(secs);
		}
		if let Some(millis) = cli.debounce_ms {
			self.search.debounce_ms = Some(millis);
		}
		if let Some(path) = cli.store.clone() {
			self.storage.path = Some(path);
		}
		if cli.ephemeral {
			self.storage.ephemeral = Some(true);
		}
	}

	/// Convert the raw configuration into a [`ResolvedConfig`], validating and
	/// filling defaults where required.
	pub(super) fn resolve(self, cli: &CliArgs) -> Result<ResolvedConfig> {
		let base_url = self
			.service
			.base_url
			.map(|url| url.trim().to_owned())
			.unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
		validate_base_url(&base_url, cli).map_err(Error::new)?;

		let timeout = match self.service.timeout_secs {
			Some(0) => {
				return Err(Error::new(ConfigError::invalid(
					"service.timeout_secs",
					"0",
					detect_source(
						cli.timeout_secs.is_some(),
						"COSEEK__SERVICE__TIMEOUT_SECS",
						"--timeout",
						"service.timeout_secs",
					),
					"must be greater than zero",
				)));
			}
			Some(secs) => Some(Duration::from_secs(secs)),
			None => None,
		};

		let debounce_ms = self.search.debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS);
		if debounce_ms > MAX_DEBOUNCE_MS {
			return Err(Error::new(ConfigError::invalid(
				"search.debounce_ms",
				debounce_ms.to_string(),
				detect_source(
					cli.debounce_ms.is_some(),
					"COSEEK__SEARCH__DEBOUNCE_MS",
					"--debounce",
					"search.debounce_ms",
				),
				format!("must be at most {MAX_DEBOUNCE_MS}"),
			)));
		}
		let debounce = Duration::from_millis(debounce_ms);

		let settle_timeout = match self.search.settle_timeout_secs {
			Some(0) => {
				return Err(Error::new(ConfigError::invalid(
					"search.settle_timeout_secs",
					"0",
					detect_source(
						false,
						"COSEEK__SEARCH__SETTLE_TIMEOUT_SECS",
						"",
						"search.settle_timeout_secs",
					),
					"must be greater than zero",
				)));
			}
			Some(secs) => Duration::from_secs(secs),
			None => Duration::from_secs(DEFAULT_SETTLE_TIMEOUT_SECS),
		};

		let storage = if self.storage.ephemeral.unwrap_or(false) {
			StorageTarget::Ephemeral
		} else {
			let path = match self.storage.path {
				Some(path) => path,
				None => AppDir::Data
					.resolve()
					.context("failed to resolve the default storage location")?
					.join(STORAGE_FILE),
			};
			StorageTarget::File(path)
		};

		Ok(ResolvedConfig {
			base_url,
			timeout,
			debounce,
			settle_timeout,
			storage,
			config_files: Vec::new(),
		})
	}
}

fn validate_base_url(base_url: &str, cli: &CliArgs) -> Result<(), ConfigError> {
	let invalid = |reason: &str| {
		ConfigError::invalid(
			"service.base_url",
			base_url,
			detect_source(
				cli.base_url.is_some(),
				"COSEEK__SERVICE__BASE_URL",
				"--base-url",
				"service.base_url",
			),
			reason,
		)
	};

	let url = Url::parse(base_url).map_err(|err| invalid(&err.to_string()))?;
	if !matches!(url.scheme(), "http" | "https") {
		return Err(invalid("scheme must be http or https"));
	}
	Ok(())
}

fn detect_source(
	cli_present: bool,
	env_var: &'static str,
	cli_flag: &'static str,
	key: &'static str,
) -> SettingSource {
	if cli_present {
		return SettingSource::CliFlag(cli_flag);
	}

	if env::var_os(env_var).is_some() {
		return SettingSource::Environment(env_var);
	}

	SettingSource::ConfigKey(key)
}
