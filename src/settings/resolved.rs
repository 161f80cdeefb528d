use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Where recent searches and the selected company are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageTarget {
	File(PathBuf),
	/// In-process only; nothing outlives the run.
	Ephemeral,
}

/// Application-ready configuration derived from user input, config files and
/// sensible defaults.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
	pub base_url: String,
	pub timeout: Option<Duration>,
	pub debounce: Duration,
	/// Upper bound on how long `search` waits for the surface to settle.
	pub settle_timeout: Duration,
	pub storage: StorageTarget,
	/// Files that contributed to this configuration, lowest precedence first.
	pub config_files: Vec<PathBuf>,
}

impl ResolvedConfig {
	/// Print a human readable summary of the effective configuration.
	pub fn print_summary(&self) {
		print!("{}", self.summary());
	}

	fn summary(&self) -> String {
		let mut lines = vec![
			"Effective configuration:".to_owned(),
			format!("  Service: {}", self.base_url),
		];
		match self.timeout {
			Some(timeout) => lines.push(format!("  Request timeout: {}s", timeout.as_secs())),
			None => lines.push("  Request timeout: (client default)".to_owned()),
		}
		lines.push(format!("  Debounce: {}ms", self.debounce.as_millis()));
		lines.push(format!("  Settle timeout: {}s", self.settle_timeout.as_secs()));
		match &self.storage {
			StorageTarget::File(path) => lines.push(format!("  Storage: {}", path.display())),
			StorageTarget::Ephemeral => lines.push("  Storage: (in memory)".to_owned()),
		}

		if self.config_files.is_empty() {
			lines.push("  Config files: (none)".to_owned());
		} else {
			lines.push("  Config files:".to_owned());
			lines.extend(
				self.config_files
					.iter()
					.map(|path| format!("    {}", path.display())),
			);
		}

		let mut out = lines.join("\n");
		out.push('\n');
		out
	}
}

/// Where an invalid value came from, for error messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum SettingSource {
	CliFlag(&'static str),
	Environment(&'static str),
	ConfigKey(&'static str),
}

impl fmt::Display for SettingSource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::CliFlag(flag) => write!(f, "CLI flag `{flag}`"),
			Self::Environment(var) => write!(f, "environment variable `{var}`"),
			Self::ConfigKey(key) => write!(f, "configuration key `{key}`"),
		}
	}
}

#[derive(Debug, Error)]
#[error("invalid value for {key} from {origin}: {reason} (value: {value})")]
pub(super) struct ConfigError {
	pub(super) key: &'static str,
	pub(super) value: String,
	pub(super) origin: SettingSource,
	pub(super) reason: String,
}

impl ConfigError {
	pub(super) fn invalid(
		key: &'static str,
		value: impl Into<String>,
		origin: SettingSource,
		reason: impl Into<String>,
	) -> Self {
		Self {
			key,
			value: value.into(),
			origin,
			reason: reason.into(),
		}
	}
}
