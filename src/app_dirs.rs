//! Where `coseek` keeps its configuration and its persisted search state.
//!
//! Each location can be redirected with an environment variable; otherwise the
//! platform layout from the `directories` crate applies.

use std::env;
use std::path::PathBuf;

use anyhow::{Result, anyhow};
use directories::ProjectDirs;

/// The directories the application owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppDir {
	/// Holds `config.toml`.
	Config,
	/// Holds the key-value store with recent searches and the selection.
	Data,
}

impl AppDir {
	/// Environment variable that overrides this directory.
	#[must_use]
	pub fn env_var(self) -> &'static str {
		match self {
			Self::Config => "COSEEK_CONFIG_DIR",
			Self::Data => "COSEEK_DATA_DIR",
		}
	}

	/// Resolve the directory, preferring a non-empty override.
	pub fn resolve(self) -> Result<PathBuf> {
		if let Some(dir) = env::var_os(self.env_var()).filter(|value| !value.is_empty()) {
			return Ok(PathBuf::from(dir));
		}

		let dirs = ProjectDirs::from("io", "albo", "coseek")
			.ok_or_else(|| anyhow!("no home directory to place coseek {self:?} files in"))?;
		Ok(match self {
			Self::Config => dirs.config_local_dir().to_path_buf(),
			Self::Data => dirs.data_local_dir().to_path_buf(),
		})
	}
}

/// Return the configuration directory searched for `config.toml`.
pub fn get_config_dir() -> Result<PathBuf> {
	AppDir::Config.resolve()
}

/// Return the data directory that stores recent searches and the selection.
pub fn get_data_dir() -> Result<PathBuf> {
	AppDir::Data.resolve()
}
