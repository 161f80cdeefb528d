use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use coseek::app_dirs::AppDir;

use crate::cli::CliArgs;

/// Prefix of `COSEEK__SECTION__KEY` environment overrides.
const ENV_PREFIX: &str = "coseek";

/// Layered configuration plus the files that actually contributed to it.
pub(super) struct Layers {
	pub(super) config: Config,
	pub(super) files: Vec<PathBuf>,
}

/// Stack the optional default files, the explicit `--config` files and the
/// environment, in increasing precedence.
pub(super) fn build_config(cli: &CliArgs) -> Result<Layers> {
	let mut builder = Config::builder();
	let mut files = Vec::new();

	if !cli.no_config {
		for path in default_config_files().into_iter().filter(|path| path.is_file()) {
			builder = builder.add_source(File::from(path.clone()));
			files.push(path);
		}
	}

	for path in &cli.config {
		builder = builder.add_source(File::from(path.clone()).required(true));
		files.push(path.clone());
	}

	builder = builder.add_source(
		Environment::with_prefix(ENV_PREFIX)
			.separator("__")
			.try_parsing(true),
	);

	let config = builder.build().with_context(|| match files.as_slice() {
		[] => "failed to read configuration".to_owned(),
		files => format!(
			"failed to read configuration from {}",
			files
				.iter()
				.map(|path| path.display().to_string())
				.collect::<Vec<_>>()
				.join(", ")
		),
	})?;
	Ok(Layers { config, files })
}

/// Candidate default files, lowest precedence first: the per-user file, then
/// the project files in the working directory.
pub(super) fn default_config_files() -> Vec<PathBuf> {
	let user = AppDir::Config
		.resolve()
		.ok()
		.map(|dir| dir.join("config.toml"));
	let project = env::current_dir().ok().into_iter().flat_map(|dir| {
		[".coseek.toml", "coseek.toml"].map(|name| dir.join(name))
	});

	user.into_iter().chain(project).collect()
}
