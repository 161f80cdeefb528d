use std::fmt::Write;
use std::path::PathBuf;

use clap::{
	ArgAction, ColorChoice, Command, CommandFactory, FromArgMatches, Parser, Subcommand, ValueEnum,
	builder::{
		Styles,
		styling::{AnsiColor, Effects},
	},
};
use coseek::app_dirs;
use coseek::{EntityId, SearchableEntity};

/// Produce the full version banner including config and data directories.
fn long_version() -> &'static str {
	let config_dir = match app_dirs::get_config_dir() {
		Ok(path) => path.display().to_string(),
		Err(err) => format!("unavailable ({err})"),
	};
	let data_dir = match app_dirs::get_data_dir() {
		Ok(path) => path.display().to_string(),
		Err(err) => format!("unavailable ({err})"),
	};

	let mut details = format!("coseek {}", env!("CARGO_PKG_VERSION"));
	let _ = writeln!(details);
	let _ = writeln!(details, "config directory: {config_dir}");
	let _ = writeln!(details, "data directory: {data_dir}");

	Box::leak(details.into_boxed_str())
}

/// Create the clap styles used for custom colour output.
fn cli_styles() -> Styles {
	Styles::styled()
		.header(AnsiColor::Green.on_default().effects(Effects::BOLD))
		.usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
		.literal(AnsiColor::Cyan.on_default())
		.placeholder(AnsiColor::Yellow.on_default())
}

/// Parse command line arguments into the strongly typed [`CliArgs`] structure.
pub(crate) fn parse_cli() -> CliArgs {
	let mut matches = cli_command().get_matches();
	CliArgs::from_arg_matches_mut(&mut matches).unwrap_or_else(|err| err.exit())
}

fn cli_command() -> Command {
	CliArgs::command()
}

#[derive(Parser, Debug)]
#[command(
	name = "coseek",
	version,
	long_version = long_version(),
	about = "Search companies, keep recent picks and hand the selection to the dashboard",
	color = ColorChoice::Auto,
	styles = cli_styles()
)]
/// Command-line arguments accepted by the `coseek` binary.
pub(crate) struct CliArgs {
	#[arg(
		short,
		long = "config",
		value_name = "FILE",
		env = "COSEEK_CONFIG",
		action = ArgAction::Append,
		global = true,
		help = "Additional configuration file to merge (default: none)"
	)]
	pub(crate) config: Vec<PathBuf>,
	#[arg(
		short = 'n',
		long = "no-config",
		global = true,
		help = "Skip loading default configuration files (default: disabled)"
	)]
	pub(crate) no_config: bool,
	#[arg(
		short = 'b',
		long = "base-url",
		value_name = "URL",
		global = true,
		help = "Base url of the company search service (default: http://localhost:3000)"
	)]
	pub(crate) base_url: Option<String>,
	#[arg(
		long = "timeout",
		value_name = "SECONDS",
		global = true,
		help = "HTTP timeout for a single lookup (default: client default)"
	)]
	pub(crate) timeout_secs: Option<u64>,
	#[arg(
		short = 'd',
		long = "debounce",
		value_name = "MILLIS",
		global = true,
		help = "Quiet period before a lookup is sent (default: 300)"
	)]
	pub(crate) debounce_ms: Option<u64>,
	#[arg(
		long = "store",
		value_name = "FILE",
		global = true,
		help = "File holding recent searches and the selection (default: data directory)"
	)]
	pub(crate) store: Option<PathBuf>,
	#[arg(
		short = 'e',
		long,
		global = true,
		help = "Keep recent searches in memory only (default: disabled)"
	)]
	pub(crate) ephemeral: bool,
	#[arg(
		long = "print-config",
		global = true,
		help = "Print the effective configuration before running (default: disabled)"
	)]
	pub(crate) print_config: bool,
	#[arg(
		short = 'o',
		long,
		value_enum,
		default_value_t = OutputFormat::Plain,
		global = true,
		help = "Choose how results are printed"
	)]
	pub(crate) output: OutputFormat,
	#[arg(
		short = 'v',
		long = "verbose",
		action = ArgAction::Count,
		global = true,
		help = "Raise log verbosity; repeat for more (default: warnings only)"
	)]
	pub(crate) verbose: u8,
	#[command(subcommand)]
	pub(crate) command: Option<CliCommand>,
}

/// Actions the binary can perform.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub(crate) enum CliCommand {
	/// Type a query, wait for results and print them.
	Search {
		/// Text to search for.
		query: String,
		/// Select the N-th result (1-based) instead of listing them.
		#[arg(short, long, value_name = "N")]
		pick: Option<usize>,
	},
	/// Show what an empty search box offers: recent picks and recommendations.
	Suggestions,
	/// List recent selections, most recent first.
	Recent,
	/// Commit a selection without searching.
	Select {
		#[arg(long)]
		name: String,
		/// Numeric or textual identifier.
		#[arg(long)]
		id: Option<String>,
		#[arg(long)]
		url: Option<String>,
	},
	/// Print the company the dashboard will show.
	Selected,
}

impl CliCommand {
	/// Build the entity described by a `select` invocation.
	pub(crate) fn entity(name: &str, id: Option<&str>, url: Option<&str>) -> SearchableEntity {
		let mut entity = SearchableEntity::named(name);
		if let Some(id) = id {
			entity.id = Some(match id.parse::<serde_json::Number>() {
				Ok(number) => EntityId::Number(number),
				Err(_) => EntityId::Text(id.to_owned()),
			});
		}
		entity.url = url.map(str::to_owned);
		entity
	}
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
/// Output formats supported by the CLI utility.
pub(crate) enum OutputFormat {
	Plain,
	Json,
}
