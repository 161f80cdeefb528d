mod cli;
mod settings;
mod workflow;

use anyhow::Result;
use cli::{CliCommand, OutputFormat, Report, parse_cli, print_json, print_plain};
use coseek::logging;
use settings::ResolvedConfig;
use workflow::SearchWorkflow;

fn main() -> Result<()> {
	let cli = parse_cli();
	logging::initialize(cli.verbose);

	let resolved = settings::load(&cli)?;

	if cli.print_config {
		resolved.print_summary();
	}

	let command = cli.command.clone().unwrap_or(CliCommand::Suggestions);
	run_command(cli.output, resolved, command)
}

/// Execute the requested command and print its report in the chosen format.
fn run_command(format: OutputFormat, settings: ResolvedConfig, command: CliCommand) -> Result<()> {
	let workflow = SearchWorkflow::from_config(settings)?;
	let report: Report = workflow.run(command)?;

	match format {
		OutputFormat::Plain => print_plain(&report),
		OutputFormat::Json => print_json(&report)?,
	}

	Ok(())
}
