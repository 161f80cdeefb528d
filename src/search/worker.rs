use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use super::commands::{LookupCommand, LookupResponse};
use super::lookup::LookupService;

/// Launches the background lookup thread and returns communication channels.
///
/// The returned counter holds the newest request id issued by the
/// dispatcher; the worker skips queued queries older than it.
pub(crate) fn spawn<L>(service: L) -> (Sender<LookupCommand>, Receiver<LookupResponse>, Arc<AtomicU64>)
where
	L: LookupService,
{
	let (command_tx, command_rx) = mpsc::channel();
	let (response_tx, response_rx) = mpsc::channel();
	let latest_request_id = Arc::new(AtomicU64::new(0));
	let thread_latest = Arc::clone(&latest_request_id);

	// Without a worker every send fails and the dispatcher settles queries empty.
	let spawned = thread::Builder::new()
		.name("coseek-lookup".into())
		.spawn(move || worker_loop(&service, command_rx, response_tx, &thread_latest));
	if let Err(err) = spawned {
		tracing::warn!(error = %err, "failed to start lookup worker");
	}

	(command_tx, response_rx, latest_request_id)
}

fn worker_loop<L: LookupService>(
	service: &L,
	command_rx: Receiver<LookupCommand>,
	response_tx: Sender<LookupResponse>,
	latest_request_id: &AtomicU64,
) {
	while let Ok(command) = command_rx.recv() {
		if !handle_command(service, &response_tx, latest_request_id, command) {
			break;
		}
	}
}

fn handle_command<L: LookupService>(
	service: &L,
	response_tx: &Sender<LookupResponse>,
	latest_request_id: &AtomicU64,
	command: LookupCommand,
) -> bool {
	match command {
		LookupCommand::Query { id, query } => {
			if id < latest_request_id.load(AtomicOrdering::Acquire) {
				tracing::debug!(id, %query, "skipping superseded lookup");
				return true;
			}
			let response = run_lookup(service, id, query);
			response_tx.send(response).is_ok()
		}
		LookupCommand::Shutdown => false,
	}
}

fn run_lookup<L: LookupService>(service: &L, id: u64, query: String) -> LookupResponse {
	match service.search(&query) {
		Ok(entities) => LookupResponse {
			id,
			query,
			entities,
			failed: false,
		},
		Err(err) => {
			tracing::warn!(id, %query, error = %err, "lookup failed; treating as no results");
			LookupResponse {
				id,
				query,
				entities: Vec::new(),
				failed: true,
			}
		}
	}
}
