//! Diagnostic output for the binary.
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the host. Lookup and persistence failures never reach the search view,
//! so these logs are the only place they surface.

use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive string.
pub const LOG_ENV: &str = "COSEEK_LOG";

/// Install a stderr subscriber. `verbosity` raises the default level when
/// [`LOG_ENV`] is unset: 0 warn, 1 info, 2 debug, 3+ trace.
pub fn initialize(verbosity: u8) {
	let default_level = match verbosity {
		0 => "warn",
		1 => "info",
		2 => "debug",
		_ => "trace",
	};
	let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

	// A second initialization (tests, embedding hosts) keeps the first subscriber.
	let _ = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(false)
		.try_init();
}
