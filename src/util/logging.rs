//! Local diagnostics
//!
//! The tracer reports on itself through `tracing`, printed on stdout by a fmt
//! subscriber. These messages never reach the trace stream.

use std::env;
use std::sync::Once;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Target of every diagnostic this crate emits
const TARGET: &str = "openal_trace";

/// Set to any value to log this crate at `debug` instead of `warn`
const DEBUG_VAR: &str = "OPENAL_TRACE_DEBUG";

static INIT: Once = Once::new();

/// Install the stdout subscriber, once per process
///
/// A host that already installed a global subscriber keeps it.
pub fn init_logging() {
	INIT.call_once(|| {
		let rust_log = env::var(EnvFilter::DEFAULT_ENV).ok();
		let filter = diagnostics_filter(rust_log.as_deref(), env::var_os(DEBUG_VAR).is_some());

		let _ = tracing_subscriber::registry().with(fmt::layer()).with(filter).try_init();
	});
}

/// Build the filter from the host's `RUST_LOG` and the debug switch
///
/// Host directives are kept as given. Unless they name this crate, its own
/// level is appended, so a failed connection is reported whatever the host
/// chose to log.
fn diagnostics_filter(rust_log: Option<&str>, debug: bool) -> EnvFilter {
	let own = format!("{TARGET}={}", if debug { "debug" } else { "warn" });

	match rust_log.map(str::trim).filter(|spec| !spec.is_empty()) {
		Some(spec) if spec.contains(TARGET) => EnvFilter::new(spec),
		Some(spec) => EnvFilter::new(format!("{spec},{own}")),
		None => EnvFilter::new(own),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn warnings_by_default() {
		assert!(diagnostics_filter(None, false).to_string().contains("openal_trace=warn"));
		assert!(diagnostics_filter(Some("  "), false).to_string().contains("openal_trace=warn"));
	}

	#[test]
	fn debug_switch_raises_own_level() {
		assert!(diagnostics_filter(None, true).to_string().contains("openal_trace=debug"));
	}

	#[test]
	fn host_filter_still_reports_connect_failures() {
		let filter = diagnostics_filter(Some("hyper=info"), false).to_string();
		assert!(filter.contains("hyper=info"));
		assert!(filter.contains("openal_trace=warn"));
	}

	#[test]
	fn host_filter_naming_this_crate_is_kept() {
		let filter = diagnostics_filter(Some("openal_trace=trace"), true).to_string();
		assert!(filter.contains("openal_trace=trace"));
		assert!(!filter.contains("openal_trace=debug"));
	}

	#[test]
	fn init_is_idempotent() {
		init_logging();
		init_logging();
	}
}
