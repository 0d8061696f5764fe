//! Error types for the tracer
//!
//! This module contains error types and a result type for the tracer.

use std::io;
use std::net::SocketAddr;
use thiserror::Error;

/// Result type for tracer operations
pub type Result<T> = std::result::Result<T, TraceError>;

/// Error type for tracer operations
#[derive(Debug, Error)]
pub enum TraceError {
	/// No definition of the symbol exists after this module in search order
	#[error("Symbol `{name}` has no definition later in the search order: {reason}")]
	SymbolNotFound { name: String, reason: String },

	/// The symbol name cannot be passed to the dynamic linker
	#[error("Invalid symbol name `{0}`")]
	InvalidSymbolName(String),

	/// The trace endpoint could not be reached
	#[error("Could not connect to trace endpoint {addr}: {source}")]
	Connect {
		addr: SocketAddr,
		#[source]
		source: io::Error,
	},

	/// An earlier connection attempt failed, the sink stays degraded
	#[error("The trace sink is unavailable")]
	SinkUnavailable,
}
