//! Builder for creating tracers
//!
//! This module contains the `TracerBuilder` struct and the `TraceConfig`
//! it produces.

use std::io::Write;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use crate::backend::AlcBackend;
use crate::sink::TraceSink;
use crate::tracer::Tracer;

/// Port the trace observer listens on
pub const DEFAULT_PORT: u16 = 10000;

/// Where trace records are sent
pub const DEFAULT_ENDPOINT: SocketAddr = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, DEFAULT_PORT));

/// Size of the line buffer; a single write emits at most one byte less
pub const DEFAULT_LINE_CAPACITY: usize = 256;

/// Configuration for a tracer
#[derive(Debug, Clone)]
pub struct TraceConfig {
	/// Address of the trace observer
	pub endpoint: SocketAddr,
	/// Capacity of the line buffer, including the timestamp
	pub line_capacity: usize,
	/// Whether to prefix lines with a timestamp
	pub timestamps: bool,
	/// Whether to trace `alcCaptureSamples`, which runs on every capture poll
	pub trace_capture_samples: bool,
}

impl Default for TraceConfig {
	fn default() -> Self {
		Self {
			endpoint: DEFAULT_ENDPOINT,
			line_capacity: DEFAULT_LINE_CAPACITY,
			timestamps: true,
			trace_capture_samples: false,
		}
	}
}

/// Builder for creating tracers
pub struct TracerBuilder {
	/// The configuration for the tracer
	config: TraceConfig,
	/// A destination that replaces the TCP connection
	writer: Option<Box<dyn Write + Send>>,
}

impl Default for TracerBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Debug for TracerBuilder {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TracerBuilder")
			.field("config", &self.config)
			.field("writer", &if self.writer.is_some() { "Some(writer)" } else { "None" })
			.finish()
	}
}

impl TracerBuilder {
	/// Create a new tracer builder with the compiled-in settings
	#[must_use]
	pub fn new() -> Self {
		Self {
			config: TraceConfig::default(),
			writer: None,
		}
	}

	/// Send records to another address
	#[must_use]
	pub const fn endpoint(mut self, endpoint: SocketAddr) -> Self {
		self.config.endpoint = endpoint;
		self
	}

	/// Set the line buffer capacity
	#[must_use]
	pub const fn line_capacity(mut self, capacity: usize) -> Self {
		self.config.line_capacity = capacity;
		self
	}

	/// Enable or disable line timestamps
	#[must_use]
	pub const fn timestamps(mut self, timestamps: bool) -> Self {
		self.config.timestamps = timestamps;
		self
	}

	/// Enable or disable tracing of `alcCaptureSamples`
	#[must_use]
	pub const fn trace_capture_samples(mut self, trace: bool) -> Self {
		self.config.trace_capture_samples = trace;
		self
	}

	/// Write records to `writer` instead of connecting to the endpoint
	#[must_use]
	pub fn writer<W: Write + Send + 'static>(mut self, writer: W) -> Self {
		self.writer = Some(Box::new(writer));
		self
	}

	/// Build the tracer around `backend`
	///
	/// Connects to the endpoint right away. A failed connection leaves the
	/// tracer degraded; calls are still forwarded.
	pub fn build<B: AlcBackend>(self, backend: B) -> Tracer<B> {
		let sink = match self.writer {
			Some(writer) => TraceSink::with_writer(&self.config, writer),
			None => TraceSink::new(&self.config),
		};

		if let Err(err) = sink.ensure_open() {
			tracing::debug!("Tracing degraded: {}", err);
		}

		Tracer::new(backend, sink, self.config)
	}
}
