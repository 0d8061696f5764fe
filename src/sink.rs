//! Trace sink
//!
//! Owns the single outbound connection to the trace observer and applies the
//! line policy: a timestamp at the start of every line and a bounded length
//! for every write.
//!
//! A record is written in two fragments around the real call, and another
//! thread may write in between. When that happens the unfinished line is
//! ended first, and its owner later repeats the line's beginning in front of
//! its continuation. Every result therefore shares a line with its own call.

use std::collections::HashMap;
use std::io::Write;
use std::net::{SocketAddr, TcpStream};
use std::thread::{self, ThreadId};

use parking_lot::Mutex;
use tracing::{debug, error, info};

use crate::format::timestamp;
use crate::tracer::{Result, TraceConfig, TraceError};

/// Connection state of the sink
enum Connection {
	/// No connection attempt yet
	Closed,
	/// Connected, writes go here
	Open(Box<dyn Write + Send>),
	/// The connection attempt failed, writes are dropped
	Unusable,
}

struct SinkState {
	connection: Connection,
	/// Whether the last byte written was a newline
	at_line_start: bool,
	/// Thread that wrote the unfinished line at the end of the stream
	line_owner: Option<ThreadId>,
	/// Text of each thread's unfinished line, without its timestamp
	open_lines: HashMap<ThreadId, Vec<u8>>,
}

/// Destination for formatted trace records
pub struct TraceSink {
	endpoint: SocketAddr,
	line_capacity: usize,
	timestamps: bool,
	state: Mutex<SinkState>,
}

impl std::fmt::Debug for TraceSink {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TraceSink")
			.field("endpoint", &self.endpoint)
			.field("line_capacity", &self.line_capacity)
			.field("timestamps", &self.timestamps)
			.field("open", &self.is_open())
			.finish()
	}
}

impl TraceSink {
	/// Create a sink that connects to `config.endpoint` on first use
	#[must_use]
	pub fn new(config: &TraceConfig) -> Self {
		Self::with_connection(config, Connection::Closed)
	}

	/// Create a sink that writes to an already open destination
	#[must_use]
	pub fn with_writer(config: &TraceConfig, writer: Box<dyn Write + Send>) -> Self {
		Self::with_connection(config, Connection::Open(writer))
	}

	fn with_connection(config: &TraceConfig, connection: Connection) -> Self {
		Self {
			endpoint: config.endpoint,
			line_capacity: config.line_capacity,
			timestamps: config.timestamps,
			state: Mutex::new(SinkState {
				connection,
				at_line_start: true,
				line_owner: None,
				open_lines: HashMap::new(),
			}),
		}
	}

	/// Whether writes currently reach a destination
	#[must_use]
	pub fn is_open(&self) -> bool {
		matches!(self.state.lock().connection, Connection::Open(_))
	}

	/// Connect to the endpoint unless a connection was already attempted
	///
	/// A failed attempt is logged once and leaves the sink unusable for the
	/// rest of the process; it is never retried.
	pub fn ensure_open(&self) -> Result<()> {
		let mut state = self.state.lock();
		self.ensure_open_locked(&mut state)
	}

	fn ensure_open_locked(&self, state: &mut SinkState) -> Result<()> {
		match state.connection {
			Connection::Open(_) => return Ok(()),
			Connection::Unusable => return Err(TraceError::SinkUnavailable),
			Connection::Closed => {},
		}

		match TcpStream::connect(self.endpoint) {
			Ok(stream) => {
				info!("Connected to trace endpoint {}", self.endpoint);
				state.connection = Connection::Open(Box::new(stream));
				// Separate this session from earlier ones on the observer side
				self.put(state, b"\n");
				Ok(())
			},
			Err(source) => {
				state.connection = Connection::Unusable;
				let err = TraceError::Connect {
					addr: self.endpoint,
					source,
				};
				error!("{}", err);
				Err(err)
			},
		}
	}

	/// Append one trace fragment
	///
	/// Opens the connection on first use. Failures never reach the caller.
	/// The bytes are sent as they are, whatever their encoding.
	pub fn write(&self, fragment: &[u8]) {
		self.write_from(thread::current().id(), fragment);
	}

	fn write_from(&self, writer: ThreadId, fragment: &[u8]) {
		let mut state = self.state.lock();
		if self.ensure_open_locked(&mut state).is_err() {
			return;
		}

		if !state.at_line_start && state.line_owner != Some(writer) {
			self.put(&mut state, b"\n");
		}

		let mut line = state.open_lines.remove(&writer).unwrap_or_default();
		// Mid-line, the start of the line is already on the stream
		let sent = if state.at_line_start { 0 } else { line.len() };
		line.extend_from_slice(fragment);
		self.put(&mut state, &line[sent..]);

		if state.at_line_start {
			state.line_owner = None;
		} else {
			line.truncate(self.line_capacity);
			state.line_owner = Some(writer);
			state.open_lines.insert(writer, line);
		}
	}

	/// Write one assembled piece of a line
	fn put(&self, state: &mut SinkState, fragment: &[u8]) {
		let line = self.assemble(state.at_line_start, fragment);
		if let Some(&last) = line.last() {
			state.at_line_start = last == b'\n';
		}

		if let Connection::Open(writer) = &mut state.connection {
			if let Err(err) = writer.write_all(&line) {
				debug!("Dropped {} trace bytes: {}", line.len(), err);
			}
		}
	}

	/// Prefix the fragment with a timestamp when it starts a line, then
	/// truncate to the line capacity
	fn assemble(&self, at_line_start: bool, fragment: &[u8]) -> Vec<u8> {
		let limit = self.line_capacity.saturating_sub(1);
		let mut line = Vec::with_capacity(self.line_capacity);

		if self.timestamps && at_line_start {
			line.extend_from_slice(timestamp().as_bytes());
		}
		line.extend_from_slice(fragment);
		line.truncate(limit);
		line
	}
}
