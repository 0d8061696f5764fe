//! openal-trace - A preloadable tracer for OpenAL device and context calls
//!
//! Built as a shared object and loaded ahead of the OpenAL library, this
//! crate shadows the ALC device, context and capture entry points. Every
//! call is forwarded unchanged to the real implementation while a readable
//! record of it is streamed to an observer on `127.0.0.1:10000`:
//!
//! ```text
//! 2026:10:18 14:02:11 alcGetString((nil), ALC_DEVICE_SPECIFIER) = "Speakers\0Headset\0\0"
//! 2026:10:18 14:02:11 alcOpenDevice(NULL) = 0x5581d2a3c2a0
//! ```
//!
//! Names and device lists are sent byte for byte. Calls may come from several
//! threads at once; a record cut short by another thread's call is repeated
//! in full on the line that carries its result.
//!
//! # Getting Started
//!
//! ```bash
//! nc -lk 127.0.0.1 10000 &
//! LD_PRELOAD=target/release/libopenal_trace.so ./my-openal-program
//! ```
//!
//! The tracing logic itself is available as a library: a `Tracer` can wrap
//! any `AlcBackend`, which is how the test suite drives it.

pub mod alc;
pub mod backend;
pub mod format;
pub mod hooks;
pub mod resolver;
pub mod sink;
pub mod tracer;
pub mod util;

pub use backend::{AlcBackend, NextAlc};
pub use resolver::HookEntry;
pub use sink::TraceSink;
pub use tracer::{TraceConfig, TraceError, Tracer, TracerBuilder, tracer};

/// Create a new tracer builder
#[must_use]
pub fn new() -> TracerBuilder {
	TracerBuilder::new()
}
