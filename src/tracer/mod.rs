//! Call tracing
//!
//! `Tracer` is the context every intercepted call goes through: it writes
//! the pre-call fragment, forwards to the backend, writes the result and
//! hands the backend's value back untouched.
//!
//! The sink lock is released while the real function runs, so calls from
//! several threads may overlap. A record interrupted by another thread is
//! ended early and repeated in full together with its result.

mod builder;
mod error;

pub use builder::{DEFAULT_ENDPOINT, DEFAULT_LINE_CAPACITY, DEFAULT_PORT, TraceConfig, TracerBuilder};
pub use error::{Result, TraceError};

use std::sync::LazyLock;

use crate::alc::{
	ALCboolean, ALCchar, ALCcontext, ALCdevice, ALCenum, ALCint, ALCsizei, ALCuint, ALCvoid, returns_device_list,
};
use crate::backend::{AlcBackend, NextAlc};
use crate::format::{AlcParam, CStrArg, DeviceList, Fragment, SampleFormat, ptr};
use crate::sink::TraceSink;

// The process-wide tracer used by the exported hooks
static TRACER: LazyLock<Tracer<NextAlc>> = LazyLock::new(init_process_tracer);

/// Get the process-wide tracer, initializing it on first use
///
/// Initialization resolves every hooked symbol and connects the sink. It runs
/// once per process no matter which hook is called first.
pub fn tracer() -> &'static Tracer<NextAlc> {
	&TRACER
}

fn init_process_tracer() -> Tracer<NextAlc> {
	crate::util::init_logging();
	tracing::debug!("Diagnostics enabled up to {}", tracing::level_filters::LevelFilter::current());

	tracing::info!("Resolving {} ALC symbols...", NextAlc::SYMBOLS.len());
	let backend = match NextAlc::resolve() {
		Ok(backend) => backend,
		Err(e) => {
			// Nothing to forward to, the host cannot continue
			tracing::error!("Failed to bind the real OpenAL library: {}", e);
			std::process::abort();
		},
	};

	TracerBuilder::new().build(backend)
}

/// Traces calls on their way to an `AlcBackend`
#[derive(Debug)]
pub struct Tracer<B: AlcBackend> {
	backend: B,
	sink: TraceSink,
	config: TraceConfig,
}

impl<B: AlcBackend> Tracer<B> {
	/// Create a tracer
	///
	/// This is typically called by the `TracerBuilder` and not directly.
	pub(crate) const fn new(backend: B, sink: TraceSink, config: TraceConfig) -> Self {
		Self { backend, sink, config }
	}

	/// The backend calls are forwarded to
	#[must_use]
	pub const fn backend(&self) -> &B {
		&self.backend
	}

	/// The configuration the tracer was built with
	#[must_use]
	pub const fn config(&self) -> &TraceConfig {
		&self.config
	}

	/// Whether trace records currently reach the observer
	#[must_use]
	pub fn is_connected(&self) -> bool {
		self.sink.is_open()
	}

	fn emit(&self, fragment: impl AsRef<[u8]>) {
		self.sink.write(fragment.as_ref());
	}

	/// # Safety
	///
	/// Same contract as `alcCaptureOpenDevice`.
	pub unsafe fn alc_capture_open_device(
		&self,
		device_name: *const ALCchar,
		frequency: ALCuint,
		format: ALCenum,
		buffer_size: ALCsizei,
	) -> *mut ALCdevice {
		self.emit(
			Fragment::new()
				.text("alcCaptureOpenDevice(")
				.c_str(unsafe { CStrArg::new(device_name) })
				.text(format_args!(", {}, {}, {}) = ", frequency, SampleFormat(format), buffer_size)),
		);
		let ret = unsafe { self.backend.alc_capture_open_device(device_name, frequency, format, buffer_size) };
		self.emit(format!("{}\n", ptr(ret)));
		ret
	}

	/// # Safety
	///
	/// Same contract as `alcCaptureCloseDevice`.
	pub unsafe fn alc_capture_close_device(&self, device: *mut ALCdevice) -> ALCboolean {
		self.emit(format!("alcCaptureCloseDevice({}) = ", ptr(device)));
		let ret = unsafe { self.backend.alc_capture_close_device(device) };
		self.emit(format!("{ret}\n"));
		ret
	}

	/// # Safety
	///
	/// Same contract as `alcCaptureStart`.
	pub unsafe fn alc_capture_start(&self, device: *mut ALCdevice) {
		self.emit(format!("alcCaptureStart({})\n", ptr(device)));
		unsafe { self.backend.alc_capture_start(device) };
	}

	/// # Safety
	///
	/// Same contract as `alcCaptureStop`.
	pub unsafe fn alc_capture_stop(&self, device: *mut ALCdevice) {
		self.emit(format!("alcCaptureStop({})\n", ptr(device)));
		unsafe { self.backend.alc_capture_stop(device) };
	}

	/// Silent unless `trace_capture_samples` is set, since capture loops poll
	/// this continuously.
	///
	/// # Safety
	///
	/// Same contract as `alcCaptureSamples`.
	pub unsafe fn alc_capture_samples(&self, device: *mut ALCdevice, buffer: *mut ALCvoid, samples: ALCsizei) {
		if self.config().trace_capture_samples {
			self.emit(format!("alcCaptureSamples({}, {}, {})\n", ptr(device), ptr(buffer), samples));
		}
		unsafe { self.backend.alc_capture_samples(device, buffer, samples) };
	}

	/// # Safety
	///
	/// Same contract as `alcOpenDevice`.
	pub unsafe fn alc_open_device(&self, device_name: *const ALCchar) -> *mut ALCdevice {
		self.emit(
			Fragment::new()
				.text("alcOpenDevice(")
				.c_str(unsafe { CStrArg::new(device_name) })
				.text(") = "),
		);
		let ret = unsafe { self.backend.alc_open_device(device_name) };
		self.emit(format!("{}\n", ptr(ret)));
		ret
	}

	/// # Safety
	///
	/// Same contract as `alcCloseDevice`.
	pub unsafe fn alc_close_device(&self, device: *mut ALCdevice) -> ALCboolean {
		self.emit(format!("alcCloseDevice({}) = ", ptr(device)));
		let ret = unsafe { self.backend.alc_close_device(device) };
		self.emit(format!("{ret}\n"));
		ret
	}

	/// # Safety
	///
	/// Same contract as `alcCreateContext`.
	pub unsafe fn alc_create_context(&self, device: *mut ALCdevice, attr_list: *const ALCint) -> *mut ALCcontext {
		self.emit(format!("alcCreateContext({}, {}) = ", ptr(device), ptr(attr_list)));
		let ret = unsafe { self.backend.alc_create_context(device, attr_list) };
		self.emit(format!("{}\n", ptr(ret)));
		ret
	}

	/// # Safety
	///
	/// Same contract as `alcDestroyContext`.
	pub unsafe fn alc_destroy_context(&self, context: *mut ALCcontext) {
		self.emit(format!("alcDestroyContext({})\n", ptr(context)));
		unsafe { self.backend.alc_destroy_context(context) };
	}

	/// # Safety
	///
	/// Same contract as `alcMakeContextCurrent`.
	pub unsafe fn alc_make_context_current(&self, context: *mut ALCcontext) -> ALCboolean {
		self.emit(format!("alcMakeContextCurrent({}) = ", ptr(context)));
		let ret = unsafe { self.backend.alc_make_context_current(context) };
		self.emit(format!("{ret}\n"));
		ret
	}

	/// Device enumeration results are rendered with their NUL separators
	/// visible.
	///
	/// # Safety
	///
	/// Same contract as `alcGetString`.
	pub unsafe fn alc_get_string(&self, device: *mut ALCdevice, param: ALCenum) -> *const ALCchar {
		self.emit(format!("alcGetString({}, {}) = ", ptr(device), AlcParam(param)));
		let ret = unsafe { self.backend.alc_get_string(device, param) };

		let result = if returns_device_list(device, param) {
			Fragment::new().device_list(unsafe { DeviceList::new(ret) })
		} else {
			Fragment::new().c_str(unsafe { CStrArg::new(ret) })
		};
		self.emit(result.text('\n'));
		ret
	}
}
