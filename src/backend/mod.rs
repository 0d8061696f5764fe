//! The real ALC implementation behind the tracer
//!
//! The tracer never calls the audio library directly. It goes through an
//! `AlcBackend`, which the shim binds to the next definition of each symbol
//! in search order and which tests replace with a scripted fake.

mod next;

pub use next::NextAlc;

use crate::alc::{ALCboolean, ALCchar, ALCcontext, ALCdevice, ALCenum, ALCint, ALCsizei, ALCuint, ALCvoid};

/// One method per intercepted ALC entry point
///
/// Every method mirrors the C signature of the function it forwards to.
///
/// # Safety
///
/// The pointer arguments carry the same requirements as the underlying ALC
/// function; implementations may dereference them.
pub trait AlcBackend: Send + Sync {
	unsafe fn alc_capture_open_device(
		&self,
		device_name: *const ALCchar,
		frequency: ALCuint,
		format: ALCenum,
		buffer_size: ALCsizei,
	) -> *mut ALCdevice;

	unsafe fn alc_capture_close_device(&self, device: *mut ALCdevice) -> ALCboolean;

	unsafe fn alc_capture_start(&self, device: *mut ALCdevice);

	unsafe fn alc_capture_stop(&self, device: *mut ALCdevice);

	unsafe fn alc_capture_samples(&self, device: *mut ALCdevice, buffer: *mut ALCvoid, samples: ALCsizei);

	unsafe fn alc_open_device(&self, device_name: *const ALCchar) -> *mut ALCdevice;

	unsafe fn alc_close_device(&self, device: *mut ALCdevice) -> ALCboolean;

	unsafe fn alc_create_context(&self, device: *mut ALCdevice, attr_list: *const ALCint) -> *mut ALCcontext;

	unsafe fn alc_destroy_context(&self, context: *mut ALCcontext);

	unsafe fn alc_make_context_current(&self, context: *mut ALCcontext) -> ALCboolean;

	unsafe fn alc_get_string(&self, device: *mut ALCdevice, param: ALCenum) -> *const ALCchar;
}
