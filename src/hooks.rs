//! Exported ALC entry points
//!
//! Each function shadows the OpenAL symbol of the same name when this library
//! is preloaded. All of them route through the process-wide `Tracer`, which
//! is built on the first call to any of them.

#![allow(non_snake_case)]

use crate::alc::{ALCboolean, ALCchar, ALCcontext, ALCdevice, ALCenum, ALCint, ALCsizei, ALCuint, ALCvoid};
use crate::tracer::tracer;

#[unsafe(no_mangle)]
pub unsafe extern "C" fn alcCaptureOpenDevice(
	device_name: *const ALCchar,
	frequency: ALCuint,
	format: ALCenum,
	buffer_size: ALCsizei,
) -> *mut ALCdevice {
	unsafe { tracer().alc_capture_open_device(device_name, frequency, format, buffer_size) }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn alcCaptureCloseDevice(device: *mut ALCdevice) -> ALCboolean {
	unsafe { tracer().alc_capture_close_device(device) }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn alcCaptureStart(device: *mut ALCdevice) {
	unsafe { tracer().alc_capture_start(device) }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn alcCaptureStop(device: *mut ALCdevice) {
	unsafe { tracer().alc_capture_stop(device) }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn alcCaptureSamples(device: *mut ALCdevice, buffer: *mut ALCvoid, samples: ALCsizei) {
	unsafe { tracer().alc_capture_samples(device, buffer, samples) }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn alcOpenDevice(device_name: *const ALCchar) -> *mut ALCdevice {
	unsafe { tracer().alc_open_device(device_name) }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn alcCloseDevice(device: *mut ALCdevice) -> ALCboolean {
	unsafe { tracer().alc_close_device(device) }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn alcCreateContext(device: *mut ALCdevice, attr_list: *const ALCint) -> *mut ALCcontext {
	unsafe { tracer().alc_create_context(device, attr_list) }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn alcDestroyContext(context: *mut ALCcontext) {
	unsafe { tracer().alc_destroy_context(context) }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn alcMakeContextCurrent(context: *mut ALCcontext) -> ALCboolean {
	unsafe { tracer().alc_make_context_current(context) }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn alcGetString(device: *mut ALCdevice, param: ALCenum) -> *const ALCchar {
	unsafe { tracer().alc_get_string(device, param) }
}
