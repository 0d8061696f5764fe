//! ALC types and constants
//!
//! The subset of `AL/alc.h` and `AL/al.h` needed to declare the intercepted
//! entry points and to decode their enumerated arguments.

use libc::{c_char, c_int, c_uint, c_void};
use std::marker::{PhantomData, PhantomPinned};

pub type ALCboolean = c_char;
pub type ALCchar = c_char;
pub type ALCint = c_int;
pub type ALCuint = c_uint;
pub type ALCsizei = c_int;
pub type ALCenum = c_int;
pub type ALCvoid = c_void;

/// Opaque playback or capture device handle
#[repr(C)]
pub struct ALCdevice {
	_data: [u8; 0],
	_marker: PhantomData<(*mut u8, PhantomPinned)>,
}

/// Opaque rendering context handle
#[repr(C)]
pub struct ALCcontext {
	_data: [u8; 0],
	_marker: PhantomData<(*mut u8, PhantomPinned)>,
}

pub const ALC_FALSE: ALCboolean = 0;
pub const ALC_TRUE: ALCboolean = 1;

// alcGetString parameters
pub const ALC_DEFAULT_DEVICE_SPECIFIER: ALCenum = 0x1004;
pub const ALC_DEVICE_SPECIFIER: ALCenum = 0x1005;
pub const ALC_EXTENSIONS: ALCenum = 0x1006;
pub const ALC_CAPTURE_DEVICE_SPECIFIER: ALCenum = 0x310;
pub const ALC_CAPTURE_DEFAULT_DEVICE_SPECIFIER: ALCenum = 0x311;
pub const ALC_DEFAULT_ALL_DEVICES_SPECIFIER: ALCenum = 0x1012;
pub const ALC_ALL_DEVICES_SPECIFIER: ALCenum = 0x1013;

// Sample formats accepted by alcCaptureOpenDevice
pub const AL_FORMAT_MONO8: ALCenum = 0x1100;
pub const AL_FORMAT_MONO16: ALCenum = 0x1101;
pub const AL_FORMAT_STEREO8: ALCenum = 0x1102;
pub const AL_FORMAT_STEREO16: ALCenum = 0x1103;

/// Whether `alcGetString(device, param)` returns a double-null-terminated list
///
/// Only the device and capture-device specifiers queried without a device
/// enumerate every available device.
#[must_use]
pub fn returns_device_list(device: *const ALCdevice, param: ALCenum) -> bool {
	device.is_null() && matches!(param, ALC_DEVICE_SPECIFIER | ALC_CAPTURE_DEVICE_SPECIFIER)
}
