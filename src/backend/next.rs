//! Binding to the genuine OpenAL implementation

use openal_trace_macros::alc_hooks;

use crate::alc::{ALCboolean, ALCchar, ALCcontext, ALCdevice, ALCenum, ALCint, ALCsizei, ALCuint, ALCvoid};

alc_hooks! {
	pub struct NextAlc;

	fn alcCaptureOpenDevice(device_name: *const ALCchar, frequency: ALCuint, format: ALCenum, buffer_size: ALCsizei) -> *mut ALCdevice;
	fn alcCaptureCloseDevice(device: *mut ALCdevice) -> ALCboolean;
	fn alcCaptureStart(device: *mut ALCdevice);
	fn alcCaptureStop(device: *mut ALCdevice);
	fn alcCaptureSamples(device: *mut ALCdevice, buffer: *mut ALCvoid, samples: ALCsizei);
	fn alcOpenDevice(device_name: *const ALCchar) -> *mut ALCdevice;
	fn alcCloseDevice(device: *mut ALCdevice) -> ALCboolean;
	fn alcCreateContext(device: *mut ALCdevice, attr_list: *const ALCint) -> *mut ALCcontext;
	fn alcDestroyContext(context: *mut ALCcontext);
	fn alcMakeContextCurrent(context: *mut ALCcontext) -> ALCboolean;
	fn alcGetString(device: *mut ALCdevice, param: ALCenum) -> *const ALCchar;
}
