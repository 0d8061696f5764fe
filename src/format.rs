//! Argument formatting
//!
//! Renders ALC arguments and return values as trace text. Numbers, pointers
//! and constants are `Display` adapters. Strings owned by the library are
//! copied byte for byte, so fragments holding them are built as a `Fragment`
//! rather than a `String`.

use std::ffi::CStr;
use std::fmt;
use std::io::Write as _;

use libc::c_char;

use crate::alc::{
	AL_FORMAT_MONO8, AL_FORMAT_MONO16, AL_FORMAT_STEREO8, AL_FORMAT_STEREO16, ALC_ALL_DEVICES_SPECIFIER,
	ALC_CAPTURE_DEFAULT_DEVICE_SPECIFIER, ALC_CAPTURE_DEVICE_SPECIFIER, ALC_DEFAULT_ALL_DEVICES_SPECIFIER,
	ALC_DEFAULT_DEVICE_SPECIFIER, ALC_DEVICE_SPECIFIER, ALC_EXTENSIONS, ALCenum,
};

/// Marker emitted in place of each NUL byte of a device list
pub const NUL_MARKER: &[u8] = b"\\0";

/// `strftime`-style layout of the line timestamp
pub const TIMESTAMP_FORMAT: &str = "%Y:%m:%d %H:%M:%S ";

/// Names of the `alcGetString` parameters
const ALC_PARAM_NAMES: &[(ALCenum, &str)] = &[
	(ALC_DEFAULT_DEVICE_SPECIFIER, "ALC_DEFAULT_DEVICE_SPECIFIER"),
	(ALC_DEVICE_SPECIFIER, "ALC_DEVICE_SPECIFIER"),
	(ALC_EXTENSIONS, "ALC_EXTENSIONS"),
	(ALC_CAPTURE_DEFAULT_DEVICE_SPECIFIER, "ALC_CAPTURE_DEFAULT_DEVICE_SPECIFIER"),
	(ALC_CAPTURE_DEVICE_SPECIFIER, "ALC_CAPTURE_DEVICE_SPECIFIER"),
	(ALC_DEFAULT_ALL_DEVICES_SPECIFIER, "ALC_DEFAULT_ALL_DEVICES_SPECIFIER"),
	(ALC_ALL_DEVICES_SPECIFIER, "ALC_ALL_DEVICES_SPECIFIER"),
];

/// Names of the capture sample formats
const SAMPLE_FORMAT_NAMES: &[(ALCenum, &str)] = &[
	(AL_FORMAT_MONO8, "AL_FORMAT_MONO8"),
	(AL_FORMAT_MONO16, "AL_FORMAT_MONO16"),
	(AL_FORMAT_STEREO8, "AL_FORMAT_STEREO8"),
	(AL_FORMAT_STEREO16, "AL_FORMAT_STEREO16"),
];

fn lookup(table: &[(ALCenum, &'static str)], value: ALCenum) -> Option<&'static str> {
	table.iter().find(|(known, _)| *known == value).map(|(_, name)| *name)
}

/// Symbolic name of an `alcGetString` parameter, if it is a known one
#[must_use]
pub fn alc_param_name(value: ALCenum) -> Option<&'static str> {
	lookup(ALC_PARAM_NAMES, value)
}

/// Symbolic name of a capture sample format, if it is a known one
#[must_use]
pub fn sample_format_name(value: ALCenum) -> Option<&'static str> {
	lookup(SAMPLE_FORMAT_NAMES, value)
}

/// An `alcGetString` parameter: its name, or the raw integer when unknown
#[derive(Debug, Clone, Copy)]
pub struct AlcParam(pub ALCenum);

impl fmt::Display for AlcParam {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match alc_param_name(self.0) {
			Some(name) => f.write_str(name),
			None => write!(f, "{}", self.0),
		}
	}
}

/// A capture sample format: its name, or the raw integer when unknown
#[derive(Debug, Clone, Copy)]
pub struct SampleFormat(pub ALCenum);

impl fmt::Display for SampleFormat {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match sample_format_name(self.0) {
			Some(name) => f.write_str(name),
			None => write!(f, "{}", self.0),
		}
	}
}

/// A handle or buffer address, `(nil)` when null
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ptr(usize);

impl<T> From<*const T> for Ptr {
	fn from(ptr: *const T) -> Self {
		Self(ptr as usize)
	}
}

impl<T> From<*mut T> for Ptr {
	fn from(ptr: *mut T) -> Self {
		Self(ptr as usize)
	}
}

impl fmt::Display for Ptr {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.0 == 0 {
			f.write_str("(nil)")
		} else {
			write!(f, "{:#x}", self.0)
		}
	}
}

/// Shorthand for `Ptr::from`
pub fn ptr(value: impl Into<Ptr>) -> Ptr {
	value.into()
}

/// A trace fragment under construction
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Fragment(Vec<u8>);

impl Fragment {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Append the `Display` rendering of `text`
	#[must_use]
	pub fn text(mut self, text: impl fmt::Display) -> Self {
		// Writing into a Vec cannot fail
		let _ = write!(self.0, "{text}");
		self
	}

	/// Append a C string exactly as the library handed it over
	#[must_use]
	pub fn c_str(mut self, arg: CStrArg) -> Self {
		arg.write_to(&mut self.0);
		self
	}

	/// Append a device list with its separators made visible
	#[must_use]
	pub fn device_list(mut self, list: DeviceList) -> Self {
		list.write_to(&mut self.0);
		self
	}

	#[must_use]
	pub fn into_bytes(self) -> Vec<u8> {
		self.0
	}
}

impl AsRef<[u8]> for Fragment {
	fn as_ref(&self) -> &[u8] {
		&self.0
	}
}

fn push_quoted(out: &mut Vec<u8>, bytes: &[u8]) {
	out.push(b'"');
	out.extend_from_slice(bytes);
	out.push(b'"');
}

/// A C string argument, quoted, or `NULL`
#[derive(Debug, Clone, Copy)]
pub struct CStrArg(*const c_char);

impl CStrArg {
	/// # Safety
	///
	/// `ptr` must be null or point to a NUL-terminated string that stays
	/// valid while the adapter is rendered.
	#[must_use]
	pub const unsafe fn new(ptr: *const c_char) -> Self {
		Self(ptr)
	}

	/// The rendered argument; non-UTF-8 bytes are kept as they are
	#[must_use]
	pub fn to_bytes(&self) -> Vec<u8> {
		let mut out = Vec::new();
		self.write_to(&mut out);
		out
	}

	fn write_to(&self, out: &mut Vec<u8>) {
		if self.0.is_null() {
			out.extend_from_slice(b"NULL");
			return;
		}
		push_quoted(out, unsafe { CStr::from_ptr(self.0) }.to_bytes());
	}
}

/// A double-null-terminated device list, quoted, or `NULL`
#[derive(Debug, Clone, Copy)]
pub struct DeviceList(*const c_char);

impl DeviceList {
	/// # Safety
	///
	/// `ptr` must be null or point to a sequence of NUL-terminated strings
	/// ending with an empty string, valid while the adapter is rendered.
	#[must_use]
	pub const unsafe fn new(ptr: *const c_char) -> Self {
		Self(ptr)
	}

	#[must_use]
	pub fn to_bytes(&self) -> Vec<u8> {
		let mut out = Vec::new();
		self.write_to(&mut out);
		out
	}

	fn write_to(&self, out: &mut Vec<u8>) {
		if self.0.is_null() {
			out.extend_from_slice(b"NULL");
			return;
		}
		let bytes = unsafe { device_list_bytes(self.0) };
		push_quoted(out, &render_device_list(bytes));
	}
}

/// Borrow a device list as bytes, including the final empty string
///
/// # Safety
///
/// `list` must point to a sequence of NUL-terminated strings ending with an
/// empty string, and the memory must outlive the returned slice.
pub unsafe fn device_list_bytes<'a>(list: *const c_char) -> &'a [u8] {
	let start = list.cast::<u8>();
	let mut len = 0;
	unsafe {
		while *start.add(len) != 0 {
			while *start.add(len) != 0 {
				len += 1;
			}
			len += 1;
		}
		std::slice::from_raw_parts(start, len + 1)
	}
}

/// Render a device list with every NUL made visible
///
/// Each embedded string is followed by a `\0` marker and the list terminator
/// gets one more, so `"A\0BB\0\0"` renders as `A\0BB\0\0`. Rendering stops at
/// the first empty string or at the end of the slice. Device names are copied
/// verbatim, whatever their encoding.
#[must_use]
pub fn render_device_list(list: &[u8]) -> Vec<u8> {
	let mut out = Vec::with_capacity(list.len() * 2);
	let mut rest = list;

	while let Some(&first) = rest.first() {
		if first == 0 {
			break;
		}
		let end = rest.iter().position(|&b| b == 0).unwrap_or(rest.len());
		out.extend_from_slice(&rest[..end]);
		out.extend_from_slice(NUL_MARKER);
		rest = rest.get(end + 1..).unwrap_or_default();
	}

	out.extend_from_slice(NUL_MARKER);
	out
}

/// Current local time in the trace line layout
#[must_use]
pub fn timestamp() -> String {
	chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}
