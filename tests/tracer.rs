//! End-to-end behavior of the tracer against a scripted ALC backend
//!
//! The fake backend stands in for OpenAL: it records every forwarded call
//! and returns fixed values, so each test can check both the trace text and
//! that the caller sees exactly what the backend returned.

use std::io::{self, BufRead, BufReader, Write};
use std::net::TcpListener;
use std::ptr::{null, null_mut};
use std::sync::{Arc, Barrier};
use std::time::Duration;

use openal_trace::alc::{
	AL_FORMAT_MONO16, ALC_CAPTURE_DEVICE_SPECIFIER, ALC_DEFAULT_DEVICE_SPECIFIER, ALC_DEVICE_SPECIFIER, ALC_FALSE,
	ALC_TRUE, ALCboolean, ALCchar, ALCcontext, ALCdevice, ALCenum, ALCint, ALCsizei, ALCuint, ALCvoid,
};
use openal_trace::{AlcBackend, Tracer, TracerBuilder};
use parking_lot::Mutex;

const DEVICE: usize = 0x1000;
const CAPTURE_DEVICE: usize = 0x3000;
const CONTEXT: usize = 0x2000;

static PLAYBACK_LIST: &[u8] = b"A\0BB\0\0";
static CAPTURE_LIST: &[u8] = b"Built-in Mic\0\0";
static DEFAULT_NAME: &[u8] = b"A\0";

struct FakeAlc {
	calls: Mutex<Vec<&'static str>>,
	playback_list: &'static [u8],
	/// Holds `alcOpenDevice` inside the backend until the test releases it
	open_gate: Option<Arc<Barrier>>,
}

impl Default for FakeAlc {
	fn default() -> Self {
		Self {
			calls: Mutex::default(),
			playback_list: PLAYBACK_LIST,
			open_gate: None,
		}
	}
}

impl FakeAlc {
	fn record(&self, name: &'static str) {
		self.calls.lock().push(name);
	}

	fn calls(&self) -> Vec<&'static str> {
		self.calls.lock().clone()
	}
}

impl AlcBackend for FakeAlc {
	unsafe fn alc_capture_open_device(
		&self,
		_device_name: *const ALCchar,
		_frequency: ALCuint,
		_format: ALCenum,
		_buffer_size: ALCsizei,
	) -> *mut ALCdevice {
		self.record("alcCaptureOpenDevice");
		CAPTURE_DEVICE as *mut ALCdevice
	}

	unsafe fn alc_capture_close_device(&self, _device: *mut ALCdevice) -> ALCboolean {
		self.record("alcCaptureCloseDevice");
		ALC_FALSE
	}

	unsafe fn alc_capture_start(&self, _device: *mut ALCdevice) {
		self.record("alcCaptureStart");
	}

	unsafe fn alc_capture_stop(&self, _device: *mut ALCdevice) {
		self.record("alcCaptureStop");
	}

	unsafe fn alc_capture_samples(&self, _device: *mut ALCdevice, _buffer: *mut ALCvoid, _samples: ALCsizei) {
		self.record("alcCaptureSamples");
	}

	unsafe fn alc_open_device(&self, device_name: *const ALCchar) -> *mut ALCdevice {
		self.record("alcOpenDevice");
		if let Some(gate) = &self.open_gate {
			gate.wait();
			gate.wait();
		}
		if device_name.is_null() {
			DEVICE as *mut ALCdevice
		} else {
			null_mut()
		}
	}

	unsafe fn alc_close_device(&self, _device: *mut ALCdevice) -> ALCboolean {
		self.record("alcCloseDevice");
		ALC_TRUE
	}

	unsafe fn alc_create_context(&self, _device: *mut ALCdevice, _attr_list: *const ALCint) -> *mut ALCcontext {
		self.record("alcCreateContext");
		CONTEXT as *mut ALCcontext
	}

	unsafe fn alc_destroy_context(&self, _context: *mut ALCcontext) {
		self.record("alcDestroyContext");
	}

	unsafe fn alc_make_context_current(&self, _context: *mut ALCcontext) -> ALCboolean {
		self.record("alcMakeContextCurrent");
		ALC_TRUE
	}

	unsafe fn alc_get_string(&self, device: *mut ALCdevice, param: ALCenum) -> *const ALCchar {
		self.record("alcGetString");
		let text = match param {
			ALC_DEVICE_SPECIFIER if device.is_null() => self.playback_list,
			ALC_CAPTURE_DEVICE_SPECIFIER if device.is_null() => CAPTURE_LIST,
			ALC_DEVICE_SPECIFIER | ALC_DEFAULT_DEVICE_SPECIFIER => DEFAULT_NAME,
			_ => return null(),
		};
		text.as_ptr().cast()
	}
}

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuffer {
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		self.0.lock().extend_from_slice(buf);
		Ok(buf.len())
	}

	fn flush(&mut self) -> io::Result<()> {
		Ok(())
	}
}

impl SharedBuffer {
	fn contents(&self) -> String {
		String::from_utf8_lossy(&self.0.lock()).into_owned()
	}

	fn bytes(&self) -> Vec<u8> {
		self.0.lock().clone()
	}
}

fn untimed_tracer() -> (Tracer<FakeAlc>, SharedBuffer) {
	untimed_tracer_for(FakeAlc::default())
}

fn untimed_tracer_for(backend: FakeAlc) -> (Tracer<FakeAlc>, SharedBuffer) {
	let buffer = SharedBuffer::default();
	let tracer = openal_trace::new().timestamps(false).writer(buffer.clone()).build(backend);
	(tracer, buffer)
}

fn unreachable_endpoint() -> std::net::SocketAddr {
	let listener = TcpListener::bind("127.0.0.1:0").unwrap();
	let endpoint = listener.local_addr().unwrap();
	drop(listener);
	endpoint
}

#[test]
fn device_lifecycle_records() {
	let (tracer, buffer) = untimed_tracer();

	unsafe {
		let device = tracer.alc_open_device(null());
		let context = tracer.alc_create_context(device, null());
		assert_eq!(tracer.alc_make_context_current(context), ALC_TRUE);
		tracer.alc_destroy_context(context);
		assert_eq!(tracer.alc_close_device(device), ALC_TRUE);
	}

	assert_eq!(
		buffer.contents(),
		"alcOpenDevice(NULL) = 0x1000\n\
		 alcCreateContext(0x1000, (nil)) = 0x2000\n\
		 alcMakeContextCurrent(0x2000) = 1\n\
		 alcDestroyContext(0x2000)\n\
		 alcCloseDevice(0x1000) = 1\n"
	);
	assert_eq!(
		tracer.backend().calls(),
		[
			"alcOpenDevice",
			"alcCreateContext",
			"alcMakeContextCurrent",
			"alcDestroyContext",
			"alcCloseDevice"
		]
	);
}

#[test]
fn named_device_is_quoted() {
	let (tracer, buffer) = untimed_tracer();
	let device = unsafe { tracer.alc_open_device(c"Speakers".as_ptr()) };
	assert!(device.is_null());
	assert_eq!(buffer.contents(), "alcOpenDevice(\"Speakers\") = (nil)\n");
}

#[test]
fn capture_lifecycle_records() {
	let (tracer, buffer) = untimed_tracer();

	unsafe {
		let device = tracer.alc_capture_open_device(c"Built-in Mic".as_ptr(), 44100, AL_FORMAT_MONO16, 4410);
		assert_eq!(device as usize, CAPTURE_DEVICE);
		tracer.alc_capture_start(device);
		tracer.alc_capture_stop(device);
		assert_eq!(tracer.alc_capture_close_device(device), ALC_FALSE);
	}

	assert_eq!(
		buffer.contents(),
		"alcCaptureOpenDevice(\"Built-in Mic\", 44100, AL_FORMAT_MONO16, 4410) = 0x3000\n\
		 alcCaptureStart(0x3000)\n\
		 alcCaptureStop(0x3000)\n\
		 alcCaptureCloseDevice(0x3000) = 0\n"
	);
}

#[test]
fn capture_samples_are_forwarded_silently() {
	let (tracer, buffer) = untimed_tracer();
	let mut samples = [0i16; 64];

	unsafe {
		tracer.alc_capture_samples(CAPTURE_DEVICE as *mut ALCdevice, samples.as_mut_ptr().cast(), 64);
	}

	assert_eq!(buffer.contents(), "");
	assert_eq!(tracer.backend().calls(), ["alcCaptureSamples"]);
}

#[test]
fn capture_samples_can_be_traced() {
	let buffer = SharedBuffer::default();
	let tracer = TracerBuilder::new()
		.timestamps(false)
		.trace_capture_samples(true)
		.writer(buffer.clone())
		.build(FakeAlc::default());

	unsafe {
		tracer.alc_capture_samples(CAPTURE_DEVICE as *mut ALCdevice, null_mut(), 64);
	}

	assert_eq!(buffer.contents(), "alcCaptureSamples(0x3000, (nil), 64)\n");
}

#[test]
fn device_list_shows_separators() {
	let (tracer, buffer) = untimed_tracer();
	let list = unsafe { tracer.alc_get_string(null_mut(), ALC_DEVICE_SPECIFIER) };

	assert_eq!(list, PLAYBACK_LIST.as_ptr().cast::<ALCchar>());
	assert_eq!(buffer.contents(), "alcGetString((nil), ALC_DEVICE_SPECIFIER) = \"A\\0BB\\0\\0\"\n");
}

#[test]
fn device_names_are_passed_through_byte_for_byte() {
	let (tracer, buffer) = untimed_tracer_for(FakeAlc {
		playback_list: b"Caf\xe9\0\0",
		..FakeAlc::default()
	});
	unsafe { tracer.alc_get_string(null_mut(), ALC_DEVICE_SPECIFIER) };
	assert_eq!(buffer.bytes(), b"alcGetString((nil), ALC_DEVICE_SPECIFIER) = \"Caf\xe9\\0\\0\"\n");
}

#[test]
fn opened_device_name_is_passed_through_byte_for_byte() {
	let (tracer, buffer) = untimed_tracer();
	let name = b"Caf\xe9\0";
	unsafe { tracer.alc_open_device(name.as_ptr().cast()) };
	assert_eq!(buffer.bytes(), b"alcOpenDevice(\"Caf\xe9\") = (nil)\n");
}

#[test]
fn capture_device_list_shows_separators() {
	let (tracer, buffer) = untimed_tracer();
	unsafe { tracer.alc_get_string(null_mut(), ALC_CAPTURE_DEVICE_SPECIFIER) };
	assert_eq!(
		buffer.contents(),
		"alcGetString((nil), ALC_CAPTURE_DEVICE_SPECIFIER) = \"Built-in Mic\\0\\0\"\n"
	);
}

#[test]
fn specifier_of_open_device_is_a_plain_string() {
	let (tracer, buffer) = untimed_tracer();
	unsafe { tracer.alc_get_string(DEVICE as *mut ALCdevice, ALC_DEVICE_SPECIFIER) };
	assert_eq!(buffer.contents(), "alcGetString(0x1000, ALC_DEVICE_SPECIFIER) = \"A\"\n");
}

#[test]
fn unknown_param_is_numeric() {
	let (tracer, buffer) = untimed_tracer();
	let ret = unsafe { tracer.alc_get_string(null_mut(), 9999) };
	assert!(ret.is_null());
	assert_eq!(buffer.contents(), "alcGetString((nil), 9999) = NULL\n");
}

#[test]
fn timestamps_only_start_lines() {
	let buffer = SharedBuffer::default();
	let tracer = TracerBuilder::new().writer(buffer.clone()).build(FakeAlc::default());

	unsafe {
		tracer.alc_open_device(null());
		tracer.alc_destroy_context(CONTEXT as *mut ALCcontext);
	}

	let out = buffer.contents();
	let lines: Vec<&str> = out.lines().collect();
	assert_eq!(lines.len(), 2);
	for (line, record) in lines.iter().zip(["alcOpenDevice(NULL) = 0x1000", "alcDestroyContext(0x2000)"]) {
		// One timestamp per line, none before the result fragment
		assert_eq!(&line[20..], record);
		assert_eq!(line.as_bytes()[4], b':');
	}
}

#[test]
fn long_records_are_truncated() {
	let buffer = SharedBuffer::default();
	let tracer = TracerBuilder::new()
		.timestamps(false)
		.line_capacity(16)
		.writer(buffer.clone())
		.build(FakeAlc::default());

	assert_eq!(tracer.config().line_capacity, 16);

	let device = unsafe { tracer.alc_open_device(c"A very long device name".as_ptr()) };
	assert!(device.is_null());

	let out = buffer.contents();
	// The pre-call fragment lost its tail, so the result continues that line
	assert_eq!(out, "alcOpenDevice(\"(nil)\n");
}

#[test]
fn concurrent_call_does_not_split_a_record() {
	let gate = Arc::new(Barrier::new(2));
	let (tracer, buffer) = untimed_tracer_for(FakeAlc {
		open_gate: Some(Arc::clone(&gate)),
		..FakeAlc::default()
	});

	std::thread::scope(|scope| {
		let opener = scope.spawn(|| unsafe { tracer.alc_open_device(null()) as usize });
		// The opener has written its call and is waiting inside the backend
		gate.wait();
		unsafe { tracer.alc_capture_start(0x20 as *mut ALCdevice) };
		gate.wait();
		assert_eq!(opener.join().unwrap(), DEVICE);
	});

	assert_eq!(
		buffer.contents(),
		"alcOpenDevice(NULL) = \n\
		 alcCaptureStart(0x20)\n\
		 alcOpenDevice(NULL) = 0x1000\n"
	);
}

#[test]
fn unreachable_observer_does_not_change_results() {
	let tracer = TracerBuilder::new()
		.endpoint(unreachable_endpoint())
		.build(FakeAlc::default());
	assert!(!tracer.is_connected());

	unsafe {
		assert_eq!(tracer.alc_open_device(null()) as usize, DEVICE);
		assert_eq!(tracer.alc_close_device(DEVICE as *mut ALCdevice), ALC_TRUE);
		assert_eq!(tracer.alc_create_context(null_mut(), null()) as usize, CONTEXT);
		assert_eq!(tracer.alc_make_context_current(null_mut()), ALC_TRUE);
		assert_eq!(tracer.alc_capture_close_device(null_mut()), ALC_FALSE);
		assert_eq!(
			tracer.alc_get_string(null_mut(), ALC_DEVICE_SPECIFIER),
			PLAYBACK_LIST.as_ptr().cast::<ALCchar>()
		);
	}
	assert_eq!(tracer.backend().calls().len(), 6);
}

#[test]
fn records_reach_the_observer() {
	let listener = TcpListener::bind("127.0.0.1:0").unwrap();
	let tracer = TracerBuilder::new()
		.endpoint(listener.local_addr().unwrap())
		.timestamps(false)
		.build(FakeAlc::default());
	assert!(tracer.is_connected());

	unsafe {
		tracer.alc_close_device(DEVICE as *mut ALCdevice);
	}

	let (stream, _) = listener.accept().unwrap();
	stream.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
	let mut reader = BufReader::new(stream);

	let mut line = String::new();
	reader.read_line(&mut line).unwrap();
	assert_eq!(line, "\n");

	line.clear();
	reader.read_line(&mut line).unwrap();
	assert_eq!(line, "alcCloseDevice(0x1000) = 1\n");
}

#[test]
fn observer_sees_one_connection() {
	let listener = TcpListener::bind("127.0.0.1:0").unwrap();
	let tracer = TracerBuilder::new()
		.endpoint(listener.local_addr().unwrap())
		.build(FakeAlc::default());

	unsafe {
		tracer.alc_open_device(null());
		tracer.alc_capture_start(CAPTURE_DEVICE as *mut ALCdevice);
		tracer.alc_get_string(null_mut(), ALC_DEFAULT_DEVICE_SPECIFIER);
	}

	let _first = listener.accept().unwrap();
	listener.set_nonblocking(true).unwrap();
	let second = listener.accept();
	assert_eq!(second.unwrap_err().kind(), io::ErrorKind::WouldBlock);
}
