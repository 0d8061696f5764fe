//! Symbol resolution
//!
//! Locates the real implementation of each intercepted function: the next
//! definition of the symbol after this module in the process's search order.

use std::ffi::{CStr, CString, c_void};
use std::fmt;
use std::ptr::NonNull;

use tracing::debug;

use crate::tracer::{Result, TraceError};

/// A cached handle to the genuine implementation of one intercepted function
///
/// `F` is the `unsafe extern "C" fn` pointer type of the symbol.
#[derive(Clone, Copy)]
pub struct HookEntry<F: Copy> {
	name: &'static str,
	real: F,
}

impl<F: Copy> HookEntry<F> {
	/// Resolve `name` against the next object in search order
	///
	/// # Safety
	///
	/// `F` must be a function pointer type whose ABI and signature match the
	/// symbol's actual definition.
	pub unsafe fn resolve(name: &'static str) -> Result<Self> {
		let address = next_symbol(name)?;
		debug_assert_eq!(size_of::<F>(), size_of::<*mut c_void>());

		let real = unsafe { std::mem::transmute_copy::<*mut c_void, F>(&address.as_ptr()) };
		debug!("Resolved {} to {:p}", name, address);

		Ok(Self { name, real })
	}

	/// The real implementation
	#[must_use]
	pub fn real(&self) -> F {
		self.real
	}
}

impl<F: Copy> fmt::Debug for HookEntry<F> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("HookEntry").field("name", &self.name).finish_non_exhaustive()
	}
}

/// Find the next definition of `name` after the calling object
///
/// Uses `dlsym(RTLD_NEXT, ...)`, which skips this module's own exports.
pub fn next_symbol(name: &str) -> Result<NonNull<c_void>> {
	let c_name = CString::new(name).map_err(|_| TraceError::InvalidSymbolName(name.to_string()))?;

	unsafe {
		// Clear any stale error so the one reported below belongs to this lookup
		libc::dlerror();

		let address = libc::dlsym(libc::RTLD_NEXT, c_name.as_ptr());
		NonNull::new(address).ok_or_else(|| TraceError::SymbolNotFound {
			name: name.to_string(),
			reason: last_dl_error(),
		})
	}
}

fn last_dl_error() -> String {
	let error = unsafe { libc::dlerror() };
	if error.is_null() {
		"symbol resolved to NULL".to_string()
	} else {
		unsafe { CStr::from_ptr(error) }.to_string_lossy().into_owned()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use libc::c_char;

	type StrlenFn = unsafe extern "C" fn(*const c_char) -> usize;

	#[test]
	fn finds_libc_symbols() {
		assert!(next_symbol("strlen").is_ok());
	}

	#[test]
	fn resolved_entry_calls_through() {
		let entry = unsafe { HookEntry::<StrlenFn>::resolve("strlen") }.unwrap();
		assert!(format!("{entry:?}").contains("\"strlen\""));

		let len = unsafe { (entry.real())(c"hello".as_ptr()) };
		assert_eq!(len, 5);
	}

	#[test]
	fn missing_symbol_is_reported() {
		let err = next_symbol("alcThisSymbolDoesNotExist").unwrap_err();
		match err {
			TraceError::SymbolNotFound { name, reason } => {
				assert_eq!(name, "alcThisSymbolDoesNotExist");
				assert!(!reason.is_empty());
			},
			other => panic!("unexpected error: {other}"),
		}
	}

	#[test]
	fn interior_nul_is_rejected() {
		assert!(matches!(next_symbol("bad\0name"), Err(TraceError::InvalidSymbolName(_))));
	}
}
