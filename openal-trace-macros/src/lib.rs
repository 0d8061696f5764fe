extern crate proc_macro;

use proc_macro::TokenStream;

mod hooks;

use hooks::generate_hook_table;

/// Declare the table of intercepted functions
///
/// Expands a struct declaration and a list of foreign function signatures
/// into a backend struct holding one resolved `HookEntry` per signature,
/// plus an `AlcBackend` implementation that forwards to those entries.
///
/// # Example
///
/// ```ignore
/// alc_hooks! {
///     pub struct NextAlc;
///     fn alcOpenDevice(device_name: *const ALCchar) -> *mut ALCdevice;
///     fn alcCaptureStart(device: *mut ALCdevice);
/// }
/// ```
#[proc_macro]
pub fn alc_hooks(item: TokenStream) -> TokenStream {
	generate_hook_table(item)
}
