//! Implementation of the `alc_hooks!` procedural macro
//!
//! The macro takes a struct declaration followed by a list of foreign
//! function signatures and expands to:
//! 1. A struct with one `HookEntry` field per signature, named in snake_case
//! 2. A `resolve` constructor that binds every entry to the next definition
//!    of the symbol in search order
//! 3. An implementation of `AlcBackend` that forwards each method to its entry

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::parse::{Parse, ParseStream};
use syn::{FnArg, ForeignItemFn, Ident, Pat, Token, Visibility, parse_macro_input};

/// Parsed macro input: the backend struct and the hooked signatures
struct HookTable {
	vis: Visibility,
	name: Ident,
	hooks: Vec<ForeignItemFn>,
}

impl Parse for HookTable {
	fn parse(input: ParseStream) -> syn::Result<Self> {
		let vis: Visibility = input.parse()?;
		input.parse::<Token![struct]>()?;
		let name: Ident = input.parse()?;
		input.parse::<Token![;]>()?;

		let mut hooks = Vec::new();
		while !input.is_empty() {
			hooks.push(input.parse::<ForeignItemFn>()?);
		}

		if hooks.is_empty() {
			return Err(syn::Error::new(name.span(), "a hook table needs at least one signature"));
		}

		Ok(Self { vis, name, hooks })
	}
}

/// Expand an `alc_hooks!` invocation
pub fn generate_hook_table(item: TokenStream) -> TokenStream {
	let table = parse_macro_input!(item as HookTable);

	match expand(&table) {
		Ok(tokens) => tokens.into(),
		Err(err) => err.to_compile_error().into(),
	}
}

fn expand(table: &HookTable) -> syn::Result<TokenStream2> {
	let vis = &table.vis;
	let name = &table.name;

	let mut fields = Vec::with_capacity(table.hooks.len());
	let mut resolves = Vec::with_capacity(table.hooks.len());
	let mut methods = Vec::with_capacity(table.hooks.len());
	let mut symbols = Vec::with_capacity(table.hooks.len());

	for hook in &table.hooks {
		let symbol = hook.sig.ident.to_string();
		let field = format_ident!("{}", camel_to_snake(&symbol));
		let attrs = &hook.attrs;
		let output = &hook.sig.output;

		let mut arg_names = Vec::new();
		let mut arg_types = Vec::new();
		for arg in &hook.sig.inputs {
			match arg {
				FnArg::Typed(pat_type) => match &*pat_type.pat {
					Pat::Ident(pat_ident) => {
						arg_names.push(pat_ident.ident.clone());
						arg_types.push((*pat_type.ty).clone());
					},
					other => {
						return Err(syn::Error::new_spanned(
							other,
							"hook parameters must be simple identifiers",
						));
					},
				},
				FnArg::Receiver(receiver) => {
					return Err(syn::Error::new_spanned(receiver, "hooks cannot take `self`"));
				},
			}
		}

		fields.push(quote! {
			#(#attrs)*
			pub #field: crate::resolver::HookEntry<unsafe extern "C" fn(#(#arg_types),*) #output>,
		});

		resolves.push(quote! {
			#field: unsafe { crate::resolver::HookEntry::resolve(#symbol)? },
		});

		methods.push(quote! {
			unsafe fn #field(&self, #(#arg_names: #arg_types),*) #output {
				unsafe { (self.#field.real())(#(#arg_names),*) }
			}
		});

		symbols.push(symbol);
	}

	Ok(quote! {
		/// Function pointers to the real implementations, one per hooked symbol
		#[derive(Debug, Clone, Copy)]
		#vis struct #name {
			#(#fields)*
		}

		impl #name {
			/// Names of every hooked symbol, in declaration order
			pub const SYMBOLS: &'static [&'static str] = &[#(#symbols),*];

			/// Bind every hook to the next definition of its symbol in search order
			pub fn resolve() -> crate::tracer::Result<Self> {
				Ok(Self {
					#(#resolves)*
				})
			}
		}

		impl crate::backend::AlcBackend for #name {
			#(#methods)*
		}
	})
}

/// Convert a camelCase symbol name to a snake_case identifier
///
/// `alcCaptureOpenDevice` becomes `alc_capture_open_device`.
fn camel_to_snake(name: &str) -> String {
	let mut result = String::with_capacity(name.len() + 4);
	for (i, ch) in name.chars().enumerate() {
		if ch.is_ascii_uppercase() {
			if i != 0 {
				result.push('_');
			}
			result.push(ch.to_ascii_lowercase());
		} else {
			result.push(ch);
		}
	}
	result
}
