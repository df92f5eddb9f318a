//! Procedural macros for remold.
//!
//! Provides `#[derive(Reflect)]`, which generates the static struct descriptor and the field
//! accessors the transformation engine traverses.

use proc_macro::TokenStream;

/// Reflect derive macro implementation.
mod reflect;

/// Derives `remold::Reflect` and `remold::StructAccess` for a struct.
///
/// Field tags are declared with `#[tag(key = "value", ...)]`, one entry per tag name the
/// struct is transformed under. `#[tag(skip)]` hides a field from traversal entirely.
///
/// ```ignore
/// #[derive(Reflect, Default)]
/// struct Signup {
///     #[tag(mold = "trim,lcase", mod = "trim")]
///     email: String,
///     #[tag(mold = "dive,keys,trim,endkeys,ucase")]
///     labels: HashMap<String, String>,
///     #[tag(skip)]
///     raw: Vec<u8>,
/// }
/// ```
#[proc_macro_derive(Reflect, attributes(tag))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
	reflect::derive_reflect(input)
}
