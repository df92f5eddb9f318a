//! Common string and value modifiers for remold.
//!
//! [`register`] adds every modifier to an existing builder; [`new`] builds a ready-made
//! transformer reading the [`TAG_NAME`] tag.
//!
//! | name | effect |
//! |------|--------|
//! | `trim`, `ltrim=cutset`, `rtrim=cutset` | trims whitespace, or the given characters |
//! | `tprefix=p`, `tsuffix=s` | strips a prefix or suffix |
//! | `lcase`, `ucase`, `ucfirst`, `title` | case conversion |
//! | `snake`, `camel`, `slug`, `name` | identifier, URL and personal-name normalization |
//! | `strip_alpha`, `strip_num`, `strip_alpha_unicode`, `strip_num_unicode`, `strip_punctuation` | character class removal |
//! | `substr=start-end` | character range |
//! | `set=value`, `default=value` | writes a parsed value (`default` only onto zero values) |
//!
//! String modifiers leave values of other types untouched. The [`scrubbers`] module holds a
//! second, independent set that hashes personal data under the `scrub` tag.

use remold::{RegistrationError, Transformer, TransformerBuilder};

mod multi;
pub mod scrubbers;
mod string;

/// Tag name read by transformers built with [`new`].
pub const TAG_NAME: &str = "mod";

/// Registers every modifier on `builder`.
pub fn register(
	builder: &mut TransformerBuilder,
) -> Result<&mut TransformerBuilder, RegistrationError> {
	builder
		.register("trim", string::trim_space)?
		.register("ltrim", string::trim_left)?
		.register("rtrim", string::trim_right)?
		.register("tprefix", string::trim_prefix)?
		.register("tsuffix", string::trim_suffix)?
		.register("lcase", string::to_lower)?
		.register("ucase", string::to_upper)?
		.register("ucfirst", string::uppercase_first)?
		.register("snake", string::snake_case)?
		.register("camel", string::camel_case)?
		.register("title", string::title_case)?
		.register("name", string::name_case)?
		.register("slug", string::slug_case)?
		.register("strip_alpha", string::strip_alpha)?
		.register("strip_num", string::strip_num)?
		.register("strip_num_unicode", string::strip_num_unicode)?
		.register("strip_alpha_unicode", string::strip_alpha_unicode)?
		.register("strip_punctuation", string::strip_punctuation)?
		.register("substr", string::substr)?
		.register("set", multi::set_value)?
		.register("default", multi::default_value)
}

/// Builds a transformer with every modifier registered, reading the [`TAG_NAME`] tag.
pub fn new() -> Result<Transformer, RegistrationError> {
	let mut builder = Transformer::builder();
	builder.tag_name(TAG_NAME);
	register(&mut builder)?;
	tracing::debug!(tag = TAG_NAME, "built modifier transformer");
	Ok(builder.build())
}
