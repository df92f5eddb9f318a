//! Scrubbers: replace personal data with stable SHA-1 digests.
//!
//! | name | effect |
//! |------|--------|
//! | `emails` | rewrites every email address found in the text as `<<scrubbed::email::sha1::…>>@domain` |
//! | `text`, `email`, `name`, `fname`, `lname` | replaces the whole value with `<<scrubbed::<name>::sha1::…>>` |
//!
//! The digest of an email address is taken over its `@domain` suffix, so scrubbed addresses
//! sharing a domain compare equal.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use remold::{BoxError, FieldLevel, RegistrationError, Transformer, TransformerBuilder};
use sha1::{Digest, Sha1};

/// Tag name read by transformers built with [`new`].
pub const TAG_NAME: &str = "scrub";

static EMAIL: LazyLock<Result<Regex, regex::Error>> = LazyLock::new(|| {
	Regex::new(
		r"[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+(@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*)",
	)
});

/// Whole-value scrubbers, registered under the kind they label.
const TEXT_KINDS: [&str; 5] = ["text", "email", "name", "fname", "lname"];

/// Registers every scrubber on `builder`.
pub fn register(
	builder: &mut TransformerBuilder,
) -> Result<&mut TransformerBuilder, RegistrationError> {
	builder.register("emails", emails)?;
	for kind in TEXT_KINDS {
		builder.register(kind, scrub_as(kind))?;
	}
	Ok(builder)
}

/// Builds a transformer with every scrubber registered, reading the [`TAG_NAME`] tag.
pub fn new() -> Result<Transformer, RegistrationError> {
	let mut builder = Transformer::builder();
	builder.tag_name(TAG_NAME);
	register(&mut builder)?;
	tracing::debug!(tag = TAG_NAME, "built scrubber transformer");
	Ok(builder.build())
}

fn digest(input: &str) -> String {
	hex::encode(Sha1::digest(input.as_bytes()))
}

fn emails(fl: &mut FieldLevel<'_>) -> Result<(), BoxError> {
	let re = EMAIL.as_ref().map_err(|err| err.clone())?;
	if let Some(s) = fl.field_as::<String>() {
		let scrubbed = re
			.replace_all(s, |caps: &Captures<'_>| {
				let domain = &caps[1];
				format!("<<scrubbed::email::sha1::{}>>{domain}", digest(domain))
			})
			.into_owned();
		*s = scrubbed;
	}
	Ok(())
}

fn scrub_as(
	kind: &'static str,
) -> impl Fn(&mut FieldLevel<'_>) -> Result<(), BoxError> + Send + Sync + 'static {
	move |fl: &mut FieldLevel<'_>| {
		if let Some(s) = fl.field_as::<String>() {
			*s = format!("<<scrubbed::{kind}::sha1::{}>>", digest(s));
		}
		Ok(())
	}
}
