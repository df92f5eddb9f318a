use crate::tag::{DIVE_TAG, END_KEYS_TAG, KEYS_TAG, SKIP_TAG};

/// Characters that may not appear in callback or alias names.
pub const RESTRICTED_CHARS: &str = ".[],|=+()`~!@#$%^&*\\\"/?<>{}";

/// Names reserved for the tag grammar itself.
pub const RESTRICTED_TAGS: &[&str] = &[DIVE_TAG, SKIP_TAG, KEYS_TAG, END_KEYS_TAG];

/// Whether `name` is reserved or contains a restricted character.
pub fn is_restricted(name: &str) -> bool {
	RESTRICTED_TAGS.contains(&name) || name.chars().any(|c| RESTRICTED_CHARS.contains(c))
}
