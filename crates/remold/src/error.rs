//! Error types for tag compilation, traversal and setup.

/// Error type returned by transformation callbacks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised while compiling tags or traversing a value.
///
/// Traversal is fail-fast: the first error aborts the whole call. Mutations applied before
/// the failure are kept.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// An empty token or a malformed `name=param` token.
	#[error("invalid tag '{tag}' found on field {field}")]
	InvalidTag { tag: String, field: String },

	/// A token that is neither a control word, an alias nor a registered callback.
	#[error("undefined tag '{tag}' found on field {field}")]
	UndefinedTag { tag: String, field: String },

	/// `dive` applied to something that is not a sequence, map or nil pointer to one.
	#[error("invalid dive configuration on {type_name}")]
	InvalidDive { type_name: &'static str },

	/// `keys` not immediately preceded by `dive`, or used on a non-map.
	#[error("'keys' must immediately follow a 'dive' over a map")]
	InvalidKeys,

	/// `endkeys` without an open `keys` scope.
	#[error("'endkeys' encountered without a corresponding 'keys'")]
	UndefinedKeys,

	/// An alias whose expansion refers back to itself.
	#[error("alias '{alias}' expands into itself")]
	AliasCycle { alias: String },

	/// An entry point received a value it cannot transform.
	#[error("invalid argument to {call}: {reason}")]
	InvalidArgument { call: &'static str, reason: String },

	/// A value cell was written with a value of another type.
	#[error("cannot assign {found} to {expected}")]
	TypeMismatch {
		expected: &'static str,
		found: &'static str,
	},

	/// A descriptor names a field the value does not expose.
	#[error("{type_name} has no field at index {index}")]
	MissingField { type_name: &'static str, index: usize },

	/// An error returned by a registered callback, passed through untouched.
	#[error(transparent)]
	Callback(BoxError),
}

impl Error {
	/// Wraps a callback error, unwrapping errors that originated in a nested traversal.
	pub(crate) fn from_callback(err: BoxError) -> Self {
		match err.downcast::<Error>() {
			Ok(err) => *err,
			Err(other) => Error::Callback(other),
		}
	}
}

/// Fatal setup errors raised while building a [`crate::Transformer`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
	#[error("transformation name cannot be empty")]
	EmptyName,

	#[error("alias cannot be empty")]
	EmptyAlias,

	#[error("aliased tags cannot be empty")]
	EmptyExpansion,

	#[error(
		"tag '{0}' either contains restricted characters or is the same as a restricted tag needed for normal operation"
	)]
	RestrictedName(String),

	#[error(
		"alias '{0}' either contains restricted characters or is the same as a restricted tag needed for normal operation"
	)]
	RestrictedAlias(String),

	#[error("at least one type is required")]
	NoTypes,
}
