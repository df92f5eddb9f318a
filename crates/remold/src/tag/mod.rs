//! Compiled tag chains.
//!
//! # Role
//!
//! A tag string such as `"trim,dive,keys,lcase,endkeys,ucase"` compiles into an immutable
//! singly linked chain of [`ParsedTag`] nodes. Each node is either a callback invocation
//! ([`TagKind::Default`]) or one of the control words `dive`, `keys` and `endkeys`.
//!
//! # Invariants
//!
//! - Every [`TagKind::Default`] node carries a resolved callback.
//! - A [`TagKind::Keys`] node only ever follows a [`TagKind::Dive`] node; its `keys` chain
//!   applies to map keys and its `next` chain to map values.
//! - Aliases are fully expanded; [`ParsedTag::alias`] records the outermost alias a node came
//!   from.
//! - Chains are never mutated after compilation and are shared through `Arc`.

use std::fmt;

use crate::registry::FieldFn;

pub(crate) mod parse;

/// Dives into the elements of a sequence or the entries of a map.
pub const DIVE_TAG: &str = "dive";
/// Opens the key scope of a map dive.
pub const KEYS_TAG: &str = "keys";
/// Closes the key scope of a map dive.
pub const END_KEYS_TAG: &str = "endkeys";
/// A field tagged with exactly this value is skipped.
pub const SKIP_TAG: &str = "-";
pub const TAG_SEPARATOR: char = ',';
pub const PARAM_SEPARATOR: char = '=';
/// Escaped form of [`TAG_SEPARATOR`] accepted inside parameters.
pub const ESCAPED_SEPARATOR: &str = "0x2C";

/// Role of a node in a compiled chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
	/// Invokes a registered callback.
	Default,
	Dive,
	Keys,
	EndKeys,
}

/// One node of a compiled chain.
pub struct ParsedTag {
	pub(crate) name: Box<str>,
	pub(crate) param: Box<str>,
	pub(crate) alias: Option<Box<str>>,
	pub(crate) kind: TagKind,
	pub(crate) callback: Option<FieldFn>,
	pub(crate) keys: Option<Box<ParsedTag>>,
	pub(crate) next: Option<Box<ParsedTag>>,
}

impl ParsedTag {
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Parameter with escaped separators already replaced. Empty when none was given.
	pub fn param(&self) -> &str {
		&self.param
	}

	pub fn alias(&self) -> Option<&str> {
		self.alias.as_deref()
	}

	pub fn kind(&self) -> TagKind {
		self.kind
	}

	pub fn callback(&self) -> Option<&FieldFn> {
		self.callback.as_ref()
	}

	/// Key chain of a [`TagKind::Keys`] node.
	pub fn keys(&self) -> Option<&ParsedTag> {
		self.keys.as_deref()
	}

	pub fn next(&self) -> Option<&ParsedTag> {
		self.next.as_deref()
	}
}

impl fmt::Debug for ParsedTag {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ParsedTag")
			.field("name", &self.name)
			.field("param", &self.param)
			.field("alias", &self.alias)
			.field("kind", &self.kind)
			.field("keys", &self.keys)
			.field("next", &self.next)
			.finish_non_exhaustive()
	}
}

/// A compiled tag string. Empty chains are no-ops.
#[derive(Debug, Default)]
pub struct Chain {
	head: Option<Box<ParsedTag>>,
}

impl Chain {
	pub fn head(&self) -> Option<&ParsedTag> {
		self.head.as_deref()
	}

	pub fn is_empty(&self) -> bool {
		self.head.is_none()
	}

	/// Nodes along `next` links, without descending into key chains.
	pub fn iter(&self) -> impl Iterator<Item = &ParsedTag> {
		std::iter::successors(self.head(), |node| node.next())
	}
}

#[cfg(test)]
mod tests;
