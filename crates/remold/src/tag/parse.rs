//! Tag string compiler.

use super::{
	Chain, DIVE_TAG, END_KEYS_TAG, ESCAPED_SEPARATOR, KEYS_TAG, PARAM_SEPARATOR, ParsedTag,
	TAG_SEPARATOR, TagKind,
};
use crate::error::Error;
use crate::registry::Registry;

/// A token after alias expansion.
struct Token<'a> {
	text: &'a str,
	alias: Option<&'a str>,
}

/// Compiles `tags` declared on `field` against the callbacks and aliases in `registry`.
pub(crate) fn compile(registry: &Registry, field: &str, tags: &str) -> Result<Chain, Error> {
	let parser = TagParser { registry, field };
	let mut tokens = Vec::new();
	parser.expand(tags, None, &mut Vec::new(), &mut tokens)?;
	let head = parser.link(&tokens)?;
	Ok(Chain { head })
}

struct TagParser<'a> {
	registry: &'a Registry,
	field: &'a str,
}

impl<'a> TagParser<'a> {
	/// Splits `tags` and splices alias expansions in place, recursively.
	fn expand(
		&self,
		tags: &'a str,
		alias: Option<&'a str>,
		active: &mut Vec<&'a str>,
		out: &mut Vec<Token<'a>>,
	) -> Result<(), Error> {
		for text in tags.split(TAG_SEPARATOR) {
			if text.is_empty() {
				return Err(self.invalid(text));
			}
			let Some(expansion) = self.registry.alias(text) else {
				out.push(Token { text, alias });
				continue;
			};
			if active.contains(&text) {
				return Err(Error::AliasCycle {
					alias: text.to_owned(),
				});
			}
			active.push(text);
			self.expand(expansion, alias.or(Some(text)), active, out)?;
			active.pop();
		}
		Ok(())
	}

	/// Builds the linked chain for `tokens`, consuming key scopes as they appear.
	fn link(&self, tokens: &[Token<'a>]) -> Result<Option<Box<ParsedTag>>, Error> {
		let Some((first, rest)) = tokens.split_first() else {
			return Ok(None);
		};
		let mut node = self.node(first)?;
		node.next = match node.kind {
			TagKind::Keys => return Err(Error::InvalidKeys),
			TagKind::EndKeys => return Err(Error::UndefinedKeys),
			TagKind::Dive if rest.first().is_some_and(|t| t.text == KEYS_TAG) => {
				Some(self.key_scope(&rest[0], &rest[1..])?)
			}
			_ => self.link(rest)?,
		};
		Ok(Some(Box::new(node)))
	}

	/// Builds a keys node; the key chain runs to the first `endkeys` (or the end of the tag)
	/// and the value chain follows it.
	fn key_scope(&self, keys: &Token<'a>, rest: &[Token<'a>]) -> Result<Box<ParsedTag>, Error> {
		let mut node = self.node(keys)?;
		match rest.iter().position(|t| t.text == END_KEYS_TAG) {
			Some(end) => {
				node.keys = self.link(&rest[..end])?;
				node.next = self.link(&rest[end + 1..])?;
			}
			None => node.keys = self.link(rest)?,
		}
		Ok(Box::new(node))
	}

	fn node(&self, token: &Token<'a>) -> Result<ParsedTag, Error> {
		let (name, param) = match token.text.split_once(PARAM_SEPARATOR) {
			Some((name, param)) => (name, Some(param)),
			None => (token.text, None),
		};
		let kind = match name {
			DIVE_TAG => TagKind::Dive,
			KEYS_TAG => TagKind::Keys,
			END_KEYS_TAG => TagKind::EndKeys,
			_ => TagKind::Default,
		};
		if name.is_empty() || (kind != TagKind::Default && param.is_some()) {
			return Err(self.invalid(token.text));
		}

		let callback = match kind {
			TagKind::Default => Some(self.registry.callback(name).cloned().ok_or_else(|| {
				Error::UndefinedTag {
					tag: name.to_owned(),
					field: self.field.to_owned(),
				}
			})?),
			_ => None,
		};

		Ok(ParsedTag {
			name: name.into(),
			param: param
				.map(|p| p.replace(ESCAPED_SEPARATOR, ","))
				.unwrap_or_default()
				.into(),
			alias: token.alias.map(Into::into),
			kind,
			callback,
			keys: None,
			next: None,
		})
	}

	fn invalid(&self, tag: &str) -> Error {
		Error::InvalidTag {
			tag: tag.to_owned(),
			field: self.field.to_owned(),
		}
	}
}
