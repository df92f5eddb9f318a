//! Chain application and recursive descent.
//!
//! # Invariants
//!
//! - Traversal is fail-fast: the first error aborts the walk and mutations already applied
//!   are kept.
//! - A map walked under a `keys` node never loses entries: on failure the failing entry and
//!   every entry not yet visited are written back before the error is returned.
//! - A struct-level callback runs once per struct instance, after all of its field chains.

use tokio_util::sync::CancellationToken;
use tracing::{trace, warn};

use super::Transformer;
use crate::context::{FieldLevel, StructLevel};
use crate::error::Error;
use crate::reflect::{Kind, MapAccess, Reflect, ShapeMut};
use crate::tag::{ParsedTag, TagKind};

/// One traversal over one value.
pub(super) struct Walker<'t> {
	transformer: &'t Transformer,
	cancel: &'t CancellationToken,
}

impl<'t> Walker<'t> {
	pub(super) fn new(transformer: &'t Transformer, cancel: &'t CancellationToken) -> Self {
		Self {
			transformer,
			cancel,
		}
	}

	/// Applies the chain starting at `node` to `slot`, then descends into the result if it is
	/// a struct.
	pub(super) fn apply_chain(
		&self,
		slot: &mut dyn Reflect,
		mut node: Option<&ParsedTag>,
	) -> Result<(), Error> {
		while let Some(tag) = node {
			match tag.kind() {
				TagKind::Default => {
					self.invoke(slot, tag)?;
					node = tag.next();
				}
				TagKind::Dive => return self.dive(slot, tag.next()),
				TagKind::Keys => return Err(Error::InvalidKeys),
				TagKind::EndKeys => return Ok(()),
			}
		}
		self.descend(slot)
	}

	fn invoke(&self, slot: &mut dyn Reflect, tag: &ParsedTag) -> Result<(), Error> {
		let Some(callback) = tag.callback() else {
			return Ok(());
		};
		trace!(tag = tag.name(), param = tag.param(), "applying transformation");
		let mut level = FieldLevel::new(self.transformer, self.cancel, slot, tag.param());
		callback(&mut level).map_err(Error::from_callback)
	}

	fn dive(&self, slot: &mut dyn Reflect, chain: Option<&ParsedTag>) -> Result<(), Error> {
		let current = self.transformer.resolve(slot);
		if current.kind() == Kind::Pointer
			&& matches!(current.pointee_kind(), Some(Kind::Seq | Kind::Map))
		{
			return Ok(());
		}

		let type_name = current.type_name();
		match current.shape_mut() {
			ShapeMut::Seq(seq) => {
				for index in 0..seq.len() {
					if let Some(element) = seq.element_mut(index) {
						self.apply_chain(element, chain)?;
					}
				}
				Ok(())
			}
			ShapeMut::Map(map) => self.dive_map(map, chain),
			ShapeMut::Leaf | ShapeMut::Struct(_) => Err(Error::InvalidDive { type_name }),
		}
	}

	fn dive_map(&self, map: &mut dyn MapAccess, chain: Option<&ParsedTag>) -> Result<(), Error> {
		let Some(keys) = chain.filter(|tag| tag.kind() == TagKind::Keys) else {
			for value in map.values_mut() {
				self.apply_chain(value, chain)?;
			}
			return Ok(());
		};

		let mut entries = map.drain_entries().into_iter();
		while let Some((mut key, mut value)) = entries.next() {
			let outcome = self
				.apply_chain(&mut *key, keys.keys())
				.and_then(|()| self.apply_chain(&mut *value, keys.next()));
			let outcome = outcome.and(map.insert_entry(key, value));
			if let Err(err) = outcome {
				restore(map, entries);
				return Err(err);
			}
		}
		Ok(())
	}

	fn descend(&self, slot: &mut dyn Reflect) -> Result<(), Error> {
		let current = self.transformer.resolve(slot);
		if current.kind() == Kind::Struct {
			self.apply_struct(current)
		} else {
			Ok(())
		}
	}

	/// Applies every field chain of a struct value, then its struct-level callback.
	pub(super) fn apply_struct(&self, value: &mut dyn Reflect) -> Result<(), Error> {
		let ty = value.as_any().type_id();
		let ShapeMut::Struct(access) = value.shape_mut() else {
			return Ok(());
		};
		let spec = self.transformer.struct_spec(ty, access.descriptor())?;

		for field in spec.fields() {
			let slot = access.field_mut(field.index()).ok_or(Error::MissingField {
				type_name: spec.name(),
				index: field.index(),
			})?;
			self.apply_chain(slot, field.chain().head())?;
		}

		if let Some(callback) = &spec.callback {
			trace!(ty = spec.name(), "applying struct-level transformation");
			let mut level = StructLevel::new(self.transformer, self.cancel, value);
			callback(&mut level).map_err(Error::from_callback)?;
		}
		Ok(())
	}
}

/// Writes back entries that were drained but not yet visited.
fn restore(
	map: &mut dyn MapAccess,
	entries: impl Iterator<Item = (Box<dyn Reflect>, Box<dyn Reflect>)>,
) {
	for (key, value) in entries {
		if let Err(err) = map.insert_entry(key, value) {
			warn!(%err, "dropped map entry while restoring after failure");
		}
	}
}
