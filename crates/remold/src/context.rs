//! Contexts handed to field and struct callbacks.

use tokio_util::sync::CancellationToken;

use crate::engine::Transformer;
use crate::error::Error;
use crate::reflect::Reflect;

/// Context for a field-level callback.
///
/// The slot is the value as declared (an `Option`, [`crate::Dynamic`] or plain value); the
/// field is that slot with pointers, dynamic handles and interceptors resolved.
pub struct FieldLevel<'a> {
	transformer: &'a Transformer,
	cancel: &'a CancellationToken,
	slot: &'a mut dyn Reflect,
	param: &'a str,
}

impl<'a> FieldLevel<'a> {
	pub(crate) fn new(
		transformer: &'a Transformer,
		cancel: &'a CancellationToken,
		slot: &'a mut dyn Reflect,
		param: &'a str,
	) -> Self {
		Self {
			transformer,
			cancel,
			slot,
			param,
		}
	}

	/// The transformer running this traversal, for nested transformations.
	pub fn transformer(&self) -> &'a Transformer {
		self.transformer
	}

	pub fn cancel_token(&self) -> &'a CancellationToken {
		self.cancel
	}

	/// Parameter of the tag being applied, or `""`.
	pub fn param(&self) -> &'a str {
		self.param
	}

	/// The slot as declared on the parent, before any unwrapping.
	pub fn parent(&mut self) -> &mut dyn Reflect {
		&mut *self.slot
	}

	/// The current value. Re-resolved on every call, so it reflects earlier writes.
	pub fn field(&mut self) -> &mut dyn Reflect {
		self.transformer.resolve(&mut *self.slot)
	}

	pub fn field_as<T: Reflect>(&mut self) -> Option<&mut T> {
		self.field().downcast_mut::<T>()
	}

	pub fn is_zero(&mut self) -> bool {
		self.field().is_zero()
	}

	/// Writes `value` into the current field, falling back to the declared slot so that
	/// nil pointers are allocated and dynamic handles may change type.
	pub fn set<T: Reflect>(&mut self, value: T) -> Result<(), Error> {
		self.set_boxed(Box::new(value))
	}

	pub fn set_boxed(&mut self, value: Box<dyn Reflect>) -> Result<(), Error> {
		match self.field().assign(value) {
			Ok(()) => Ok(()),
			Err(rejected) => self.slot.set_boxed(rejected),
		}
	}
}

/// Context for a struct-level callback.
pub struct StructLevel<'a> {
	transformer: &'a Transformer,
	cancel: &'a CancellationToken,
	current: &'a mut dyn Reflect,
}

impl<'a> StructLevel<'a> {
	pub(crate) fn new(
		transformer: &'a Transformer,
		cancel: &'a CancellationToken,
		current: &'a mut dyn Reflect,
	) -> Self {
		Self {
			transformer,
			cancel,
			current,
		}
	}

	pub fn transformer(&self) -> &'a Transformer {
		self.transformer
	}

	pub fn cancel_token(&self) -> &'a CancellationToken {
		self.cancel
	}

	/// The struct value being transformed.
	pub fn current(&mut self) -> &mut dyn Reflect {
		&mut *self.current
	}

	pub fn struct_as<T: Reflect>(&mut self) -> Option<&mut T> {
		self.current.downcast_mut::<T>()
	}

	/// Replaces the whole struct value.
	pub fn set<T: Reflect>(&mut self, value: T) -> Result<(), Error> {
		self.current.set_boxed(Box::new(value))
	}
}
