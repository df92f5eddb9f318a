use std::fmt;

use super::{Kind, Reflect};

/// Dynamically typed handle: nil, or any [`Reflect`] value.
///
/// Traversal looks through a non-nil handle to the value inside. Callbacks may replace the
/// content with a value of a different type or shape.
#[derive(Default)]
pub struct Dynamic(Option<Box<dyn Reflect>>);

impl Dynamic {
	pub fn nil() -> Self {
		Self(None)
	}

	pub fn new<T: Reflect>(value: T) -> Self {
		Self(Some(Box::new(value)))
	}

	pub fn from_boxed(value: Box<dyn Reflect>) -> Self {
		Self(Some(value))
	}

	pub fn is_nil(&self) -> bool {
		self.0.is_none()
	}

	pub fn set<T: Reflect>(&mut self, value: T) {
		self.0 = Some(Box::new(value));
	}

	pub fn take(&mut self) -> Option<Box<dyn Reflect>> {
		self.0.take()
	}

	pub fn get(&self) -> Option<&dyn Reflect> {
		self.0.as_deref()
	}

	pub fn downcast_ref<T: Reflect>(&self) -> Option<&T> {
		self.0.as_deref().and_then(|inner| inner.downcast_ref::<T>())
	}

	pub fn downcast_mut<T: Reflect>(&mut self) -> Option<&mut T> {
		self.0.as_deref_mut().and_then(|inner| inner.downcast_mut::<T>())
	}
}

impl fmt::Debug for Dynamic {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.0 {
			Some(inner) => f.debug_tuple("Dynamic").field(&inner.type_name()).finish(),
			None => f.write_str("Dynamic(nil)"),
		}
	}
}

impl Reflect for Dynamic {
	fn static_kind() -> Kind {
		Kind::Dynamic
	}

	fn unwrap_one(&mut self) -> Result<&mut dyn Reflect, &mut dyn Reflect> {
		match self.0 {
			Some(ref mut inner) => Ok(&mut **inner),
			None => Err(self),
		}
	}

	fn is_zero(&self) -> bool {
		self.is_nil()
	}

	fn zero_value() -> Option<Self> {
		Some(Self::nil())
	}

	fn assign(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
		match value.downcast::<Dynamic>() {
			Ok(handle) => *self = *handle,
			Err(value) => self.0 = Some(value),
		}
		Ok(())
	}
}
