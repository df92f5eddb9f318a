//! Value model used in place of runtime reflection.
//!
//! # Role
//!
//! Every traversable type implements [`Reflect`], which exposes just enough structure for the
//! engine: the value's [`Kind`], mutable access to its shape (sequence, map or struct), one
//! level of pointer unwrapping, a zero test and a typed write ("value cell").
//!
//! # Invariants
//!
//! - [`Reflect::unwrap_one`] only succeeds for [`Kind::Pointer`] and [`Kind::Dynamic`] values
//!   that are non-nil.
//! - [`Reflect::assign`] never changes the dynamic type of a statically typed slot; a rejected
//!   value is handed back untouched.
//! - Struct descriptors are `'static` and field ordinals index [`StructAccess::field_mut`].

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::Error;

mod descriptor;
mod dynamic;
mod impls;

pub use descriptor::{FieldDescriptor, StructDescriptor, TagDecl};
pub use dynamic::Dynamic;

/// Shape category of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
	/// Opaque scalar (numbers, strings, timestamps).
	Leaf,
	/// Ordered, index-addressable sequence.
	Seq,
	/// Key/value collection.
	Map,
	/// Record with a static descriptor.
	Struct,
	/// Nullable or owning indirection to a single statically typed value.
	Pointer,
	/// Dynamically typed handle that may hold any value or nothing.
	Dynamic,
}

/// Mutable view of a value's shape.
pub enum ShapeMut<'a> {
	Leaf,
	Seq(&'a mut dyn SeqAccess),
	Map(&'a mut dyn MapAccess),
	Struct(&'a mut dyn StructAccess),
}

impl fmt::Debug for ShapeMut<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ShapeMut::Leaf => f.write_str("Leaf"),
			ShapeMut::Seq(seq) => f.debug_struct("Seq").field("len", &seq.len()).finish(),
			ShapeMut::Map(map) => f.debug_struct("Map").field("len", &map.len()).finish(),
			ShapeMut::Struct(s) => f.debug_tuple("Struct").field(&s.descriptor().name).finish(),
		}
	}
}

/// A value the engine can traverse and mutate.
pub trait Reflect: Any + AsReflect + 'static {
	/// Kind shared by every value of this type.
	fn static_kind() -> Kind
	where
		Self: Sized;

	/// Mutable access to the value's structure. Leaves and indirections report
	/// [`ShapeMut::Leaf`].
	fn shape_mut(&mut self) -> ShapeMut<'_> {
		ShapeMut::Leaf
	}

	/// Unwraps one level of indirection.
	///
	/// Returns `Err(self)` when the value is nil or not an indirection at all.
	fn unwrap_one(&mut self) -> Result<&mut dyn Reflect, &mut dyn Reflect> {
		Err(self.as_reflect_mut())
	}

	/// Static kind of the value behind a pointer, available even when the pointer is nil.
	fn pointee_kind(&self) -> Option<Kind> {
		None
	}

	/// Whether the value equals its type's zero value.
	fn is_zero(&self) -> bool;

	/// A fresh zero value, for types that can build one without outside input.
	fn zero_value() -> Option<Self>
	where
		Self: Sized,
	{
		None
	}

	/// Points a nil pointer at a zero value of its pointee.
	///
	/// Returns whether the value is non-nil afterwards. Non-pointers report `false`.
	fn allocate(&mut self) -> bool {
		false
	}

	/// Writes `value` into this slot, handing it back if its type does not fit.
	fn assign(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
		self.assign_boxed(value)
	}
}

/// Object-safe conversions implemented for every [`Reflect`] type.
pub trait AsReflect {
	fn as_any(&self) -> &dyn Any;
	fn as_any_mut(&mut self) -> &mut dyn Any;
	fn into_any(self: Box<Self>) -> Box<dyn Any>;
	fn as_reflect(&self) -> &dyn Reflect;
	fn as_reflect_mut(&mut self) -> &mut dyn Reflect;
	/// Kind of this value's concrete type.
	fn kind(&self) -> Kind;
	/// Readable name of this value's concrete type.
	fn type_name(&self) -> &'static str;
	/// Replaces `self` when `value` holds the same concrete type.
	fn assign_boxed(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>>;
}

impl<T: Reflect> AsReflect for T {
	fn as_any(&self) -> &dyn Any {
		self
	}

	fn as_any_mut(&mut self) -> &mut dyn Any {
		self
	}

	fn into_any(self: Box<Self>) -> Box<dyn Any> {
		self
	}

	fn as_reflect(&self) -> &dyn Reflect {
		self
	}

	fn as_reflect_mut(&mut self) -> &mut dyn Reflect {
		self
	}

	fn kind(&self) -> Kind {
		T::static_kind()
	}

	fn type_name(&self) -> &'static str {
		std::any::type_name::<T>()
	}

	fn assign_boxed(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
		*self = *value.downcast::<T>()?;
		Ok(())
	}
}

impl dyn Reflect {
	/// Whether the concrete type behind this reference is `T`.
	pub fn is<T: Reflect>(&self) -> bool {
		self.as_any().is::<T>()
	}

	pub fn downcast_ref<T: Reflect>(&self) -> Option<&T> {
		self.as_any().downcast_ref::<T>()
	}

	pub fn downcast_mut<T: Reflect>(&mut self) -> Option<&mut T> {
		self.as_any_mut().downcast_mut::<T>()
	}

	/// Like [`Self::downcast_mut`], but hands the reference back on mismatch.
	pub fn try_downcast_mut<T: Reflect>(&mut self) -> Result<&mut T, &mut dyn Reflect> {
		if self.is::<T>() {
			// SAFETY: the concrete type was checked above, so the data pointer refers to a `T`.
			Ok(unsafe { &mut *(self as *mut dyn Reflect as *mut T) })
		} else {
			Err(self)
		}
	}

	/// Downcasts an owned value, handing it back on mismatch.
	pub fn downcast<T: Reflect>(self: Box<Self>) -> Result<Box<T>, Box<dyn Reflect>> {
		if self.is::<T>() {
			// SAFETY: the concrete type was checked above; the allocation was made for a `T`.
			Ok(unsafe { Box::from_raw(Box::into_raw(self) as *mut T) })
		} else {
			Err(self)
		}
	}

	/// Writes `value` into this slot, reporting a [`Error::TypeMismatch`] on rejection.
	pub fn set_boxed(&mut self, value: Box<dyn Reflect>) -> Result<(), Error> {
		let expected = self.type_name();
		self.assign(value).map_err(|rejected| Error::TypeMismatch {
			expected,
			found: rejected.type_name(),
		})
	}
}

impl fmt::Debug for dyn Reflect {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "<{} as Reflect>", self.type_name())
	}
}

/// Unboxes an owned value of a known type.
pub fn unbox<T: Reflect>(value: Box<dyn Reflect>) -> Result<T, Error> {
	value.downcast::<T>().map(|v| *v).map_err(|rejected| Error::TypeMismatch {
		expected: std::any::type_name::<T>(),
		found: rejected.type_name(),
	})
}

/// Index-addressable sequence.
pub trait SeqAccess {
	fn len(&self) -> usize;

	fn is_empty(&self) -> bool {
		self.len() == 0
	}

	fn element_mut(&mut self, index: usize) -> Option<&mut dyn Reflect>;

	/// Replaces the contents with an empty sequence of the given capacity. Fixed-size
	/// sequences are left untouched.
	fn reset(&mut self, capacity: usize);
}

/// Key/value collection whose entries can be moved out and written back.
pub trait MapAccess {
	fn len(&self) -> usize;

	fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Values in the map's iteration order, mutable in place.
	fn values_mut(&mut self) -> Box<dyn Iterator<Item = &mut dyn Reflect> + '_>;

	/// Moves every entry out into owned cells, leaving the map empty.
	fn drain_entries(&mut self) -> Vec<(Box<dyn Reflect>, Box<dyn Reflect>)>;

	/// Writes an owned entry back. Later writes to the same key win.
	fn insert_entry(&mut self, key: Box<dyn Reflect>, value: Box<dyn Reflect>) -> Result<(), Error>;

	/// Replaces the contents with an empty map of the given capacity.
	fn reset(&mut self, capacity: usize);
}

/// Record with a static descriptor and ordinal field access.
pub trait StructAccess {
	fn descriptor(&self) -> &'static StructDescriptor;

	/// Field at `index` in descriptor order.
	fn field_mut(&mut self, index: usize) -> Option<&mut dyn Reflect>;
}

/// Type identity used to key struct-level callbacks and interceptors.
#[derive(Clone, Copy)]
pub struct TypeKey {
	id: TypeId,
	name: &'static str,
}

impl TypeKey {
	pub fn of<T: 'static>() -> Self {
		Self {
			id: TypeId::of::<T>(),
			name: std::any::type_name::<T>(),
		}
	}

	pub fn id(&self) -> TypeId {
		self.id
	}

	pub fn name(&self) -> &'static str {
		self.name
	}
}

impl PartialEq for TypeKey {
	fn eq(&self, other: &Self) -> bool {
		self.id == other.id
	}
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.id.hash(state);
	}
}

impl fmt::Debug for TypeKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name)
	}
}
