//! [`Reflect`] implementations for standard library (and optionally chrono) types.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::hash::{BuildHasher, Hash};
use std::time::{Duration, SystemTime};

use indexmap::IndexMap;

use super::{Kind, MapAccess, Reflect, SeqAccess, ShapeMut, unbox};
use crate::error::Error;

macro_rules! impl_leaf {
	($($ty:ty),* $(,)?) => {
		$(
			impl Reflect for $ty {
				fn static_kind() -> Kind {
					Kind::Leaf
				}

				fn is_zero(&self) -> bool {
					*self == <$ty as Default>::default()
				}

				fn zero_value() -> Option<Self> {
					Some(<$ty as Default>::default())
				}
			}
		)*
	};
}

impl_leaf!(
	bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, String,
	Duration,
);

#[cfg(feature = "chrono")]
impl_leaf!(
	chrono::DateTime<chrono::Utc>,
	chrono::NaiveDate,
	chrono::NaiveDateTime,
	chrono::NaiveTime,
);

impl Reflect for SystemTime {
	fn static_kind() -> Kind {
		Kind::Leaf
	}

	fn is_zero(&self) -> bool {
		*self == SystemTime::UNIX_EPOCH
	}

	fn zero_value() -> Option<Self> {
		Some(SystemTime::UNIX_EPOCH)
	}
}

impl<T: Reflect> Reflect for Vec<T> {
	fn static_kind() -> Kind {
		Kind::Seq
	}

	fn shape_mut(&mut self) -> ShapeMut<'_> {
		ShapeMut::Seq(self)
	}

	fn is_zero(&self) -> bool {
		Vec::is_empty(self)
	}

	fn zero_value() -> Option<Self> {
		Some(Self::default())
	}
}

impl<T: Reflect> SeqAccess for Vec<T> {
	fn len(&self) -> usize {
		Vec::len(self)
	}

	fn element_mut(&mut self, index: usize) -> Option<&mut dyn Reflect> {
		self.get_mut(index).map(|element| element as &mut dyn Reflect)
	}

	fn reset(&mut self, capacity: usize) {
		*self = Vec::with_capacity(capacity);
	}
}

impl<T: Reflect> Reflect for VecDeque<T> {
	fn static_kind() -> Kind {
		Kind::Seq
	}

	fn shape_mut(&mut self) -> ShapeMut<'_> {
		ShapeMut::Seq(self)
	}

	fn is_zero(&self) -> bool {
		VecDeque::is_empty(self)
	}

	fn zero_value() -> Option<Self> {
		Some(Self::default())
	}
}

impl<T: Reflect> SeqAccess for VecDeque<T> {
	fn len(&self) -> usize {
		VecDeque::len(self)
	}

	fn element_mut(&mut self, index: usize) -> Option<&mut dyn Reflect> {
		self.get_mut(index).map(|element| element as &mut dyn Reflect)
	}

	fn reset(&mut self, capacity: usize) {
		*self = VecDeque::with_capacity(capacity);
	}
}

impl<T: Reflect, const N: usize> Reflect for [T; N] {
	fn static_kind() -> Kind {
		Kind::Seq
	}

	fn shape_mut(&mut self) -> ShapeMut<'_> {
		ShapeMut::Seq(self)
	}

	fn is_zero(&self) -> bool {
		self.iter().all(|element| element.is_zero())
	}
}

impl<T: Reflect, const N: usize> SeqAccess for [T; N] {
	fn len(&self) -> usize {
		N
	}

	fn element_mut(&mut self, index: usize) -> Option<&mut dyn Reflect> {
		self.get_mut(index).map(|element| element as &mut dyn Reflect)
	}

	fn reset(&mut self, _capacity: usize) {}
}

fn boxed_entry<K: Reflect, V: Reflect>((key, value): (K, V)) -> (Box<dyn Reflect>, Box<dyn Reflect>) {
	(Box::new(key), Box::new(value))
}

impl<K, V, S> Reflect for HashMap<K, V, S>
where
	K: Reflect + Eq + Hash,
	V: Reflect,
	S: BuildHasher + Default + 'static,
{
	fn static_kind() -> Kind {
		Kind::Map
	}

	fn shape_mut(&mut self) -> ShapeMut<'_> {
		ShapeMut::Map(self)
	}

	fn is_zero(&self) -> bool {
		HashMap::is_empty(self)
	}

	fn zero_value() -> Option<Self> {
		Some(Self::default())
	}
}

impl<K, V, S> MapAccess for HashMap<K, V, S>
where
	K: Reflect + Eq + Hash,
	V: Reflect,
	S: BuildHasher + Default + 'static,
{
	fn len(&self) -> usize {
		HashMap::len(self)
	}

	fn values_mut(&mut self) -> Box<dyn Iterator<Item = &mut dyn Reflect> + '_> {
		Box::new(HashMap::values_mut(self).map(|value| value as &mut dyn Reflect))
	}

	fn drain_entries(&mut self) -> Vec<(Box<dyn Reflect>, Box<dyn Reflect>)> {
		self.drain().map(boxed_entry).collect()
	}

	fn insert_entry(&mut self, key: Box<dyn Reflect>, value: Box<dyn Reflect>) -> Result<(), Error> {
		self.insert(unbox::<K>(key)?, unbox::<V>(value)?);
		Ok(())
	}

	fn reset(&mut self, capacity: usize) {
		*self = HashMap::with_capacity_and_hasher(capacity, S::default());
	}
}

impl<K, V, S> Reflect for IndexMap<K, V, S>
where
	K: Reflect + Eq + Hash,
	V: Reflect,
	S: BuildHasher + Default + 'static,
{
	fn static_kind() -> Kind {
		Kind::Map
	}

	fn shape_mut(&mut self) -> ShapeMut<'_> {
		ShapeMut::Map(self)
	}

	fn is_zero(&self) -> bool {
		IndexMap::is_empty(self)
	}

	fn zero_value() -> Option<Self> {
		Some(Self::default())
	}
}

impl<K, V, S> MapAccess for IndexMap<K, V, S>
where
	K: Reflect + Eq + Hash,
	V: Reflect,
	S: BuildHasher + Default + 'static,
{
	fn len(&self) -> usize {
		IndexMap::len(self)
	}

	fn values_mut(&mut self) -> Box<dyn Iterator<Item = &mut dyn Reflect> + '_> {
		Box::new(IndexMap::values_mut(self).map(|value| value as &mut dyn Reflect))
	}

	fn drain_entries(&mut self) -> Vec<(Box<dyn Reflect>, Box<dyn Reflect>)> {
		self.drain(..).map(boxed_entry).collect()
	}

	fn insert_entry(&mut self, key: Box<dyn Reflect>, value: Box<dyn Reflect>) -> Result<(), Error> {
		self.insert(unbox::<K>(key)?, unbox::<V>(value)?);
		Ok(())
	}

	fn reset(&mut self, capacity: usize) {
		*self = IndexMap::with_capacity_and_hasher(capacity, S::default());
	}
}

impl<K, V> Reflect for BTreeMap<K, V>
where
	K: Reflect + Ord,
	V: Reflect,
{
	fn static_kind() -> Kind {
		Kind::Map
	}

	fn shape_mut(&mut self) -> ShapeMut<'_> {
		ShapeMut::Map(self)
	}

	fn is_zero(&self) -> bool {
		BTreeMap::is_empty(self)
	}

	fn zero_value() -> Option<Self> {
		Some(Self::default())
	}
}

impl<K, V> MapAccess for BTreeMap<K, V>
where
	K: Reflect + Ord,
	V: Reflect,
{
	fn len(&self) -> usize {
		BTreeMap::len(self)
	}

	fn values_mut(&mut self) -> Box<dyn Iterator<Item = &mut dyn Reflect> + '_> {
		Box::new(BTreeMap::values_mut(self).map(|value| value as &mut dyn Reflect))
	}

	fn drain_entries(&mut self) -> Vec<(Box<dyn Reflect>, Box<dyn Reflect>)> {
		std::mem::take(self).into_iter().map(boxed_entry).collect()
	}

	fn insert_entry(&mut self, key: Box<dyn Reflect>, value: Box<dyn Reflect>) -> Result<(), Error> {
		self.insert(unbox::<K>(key)?, unbox::<V>(value)?);
		Ok(())
	}

	fn reset(&mut self, _capacity: usize) {
		self.clear();
	}
}

/// `Option` is the nullable pointer: `None` is nil.
impl<T: Reflect> Reflect for Option<T> {
	fn static_kind() -> Kind {
		Kind::Pointer
	}

	fn unwrap_one(&mut self) -> Result<&mut dyn Reflect, &mut dyn Reflect> {
		match *self {
			Some(ref mut inner) => Ok(inner),
			None => Err(self),
		}
	}

	fn pointee_kind(&self) -> Option<Kind> {
		Some(T::static_kind())
	}

	fn is_zero(&self) -> bool {
		self.is_none()
	}

	fn zero_value() -> Option<Self> {
		Some(None)
	}

	fn allocate(&mut self) -> bool {
		if self.is_none() {
			*self = T::zero_value();
		}
		self.is_some()
	}

	/// Accepts either another `Option<T>` or a bare `T`, which allocates the pointer.
	fn assign(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
		match value.downcast::<Self>() {
			Ok(option) => *self = *option,
			Err(value) => *self = Some(*value.downcast::<T>()?),
		}
		Ok(())
	}
}

/// `Box` is a pointer that is never nil.
impl<T: Reflect> Reflect for Box<T> {
	fn static_kind() -> Kind {
		Kind::Pointer
	}

	fn unwrap_one(&mut self) -> Result<&mut dyn Reflect, &mut dyn Reflect> {
		Ok(&mut **self)
	}

	fn pointee_kind(&self) -> Option<Kind> {
		Some(T::static_kind())
	}

	fn is_zero(&self) -> bool {
		false
	}

	fn zero_value() -> Option<Self> {
		T::zero_value().map(Box::new)
	}

	fn allocate(&mut self) -> bool {
		true
	}

	fn assign(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
		match value.downcast::<Self>() {
			Ok(boxed) => *self = *boxed,
			Err(value) => *self = value.downcast::<T>()?,
		}
		Ok(())
	}
}
