//! Callback registry and the setup builder.
//!
//! # Role
//!
//! [`TransformerBuilder`] collects field callbacks, aliases, struct-level callbacks and
//! interceptors, validating every name as it is registered. [`TransformerBuilder::build`]
//! freezes the collected [`Registry`] into an immutable [`Transformer`].
//!
//! # Invariants
//!
//! - Registered names are non-empty, not reserved and free of restricted characters.
//! - Re-registering a name or type replaces the previous entry.
//! - A built transformer never observes later builder changes.

use std::any::TypeId;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::context::{FieldLevel, StructLevel};
use crate::engine::Transformer;
use crate::error::{BoxError, RegistrationError};
use crate::reflect::{Reflect, TypeKey};

mod restricted;

pub use restricted::{RESTRICTED_CHARS, RESTRICTED_TAGS, is_restricted};

/// Field-level transformation callback.
pub type FieldFn = Arc<dyn Fn(&mut FieldLevel<'_>) -> Result<(), BoxError> + Send + Sync>;

/// Struct-level transformation callback.
pub type StructFn = Arc<dyn Fn(&mut StructLevel<'_>) -> Result<(), BoxError> + Send + Sync>;

/// Redirects a value to an inner value that transformations should act on instead.
pub type InterceptFn =
	Arc<dyn for<'v> Fn(&'v mut dyn Reflect) -> &'v mut (dyn Reflect) + Send + Sync>;

fn intercept_fn<F>(redirect: F) -> InterceptFn
where
	F: for<'v> Fn(&'v mut dyn Reflect) -> &'v mut (dyn Reflect) + Send + Sync + 'static,
{
	Arc::new(redirect)
}

/// Frozen registration state shared by a transformer and its caches.
#[derive(Clone, Default)]
pub struct Registry {
	callbacks: FxHashMap<Box<str>, FieldFn>,
	aliases: FxHashMap<Box<str>, Box<str>>,
	struct_level: FxHashMap<TypeId, StructFn>,
	interceptors: FxHashMap<TypeId, InterceptFn>,
}

impl Registry {
	pub fn callback(&self, name: &str) -> Option<&FieldFn> {
		self.callbacks.get(name)
	}

	/// Expansion registered for `alias`.
	pub fn alias(&self, alias: &str) -> Option<&str> {
		self.aliases.get(alias).map(|tags| &**tags)
	}

	pub fn struct_level(&self, ty: TypeId) -> Option<&StructFn> {
		self.struct_level.get(&ty)
	}

	pub fn interceptor(&self, ty: TypeId) -> Option<&InterceptFn> {
		self.interceptors.get(&ty)
	}

	pub fn has_interceptors(&self) -> bool {
		!self.interceptors.is_empty()
	}
}

impl std::fmt::Debug for Registry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let mut names: Vec<_> = self.callbacks.keys().collect();
		names.sort();
		f.debug_struct("Registry")
			.field("callbacks", &names)
			.field("aliases", &self.aliases)
			.field("struct_level", &self.struct_level.len())
			.field("interceptors", &self.interceptors.len())
			.finish()
	}
}

/// Fallible setup builder for a [`Transformer`].
#[derive(Debug, Clone)]
pub struct TransformerBuilder {
	tag_name: Box<str>,
	registry: Registry,
}

impl Default for TransformerBuilder {
	fn default() -> Self {
		Self {
			tag_name: Transformer::DEFAULT_TAG_NAME.into(),
			registry: Registry::default(),
		}
	}
}

impl TransformerBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Descriptor key read for struct field tags.
	pub fn tag_name(&mut self, name: impl Into<Box<str>>) -> &mut Self {
		self.tag_name = name.into();
		self
	}

	/// Registers a field callback under `name`.
	pub fn register<F>(&mut self, name: &str, callback: F) -> Result<&mut Self, RegistrationError>
	where
		F: Fn(&mut FieldLevel<'_>) -> Result<(), BoxError> + Send + Sync + 'static,
	{
		if name.is_empty() {
			return Err(RegistrationError::EmptyName);
		}
		if is_restricted(name) {
			return Err(RegistrationError::RestrictedName(name.to_owned()));
		}
		if self.registry.callbacks.insert(name.into(), Arc::new(callback)).is_some() {
			warn!(name, "replaced registered transformation");
		} else {
			debug!(name, "registered transformation");
		}
		Ok(self)
	}

	/// Registers `alias` as shorthand for the comma-separated `tags`.
	pub fn register_alias(&mut self, alias: &str, tags: &str) -> Result<&mut Self, RegistrationError> {
		if alias.is_empty() {
			return Err(RegistrationError::EmptyAlias);
		}
		if tags.is_empty() {
			return Err(RegistrationError::EmptyExpansion);
		}
		if is_restricted(alias) {
			return Err(RegistrationError::RestrictedAlias(alias.to_owned()));
		}
		if self.registry.aliases.insert(alias.into(), tags.into()).is_some() {
			warn!(alias, tags, "replaced registered alias");
		} else {
			debug!(alias, tags, "registered alias");
		}
		Ok(self)
	}

	/// Registers a callback run once per instance of each type in `types`, after its fields.
	pub fn register_struct_level<F>(
		&mut self,
		callback: F,
		types: &[TypeKey],
	) -> Result<&mut Self, RegistrationError>
	where
		F: Fn(&mut StructLevel<'_>) -> Result<(), BoxError> + Send + Sync + 'static,
	{
		if types.is_empty() {
			return Err(RegistrationError::NoTypes);
		}
		let callback: StructFn = Arc::new(callback);
		for ty in types {
			if self
				.registry
				.struct_level
				.insert(ty.id(), Arc::clone(&callback))
				.is_some()
			{
				warn!(ty = ty.name(), "replaced struct-level transformation");
			} else {
				debug!(ty = ty.name(), "registered struct-level transformation");
			}
		}
		Ok(self)
	}

	/// Redirects every value of type `T` to the value returned by `redirect`.
	pub fn register_interceptor<T, F>(&mut self, redirect: F) -> &mut Self
	where
		T: Reflect,
		F: for<'v> Fn(&'v mut T) -> &'v mut (dyn Reflect) + Send + Sync + 'static,
	{
		let erased = intercept_fn(move |value| match value.try_downcast_mut::<T>() {
			Ok(typed) => redirect(typed),
			Err(value) => value,
		});
		self.insert_interceptor(TypeKey::of::<T>(), erased);
		self
	}

	/// Untyped form of [`Self::register_interceptor`] covering several types at once.
	pub fn register_interceptor_for<F>(
		&mut self,
		redirect: F,
		types: &[TypeKey],
	) -> Result<&mut Self, RegistrationError>
	where
		F: for<'v> Fn(&'v mut dyn Reflect) -> &'v mut (dyn Reflect) + Send + Sync + 'static,
	{
		if types.is_empty() {
			return Err(RegistrationError::NoTypes);
		}
		let redirect = intercept_fn(redirect);
		for ty in types {
			self.insert_interceptor(*ty, Arc::clone(&redirect));
		}
		Ok(self)
	}

	fn insert_interceptor(&mut self, ty: TypeKey, redirect: InterceptFn) {
		if self.registry.interceptors.insert(ty.id(), redirect).is_some() {
			warn!(ty = ty.name(), "replaced interceptor");
		} else {
			debug!(ty = ty.name(), "registered interceptor");
		}
	}

	/// Freezes the current registrations into a transformer.
	pub fn build(&self) -> Transformer {
		Transformer::new(self.tag_name.clone(), self.registry.clone())
	}
}

#[cfg(test)]
mod tests;
