//! The transformer and its compiled struct specs.
//!
//! # Role
//!
//! [`Transformer`] owns the frozen [`Registry`] and two snapshot caches: compiled tag chains
//! keyed by tag string, and [`StructSpec`]s keyed by type. The public entry points compile
//! lazily through those caches and hand the value to the traversal in [`traverse`].
//!
//! # Concurrency
//!
//! All methods take `&self`. Cache misses serialize on the affected cache's update lock;
//! everything else runs without locking.

use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::cache::SnapshotCache;
use crate::error::Error;
use crate::reflect::{Kind, Reflect, StructDescriptor};
use crate::registry::{Registry, StructFn, TransformerBuilder};
use crate::tag::{Chain, SKIP_TAG, parse};

mod traverse;

use traverse::Walker;

/// Compiled per-field plan of a struct type.
#[derive(Debug)]
pub struct FieldSpec {
	index: usize,
	name: &'static str,
	chain: Arc<Chain>,
}

impl FieldSpec {
	/// Ordinal of the field in its struct descriptor.
	pub fn index(&self) -> usize {
		self.index
	}

	pub fn name(&self) -> &'static str {
		self.name
	}

	pub fn chain(&self) -> &Arc<Chain> {
		&self.chain
	}
}

/// Compiled plan of a struct type: its non-skipped fields in declaration order and the
/// struct-level callback registered for it.
pub struct StructSpec {
	name: &'static str,
	fields: Vec<FieldSpec>,
	callback: Option<StructFn>,
}

impl StructSpec {
	pub fn name(&self) -> &'static str {
		self.name
	}

	pub fn fields(&self) -> &[FieldSpec] {
		&self.fields
	}

	pub fn has_struct_level(&self) -> bool {
		self.callback.is_some()
	}
}

impl fmt::Debug for StructSpec {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("StructSpec")
			.field("name", &self.name)
			.field("fields", &self.fields)
			.field("struct_level", &self.callback.is_some())
			.finish()
	}
}

/// Applies registered transformations to values according to their tags.
pub struct Transformer {
	tag_name: Box<str>,
	registry: Registry,
	tags: SnapshotCache<String, Arc<Chain>>,
	structs: SnapshotCache<TypeId, Arc<StructSpec>>,
}

impl Transformer {
	/// Descriptor key read for field tags unless configured otherwise.
	pub const DEFAULT_TAG_NAME: &'static str = "mold";

	pub fn builder() -> TransformerBuilder {
		TransformerBuilder::new()
	}

	pub(crate) fn new(tag_name: Box<str>, registry: Registry) -> Self {
		Self {
			tag_name,
			registry,
			tags: SnapshotCache::new("tags"),
			structs: SnapshotCache::new("structs"),
		}
	}

	pub fn tag_name(&self) -> &str {
		&self.tag_name
	}

	pub fn registry(&self) -> &Registry {
		&self.registry
	}

	/// Transforms every tagged field of a struct, then runs its struct-level callback.
	///
	/// `value` may be the struct itself or a pointer or dynamic handle to it. Nil handles and
	/// non-struct values are rejected with [`Error::InvalidArgument`].
	pub fn transform_struct(
		&self,
		cancel: &CancellationToken,
		value: &mut dyn Reflect,
	) -> Result<(), Error> {
		let current = self.resolve(value);
		if current.kind() != Kind::Struct {
			return Err(Error::InvalidArgument {
				call: "transform_struct",
				reason: format!("expected a non-nil struct, found {}", current.type_name()),
			});
		}
		Walker::new(self, cancel).apply_struct(current)
	}

	/// Applies `tags` to a standalone value. Empty tags and `"-"` are no-ops.
	pub fn transform_field(
		&self,
		cancel: &CancellationToken,
		value: &mut dyn Reflect,
		tags: &str,
	) -> Result<(), Error> {
		if tags.is_empty() || tags == SKIP_TAG {
			return Ok(());
		}
		let chain = self.chain(value.type_name(), tags)?;
		Walker::new(self, cancel).apply_chain(value, chain.head())
	}

	/// Compiled chain for `tags`, shared with every other user of the same tag string.
	pub fn chain(&self, field: &str, tags: &str) -> Result<Arc<Chain>, Error> {
		self.tags.get_or_try_insert_with(tags, || {
			parse::compile(&self.registry, field, tags).map(Arc::new)
		})
	}

	/// Compiled spec for the struct type `ty` described by `descriptor`.
	pub fn struct_spec(
		&self,
		ty: TypeId,
		descriptor: &'static StructDescriptor,
	) -> Result<Arc<StructSpec>, Error> {
		self.structs
			.get_or_try_insert_with(&ty, || self.compile_struct(ty, descriptor))
	}

	fn compile_struct(
		&self,
		ty: TypeId,
		descriptor: &'static StructDescriptor,
	) -> Result<Arc<StructSpec>, Error> {
		let mut fields = Vec::with_capacity(descriptor.fields.len());
		for (index, field) in descriptor.fields.iter().enumerate() {
			let tags = field.tag(&self.tag_name).unwrap_or_default();
			if tags == SKIP_TAG {
				continue;
			}
			let chain = if tags.is_empty() {
				Arc::default()
			} else {
				self.chain(field.name, tags)?
			};
			fields.push(FieldSpec {
				index,
				name: field.name,
				chain,
			});
		}

		let callback = self.registry.struct_level(ty).cloned();
		debug!(
			ty = descriptor.name,
			fields = fields.len(),
			struct_level = callback.is_some(),
			"compiled struct spec"
		);
		Ok(Arc::new(StructSpec {
			name: descriptor.name,
			fields,
			callback,
		}))
	}

	/// Follows pointers, dynamic handles and interceptors to the value transformations act on.
	///
	/// Stops at nil handles, at values without an interceptor, and at interceptors that return
	/// a value of their own type.
	pub(crate) fn resolve<'v>(&self, mut value: &'v mut dyn Reflect) -> &'v mut dyn Reflect {
		loop {
			value = match value.kind() {
				Kind::Pointer | Kind::Dynamic => match value.unwrap_one() {
					Ok(inner) => inner,
					Err(nil) => return nil,
				},
				_ if !self.registry.has_interceptors() => return value,
				_ => {
					let ty = value.as_any().type_id();
					let Some(redirect) = self.registry.interceptor(ty) else {
						return value;
					};
					let inner = redirect(value);
					if inner.as_any().type_id() == ty {
						return inner;
					}
					inner
				}
			};
		}
	}
}

impl fmt::Debug for Transformer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Transformer")
			.field("tag_name", &self.tag_name)
			.field("registry", &self.registry)
			.field("tags", &self.tags)
			.field("structs", &self.structs)
			.finish()
	}
}
