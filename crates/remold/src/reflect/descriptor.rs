//! Static struct descriptors.
//!
//! Descriptors are plain `'static` data so both `#[derive(Reflect)]` and hand-written impls
//! can declare them in a `static` item.

/// Field list of a struct type, in declaration order.
#[derive(Debug, Clone, Copy)]
pub struct StructDescriptor {
	pub name: &'static str,
	pub fields: &'static [FieldDescriptor],
}

/// A single struct field and its tag declarations.
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
	pub name: &'static str,
	pub tags: &'static [TagDecl],
}

/// One `key = "value"` tag declaration on a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagDecl {
	pub key: &'static str,
	pub value: &'static str,
}

impl StructDescriptor {
	pub const fn new(name: &'static str, fields: &'static [FieldDescriptor]) -> Self {
		Self { name, fields }
	}
}

impl FieldDescriptor {
	pub const fn new(name: &'static str, tags: &'static [TagDecl]) -> Self {
		Self { name, tags }
	}

	/// Value declared for `key`, if any.
	pub fn tag(&self, key: &str) -> Option<&'static str> {
		self.tags.iter().find(|decl| decl.key == key).map(|decl| decl.value)
	}
}

impl TagDecl {
	pub const fn new(key: &'static str, value: &'static str) -> Self {
		Self { key, value }
	}
}
