//! Tag-driven, in-place value transformation.
//!
//! A [`Transformer`] walks a value's shape (structs, sequences, maps, pointers and
//! [`Dynamic`] handles) and invokes registered callbacks on the leaves named by a compact
//! tag language:
//!
//! ```text
//! tags    = token ("," token)*
//! token   = "dive" | "keys" | "endkeys" | name ("=" param)?
//! ```
//!
//! Struct fields declare their tags through [`StructDescriptor`]s, usually generated by
//! `#[derive(Reflect)]`; ad-hoc values are transformed with [`Transformer::transform_field`].
//!
//! # Mental Model
//!
//! 1. **Setup:** a [`TransformerBuilder`] collects callbacks, aliases, struct-level callbacks
//!    and interceptors, validating names as they are registered.
//! 2. **Compilation:** tag strings compile into immutable [`ParsedTag`] chains; struct types
//!    compile into [`StructSpec`]s. Both are published into per-engine snapshot caches.
//! 3. **Traversal:** the engine applies a chain to a value, diving into containers as the
//!    chain instructs and descending into nested structs once a chain is exhausted.
//!
//! # Concurrency
//!
//! A built [`Transformer`] is immutable apart from its caches, whose reads never block. It is
//! `Send + Sync` and may be shared freely; each traversal only touches the value it is given.
//!
//! ```ignore
//! #[derive(Reflect, Default)]
//! struct User {
//!     #[tag(mold = "trim,lcase")]
//!     email: String,
//! }
//!
//! let mut builder = Transformer::builder();
//! builder.register("trim", trim)?.register("lcase", lcase)?;
//! let transformer = builder.build();
//! transformer.transform_struct(&CancellationToken::new(), &mut user)?;
//! ```

extern crate self as remold;

pub mod cache;
pub mod context;
pub mod engine;
pub mod error;
pub mod reflect;
pub mod registry;
pub mod tag;

pub use context::{FieldLevel, StructLevel};
pub use engine::{FieldSpec, StructSpec, Transformer};
pub use error::{BoxError, Error, RegistrationError};
pub use reflect::{
	AsReflect, Dynamic, FieldDescriptor, Kind, MapAccess, Reflect, SeqAccess, ShapeMut,
	StructAccess, StructDescriptor, TagDecl, TypeKey,
};
pub use registry::{FieldFn, InterceptFn, StructFn, TransformerBuilder};
pub use remold_macros::Reflect;
pub use tag::{Chain, ParsedTag, TagKind};
pub use tokio_util::sync::CancellationToken;
