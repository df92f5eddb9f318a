use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use pretty_assertions::assert_eq;

use super::{TransformerBuilder, is_restricted};
use crate::{BoxError, FieldLevel, RegistrationError, StructLevel, TypeKey};

fn noop(_: &mut FieldLevel<'_>) -> Result<(), BoxError> {
	Ok(())
}

fn noop_struct(_: &mut StructLevel<'_>) -> Result<(), BoxError> {
	Ok(())
}

#[test]
fn empty_name_is_rejected() {
	let err = TransformerBuilder::new().register("", noop).unwrap_err();
	assert_eq!(err, RegistrationError::EmptyName);
}

#[test]
fn reserved_names_are_rejected() {
	for name in ["dive", "-", "keys", "endkeys"] {
		let err = TransformerBuilder::new().register(name, noop).unwrap_err();
		assert_eq!(err, RegistrationError::RestrictedName(name.to_owned()));
	}
}

#[test]
fn restricted_characters_are_rejected() {
	let err = TransformerBuilder::new().register(",", noop).unwrap_err();
	assert_eq!(
		err.to_string(),
		"tag ',' either contains restricted characters or is the same as a restricted tag needed for normal operation"
	);
	for name in ["a.b", "x|y", "q=1", "w{", "\"quoted\""] {
		assert!(is_restricted(name), "{name} should be restricted");
	}
	assert!(!is_restricted("snake_case"));
	assert!(!is_restricted("strip-num"));
}

#[test]
fn alias_validation() {
	let mut builder = TransformerBuilder::new();
	assert_eq!(
		builder.register_alias("", "trim").unwrap_err(),
		RegistrationError::EmptyAlias
	);
	assert_eq!(
		builder.register_alias("clean", "").unwrap_err(),
		RegistrationError::EmptyExpansion
	);
	assert_eq!(
		builder.register_alias("dive", "trim").unwrap_err(),
		RegistrationError::RestrictedAlias("dive".to_owned())
	);
	builder.register_alias("clean", "trim").expect("valid alias");
	assert_eq!(builder.build().registry().alias("clean"), Some("trim"));
}

#[test]
fn struct_level_requires_types() {
	let err = TransformerBuilder::new()
		.register_struct_level(noop_struct, &[])
		.unwrap_err();
	assert_eq!(err, RegistrationError::NoTypes);

	let err = TransformerBuilder::new()
		.register_interceptor_for(|value| value, &[])
		.unwrap_err();
	assert_eq!(err, RegistrationError::NoTypes);
}

#[test]
fn struct_level_registers_every_type() {
	let mut builder = TransformerBuilder::new();
	builder
		.register_struct_level(noop_struct, &[TypeKey::of::<u8>(), TypeKey::of::<String>()])
		.expect("valid registration");
	let transformer = builder.build();
	let registry = transformer.registry();
	assert!(registry.struct_level(TypeKey::of::<u8>().id()).is_some());
	assert!(registry.struct_level(TypeKey::of::<String>().id()).is_some());
	assert!(registry.struct_level(TypeKey::of::<u16>().id()).is_none());
}

#[test]
fn re_registration_replaces_callback() {
	let first = Arc::new(AtomicUsize::new(0));
	let second = Arc::new(AtomicUsize::new(0));
	let mut builder = TransformerBuilder::new();
	let counter = Arc::clone(&first);
	builder
		.register("count", move |_| {
			counter.fetch_add(1, Ordering::SeqCst);
			Ok(())
		})
		.expect("valid name");
	let counter = Arc::clone(&second);
	builder
		.register("count", move |_| {
			counter.fetch_add(1, Ordering::SeqCst);
			Ok(())
		})
		.expect("valid name");

	let transformer = builder.build();
	let mut value = String::new();
	transformer
		.transform_field(&Default::default(), &mut value, "count")
		.expect("callback succeeds");
	assert_eq!(first.load(Ordering::SeqCst), 0);
	assert_eq!(second.load(Ordering::SeqCst), 1);
}

#[test]
fn built_transformer_is_isolated_from_builder() {
	let mut builder = TransformerBuilder::new();
	let before = builder.build();
	builder.register("late", noop).expect("valid name");
	assert!(before.registry().callback("late").is_none());
	assert!(builder.build().registry().callback("late").is_some());
}

#[test]
fn tag_name_defaults_to_mold() {
	assert_eq!(TransformerBuilder::new().build().tag_name(), "mold");
	assert_eq!(TransformerBuilder::new().tag_name("mod").build().tag_name(), "mod");
}
