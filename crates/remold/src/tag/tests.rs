use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::{Chain, ParsedTag, TagKind, parse};
use crate::{Error, FieldLevel, Transformer};

fn noop(_: &mut FieldLevel<'_>) -> Result<(), crate::BoxError> {
	Ok(())
}

fn transformer() -> Transformer {
	let mut builder = Transformer::builder();
	builder
		.register("trim", noop)
		.and_then(|b| b.register("lcase", noop))
		.and_then(|b| b.register("ucase", noop))
		.and_then(|b| b.register("default", noop))
		.and_then(|b| b.register_alias("clean", "trim,lcase"))
		.and_then(|b| b.register_alias("deep", "clean,ucase"))
		.and_then(|b| b.register_alias("loop_a", "trim,loop_b"))
		.and_then(|b| b.register_alias("loop_b", "loop_a"))
		.expect("valid registrations");
	builder.build()
}

fn compile(tags: &str) -> Result<Chain, Error> {
	parse::compile(transformer().registry(), "Field", tags)
}

fn names(node: Option<&ParsedTag>) -> Vec<String> {
	std::iter::successors(node, |n| n.next())
		.map(|n| n.name().to_owned())
		.collect()
}

#[test]
fn splits_names_and_params() {
	let chain = compile("trim,default=a=b").expect("compiles");
	let nodes: Vec<_> = chain.iter().collect();
	assert_eq!(nodes.len(), 2);
	assert_eq!(nodes[0].name(), "trim");
	assert_eq!(nodes[0].param(), "");
	assert_eq!(nodes[1].name(), "default");
	assert_eq!(nodes[1].param(), "a=b");
	assert!(nodes.iter().all(|n| n.callback().is_some()));
}

#[test]
fn escaped_separator_becomes_comma() {
	let chain = compile("default=a0x2Cb").expect("compiles");
	assert_eq!(chain.head().map(ParsedTag::param), Some("a,b"));
}

#[test]
fn aliases_expand_recursively() {
	let chain = compile("deep").expect("compiles");
	assert_eq!(names(chain.head()), vec!["trim", "lcase", "ucase"]);
	assert!(chain.iter().all(|n| n.alias() == Some("deep")));
}

#[test]
fn alias_cycle_is_reported() {
	let err = compile("loop_a").unwrap_err();
	assert!(matches!(err, Error::AliasCycle { ref alias } if alias == "loop_a"));
}

#[test]
fn empty_token_is_invalid() {
	let err = compile("trim,,lcase").unwrap_err();
	assert_eq!(err.to_string(), "invalid tag '' found on field Field");
}

#[test]
fn unknown_name_is_undefined() {
	let err = compile("trim,bogus").unwrap_err();
	assert_eq!(err.to_string(), "undefined tag 'bogus' found on field Field");
}

#[test]
fn control_words_take_no_params() {
	assert!(matches!(compile("dive=1"), Err(Error::InvalidTag { .. })));
	assert!(matches!(compile("=x"), Err(Error::InvalidTag { .. })));
}

#[test]
fn keys_scope_splits_key_and_value_chains() {
	let chain = compile("dive,keys,trim,lcase,endkeys,ucase").expect("compiles");
	let dive = chain.head().expect("dive node");
	assert_eq!(dive.kind(), TagKind::Dive);

	let keys = dive.next().expect("keys node");
	assert_eq!(keys.kind(), TagKind::Keys);
	assert_eq!(names(keys.keys()), vec!["trim", "lcase"]);
	assert_eq!(names(keys.next()), vec!["ucase"]);
}

#[test]
fn open_keys_scope_runs_to_end() {
	let chain = compile("dive,keys,trim").expect("compiles");
	let keys = chain.head().and_then(ParsedTag::next).expect("keys node");
	assert_eq!(names(keys.keys()), vec!["trim"]);
	assert!(keys.next().is_none());
}

#[test]
fn keys_must_follow_dive() {
	assert!(matches!(compile("keys,trim,endkeys"), Err(Error::InvalidKeys)));
	assert!(matches!(compile("dive,trim,keys,lcase,endkeys"), Err(Error::InvalidKeys)));
}

#[test]
fn endkeys_without_keys_is_undefined() {
	assert!(matches!(compile("trim,endkeys"), Err(Error::UndefinedKeys)));
	assert!(matches!(compile("dive,keys,trim,endkeys,endkeys"), Err(Error::UndefinedKeys)));
}

#[test]
fn nested_dives_chain_through_next() {
	let chain = compile("trim,dive,dive,lcase").expect("compiles");
	let kinds: Vec<_> = chain.iter().map(ParsedTag::kind).collect();
	assert_eq!(
		kinds,
		vec![TagKind::Default, TagKind::Dive, TagKind::Dive, TagKind::Default]
	);
}

proptest! {
	#[test]
	fn prop_registered_lists_compile_in_order(picks in proptest::collection::vec(0usize..3, 1..12)) {
		let vocabulary = ["trim", "lcase", "ucase"];
		let tags: Vec<&str> = picks.iter().map(|&i| vocabulary[i]).collect();
		let chain = compile(&tags.join(",")).expect("registered names compile");
		prop_assert_eq!(names(chain.head()), tags);
	}

	#[test]
	fn prop_unregistered_suffixes_never_compile(suffix in "[.|+()~!@#$%^&*/?<>{}]") {
		let tags = format!("trim{suffix}");
		prop_assert!(compile(&tags).is_err());
	}

	#[test]
	fn prop_trailing_separator_is_invalid(count in 1usize..5) {
		let tags = "trim,".repeat(count);
		let err = compile(&tags).unwrap_err();
		let is_invalid = matches!(err, Error::InvalidTag { .. });
		prop_assert!(is_invalid);
	}
}
