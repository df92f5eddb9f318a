//! Behaviour of the bundled modifiers.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use pretty_assertions::assert_eq;
use remold::{CancellationToken, Dynamic, Reflect, Transformer};
use rstest::rstest;

fn transformer() -> Transformer {
	remold_modifiers::new().expect("modifiers register")
}

fn apply<T: Reflect>(value: &mut T, tags: &str) -> Result<(), remold::Error> {
	transformer().transform_field(&CancellationToken::new(), value, tags)
}

fn apply_str(input: &str, tags: &str) -> String {
	let mut value = input.to_owned();
	apply(&mut value, tags).expect("modifier succeeds");
	value
}

#[rstest]
#[case::trim("  padded \t", "trim", "padded")]
#[case::ltrim("xxhixx", "ltrim=x", "hixx")]
#[case::rtrim("xxhixx", "rtrim=x", "xxhi")]
#[case::ltrim_without_cutset("  hi", "ltrim", "  hi")]
#[case::tprefix("prefix-value", "tprefix=prefix-", "value")]
#[case::tprefix_missing("value", "tprefix=nope", "value")]
#[case::tsuffix("report.txt", "tsuffix=.txt", "report")]
#[case::lcase("MiXeD", "lcase", "mixed")]
#[case::ucase("MiXeD", "ucase", "MIXED")]
#[case::ucfirst("all lower", "ucfirst", "All lower")]
#[case::ucfirst_upper("Already", "ucfirst", "Already")]
#[case::ucfirst_empty("", "ucfirst", "")]
#[case::snake("SnakeCaseValue", "snake", "snake_case_value")]
#[case::camel("camel case here", "camel", "camelCaseHere")]
#[case::title("this is a sentence", "title", "This Is A Sentence")]
#[case::title_keeps_rest("mIxEd case", "title", "MIxEd Case")]
#[case::name_symbols("3493€848Jo-$%£@Ann ", "name", "Jo-Ann")]
#[case::name_tildes(" ~~ The Dude ~~", "name", "The Dude")]
#[case::name_stars("**susan**", "name", "Susan")]
#[case::name_hyphenated(" hugh fearnley-whittingstall", "name", "Hugh Fearnley-Whittingstall")]
#[case::name_spaced_hyphen("mary  -  kate", "name", "Mary-Kate")]
#[case::name_nothing("1234", "name", "")]
#[case::slug("Hello, World!", "slug", "hello-world")]
#[case::strip_alpha("the price is €30,38", "strip_alpha", "3038")]
#[case::strip_num("39472349D34a34v69e8932747", "strip_num", "Dave")]
#[case::strip_num_unicode("!@£$%^&'()Hello 1234567890 World+[];\\", "strip_num_unicode", "HelloWorld")]
#[case::strip_alpha_unicode("Everything's here but the letters!", "strip_alpha_unicode", "'    !")]
#[case::strip_punctuation("# M5W-1E6!!!", "strip_punctuation", " M5W1E6")]
#[case::substr("abcdef", "substr=1-3", "bc")]
#[case::substr_open_end("abcdef", "substr=2", "cdef")]
#[case::substr_clamped_end("abcdef", "substr=2-100", "cdef")]
#[case::substr_past_end("abc", "substr=5-9", "")]
#[case::substr_inverted("abcdef", "substr=4-2", "")]
#[case::substr_no_param("abc", "substr", "abc")]
#[case::substr_chars("héllo", "substr=1-3", "él")]
#[case::chained("  Hello World  ", "trim,lcase,snake", "hello_world")]
fn string_modifiers(#[case] input: &str, #[case] tags: &str, #[case] expected: &str) {
	assert_eq!(apply_str(input, tags), expected);
}

#[rstest]
#[case::start("substr=x-2")]
#[case::end("substr=1-y")]
fn substr_rejects_bad_bounds(#[case] tags: &str) {
	let mut value = "abcdef".to_owned();
	let err = apply(&mut value, tags).unwrap_err();
	assert!(matches!(err, remold::Error::Callback(_)), "{err:?}");
	assert_eq!(value, "abcdef");
}

#[test]
fn string_modifiers_ignore_other_types() {
	let mut number = 42_i32;
	apply(&mut number, "trim,ucase,name,substr=0-1").expect("no-op");
	assert_eq!(number, 42);

	let mut nil = Dynamic::nil();
	apply(&mut nil, "trim").expect("no-op");
	assert!(nil.is_nil());
}

#[test]
fn substr_leaves_other_types_alone_whatever_the_bounds() {
	let mut number = 42_i32;
	apply(&mut number, "substr=x-y").expect("no-op");
	assert_eq!(number, 42);
}

#[test]
fn string_modifiers_reach_through_options() {
	let mut value = Some("  x  ".to_owned());
	apply(&mut value, "trim,ucase").expect("transforms");
	assert_eq!(value.as_deref(), Some("X"));

	let mut nil: Option<String> = None;
	apply(&mut nil, "trim").expect("no-op");
	assert_eq!(nil, None);
}

#[rstest]
#[case::negative(-3_i64, "set=-12", -12)]
#[case::zero(5_i64, "set=0", 0)]
fn set_parses_signed_integers(#[case] start: i64, #[case] tags: &str, #[case] expected: i64) {
	let mut value = start;
	apply(&mut value, tags).expect("sets");
	assert_eq!(value, expected);
}

#[test]
fn set_parses_scalars() {
	let mut text = "old".to_owned();
	apply(&mut text, "set=new").expect("sets");
	assert_eq!(text, "new");

	let mut count = 0_u16;
	apply(&mut count, "set=65535").expect("sets");
	assert_eq!(count, u16::MAX);

	let mut ratio = 0.0_f64;
	apply(&mut ratio, "set=2.5").expect("sets");
	assert_eq!(ratio, 2.5);

	let mut flag = false;
	apply(&mut flag, "set=T").expect("sets");
	assert!(flag);
	apply(&mut flag, "set=0").expect("sets");
	assert!(!flag);
}

#[rstest]
#[case::overflow("set=300")]
#[case::not_a_number("set=lots")]
#[case::empty("set")]
fn set_rejects_unparsable_numbers(#[case] tags: &str) {
	let mut value = 7_u8;
	let err = apply(&mut value, tags).unwrap_err();
	assert!(matches!(err, remold::Error::Callback(_)), "{err:?}");
	assert_eq!(value, 7);
}

#[test]
fn set_rejects_unknown_booleans() {
	let mut flag = false;
	let err = apply(&mut flag, "set=yes").unwrap_err();
	assert_eq!(err.to_string(), "invalid boolean 'yes'");
}

#[test]
fn set_allocates_nil_options() {
	let mut value: Option<u32> = None;
	apply(&mut value, "set=9").expect("sets");
	assert_eq!(value, Some(9));

	let mut boxed: Option<Box<String>> = Some(Box::new("old".into()));
	apply(&mut boxed, "set=new").expect("sets");
	assert_eq!(boxed.as_deref().map(String::as_str), Some("new"));
}

#[test]
fn set_resets_collections() {
	let mut list = vec![1, 2, 3];
	apply(&mut list, "set=10").expect("resets");
	assert!(list.is_empty());
	assert!(list.capacity() >= 10);

	let mut map: HashMap<String, u8> = HashMap::from([("a".to_owned(), 1)]);
	apply(&mut map, "set").expect("resets");
	assert!(map.is_empty());

	let err = apply(&mut list, "set=many").unwrap_err();
	assert!(matches!(err, remold::Error::Callback(_)));
}

#[test]
fn set_parses_timestamps() {
	let mut at = DateTime::<Utc>::default();
	apply(&mut at, "set=2024-05-01T12:30:00+02:00").expect("sets");
	assert_eq!(at, Utc.with_ymd_and_hms(2024, 5, 1, 10, 30, 0).unwrap());

	let before = Utc::now();
	apply(&mut at, "set=utc").expect("sets");
	assert!(at >= before);

	let err = apply(&mut at, "set=yesterday").unwrap_err();
	assert!(matches!(err, remold::Error::Callback(_)));
}

#[test]
fn set_parses_durations() {
	let mut timeout = Duration::from_secs(30);
	apply(&mut timeout, "set=2m").expect("sets");
	assert_eq!(timeout, Duration::from_secs(120));

	let mut retry = Duration::ZERO;
	apply(&mut retry, "default=1500ms").expect("defaults");
	assert_eq!(retry, Duration::from_millis(1500));
	apply(&mut retry, "default=9s").expect("no-op");
	assert_eq!(retry, Duration::from_millis(1500));

	let mut nil: Option<Duration> = None;
	apply(&mut nil, "set=1h 30m").expect("sets");
	assert_eq!(nil, Some(Duration::from_secs(5400)));

	let err = apply(&mut timeout, "set=soon").unwrap_err();
	assert!(matches!(err, remold::Error::Callback(_)), "{err:?}");
	assert_eq!(timeout, Duration::from_secs(120));
}

#[test]
fn set_allocates_nil_collections() {
	let mut list: Option<Vec<u8>> = None;
	apply(&mut list, "set=4").expect("allocates");
	let list = list.expect("allocated");
	assert!(list.is_empty());
	assert!(list.capacity() >= 4);

	let mut map: Option<HashMap<String, u8>> = None;
	apply(&mut map, "default").expect("allocates");
	assert_eq!(map, Some(HashMap::new()));

	let mut filled: Option<Vec<u8>> = Some(vec![1, 2]);
	apply(&mut filled, "default").expect("no-op");
	assert_eq!(filled, Some(vec![1, 2]));

	let mut untouched: Option<Vec<u8>> = None;
	let err = apply(&mut untouched, "set=many").unwrap_err();
	assert!(matches!(err, remold::Error::Callback(_)), "{err:?}");
	assert_eq!(untouched, None);
}

#[test]
fn default_only_fills_zero_values() {
	let mut empty = String::new();
	apply(&mut empty, "default=guest").expect("defaults");
	assert_eq!(empty, "guest");

	let mut filled = "admin".to_owned();
	apply(&mut filled, "default=guest").expect("no-op");
	assert_eq!(filled, "admin");

	let mut zero = 0_i32;
	apply(&mut zero, "default=5").expect("defaults");
	assert_eq!(zero, 5);

	let mut nil: Option<String> = None;
	apply(&mut nil, "default=x").expect("defaults");
	assert_eq!(nil.as_deref(), Some("x"));

	let mut at = DateTime::<Utc>::default();
	apply(&mut at, "default=utc").expect("defaults");
	assert!(at > DateTime::<Utc>::default());
}

/// A nullable string column: a value plus a validity flag.
#[derive(Debug, Default, PartialEq)]
struct NullString {
	value: String,
	valid: bool,
}

impl Reflect for NullString {
	fn static_kind() -> remold::Kind {
		remold::Kind::Leaf
	}

	fn is_zero(&self) -> bool {
		!self.valid && self.value.is_empty()
	}
}

#[derive(Reflect, Default, Debug, PartialEq)]
struct Signup {
	#[tag(mod = "trim,lcase")]
	email: String,
	#[tag(mod = "name")]
	full_name: String,
	#[tag(mod = "default=reader")]
	role: Option<String>,
	#[tag(mod = "dive,trim")]
	tags: Vec<String>,
	#[tag(mod = "slug")]
	handle: NullString,
	#[tag(mold = "ucase")]
	ignored: String,
}

#[test]
fn struct_tags_use_the_mod_tag_name() {
	let mut builder = Transformer::builder();
	builder.tag_name(remold_modifiers::TAG_NAME);
	remold_modifiers::register(&mut builder).expect("modifiers register");
	builder.register_interceptor::<NullString, _>(|column| {
		column.valid = true;
		&mut column.value
	});
	let transformer = builder.build();

	let mut signup = Signup {
		email: "  Ann@Example.COM ".into(),
		full_name: " ann-marie  o'neil 2".into(),
		role: None,
		tags: vec![" a ".into(), "b  ".into()],
		handle: NullString {
			value: "Ann Marie!".into(),
			valid: false,
		},
		ignored: "keep".into(),
	};
	transformer
		.transform_struct(&CancellationToken::new(), &mut signup)
		.expect("transforms");

	assert_eq!(
		signup,
		Signup {
			email: "ann@example.com".into(),
			full_name: "Ann-Marie O'neil".into(),
			role: Some("reader".into()),
			tags: vec!["a".into(), "b".into()],
			handle: NullString {
				value: "ann-marie".into(),
				valid: true,
			},
			ignored: "keep".into(),
		}
	);
}
