//! String modifiers. Each one rewrites `String` fields and ignores every other type.

use std::sync::LazyLock;

use heck::{ToLowerCamelCase, ToSnakeCase};
use regex::Regex;
use remold::{BoxError, FieldLevel};

type Pattern = LazyLock<Result<Regex, regex::Error>>;

static NAME: Pattern = LazyLock::new(|| Regex::new(r"\pL(?:[\pL\s\-']*\pL)*"));
static NON_DIGIT: Pattern = LazyLock::new(|| Regex::new("[^0-9]"));
static DIGIT: Pattern = LazyLock::new(|| Regex::new("[0-9]"));
static LETTER: Pattern = LazyLock::new(|| Regex::new(r"\pL"));
static NON_LETTER: Pattern = LazyLock::new(|| Regex::new(r"[^\pL]"));
static PUNCTUATION: Pattern = LazyLock::new(|| Regex::new("[[:punct:]]"));

/// Clean-up passes applied in order before a personal name is extracted.
static NAME_PASSES: LazyLock<Result<Vec<(Regex, &'static str)>, regex::Error>> =
	LazyLock::new(|| {
		[
			(r"[^\pL\-\s']", ""),
			(r"\s{2,}", " "),
			("-{2,}", "-"),
			("'{2,}", "'"),
			("( )*-( )*", "-"),
		]
		.into_iter()
		.map(|(pattern, replacement)| Regex::new(pattern).map(|re| (re, replacement)))
		.collect()
	});

fn compiled(pattern: &'static Pattern) -> Result<&'static Regex, BoxError> {
	pattern.as_ref().map_err(|err| err.clone().into())
}

/// Rewrites the field with `f` when it is a string.
fn map_string(fl: &mut FieldLevel<'_>, f: impl FnOnce(&str) -> String) -> Result<(), BoxError> {
	if let Some(s) = fl.field_as::<String>() {
		*s = f(s);
	}
	Ok(())
}

fn strip_matches(fl: &mut FieldLevel<'_>, pattern: &'static Pattern) -> Result<(), BoxError> {
	let re = compiled(pattern)?;
	map_string(fl, |s| re.replace_all(s, "").into_owned())
}

pub(crate) fn trim_space(fl: &mut FieldLevel<'_>) -> Result<(), BoxError> {
	map_string(fl, |s| s.trim().to_owned())
}

/// Trims leading characters contained in the parameter.
pub(crate) fn trim_left(fl: &mut FieldLevel<'_>) -> Result<(), BoxError> {
	let cutset = fl.param();
	map_string(fl, |s| s.trim_start_matches(|c: char| cutset.contains(c)).to_owned())
}

pub(crate) fn trim_right(fl: &mut FieldLevel<'_>) -> Result<(), BoxError> {
	let cutset = fl.param();
	map_string(fl, |s| s.trim_end_matches(|c: char| cutset.contains(c)).to_owned())
}

pub(crate) fn trim_prefix(fl: &mut FieldLevel<'_>) -> Result<(), BoxError> {
	let prefix = fl.param();
	map_string(fl, |s| s.strip_prefix(prefix).unwrap_or(s).to_owned())
}

pub(crate) fn trim_suffix(fl: &mut FieldLevel<'_>) -> Result<(), BoxError> {
	let suffix = fl.param();
	map_string(fl, |s| s.strip_suffix(suffix).unwrap_or(s).to_owned())
}

pub(crate) fn to_lower(fl: &mut FieldLevel<'_>) -> Result<(), BoxError> {
	map_string(fl, str::to_lowercase)
}

pub(crate) fn to_upper(fl: &mut FieldLevel<'_>) -> Result<(), BoxError> {
	map_string(fl, str::to_uppercase)
}

/// Uppercases the first character when it is lowercase: `"all lower"` becomes `"All lower"`.
pub(crate) fn uppercase_first(fl: &mut FieldLevel<'_>) -> Result<(), BoxError> {
	map_string(fl, |s| {
		let mut chars = s.chars();
		match chars.next() {
			Some(first) if first.is_lowercase() => first.to_uppercase().chain(chars).collect(),
			_ => s.to_owned(),
		}
	})
}

pub(crate) fn snake_case(fl: &mut FieldLevel<'_>) -> Result<(), BoxError> {
	map_string(fl, |s| s.to_snake_case())
}

pub(crate) fn camel_case(fl: &mut FieldLevel<'_>) -> Result<(), BoxError> {
	map_string(fl, |s| s.to_lower_camel_case())
}

pub(crate) fn title_case(fl: &mut FieldLevel<'_>) -> Result<(), BoxError> {
	map_string(fl, title)
}

/// Reduces a string to a personal name: `"3493€848Jo-$%£@Ann "` becomes `"Jo-Ann"`.
pub(crate) fn name_case(fl: &mut FieldLevel<'_>) -> Result<(), BoxError> {
	let passes = NAME_PASSES.as_ref().map_err(|err| err.clone())?;
	let name = compiled(&NAME)?;
	map_string(fl, |s| {
		let cleaned = passes
			.iter()
			.fold(s.to_lowercase(), |acc, (re, replacement)| {
				re.replace_all(&acc, *replacement).into_owned()
			});
		name.find(&cleaned).map(|m| title(m.as_str())).unwrap_or_default()
	})
}

pub(crate) fn slug_case(fl: &mut FieldLevel<'_>) -> Result<(), BoxError> {
	map_string(fl, slugify)
}

/// Keeps only ASCII digits: `"the price is €30,38"` becomes `"3038"`.
pub(crate) fn strip_alpha(fl: &mut FieldLevel<'_>) -> Result<(), BoxError> {
	strip_matches(fl, &NON_DIGIT)
}

pub(crate) fn strip_num(fl: &mut FieldLevel<'_>) -> Result<(), BoxError> {
	strip_matches(fl, &DIGIT)
}

/// Keeps only Unicode letters.
pub(crate) fn strip_num_unicode(fl: &mut FieldLevel<'_>) -> Result<(), BoxError> {
	strip_matches(fl, &NON_LETTER)
}

/// Removes Unicode letters.
pub(crate) fn strip_alpha_unicode(fl: &mut FieldLevel<'_>) -> Result<(), BoxError> {
	strip_matches(fl, &LETTER)
}

pub(crate) fn strip_punctuation(fl: &mut FieldLevel<'_>) -> Result<(), BoxError> {
	strip_matches(fl, &PUNCTUATION)
}

/// Keeps characters `start..end` for a `start-end` parameter.
///
/// A missing end means the end of the string and is clamped to its length; a start past the
/// end yields an empty string. An empty parameter leaves the value alone.
pub(crate) fn substr(fl: &mut FieldLevel<'_>) -> Result<(), BoxError> {
	let param = fl.param();
	let Some(s) = fl.field_as::<String>() else {
		return Ok(());
	};
	let (start, end) = match param.split_once('-') {
		Some((start, end)) => (start, Some(end)),
		None => (param, None),
	};
	if start.is_empty() {
		return Ok(());
	}
	let start: usize = start.parse()?;
	let end: Option<usize> = end.map(str::parse).transpose()?;

	let len = s.chars().count();
	let end = end.map_or(len, |end| end.min(len));
	*s = if start > end {
		String::new()
	} else {
		s.chars().skip(start).take(end - start).collect()
	};
	Ok(())
}

/// Uppercases the first letter of every word, leaving the rest as is.
fn title(s: &str) -> String {
	let mut out = String::with_capacity(s.len());
	let mut word_start = true;
	for c in s.chars() {
		if word_start && c.is_alphanumeric() {
			out.extend(c.to_uppercase());
		} else {
			out.push(c);
		}
		word_start = !(c.is_alphanumeric() || c == '\'');
	}
	out
}

fn slugify(s: &str) -> String {
	let mut out = String::with_capacity(s.len());
	for c in s.chars().flat_map(char::to_lowercase) {
		if c.is_alphanumeric() || c == '_' {
			out.push(c);
		} else if !out.is_empty() && !out.ends_with('-') {
			out.push('-');
		}
	}
	let len = out.trim_end_matches('-').len();
	out.truncate(len);
	out
}
