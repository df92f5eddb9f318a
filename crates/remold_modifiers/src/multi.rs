//! `set` and `default`: write a value parsed from the tag parameter.
//!
//! Scalars are parsed into the field's own type, and a nil `Option` of a supported scalar is
//! allocated first. Sequences and maps, including ones behind a nil `Option`, are reset to
//! empty with the parameter as an optional capacity. Anything else is left untouched.

use std::time::Duration;

use chrono::{DateTime, Utc};
use remold::{BoxError, FieldLevel, Kind, Reflect, ShapeMut};

/// A leaf type that can be parsed from a tag parameter.
trait FromParam: Reflect + Sized {
	fn from_param(param: &str) -> Result<Self, BoxError>;
}

macro_rules! from_str_param {
	($($ty:ty),* $(,)?) => {
		$(
			impl FromParam for $ty {
				fn from_param(param: &str) -> Result<Self, BoxError> {
					Ok(param.parse::<$ty>()?)
				}
			}
		)*
	};
}

from_str_param!(
	String, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);

impl FromParam for bool {
	fn from_param(param: &str) -> Result<Self, BoxError> {
		match param {
			"1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
			"0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
			other => Err(format!("invalid boolean '{other}'").into()),
		}
	}
}

/// `utc` or an empty parameter means now; anything else must be RFC 3339.
impl FromParam for DateTime<Utc> {
	fn from_param(param: &str) -> Result<Self, BoxError> {
		if param.is_empty() || param.eq_ignore_ascii_case("utc") {
			return Ok(Utc::now());
		}
		Ok(DateTime::parse_from_rfc3339(param)?.with_timezone(&Utc))
	}
}

/// Human-readable spans such as `1500ms` or `1h 30m`.
impl FromParam for Duration {
	fn from_param(param: &str) -> Result<Self, BoxError> {
		Ok(humantime::parse_duration(param)?)
	}
}

type Setter = fn(&mut FieldLevel<'_>, &str) -> Option<Result<(), BoxError>>;

const SETTERS: &[Setter] = &[
	set_as::<String>,
	set_as::<bool>,
	set_as::<i8>,
	set_as::<i16>,
	set_as::<i32>,
	set_as::<i64>,
	set_as::<i128>,
	set_as::<isize>,
	set_as::<u8>,
	set_as::<u16>,
	set_as::<u32>,
	set_as::<u64>,
	set_as::<u128>,
	set_as::<usize>,
	set_as::<f32>,
	set_as::<f64>,
	set_as::<Duration>,
	set_as::<DateTime<Utc>>,
];

/// Writes `T` parsed from `param` when the field is a `T` or a nil `Option<T>`.
fn set_as<T: FromParam>(fl: &mut FieldLevel<'_>, param: &str) -> Option<Result<(), BoxError>> {
	let field = fl.field();
	if !(field.is::<T>() || field.is::<Option<T>>()) {
		return None;
	}
	Some(T::from_param(param).and_then(|value| fl.set(value).map_err(Into::into)))
}

fn parse_capacity(param: &str) -> Result<usize, BoxError> {
	if param.is_empty() {
		return Ok(0);
	}
	Ok(param.parse()?)
}

pub(crate) fn set_value(fl: &mut FieldLevel<'_>) -> Result<(), BoxError> {
	let param = fl.param();
	for setter in SETTERS {
		if let Some(outcome) = setter(fl, param) {
			return outcome;
		}
	}

	let field = fl.field();
	let container = match field.kind() {
		Kind::Seq | Kind::Map => true,
		Kind::Pointer => matches!(field.pointee_kind(), Some(Kind::Seq | Kind::Map)),
		_ => false,
	};
	if !container {
		tracing::trace!(param, "set ignored unsupported field type");
		return Ok(());
	}

	let capacity = parse_capacity(param)?;
	fl.field().allocate();
	match fl.field().shape_mut() {
		ShapeMut::Seq(seq) => seq.reset(capacity),
		ShapeMut::Map(map) => map.reset(capacity),
		ShapeMut::Leaf | ShapeMut::Struct(_) => {}
	}
	Ok(())
}

/// Like `set`, but only when the field holds its zero value.
pub(crate) fn default_value(fl: &mut FieldLevel<'_>) -> Result<(), BoxError> {
	if !fl.is_zero() {
		return Ok(());
	}
	set_value(fl)
}
