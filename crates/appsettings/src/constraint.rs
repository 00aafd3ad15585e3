//! Type constraints
//!
//! A constraint runs after the base resolution and either coerces the value
//! to a declared type and checks it, or resolves a class path to a class
//! handle.

use std::sync::Arc;

use crate::class_path::ClassRegistry;
use crate::prelude::*;

/// Target type of a typed setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
	Bool,
	Int,
	Float,
	String,
	/// Lists, maps and strings
	Iterable,
}

impl ValueType {
	/// Get the type name for error messages
	pub fn name(self) -> &'static str {
		match self {
			ValueType::Bool => "bool",
			ValueType::Int => "int",
			ValueType::Float => "float",
			ValueType::String => "str",
			ValueType::Iterable => "iterable",
		}
	}

	/// Check if `value` is an instance of this type
	pub fn matches(self, value: &Value) -> bool {
		matches!(
			(self, value),
			(ValueType::Bool, Value::Bool(_))
				| (ValueType::Int, Value::Int(_))
				| (ValueType::Float, Value::Float(_))
				| (ValueType::String, Value::String(_))
				| (ValueType::Iterable, Value::List(_) | Value::Map(_) | Value::String(_))
		)
	}

	/// Coerce `value` to this type, `None` if it cannot be converted
	#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
	pub fn cast(self, value: Value) -> Option<Value> {
		match (self, value) {
			(ValueType::Bool, Value::Bool(b)) => Some(Value::Bool(b)),
			(ValueType::Bool, Value::Int(i)) => Some(Value::Bool(i != 0)),
			(ValueType::Bool, Value::String(s)) => parse_bool(&s).map(Value::Bool),

			(ValueType::Int, Value::Int(i)) => Some(Value::Int(i)),
			(ValueType::Int, Value::Bool(b)) => Some(Value::Int(i64::from(b))),
			(ValueType::Int, Value::Float(f)) => {
				let f = f.trunc();
				// i64::MAX rounds up to 2^63 as f64
				(f.is_finite() && f >= i64::MIN as f64 && f < i64::MAX as f64)
					.then(|| Value::Int(f as i64))
			}
			(ValueType::Int, Value::String(s)) => s.trim().parse::<i64>().ok().map(Value::Int),

			(ValueType::Float, Value::Float(f)) => Some(Value::Float(f)),
			(ValueType::Float, Value::Int(i)) => Some(Value::Float(i as f64)),
			(ValueType::Float, Value::Bool(b)) => Some(Value::Float(f64::from(u8::from(b)))),
			(ValueType::Float, Value::String(s)) => s.trim().parse::<f64>().ok().map(Value::Float),

			(ValueType::String, Value::String(s)) => Some(Value::String(s)),
			(ValueType::String, Value::Bool(b)) => Some(Value::String(b.to_string())),
			(ValueType::String, Value::Int(i)) => Some(Value::String(i.to_string())),
			(ValueType::String, Value::Float(f)) => Some(Value::String(f.to_string())),
			(ValueType::String, Value::Class(class)) => Some(Value::String(class.path().to_string())),

			(ValueType::Iterable, value) if self.matches(&value) => Some(value),
			_ => None,
		}
	}
}

fn parse_bool(s: &str) -> Option<bool> {
	match s.trim().to_ascii_lowercase().as_str() {
		"true" | "yes" | "on" | "1" => Some(true),
		"false" | "no" | "off" | "0" => Some(false),
		_ => None,
	}
}

/// Check applied to a resolved value
#[derive(Debug, Clone)]
pub enum Constraint {
	/// Optionally coerce, then require the target type
	Typed { ty: ValueType, cast: bool },
	/// Require a class handle; strings are looked up as dotted paths
	ClassPath(Arc<ClassRegistry>),
}

impl Constraint {
	pub fn typed(ty: ValueType, cast: bool) -> Self {
		Constraint::Typed { ty, cast }
	}

	pub fn apply(&self, setting: &str, value: Value) -> SettingsResult<Value> {
		match self {
			Constraint::Typed { ty, cast } => {
				let value = if *cast {
					ty.cast(value).ok_or_else(|| Error::CastFailed {
						setting: setting.to_string(),
						target: ty.name(),
					})?
				} else {
					value
				};
				if !ty.matches(&value) {
					return Err(Error::TypeMismatch { setting: setting.to_string(), target: ty.name() });
				}
				Ok(value)
			}
			Constraint::ClassPath(registry) => registry.resolve(setting, value).map(Value::Class),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_int_cast() {
		let int = Constraint::typed(ValueType::Int, true);
		assert_eq!(int.apply("SETTING", Value::from("5")).unwrap(), Value::Int(5));
		assert_eq!(int.apply("SETTING", Value::from(" 42 ")).unwrap(), Value::Int(42));
		assert_eq!(int.apply("SETTING", Value::Float(3.9)).unwrap(), Value::Int(3));
		assert_eq!(int.apply("SETTING", Value::Int(1)).unwrap(), Value::Int(1));

		let err = int.apply("SETTING", Value::from("abc")).unwrap_err();
		assert_eq!(err.to_string(), "The value for setting SETTING cannot be casted to type int");
		assert!(int.apply("SETTING", Value::Float(f64::INFINITY)).is_err());
	}

	#[test]
	fn test_no_cast_type_mismatch() {
		let int = Constraint::typed(ValueType::Int, false);
		let err = int.apply("SETTING", Value::from("val")).unwrap_err();
		assert_eq!(err.to_string(), "The value for setting SETTING is not of type int");
		assert_eq!(int.apply("SETTING", Value::Int(1)).unwrap(), Value::Int(1));
	}

	#[test]
	fn test_float_cast() {
		let float = Constraint::typed(ValueType::Float, true);
		assert_eq!(float.apply("SETTING", Value::from("2.5")).unwrap(), Value::Float(2.5));
		assert_eq!(float.apply("SETTING", Value::Int(2)).unwrap(), Value::Float(2.0));
		assert!(matches!(
			float.apply("SETTING", Value::Null),
			Err(Error::CastFailed { target: "float", .. })
		));
	}

	#[test]
	fn test_bool_cast() {
		let flag = Constraint::typed(ValueType::Bool, true);
		assert_eq!(flag.apply("DEBUG", Value::from("Yes")).unwrap(), Value::Bool(true));
		assert_eq!(flag.apply("DEBUG", Value::from("0")).unwrap(), Value::Bool(false));
		assert!(flag.apply("DEBUG", Value::from("maybe")).is_err());
	}

	#[test]
	fn test_string_and_iterable_do_not_cast() {
		let string = Constraint::typed(ValueType::String, false);
		assert!(string.apply("NAME", Value::from("x")).is_ok());
		assert!(matches!(
			string.apply("NAME", Value::Int(1)),
			Err(Error::TypeMismatch { target: "str", .. })
		));

		let iterable = Constraint::typed(ValueType::Iterable, false);
		assert!(iterable.apply("HOSTS", Value::List(vec![])).is_ok());
		assert!(iterable.apply("HOSTS", Value::from("abc")).is_ok());
		assert!(iterable.apply("HOSTS", Value::Int(1)).is_err());
	}

	#[test]
	fn test_class_path() {
		struct Backend;
		let mut registry = ClassRegistry::new();
		registry.register::<Backend>("pkg.module.Backend");
		let class = Constraint::ClassPath(Arc::new(registry));

		let value = class.apply("BACKEND", Value::from("pkg.module.Backend")).unwrap();
		assert!(value.as_class().unwrap().is::<Backend>());
		assert!(class.apply("BACKEND", Value::from("pkg.module.Missing")).is_err());
	}
}

// vim: ts=4
