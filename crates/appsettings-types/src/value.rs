//! Dynamic setting values
//!
//! Settings hold arbitrary host values: scalars, collections, class handles,
//! and zero-argument callables. `NOT_SET` (an absent `Option<Value>`) marks
//! "no default" and "no override found"; it is distinct from `Value::Null`.

use std::any::{Any, TypeId};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Marker for "no value": no default declared, or no override found.
pub const NOT_SET: Option<Value> = None;

/// Zero-argument function producing a value
pub type CallableFn = dyn Fn() -> Value + Send + Sync;

/// Factory building an instance of a registered class
pub type ClassFactory = dyn Fn() -> Box<dyn Any + Send + Sync> + Send + Sync;

/// A value that can be invoked with no arguments.
///
/// Clones share the same function; equality is identity.
#[derive(Clone)]
pub struct Callable(Arc<CallableFn>);

impl Callable {
	pub fn new<F>(f: F) -> Self
	where
		F: Fn() -> Value + Send + Sync + 'static,
	{
		Self(Arc::new(f))
	}

	pub fn call(&self) -> Value {
		(self.0)()
	}
}

impl fmt::Debug for Callable {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("Callable(..)")
	}
}

impl PartialEq for Callable {
	fn eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.0, &other.0)
	}
}

/// Handle to a concrete Rust type, addressable by a dotted path
#[derive(Clone)]
pub struct ClassRef {
	path: Box<str>,
	type_id: TypeId,
	type_name: &'static str,
	factory: Option<Arc<ClassFactory>>,
}

impl ClassRef {
	/// Handle for `T` without a factory
	pub fn of<T: Any>(path: impl Into<Box<str>>) -> Self {
		Self {
			path: path.into(),
			type_id: TypeId::of::<T>(),
			type_name: std::any::type_name::<T>(),
			factory: None,
		}
	}

	/// Handle for `T` that can also build instances through `factory`
	pub fn with_factory<T, F>(path: impl Into<Box<str>>, factory: F) -> Self
	where
		T: Any + Send + Sync,
		F: Fn() -> T + Send + Sync + 'static,
	{
		let mut class = Self::of::<T>(path);
		class.factory = Some(Arc::new(move || Box::new(factory()) as Box<dyn Any + Send + Sync>));
		class
	}

	pub fn path(&self) -> &str {
		&self.path
	}

	pub fn type_id(&self) -> TypeId {
		self.type_id
	}

	pub fn type_name(&self) -> &'static str {
		self.type_name
	}

	/// Check whether this handle refers to `T`
	pub fn is<T: Any>(&self) -> bool {
		self.type_id == TypeId::of::<T>()
	}

	/// Build a type-erased instance, if a factory was registered
	pub fn instantiate(&self) -> Option<Box<dyn Any + Send + Sync>> {
		self.factory.as_ref().map(|factory| factory())
	}

	/// Build an instance and downcast it to `T`
	pub fn instantiate_as<T: Any>(&self) -> Option<T> {
		self.instantiate()?.downcast::<T>().ok().map(|instance| *instance)
	}
}

impl fmt::Debug for ClassRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ClassRef")
			.field("path", &self.path)
			.field("type_name", &self.type_name)
			.field("factory", &self.factory.is_some())
			.finish()
	}
}

impl PartialEq for ClassRef {
	fn eq(&self, other: &Self) -> bool {
		self.type_id == other.type_id && self.path == other.path
	}
}

/// Setting value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	Null,
	Bool(bool),
	Int(i64),
	Float(f64),
	String(String),
	List(Vec<Value>),
	Map(BTreeMap<String, Value>),
	Class(ClassRef),
	Callable(Callable),
}

impl Value {
	/// Wrap a zero-argument function
	pub fn callable<F>(f: F) -> Self
	where
		F: Fn() -> Value + Send + Sync + 'static,
	{
		Value::Callable(Callable::new(f))
	}

	/// Get the type name for error messages
	pub fn type_name(&self) -> &'static str {
		match self {
			Value::Null => "null",
			Value::Bool(_) => "bool",
			Value::Int(_) => "int",
			Value::Float(_) => "float",
			Value::String(_) => "str",
			Value::List(_) => "list",
			Value::Map(_) => "map",
			Value::Class(_) => "class",
			Value::Callable(_) => "callable",
		}
	}

	pub fn is_null(&self) -> bool {
		matches!(self, Value::Null)
	}

	pub fn is_callable(&self) -> bool {
		matches!(self, Value::Callable(_))
	}

	pub fn is_class(&self) -> bool {
		matches!(self, Value::Class(_))
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Value::Bool(b) => Some(*b),
			_ => None,
		}
	}

	pub fn as_int(&self) -> Option<i64> {
		match self {
			Value::Int(i) => Some(*i),
			_ => None,
		}
	}

	pub fn as_float(&self) -> Option<f64> {
		match self {
			Value::Float(f) => Some(*f),
			_ => None,
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::String(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_list(&self) -> Option<&[Value]> {
		match self {
			Value::List(items) => Some(items),
			_ => None,
		}
	}

	pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
		match self {
			Value::Map(map) => Some(map),
			_ => None,
		}
	}

	pub fn as_class(&self) -> Option<&ClassRef> {
		match self {
			Value::Class(class) => Some(class),
			_ => None,
		}
	}

	pub fn as_callable(&self) -> Option<&Callable> {
		match self {
			Value::Callable(f) => Some(f),
			_ => None,
		}
	}

	/// Convert to JSON. Callables become `null`, classes their dotted path.
	pub fn to_json(&self) -> serde_json::Value {
		match self {
			Value::Null | Value::Callable(_) => serde_json::Value::Null,
			Value::Bool(b) => serde_json::Value::Bool(*b),
			Value::Int(i) => serde_json::Value::from(*i),
			Value::Float(f) => serde_json::Number::from_f64(*f)
				.map_or(serde_json::Value::Null, serde_json::Value::Number),
			Value::String(s) => serde_json::Value::String(s.clone()),
			Value::List(items) => serde_json::Value::Array(items.iter().map(Value::to_json).collect()),
			Value::Map(map) => serde_json::Value::Object(
				map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
			),
			Value::Class(class) => serde_json::Value::String(class.path().to_string()),
		}
	}
}

impl From<bool> for Value {
	fn from(b: bool) -> Self {
		Value::Bool(b)
	}
}

impl From<i64> for Value {
	fn from(i: i64) -> Self {
		Value::Int(i)
	}
}

impl From<i32> for Value {
	fn from(i: i32) -> Self {
		Value::Int(i64::from(i))
	}
}

impl From<u32> for Value {
	fn from(i: u32) -> Self {
		Value::Int(i64::from(i))
	}
}

impl From<f64> for Value {
	fn from(f: f64) -> Self {
		Value::Float(f)
	}
}

impl From<&str> for Value {
	fn from(s: &str) -> Self {
		Value::String(s.to_string())
	}
}

impl From<String> for Value {
	fn from(s: String) -> Self {
		Value::String(s)
	}
}

impl From<Vec<Value>> for Value {
	fn from(items: Vec<Value>) -> Self {
		Value::List(items)
	}
}

impl From<BTreeMap<String, Value>> for Value {
	fn from(map: BTreeMap<String, Value>) -> Self {
		Value::Map(map)
	}
}

impl From<ClassRef> for Value {
	fn from(class: ClassRef) -> Self {
		Value::Class(class)
	}
}

impl From<Callable> for Value {
	fn from(f: Callable) -> Self {
		Value::Callable(f)
	}
}

impl From<serde_json::Value> for Value {
	fn from(value: serde_json::Value) -> Self {
		match value {
			serde_json::Value::Null => Value::Null,
			serde_json::Value::Bool(b) => Value::Bool(b),
			serde_json::Value::Number(n) => match n.as_i64() {
				Some(i) => Value::Int(i),
				None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
			},
			serde_json::Value::String(s) => Value::String(s),
			serde_json::Value::Array(items) => {
				Value::List(items.into_iter().map(Value::from).collect())
			}
			serde_json::Value::Object(map) => {
				Value::Map(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
			}
		}
	}
}


// vim: ts=4
