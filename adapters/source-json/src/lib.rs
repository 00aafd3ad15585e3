//! JSON document settings source
//!
//! Serves override values from a JSON object held in memory. Top-level keys
//! are setting keys; with nested keys enabled, `"database.host"` also
//! reaches `{"database": {"host": ..}}` when no top-level key matches.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod error;

use std::path::Path;

use appsettings_types::{SettingsSource, Value};
use serde_json::Map;
use tracing::debug;

pub use error::Error;

#[derive(Debug, Clone, Default)]
pub struct JsonSource {
	root: Map<String, serde_json::Value>,
	nested_keys: bool,
}

impl JsonSource {
	/// Source from a parsed document; it must be a JSON object
	pub fn from_value(value: serde_json::Value) -> Result<Self, Error> {
		match value {
			serde_json::Value::Object(root) => Ok(Self { root, nested_keys: false }),
			serde_json::Value::Null => Err(Error::NotAnObject("null")),
			serde_json::Value::Bool(_) => Err(Error::NotAnObject("bool")),
			serde_json::Value::Number(_) => Err(Error::NotAnObject("number")),
			serde_json::Value::String(_) => Err(Error::NotAnObject("string")),
			serde_json::Value::Array(_) => Err(Error::NotAnObject("array")),
		}
	}

	pub fn from_json_str(json: &str) -> Result<Self, Error> {
		Self::from_value(serde_json::from_str(json)?)
	}

	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
		let path = path.as_ref();
		debug!("Loading settings from {}", path.display());
		Self::from_json_str(&std::fs::read_to_string(path)?)
	}

	/// Resolve dotted keys through nested objects
	pub fn nested_keys(mut self, enabled: bool) -> Self {
		self.nested_keys = enabled;
		self
	}

	pub fn len(&self) -> usize {
		self.root.len()
	}

	pub fn is_empty(&self) -> bool {
		self.root.is_empty()
	}

	fn find(&self, key: &str) -> Option<&serde_json::Value> {
		if let Some(value) = self.root.get(key) {
			return Some(value);
		}
		if !self.nested_keys {
			return None;
		}

		let mut parts = key.split('.');
		let first = self.root.get(parts.next()?)?;
		parts.try_fold(first, |node, part| node.as_object()?.get(part))
	}
}

impl SettingsSource for JsonSource {
	fn lookup(&self, key: &str) -> Option<Value> {
		self.find(key).cloned().map(Value::from)
	}
}

// vim: ts=4
