//! Built-in settings sources

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::debug;

use crate::prelude::*;

/// Mutable in-memory source
#[derive(Debug, Default)]
pub struct MapSource {
	values: RwLock<HashMap<String, Value>>,
}

impl MapSource {
	pub fn new() -> Self {
		Self::default()
	}

	/// Set a key, returning the previous value
	pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
		self.values.write().insert(key.into(), value.into())
	}

	pub fn remove(&self, key: &str) -> Option<Value> {
		self.values.write().remove(key)
	}

	pub fn clear(&self) {
		self.values.write().clear();
	}

	pub fn len(&self) -> usize {
		self.values.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.read().is_empty()
	}
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for MapSource {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let values = iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
		Self { values: RwLock::new(values) }
	}
}

impl SettingsSource for MapSource {
	fn lookup(&self, key: &str) -> Option<Value> {
		self.values.read().get(key).cloned()
	}
}

/// Process environment, optionally under a key prefix. Values are strings.
#[derive(Debug, Clone, Default)]
pub struct EnvSource {
	prefix: String,
}

impl EnvSource {
	pub fn new() -> Self {
		Self::default()
	}

	/// Look up `{prefix}{key}`
	pub fn with_prefix(prefix: impl Into<String>) -> Self {
		Self { prefix: prefix.into() }
	}

	pub fn prefix(&self) -> &str {
		&self.prefix
	}
}

impl SettingsSource for EnvSource {
	fn lookup(&self, key: &str) -> Option<Value> {
		let var = format!("{}{}", self.prefix, key);
		match std::env::var(&var) {
			Ok(value) => Some(Value::String(value)),
			Err(std::env::VarError::NotUnicode(_)) => {
				debug!("Ignoring non-unicode environment variable {}", var);
				None
			}
			Err(std::env::VarError::NotPresent) => None,
		}
	}
}


// vim: ts=4
