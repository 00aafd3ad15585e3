//! External configuration source
//!
//! The host configuration system is consulted through a single
//! "get key, or nothing" lookup. Sources are expected to be cheap in-memory
//! reads; they are queried once per key and alias on first access only.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use std::sync::Arc;

use crate::value::Value;

pub trait SettingsSource: Send + Sync {
	/// Look up a raw override value, `None` if the key is absent
	fn lookup(&self, key: &str) -> Option<Value>;
}

impl<S: BuildHasher + Send + Sync> SettingsSource for HashMap<String, Value, S> {
	fn lookup(&self, key: &str) -> Option<Value> {
		self.get(key).cloned()
	}
}

impl SettingsSource for BTreeMap<String, Value> {
	fn lookup(&self, key: &str) -> Option<Value> {
		self.get(key).cloned()
	}
}

impl<T: SettingsSource + ?Sized> SettingsSource for Arc<T> {
	fn lookup(&self, key: &str) -> Option<Value> {
		(**self).lookup(key)
	}
}

// vim: ts=4
