//! Class-path resolution
//!
//! Rust has no runtime module loader, so dotted class paths resolve through
//! an explicit registry filled at startup. Only paths registered here can be
//! named by a class setting.

use std::any::Any;
use std::collections::HashMap;

use tracing::{debug, warn};

use crate::prelude::*;

#[derive(Debug, Default, Clone)]
pub struct ClassRegistry {
	classes: HashMap<Box<str>, ClassRef>,
}

impl ClassRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register `T` under a dotted path
	pub fn register<T: Any>(&mut self, path: &str) -> &mut Self {
		self.insert(ClassRef::of::<T>(path))
	}

	/// Register `T` under a dotted path, instantiable through `T::default()`
	pub fn register_default<T: Any + Default + Send + Sync>(&mut self, path: &str) -> &mut Self {
		self.insert(ClassRef::with_factory(path, T::default))
	}

	/// Register a prepared handle under its own path
	pub fn insert(&mut self, class: ClassRef) -> &mut Self {
		debug!("Registering class: {} ({})", class.path(), class.type_name());
		if let Some(previous) = self.classes.insert(class.path().into(), class) {
			warn!("Class path '{}' registered twice, replacing {}", previous.path(), previous.type_name());
		}
		self
	}

	/// Find the class registered under `path`
	pub fn locate(&self, path: &str) -> Option<&ClassRef> {
		if !is_dotted_path(path) {
			return None;
		}
		self.classes.get(path)
	}

	pub fn len(&self) -> usize {
		self.classes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.classes.is_empty()
	}

	/// Resolve a setting value to a class handle.
	///
	/// Class handles pass through; strings are looked up as dotted paths.
	pub fn resolve(&self, setting: &str, value: Value) -> SettingsResult<ClassRef> {
		match value {
			Value::Class(class) => Ok(class),
			Value::String(path) => self.locate(&path).cloned().ok_or_else(|| Error::ClassNotFound {
				path,
				setting: setting.to_string(),
			}),
			other => Err(Error::InvalidClassValue {
				setting: setting.to_string(),
				found: other.type_name(),
			}),
		}
	}
}

/// Check that `path` is a non-empty sequence of identifiers joined by dots
fn is_dotted_path(path: &str) -> bool {
	!path.is_empty()
		&& path.split('.').all(|part| {
			let mut chars = part.chars();
			chars.next().is_some_and(|c| c.is_alphabetic() || c == '_')
				&& chars.all(|c| c.is_alphanumeric() || c == '_')
		})
}


// vim: ts=4
