//! Settings container with per-container caching
//!
//! A container owns the static declarations of one application's settings
//! and a cache of resolved settings. Each declared setting is looked up in
//! the external source at most once per cache lifetime:
//!
//! 1. Unknown name: [`Error::UndefinedSetting`]
//! 2. Plain attribute: returned unchanged, never cached
//! 3. Cache miss: query the external key (the setting's `settings_name`,
//!    else the declared name), then each alias in order; resolve with the
//!    first value found or `NOT_SET`; cache the resolved setting
//! 4. Return the cached setting's value
//!
//! Caches are never shared between containers. Resolution runs outside the
//! cache lock; if two threads resolve the same setting at once the first
//! insert wins and both return the winner's value.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::prelude::*;
use crate::setting::Setting;
use crate::source::MapSource;

/// Something declared on a container
#[derive(Debug, Clone)]
pub enum Declaration {
	Setting(Setting),
	/// Non-setting attribute, passed through untouched
	Attribute(Value),
}

/// A scoped override: the stand-in in the cache and the entry it replaced
#[derive(Debug)]
struct OverrideLayer {
	stand_in: Arc<Setting>,
	original: Arc<Setting>,
}

#[derive(Debug, Default)]
struct Cache {
	resolved: HashMap<Box<str>, Arc<Setting>>,
	/// Live overrides per name, innermost last
	overrides: HashMap<Box<str>, Vec<OverrideLayer>>,
}

pub struct SettingsContainer {
	name: Box<str>,
	declarations: HashMap<Box<str>, Declaration>,
	source: Arc<dyn SettingsSource>,
	cache: Mutex<Cache>,
}

impl fmt::Debug for SettingsContainer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SettingsContainer")
			.field("name", &self.name)
			.field("declarations", &self.declarations.len())
			.field("cached", &self.cache.lock().resolved.len())
			.finish_non_exhaustive()
	}
}

impl SettingsContainer {
	pub fn builder(name: impl Into<Box<str>>) -> SettingsContainerBuilder {
		SettingsContainerBuilder::new(name)
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// Check if `name` is declared (setting or attribute)
	pub fn contains(&self, name: &str) -> bool {
		self.declarations.contains_key(name)
	}

	/// Declared names, sorted
	pub fn names(&self) -> Vec<&str> {
		let mut names: Vec<&str> = self.declarations.keys().map(AsRef::as_ref).collect();
		names.sort_unstable();
		names
	}

	/// Get the value of a declared setting or attribute, resolving it on first access
	pub fn get(&self, name: &str) -> SettingsResult<Value> {
		match self.declaration(name)? {
			Declaration::Attribute(value) => Ok(value.clone()),
			Declaration::Setting(template) => self.resolve_cached(name, template)?.value(),
		}
	}

	/// Get the cached setting for `name`, resolving it first if needed
	pub fn resolved_setting(&self, name: &str) -> SettingsResult<Arc<Setting>> {
		match self.declaration(name)? {
			Declaration::Attribute(_) => Err(Error::NotASetting(name.to_string())),
			Declaration::Setting(template) => self.resolve_cached(name, template),
		}
	}

	/// Resolve every declared setting, failing on the first error
	pub fn resolve_all(&self) -> SettingsResult<()> {
		for name in self.names() {
			if let Some(Declaration::Setting(template)) = self.declarations.get(name) {
				self.resolve_cached(name, template)?;
			}
		}
		Ok(())
	}

	pub fn is_cached(&self, name: &str) -> bool {
		self.cache.lock().resolved.contains_key(name)
	}

	pub fn cached_len(&self) -> usize {
		self.cache.lock().resolved.len()
	}

	/// Drop all resolved settings and live overrides; the next access resolves again.
	///
	/// Override guards still alive afterwards restore nothing when dropped.
	pub fn reset(&self) {
		let mut cache = self.cache.lock();
		info!("Resetting settings cache of {} ({} entries)", self.name, cache.resolved.len());
		cache.resolved.clear();
		cache.overrides.clear();
	}

	/// Resolve `name` and put `stand_in` in front of it until [`Self::pop_override`]
	pub(crate) fn push_override(&self, name: &str, stand_in: Arc<Setting>) -> SettingsResult<()> {
		let resolved = self.resolved_setting(name)?;
		let mut cache = self.cache.lock();
		let original = cache.resolved.insert(name.into(), Arc::clone(&stand_in)).unwrap_or(resolved);
		cache.overrides.entry(name.into()).or_default().push(OverrideLayer { stand_in, original });
		Ok(())
	}

	/// Remove the override layer of `stand_in`, in any order.
	///
	/// The innermost layer puts its original back if its stand-in is still
	/// cached; an inner layer hands its original to the layer above it.
	pub(crate) fn pop_override(&self, name: &str, stand_in: &Arc<Setting>) {
		let mut cache = self.cache.lock();
		let Cache { resolved, overrides } = &mut *cache;
		let Some(layers) = overrides.get_mut(name) else {
			return;
		};
		let Some(index) = layers.iter().position(|layer| Arc::ptr_eq(&layer.stand_in, stand_in))
		else {
			return;
		};

		let layer = layers.remove(index);
		if let Some(above) = layers.get_mut(index) {
			above.original = layer.original;
		} else if resolved.get(name).is_some_and(|current| Arc::ptr_eq(current, &layer.stand_in)) {
			resolved.insert(name.into(), layer.original);
		}
		if layers.is_empty() {
			overrides.remove(name);
		}
	}

	/// Type-safe getters
	pub fn get_int(&self, name: &str) -> SettingsResult<i64> {
		match self.get(name)? {
			Value::Int(i) => Ok(i),
			_ => Err(Error::TypeMismatch { setting: name.to_string(), target: "int" }),
		}
	}

	pub fn get_float(&self, name: &str) -> SettingsResult<f64> {
		match self.get(name)? {
			Value::Float(f) => Ok(f),
			_ => Err(Error::TypeMismatch { setting: name.to_string(), target: "float" }),
		}
	}

	pub fn get_bool(&self, name: &str) -> SettingsResult<bool> {
		match self.get(name)? {
			Value::Bool(b) => Ok(b),
			_ => Err(Error::TypeMismatch { setting: name.to_string(), target: "bool" }),
		}
	}

	pub fn get_string(&self, name: &str) -> SettingsResult<String> {
		match self.get(name)? {
			Value::String(s) => Ok(s),
			_ => Err(Error::TypeMismatch { setting: name.to_string(), target: "str" }),
		}
	}

	pub fn get_class(&self, name: &str) -> SettingsResult<ClassRef> {
		match self.get(name)? {
			Value::Class(class) => Ok(class),
			_ => Err(Error::TypeMismatch { setting: name.to_string(), target: "class" }),
		}
	}

	/// Deserialize the value through its JSON form
	pub fn get_as<T: DeserializeOwned>(&self, name: &str) -> SettingsResult<T> {
		Ok(serde_json::from_value(self.get(name)?.to_json())?)
	}

	fn declaration(&self, name: &str) -> SettingsResult<&Declaration> {
		self.declarations.get(name).ok_or_else(|| Error::UndefinedSetting(name.to_string()))
	}

	fn resolve_cached(&self, name: &str, template: &Setting) -> SettingsResult<Arc<Setting>> {
		let cached = self.cache.lock().resolved.get(name).cloned();
		if let Some(setting) = cached {
			debug!("Setting cache hit: {}.{}", self.name, name);
			return Ok(setting);
		}

		let key = template.external_name(name);
		let raw = self.lookup(key, template.get_aliases());
		let mut setting = template.clone();
		setting.resolve(key, raw)?;
		let setting = Arc::new(setting);

		let mut cache = self.cache.lock();
		let entry = cache.resolved.entry(name.into()).or_insert_with(|| Arc::clone(&setting));
		if !Arc::ptr_eq(entry, &setting) {
			warn!("Setting {}.{} was resolved concurrently, keeping the first result", self.name, name);
		}
		Ok(Arc::clone(entry))
	}

	fn lookup(&self, key: &str, aliases: &[Box<str>]) -> Option<Value> {
		std::iter::once(key).chain(aliases.iter().map(AsRef::as_ref)).find_map(|k| {
			let value = self.source.lookup(k);
			debug!("Settings lookup {}: {}", k, if value.is_some() { "found" } else { "absent" });
			value
		})
	}
}

/// Builder for SettingsContainer with fluent API
pub struct SettingsContainerBuilder {
	name: Box<str>,
	declarations: HashMap<Box<str>, Declaration>,
	source: Option<Arc<dyn SettingsSource>>,
}

impl SettingsContainerBuilder {
	pub fn new(name: impl Into<Box<str>>) -> Self {
		Self { name: name.into(), declarations: HashMap::new(), source: None }
	}

	/// Set the external configuration source (defaults to an empty one)
	pub fn source(self, source: impl SettingsSource + 'static) -> Self {
		self.shared_source(Arc::new(source))
	}

	/// Share an external configuration source with other containers
	pub fn shared_source(mut self, source: Arc<dyn SettingsSource>) -> Self {
		self.source = Some(source);
		self
	}

	/// Declare a setting
	pub fn setting(self, name: impl Into<Box<str>>, setting: Setting) -> Self {
		self.declare(name.into(), Declaration::Setting(setting))
	}

	/// Declare a plain attribute
	pub fn attribute(self, name: impl Into<Box<str>>, value: impl Into<Value>) -> Self {
		self.declare(name.into(), Declaration::Attribute(value.into()))
	}

	fn declare(mut self, name: Box<str>, declaration: Declaration) -> Self {
		if self.declarations.insert(name.clone(), declaration).is_some() {
			warn!("{} declared twice on {}, keeping the last declaration", name, self.name);
		}
		self
	}

	pub fn build(self) -> SettingsContainer {
		info!("Building settings container {} with {} declarations", self.name, self.declarations.len());
		SettingsContainer {
			name: self.name,
			declarations: self.declarations,
			source: self.source.unwrap_or_else(|| Arc::new(MapSource::new())),
			cache: Mutex::new(Cache::default()),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn container(source: MapSource) -> SettingsContainer {
		SettingsContainer::builder("test")
			.source(source)
			.setting("SETTING", Setting::with_default("Default").aliases(["ALIAS", "ALIAS2"]))
			.attribute("test_obj", "plain")
			.build()
	}

	#[test]
	fn test_access_of_non_existing_setting() {
		let settings = container(MapSource::new());
		assert!(matches!(settings.get("NON_EXISTENT"), Err(Error::UndefinedSetting(_))));
	}

	#[test]
	fn test_access_of_non_settings() {
		let settings = container(MapSource::new());
		assert_eq!(settings.get("test_obj").unwrap(), Value::from("plain"));
		assert!(!settings.is_cached("test_obj"));
		assert!(matches!(settings.resolved_setting("test_obj"), Err(Error::NotASetting(_))));
	}

	#[test]
	fn test_existing_cache_entry_takes_precedence() {
		let settings = container(MapSource::new());
		let stand_in = Arc::new(Setting::stand_in("FOUND"));
		settings.push_override("SETTING", Arc::clone(&stand_in)).unwrap();
		assert_eq!(settings.get("SETTING").unwrap(), Value::from("FOUND"));

		settings.pop_override("SETTING", &stand_in);
		assert_eq!(settings.get("SETTING").unwrap(), Value::from("Default"));
	}

	#[test]
	fn test_pop_outer_layer_first() {
		let settings = container(MapSource::new());
		let outer = Arc::new(Setting::stand_in("A"));
		let inner = Arc::new(Setting::stand_in("B"));
		settings.push_override("SETTING", Arc::clone(&outer)).unwrap();
		settings.push_override("SETTING", Arc::clone(&inner)).unwrap();

		settings.pop_override("SETTING", &outer);
		assert_eq!(settings.get("SETTING").unwrap(), Value::from("B"));
		settings.pop_override("SETTING", &inner);
		assert_eq!(settings.get("SETTING").unwrap(), Value::from("Default"));
		assert!(settings.cache.lock().overrides.is_empty());
	}

	#[test]
	fn test_value_stored_in_cache() {
		let settings = container(MapSource::new());
		assert!(!settings.is_cached("SETTING"));
		settings.get("SETTING").unwrap();
		assert!(settings.is_cached("SETTING"));
		assert_eq!(settings.cached_len(), 1);
	}

	#[test]
	fn test_failed_resolution_is_not_cached() {
		let settings = SettingsContainer::builder("test").setting("REQUIRED", Setting::new()).build();
		assert!(matches!(settings.get("REQUIRED"), Err(Error::MissingValue { .. })));
		assert_eq!(settings.cached_len(), 0);
	}

	#[test]
	fn test_names_sorted() {
		let settings = container(MapSource::new());
		assert_eq!(settings.names(), vec!["SETTING", "test_obj"]);
		assert!(settings.contains("SETTING"));
	}
}

// vim: ts=4
