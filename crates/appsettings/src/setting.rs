//! Setting declarations and resolution
//!
//! A [`Setting`] is the declarative placeholder for one configurable value.
//! Resolution is a fixed pipeline:
//!
//! 1. **Base**: the raw override if present, else the default, else
//!    [`Error::MissingValue`].
//! 2. **Call policy** (optional): `force_callable` check, then a once-policy
//!    invokes a callable and keeps the result.
//! 3. **Constraint** (optional): type coercion/check or class-path lookup.
//!
//! With an each-time policy a callable is stored as-is and invoked, then
//! constrained, on every [`Setting::value`] call.

use std::sync::Arc;

use tracing::debug;

use crate::class_path::ClassRegistry;
use crate::constraint::{Constraint, ValueType};
use crate::policy::CallPolicy;
use crate::prelude::*;

#[derive(Debug, Clone)]
struct Resolved {
	/// External name used for diagnostics on later reads
	name: Box<str>,
	value: Value,
}

#[derive(Debug, Clone, Default)]
pub struct Setting {
	default_value: Option<Value>,
	settings_name: Option<Box<str>>,
	aliases: Vec<Box<str>>,
	constraint: Option<Constraint>,
	call: Option<CallPolicy>,
	resolved: Option<Resolved>,
}

impl Setting {
	/// Setting without a default; must be configured externally
	pub fn new() -> Self {
		<Self as Default>::default()
	}

	pub fn with_default(value: impl Into<Value>) -> Self {
		Self::new().default(value)
	}

	/// Integer setting, coercing
	pub fn int() -> Self {
		Self::new().typed(ValueType::Int, true)
	}

	/// Float setting, coercing
	pub fn float() -> Self {
		Self::new().typed(ValueType::Float, true)
	}

	/// Boolean setting, coercing
	pub fn bool() -> Self {
		Self::new().typed(ValueType::Bool, true)
	}

	/// String setting, not coercing
	pub fn string() -> Self {
		Self::new().typed(ValueType::String, false)
	}

	/// Iterable setting, not coercing
	pub fn iterable() -> Self {
		Self::new().typed(ValueType::Iterable, false)
	}

	/// Class setting resolving dotted paths through `registry`
	pub fn class(registry: Arc<ClassRegistry>) -> Self {
		Self::new().class_path(registry)
	}

	/// Callable setting invoked once at resolution
	pub fn called_once() -> Self {
		Self::new().call_policy(CallPolicy::once())
	}

	/// Callable setting invoked on every read
	pub fn called_each_time() -> Self {
		Self::new().call_policy(CallPolicy::each_time())
	}

	/// An already resolved setting whose value is returned verbatim
	pub fn stand_in(value: impl Into<Value>) -> Self {
		let value = value.into();
		Self {
			default_value: Some(value.clone()),
			resolved: Some(Resolved { name: "<stand-in>".into(), value }),
			..<Self as Default>::default()
		}
	}

	pub fn default(mut self, value: impl Into<Value>) -> Self {
		self.default_value = Some(value.into());
		self
	}

	/// Look up this key externally instead of the declared name
	pub fn settings_name(mut self, name: impl Into<Box<str>>) -> Self {
		self.settings_name = Some(name.into());
		self
	}

	/// Alternate external keys, checked in order after the primary key
	pub fn aliases<I, S>(mut self, aliases: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<Box<str>>,
	{
		self.aliases = aliases.into_iter().map(Into::into).collect();
		self
	}

	/// Aliases from a dynamic value: a string or a list; non-string entries are dropped.
	///
	/// A single string is one alias. It is not split into one alias per character.
	pub fn aliases_from(mut self, aliases: &Value) -> Self {
		self.aliases = match aliases {
			Value::String(alias) => vec![alias.as_str().into()],
			Value::List(items) => items.iter().filter_map(Value::as_str).map(Into::into).collect(),
			_ => Vec::new(),
		};
		self
	}

	pub fn typed(mut self, ty: ValueType, cast: bool) -> Self {
		self.constraint = Some(Constraint::typed(ty, cast));
		self
	}

	pub fn class_path(mut self, registry: Arc<ClassRegistry>) -> Self {
		self.constraint = Some(Constraint::ClassPath(registry));
		self
	}

	pub fn call_policy(mut self, policy: CallPolicy) -> Self {
		self.call = Some(policy);
		self
	}

	pub fn call_once(self) -> Self {
		let force = self.call.is_some_and(|p| p.force_callable);
		self.call_policy(CallPolicy::once().force_callable(force))
	}

	pub fn call_each_time(self) -> Self {
		let force = self.call.is_some_and(|p| p.force_callable);
		self.call_policy(CallPolicy::each_time().force_callable(force))
	}

	/// Require a callable value. Forcing implies a once-policy if none is set;
	/// `false` only updates an existing policy.
	pub fn force_callable(mut self, force: bool) -> Self {
		self.call = match self.call {
			Some(policy) => Some(policy.force_callable(force)),
			None if force => Some(CallPolicy::once().force_callable(true)),
			None => None,
		};
		self
	}

	pub fn default_value(&self) -> Option<&Value> {
		self.default_value.as_ref()
	}

	pub fn get_settings_name(&self) -> Option<&str> {
		self.settings_name.as_deref()
	}

	pub fn get_aliases(&self) -> &[Box<str>] {
		&self.aliases
	}

	pub fn constraint(&self) -> Option<&Constraint> {
		self.constraint.as_ref()
	}

	pub fn get_call_policy(&self) -> Option<CallPolicy> {
		self.call
	}

	/// External key for a setting declared as `declared_name`
	pub fn external_name<'a>(&'a self, declared_name: &'a str) -> &'a str {
		self.settings_name.as_deref().unwrap_or(declared_name)
	}

	pub fn is_resolved(&self) -> bool {
		self.resolved.is_some()
	}

	/// Resolve against a raw override (`NOT_SET` if none was found) and store the result.
	///
	/// On error nothing is stored.
	pub fn resolve(&mut self, name: &str, raw: Option<Value>) -> SettingsResult<&Value> {
		let value = self.compute(name, raw)?;
		debug!("Resolved setting {} to {}", name, value.type_name());
		let resolved = self.resolved.insert(Resolved { name: name.into(), value });
		Ok(&resolved.value)
	}

	/// The effective value. Fails with [`Error::NotResolved`] before [`Setting::resolve`].
	pub fn value(&self) -> SettingsResult<Value> {
		let resolved = self.resolved.as_ref().ok_or(Error::NotResolved)?;
		match self.call {
			Some(policy) if policy.recomputes(&resolved.value) => {
				let value = policy.on_read(&resolved.value);
				self.constrain(&resolved.name, value)
			}
			_ => Ok(resolved.value.clone()),
		}
	}

	fn compute(&self, name: &str, raw: Option<Value>) -> SettingsResult<Value> {
		let value = self.base_value(name, raw)?;
		let value = match self.call {
			Some(policy) => {
				policy.check(name, &value)?;
				let value = policy.on_resolve(value);
				if policy.recomputes(&value) {
					return Ok(value);
				}
				value
			}
			None => value,
		};
		self.constrain(name, value)
	}

	fn base_value(&self, name: &str, raw: Option<Value>) -> SettingsResult<Value> {
		match (raw, &self.default_value) {
			(Some(value), _) => Ok(value),
			(None, Some(default)) => Ok(default.clone()),
			(None, None) => Err(Error::MissingValue {
				name: name.to_string(),
				aliases: self.aliases.iter().map(ToString::to_string).collect(),
			}),
		}
	}

	fn constrain(&self, name: &str, value: Value) -> SettingsResult<Value> {
		match &self.constraint {
			Some(constraint) => constraint.apply(name, value),
			None => Ok(value),
		}
	}
}


// vim: ts=4
