//! Scoped setting overrides for tests
//!
//! An override force-resolves the setting and pushes a stand-in onto the
//! container's per-name override stack. Dropping a guard removes only its own
//! layers, so nested guards may be dropped in any order and every level is
//! restored exactly once all of them are gone. A [`SettingsContainer::reset`]
//! discards live overrides; their guards then restore nothing.
//!
//! ```
//! use appsettings::testing::override_settings;
//! use appsettings::{Setting, SettingsContainer, Value};
//!
//! let settings = SettingsContainer::builder("my_app")
//! 	.setting("SETTING", Setting::with_default("Value"))
//! 	.build();
//!
//! {
//! 	let _guard = override_settings(&settings, [("SETTING", "Overridden")]).unwrap();
//! 	assert_eq!(settings.get("SETTING").unwrap(), Value::from("Overridden"));
//! }
//! assert_eq!(settings.get("SETTING").unwrap(), Value::from("Value"));
//! ```

use std::sync::Arc;

use tracing::debug;

use crate::container::SettingsContainer;
use crate::prelude::*;
use crate::setting::Setting;

/// Restores overridden settings on drop
#[must_use = "the override is undone as soon as the guard is dropped"]
#[derive(Debug)]
pub struct OverrideGuard<'a> {
	container: &'a SettingsContainer,
	stand_ins: Vec<(Box<str>, Arc<Setting>)>,
}

impl OverrideGuard<'_> {
	/// Names overridden by this guard, in override order
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.stand_ins.iter().map(|(name, _)| name.as_ref())
	}
}

impl Drop for OverrideGuard<'_> {
	fn drop(&mut self) {
		for (name, stand_in) in self.stand_ins.drain(..).rev() {
			debug!("Restoring setting {}.{}", self.container.name(), name);
			self.container.pop_override(&name, &stand_in);
		}
	}
}

/// Override settings of `container` until the returned guard is dropped.
///
/// Fails if a name is undeclared, is a plain attribute, or cannot be
/// resolved; overrides applied before the failure are undone.
pub fn override_settings<'a, I, K, V>(
	container: &'a SettingsContainer,
	overrides: I,
) -> SettingsResult<OverrideGuard<'a>>
where
	I: IntoIterator<Item = (K, V)>,
	K: AsRef<str>,
	V: Into<Value>,
{
	let mut guard = OverrideGuard { container, stand_ins: Vec::new() };
	for (name, value) in overrides {
		let name = name.as_ref();
		let stand_in = Arc::new(Setting::stand_in(value));
		container.push_override(name, Arc::clone(&stand_in))?;
		debug!("Overriding setting {}.{}", container.name(), name);
		guard.stand_ins.push((name.into(), stand_in));
	}
	Ok(guard)
}

/// Run `f` with settings overridden
pub fn with_overrides<I, K, V, F, R>(
	container: &SettingsContainer,
	overrides: I,
	f: F,
) -> SettingsResult<R>
where
	I: IntoIterator<Item = (K, V)>,
	K: AsRef<str>,
	V: Into<Value>,
	F: FnOnce() -> R,
{
	let _guard = override_settings(container, overrides)?;
	Ok(f())
}


// vim: ts=4
