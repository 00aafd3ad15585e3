//! Lazily resolved application settings.
//!
//! A library declares its settings once, on a [`SettingsContainer`], each with
//! an optional default, an optional external name, and alternate names
//! (aliases). On first access the container asks the host's
//! [`SettingsSource`] for an override, lets the [`Setting`] resolve it
//! against its default and policies, and caches the result.
//!
//! ```
//! use appsettings::{MapSource, Setting, SettingsContainer, Value};
//!
//! let source = MapSource::new();
//! source.set("ALIAS", "X");
//!
//! let settings = SettingsContainer::builder("my_app")
//! 	.source(source)
//! 	.setting("SETTING", Setting::with_default("Default").aliases(["ALIAS"]))
//! 	.build();
//!
//! assert_eq!(settings.get("SETTING").unwrap(), Value::from("X"));
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod class_path;
pub mod constraint;
pub mod container;
pub mod policy;
mod prelude;
pub mod setting;
pub mod source;
pub mod testing;

pub use appsettings_types::{
	Callable, ClassRef, Error, ErrorKind, NOT_SET, SettingsResult, SettingsSource, Value,
};
pub use class_path::ClassRegistry;
pub use constraint::{Constraint, ValueType};
pub use container::{Declaration, SettingsContainer, SettingsContainerBuilder};
pub use policy::{CallMode, CallPolicy};
pub use setting::Setting;
pub use source::{EnvSource, MapSource};

// vim: ts=4
