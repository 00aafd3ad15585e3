//! Tests for scoped setting overrides

use std::sync::Arc;

use appsettings::testing::{override_settings, with_overrides};
use appsettings::{Error, MapSource, Setting, SettingsContainer, Value};

fn settings() -> SettingsContainer {
	SettingsContainer::builder("overrides")
		.source([("SETTING", "Custom value")].into_iter().collect::<MapSource>())
		.setting("SETTING", Setting::with_default("Value"))
		.setting("LIMIT", Setting::int().default(10))
		.build()
}

#[test]
fn test_nested_overrides_restore_each_level() {
	let settings = settings();
	assert_eq!(settings.get("SETTING").unwrap(), Value::from("Custom value"));

	let outer = override_settings(&settings, [("SETTING", "Outer")]).unwrap();
	assert_eq!(settings.get("SETTING").unwrap(), Value::from("Outer"));
	{
		let _inner = override_settings(&settings, [("SETTING", "Inner")]).unwrap();
		assert_eq!(settings.get("SETTING").unwrap(), Value::from("Inner"));
	}
	assert_eq!(settings.get("SETTING").unwrap(), Value::from("Outer"));
	drop(outer);

	assert_eq!(settings.get("SETTING").unwrap(), Value::from("Custom value"));
}

#[test]
fn test_outer_guard_dropped_first() {
	let settings = SettingsContainer::builder("overrides")
		.setting("SETTING", Setting::with_default("orig"))
		.build();

	let a = override_settings(&settings, [("SETTING", "A")]).unwrap();
	let b = override_settings(&settings, [("SETTING", "B")]).unwrap();
	drop(a);
	assert_eq!(settings.get("SETTING").unwrap(), Value::from("B"));
	drop(b);

	assert_eq!(settings.get("SETTING").unwrap(), Value::from("orig"));
}

#[test]
fn test_reset_inside_override_scope() {
	let source = Arc::new(MapSource::new());
	source.set("SETTING", "v1");
	let settings = SettingsContainer::builder("overrides")
		.shared_source(source.clone())
		.setting("SETTING", Setting::with_default("Value"))
		.build();
	assert_eq!(settings.get("SETTING").unwrap(), Value::from("v1"));

	let guard = override_settings(&settings, [("SETTING", "Overridden")]).unwrap();
	source.set("SETTING", "v2");
	settings.reset();
	assert_eq!(settings.get("SETTING").unwrap(), Value::from("v2"));
	drop(guard);

	assert_eq!(settings.get("SETTING").unwrap(), Value::from("v2"));
}

#[test]
fn test_override_is_verbatim() {
	let settings = settings();
	// A stand-in skips the int constraint of the declared setting
	let seen = with_overrides(&settings, [("LIMIT", "unbounded")], || settings.get("LIMIT")).unwrap();
	assert_eq!(seen.unwrap(), Value::from("unbounded"));
	assert_eq!(settings.get_int("LIMIT").unwrap(), 10);
}

#[test]
fn test_original_cache_entry_is_restored() {
	let settings = settings();
	let before = settings.resolved_setting("SETTING").unwrap();
	{
		let _guard = override_settings(&settings, [("SETTING", "Overridden")]).unwrap();
		assert!(!Arc::ptr_eq(&before, &settings.resolved_setting("SETTING").unwrap()));
	}
	assert!(Arc::ptr_eq(&before, &settings.resolved_setting("SETTING").unwrap()));
}

#[test]
fn test_override_leaves_other_containers_alone() {
	let first = settings();
	let second = settings();
	let _guard = override_settings(&first, [("SETTING", "Overridden")]).unwrap();

	assert_eq!(first.get("SETTING").unwrap(), Value::from("Overridden"));
	assert_eq!(second.get("SETTING").unwrap(), Value::from("Custom value"));
}

#[test]
fn test_override_undeclared_setting() {
	let settings = settings();
	let result = override_settings(&settings, [("NON_EXISTENT", 1)]);
	assert!(matches!(result, Err(Error::UndefinedSetting(_))));
}

// vim: ts=4
