//! Call policies
//!
//! A call policy decides what happens when a resolved value is callable:
//! invoke it once at resolution time and keep the result, or keep the
//! callable and invoke it on every read.

use crate::prelude::*;

/// When a callable value is invoked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallMode {
	/// Invoke during resolution, cache the result
	Once,
	/// Keep the callable, invoke on every read
	EachTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallPolicy {
	pub mode: CallMode,
	/// Reject values that are not callable
	pub force_callable: bool,
}

impl CallPolicy {
	pub fn once() -> Self {
		Self { mode: CallMode::Once, force_callable: false }
	}

	pub fn each_time() -> Self {
		Self { mode: CallMode::EachTime, force_callable: false }
	}

	pub fn force_callable(mut self, force: bool) -> Self {
		self.force_callable = force;
		self
	}

	/// Enforce `force_callable`. Runs before any invocation.
	pub fn check(&self, setting: &str, value: &Value) -> SettingsResult<()> {
		if self.force_callable && !value.is_callable() {
			return Err(Error::NotCallable { setting: setting.to_string(), found: value.type_name() });
		}
		Ok(())
	}

	/// Value to store at resolution time
	pub fn on_resolve(&self, value: Value) -> Value {
		match (self.mode, value) {
			(CallMode::Once, Value::Callable(f)) => f.call(),
			(_, value) => value,
		}
	}

	/// Value to hand out on a read of the stored value
	pub fn on_read(&self, stored: &Value) -> Value {
		match (self.mode, stored) {
			(CallMode::EachTime, Value::Callable(f)) => f.call(),
			(_, stored) => stored.clone(),
		}
	}

	/// Whether reads of `stored` produce a fresh value each time
	pub fn recomputes(&self, stored: &Value) -> bool {
		self.mode == CallMode::EachTime && stored.is_callable()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::Arc;
	use std::sync::atomic::{AtomicUsize, Ordering};

	fn counting(calls: &Arc<AtomicUsize>) -> Value {
		let calls = Arc::clone(calls);
		Value::callable(move || {
			calls.fetch_add(1, Ordering::SeqCst);
			Value::from("Called")
		})
	}

	#[test]
	fn test_force_callable() {
		let policy = CallPolicy::once().force_callable(true);
		let err = policy.check("SETTING", &Value::from("String")).unwrap_err();
		assert!(matches!(err, Error::NotCallable { found: "str", .. }));
		assert!(policy.check("SETTING", &Value::callable(|| Value::Null)).is_ok());

		let policy = CallPolicy::once().force_callable(false);
		assert!(policy.check("SETTING", &Value::from("String")).is_ok());
	}

	#[test]
	fn test_once_invokes_at_resolution() {
		let calls = Arc::new(AtomicUsize::new(0));
		let policy = CallPolicy::once();

		let stored = policy.on_resolve(counting(&calls));
		assert_eq!(stored, Value::from("Called"));
		assert_eq!(calls.load(Ordering::SeqCst), 1);

		assert_eq!(policy.on_read(&stored), Value::from("Called"));
		assert_eq!(policy.on_read(&stored), Value::from("Called"));
		assert_eq!(calls.load(Ordering::SeqCst), 1);
	}

	#[test]
	fn test_each_time_invokes_per_read() {
		let calls = Arc::new(AtomicUsize::new(0));
		let policy = CallPolicy::each_time();

		let stored = policy.on_resolve(counting(&calls));
		assert!(stored.is_callable());
		assert_eq!(calls.load(Ordering::SeqCst), 0);

		for expected in 1..=3 {
			assert_eq!(policy.on_read(&stored), Value::from("Called"));
			assert_eq!(calls.load(Ordering::SeqCst), expected);
		}
	}

	#[test]
	fn test_non_callable_passes_through() {
		let policy = CallPolicy::each_time();
		let stored = policy.on_resolve(Value::from("String"));
		assert!(!policy.recomputes(&stored));
		assert_eq!(policy.on_read(&stored), Value::from("String"));
	}
}

// vim: ts=4
