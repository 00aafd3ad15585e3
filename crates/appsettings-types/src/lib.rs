//! Shared types for pluggable application settings.
//!
//! This crate holds the pieces shared between the settings core and the
//! source adapters: the dynamic [`Value`] model, the [`Error`] taxonomy, and
//! the [`SettingsSource`] trait the host configuration system implements.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod error;
pub mod prelude;
pub mod source;
pub mod value;

pub use error::{Error, ErrorKind, SettingsResult};
pub use source::SettingsSource;
pub use value::{Callable, ClassRef, NOT_SET, Value};

// vim: ts=4
