pub use crate::error::{Error, ErrorKind, SettingsResult};
pub use crate::source::SettingsSource;
pub use crate::value::{Callable, ClassRef, NOT_SET, Value};

// vim: ts=4
