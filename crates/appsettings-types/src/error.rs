//! Settings error types
//!
//! Every failure is raised synchronously during resolution or on first
//! access. None of them is retried; a failed resolution leaves the cache
//! untouched so a later access may try again.

use std::fmt;

pub type SettingsResult<T> = std::result::Result<T, Error>;

/// Broad category of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
	/// Name not declared, or no value and no default
	Attribute,
	/// Value read before resolution
	State,
	/// Value rejected by a constraint or call policy
	Value,
	/// External configuration source could not be loaded
	Source,
}

#[derive(Debug)]
pub enum Error {
	/// No setting with this name is declared on the container
	UndefinedSetting(String),
	/// The name is declared, but as a plain attribute
	NotASetting(String),
	/// Neither an override nor a default is available
	MissingValue {
		/// External key that was looked up
		name: String,
		/// Aliases checked after the key
		aliases: Vec<String>,
	},
	/// `value()` called before `resolve()`
	NotResolved,
	/// Coercion to the target type failed
	CastFailed { setting: String, target: &'static str },
	/// Value is not of the target type
	TypeMismatch { setting: String, target: &'static str },
	/// Class setting got something that is neither a class nor a string
	InvalidClassValue { setting: String, found: &'static str },
	/// Dotted path does not name a registered class
	ClassNotFound { path: String, setting: String },
	/// Callable required, something else found
	NotCallable { setting: String, found: &'static str },
	/// External configuration source failure
	Source(String),
	/// JSON conversion failure
	Json(String),
}

impl Error {
	pub fn kind(&self) -> ErrorKind {
		match self {
			Error::UndefinedSetting(_) | Error::NotASetting(_) | Error::MissingValue { .. } => {
				ErrorKind::Attribute
			}
			Error::NotResolved => ErrorKind::State,
			Error::CastFailed { .. }
			| Error::TypeMismatch { .. }
			| Error::InvalidClassValue { .. }
			| Error::ClassNotFound { .. }
			| Error::NotCallable { .. }
			| Error::Json(_) => ErrorKind::Value,
			Error::Source(_) => ErrorKind::Source,
		}
	}
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Error::UndefinedSetting(name) => {
				write!(f, "The setting {} is not defined for this app", name)
			}
			Error::NotASetting(name) => write!(f, "{} is an attribute, not a setting", name),
			Error::MissingValue { name, aliases } => {
				write!(
					f,
					"The setting {} is not defined in your settings and no default value is provided",
					name
				)?;
				if !aliases.is_empty() {
					write!(f, " (aliases checked: {})", aliases.join(", "))?;
				}
				Ok(())
			}
			Error::NotResolved => write!(f, "Setting value read before it was resolved"),
			Error::CastFailed { setting, target } => {
				write!(f, "The value for setting {} cannot be casted to type {}", setting, target)
			}
			Error::TypeMismatch { setting, target } => {
				write!(f, "The value for setting {} is not of type {}", setting, target)
			}
			Error::InvalidClassValue { setting, found } => write!(
				f,
				"The value for the setting {} either has to be a class or a string containing the dotted path of a class, got {}",
				setting, found
			),
			Error::ClassNotFound { path, setting } => write!(
				f,
				"The class described by \"{}\" for the setting {} could not be found",
				path, setting
			),
			Error::NotCallable { setting, found } => {
				write!(f, "The value for setting {} has to be callable, got {}", setting, found)
			}
			Error::Source(msg) => write!(f, "settings source error: {}", msg),
			Error::Json(msg) => write!(f, "json error: {}", msg),
		}
	}
}

impl std::error::Error for Error {}

impl From<serde_json::Error> for Error {
	fn from(e: serde_json::Error) -> Self {
		Error::Json(e.to_string())
	}
}


// vim: ts=4
