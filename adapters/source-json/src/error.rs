use appsettings_types::Error as SettingsError;
use std::fmt;

/// Internal error type for the JSON source
#[derive(Debug)]
pub enum Error {
	IoError(std::io::Error),
	JsonError(String),
	NotAnObject(&'static str),
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Error::IoError(e) => write!(f, "io error: {}", e),
			Error::JsonError(msg) => write!(f, "json error: {}", msg),
			Error::NotAnObject(found) => {
				write!(f, "settings document must be a JSON object, got {}", found)
			}
		}
	}
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
	fn from(e: std::io::Error) -> Self {
		Error::IoError(e)
	}
}

impl From<serde_json::Error> for Error {
	fn from(e: serde_json::Error) -> Self {
		Error::JsonError(e.to_string())
	}
}

impl From<Error> for SettingsError {
	fn from(e: Error) -> Self {
		SettingsError::Source(e.to_string())
	}
}

// vim: ts=4
