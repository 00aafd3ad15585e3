pub use appsettings_types::prelude::*;

// vim: ts=4
