//! Database access layer: connection wrapper, schema bootstrap, and the
//! hash-keyed blacklist store.

pub mod blacklist;
pub mod schema;
pub mod sqlite;

pub use sqlite::{Database, validate_identifier};
