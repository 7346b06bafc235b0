//! SQLite storage bootstrap, schema migrations and unit-of-work scoping.
//!
//! # Responsibility
//! - Open and configure SQLite connections for PickRAP core.
//! - Apply schema migrations in deterministic order.
//! - Wrap multi-statement writes in one scoped transaction.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Core code must not read/write application data before migrations succeed.
//! - A unit of work either commits as a whole or leaves no trace.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;
mod transaction;

pub use open::{open_db, open_db_in_memory};
pub use transaction::run_in_transaction;

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
