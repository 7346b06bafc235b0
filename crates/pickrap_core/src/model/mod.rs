//! Domain model for members, categories, scraps and magazines.
//!
//! # Responsibility
//! - Define the aggregates persisted by the repository layer.
//! - Keep field-level rules (name/text limits) next to the data they guard.
//!
//! # Invariants
//! - Relations are one-directional and id-based: children carry the parent
//!   id, parents never hold back-references.
//! - Every record is identified by a stable UUID generated at construction.

pub mod category;
pub mod hashtag;
pub mod magazine;
pub mod member;
pub mod scrap;

use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time in Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
