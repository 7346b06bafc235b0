//! Category model.
//!
//! # Invariants
//! - `name` is 1..=20 characters after trimming.
//! - `name` is unique within one member's categories.
//! - Exactly one category per member is named [`DEFAULT_CATEGORY_NAME`]; it
//!   is created with the member and is never renamed or deleted.

use crate::model::member::MemberId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type CategoryId = Uuid;

/// Name of the per-member default bucket.
pub const DEFAULT_CATEGORY_NAME: &str = "Uncategorized";
/// Maximum category name length in characters.
pub const MAX_CATEGORY_NAME_CHARS: usize = 20;

/// Per-member named bucket of scraps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub member_id: MemberId,
    pub name: String,
}

impl Category {
    pub fn new(member_id: MemberId, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            member_id,
            name: name.into(),
        }
    }

    /// Creates the member's default "Uncategorized" category.
    pub fn default_for(member_id: MemberId) -> Self {
        Self::new(member_id, DEFAULT_CATEGORY_NAME)
    }

    pub fn is_default(&self) -> bool {
        self.name == DEFAULT_CATEGORY_NAME
    }
}

/// Category name rule violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryNameError {
    Empty,
    TooLong { chars: usize },
}

impl Display for CategoryNameError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "category name must not be blank"),
            Self::TooLong { chars } => write!(
                f,
                "category name has {chars} characters, limit is {MAX_CATEGORY_NAME_CHARS}"
            ),
        }
    }
}

impl Error for CategoryNameError {}

/// Trims and checks a requested category name.
///
/// Length is counted in characters, not bytes.
pub fn normalize_category_name(name: &str) -> Result<String, CategoryNameError> {
    let trimmed = name.trim();
    let chars = trimmed.chars().count();
    if chars > MAX_CATEGORY_NAME_CHARS {
        return Err(CategoryNameError::TooLong { chars });
    }
    if chars == 0 {
        return Err(CategoryNameError::Empty);
    }
    Ok(trimmed.to_string())
}
