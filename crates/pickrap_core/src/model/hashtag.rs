//! Hashtag model.

use crate::model::member::MemberId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type HashtagId = Uuid;

/// Member-owned tag label. `tag` is stored normalized (trimmed, lowercase).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hashtag {
    pub id: HashtagId,
    pub member_id: MemberId,
    pub tag: String,
}

impl Hashtag {
    pub fn new(member_id: MemberId, tag: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            member_id,
            tag: tag.into(),
        }
    }
}

/// Normalizes one tag value; leading `#` markers are dropped.
///
/// Returns `None` for values that are blank after normalization.
pub fn normalize_hashtag(tag: &str) -> Option<String> {
    let trimmed = tag.trim().trim_start_matches('#').trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::normalize_hashtag;

    #[test]
    fn normalize_hashtag_trims_and_lowercases() {
        assert_eq!(normalize_hashtag("  #Travel ").as_deref(), Some("travel"));
        assert_eq!(normalize_hashtag("Food").as_deref(), Some("food"));
        assert_eq!(normalize_hashtag(" ## "), None);
    }
}
