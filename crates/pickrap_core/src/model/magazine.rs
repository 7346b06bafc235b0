//! Magazine and magazine page models.
//!
//! # Invariants
//! - Pages are owned by their magazine and removed with it.
//! - Pages reference scraps; they never own them.
//! - `cover` is a URL snapshot taken when the magazine is saved or updated.
//! - Page text is at most [`MAX_PAGE_TEXT_CHARS`] characters.

use crate::model::member::MemberId;
use crate::model::now_epoch_ms;
use crate::model::scrap::ScrapId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type MagazineId = Uuid;
pub type MagazinePageId = Uuid;

/// Maximum caption length of one page, in characters.
pub const MAX_PAGE_TEXT_CHARS: usize = 400;

/// Ordered, titled collection of pages owned by its writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Magazine {
    pub id: MagazineId,
    /// Writer of the magazine.
    pub member_id: MemberId,
    pub title: String,
    /// Whether the magazine is visible to other members.
    pub open_status: bool,
    pub cover: Option<String>,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

impl Magazine {
    pub fn new(
        member_id: MemberId,
        title: impl Into<String>,
        open_status: bool,
        cover: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            member_id,
            title: title.into(),
            open_status,
            cover,
            created_at: now_epoch_ms(),
        }
    }

    /// Replaces the editable fields in place.
    pub fn update(&mut self, title: impl Into<String>, open_status: bool, cover: Option<String>) {
        self.title = title.into();
        self.open_status = open_status;
        self.cover = cover;
    }

    pub fn is_written_by(&self, member_id: MemberId) -> bool {
        self.member_id == member_id
    }
}

/// One caption + scrap reference inside a magazine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MagazinePage {
    pub id: MagazinePageId,
    pub magazine_id: MagazineId,
    pub scrap_id: ScrapId,
    pub text: String,
}

impl MagazinePage {
    pub fn new(magazine_id: MagazineId, scrap_id: ScrapId, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            magazine_id,
            scrap_id,
            text: text.into(),
        }
    }
}

/// Returns the character count when `text` exceeds the page limit.
pub fn exceeds_page_text_limit(text: &str) -> Option<usize> {
    let chars = text.chars().count();
    (chars > MAX_PAGE_TEXT_CHARS).then_some(chars)
}
