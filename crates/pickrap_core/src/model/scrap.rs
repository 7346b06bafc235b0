//! Scrap model.
//!
//! # Invariants
//! - Every scrap belongs to exactly one category at all times.
//! - Media scraps (`Image`/`Video`/`Pdf`) carry their payload in `file_url`;
//!   `Link` and `Text` scraps carry it in `content`.

use crate::model::category::CategoryId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type ScrapId = Uuid;

/// Content type of a scrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScrapKind {
    /// Web link; `content` holds the URL.
    Link,
    Image,
    Video,
    Pdf,
    /// Free text; `content` holds the body.
    Text,
}

impl ScrapKind {
    /// Returns whether the payload lives in uploaded file storage.
    pub fn is_media(self) -> bool {
        matches!(self, Self::Image | Self::Video | Self::Pdf)
    }

    pub fn as_db_str(self) -> &'static str {
        match self {
            Self::Link => "link",
            Self::Image => "image",
            Self::Video => "video",
            Self::Pdf => "pdf",
            Self::Text => "text",
        }
    }

    pub fn from_db_str(value: &str) -> Option<Self> {
        match value {
            "link" => Some(Self::Link),
            "image" => Some(Self::Image),
            "video" => Some(Self::Video),
            "pdf" => Some(Self::Pdf),
            "text" => Some(Self::Text),
            _ => None,
        }
    }
}

/// One saved content item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scrap {
    pub id: ScrapId,
    pub category_id: CategoryId,
    #[serde(rename = "type")]
    pub kind: ScrapKind,
    /// Link URL or text body. Usually `None` for media scraps.
    pub content: Option<String>,
    /// Stored file location for media scraps.
    pub file_url: Option<String>,
}

impl Scrap {
    pub fn new(
        category_id: CategoryId,
        kind: ScrapKind,
        content: Option<String>,
        file_url: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            category_id,
            kind,
            content,
            file_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ScrapKind;

    #[test]
    fn media_kinds() {
        assert!(ScrapKind::Image.is_media());
        assert!(ScrapKind::Video.is_media());
        assert!(ScrapKind::Pdf.is_media());
        assert!(!ScrapKind::Link.is_media());
        assert!(!ScrapKind::Text.is_media());
    }

    #[test]
    fn db_strings_are_stable() {
        for kind in [
            ScrapKind::Link,
            ScrapKind::Image,
            ScrapKind::Video,
            ScrapKind::Pdf,
            ScrapKind::Text,
        ] {
            assert_eq!(ScrapKind::from_db_str(kind.as_db_str()), Some(kind));
        }
        assert_eq!(ScrapKind::from_db_str("audio"), None);
    }
}
