//! Link preview collaborator.
//!
//! # Responsibility
//! - Turn a link scrap URL into title/image/description metadata.
//!
//! # Invariants
//! - Fetching is best effort: implementations return an empty
//!   [`LinkPreview`] instead of failing the caller.

mod http;

pub use http::{parse_link_preview, HttpLinkPreviewFetcher};

use serde::{Deserialize, Serialize};

/// Preview metadata for one URL. All fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkPreview {
    pub title: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
}

impl LinkPreview {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.image.is_none() && self.description.is_none()
    }
}

/// Source of link preview metadata.
pub trait LinkPreviewFetcher {
    /// Returns preview metadata for `url`, or an empty preview on failure.
    fn fetch(&self, url: &str) -> LinkPreview;
}

impl<F: LinkPreviewFetcher + ?Sized> LinkPreviewFetcher for &F {
    fn fetch(&self, url: &str) -> LinkPreview {
        (**self).fetch(url)
    }
}

/// Fetcher that never touches the network.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLinkPreviewFetcher;

impl LinkPreviewFetcher for NoopLinkPreviewFetcher {
    fn fetch(&self, _url: &str) -> LinkPreview {
        LinkPreview::default()
    }
}
