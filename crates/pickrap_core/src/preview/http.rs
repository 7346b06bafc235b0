//! Blocking HTTP link preview fetcher.
//!
//! Reads Open Graph `<meta>` tags (`og:title`, `og:image`,
//! `og:description`) and falls back to `<title>` and
//! `<meta name="description">`.

use super::{LinkPreview, LinkPreviewFetcher};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::blocking::Client;
use std::time::Duration;

const USER_AGENT: &str = concat!("pickrap/", env!("CARGO_PKG_VERSION"));
const MAX_FIELD_CHARS: usize = 300;

static META_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<meta\b[^>]*>").expect("valid meta tag regex"));
static ATTRIBUTE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)([a-z:_-]+)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("valid attribute regex")
});
static TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("valid title regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Link preview fetcher backed by a blocking `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpLinkPreviewFetcher {
    client: Client,
}

impl HttpLinkPreviewFetcher {
    /// Builds a fetcher whose requests give up after `timeout`.
    pub fn try_new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }

    fn fetch_html(&self, url: &str) -> Result<String, reqwest::Error> {
        self.client.get(url).send()?.error_for_status()?.text()
    }
}

impl LinkPreviewFetcher for HttpLinkPreviewFetcher {
    fn fetch(&self, url: &str) -> LinkPreview {
        let trimmed = url.trim();
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            debug!("event=link_preview module=preview status=skipped reason=unsupported_scheme");
            return LinkPreview::default();
        }

        match self.fetch_html(trimmed) {
            Ok(html) => parse_link_preview(&html),
            Err(err) => {
                warn!("event=link_preview module=preview status=error error={err}");
                LinkPreview::default()
            }
        }
    }
}

/// Extracts preview metadata from an HTML document.
pub fn parse_link_preview(html: &str) -> LinkPreview {
    let mut preview = LinkPreview::default();
    let mut fallback_description = None;

    for tag in META_TAG_RE.find_iter(html) {
        let mut key = None;
        let mut content = None;
        for caps in ATTRIBUTE_RE.captures_iter(tag.as_str()) {
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .map(|m| m.as_str())
                .unwrap_or_default();
            match caps[1].to_ascii_lowercase().as_str() {
                "property" | "name" => key = Some(value.to_ascii_lowercase()),
                "content" => content = clean_text(value),
                _ => {}
            }
        }

        let (Some(key), Some(content)) = (key, content) else {
            continue;
        };
        match key.as_str() {
            "og:title" => preview.title = preview.title.or(Some(content)),
            "og:image" => preview.image = preview.image.or(Some(content)),
            "og:description" => preview.description = preview.description.or(Some(content)),
            "description" => fallback_description = fallback_description.or(Some(content)),
            _ => {}
        }
    }

    if preview.title.is_none() {
        preview.title = TITLE_RE
            .captures(html)
            .and_then(|caps| caps.get(1))
            .and_then(|m| clean_text(m.as_str()));
    }
    if preview.description.is_none() {
        preview.description = fallback_description;
    }

    preview
}

fn clean_text(raw: &str) -> Option<String> {
    let decoded = raw
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&");
    let normalized = WHITESPACE_RE.replace_all(&decoded, " ");
    let trimmed = normalized.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.chars().take(MAX_FIELD_CHARS).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_link_preview, HttpLinkPreviewFetcher};
    use crate::preview::LinkPreviewFetcher;
    use std::time::Duration;

    #[test]
    fn open_graph_tags_win_over_fallbacks() {
        let html = r#"<html><head>
            <title>Plain title</title>
            <meta name="description" content="plain description">
            <meta property="og:title" content="Trip &amp; Food">
            <meta content='https://cdn.example.com/cover.png' property='og:image'>
            <meta property="og:description" content="  best
                places  ">
        </head></html>"#;

        let preview = parse_link_preview(html);
        assert_eq!(preview.title.as_deref(), Some("Trip & Food"));
        assert_eq!(
            preview.image.as_deref(),
            Some("https://cdn.example.com/cover.png")
        );
        assert_eq!(preview.description.as_deref(), Some("best places"));
    }

    #[test]
    fn falls_back_to_title_and_description_meta() {
        let html = r#"<HEAD><TITLE> Hello
            World </TITLE><META NAME="Description" CONTENT="About us"></HEAD>"#;
        let preview = parse_link_preview(html);
        assert_eq!(preview.title.as_deref(), Some("Hello World"));
        assert_eq!(preview.description.as_deref(), Some("About us"));
        assert_eq!(preview.image, None);
    }

    #[test]
    fn document_without_metadata_yields_empty_preview() {
        assert!(parse_link_preview("<p>no head</p>").is_empty());
    }

    #[test]
    fn non_http_urls_are_not_fetched() {
        let fetcher = HttpLinkPreviewFetcher::try_new(Duration::from_millis(10)).unwrap();
        assert!(fetcher.fetch("ftp://example.com/file").is_empty());
        assert!(fetcher.fetch("not a url").is_empty());
    }
}
