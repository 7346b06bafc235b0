//! Core domain logic for PickRAP scraps and magazines.
//! This crate is the single source of truth for business invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod preview;
pub mod repo;
pub mod service;

pub use config::CoreConfig;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::category::{Category, CategoryId, DEFAULT_CATEGORY_NAME};
pub use model::hashtag::{Hashtag, HashtagId};
pub use model::magazine::{Magazine, MagazineId, MagazinePage, MagazinePageId};
pub use model::member::{Member, MemberId};
pub use model::scrap::{Scrap, ScrapId, ScrapKind};
pub use preview::{
    HttpLinkPreviewFetcher, LinkPreview, LinkPreviewFetcher, NoopLinkPreviewFetcher,
};
pub use repo::category_repo::{CategoryRepository, SqliteCategoryRepository};
pub use repo::hashtag_repo::{HashtagRepository, SqliteHashtagRepository};
pub use repo::magazine_repo::{MagazineRepository, SqliteMagazineRepository};
pub use repo::member_repo::{MemberRepository, SqliteMemberRepository};
pub use repo::scrap_repo::{ScrapRepository, SqliteScrapRepository};
pub use repo::{RepoError, RepoResult};
pub use service::category_service::{
    CategoryContents, CategoryRecord, CategoryScrapPreview, CategoryService, ScrapBody,
    ScrapPreview, ScrapView,
};
pub use service::error::{ErrorStatus, ServiceError, ServiceResult};
pub use service::magazine_service::{
    MagazineDetail, MagazinePageRequest, MagazinePageView, MagazineRequest, MagazineService,
    MagazineSummary,
};
pub use service::member_service::MemberService;
pub use service::scrap_service::{ScrapRequest, ScrapService};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
