//! Magazine use-case service.
//!
//! # Responsibility
//! - Create, read, update and delete magazines with their page lists.
//! - Enforce writer-only mutation and page text limits.
//!
//! # Invariants
//! - Only the writer may update or delete a magazine; a mismatch aborts the
//!   call before any mutation.
//! - Page text is at most 400 characters on both create and update paths.
//! - Every page (and the cover) references an existing scrap.
//! - Update replaces the full page list; old pages never survive.
//! - Validation runs before the write transaction, so a rejected request
//!   persists nothing.

use crate::model::magazine::{
    exceeds_page_text_limit, Magazine, MagazineId, MagazinePage, MagazinePageId,
};
use crate::model::scrap::{Scrap, ScrapId};
use crate::repo::magazine_repo::{MagazineRepository, SqliteMagazineRepository};
use crate::repo::member_repo::{MemberRepository, SqliteMemberRepository};
use crate::repo::scrap_repo::{ScrapRepository, SqliteScrapRepository};
use crate::repo::RepoResult;
use crate::service::error::{ServiceError, ServiceResult};
use crate::service::resolve_member;
use log::{info, warn};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

/// One page of a create/update request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MagazinePageRequest {
    pub scrap_id: ScrapId,
    pub text: String,
}

/// Create/update request for a magazine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MagazineRequest {
    pub title: String,
    pub open_status: bool,
    /// Scrap whose `file_url` becomes the cover snapshot.
    pub cover_scrap_id: ScrapId,
    pub pages: Vec<MagazinePageRequest>,
}

/// List item for the member's magazines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MagazineSummary {
    pub magazine_id: MagazineId,
    pub cover: Option<String>,
    pub title: String,
}

/// One page in [`MagazineDetail`]. The referenced scrap is not echoed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MagazinePageView {
    pub page_id: MagazinePageId,
    pub text: String,
}

/// Full magazine projection with pages in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MagazineDetail {
    pub id: MagazineId,
    pub title: String,
    pub open_status: bool,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    pub pages: Vec<MagazinePageView>,
}

/// Magazine service facade over repository implementations.
pub struct MagazineService<M: MemberRepository, G: MagazineRepository, S: ScrapRepository> {
    members: M,
    magazines: G,
    scraps: S,
}

impl<'conn>
    MagazineService<
        SqliteMemberRepository<'conn>,
        SqliteMagazineRepository<'conn>,
        SqliteScrapRepository<'conn>,
    >
{
    /// Wires the service to SQLite repositories on one connection.
    pub fn from_connection(conn: &'conn Connection) -> RepoResult<Self> {
        Ok(Self::new(
            SqliteMemberRepository::try_new(conn)?,
            SqliteMagazineRepository::try_new(conn)?,
            SqliteScrapRepository::try_new(conn)?,
        ))
    }
}

impl<M: MemberRepository, G: MagazineRepository, S: ScrapRepository> MagazineService<M, G, S> {
    pub fn new(members: M, magazines: G, scraps: S) -> Self {
        Self {
            members,
            magazines,
            scraps,
        }
    }

    /// Creates a magazine with its pages. Returns the new magazine id.
    pub fn save(&self, request: &MagazineRequest, email: &str) -> ServiceResult<MagazineId> {
        let member = resolve_member(&self.members, email)?;
        let cover = self.find_scrap(request.cover_scrap_id)?;

        let magazine = Magazine::new(
            member.id,
            request.title.as_str(),
            request.open_status,
            cover.file_url,
        );
        let pages = self.build_magazine_pages(&request.pages, &magazine)?;
        self.magazines.create_magazine(&magazine, &pages)?;

        info!(
            "event=magazine_save module=service status=ok magazine_id={} pages={}",
            magazine.id,
            pages.len()
        );
        Ok(magazine.id)
    }

    /// Lists id, cover and title of the member's magazines.
    pub fn find_magazines(&self, email: &str) -> ServiceResult<Vec<MagazineSummary>> {
        let member = resolve_member(&self.members, email)?;
        Ok(self
            .magazines
            .list_member_magazines(member.id)?
            .into_iter()
            .map(|magazine| MagazineSummary {
                magazine_id: magazine.id,
                cover: magazine.cover,
                title: magazine.title,
            })
            .collect())
    }

    /// Loads one magazine with its ordered pages.
    pub fn find_magazine(&self, magazine_id: MagazineId) -> ServiceResult<MagazineDetail> {
        let magazine = self.find_magazine_record(magazine_id)?;
        let pages = self
            .magazines
            .list_magazine_pages(magazine.id)?
            .into_iter()
            .map(|page| MagazinePageView {
                page_id: page.id,
                text: page.text,
            })
            .collect();

        Ok(MagazineDetail {
            id: magazine.id,
            title: magazine.title,
            open_status: magazine.open_status,
            created_at: magazine.created_at,
            pages,
        })
    }

    /// Replaces title, visibility, cover and the full page list.
    pub fn update_magazine(
        &self,
        request: &MagazineRequest,
        magazine_id: MagazineId,
        email: &str,
    ) -> ServiceResult<()> {
        let mut magazine = self.find_magazine_record(magazine_id)?;
        self.check_match_writer(&magazine, email)?;

        let cover = self.find_scrap(request.cover_scrap_id)?;
        let pages = self.build_magazine_pages(&request.pages, &magazine)?;
        magazine.update(request.title.as_str(), request.open_status, cover.file_url);
        self.magazines.replace_magazine(&magazine, &pages)?;

        info!(
            "event=magazine_update module=service status=ok magazine_id={} pages={}",
            magazine.id,
            pages.len()
        );
        Ok(())
    }

    /// Validates page requests and turns them into pages of `magazine`.
    ///
    /// Shared by the create and update paths. Fails on the first page whose
    /// text exceeds the limit or whose scrap does not exist.
    pub fn build_magazine_pages(
        &self,
        requests: &[MagazinePageRequest],
        magazine: &Magazine,
    ) -> ServiceResult<Vec<MagazinePage>> {
        let mut pages = Vec::with_capacity(requests.len());
        for request in requests {
            if let Some(chars) = exceeds_page_text_limit(&request.text) {
                warn!(
                    "event=magazine_pages module=service status=rejected reason=exceed_text_length chars={chars}"
                );
                return Err(ServiceError::ExceedTextLength { chars });
            }
            let scrap = self.find_scrap(request.scrap_id)?;
            pages.push(MagazinePage::new(
                magazine.id,
                scrap.id,
                request.text.as_str(),
            ));
        }
        Ok(pages)
    }

    /// Fails with `NotMatchWriter` unless `email` belongs to the writer.
    pub fn check_match_writer(&self, magazine: &Magazine, email: &str) -> ServiceResult<()> {
        match self.members.find_member_by_email(email)? {
            Some(member) if magazine.is_written_by(member.id) => Ok(()),
            _ => {
                warn!(
                    "event=magazine_writer_check module=service status=rejected magazine_id={}",
                    magazine.id
                );
                Err(ServiceError::NotMatchWriter(magazine.id))
            }
        }
    }

    /// Deletes a magazine written by the caller; its pages go with it.
    pub fn delete_magazine(&self, magazine_id: MagazineId, email: &str) -> ServiceResult<()> {
        let magazine = self.find_magazine_record(magazine_id)?;
        self.check_match_writer(&magazine, email)?;
        self.magazines.delete_magazine(magazine.id)?;
        info!(
            "event=magazine_delete module=service status=ok magazine_id={}",
            magazine.id
        );
        Ok(())
    }

    fn find_magazine_record(&self, magazine_id: MagazineId) -> ServiceResult<Magazine> {
        self.magazines
            .get_magazine(magazine_id)?
            .ok_or(ServiceError::MagazineNotFound(magazine_id))
    }

    fn find_scrap(&self, scrap_id: ScrapId) -> ServiceResult<Scrap> {
        self.scraps
            .get_scrap(scrap_id)?
            .ok_or(ServiceError::ScrapNotFound(scrap_id))
    }
}
