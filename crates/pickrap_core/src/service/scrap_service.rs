//! Scrap use-case service.
//!
//! # Invariants
//! - A new scrap lands in the requested category, or in the member's default
//!   category when none is requested.
//! - Scraps only move between categories of the same member.

use crate::model::category::{CategoryId, DEFAULT_CATEGORY_NAME};
use crate::model::member::Member;
use crate::model::scrap::{Scrap, ScrapId, ScrapKind};
use crate::repo::category_repo::{CategoryRepository, SqliteCategoryRepository};
use crate::repo::member_repo::{MemberRepository, SqliteMemberRepository};
use crate::repo::scrap_repo::{ScrapRepository, SqliteScrapRepository};
use crate::repo::{RepoError, RepoResult};
use crate::service::error::{ServiceError, ServiceResult};
use crate::service::resolve_member;
use log::info;
use rusqlite::Connection;
use serde::Deserialize;

/// Input for creating one scrap.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScrapRequest {
    #[serde(rename = "scrap_type")]
    pub kind: ScrapKind,
    pub content: Option<String>,
    pub file_url: Option<String>,
    /// Target category; the default category when `None`.
    pub category_id: Option<CategoryId>,
}

/// Scrap service facade over repository implementations.
pub struct ScrapService<M: MemberRepository, C: CategoryRepository, S: ScrapRepository> {
    members: M,
    categories: C,
    scraps: S,
}

impl<'conn>
    ScrapService<
        SqliteMemberRepository<'conn>,
        SqliteCategoryRepository<'conn>,
        SqliteScrapRepository<'conn>,
    >
{
    /// Wires the service to SQLite repositories on one connection.
    pub fn from_connection(conn: &'conn Connection) -> RepoResult<Self> {
        Ok(Self::new(
            SqliteMemberRepository::try_new(conn)?,
            SqliteCategoryRepository::try_new(conn)?,
            SqliteScrapRepository::try_new(conn)?,
        ))
    }
}

impl<M: MemberRepository, C: CategoryRepository, S: ScrapRepository> ScrapService<M, C, S> {
    pub fn new(members: M, categories: C, scraps: S) -> Self {
        Self {
            members,
            categories,
            scraps,
        }
    }

    /// Saves one scrap for the member.
    pub fn save(&self, request: ScrapRequest, email: &str) -> ServiceResult<Scrap> {
        let content = request.content.filter(|value| !value.trim().is_empty());
        let file_url = request.file_url.filter(|value| !value.trim().is_empty());
        if request.kind.is_media() && file_url.is_none() {
            return Err(ServiceError::MissingFile(request.kind));
        }
        if !request.kind.is_media() && content.is_none() {
            return Err(ServiceError::EmptyScrapContent(request.kind));
        }

        let member = resolve_member(&self.members, email)?;
        let category_id = match request.category_id {
            Some(category_id) => self.owned_category_id(&member, category_id)?,
            None => self.default_category_id(&member)?,
        };

        let scrap = Scrap::new(category_id, request.kind, content, file_url);
        self.scraps.create_scrap(&scrap)?;
        info!(
            "event=scrap_save module=service status=ok scrap_id={} kind={}",
            scrap.id,
            scrap.kind.as_db_str()
        );
        Ok(scrap)
    }

    /// Loads one scrap by id.
    pub fn find_scrap(&self, scrap_id: ScrapId) -> ServiceResult<Scrap> {
        self.scraps
            .get_scrap(scrap_id)?
            .ok_or(ServiceError::ScrapNotFound(scrap_id))
    }

    /// Moves one of the member's scraps into another of their categories.
    pub fn move_scrap(
        &self,
        scrap_id: ScrapId,
        category_id: CategoryId,
        email: &str,
    ) -> ServiceResult<Scrap> {
        let member = resolve_member(&self.members, email)?;
        let mut scrap = self.find_scrap(scrap_id)?;
        let owns_scrap = self
            .categories
            .get_category(scrap.category_id)?
            .is_some_and(|category| category.member_id == member.id);
        if !owns_scrap {
            return Err(ServiceError::ScrapNotFound(scrap_id));
        }

        let target = self.owned_category_id(&member, category_id)?;
        self.scraps.move_scrap(scrap.id, target)?;
        scrap.category_id = target;
        info!(
            "event=scrap_move module=service status=ok scrap_id={} category_id={target}",
            scrap.id
        );
        Ok(scrap)
    }

    fn owned_category_id(
        &self,
        member: &Member,
        category_id: CategoryId,
    ) -> ServiceResult<CategoryId> {
        match self.categories.get_category(category_id)? {
            Some(category) if category.member_id == member.id => Ok(category.id),
            _ => Err(ServiceError::CategoryNotFound(category_id)),
        }
    }

    fn default_category_id(&self, member: &Member) -> ServiceResult<CategoryId> {
        self.categories
            .find_member_category_by_name(member.id, DEFAULT_CATEGORY_NAME)?
            .map(|category| category.id)
            .ok_or_else(|| {
                ServiceError::Repo(RepoError::InvalidData(format!(
                    "member {} has no default category",
                    member.id
                )))
            })
    }
}
